// Tests for status code parsing and wildcard comparison

use skulk_core::status::StatusCode;

fn code(token: &str) -> StatusCode {
    token.parse().unwrap()
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_from_u16_accepts_the_http_range() {
    assert_eq!(StatusCode::from_u16(200).unwrap(), StatusCode::Exact(200));
    assert_eq!(StatusCode::from_u16(599).unwrap(), StatusCode::Exact(599));
    assert!(StatusCode::from_u16(99).is_err());
    assert!(StatusCode::from_u16(600).is_err());
}

#[test]
fn test_exact_numeric_strings_become_exact_codes() {
    assert_eq!(code("200"), StatusCode::Exact(200));
}

#[test]
fn test_cloning_duplicates_a_code() {
    let first = StatusCode::from_u16(200).unwrap();
    assert_eq!(first.clone(), first);
}

#[test]
fn test_exactness_is_detected() {
    assert!(StatusCode::from_u16(200).unwrap().is_exact());
    assert!(!code("2xx").is_exact());
    assert!(code("idk").is_exact());
}

#[test]
fn test_patterns_are_case_insensitive() {
    assert_eq!(code("2XX"), StatusCode::Pattern("2xx".to_string()));
    assert_eq!(code("IDK"), StatusCode::Unknown);
}

#[test]
fn test_malformed_tokens_are_rejected() {
    for token in ["abc", "xx", "20", "2000", "0xx", "6xx", "999", "099", ""] {
        assert!(token.parse::<StatusCode>().is_err(), "{token:?}");
    }
}

// ============================================================================
// Comparison Tests
// ============================================================================

#[test]
fn test_matching_exact_codes() {
    assert!(code("300").matches(&StatusCode::Exact(300)));
    assert!(!code("500").matches(&StatusCode::Exact(300)));
    assert!(code("idk").matches(&code("idk")));
    assert!(!code("idk").matches(&StatusCode::Exact(300)));
}

#[test]
fn test_matching_exact_against_inexact_codes() {
    assert!(code("300").matches(&code("3xx")));
    assert!(!code("300").matches(&code("4xx")));
    assert!(code("300").matches(&code("xxx")));
    assert!(code("idk").matches(&code("xxx")));
}

#[test]
fn test_matching_inexact_codes() {
    assert!(code("3xx").matches(&code("3xx")));
    assert!(code("x0x").matches(&code("40x")));
    assert!(code("3xx").matches(&code("xxx")));
    assert!(!code("3xx").matches(&code("4xx")));
}

#[test]
fn test_matching_is_commutative() {
    let pairs = [
        ("300", "3xx"),
        ("300", "4xx"),
        ("idk", "xxx"),
        ("x0x", "40x"),
        ("idk", "300"),
    ];
    for (a, b) in pairs {
        assert_eq!(code(a).matches(&code(b)), code(b).matches(&code(a)), "{a} vs {b}");
    }
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_display_round_trips() {
    assert_eq!(code("200").to_string(), "200");
    assert_eq!(code("4xx").to_string(), "4xx");
    assert_eq!(code("idk").to_string(), "idk");
}

#[test]
fn test_success_class() {
    assert!(code("200").is_success());
    assert!(code("204").is_success());
    assert!(!code("302").is_success());
    assert!(!code("2xx").is_success());
    assert!(!code("idk").is_success());
}
