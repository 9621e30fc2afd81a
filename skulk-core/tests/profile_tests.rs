// Tests for profile configuration and the JSON store

use skulk_core::{Profile, ProfileError, ProfileStore};
use tempfile::TempDir;

fn sample_profile(name: &str) -> Profile {
    let mut profile = Profile::new(
        name,
        vec!["http://localhost:9533/".to_string()],
        "test@example.com",
    )
    .unwrap();
    profile.blacklist = vec!["*.pdf".to_string()];
    profile.whitelist = vec!["*keep.pdf".to_string()];
    profile.scheme_squash = true;
    profile.redirect = true;
    profile
}

fn temp_store() -> (TempDir, ProfileStore) {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::open(dir.path());
    (dir, store)
}

// ============================================================================
// Profile Tests
// ============================================================================

#[test]
fn test_profile_needs_roots() {
    assert!(matches!(
        Profile::new("empty", Vec::new(), "test@example.com"),
        Err(ProfileError::NoRoots)
    ));
}

#[test]
fn test_rules_parse_roots_and_globs() {
    let rules = sample_profile("sample").rules().unwrap();
    assert_eq!(rules.roots.len(), 1);
    assert_eq!(rules.blacklist.len(), 1);
    assert_eq!(rules.whitelist.len(), 1);
    assert!(rules.scheme_squash);
    assert!(rules.redirect);
    assert_eq!(rules.root_links()[0].absolute(), "http://localhost:9533/");
}

#[test]
fn test_rules_reject_invalid_roots() {
    let mut profile = sample_profile("sample");
    profile.roots = vec!["not a url".to_string()];
    assert!(matches!(
        profile.rules(),
        Err(ProfileError::InvalidRoot { .. })
    ));
}

#[test]
fn test_rules_reject_invalid_globs() {
    let mut profile = sample_profile("sample");
    profile.blacklist = vec!["broken[".to_string()];
    assert!(matches!(
        profile.rules(),
        Err(ProfileError::InvalidGlob { .. })
    ));
}

#[test]
fn test_user_agent_identifies_the_operator() {
    let agent = sample_profile("sample").user_agent();
    assert!(agent.contains("skulk/"));
    assert!(agent.ends_with("test@example.com"));
}

// ============================================================================
// Store Tests
// ============================================================================

#[test]
fn test_save_and_load_round_trip() {
    let (_dir, store) = temp_store();
    let profile = sample_profile("roundtrip");
    store.save(&profile).unwrap();
    assert!(store.exists("roundtrip"));
    assert_eq!(store.load("roundtrip").unwrap(), profile);
}

#[test]
fn test_load_missing_profile_fails() {
    let (_dir, store) = temp_store();
    assert!(matches!(
        store.load("ghost"),
        Err(ProfileError::NotFound(name)) if name == "ghost"
    ));
}

#[test]
fn test_defaults_fill_in_for_sparse_documents() {
    let (dir, store) = temp_store();
    std::fs::write(
        dir.path().join("sparse.json"),
        r#"{"name":"sparse","roots":["http://site/"],"email":"a@b.c"}"#,
    )
    .unwrap();
    let profile = store.load("sparse").unwrap();
    assert!(profile.blacklist.is_empty());
    assert!(!profile.internal_only);
    assert!(!profile.scheme_squash);
    assert!(!profile.redirect);
}

#[test]
fn test_remove_deletes_the_document() {
    let (_dir, store) = temp_store();
    store.save(&sample_profile("doomed")).unwrap();
    store.remove("doomed").unwrap();
    assert!(!store.exists("doomed"));
    assert!(store.remove("doomed").is_err());
}

#[test]
fn test_rename_rewrites_the_embedded_name() {
    let (_dir, store) = temp_store();
    store.save(&sample_profile("before")).unwrap();
    store.rename("before", "after").unwrap();
    assert!(!store.exists("before"));
    let renamed = store.load("after").unwrap();
    assert_eq!(renamed.name, "after");
}

#[test]
fn test_rename_refuses_to_clobber() {
    let (_dir, store) = temp_store();
    store.save(&sample_profile("one")).unwrap();
    store.save(&sample_profile("two")).unwrap();
    assert!(matches!(
        store.rename("one", "two"),
        Err(ProfileError::AlreadyExists(name)) if name == "two"
    ));
    assert!(store.exists("one"));
}

#[test]
fn test_list_is_sorted() {
    let (_dir, store) = temp_store();
    assert!(store.list().unwrap().is_empty());
    for name in ["zeta", "alpha", "mid"] {
        store.save(&sample_profile(name)).unwrap();
    }
    assert_eq!(store.list().unwrap(), ["alpha", "mid", "zeta"]);
}
