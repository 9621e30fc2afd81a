// Tests for CSV report generation

use skulk_core::report::{FindSummary, write_find_csv, write_status_csv};
use skulk_core::tasks::PageStatus;
use skulk_core::{ReferrerGraph, StatusCode};

fn status(code: u16) -> PageStatus {
    PageStatus {
        code: StatusCode::Exact(code),
        error: None,
    }
}

#[test]
fn test_status_report_lists_failures_only() {
    let mut graph = ReferrerGraph::slash_insensitive();
    graph.add("http://site/", ["root"]);
    graph.set_value("http://site/", Some(status(200)));
    graph.add("http://site/broken", ["http://site/"]);
    graph.add("http://site/broken", ["http://site/other"]);
    graph.set_value("http://site/broken", Some(status(404)));

    let mut buffer = Vec::new();
    let summary = write_status_csv(&graph, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.counts.get("200"), Some(&1));
    assert_eq!(summary.counts.get("404"), Some(&1));
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Status code,URL,On pages,With error")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("404,http://site/broken"));
    // Both referrers land in one quoted cell.
    assert!(csv.contains("http://site\nhttp://site/other"));
    // The passing page is counted but not listed.
    assert!(!csv.contains("200,http://site/"));
}

#[test]
fn test_status_report_marks_unfinished_children() {
    let mut graph: ReferrerGraph<PageStatus> = ReferrerGraph::slash_insensitive();
    graph.add("http://site/pending", ["http://site/"]);

    let mut buffer = Vec::new();
    let summary = write_status_csv(&graph, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();

    assert_eq!(summary.counts.get("idk"), Some(&1));
    assert!(csv.contains("idk,http://site/pending"));
    assert!(csv.contains("incomplete"));
}

#[test]
fn test_status_report_includes_error_text() {
    let mut graph = ReferrerGraph::slash_insensitive();
    graph.add("http://site/down", ["http://site/"]);
    graph.set_value(
        "http://site/down",
        Some(PageStatus {
            code: StatusCode::Unknown,
            error: Some("connection refused".to_string()),
        }),
    );

    let mut buffer = Vec::new();
    write_status_csv(&graph, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();
    assert!(csv.contains("connection refused"));
}

#[test]
fn test_find_report_groups_matches_by_page() {
    let mut graph: ReferrerGraph<()> = ReferrerGraph::slash_insensitive();
    graph.add_parent("http://site/");
    graph.add_parent("http://site/quiet");
    graph.add("https://cdn.example/lib.js", ["http://site/"]);
    graph.add("https://cdn.example/app.js", ["http://site/"]);

    let mut buffer = Vec::new();
    let summary = write_find_csv(&graph, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();

    assert_eq!(
        summary,
        FindSummary {
            pages: 2,
            matched: 2,
            pages_with_matches: 1,
        }
    );
    assert!(csv.starts_with("Page,Matching URLs"));
    assert!(csv.contains("http://site"));
    // Pages without matches stay out of the rows.
    assert!(!csv.contains("http://site/quiet"));
}
