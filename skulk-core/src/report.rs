use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ReportError;
use crate::graph::ReferrerGraph;
use crate::tasks::PageStatus;

/// Counts accompanying a written status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    /// Occurrences per rendered status code, including the passing ones
    /// that never make it into the CSV.
    pub counts: BTreeMap<String, usize>,
}

/// Counts accompanying a written find report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindSummary {
    pub pages: usize,
    pub matched: usize,
    pub pages_with_matches: usize,
}

/// Write the non-2xx rows of a status run as CSV: code, URL, the pages
/// referring to it, and any error text. Children that were admitted but
/// never completed report `idk` / `incomplete`.
pub fn write_status_csv<W: Write>(
    graph: &ReferrerGraph<PageStatus>,
    writer: W,
) -> Result<StatusSummary, ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Status code", "URL", "On pages", "With error"])?;
    let mut rows: Vec<_> = graph.children().into_iter().collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    let total = rows.len();
    let mut counts = BTreeMap::new();
    for (url, record) in rows {
        let (code, error, passing) = match &record.value {
            Some(status) => (
                status.code.to_string(),
                status.error.clone().unwrap_or_default(),
                status.code.is_success(),
            ),
            None => ("idk".to_string(), "incomplete".to_string(), false),
        };
        *counts.entry(code.clone()).or_insert(0) += 1;
        if !passing {
            csv.write_record([
                code.as_str(),
                url.as_str(),
                record.parents.join("\n").as_str(),
                error.as_str(),
            ])?;
        }
    }
    csv.flush()?;
    Ok(StatusSummary { total, counts })
}

pub fn write_status_report(
    graph: &ReferrerGraph<PageStatus>,
    path: &Path,
) -> Result<StatusSummary, ReportError> {
    let file = File::create(path)?;
    write_status_csv(graph, file)
}

/// Write each crawled page and its matching URLs as CSV. Pages without
/// matches are counted but omitted from the rows.
pub fn write_find_csv<W: Write>(
    graph: &ReferrerGraph<()>,
    writer: W,
) -> Result<FindSummary, ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Page", "Matching URLs"])?;
    let mut rows: Vec<_> = graph.parents().into_iter().collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    let pages = rows.len();
    let mut matched = 0;
    let mut pages_with_matches = 0;
    for (page, children) in rows {
        matched += children.len();
        if !children.is_empty() {
            csv.write_record([page.as_str(), children.join("\n").as_str()])?;
            pages_with_matches += 1;
        }
    }
    csv.flush()?;
    Ok(FindSummary {
        pages,
        matched,
        pages_with_matches,
    })
}

pub fn write_find_report(
    graph: &ReferrerGraph<()>,
    path: &Path,
) -> Result<FindSummary, ReportError> {
    let file = File::create(path)?;
    write_find_csv(graph, file)
}
