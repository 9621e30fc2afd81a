mod assert;
mod find;
mod status;

pub use assert::{AssertCallback, AssertTask, SelectorMap};
pub use find::{FindCallback, FindTask, MatchCallback};
pub use status::{StatusCallback, StatusTask};

use glob::Pattern;
use tracing::debug;
use url::Url;

use crate::link::{Link, Referrer};
use crate::response::{FetchOutcome, PageSnapshot};
use crate::status::StatusCode;

/// Hooks a task variant plugs into the crawl loop.
///
/// `admit` owns all graph bookkeeping that must happen exactly once per
/// node, so that rejection stays a cheap decision with no network call.
/// `complete` records the outcome and returns the links to enqueue next.
pub trait TaskStrategy {
    fn admit(&mut self, link: &Link) -> bool {
        let _ = link;
        true
    }

    fn complete(&mut self, link: &Link, outcome: &FetchOutcome) -> Vec<Link> {
        let _ = (link, outcome);
        Vec::new()
    }
}

/// Answers whether a CSS selector matches anything on a page.
pub trait SelectorProbe {
    fn exists(&self, page: &PageSnapshot, selector: &str) -> bool;
}

/// Immutable rule set shared by every task variant during one run.
#[derive(Debug, Clone)]
pub struct CrawlRules {
    pub roots: Vec<Url>,
    pub blacklist: Vec<Pattern>,
    pub whitelist: Vec<Pattern>,
    pub internal_only: bool,
    pub scheme_squash: bool,
    pub redirect: bool,
}

impl CrawlRules {
    /// Seed links for the configured roots.
    pub fn root_links(&self) -> Vec<Link> {
        self.roots.iter().cloned().map(Link::from_root_url).collect()
    }
}

/// Outcome recorded per URL by a status run.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStatus {
    pub code: StatusCode,
    pub error: Option<String>,
}

impl PageStatus {
    pub(crate) fn from_outcome(outcome: &FetchOutcome) -> Self {
        Self {
            code: outcome.status.clone(),
            error: outcome.error.clone(),
        }
    }
}

/// Build links for every raw href on a page, with the fetched page as the
/// referrer. Unresolvable hrefs are dropped.
fn expand(page: &PageSnapshot, referrer: &str) -> Vec<Link> {
    page.links
        .iter()
        .filter_map(|href| match Link::new(href, Referrer::Page(referrer.to_string())) {
            Ok(link) => Some(link),
            Err(err) => {
                debug!(%href, %err, "skipping unresolvable link");
                None
            }
        })
        .collect()
}

/// Internal classification honoring the redirect contract: when redirects
/// are followed, the landed URL decides internal/external while the result
/// stays recorded under the original referrer.
fn landed_internal(link: &Link, page: &PageSnapshot, rules: &CrawlRules) -> bool {
    if !rules.redirect {
        return link.is_internal(&rules.roots, rules.scheme_squash);
    }
    match Link::new(&page.final_url, link.referrer().clone()) {
        Ok(landed) => landed.is_internal(&rules.roots, rules.scheme_squash),
        Err(err) => {
            debug!(final_url = %page.final_url, %err, "could not parse landing URL");
            false
        }
    }
}
