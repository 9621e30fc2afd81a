use std::sync::Arc;

use glob::Pattern;

use crate::graph::ReferrerGraph;
use crate::link::{Link, Referrer};
use crate::response::FetchOutcome;

use super::{CrawlRules, PageStatus, TaskStrategy, expand, landed_internal};

/// Observer invoked for each glob hit: the referring page and the match.
pub type MatchCallback = Arc<dyn Fn(&Referrer, &str) + Send + Sync>;

/// Observer invoked after each fetch, match or not.
pub type FindCallback = Arc<dyn Fn(&Link, &PageStatus) + Send + Sync>;

/// Records links matching glob patterns against the pages that refer to
/// them. Matching is independent of visitation; fetching still happens
/// only once per internal node. Traversal never leaves the site.
pub struct FindTask {
    rules: CrawlRules,
    globs: Vec<Pattern>,
    graph: ReferrerGraph<()>,
    on_match: Option<MatchCallback>,
    on_fetched: Option<FindCallback>,
}

impl FindTask {
    pub fn new(rules: CrawlRules, globs: Vec<Pattern>) -> Self {
        Self {
            rules,
            globs,
            graph: ReferrerGraph::slash_insensitive(),
            on_match: None,
            on_fetched: None,
        }
    }

    /// Continue filling a graph from an earlier run.
    pub fn with_graph(mut self, graph: ReferrerGraph<()>) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_match_callback(mut self, callback: MatchCallback) -> Self {
        self.on_match = Some(callback);
        self
    }

    pub fn with_fetch_callback(mut self, callback: FindCallback) -> Self {
        self.on_fetched = Some(callback);
        self
    }

    pub fn graph(&self) -> &ReferrerGraph<()> {
        &self.graph
    }

    pub fn into_graph(self) -> ReferrerGraph<()> {
        self.graph
    }
}

impl TaskStrategy for FindTask {
    fn admit(&mut self, link: &Link) -> bool {
        // A hit counts even when the link is never fetched.
        if link.matches(&self.globs) {
            self.graph
                .add(link.absolute(), [link.referrer().to_string()]);
            if let Some(callback) = &self.on_match {
                callback(link.referrer(), link.absolute());
            }
        }
        if !link.is_runnable(&self.rules.blacklist, &self.rules.whitelist) {
            return false;
        }
        if !link.is_internal(&self.rules.roots, self.rules.scheme_squash) {
            return false;
        }
        if self.graph.is_parent(link.absolute()) {
            return false;
        }
        if self.rules.scheme_squash {
            if let Some(alt) = link.alt_scheme() {
                if self.graph.is_parent(&alt) {
                    return false;
                }
            }
        }
        self.graph.add_parent(link.absolute());
        true
    }

    fn complete(&mut self, link: &Link, outcome: &FetchOutcome) -> Vec<Link> {
        let mut discovered = Vec::new();
        if let Some(page) = outcome.page.as_ref() {
            if !landed_internal(link, page, &self.rules) {
                return discovered;
            }
            if !page.is_asset {
                discovered = expand(page, link.absolute());
            }
        }
        if let Some(callback) = &self.on_fetched {
            callback(link, &PageStatus::from_outcome(outcome));
        }
        discovered
    }
}
