use std::sync::Arc;

use crate::graph::ReferrerGraph;
use crate::link::Link;
use crate::response::FetchOutcome;

use super::{CrawlRules, PageStatus, TaskStrategy, expand, landed_internal};

/// Observer invoked after each fetch with the recorded status and the
/// final internal/external classification.
pub type StatusCallback = Arc<dyn Fn(&Link, &PageStatus, bool) + Send + Sync>;

/// Walks every runnable link from the roots and records referrer, status
/// code, and any transport error per URL.
pub struct StatusTask {
    rules: CrawlRules,
    graph: ReferrerGraph<PageStatus>,
    on_result: Option<StatusCallback>,
}

impl StatusTask {
    pub fn new(rules: CrawlRules) -> Self {
        Self {
            rules,
            graph: ReferrerGraph::slash_insensitive(),
            on_result: None,
        }
    }

    /// Continue filling a graph from an earlier run.
    pub fn with_graph(mut self, graph: ReferrerGraph<PageStatus>) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_result_callback(mut self, callback: StatusCallback) -> Self {
        self.on_result = Some(callback);
        self
    }

    pub fn graph(&self) -> &ReferrerGraph<PageStatus> {
        &self.graph
    }

    pub fn into_graph(self) -> ReferrerGraph<PageStatus> {
        self.graph
    }
}

impl TaskStrategy for StatusTask {
    fn admit(&mut self, link: &Link) -> bool {
        if !link.is_runnable(&self.rules.blacklist, &self.rules.whitelist) {
            return false;
        }
        let internal = link.is_internal(&self.rules.roots, self.rules.scheme_squash);
        if self.rules.internal_only && !internal {
            return false;
        }
        let referrer = link.referrer().to_string();
        if self.graph.is_child(link.absolute()) {
            // Already visited: just record one more referral.
            self.graph.add(link.absolute(), [referrer]);
            return false;
        }
        self.graph.add(link.absolute(), [referrer]);
        if self.rules.scheme_squash {
            if let Some(alt) = link.alt_scheme() {
                if self.graph.is_child(&alt) {
                    let squashed = self.graph.value(&alt).cloned();
                    self.graph.set_value(link.absolute(), squashed);
                    return false;
                }
            }
        }
        true
    }

    fn complete(&mut self, link: &Link, outcome: &FetchOutcome) -> Vec<Link> {
        let mut internal = link.is_internal(&self.rules.roots, self.rules.scheme_squash);
        let mut discovered = Vec::new();
        if let Some(page) = outcome.page.as_ref() {
            internal = landed_internal(link, page, &self.rules);
            if internal && !page.is_asset {
                discovered = expand(page, link.absolute());
            }
        }
        let status = PageStatus::from_outcome(outcome);
        self.graph.set_value(link.absolute(), Some(status.clone()));
        if let Some(callback) = &self.on_result {
            callback(link, &status, internal);
        }
        discovered
    }
}
