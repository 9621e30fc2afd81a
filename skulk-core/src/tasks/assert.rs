use std::collections::BTreeMap;
use std::sync::Arc;

use crate::graph::ReferrerGraph;
use crate::link::Link;
use crate::response::FetchOutcome;

use super::{CrawlRules, PageStatus, SelectorProbe, TaskStrategy, expand, landed_internal};

/// Per-page existence verdict for each configured selector.
pub type SelectorMap = BTreeMap<String, bool>;

/// Observer invoked after each fetch; the map is present only when the
/// page could be probed.
pub type AssertCallback = Arc<dyn Fn(&Link, &PageStatus, Option<&SelectorMap>) + Send + Sync>;

/// Asserts the existence of CSS selectors on every internal page.
pub struct AssertTask<P> {
    rules: CrawlRules,
    selectors: Vec<String>,
    probe: P,
    graph: ReferrerGraph<SelectorMap>,
    on_result: Option<AssertCallback>,
}

impl<P: SelectorProbe> AssertTask<P> {
    pub fn new(rules: CrawlRules, selectors: Vec<String>, probe: P) -> Self {
        Self {
            rules,
            selectors,
            probe,
            graph: ReferrerGraph::slash_insensitive(),
            on_result: None,
        }
    }

    /// Continue filling a graph from an earlier run.
    pub fn with_graph(mut self, graph: ReferrerGraph<SelectorMap>) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_result_callback(mut self, callback: AssertCallback) -> Self {
        self.on_result = Some(callback);
        self
    }

    pub fn graph(&self) -> &ReferrerGraph<SelectorMap> {
        &self.graph
    }

    pub fn into_graph(self) -> ReferrerGraph<SelectorMap> {
        self.graph
    }
}

impl<P: SelectorProbe> TaskStrategy for AssertTask<P> {
    fn admit(&mut self, link: &Link) -> bool {
        let internal = link.is_internal(&self.rules.roots, self.rules.scheme_squash);
        if !link.is_runnable(&self.rules.blacklist, &self.rules.whitelist)
            || !internal
            || self.graph.is_child(link.absolute())
        {
            return false;
        }
        if self.rules.scheme_squash {
            if let Some(alt) = link.alt_scheme() {
                if self.graph.is_child(&alt) {
                    return false;
                }
            }
        }
        self.graph.add_child(link.absolute());
        true
    }

    fn complete(&mut self, link: &Link, outcome: &FetchOutcome) -> Vec<Link> {
        let mut discovered = Vec::new();
        let mut existence = None;
        if let Some(page) = outcome.page.as_ref() {
            if !landed_internal(link, page, &self.rules) {
                return discovered;
            }
            if !page.is_asset {
                let verdicts: SelectorMap = self
                    .selectors
                    .iter()
                    .map(|selector| (selector.clone(), self.probe.exists(page, selector)))
                    .collect();
                self.graph.set_value(link.absolute(), Some(verdicts.clone()));
                existence = Some(verdicts);
                discovered = expand(page, link.absolute());
            }
        }
        if let Some(callback) = &self.on_result {
            callback(link, &PageStatus::from_outcome(outcome), existence.as_ref());
        }
        discovered
    }
}
