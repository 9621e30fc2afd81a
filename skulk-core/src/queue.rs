use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::link::Link;
use crate::response::FetchOutcome;
use crate::tasks::TaskStrategy;

/// Delegate that retrieves one URL. Implementations report HTTP error
/// statuses through the outcome, never as failures.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Cooperative stop flag checked between queue iterations. Cloneable so a
/// signal handler can flip it while the crawl loop watches it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub cancelled: bool,
}

/// FIFO of pending links, drained one fetch at a time.
pub struct CrawlQueue<F> {
    pending: VecDeque<Link>,
    fetcher: F,
}

impl<F: Fetcher> CrawlQueue<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            pending: VecDeque::new(),
            fetcher,
        }
    }

    pub fn add(&mut self, link: Link) {
        self.pending.push_back(link);
    }

    pub fn add_all(&mut self, links: impl IntoIterator<Item = Link>) {
        self.pending.extend(links);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain the queue in FIFO order. Each link passes through the
    /// strategy's admission check before any network traffic; admitted
    /// links are fetched, completed, and whatever the strategy discovers
    /// goes on the tail. Stops between iterations when `cancel` is set,
    /// leaving the remaining links queued.
    pub async fn run<S: TaskStrategy>(&mut self, strategy: &mut S, cancel: &CancelToken) -> RunSummary {
        let mut fetched = 0;
        while let Some(link) = self.pending.pop_front() {
            if cancel.is_cancelled() {
                self.pending.push_front(link);
                info!(fetched, remaining = self.pending.len(), "crawl cancelled");
                return RunSummary {
                    fetched,
                    cancelled: true,
                };
            }
            if !strategy.admit(&link) {
                debug!(url = link.absolute(), "skipped");
                continue;
            }
            let outcome = self.fetcher.fetch(link.absolute()).await;
            fetched += 1;
            let discovered = strategy.complete(&link, &outcome);
            self.pending.extend(discovered);
        }
        info!(fetched, "crawl complete");
        RunSummary {
            fetched,
            cancelled: false,
        }
    }
}
