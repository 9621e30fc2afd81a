use glob::Pattern;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProfileError;
use crate::queue::{CancelToken, CrawlQueue, Fetcher, RunSummary};
use crate::tasks::{AssertTask, CrawlRules, FindTask, SelectorProbe, StatusTask, TaskStrategy};

const CRAWLER_URL: &str = "https://github.com/quillet/skulk";

/// An atomic unit of link-checking rules: where to start, what to skip,
/// and who to contact about the crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Identifier of the profile. Doubles as the store filename.
    pub name: String,
    /// URLs to start spidering from.
    pub roots: Vec<String>,
    /// Contact address embedded in the user agent, so site operators reach
    /// whoever is running the crawl.
    pub email: String,
    /// Glob patterns for URLs to ignore.
    #[serde(default)]
    pub blacklist: Vec<String>,
    /// Glob pattern exceptions to the blacklist.
    #[serde(default)]
    pub whitelist: Vec<String>,
    /// Don't check external URLs.
    #[serde(default)]
    pub internal_only: bool,
    /// Treat http and https variants of a URL as the same node.
    #[serde(default)]
    pub scheme_squash: bool,
    /// Follow redirects and report the landed page's status code instead
    /// of the redirect's.
    #[serde(default)]
    pub redirect: bool,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        roots: Vec<String>,
        email: impl Into<String>,
    ) -> Result<Self, ProfileError> {
        if roots.is_empty() {
            return Err(ProfileError::NoRoots);
        }
        Ok(Self {
            name: name.into(),
            roots,
            email: email.into(),
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            internal_only: false,
            scheme_squash: false,
            redirect: false,
        })
    }

    /// Parse the roots and compile the glob lists into an immutable rule
    /// set for one run.
    pub fn rules(&self) -> Result<CrawlRules, ProfileError> {
        if self.roots.is_empty() {
            return Err(ProfileError::NoRoots);
        }
        let roots = self
            .roots
            .iter()
            .map(|root| {
                Url::parse(root).map_err(|source| ProfileError::InvalidRoot {
                    url: root.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CrawlRules {
            roots,
            blacklist: compile_globs(&self.blacklist)?,
            whitelist: compile_globs(&self.whitelist)?,
            internal_only: self.internal_only,
            scheme_squash: self.scheme_squash,
            redirect: self.redirect,
        })
    }

    /// User agent identifying the crawler and its operator.
    pub fn user_agent(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; skulk/{}; +{}) {}",
            env!("CARGO_PKG_VERSION"),
            CRAWLER_URL,
            self.email
        )
    }

    pub fn status_task(&self) -> Result<StatusTask, ProfileError> {
        Ok(StatusTask::new(self.rules()?))
    }

    pub fn find_task(&self, globs: &[String]) -> Result<FindTask, ProfileError> {
        Ok(FindTask::new(self.rules()?, compile_globs(globs)?))
    }

    pub fn assert_task<P: SelectorProbe>(
        &self,
        selectors: Vec<String>,
        probe: P,
    ) -> Result<AssertTask<P>, ProfileError> {
        Ok(AssertTask::new(self.rules()?, selectors, probe))
    }

    /// Seed a queue with this profile's roots and drain it under the given
    /// task strategy.
    pub async fn run<F, S>(
        &self,
        fetcher: F,
        strategy: &mut S,
        cancel: &CancelToken,
    ) -> Result<RunSummary, ProfileError>
    where
        F: Fetcher,
        S: TaskStrategy,
    {
        let rules = self.rules()?;
        let mut queue = CrawlQueue::new(fetcher);
        queue.add_all(rules.root_links());
        Ok(queue.run(strategy, cancel).await)
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ProfileError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| ProfileError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}
