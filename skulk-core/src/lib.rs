pub mod error;
pub mod graph;
pub mod link;
pub mod profile;
pub mod queue;
pub mod report;
pub mod response;
pub mod status;
pub mod store;
pub mod tasks;

pub use error::{LinkError, ProfileError, ReportError, StatusCodeError};
pub use graph::{ChildRecord, ReferrerGraph};
pub use link::{Link, Referrer};
pub use profile::Profile;
pub use queue::{CancelToken, CrawlQueue, Fetcher, RunSummary};
pub use response::{FetchOutcome, PageSnapshot};
pub use status::StatusCode;
pub use store::ProfileStore;
pub use tasks::{
    AssertTask, CrawlRules, FindTask, PageStatus, SelectorProbe, StatusTask, TaskStrategy,
};
