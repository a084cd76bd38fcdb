pub mod error;
pub mod mapping;
pub mod models;
pub mod pagination;
pub mod retry;
pub mod traits;
pub mod users;
pub mod writer;

pub use error::{MigrateError, Result};
pub use mapping::map_issue;
pub use models::*;
pub use pagination::fetch_all_pages;
pub use retry::{with_retry, RetryConfig, RetryDecision, RetryableError};
pub use traits::{IssueSource, IssueTarget};
pub use users::UsernameMap;
pub use writer::{GitHubWriter, WriteOutcome};
