//! Port for complaint and feedback persistence.

use async_trait::async_trait;

use crate::domain::{IssueKind, NewIssue};

use super::define_port_error;

define_port_error! {
    /// Errors raised by issue repository adapters.
    pub enum IssueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "issue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "issue repository query failed: {message}",
        /// The store did not answer within the configured budget.
        Timeout { message: String } => "issue repository timed out: {message}",
        /// The submitting user does not exist.
        UnknownUser { username: String } => "user {username} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Store an issue and return its identifier.
    async fn insert(&self, issue: &NewIssue) -> Result<i64, IssueRepositoryError>;

    /// Number of stored issues of `kind`.
    async fn count_by_kind(&self, kind: IssueKind) -> Result<u64, IssueRepositoryError>;
}
