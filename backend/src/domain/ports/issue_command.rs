//! Driving port for complaint and feedback submission.

use async_trait::async_trait;

use crate::domain::Error;

/// Raw issue submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitIssueRequest {
    /// Submitting user.
    pub username: String,
    /// `complaint` or `feedback`.
    pub kind: String,
    /// Free-form category.
    pub category: String,
    /// One-line summary.
    pub subject: String,
    /// Full text.
    pub message: String,
    /// Submission date, `YYYY-MM-DD`; `None` means today.
    pub date: Option<String>,
}

/// Domain use-case port for issue submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueCommand: Send + Sync {
    /// Validate and store an issue, returning its identifier.
    async fn submit_issue(&self, request: SubmitIssueRequest) -> Result<i64, Error>;
}
