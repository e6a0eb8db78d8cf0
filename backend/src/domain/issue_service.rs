//! Issue submission service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{IssueCommand, IssueRepository, SubmitIssueRequest, UserRepository};
use crate::domain::service_support::{parse_date, parse_username, today};
use crate::domain::store_errors::{map_issue_error, map_user_error, user_not_found};
use crate::domain::{Error, IssueDraft, IssueValidationError, NewIssue};

fn map_issue_validation_error(err: IssueValidationError) -> Error {
    let (field, code) = match &err {
        IssueValidationError::UnknownKind => ("type", "invalid_issue_type"),
        IssueValidationError::Empty { field } => (*field, "missing_field"),
        IssueValidationError::TooLong { field, .. } => (*field, "too_long"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Service implementing [`IssueCommand`].
#[derive(Clone)]
pub struct IssueService<I, U> {
    issue_repo: Arc<I>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<I, U> IssueService<I, U> {
    /// Create an issue service; `clock` dates undated submissions.
    pub fn new(issue_repo: Arc<I>, user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            issue_repo,
            user_repo,
            clock,
        }
    }
}

#[async_trait]
impl<I, U> IssueCommand for IssueService<I, U>
where
    I: IssueRepository,
    U: UserRepository,
{
    async fn submit_issue(&self, request: SubmitIssueRequest) -> Result<i64, Error> {
        let username = parse_username(&request.username)?;
        let date = match request.date.as_deref() {
            Some(raw) => parse_date("date", raw)?,
            None => today(self.clock.as_ref()),
        };
        let issue = NewIssue::new(
            username,
            date,
            IssueDraft {
                kind: &request.kind,
                category: &request.category,
                subject: &request.subject,
                message: &request.message,
            },
        )
        .map_err(map_issue_validation_error)?;

        if self
            .user_repo
            .find(issue.username())
            .await
            .map_err(map_user_error)?
            .is_none()
        {
            return Err(user_not_found(issue.username().as_ref()));
        }

        let id = self
            .issue_repo
            .insert(&issue)
            .await
            .map_err(map_issue_error)?;
        info!(id, username = %issue.username(), kind = %issue.kind(), "issue submitted");
        Ok(id)
    }
}
