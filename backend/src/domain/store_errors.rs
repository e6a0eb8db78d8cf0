//! Mapping from driven-port failures to domain errors.
//!
//! Unknown users become `not_found`; every other store failure (connection,
//! query, timeout) becomes `internal_error`, which callers may retry.

use serde_json::json;
use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{
    AttendanceRepositoryError, IssueRepositoryError, PasswordHashError, UserPersistenceError,
};

pub(crate) fn user_not_found(username: &str) -> Error {
    Error::not_found(format!("user {username} not found"))
        .with_details(json!({ "field": "username", "value": username, "code": "unknown_user" }))
}

pub(crate) fn map_attendance_error(err: AttendanceRepositoryError) -> Error {
    match err {
        AttendanceRepositoryError::UnknownUser { username } => user_not_found(&username),
        other => {
            error!(error = %other, "attendance store failed");
            Error::internal(format!("attendance store error: {other}"))
        }
    }
}

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user store failed");
    Error::internal(format!("user store error: {err}"))
}

pub(crate) fn map_issue_error(err: IssueRepositoryError) -> Error {
    match err {
        IssueRepositoryError::UnknownUser { username } => user_not_found(&username),
        other => {
            error!(error = %other, "issue store failed");
            Error::internal(format!("issue store error: {other}"))
        }
    }
}

pub(crate) fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal("credential processing failed")
}
