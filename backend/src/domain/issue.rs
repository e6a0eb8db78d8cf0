//! Complaints and feedback submitted by students.

use std::fmt;
use std::str::FromStr;

use super::{AttendanceDate, Username};

/// Maximum length of an issue category.
pub const CATEGORY_MAX: usize = 64;
/// Maximum length of an issue subject.
pub const SUBJECT_MAX: usize = 200;
/// Maximum length of an issue message.
pub const MESSAGE_MAX: usize = 4000;

/// Validation errors for issue submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueValidationError {
    /// The kind was neither `complaint` nor `feedback`.
    #[error("issue type must be complaint or feedback")]
    UnknownKind,
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    /// A text field exceeded its limit.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Kind of submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Something went wrong.
    Complaint,
    /// General feedback.
    Feedback,
}

impl IssueKind {
    /// Stable lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complaint => "complaint",
            Self::Feedback => "feedback",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueKind {
    type Err = IssueValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complaint" => Ok(Self::Complaint),
            "feedback" => Ok(Self::Feedback),
            _ => Err(IssueValidationError::UnknownKind),
        }
    }
}

fn bounded_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, IssueValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IssueValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(IssueValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Validated issue ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    username: Username,
    kind: IssueKind,
    category: String,
    subject: String,
    message: String,
    date: AttendanceDate,
}

/// Raw issue fields as received from a caller.
#[derive(Debug, Clone, Copy)]
pub struct IssueDraft<'a> {
    /// `complaint` or `feedback`, any case.
    pub kind: &'a str,
    /// Free-form category such as `food`.
    pub category: &'a str,
    /// One-line summary.
    pub subject: &'a str,
    /// Full text.
    pub message: &'a str,
}

impl NewIssue {
    /// Validate a draft submitted by `username` on `date`.
    pub fn new(
        username: Username,
        date: AttendanceDate,
        draft: IssueDraft<'_>,
    ) -> Result<Self, IssueValidationError> {
        Ok(Self {
            username,
            kind: draft.kind.parse()?,
            category: bounded_text(draft.category, "category", CATEGORY_MAX)?,
            subject: bounded_text(draft.subject, "subject", SUBJECT_MAX)?,
            message: bounded_text(draft.message, "message", MESSAGE_MAX)?,
            date,
        })
    }

    /// Submitting user.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Complaint or feedback.
    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    /// Trimmed category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Trimmed subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Trimmed message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Submission date.
    pub fn date(&self) -> AttendanceDate {
        self.date
    }
}
