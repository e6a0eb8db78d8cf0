//! Driving port for recording meal attendance.
//!
//! The request carries raw caller input; implementations validate it and
//! report malformed values as `invalid_request` errors.

use async_trait::async_trait;

use crate::domain::{AttendanceRecord, Error, MealUpdate};

/// Request to mark meals for one user on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAttendanceRequest {
    /// User the meals belong to.
    pub username: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Flags to apply and how.
    pub update: MealUpdate,
}

/// Domain use-case port for attendance writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    /// Validate the request and upsert the day's record.
    ///
    /// Unknown users yield `not_found` and nothing is written.
    async fn record_attendance(
        &self,
        request: RecordAttendanceRequest,
    ) -> Result<AttendanceRecord, Error>;
}
