//! Port for attendance persistence.
//!
//! Adapters own the one-record-per-`(username, date)` invariant: `upsert`
//! must fold the update into the stored flags atomically so two concurrent
//! writers for the same day never lose each other's flags.

use async_trait::async_trait;

use crate::domain::{
    AttendanceDate, AttendanceRecord, DateBounds, MealUpdate, MonthSheet, Username, YearMonth,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance repository adapters.
    pub enum AttendanceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attendance repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "attendance repository query failed: {message}",
        /// The store did not answer within the configured budget.
        Timeout { message: String } =>
            "attendance repository timed out: {message}",
        /// The username does not reference an existing user.
        UnknownUser { username: String } =>
            "user {username} does not exist",
    }
}

/// Port for reading and writing attendance records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Merge `update` into the record for `(username, date)`, creating it when
    /// absent, and return the stored result.
    async fn upsert(
        &self,
        username: &Username,
        date: AttendanceDate,
        update: MealUpdate,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError>;

    /// Records of `username` inside `bounds`, newest date first.
    async fn query_range(
        &self,
        username: &Username,
        bounds: DateBounds,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError>;

    /// Records of `username` whose date starts with the month prefix, newest
    /// date first.
    async fn query_month(
        &self,
        username: &Username,
        month: YearMonth,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError>;

    /// `username` together with their records for `month`, read in one
    /// statement. `None` when the user does not exist.
    async fn month_sheet(
        &self,
        username: &Username,
        month: YearMonth,
    ) -> Result<Option<MonthSheet>, AttendanceRepositoryError>;

    /// The `limit` most recently inserted records across all users.
    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError>;

    /// Number of records on `date`.
    async fn count_on(&self, date: AttendanceDate) -> Result<u64, AttendanceRepositoryError>;

    /// Number of records whose date starts with the month prefix.
    async fn count_in_month(&self, month: YearMonth) -> Result<u64, AttendanceRepositoryError>;
}
