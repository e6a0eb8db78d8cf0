//! Driving port for attendance reads.

use async_trait::async_trait;

use crate::domain::{AggregateResult, AttendanceRecord, Error, RecentActivity};

/// Request for per-user meal counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceStatsRequest {
    /// User to count meals for.
    pub username: String,
    /// Range selector (`all`, `week`, `month`, `last-N-days`, `YYYY-MM`);
    /// `None` means all-time.
    pub range: Option<String>,
}

/// Request for a user's attendance history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceHistoryRequest {
    /// User whose records to list.
    pub username: String,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub to: Option<String>,
}

/// Domain use-case port for attendance aggregation and activity views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceQuery: Send + Sync {
    /// Count meals for a user over a range. Unknown users count as zero.
    async fn attendance_stats(
        &self,
        request: AttendanceStatsRequest,
    ) -> Result<AggregateResult, Error>;

    /// Records for a user, newest date first.
    async fn attendance_history(
        &self,
        request: AttendanceHistoryRequest,
    ) -> Result<Vec<AttendanceRecord>, Error>;

    /// Most recently inserted records across all users.
    async fn recent_activity(&self, limit: Option<u32>) -> Result<Vec<RecentActivity>, Error>;
}
