//! Attendance domain services.
//!
//! [`AttendanceService`] implements the recording and aggregation driving
//! ports. Recording validates input and requires an existing user before it
//! touches the store; aggregation never distinguishes an unknown user from a
//! user without records.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AttendanceCommand, AttendanceHistoryRequest, AttendanceQuery, AttendanceRepository,
    AttendanceStatsRequest, RecordAttendanceRequest, UserRepository,
};
use crate::domain::service_support::{
    attendance_error, parse_date, parse_optional_date, parse_username, today,
};
use crate::domain::store_errors::{map_attendance_error, map_user_error, user_not_found};
use crate::domain::{
    AggregateResult, AggregationRange, AttendanceDate, AttendanceRecord, DEFAULT_RECENT_LIMIT,
    DateBounds, Error, RecentActivity, RecentLimit, Username,
};

/// Count meals for `username` over `range`, relative to `today`.
async fn aggregate<A>(
    attendance_repo: &A,
    username: &Username,
    range: AggregationRange,
    today: AttendanceDate,
) -> Result<AggregateResult, Error>
where
    A: AttendanceRepository + ?Sized,
{
    let records = match range {
        AggregationRange::Month(month) => attendance_repo.query_month(username, month).await,
        windowed => {
            let bounds = windowed.bounds(today).unwrap_or_default();
            attendance_repo.query_range(username, bounds).await
        }
    }
    .map_err(map_attendance_error)?;

    Ok(AggregateResult::from_flags(
        records.iter().map(AttendanceRecord::meals),
    ))
}

/// Attendance service implementing the recording and aggregation ports.
#[derive(Clone)]
pub struct AttendanceService<A, U> {
    attendance_repo: Arc<A>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, U> AttendanceService<A, U> {
    /// Create a new service over the attendance and user repositories.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use messpro::domain::AttendanceService;
    /// use messpro::outbound::memory::InMemoryMessStore;
    ///
    /// let store = Arc::new(InMemoryMessStore::default());
    /// let _service = AttendanceService::new(store.clone(), store, Arc::new(DefaultClock));
    /// ```
    pub fn new(attendance_repo: Arc<A>, user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            attendance_repo,
            user_repo,
            clock,
        }
    }
}

#[async_trait]
impl<A, U> AttendanceCommand for AttendanceService<A, U>
where
    A: AttendanceRepository,
    U: UserRepository,
{
    async fn record_attendance(
        &self,
        request: RecordAttendanceRequest,
    ) -> Result<AttendanceRecord, Error> {
        let username = parse_username(&request.username)?;
        let date = parse_date("date", &request.date)?;

        if self
            .user_repo
            .find(&username)
            .await
            .map_err(map_user_error)?
            .is_none()
        {
            return Err(user_not_found(username.as_ref()));
        }

        let record = self
            .attendance_repo
            .upsert(&username, date, request.update)
            .await
            .map_err(map_attendance_error)?;

        info!(
            username = %record.username(),
            date = %record.date(),
            mode = request.update.mode.as_str(),
            meals = %record.last_action(),
            "attendance recorded"
        );
        Ok(record)
    }
}

#[async_trait]
impl<A, U> AttendanceQuery for AttendanceService<A, U>
where
    A: AttendanceRepository,
    U: UserRepository,
{
    async fn attendance_stats(
        &self,
        request: AttendanceStatsRequest,
    ) -> Result<AggregateResult, Error> {
        let username = parse_username(&request.username)?;
        let today = today(self.clock.as_ref());
        let raw_range = request.range.as_deref().unwrap_or("all");
        let range = AggregationRange::parse(raw_range, today)
            .map_err(|err| attendance_error("range", raw_range, err))?;

        aggregate(self.attendance_repo.as_ref(), &username, range, today).await
    }

    async fn attendance_history(
        &self,
        request: AttendanceHistoryRequest,
    ) -> Result<Vec<AttendanceRecord>, Error> {
        let username = parse_username(&request.username)?;
        let start = parse_optional_date("from", request.from.as_deref())?;
        let end = parse_optional_date("to", request.to.as_deref())?;
        let bounds = DateBounds::new(start, end).map_err(|err| {
            let raw = request.from.as_deref().unwrap_or_default();
            attendance_error("from", raw, err)
        })?;

        self.attendance_repo
            .query_range(&username, bounds)
            .await
            .map_err(map_attendance_error)
    }

    async fn recent_activity(&self, limit: Option<u32>) -> Result<Vec<RecentActivity>, Error> {
        let requested = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        let limit = RecentLimit::new(requested)
            .map_err(|err| attendance_error("limit", &requested.to_string(), err))?;

        let records = self
            .attendance_repo
            .list_recent(limit.get())
            .await
            .map_err(map_attendance_error)?;
        Ok(records.iter().map(RecentActivity::from).collect())
    }
}

#[cfg(test)]
#[path = "attendance_service_tests.rs"]
mod tests;
