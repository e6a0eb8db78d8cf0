//! Admin dashboard read projections.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    AdminQuery, AttendanceRepository, DashboardStats, IssueRepository, UserRepository,
};
use crate::domain::service_support::today;
use crate::domain::store_errors::{map_attendance_error, map_issue_error, map_user_error};
use crate::domain::{Error, IssueKind, Role, User};

/// Service implementing [`AdminQuery`].
#[derive(Clone)]
pub struct DashboardService<U, A, I> {
    user_repo: Arc<U>,
    attendance_repo: Arc<A>,
    issue_repo: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<U, A, I> DashboardService<U, A, I> {
    /// Create a dashboard service over the user, attendance and issue stores.
    pub fn new(
        user_repo: Arc<U>,
        attendance_repo: Arc<A>,
        issue_repo: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            attendance_repo,
            issue_repo,
            clock,
        }
    }
}

#[async_trait]
impl<U, A, I> AdminQuery for DashboardService<U, A, I>
where
    U: UserRepository,
    A: AttendanceRepository,
    I: IssueRepository,
{
    async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        let today = today(self.clock.as_ref());
        let total_students = self
            .user_repo
            .count_by_role(Role::Student)
            .await
            .map_err(map_user_error)?;
        let meals_today = self
            .attendance_repo
            .count_on(today)
            .await
            .map_err(map_attendance_error)?;
        let meals_month = self
            .attendance_repo
            .count_in_month(today.year_month())
            .await
            .map_err(map_attendance_error)?;
        let complaints = self
            .issue_repo
            .count_by_kind(IssueKind::Complaint)
            .await
            .map_err(map_issue_error)?;

        Ok(DashboardStats {
            total_students,
            meals_today,
            meals_month,
            complaints,
        })
    }

    async fn list_students(&self) -> Result<Vec<User>, Error> {
        self.user_repo
            .list_by_role(Role::Student)
            .await
            .map_err(map_user_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        AttendanceRepositoryError, MockAttendanceRepository, MockIssueRepository,
        MockUserRepository,
    };
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    struct FixtureClock;

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 12, 10, 8, 0, 0)
                .single()
                .expect("valid fixture timestamp")
        }
    }

    fn make_service(
        users: MockUserRepository,
        attendance: MockAttendanceRepository,
        issues: MockIssueRepository,
    ) -> DashboardService<MockUserRepository, MockAttendanceRepository, MockIssueRepository> {
        DashboardService::new(
            Arc::new(users),
            Arc::new(attendance),
            Arc::new(issues),
            Arc::new(FixtureClock),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn stats_count_today_and_current_month() {
        let mut users = MockUserRepository::new();
        users
            .expect_count_by_role()
            .withf(|role| *role == Role::Student)
            .return_once(|_| Ok(12));
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_count_on()
            .withf(|date| date.to_string() == "2025-12-10")
            .return_once(|_| Ok(4));
        attendance
            .expect_count_in_month()
            .withf(|month| month.to_string() == "2025-12")
            .return_once(|_| Ok(40));
        let mut issues = MockIssueRepository::new();
        issues
            .expect_count_by_kind()
            .withf(|kind| *kind == IssueKind::Complaint)
            .return_once(|_| Ok(2));

        let stats = make_service(users, attendance, issues)
            .dashboard_stats()
            .await
            .expect("stats");

        assert_eq!(
            stats,
            DashboardStats {
                total_students: 12,
                meals_today: 4,
                meals_month: 40,
                complaints: 2,
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn stats_surface_store_failures() {
        let mut users = MockUserRepository::new();
        users.expect_count_by_role().return_once(|_| Ok(1));
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_count_on()
            .return_once(|_| Err(AttendanceRepositoryError::timeout("5000ms")));

        let err = make_service(users, attendance, MockIssueRepository::new())
            .dashboard_stats()
            .await
            .expect_err("store failure");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
