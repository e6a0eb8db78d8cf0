//! Billing domain service.
//!
//! A bill is priced from one [`MonthSheet`] read, so the user lookup and the
//! month's records always come from the same store snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{AttendanceRepository, BillingQuery, GenerateBillRequest};
use crate::domain::service_support::{parse_month, parse_username, today};
use crate::domain::store_errors::{map_attendance_error, user_not_found};
use crate::domain::{AggregateResult, AttendanceRecord, Bill, Error, MonthSheet, RateTable};

/// Billing service implementing [`BillingQuery`].
#[derive(Clone)]
pub struct BillingService<A> {
    attendance_repo: Arc<A>,
    rates: RateTable,
    clock: Arc<dyn Clock>,
}

impl<A> BillingService<A> {
    /// Create a billing service applying `rates` unless a request overrides
    /// them.
    pub fn new(attendance_repo: Arc<A>, rates: RateTable, clock: Arc<dyn Clock>) -> Self {
        Self {
            attendance_repo,
            rates,
            clock,
        }
    }
}

#[async_trait]
impl<A> BillingQuery for BillingService<A>
where
    A: AttendanceRepository,
{
    async fn generate_bill(&self, request: GenerateBillRequest) -> Result<Bill, Error> {
        let username = parse_username(&request.username)?;
        let month = match request.month.as_deref() {
            Some(raw) => parse_month(raw)?,
            None => today(self.clock.as_ref()).year_month(),
        };

        let MonthSheet { user, records } = self
            .attendance_repo
            .month_sheet(&username, month)
            .await
            .map_err(map_attendance_error)?
            .ok_or_else(|| user_not_found(username.as_ref()))?;
        let counts = AggregateResult::from_flags(records.iter().map(AttendanceRecord::meals));

        let rates = request.rates.unwrap_or(self.rates);
        let bill = Bill::compute(&user, month, counts, rates).map_err(|err| {
            error!(error = %err, username = %username, month = %month, "bill computation failed");
            Error::internal(format!("bill computation failed: {err}"))
        })?;

        info!(
            username = %username,
            month = %month,
            total = bill.total(),
            "bill generated"
        );
        Ok(bill)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{AttendanceRepositoryError, MockAttendanceRepository};
    use crate::domain::{
        DisplayName, ErrorCode, MealFlags, MealKind, Role, User, Username, YearMonth,
    };
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    struct FixtureClock;

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
                .single()
                .expect("valid fixture timestamp")
        }
    }

    fn alice_named() -> User {
        User::new(
            Username::new("alice").expect("valid username"),
            Some(DisplayName::new("Alice Liddell").expect("valid name")),
            Role::Student,
        )
    }

    /// 10 breakfasts, 8 lunches and 5 dinners spread over December 2025.
    fn december_sheet() -> MonthSheet {
        let records = (1..=10_u32)
            .map(|day| {
                AttendanceRecord::new(
                    i64::from(day),
                    Username::new("alice").expect("valid username"),
                    format!("2025-12-{day:02}").parse().expect("valid date"),
                    MealFlags {
                        breakfast: true,
                        lunch: day <= 8,
                        dinner: day <= 5,
                    },
                )
            })
            .collect();
        MonthSheet {
            user: alice_named(),
            records,
        }
    }

    fn make_service(
        attendance: MockAttendanceRepository,
    ) -> BillingService<MockAttendanceRepository> {
        BillingService::new(
            Arc::new(attendance),
            RateTable::default(),
            Arc::new(FixtureClock),
        )
    }

    fn request(username: &str, month: Option<&str>) -> GenerateBillRequest {
        GenerateBillRequest {
            username: username.to_owned(),
            month: month.map(str::to_owned),
            rates: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn bills_the_requested_month() {
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_month_sheet()
            .withf(|username, month| username.as_ref() == "alice" && month.to_string() == "2025-12")
            .times(1)
            .return_once(|_, _| Ok(Some(december_sheet())));

        let bill = make_service(attendance)
            .generate_bill(request("alice", Some("2025-12")))
            .await
            .expect("bill");

        assert_eq!(bill.counts().breakfasts, 10);
        assert_eq!(bill.counts().lunches, 8);
        assert_eq!(bill.counts().dinners, 5);
        assert_eq!(bill.amount(MealKind::Lunch), 400);
        assert_eq!(bill.total(), 950);
        assert_eq!(bill.name(), "Alice Liddell");
    }

    #[rstest]
    #[tokio::test]
    async fn month_defaults_to_current_month() {
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_month_sheet()
            .withf(|_, month| *month == "2026-01".parse::<YearMonth>().expect("valid month"))
            .times(1)
            .return_once(|_, _| {
                Ok(Some(MonthSheet {
                    user: alice_named(),
                    records: Vec::new(),
                }))
            });

        let bill = make_service(attendance)
            .generate_bill(request("alice", None))
            .await
            .expect("zero bill");

        assert_eq!(bill.month().to_string(), "2026-01");
        assert_eq!(bill.total(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn request_rates_override_configured_rates() {
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_month_sheet()
            .return_once(|_, _| Ok(Some(december_sheet())));

        let bill = make_service(attendance)
            .generate_bill(GenerateBillRequest {
                rates: Some(RateTable::new(1, 2, 3).expect("valid rates")),
                ..request("alice", Some("2025-12"))
            })
            .await
            .expect("bill");

        assert_eq!(bill.total(), 10 + 16 + 15);
    }

    #[rstest]
    #[tokio::test]
    async fn a_missing_sheet_is_not_found() {
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_month_sheet()
            .times(1)
            .return_once(|_, _| Ok(None));

        let err = make_service(attendance)
            .generate_bill(request("ghost", Some("2025-12")))
            .await
            .expect_err("unknown user");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.details().expect("details")["value"], "ghost");
    }

    #[rstest]
    #[tokio::test]
    async fn store_failures_are_internal_errors() {
        let mut attendance = MockAttendanceRepository::new();
        attendance
            .expect_month_sheet()
            .return_once(|_, _| Err(AttendanceRepositoryError::timeout("5000ms")));

        let err = make_service(attendance)
            .generate_bill(request("alice", Some("2025-12")))
            .await
            .expect_err("timeout");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_month_is_rejected() {
        let mut attendance = MockAttendanceRepository::new();
        attendance.expect_month_sheet().times(0);

        let err = make_service(attendance)
            .generate_bill(request("alice", Some("December")))
            .await
            .expect_err("malformed month");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "month");
    }
}
