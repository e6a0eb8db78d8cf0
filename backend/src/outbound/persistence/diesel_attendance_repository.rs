//! PostgreSQL-backed `AttendanceRepository`.
//!
//! `upsert` is a single `INSERT ... ON CONFLICT (username, date) DO UPDATE`
//! statement, so concurrent writers for the same day are serialised by the
//! unique constraint and merge writes OR their flags into the stored row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttendanceRepository, AttendanceRepositoryError};
use crate::domain::{
    AttendanceDate, AttendanceRecord, DateBounds, MealFlags, MealUpdate, MonthSheet, Username,
    WriteMode, YearMonth,
};

use super::diesel_helpers::{StoreFailure, to_count, within};
use super::diesel_user_repository::row_to_credential;
use super::models::{AttendanceRow, NewAttendanceRow, UserRow};
use super::pool::DbPool;
use super::schema::{attendance, users};

/// Diesel-backed implementation of the attendance repository port.
#[derive(Clone)]
pub struct DieselAttendanceRepository {
    pool: DbPool,
}

impl DieselAttendanceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(username: &Username) -> impl FnOnce(StoreFailure) -> AttendanceRepositoryError {
    move |failure| match failure {
        StoreFailure::Connection(message) => AttendanceRepositoryError::connection(message),
        StoreFailure::Timeout(message) => AttendanceRepositoryError::timeout(message),
        StoreFailure::ForeignKey(_) => AttendanceRepositoryError::unknown_user(username.as_ref()),
        StoreFailure::Query(message) => AttendanceRepositoryError::query(message),
    }
}

fn map_read_failure(failure: StoreFailure) -> AttendanceRepositoryError {
    match failure {
        StoreFailure::Connection(message) => AttendanceRepositoryError::connection(message),
        StoreFailure::Timeout(message) => AttendanceRepositoryError::timeout(message),
        StoreFailure::ForeignKey(message) | StoreFailure::Query(message) => {
            AttendanceRepositoryError::query(message)
        }
    }
}

fn row_to_record(row: AttendanceRow) -> Result<AttendanceRecord, StoreFailure> {
    let username =
        Username::new(&row.username).map_err(|err| StoreFailure::Query(err.to_string()))?;
    let date = AttendanceDate::parse(&row.date)
        .map_err(|err| StoreFailure::Query(format!("stored date {}: {err}", row.date)))?;
    Ok(AttendanceRecord::new(
        row.id,
        username,
        date,
        MealFlags {
            breakfast: row.breakfast,
            lunch: row.lunch,
            dinner: row.dinner,
        },
    ))
}

fn rows_to_records(rows: Vec<AttendanceRow>) -> Result<Vec<AttendanceRecord>, StoreFailure> {
    rows.into_iter().map(row_to_record).collect()
}

/// Fold `users LEFT JOIN attendance` rows into a sheet; no rows means no user.
fn rows_to_sheet(
    rows: Vec<(UserRow, Option<AttendanceRow>)>,
) -> Result<Option<MonthSheet>, StoreFailure> {
    let mut user = None;
    let mut records = Vec::new();
    for (user_row, attendance_row) in rows {
        if user.is_none() {
            let credential =
                row_to_credential(user_row).map_err(|err| StoreFailure::Query(err.to_string()))?;
            user = Some(credential.user);
        }
        if let Some(row) = attendance_row {
            records.push(row_to_record(row)?);
        }
    }
    Ok(user.map(|user| MonthSheet { user, records }))
}

#[async_trait]
impl AttendanceRepository for DieselAttendanceRepository {
    async fn upsert(
        &self,
        username: &Username,
        date: AttendanceDate,
        update: MealUpdate,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError> {
        let date_text = date.to_string();
        let initial = update.initial();
        let new_row = NewAttendanceRow {
            username: username.as_ref(),
            date: &date_text,
            breakfast: initial.breakfast,
            lunch: initial.lunch,
            dinner: initial.dinner,
        };

        within(self.pool.operation_timeout(), "attendance upsert", async {
            let mut conn = self.pool.get().await?;
            let insert = diesel::insert_into(attendance::table)
                .values(&new_row)
                .on_conflict((attendance::username, attendance::date))
                .do_update();
            let row = match update.mode {
                WriteMode::Merge => {
                    insert
                        .set((
                            attendance::breakfast
                                .eq(attendance::breakfast.or(excluded(attendance::breakfast))),
                            attendance::lunch.eq(attendance::lunch.or(excluded(attendance::lunch))),
                            attendance::dinner
                                .eq(attendance::dinner.or(excluded(attendance::dinner))),
                            attendance::updated_at.eq(diesel::dsl::now),
                        ))
                        .returning(AttendanceRow::as_returning())
                        .get_result(&mut conn)
                        .await?
                }
                WriteMode::Overwrite => {
                    insert
                        .set((
                            attendance::breakfast.eq(excluded(attendance::breakfast)),
                            attendance::lunch.eq(excluded(attendance::lunch)),
                            attendance::dinner.eq(excluded(attendance::dinner)),
                            attendance::updated_at.eq(diesel::dsl::now),
                        ))
                        .returning(AttendanceRow::as_returning())
                        .get_result(&mut conn)
                        .await?
                }
            };
            row_to_record(row)
        })
        .await
        .map_err(map_failure(username))
    }

    async fn query_range(
        &self,
        username: &Username,
        bounds: DateBounds,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        within(self.pool.operation_timeout(), "attendance range query", async {
            let mut conn = self.pool.get().await?;
            let mut query = attendance::table
                .filter(attendance::username.eq(username.as_ref()))
                .select(AttendanceRow::as_select())
                .order(attendance::date.desc())
                .into_boxed();
            // ISO dates compare correctly as text.
            if let Some(start) = bounds.start() {
                query = query.filter(attendance::date.ge(start.to_string()));
            }
            if let Some(end) = bounds.end() {
                query = query.filter(attendance::date.le(end.to_string()));
            }
            let rows = query.load(&mut conn).await?;
            rows_to_records(rows)
        })
        .await
        .map_err(map_read_failure)
    }

    async fn query_month(
        &self,
        username: &Username,
        month: YearMonth,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        let pattern = format!("{}%", month.date_prefix());
        within(self.pool.operation_timeout(), "attendance month query", async {
            let mut conn = self.pool.get().await?;
            let rows = attendance::table
                .filter(attendance::username.eq(username.as_ref()))
                .filter(attendance::date.like(pattern.as_str()))
                .select(AttendanceRow::as_select())
                .order(attendance::date.desc())
                .load(&mut conn)
                .await?;
            rows_to_records(rows)
        })
        .await
        .map_err(map_read_failure)
    }

    async fn month_sheet(
        &self,
        username: &Username,
        month: YearMonth,
    ) -> Result<Option<MonthSheet>, AttendanceRepositoryError> {
        let pattern = format!("{}%", month.date_prefix());
        within(self.pool.operation_timeout(), "attendance month sheet", async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<(UserRow, Option<AttendanceRow>)> = users::table
                .left_join(
                    attendance::table.on(attendance::username
                        .eq(users::username)
                        .and(attendance::date.like(pattern.as_str()))),
                )
                .filter(users::username.eq(username.as_ref()))
                .select((UserRow::as_select(), Option::<AttendanceRow>::as_select()))
                .order(attendance::date.nullable().desc())
                .load(&mut conn)
                .await?;
            rows_to_sheet(rows)
        })
        .await
        .map_err(map_read_failure)
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        within(self.pool.operation_timeout(), "recent attendance", async {
            let mut conn = self.pool.get().await?;
            let rows = attendance::table
                .select(AttendanceRow::as_select())
                .order(attendance::id.desc())
                .limit(limit)
                .load(&mut conn)
                .await?;
            rows_to_records(rows)
        })
        .await
        .map_err(map_read_failure)
    }

    async fn count_on(&self, date: AttendanceDate) -> Result<u64, AttendanceRepositoryError> {
        let date_text = date.to_string();
        within(self.pool.operation_timeout(), "attendance day count", async {
            let mut conn = self.pool.get().await?;
            let count: i64 = attendance::table
                .filter(attendance::date.eq(date_text.as_str()))
                .count()
                .get_result(&mut conn)
                .await?;
            Ok(to_count(count))
        })
        .await
        .map_err(map_read_failure)
    }

    async fn count_in_month(&self, month: YearMonth) -> Result<u64, AttendanceRepositoryError> {
        let pattern = format!("{}%", month.date_prefix());
        within(self.pool.operation_timeout(), "attendance month count", async {
            let mut conn = self.pool.get().await?;
            let count: i64 = attendance::table
                .filter(attendance::date.like(pattern.as_str()))
                .count()
                .get_result(&mut conn)
                .await?;
            Ok(to_count(count))
        })
        .await
        .map_err(map_read_failure)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion and error mapping.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(date: &str) -> AttendanceRow {
        AttendanceRow {
            id: 7,
            username: "alice".to_owned(),
            date: date.to_owned(),
            breakfast: true,
            lunch: false,
            dinner: true,
        }
    }

    #[rstest]
    fn rows_become_records() {
        let record = row_to_record(row("2025-12-01")).expect("valid row");

        assert_eq!(record.sequence(), 7);
        assert_eq!(record.last_action(), "B D");
    }

    fn user_row() -> UserRow {
        UserRow {
            username: "alice".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role: "student".to_owned(),
            full_name: None,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn joined_rows_fold_into_one_sheet() {
        let sheet = rows_to_sheet(vec![
            (user_row(), Some(row("2025-12-02"))),
            (user_row(), Some(row("2025-12-01"))),
        ])
        .expect("valid rows")
        .expect("user present");

        assert_eq!(sheet.user.username().as_ref(), "alice");
        assert_eq!(sheet.records.len(), 2);
    }

    #[rstest]
    fn a_user_without_records_gets_an_empty_sheet() {
        let sheet = rows_to_sheet(vec![(user_row(), None)])
            .expect("valid rows")
            .expect("user present");
        assert!(sheet.records.is_empty());
    }

    #[rstest]
    fn no_rows_means_no_user() {
        assert!(rows_to_sheet(Vec::new()).expect("valid rows").is_none());
    }

    #[rstest]
    fn malformed_stored_dates_are_query_failures() {
        let failure = row_to_record(row("2025-13-01")).expect_err("bad date");
        assert!(matches!(failure, StoreFailure::Query(_)));
    }

    #[rstest]
    fn foreign_key_failures_name_the_user() {
        let username = Username::new("ghost").expect("valid username");
        let err = map_failure(&username)(StoreFailure::ForeignKey("fk".to_owned()));

        assert_eq!(err, AttendanceRepositoryError::unknown_user("ghost"));
    }

    #[rstest]
    fn timeouts_keep_their_variant() {
        let err = map_read_failure(StoreFailure::Timeout("slow".to_owned()));
        assert!(matches!(err, AttendanceRepositoryError::Timeout { .. }));
    }
}
