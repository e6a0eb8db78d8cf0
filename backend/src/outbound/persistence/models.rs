//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! into validated domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{attendance, issues, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub full_name: Option<String>,
    #[expect(dead_code, reason = "audit column read with the row")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub full_name: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceRow {
    pub id: i64,
    pub username: String,
    pub date: String,
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendance)]
pub(crate) struct NewAttendanceRow<'a> {
    pub username: &'a str,
    pub date: &'a str,
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issues)]
pub(crate) struct NewIssueRow<'a> {
    pub username: &'a str,
    pub kind: &'a str,
    pub category: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
    pub date: &'a str,
}
