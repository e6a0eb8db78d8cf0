//! Attendance handlers.
//!
//! ```text
//! POST /api/attendance {"username":"alice","date":"2025-12-01","breakfast":1}
//! GET  /api/attendance-stats?username=alice&range=week
//! GET  /api/attendance-history/alice?from=2025-12-01&to=2025-12-31
//! GET  /api/recent-activity?limit=5
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    AttendanceHistoryRequest, AttendanceStatsRequest, RecordAttendanceRequest,
};
use crate::domain::{
    AggregateResult, AttendanceRecord, Error, MealUpdate, RecentActivity, WriteMode,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, FlagInput, parse_optional_flag};

/// Body of `POST /api/attendance`.
///
/// Omitted flags are left alone when merging and cleared when overwriting.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    /// User the meals belong to.
    pub username: String,
    /// Calendar date, `YYYY-MM-DD`.
    #[schema(example = "2025-12-01")]
    pub date: String,
    /// `true`/`false` or `1`/`0`.
    pub breakfast: Option<FlagInput>,
    /// `true`/`false` or `1`/`0`.
    pub lunch: Option<FlagInput>,
    /// `true`/`false` or `1`/`0`.
    pub dinner: Option<FlagInput>,
    /// `merge` (default) or `overwrite`.
    #[schema(value_type = Option<String>, example = "merge")]
    pub mode: Option<WriteMode>,
}

impl AttendanceRequest {
    fn into_command(self) -> Result<RecordAttendanceRequest, Error> {
        let update = MealUpdate {
            breakfast: parse_optional_flag(self.breakfast, FieldName::new("breakfast"))?,
            lunch: parse_optional_flag(self.lunch, FieldName::new("lunch"))?,
            dinner: parse_optional_flag(self.dinner, FieldName::new("dinner"))?,
            mode: self.mode.unwrap_or_default(),
        };
        Ok(RecordAttendanceRequest {
            username: self.username,
            date: self.date,
            update,
        })
    }
}

/// Stored attendance for one user and day.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordResponse {
    /// Owner of the record.
    pub username: String,
    /// Day the record covers.
    #[schema(example = "2025-12-01")]
    pub date: String,
    /// Breakfast taken.
    pub breakfast: bool,
    /// Lunch taken.
    pub lunch: bool,
    /// Dinner taken.
    pub dinner: bool,
}

impl From<&AttendanceRecord> for AttendanceRecordResponse {
    fn from(record: &AttendanceRecord) -> Self {
        let meals = record.meals();
        Self {
            username: record.username().to_string(),
            date: record.date().to_string(),
            breakfast: meals.breakfast,
            lunch: meals.lunch,
            dinner: meals.dinner,
        }
    }
}

/// Record meals for a day, merging with what is already stored.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Stored record", body = AttendanceRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "recordAttendance"
)]
#[post("/attendance")]
pub async fn record_attendance(
    state: web::Data<HttpState>,
    payload: web::Json<AttendanceRequest>,
) -> ApiResult<web::Json<AttendanceRecordResponse>> {
    let command = payload.into_inner().into_command()?;
    let record = state.attendance.record_attendance(command).await?;
    Ok(web::Json(AttendanceRecordResponse::from(&record)))
}

/// Query of `GET /api/attendance-stats`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// User to count meals for.
    pub username: String,
    /// `all`, `week`, `month`, `last-N-days` or `YYYY-MM`.
    pub range: Option<String>,
}

/// Meal counts over a range.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Breakfasts taken.
    pub breakfasts: u64,
    /// Lunches taken.
    pub lunches: u64,
    /// Dinners taken.
    pub dinners: u64,
    /// Sum of the three counts.
    pub total: u64,
    /// Days with a record in the range.
    pub days: u64,
}

impl From<AggregateResult> for StatsResponse {
    fn from(result: AggregateResult) -> Self {
        Self {
            breakfasts: result.breakfasts,
            lunches: result.lunches,
            dinners: result.dinners,
            total: result.total_meals(),
            days: result.days,
        }
    }
}

/// Count a user's meals over a range.
#[utoipa::path(
    get,
    path = "/api/attendance-stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Meal counts", body = StatsResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "attendanceStats"
)]
#[get("/attendance-stats")]
pub async fn attendance_stats(
    state: web::Data<HttpState>,
    query: web::Query<StatsQuery>,
) -> ApiResult<web::Json<StatsResponse>> {
    let StatsQuery { username, range } = query.into_inner();
    let result = state
        .attendance_query
        .attendance_stats(AttendanceStatsRequest { username, range })
        .await?;
    Ok(web::Json(StatsResponse::from(result)))
}

/// Query of `GET /api/attendance-history/{username}`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Inclusive start, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive end, `YYYY-MM-DD`.
    pub to: Option<String>,
}

/// A user's records, newest first.
#[utoipa::path(
    get,
    path = "/api/attendance-history/{username}",
    params(("username" = String, Path, description = "Login name"), HistoryQuery),
    responses(
        (status = 200, description = "Records", body = [AttendanceRecordResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "attendanceHistory"
)]
#[get("/attendance-history/{username}")]
pub async fn attendance_history(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> ApiResult<web::Json<Vec<AttendanceRecordResponse>>> {
    let HistoryQuery { from, to } = query.into_inner();
    let records = state
        .attendance_query
        .attendance_history(AttendanceHistoryRequest {
            username: path.into_inner(),
            from,
            to,
        })
        .await?;
    Ok(web::Json(
        records.iter().map(AttendanceRecordResponse::from).collect(),
    ))
}

/// Query of `GET /api/recent-activity`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// `1..=100`, default 5.
    pub limit: Option<u32>,
}

/// Entry of the activity feed.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityResponse {
    /// Owner of the record.
    pub username: String,
    /// Day the record covers.
    pub date: String,
    /// Space-joined subset of `B`, `L`, `D`.
    #[schema(example = "B L")]
    pub last_action: String,
}

impl From<RecentActivity> for RecentActivityResponse {
    fn from(activity: RecentActivity) -> Self {
        Self {
            username: activity.username.into(),
            date: activity.date.to_string(),
            last_action: activity.last_action,
        }
    }
}

/// Most recently created records across all users.
#[utoipa::path(
    get,
    path = "/api/recent-activity",
    params(RecentQuery),
    responses(
        (status = 200, description = "Activity feed", body = [RecentActivityResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "recentActivity"
)]
#[get("/recent-activity")]
pub async fn recent_activity(
    state: web::Data<HttpState>,
    query: web::Query<RecentQuery>,
) -> ApiResult<web::Json<Vec<RecentActivityResponse>>> {
    let activity = state
        .attendance_query
        .recent_activity(query.into_inner().limit)
        .await?;
    Ok(web::Json(
        activity.into_iter().map(RecentActivityResponse::from).collect(),
    ))
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;
