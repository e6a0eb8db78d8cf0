//! Administrator dashboard handlers.
//!
//! ```text
//! GET    /api/admin/stats
//! GET    /api/admin/activity
//! GET    /api/admin/users
//! POST   /api/admin/users {"username":"bob","password":"pw","name":"Bob"}
//! DELETE /api/admin/users/bob
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{AddUserRequest, DashboardStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::attendance::RecentActivityResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;

/// Dashboard counters.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Users with the student role.
    pub total_students: u64,
    /// Attendance records dated today.
    pub meals_today: u64,
    /// Attendance records dated this month.
    pub meals_month: u64,
    /// Issues filed as complaints.
    pub complaints: u64,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_students: stats.total_students,
            meals_today: stats.meals_today,
            meals_month: stats.meals_month,
            complaints: stats.complaints,
        }
    }
}

/// Headline numbers for the dashboard.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardResponse),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "dashboardStats"
)]
#[get("/admin/stats")]
pub async fn dashboard_stats(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let stats = state.admin_query.dashboard_stats().await?;
    Ok(web::Json(DashboardResponse::from(stats)))
}

/// Default-sized activity feed for the dashboard.
#[utoipa::path(
    get,
    path = "/api/admin/activity",
    responses(
        (status = 200, description = "Activity feed", body = [RecentActivityResponse]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminActivity"
)]
#[get("/admin/activity")]
pub async fn admin_activity(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<RecentActivityResponse>>> {
    let activity = state.attendance_query.recent_activity(None).await?;
    Ok(web::Json(
        activity.into_iter().map(RecentActivityResponse::from).collect(),
    ))
}

/// Every student, ordered by username.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Students", body = [UserResponse]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listStudents"
)]
#[get("/admin/users")]
pub async fn list_students(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let students = state.admin_query.list_students().await?;
    Ok(web::Json(students.iter().map(UserResponse::from).collect()))
}

/// Body of `POST /api/admin/users`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddUserBody {
    /// Login name for the new user.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub name: Option<String>,
    /// `student` (default) or `admin`.
    pub role: Option<String>,
}

/// Create a user on their behalf.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = AddUserBody,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request or taken username", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "addUser"
)]
#[post("/admin/users")]
pub async fn add_user(
    state: web::Data<HttpState>,
    payload: web::Json<AddUserBody>,
) -> ApiResult<HttpResponse> {
    let AddUserBody {
        username,
        password,
        name,
        role,
    } = payload.into_inner();
    let user = state
        .admin
        .add_user(AddUserRequest {
            username,
            password: Zeroizing::new(password),
            name,
            role,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Delete a user together with their attendance and issues.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{username}",
    params(("username" = String, Path, description = "Login name")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid username", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{username}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.admin.delete_user(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
