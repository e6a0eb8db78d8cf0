//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod attendance;
pub mod billing;
pub mod error;
pub mod health;
pub mod issues;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

/// Every REST endpoint under `/api`, with extractor errors mapped onto the
/// domain error envelope.
///
/// Handlers read [`state::HttpState`] from application data; the caller
/// registers it.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(users::login)
        .service(attendance::record_attendance)
        .service(attendance::attendance_stats)
        .service(attendance::attendance_history)
        .service(attendance::recent_activity)
        .service(billing::generate_bill)
        .service(issues::submit_issue)
        .service(admin::dashboard_stats)
        .service(admin::admin_activity)
        .service(admin::list_students)
        .service(admin::add_user)
        .service(admin::delete_user)
}
