//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound layer together
//! with the domain error wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]).
//! The document backs Swagger UI in debug builds and is exported via
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Messpro API",
        description = "Meal attendance tracking and monthly billing for a hostel mess."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::attendance::record_attendance,
        crate::inbound::http::attendance::attendance_stats,
        crate::inbound::http::attendance::attendance_history,
        crate::inbound::http::attendance::recent_activity,
        crate::inbound::http::billing::generate_bill,
        crate::inbound::http::issues::submit_issue,
        crate::inbound::http::admin::dashboard_stats,
        crate::inbound::http::admin::admin_activity,
        crate::inbound::http::admin::list_students,
        crate::inbound::http::admin::add_user,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "users", description = "Login and registration"),
        (name = "attendance", description = "Meal attendance records and counts"),
        (name = "billing", description = "Monthly bills"),
        (name = "issues", description = "Complaints and feedback"),
        (name = "admin", description = "Administrator dashboard"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[rstest]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        match error_schema {
            RefOr::T(Schema::Object(obj)) => {
                for field in ["code", "message", "traceId", "details"] {
                    assert!(obj.properties.contains_key(field), "missing {field}");
                }
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/login")]
    #[case("/api/attendance")]
    #[case("/api/attendance-stats")]
    #[case("/api/attendance-history/{username}")]
    #[case("/api/recent-activity")]
    #[case("/api/generate-bill/{username}")]
    #[case("/api/submit-issue")]
    #[case("/api/admin/stats")]
    #[case("/api/admin/users")]
    #[case("/api/admin/users/{username}")]
    #[case("/health/ready")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
