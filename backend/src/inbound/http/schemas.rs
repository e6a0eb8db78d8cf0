//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their wire shape for utoipa's external schema
//! registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The user or record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The store failed; the message is redacted.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "user ghost not found")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "6f1c1d4e-8a0b-4b6e-9d2f-3c5a7e9b1d20")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "date", "code": "invalid_date"}`.
    details: Option<serde_json::Value>,
}
