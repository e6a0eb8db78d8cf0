//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Username, Role: identities that own attendance.
//! - AttendanceRecord, MealUpdate, AggregateResult, Bill: the attendance
//!   and billing model.
//! - AttendanceService, BillingService, AccountService, IssueService,
//!   DashboardService: driving port implementations.

pub mod account_service;
pub mod attendance;
pub mod attendance_service;
pub mod auth;
pub mod billing;
pub mod billing_service;
pub mod dashboard_service;
pub mod error;
pub mod issue;
pub mod issue_service;
pub mod ports;
mod service_support;
mod store_errors;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::attendance::{
    AggregateResult, AggregationRange, AttendanceDate, AttendanceRecord,
    AttendanceValidationError, DEFAULT_RECENT_LIMIT, DateBounds, MAX_RECENT_LIMIT,
    MAX_TRAILING_DAYS, MealFlags, MealKind, MealUpdate, RecentActivity, RecentLimit, WriteMode,
    YearMonth,
};
pub use self::attendance_service::AttendanceService;
pub use self::auth::{LoginCredentials, LoginOutcome, LoginValidationError};
pub use self::billing::{
    Bill, BillingError, DEFAULT_BREAKFAST_RATE, DEFAULT_DINNER_RATE, DEFAULT_LUNCH_RATE,
    MonthSheet, RateTable,
};
pub use self::billing_service::BillingService;
pub use self::dashboard_service::DashboardService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::issue::{IssueDraft, IssueKind, IssueValidationError, NewIssue};
pub use self::issue_service::IssueService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, Role, StoredCredential, USERNAME_MAX, User,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use messpro::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
