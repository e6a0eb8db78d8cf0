//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`, [`LoginService`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin;
mod attendance_command;
mod attendance_query;
mod attendance_repository;
mod billing_query;
mod issue_command;
mod issue_repository;
mod login_service;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use admin::{MockAdminCommand, MockAdminQuery};
pub use admin::{AddUserRequest, AdminCommand, AdminQuery, DashboardStats};
#[cfg(test)]
pub use attendance_command::MockAttendanceCommand;
pub use attendance_command::{AttendanceCommand, RecordAttendanceRequest};
#[cfg(test)]
pub use attendance_query::MockAttendanceQuery;
pub use attendance_query::{AttendanceHistoryRequest, AttendanceQuery, AttendanceStatsRequest};
#[cfg(test)]
pub use attendance_repository::MockAttendanceRepository;
pub use attendance_repository::{AttendanceRepository, AttendanceRepositoryError};
#[cfg(test)]
pub use billing_query::MockBillingQuery;
pub use billing_query::{BillingQuery, GenerateBillRequest};
#[cfg(test)]
pub use issue_command::MockIssueCommand;
pub use issue_command::{IssueCommand, SubmitIssueRequest};
#[cfg(test)]
pub use issue_repository::MockIssueRepository;
pub use issue_repository::{IssueRepository, IssueRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
