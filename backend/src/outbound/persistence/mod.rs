//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) never
//! leave this module. Every operation runs under the pool's operation budget
//! and reports overruns as timeouts.
//!
//! # Example
//!
//! ```ignore
//! use messpro::outbound::persistence::{DbPool, DieselAttendanceRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/mess")).await?;
//! let repo = DieselAttendanceRepository::new(pool);
//! ```

mod diesel_attendance_repository;
mod diesel_helpers;
mod diesel_issue_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_attendance_repository::DieselAttendanceRepository;
pub use diesel_issue_repository::DieselIssueRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_OPERATION_TIMEOUT, DbPool, PoolConfig, PoolError};
