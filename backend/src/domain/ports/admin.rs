//! Driving ports for the administrator dashboard.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, User};

/// Headline numbers shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Users with the student role.
    pub total_students: u64,
    /// Attendance records dated today.
    pub meals_today: u64,
    /// Attendance records dated in the current month.
    pub meals_month: u64,
    /// Issues filed as complaints.
    pub complaints: u64,
}

/// Request to create a user on someone's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddUserRequest {
    /// Login name for the new user.
    pub username: String,
    /// Initial password, hashed before storage.
    pub password: Zeroizing<String>,
    /// Display name.
    pub name: Option<String>,
    /// `student` (default) or `admin`.
    pub role: Option<String>,
}

/// Read side of the admin dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminQuery: Send + Sync {
    /// Dashboard counters as of now.
    async fn dashboard_stats(&self) -> Result<DashboardStats, Error>;

    /// Every student, ordered by username.
    async fn list_students(&self) -> Result<Vec<User>, Error>;
}

/// Write side of the admin dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Create a user. Taken usernames yield `invalid_request`.
    async fn add_user(&self, request: AddUserRequest) -> Result<User, Error>;

    /// Delete a user with their attendance and issues. Unknown users yield
    /// `not_found`.
    async fn delete_user(&self, username: String) -> Result<(), Error>;
}
