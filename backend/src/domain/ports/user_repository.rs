//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Role, StoredCredential, User, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The store did not answer within the configured budget.
        Timeout { message: String } => "user repository timed out: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by username.
    async fn find(&self, username: &Username) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user together with the stored password hash.
    async fn find_credential(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredential>, UserPersistenceError>;

    /// Insert a new user. Returns `false` when the username is already taken.
    async fn insert(&self, credential: &StoredCredential) -> Result<bool, UserPersistenceError>;

    /// Delete a user and everything they own. Returns `false` when absent.
    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    /// Users with `role`, ordered by username.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError>;

    /// Number of users with `role`.
    async fn count_by_role(&self, role: Role) -> Result<u64, UserPersistenceError>;
}
