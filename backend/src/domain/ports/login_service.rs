//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. Unknown usernames are registered as students on first
//! login, so the attendance core only ever sees users that exist.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, LoginOutcome};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify the credentials of an existing user, or register a new one.
    ///
    /// A wrong password yields `unauthorized`.
    async fn find_or_create_user(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LoginOutcome, Error>;
}
