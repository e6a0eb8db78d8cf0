//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::{User, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or malformed.
    #[error("{0}")]
    InvalidUsername(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` satisfies the [`Username`] rules.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons. It is zeroed on drop.
///
/// # Examples
/// ```
/// use messpro::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "hunter2").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username suitable for user lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Result of a successful `find_or_create_user` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The user existed and the password matched.
    Authenticated(User),
    /// No user existed; a new student account was created.
    Registered(User),
}

impl LoginOutcome {
    /// The user that is now logged in.
    pub fn user(&self) -> &User {
        match self {
            Self::Authenticated(user) | Self::Registered(user) => user,
        }
    }

    /// Whether the call created the account.
    pub fn is_registration(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}
