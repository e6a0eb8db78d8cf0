//! User data model.
//!
//! Users are keyed by their login name. The name is the identity key for
//! attendance, issues and bills, so it is validated once here and carried
//! around as a [`Username`] afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username exceeded `max` characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// The username held characters outside the allowed set.
    #[error("username may only contain letters, numbers, '.', '_', '-' or '@'")]
    UsernameInvalidCharacters,
    /// The display name was blank.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// The display name exceeded `max` characters.
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    /// The role was neither `student` nor `admin`.
    #[error("role must be student or admin")]
    UnknownRole,
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Globally unique, immutable login name.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed; the result is non-empty.
/// - At most [`USERNAME_MAX`] characters from `[A-Za-z0-9._@-]`.
///
/// # Examples
/// ```
/// use messpro::domain::Username;
///
/// let username = Username::new("  alice ").unwrap();
/// assert_eq!(username.as_ref(), "alice");
/// assert!(Username::new("al ice").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@');
        if !trimmed.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name shown on bills and admin listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access level of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Records attendance and receives bills.
    #[default]
    Student,
    /// Manages users and reads the dashboard.
    Admin,
}

impl Role {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Application user.
///
/// ## Invariants
/// - `username` is immutable once the user exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    username: Username,
    display_name: Option<DisplayName>,
    role: Role,
}

impl User {
    /// Build a new [`User`].
    pub fn new(username: Username, display_name: Option<DisplayName>, role: Role) -> Self {
        Self {
            username,
            display_name,
            role,
        }
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name on file, if any.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Name to print on bills: the display name, or the username when none
    /// is on file.
    pub fn name_or_username(&self) -> &str {
        self.display_name
            .as_ref()
            .map_or(self.username.as_ref(), AsRef::as_ref)
    }

    /// Access level.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// User record together with its stored credential hash.
///
/// Only the authentication collaborator handles this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// The user the credential belongs to.
    pub user: User,
    /// Argon2id PHC string.
    pub password_hash: String,
}
