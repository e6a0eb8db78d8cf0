//! Account services: login with self-registration, and admin-managed users.
//!
//! Password hashing is CPU bound and runs on the blocking thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AddUserRequest, AdminCommand, LoginService, PasswordHashError, PasswordHasher,
    UserRepository,
};
use crate::domain::service_support::parse_username;
use crate::domain::store_errors::{map_hash_error, map_user_error, user_not_found};
use crate::domain::{
    DisplayName, Error, LoginCredentials, LoginOutcome, LoginValidationError, Role,
    StoredCredential, User, UserValidationError,
};

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match &err {
        LoginValidationError::InvalidUsername(UserValidationError::EmptyUsername) => {
            ("username", "empty_username")
        }
        LoginValidationError::InvalidUsername(_) => ("username", "invalid_username"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Service implementing [`LoginService`] and [`AdminCommand`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    user_repo: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    /// Create an account service storing users in `user_repo`.
    pub fn new(user_repo: Arc<U>, hasher: Arc<H>) -> Self {
        Self { user_repo, hasher }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn run_hasher<T, F>(&self, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || op(hasher.as_ref()))
            .await
            .map_err(|err| Error::internal(format!("credential task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn hash(&self, password: &str) -> Result<String, Error> {
        let password = Zeroizing::new(password.to_owned());
        self.run_hasher(move |hasher| hasher.hash(&password)).await
    }

    async fn verify(&self, password: &str, stored: &StoredCredential) -> Result<(), Error> {
        let password = Zeroizing::new(password.to_owned());
        let stored_hash = stored.password_hash.clone();
        let matched = self
            .run_hasher(move |hasher| hasher.verify(&password, &stored_hash))
            .await?;
        if matched {
            Ok(())
        } else {
            warn!(username = %stored.user.username(), "login rejected");
            Err(invalid_credentials())
        }
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn find_or_create_user(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LoginOutcome, Error> {
        let username = credentials.username();
        if let Some(stored) = self
            .user_repo
            .find_credential(username)
            .await
            .map_err(map_user_error)?
        {
            self.verify(credentials.password(), &stored).await?;
            return Ok(LoginOutcome::Authenticated(stored.user));
        }

        let password_hash = self.hash(credentials.password()).await?;
        let user = User::new(username.clone(), None, Role::Student);
        let inserted = self
            .user_repo
            .insert(&StoredCredential {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        if inserted {
            info!(username = %username, "user registered on first login");
            return Ok(LoginOutcome::Registered(user));
        }

        // Lost a registration race; the winner's password decides.
        let stored = self
            .user_repo
            .find_credential(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(invalid_credentials)?;
        self.verify(credentials.password(), &stored).await?;
        Ok(LoginOutcome::Authenticated(stored.user))
    }
}

#[async_trait]
impl<U, H> AdminCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn add_user(&self, request: AddUserRequest) -> Result<User, Error> {
        let credentials = LoginCredentials::try_from_parts(&request.username, &request.password)
            .map_err(map_login_validation_error)?;
        let display_name = request
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(DisplayName::new)
            .transpose()
            .map_err(|err| {
                Error::invalid_request(err.to_string())
                    .with_details(json!({ "field": "name", "code": "invalid_name" }))
            })?;
        let role = request
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|err| {
                Error::invalid_request(err.to_string())
                    .with_details(json!({ "field": "role", "code": "invalid_role" }))
            })?
            .unwrap_or_default();

        let password_hash = self.hash(credentials.password()).await?;
        let user = User::new(credentials.username().clone(), display_name, role);
        let inserted = self
            .user_repo
            .insert(&StoredCredential {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        if !inserted {
            return Err(
                Error::invalid_request(format!("username {} is taken", user.username()))
                    .with_details(json!({ "field": "username", "code": "username_taken" })),
            );
        }

        info!(username = %user.username(), role = %user.role(), "user added");
        Ok(user)
    }

    async fn delete_user(&self, username: String) -> Result<(), Error> {
        let username = parse_username(&username)?;
        let deleted = self
            .user_repo
            .delete(&username)
            .await
            .map_err(map_user_error)?;
        if !deleted {
            return Err(user_not_found(username.as_ref()));
        }
        info!(username = %username, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
