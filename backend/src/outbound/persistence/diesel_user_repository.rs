//! PostgreSQL-backed `UserRepository`.
//!
//! Deleting a user relies on the `ON DELETE CASCADE` foreign keys to remove
//! their attendance and issues in the same statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, Role, StoredCredential, User, Username};

use super::diesel_helpers::{StoreFailure, to_count, within};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_row(&self, username: &Username) -> Result<Option<UserRow>, UserPersistenceError> {
        within(self.pool.operation_timeout(), "user lookup", async {
            let mut conn = self.pool.get().await?;
            let row = users::table
                .find(username.as_ref())
                .select(UserRow::as_select())
                .first(&mut conn)
                .await
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(map_failure)
    }
}

fn map_failure(failure: StoreFailure) -> UserPersistenceError {
    match failure {
        StoreFailure::Connection(message) => UserPersistenceError::connection(message),
        StoreFailure::Timeout(message) => UserPersistenceError::timeout(message),
        StoreFailure::ForeignKey(message) | StoreFailure::Query(message) => {
            UserPersistenceError::query(message)
        }
    }
}

pub(super) fn row_to_credential(row: UserRow) -> Result<StoredCredential, UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {}: {err}", row.username))
    };
    let username = Username::new(&row.username).map_err(invalid)?;
    let role = row.role.parse::<Role>().map_err(invalid)?;
    let display_name = row
        .full_name
        .as_deref()
        .map(DisplayName::new)
        .transpose()
        .map_err(invalid)?;
    Ok(StoredCredential {
        user: User::new(username, display_name, role),
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find(&self, username: &Username) -> Result<Option<User>, UserPersistenceError> {
        let credential = self.find_credential(username).await?;
        Ok(credential.map(|credential| credential.user))
    }

    async fn find_credential(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredential>, UserPersistenceError> {
        self.load_row(username)
            .await?
            .map(row_to_credential)
            .transpose()
    }

    async fn insert(&self, credential: &StoredCredential) -> Result<bool, UserPersistenceError> {
        let user = &credential.user;
        let new_row = NewUserRow {
            username: user.username().as_ref(),
            password_hash: &credential.password_hash,
            role: user.role().as_str(),
            full_name: user.display_name().map(AsRef::as_ref),
        };
        within(self.pool.operation_timeout(), "user insert", async {
            let mut conn = self.pool.get().await?;
            let inserted = diesel::insert_into(users::table)
                .values(&new_row)
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_failure)
    }

    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        within(self.pool.operation_timeout(), "user delete", async {
            let mut conn = self.pool.get().await?;
            let deleted = diesel::delete(users::table.find(username.as_ref()))
                .execute(&mut conn)
                .await?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_failure)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let rows = within(self.pool.operation_timeout(), "user listing", async {
            let mut conn = self.pool.get().await?;
            let rows = users::table
                .filter(users::role.eq(role.as_str()))
                .select(UserRow::as_select())
                .order(users::username.asc())
                .load(&mut conn)
                .await?;
            Ok(rows)
        })
        .await
        .map_err(map_failure)?;

        rows.into_iter()
            .map(|row| row_to_credential(row).map(|credential| credential.user))
            .collect()
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, UserPersistenceError> {
        within(self.pool.operation_timeout(), "user count", async {
            let mut conn = self.pool.get().await?;
            let count: i64 = users::table
                .filter(users::role.eq(role.as_str()))
                .count()
                .get_result(&mut conn)
                .await?;
            Ok(to_count(count))
        })
        .await
        .map_err(map_failure)
    }
}
