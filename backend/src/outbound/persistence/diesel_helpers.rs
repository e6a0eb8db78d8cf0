//! Shared error classification and deadlines for Diesel repositories.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::pool::PoolError;

/// Store failure reduced to what the repository ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Timeout(String),
    ForeignKey(String),
    Query(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<diesel::result::Error> for StoreFailure {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(%error, "diesel operation failed"),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKey(info.message().to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection error".to_owned())
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

/// Run `operation` within `budget`, reporting a [`StoreFailure::Timeout`]
/// when it does not finish in time.
pub(crate) async fn within<T, F>(
    budget: Duration,
    operation: &'static str,
    future: F,
) -> Result<T, StoreFailure>
where
    F: Future<Output = Result<T, StoreFailure>>,
{
    tokio::time::timeout(budget, future).await.unwrap_or_else(|_| {
        Err(StoreFailure::Timeout(format!(
            "{operation} exceeded {}ms",
            budget.as_millis()
        )))
    })
}

/// Convert a SQL `COUNT(*)` into the unsigned count the ports expose.
pub(crate) fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
