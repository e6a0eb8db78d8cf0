//! PostgreSQL-backed `IssueRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IssueRepository, IssueRepositoryError};
use crate::domain::{IssueKind, NewIssue};

use super::diesel_helpers::{StoreFailure, to_count, within};
use super::models::NewIssueRow;
use super::pool::DbPool;
use super::schema::issues;

/// Diesel-backed implementation of the issue repository port.
#[derive(Clone)]
pub struct DieselIssueRepository {
    pool: DbPool,
}

impl DieselIssueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StoreFailure, username: &str) -> IssueRepositoryError {
    match failure {
        StoreFailure::Connection(message) => IssueRepositoryError::connection(message),
        StoreFailure::Timeout(message) => IssueRepositoryError::timeout(message),
        StoreFailure::ForeignKey(_) => IssueRepositoryError::unknown_user(username),
        StoreFailure::Query(message) => IssueRepositoryError::query(message),
    }
}

#[async_trait]
impl IssueRepository for DieselIssueRepository {
    async fn insert(&self, issue: &NewIssue) -> Result<i64, IssueRepositoryError> {
        let date = issue.date().to_string();
        let new_row = NewIssueRow {
            username: issue.username().as_ref(),
            kind: issue.kind().as_str(),
            category: issue.category(),
            subject: issue.subject(),
            message: issue.message(),
            date: &date,
        };
        within(self.pool.operation_timeout(), "issue insert", async {
            let mut conn = self.pool.get().await?;
            let id = diesel::insert_into(issues::table)
                .values(&new_row)
                .returning(issues::id)
                .get_result(&mut conn)
                .await?;
            Ok(id)
        })
        .await
        .map_err(|failure| map_failure(failure, issue.username().as_ref()))
    }

    async fn count_by_kind(&self, kind: IssueKind) -> Result<u64, IssueRepositoryError> {
        within(self.pool.operation_timeout(), "issue count", async {
            let mut conn = self.pool.get().await?;
            let count: i64 = issues::table
                .filter(issues::kind.eq(kind.as_str()))
                .count()
                .get_result(&mut conn)
                .await?;
            Ok(to_count(count))
        })
        .await
        .map_err(|failure| map_failure(failure, ""))
    }
}
