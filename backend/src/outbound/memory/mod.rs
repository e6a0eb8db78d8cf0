//! In-process store backing every repository port.
//!
//! Used when no database URL is configured and throughout the HTTP tests.
//! All tables live behind one mutex, so each port operation is atomic with
//! respect to every other, including the read-modify-write in `upsert`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AttendanceRepository, AttendanceRepositoryError, IssueRepository, IssueRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AttendanceDate, AttendanceRecord, DateBounds, IssueKind, MealFlags, MealUpdate, MonthSheet,
    NewIssue, Role, StoredCredential, User, Username, YearMonth,
};

#[derive(Debug, Clone, Copy)]
struct AttendanceRow {
    id: i64,
    meals: MealFlags,
}

#[derive(Debug, Default)]
struct MessTables {
    users: BTreeMap<Username, StoredCredential>,
    attendance: BTreeMap<(Username, AttendanceDate), AttendanceRow>,
    issues: Vec<(i64, NewIssue)>,
    last_attendance_id: i64,
    last_issue_id: i64,
}

impl MessTables {
    fn records_where<F>(&self, username: &Username, keep: F) -> Vec<AttendanceRecord>
    where
        F: Fn(AttendanceDate) -> bool,
    {
        let mut records: Vec<_> = self
            .attendance
            .iter()
            .filter(|((owner, date), _)| owner == username && keep(*date))
            .map(|((owner, date), row)| to_record(owner, *date, *row))
            .collect();
        records.sort_by(|a, b| b.date().cmp(&a.date()));
        records
    }
}

fn to_record(username: &Username, date: AttendanceDate, row: AttendanceRow) -> AttendanceRecord {
    AttendanceRecord::new(row.id, username.clone(), date, row.meals)
}

fn as_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Mutex-guarded implementation of the attendance, user and issue ports.
///
/// Deleting a user removes their attendance and issues, matching the
/// cascading foreign keys of the PostgreSQL schema.
///
/// # Examples
/// ```
/// use messpro::outbound::memory::InMemoryMessStore;
///
/// let store = InMemoryMessStore::default();
/// # let _ = store;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMessStore {
    tables: Mutex<MessTables>,
}

impl InMemoryMessStore {
    fn lock(&self) -> Result<MutexGuard<'_, MessTables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryMessStore {
    async fn upsert(
        &self,
        username: &Username,
        date: AttendanceDate,
        update: MealUpdate,
    ) -> Result<AttendanceRecord, AttendanceRepositoryError> {
        let mut tables = self.lock().map_err(AttendanceRepositoryError::query)?;
        if !tables.users.contains_key(username) {
            return Err(AttendanceRepositoryError::unknown_user(username.as_ref()));
        }

        let key = (username.clone(), date);
        let row = match tables.attendance.get(&key).copied() {
            Some(stored) => AttendanceRow {
                id: stored.id,
                meals: update.apply(stored.meals),
            },
            None => {
                tables.last_attendance_id += 1;
                AttendanceRow {
                    id: tables.last_attendance_id,
                    meals: update.initial(),
                }
            }
        };
        tables.attendance.insert(key, row);
        Ok(to_record(username, date, row))
    }

    async fn query_range(
        &self,
        username: &Username,
        bounds: DateBounds,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        let tables = self.lock().map_err(AttendanceRepositoryError::query)?;
        Ok(tables.records_where(username, |date| bounds.contains(date)))
    }

    async fn query_month(
        &self,
        username: &Username,
        month: YearMonth,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        let tables = self.lock().map_err(AttendanceRepositoryError::query)?;
        Ok(tables.records_where(username, |date| month.matches(&date.to_string())))
    }

    async fn month_sheet(
        &self,
        username: &Username,
        month: YearMonth,
    ) -> Result<Option<MonthSheet>, AttendanceRepositoryError> {
        let tables = self.lock().map_err(AttendanceRepositoryError::query)?;
        Ok(tables.users.get(username).map(|credential| MonthSheet {
            user: credential.user.clone(),
            records: tables.records_where(username, |date| month.matches(&date.to_string())),
        }))
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<AttendanceRecord>, AttendanceRepositoryError> {
        let tables = self.lock().map_err(AttendanceRepositoryError::query)?;
        let mut records: Vec<_> = tables
            .attendance
            .iter()
            .map(|((owner, date), row)| to_record(owner, *date, *row))
            .collect();
        records.sort_by(|a, b| b.sequence().cmp(&a.sequence()));
        records.truncate(limit);
        Ok(records)
    }

    async fn count_on(&self, date: AttendanceDate) -> Result<u64, AttendanceRepositoryError> {
        let tables = self.lock().map_err(AttendanceRepositoryError::query)?;
        let count = tables
            .attendance
            .keys()
            .filter(|(_, stored)| *stored == date)
            .count();
        Ok(as_count(count))
    }

    async fn count_in_month(&self, month: YearMonth) -> Result<u64, AttendanceRepositoryError> {
        let tables = self.lock().map_err(AttendanceRepositoryError::query)?;
        let count = tables
            .attendance
            .keys()
            .filter(|(_, date)| month.matches(&date.to_string()))
            .count();
        Ok(as_count(count))
    }
}

#[async_trait]
impl UserRepository for InMemoryMessStore {
    async fn find(&self, username: &Username) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .get(username)
            .map(|credential| credential.user.clone()))
    }

    async fn find_credential(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredential>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(username).cloned())
    }

    async fn insert(&self, credential: &StoredCredential) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        let username = credential.user.username();
        if tables.users.contains_key(username) {
            return Ok(false);
        }
        tables.users.insert(username.clone(), credential.clone());
        Ok(true)
    }

    async fn delete(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables.users.remove(username).is_none() {
            return Ok(false);
        }
        tables.attendance.retain(|(owner, _), _| owner != username);
        tables.issues.retain(|(_, issue)| issue.username() != username);
        Ok(true)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .values()
            .filter(|credential| credential.user.role() == role)
            .map(|credential| credential.user.clone())
            .collect())
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        let count = tables
            .users
            .values()
            .filter(|credential| credential.user.role() == role)
            .count();
        Ok(as_count(count))
    }
}

#[async_trait]
impl IssueRepository for InMemoryMessStore {
    async fn insert(&self, issue: &NewIssue) -> Result<i64, IssueRepositoryError> {
        let mut tables = self.lock().map_err(IssueRepositoryError::query)?;
        if !tables.users.contains_key(issue.username()) {
            return Err(IssueRepositoryError::unknown_user(issue.username().as_ref()));
        }
        tables.last_issue_id += 1;
        let id = tables.last_issue_id;
        tables.issues.push((id, issue.clone()));
        Ok(id)
    }

    async fn count_by_kind(&self, kind: IssueKind) -> Result<u64, IssueRepositoryError> {
        let tables = self.lock().map_err(IssueRepositoryError::query)?;
        let count = tables
            .issues
            .iter()
            .filter(|(_, issue)| issue.kind() == kind)
            .count();
        Ok(as_count(count))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
