//! Applied job repository — a user's applications to job postings.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use super::{optional, Database, DatabaseError};

/// Status assigned to an application when the caller gives none.
pub const DEFAULT_STATUS: &str = "Applied";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedJobRow {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub date_applied: DateTime<Utc>,
    pub status: String,
}

impl AppliedJobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            job_id: row.get("job_id")?,
            date_applied: row.get("date_applied")?,
            status: row.get("status")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NewAppliedJob {
    pub user_id: i64,
    pub job_id: i64,
    /// Falls back to [`DEFAULT_STATUS`].
    #[serde(default)]
    pub status: Option<String>,
}

/// Records an application. `date_applied` is always the insertion time.
pub fn insert(db: &Database, new: &NewAppliedJob) -> Result<AppliedJobRow, DatabaseError> {
    db.with_conn(|conn| {
        let date_applied = Utc::now();
        let status = new.status.as_deref().unwrap_or(DEFAULT_STATUS);
        conn.execute(
            "INSERT INTO applied_jobs (user_id, job_id, date_applied, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.user_id, new.job_id, date_applied, status],
        )?;
        Ok(AppliedJobRow {
            id: conn.last_insert_rowid(),
            user_id: new.user_id,
            job_id: new.job_id,
            date_applied,
            status: status.to_string(),
        })
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<AppliedJobRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM applied_jobs WHERE id = ?1",
            params![id],
            AppliedJobRow::from_row,
        ))
    })
}

/// Lists a user's applications in the order they were made.
pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<AppliedJobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM applied_jobs WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![user_id], AppliedJobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Lists the applications received by a job.
pub fn list_for_job(db: &Database, job_id: i64) -> Result<Vec<AppliedJobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM applied_jobs WHERE job_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![job_id], AppliedJobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn list_by_status(db: &Database, status: &str) -> Result<Vec<AppliedJobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM applied_jobs WHERE status = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![status], AppliedJobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Updates only the status of an application.
pub fn update_status(db: &Database, id: i64, status: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE applied_jobs SET status = ?2 WHERE id = ?1",
            params![id, status],
        )?;
        Ok(changed > 0)
    })
}

pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM applied_jobs WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}
