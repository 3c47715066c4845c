//! Job comment repository — comments (and heart reactions) on job postings.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use super::{optional, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCommentRow {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub text: String,
    pub heart: bool,
    pub created_at: DateTime<Utc>,
}

impl JobCommentRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            job_id: row.get("job_id")?,
            text: row.get("text")?,
            heart: row.get("heart")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewJobComment {
    pub user_id: i64,
    pub job_id: i64,
    pub text: String,
    #[serde(default)]
    pub heart: bool,
}

pub fn insert(db: &Database, new: &NewJobComment) -> Result<JobCommentRow, DatabaseError> {
    db.with_conn(|conn| {
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO job_comments (user_id, job_id, text, heart, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.user_id, new.job_id, new.text, new.heart, created_at],
        )?;
        Ok(JobCommentRow {
            id: conn.last_insert_rowid(),
            user_id: new.user_id,
            job_id: new.job_id,
            text: new.text.clone(),
            heart: new.heart,
            created_at,
        })
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<JobCommentRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM job_comments WHERE id = ?1",
            params![id],
            JobCommentRow::from_row,
        ))
    })
}

/// Lists the comments on a job, oldest first.
pub fn list_for_job(db: &Database, job_id: i64) -> Result<Vec<JobCommentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM job_comments WHERE job_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![job_id], JobCommentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Lists the comments written by a user, oldest first.
pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<JobCommentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM job_comments WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![user_id], JobCommentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Counts hearted comments on a job.
pub fn count_hearts(db: &Database, job_id: i64) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM job_comments WHERE job_id = ?1 AND heart = 1",
            params![job_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

pub fn update(db: &Database, row: &JobCommentRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE job_comments SET text = ?2, heart = ?3 WHERE id = ?1",
            params![row.id, row.text, row.heart],
        )?;
        Ok(updated > 0)
    })
}

pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM job_comments WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}
