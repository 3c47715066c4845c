//! Experience repository — CRUD operations for the `experience` table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use super::{optional, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRow {
    pub id: i64,
    pub user_id: i64,
    pub job_title: String,
    pub organisation_name: String,
    pub start_date: DateTime<Utc>,
    /// `None` while the position is current.
    pub end_date: Option<DateTime<Utc>>,
    pub job_description: String,
}

impl ExperienceRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            job_title: row.get("job_title")?,
            organisation_name: row.get("organisation_name")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            job_description: row.get("job_description")?,
        })
    }
}

/// Values for a new experience record. Only `user_id` and `start_date`
/// are required; text fields may be left blank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewExperience {
    pub user_id: i64,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub organisation_name: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub job_description: String,
}

impl NewExperience {
    pub fn new(user_id: i64, start_date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            job_title: String::new(),
            organisation_name: String::new(),
            start_date,
            end_date: None,
            job_description: String::new(),
        }
    }
}

pub fn insert(db: &Database, new: &NewExperience) -> Result<ExperienceRow, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO experience (user_id, job_title, organisation_name, start_date, end_date, job_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.user_id,
                new.job_title,
                new.organisation_name,
                new.start_date,
                new.end_date,
                new.job_description,
            ],
        )?;
        Ok(ExperienceRow {
            id: conn.last_insert_rowid(),
            user_id: new.user_id,
            job_title: new.job_title.clone(),
            organisation_name: new.organisation_name.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            job_description: new.job_description.clone(),
        })
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<ExperienceRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM experience WHERE id = ?1",
            params![id],
            ExperienceRow::from_row,
        ))
    })
}

pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<ExperienceRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM experience WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![user_id], ExperienceRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn update(db: &Database, row: &ExperienceRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE experience SET job_title=?2, organisation_name=?3, start_date=?4,
             end_date=?5, job_description=?6
             WHERE id=?1",
            params![
                row.id,
                row.job_title,
                row.organisation_name,
                row.start_date,
                row.end_date,
                row.job_description,
            ],
        )?;
        Ok(updated > 0)
    })
}

pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM experience WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}
