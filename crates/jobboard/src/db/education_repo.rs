//! Education repository — CRUD operations for the `education` table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use super::{optional, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRow {
    pub id: i64,
    pub user_id: i64,
    pub school_name: String,
    pub course_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    /// Blank when no grade was recorded.
    pub grade_obtained: String,
}

impl EducationRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            school_name: row.get("school_name")?,
            course_name: row.get("course_name")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            grade_obtained: row.get("grade_obtained")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewEducation {
    pub user_id: i64,
    pub school_name: String,
    pub course_name: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub grade_obtained: String,
}

pub fn insert(db: &Database, new: &NewEducation) -> Result<EducationRow, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO education (user_id, school_name, course_name, start_date, end_date, grade_obtained)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.user_id,
                new.school_name,
                new.course_name,
                new.start_date,
                new.end_date,
                new.grade_obtained,
            ],
        )?;
        Ok(EducationRow {
            id: conn.last_insert_rowid(),
            user_id: new.user_id,
            school_name: new.school_name.clone(),
            course_name: new.course_name.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            grade_obtained: new.grade_obtained.clone(),
        })
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<EducationRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM education WHERE id = ?1",
            params![id],
            EducationRow::from_row,
        ))
    })
}

/// Lists a user's education records in creation order.
pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<EducationRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM education WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![user_id], EducationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn update(db: &Database, row: &EducationRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE education SET school_name=?2, course_name=?3, start_date=?4,
             end_date=?5, grade_obtained=?6
             WHERE id=?1",
            params![
                row.id,
                row.school_name,
                row.course_name,
                row.start_date,
                row.end_date,
                row.grade_obtained,
            ],
        )?;
        Ok(updated > 0)
    })
}

pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM education WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}
