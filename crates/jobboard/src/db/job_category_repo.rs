//! Job category repository — the `job_categories` lookup table.

use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use super::{optional, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCategoryRow {
    pub id: i64,
    pub category: String,
}

impl JobCategoryRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            category: row.get("category")?,
        })
    }
}

pub fn insert(db: &Database, category: &str) -> Result<JobCategoryRow, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO job_categories (category) VALUES (?1)",
            params![category],
        )?;
        Ok(JobCategoryRow {
            id: conn.last_insert_rowid(),
            category: category.to_string(),
        })
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<JobCategoryRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM job_categories WHERE id = ?1",
            params![id],
            JobCategoryRow::from_row,
        ))
    })
}

/// Lists all categories in creation order.
pub fn list(db: &Database) -> Result<Vec<JobCategoryRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM job_categories ORDER BY id")?;
        let rows = stmt
            .query_map([], JobCategoryRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn update(db: &Database, row: &JobCategoryRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE job_categories SET category = ?2 WHERE id = ?1",
            params![row.id, row.category],
        )?;
        Ok(updated > 0)
    })
}

/// Deletes a category and, by cascade, every job filed under it.
pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM job_categories WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}
