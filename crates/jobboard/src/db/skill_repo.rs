//! Skill repository — free-text skill tags owned by a user.

use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use super::{optional, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRow {
    pub id: i64,
    pub user_id: i64,
    pub tag: String,
}

impl SkillRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            tag: row.get("tag")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSkill {
    pub user_id: i64,
    pub tag: String,
}

/// Inserts a new skill. Each call creates a separate row, even for a
/// repeated tag.
pub fn insert(db: &Database, new: &NewSkill) -> Result<SkillRow, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO skills (user_id, tag) VALUES (?1, ?2)",
            params![new.user_id, new.tag],
        )?;
        Ok(SkillRow {
            id: conn.last_insert_rowid(),
            user_id: new.user_id,
            tag: new.tag.clone(),
        })
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<SkillRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM skills WHERE id = ?1",
            params![id],
            SkillRow::from_row,
        ))
    })
}

pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<SkillRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM skills WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![user_id], SkillRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn update(db: &Database, row: &SkillRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE skills SET tag = ?2 WHERE id = ?1",
            params![row.id, row.tag],
        )?;
        Ok(updated > 0)
    })
}

pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM skills WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}
