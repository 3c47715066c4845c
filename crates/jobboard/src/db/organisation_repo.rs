//! Organisation repository — CRUD operations for the `organisations` table.

use rusqlite::{params, Row};
use serde::Serialize;

use super::{optional, Database, DatabaseError};
use crate::storage::FileRef;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganisationRow {
    pub id: i64,
    pub user_id: i64,
    pub logo: Option<FileRef>,
    pub name: String,
    pub description: String,
}

impl OrganisationRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            logo: row.get("logo")?,
            name: row.get("name")?,
            description: row.get("description")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewOrganisation {
    pub user_id: i64,
    pub logo: Option<FileRef>,
    pub name: String,
    pub description: String,
}

pub fn insert(db: &Database, new: &NewOrganisation) -> Result<OrganisationRow, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO organisations (user_id, logo, name, description) VALUES (?1, ?2, ?3, ?4)",
            params![new.user_id, new.logo, new.name, new.description],
        )?;
        Ok(OrganisationRow {
            id: conn.last_insert_rowid(),
            user_id: new.user_id,
            logo: new.logo.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
        })
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<OrganisationRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM organisations WHERE id = ?1",
            params![id],
            OrganisationRow::from_row,
        ))
    })
}

/// Lists organisations owned by a user in creation order.
pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<OrganisationRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM organisations WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![user_id], OrganisationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn update(db: &Database, row: &OrganisationRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE organisations SET logo=?2, name=?3, description=?4 WHERE id=?1",
            params![row.id, row.logo, row.name, row.description],
        )?;
        Ok(updated > 0)
    })
}

/// Deletes an organisation and, by cascade, its job postings.
pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM organisations WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}
