//! Profile repository — the `user_profiles` table, keyed by user id.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use super::{optional, Database, DatabaseError};

/// A profile row. Its primary key is the owning user's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRow {
    pub user_id: i64,
}

impl ProfileRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            user_id: row.get("user_id")?,
        })
    }
}

/// Creates the profile for `user_id`.
pub fn insert(db: &Database, user_id: i64) -> Result<ProfileRow, DatabaseError> {
    db.with_conn(|conn| insert_with(conn, user_id))
}

pub(crate) fn insert_with(conn: &Connection, user_id: i64) -> Result<ProfileRow, DatabaseError> {
    conn.execute(
        "INSERT INTO user_profiles (user_id) VALUES (?1)",
        params![user_id],
    )?;
    Ok(ProfileRow { user_id })
}

/// Resolves the profile of a user.
pub fn find_by_user(db: &Database, user_id: i64) -> Result<Option<ProfileRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT user_id FROM user_profiles WHERE user_id = ?1",
            params![user_id],
            ProfileRow::from_row,
        ))
    })
}

/// Counts profiles pointing at `user_id` (0 or 1).
pub fn count_for_user(db: &Database, user_id: i64) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM user_profiles WHERE user_id = ?1",
            params![user_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Deletes a profile without touching the user.
pub fn delete(db: &Database, user_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute(
            "DELETE FROM user_profiles WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(deleted > 0)
    })
}
