//! User repository — CRUD operations for the `users` table.
//!
//! Rows here carry an already-hashed credential. Use
//! [`crate::accounts::create_user`] to create a user from a plaintext
//! password together with its profile.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use super::{optional, Database, DatabaseError};

/// A user identity row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    /// PHC-formatted password hash.
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl UserRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password: row.get("password")?,
            email: row.get("email")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            is_active: row.get("is_active")?,
            date_joined: row.get("date_joined")?,
        })
    }
}

/// Values for a new user row.
#[derive(Debug, Clone, Default)]
pub struct NewUserRow {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Inserts a new user and returns the stored row.
pub fn insert(db: &Database, user: &NewUserRow) -> Result<UserRow, DatabaseError> {
    db.with_conn(|conn| insert_with(conn, user))
}

pub(crate) fn insert_with(conn: &Connection, user: &NewUserRow) -> Result<UserRow, DatabaseError> {
    conn.execute(
        "INSERT INTO users (username, password, email, first_name, last_name, is_active, date_joined)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
        params![
            user.username,
            user.password_hash,
            user.email,
            user.first_name,
            user.last_name,
            Utc::now(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    let row = conn.query_row("SELECT * FROM users WHERE id = ?1", params![id], UserRow::from_row)?;
    Ok(row)
}

/// Finds a user by id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<UserRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM users WHERE id = ?1",
            params![id],
            UserRow::from_row,
        ))
    })
}

/// Finds a user by exact username.
pub fn find_by_username(db: &Database, username: &str) -> Result<Option<UserRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM users WHERE username = ?1",
            params![username],
            UserRow::from_row,
        ))
    })
}

/// Lists all users in creation order.
pub fn list(db: &Database) -> Result<Vec<UserRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY id")?;
        let rows = stmt
            .query_map([], UserRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Saves every mutable column of `user`. `id` and `date_joined` are left
/// unchanged. Returns `false` for an unknown id.
pub fn update(db: &Database, user: &UserRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE users SET username=?2, password=?3, email=?4, first_name=?5,
             last_name=?6, is_active=?7
             WHERE id=?1",
            params![
                user.id,
                user.username,
                user.password,
                user.email,
                user.first_name,
                user.last_name,
                user.is_active,
            ],
        )?;
        Ok(updated > 0)
    })
}

/// Updates only the stored password hash.
pub fn set_password_hash(db: &Database, id: i64, password_hash: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE users SET password = ?2 WHERE id = ?1",
            params![id, password_hash],
        )?;
        Ok(changed > 0)
    })
}

/// Deletes a user. The profile and every owned record go with it.
pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::IntegrityKind;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn sample_user(username: &str) -> NewUserRow {
        NewUserRow {
            username: username.to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            email: format!("{}@example.com", username),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        let user = insert(&db, &sample_user("ada")).unwrap();
        assert!(user.is_active);
        assert_eq!(user.first_name, "");

        let found = find_by_id(&db, user.id).unwrap().unwrap();
        assert_eq!(found, user);

        let by_name = find_by_username(&db, "ada").unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
    }

    #[test]
    fn test_find_nonexistent() {
        let db = test_db();
        assert!(find_by_id(&db, 42).unwrap().is_none());
        assert!(find_by_username(&db, "ghost").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_is_unique_violation() {
        let db = test_db();
        insert(&db, &sample_user("ada")).unwrap();
        let err = insert(&db, &sample_user("ada")).unwrap_err();
        assert_eq!(err.integrity_kind(), Some(IntegrityKind::Unique));
    }

    #[test]
    fn test_empty_username_rejected() {
        let db = test_db();
        let err = insert(&db, &sample_user("")).unwrap_err();
        assert_eq!(err.integrity_kind(), Some(IntegrityKind::Check));
    }

    #[test]
    fn test_update_and_delete() {
        let db = test_db();
        let mut user = insert(&db, &sample_user("grace")).unwrap();
        user.first_name = "Grace".to_string();
        user.is_active = false;
        assert!(update(&db, &user).unwrap());

        let mut missing = user.clone();
        missing.id = 9999;
        assert!(!update(&db, &missing).unwrap());

        let found = find_by_id(&db, user.id).unwrap().unwrap();
        assert_eq!(found.first_name, "Grace");
        assert!(!found.is_active);

        assert!(delete(&db, user.id).unwrap());
        assert!(!delete(&db, user.id).unwrap());
        assert!(find_by_id(&db, user.id).unwrap().is_none());
    }

    #[test]
    fn test_password_not_serialized() {
        let db = test_db();
        let user = insert(&db, &sample_user("linus")).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "linus");
    }
}
