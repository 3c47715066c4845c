//! CV/resume repository — CRUD operations for the `cv_resumes` table.
//!
//! Rows only hold storage references. Storing and reading the file bytes
//! is handled by [`crate::attachments`].

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;

use super::{optional, Database, DatabaseError};
use crate::storage::FileRef;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvResumeRow {
    pub id: i64,
    pub user_id: i64,
    pub cv: Option<FileRef>,
    pub resume: Option<FileRef>,
    pub created_at: DateTime<Utc>,
}

impl CvResumeRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            cv: row.get("cv")?,
            resume: row.get("resume")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCvResume {
    pub user_id: i64,
    pub cv: Option<FileRef>,
    pub resume: Option<FileRef>,
}

pub fn insert(db: &Database, new: &NewCvResume) -> Result<CvResumeRow, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO cv_resumes (user_id, cv, resume, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![new.user_id, new.cv, new.resume, Utc::now()],
        )?;
        let id = conn.last_insert_rowid();
        let row = conn.query_row(
            "SELECT * FROM cv_resumes WHERE id = ?1",
            params![id],
            CvResumeRow::from_row,
        )?;
        Ok(row)
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<CvResumeRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM cv_resumes WHERE id = ?1",
            params![id],
            CvResumeRow::from_row,
        ))
    })
}

/// Lists a user's CV/resume records in creation order.
pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<CvResumeRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM cv_resumes WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![user_id], CvResumeRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Saves the file references. `user_id` and `created_at` are left unchanged.
/// Returns `false` when no row has that id.
pub fn update(db: &Database, row: &CvResumeRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE cv_resumes SET cv = ?2, resume = ?3 WHERE id = ?1",
            params![row.id, row.cv, row.resume],
        )?;
        Ok(updated > 0)
    })
}

pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM cv_resumes WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::user_repo::{self, NewUserRow};
    use crate::db::IntegrityKind;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn make_user(db: &Database) -> i64 {
        user_repo::insert(
            db,
            &NewUserRow {
                username: "user".to_string(),
                password_hash: "hash".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_insert_with_only_cv() {
        let db = test_db();
        let user_id = make_user(&db);
        let row = insert(
            &db,
            &NewCvResume {
                user_id,
                cv: Some(FileRef::new("cvs/2026/10/19/my_cv.pdf")),
                resume: None,
            },
        )
        .unwrap();

        let found = find_by_id(&db, row.id).unwrap().unwrap();
        assert_eq!(found.cv.as_ref().map(FileRef::as_str), Some("cvs/2026/10/19/my_cv.pdf"));
        assert!(found.resume.is_none());
        assert_eq!(found.user_id, user_id);
    }

    #[test]
    fn test_requires_existing_user() {
        let db = test_db();
        let err = insert(
            &db,
            &NewCvResume {
                user_id: 7,
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.integrity_kind(), Some(IntegrityKind::ForeignKey));
    }

    #[test]
    fn test_update_and_list() {
        let db = test_db();
        let user_id = make_user(&db);
        let mut row = insert(
            &db,
            &NewCvResume {
                user_id,
                ..Default::default()
            },
        )
        .unwrap();

        row.resume = Some(FileRef::new("resumes/2026/10/19/r.pdf"));
        assert!(update(&db, &row).unwrap());

        let mut missing = row.clone();
        missing.id = 9999;
        assert!(!update(&db, &missing).unwrap());

        let rows = list_for_user(&db, user_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].resume, row.resume);

        assert!(delete(&db, row.id).unwrap());
        assert!(list_for_user(&db, user_id).unwrap().is_empty());
    }
}
