//! Database error types.

use std::fmt;
use std::path::PathBuf;

use rusqlite::ffi;
use thiserror::Error;

/// Which constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityKind {
    /// A referenced row does not exist.
    ForeignKey,
    /// A required column was missing.
    NotNull,
    /// A unique column already holds the value.
    Unique,
    /// A `CHECK` constraint (length, non-empty label) failed.
    Check,
    /// The primary key is already taken.
    PrimaryKey,
    Other,
}

impl IntegrityKind {
    fn from_extended_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKey,
            ffi::SQLITE_CONSTRAINT_NOTNULL => Self::NotNull,
            ffi::SQLITE_CONSTRAINT_UNIQUE => Self::Unique,
            ffi::SQLITE_CONSTRAINT_CHECK => Self::Check,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Self::PrimaryKey,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ForeignKey => "foreign key",
            Self::NotNull => "not null",
            Self::Unique => "unique",
            Self::Check => "check",
            Self::PrimaryKey => "primary key",
            Self::Other => "constraint",
        };
        f.write_str(name)
    }
}

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// A write violated a schema constraint (missing relation, missing
    /// required field, duplicate unique value).
    #[error("Integrity error ({kind}): {message}")]
    Integrity { kind: IntegrityKind, message: String },

    /// IO error when creating directories or files.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DatabaseError {
    /// Returns the constraint kind if this is an integrity failure.
    pub fn integrity_kind(&self) -> Option<IntegrityKind> {
        match self {
            Self::Integrity { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_integrity(&self) -> bool {
        self.integrity_kind().is_some()
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Integrity {
                    kind: IntegrityKind::from_extended_code(code.extended_code),
                    message: message.unwrap_or_else(|| code.to_string()),
                }
            }
            other => Self::Sqlite(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_is_integrity() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);")
            .unwrap();
        conn.execute("INSERT INTO t (name) VALUES ('a')", []).unwrap();

        let err: DatabaseError = conn
            .execute("INSERT INTO t (name) VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert_eq!(err.integrity_kind(), Some(IntegrityKind::Unique));

        let err: DatabaseError = conn
            .execute("INSERT INTO t (name) VALUES (NULL)", [])
            .unwrap_err()
            .into();
        assert_eq!(err.integrity_kind(), Some(IntegrityKind::NotNull));
    }

    #[test]
    fn test_other_errors_stay_sqlite() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: DatabaseError = conn
            .execute("INSERT INTO missing_table VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::Sqlite(_)));
        assert!(!err.is_integrity());
    }
}
