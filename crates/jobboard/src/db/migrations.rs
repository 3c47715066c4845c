//! Database migration system.
//!
//! Tracks applied migrations in a `_migrations` table and applies
//! pending ones in order. Each migration runs together with its
//! bookkeeping row in one transaction.

use rusqlite::Connection;

use super::error::DatabaseError;

/// A single migration definition.
struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// All migrations in order. Each is applied at most once.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_users_and_profiles",
        sql: include_str!("sql/001_create_users.sql"),
    },
    Migration {
        version: 2,
        description: "create_cv_resumes_table",
        sql: include_str!("sql/002_create_cv_resumes.sql"),
    },
    Migration {
        version: 3,
        description: "create_education_table",
        sql: include_str!("sql/003_create_education.sql"),
    },
    Migration {
        version: 4,
        description: "create_experience_table",
        sql: include_str!("sql/004_create_experience.sql"),
    },
    Migration {
        version: 5,
        description: "create_organisations_table",
        sql: include_str!("sql/005_create_organisations.sql"),
    },
    Migration {
        version: 6,
        description: "create_skills_table",
        sql: include_str!("sql/006_create_skills.sql"),
    },
    Migration {
        version: 7,
        description: "create_job_categories_table",
        sql: include_str!("sql/007_create_job_categories.sql"),
    },
    Migration {
        version: 8,
        description: "create_jobs_table",
        sql: include_str!("sql/008_create_jobs.sql"),
    },
    Migration {
        version: 9,
        description: "create_job_comments_table",
        sql: include_str!("sql/009_create_job_comments.sql"),
    },
    Migration {
        version: 10,
        description: "create_applied_jobs_table",
        sql: include_str!("sql/010_create_applied_jobs.sql"),
    },
];

/// Runs all pending migrations on the given connection.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    // Create the migrations tracking table.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let applied = current_version(conn)?;

    for migration in MIGRATIONS {
        if migration.version <= applied {
            continue;
        }

        log::info!(
            "Running migration v{}: {}",
            migration.version,
            migration.description
        );

        let batch = format!(
            "BEGIN;\n{}\nINSERT INTO _migrations (version, description) VALUES ({}, '{}');\nCOMMIT;",
            migration.sql, migration.version, migration.description
        );
        if let Err(e) = conn.execute_batch(&batch) {
            // Leave the connection usable; the failed migration is not recorded.
            let _ = conn.execute_batch("ROLLBACK;");
            return Err(DatabaseError::Migration {
                version: migration.version,
                reason: e.to_string(),
            });
        }
    }

    Ok(())
}

/// Returns the highest applied migration version.
pub fn current_version(conn: &Connection) -> Result<u32, DatabaseError> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |r| r.get::<_, u32>(0),
        )
        .unwrap()
            == 1
    }

    fn columns(conn: &Connection, table: &str) -> Vec<(String, bool)> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({})", table))
            .unwrap();
        stmt.query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, bool>(3)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        run_all(&conn).unwrap();

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as u32);
        assert_eq!(current_version(&conn).unwrap(), 10);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        run_all(&conn).unwrap();
        // Running again should be a no-op.
        run_all(&conn).unwrap();

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as u32);
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();

        for table in [
            "users",
            "user_profiles",
            "cv_resumes",
            "education",
            "experience",
            "organisations",
            "skills",
            "job_categories",
            "jobs",
            "job_comments",
            "applied_jobs",
        ] {
            assert!(table_exists(&conn, table), "missing table {}", table);
        }
    }

    #[test]
    fn test_start_date_columns_are_not_null() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();

        for table in ["education", "experience"] {
            let cols = columns(&conn, table);
            let start = cols.iter().find(|(name, _)| name == "start_date").unwrap();
            assert!(start.1, "{}.start_date should be NOT NULL", table);
            let end = cols.iter().find(|(name, _)| name == "end_date").unwrap();
            assert!(!end.1, "{}.end_date should be nullable", table);
        }
    }

    #[test]
    fn test_versions_are_strictly_increasing() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
