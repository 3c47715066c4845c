//! Shared helpers for integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use tempfile::TempDir;

use jobboard::config::PasswordHashingConfig;
use jobboard::db::job_repo::{self, JobRow, NewJob};
use jobboard::db::job_category_repo;
use jobboard::db::user_repo::UserRow;
use jobboard::{Config, JobBoard, NewUser};

/// A board with an in-memory database and a throwaway media root.
pub struct TestBoard {
    pub board: JobBoard,
    _media: TempDir,
}

impl std::ops::Deref for TestBoard {
    type Target = JobBoard;

    fn deref(&self) -> &JobBoard {
        &self.board
    }
}

pub fn test_board() -> TestBoard {
    let media = TempDir::new().expect("Failed to create media dir");
    let mut config = Config::new(media.path());
    // Cheap hashing parameters keep the suite fast.
    config.password_hashing = PasswordHashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    let board = JobBoard::open_in_memory(&config).expect("Failed to open board");
    TestBoard {
        board,
        _media: media,
    }
}

/// Creates a user (and its profile) through the account factory.
pub fn create_user_profile(board: &JobBoard, username: &str) -> UserRow {
    board
        .create_user(&NewUser::new(username, "pass"))
        .expect("Failed to create user")
}

/// Creates an organisation, a category and a job posted by `user`.
pub fn create_job(board: &JobBoard, user: &UserRow, title: &str) -> JobRow {
    let org = board
        .create_organisation(user.id, "Acme", "", None)
        .expect("Failed to create organisation");
    let category = job_category_repo::insert(board.db(), "Engineering").expect("Failed to create category");
    let start = Utc::now();
    job_repo::insert(
        board.db(),
        &NewJob {
            created_by: user.id,
            organisation_id: org.id,
            category_id: category.id,
            title: title.to_string(),
            description: "Build things.".to_string(),
            allow_comments: None,
            start_accepting_applications_at: start,
            stop_accepting_applications_at: start + Duration::days(14),
            employment_term: "Full-time".to_string(),
            seniority_level: String::new(),
            location: String::new(),
        },
    )
    .expect("Failed to create job")
}
