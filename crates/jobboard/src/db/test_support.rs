//! Shared fixtures for repository tests.

use chrono::{Duration, Utc};

use super::job_repo::NewJob;
use super::organisation_repo::{self, NewOrganisation};
use super::user_repo::{self, NewUserRow};
use super::{job_category_repo, Database};

/// A database holding one user, one organisation and one category.
pub(crate) struct Fixture {
    pub db: Database,
    pub user_id: i64,
    pub organisation_id: i64,
    pub category_id: i64,
}

pub(crate) fn fixture() -> Fixture {
    let db = Database::open_in_memory().expect("Failed to create test database");
    let user_id = user_repo::insert(
        &db,
        &NewUserRow {
            username: "recruiter".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        },
    )
    .unwrap()
    .id;
    let organisation_id = organisation_repo::insert(
        &db,
        &NewOrganisation {
            user_id,
            name: "Acme".to_string(),
            ..Default::default()
        },
    )
    .unwrap()
    .id;
    let category_id = job_category_repo::insert(&db, "Engineering").unwrap().id;
    Fixture {
        db,
        user_id,
        organisation_id,
        category_id,
    }
}

pub(crate) fn sample_job(f: &Fixture, title: &str) -> NewJob {
    let start = Utc::now();
    NewJob {
        created_by: f.user_id,
        organisation_id: f.organisation_id,
        category_id: f.category_id,
        title: title.to_string(),
        description: "Write and review code.".to_string(),
        allow_comments: None,
        start_accepting_applications_at: start,
        stop_accepting_applications_at: start + Duration::days(30),
        employment_term: String::new(),
        seniority_level: String::new(),
        location: String::new(),
    }
}
