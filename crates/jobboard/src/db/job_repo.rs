//! Job repository — CRUD operations for the `jobs` table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use super::{optional, Database, DatabaseError};

/// A job posting row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRow {
    pub id: i64,
    pub created_by: i64,
    pub organisation_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub allow_comments: bool,
    pub start_accepting_applications_at: DateTime<Utc>,
    pub stop_accepting_applications_at: DateTime<Utc>,
    pub employment_term: String,
    pub seniority_level: String,
    pub location: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            created_by: row.get("created_by")?,
            organisation_id: row.get("organisation_id")?,
            category_id: row.get("category_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            allow_comments: row.get("allow_comments")?,
            start_accepting_applications_at: row.get("start_accepting_applications_at")?,
            stop_accepting_applications_at: row.get("stop_accepting_applications_at")?,
            employment_term: row.get("employment_term")?,
            seniority_level: row.get("seniority_level")?,
            location: row.get("location")?,
        })
    }
}

/// Values for a new job posting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewJob {
    pub created_by: i64,
    pub organisation_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    /// Defaults to `true` when omitted.
    #[serde(default)]
    pub allow_comments: Option<bool>,
    pub start_accepting_applications_at: DateTime<Utc>,
    pub stop_accepting_applications_at: DateTime<Utc>,
    #[serde(default)]
    pub employment_term: String,
    #[serde(default)]
    pub seniority_level: String,
    #[serde(default)]
    pub location: String,
}

/// Query filter parameters for job listing.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    pub created_by: Option<i64>,
    pub organisation_id: Option<i64>,
    pub category_id: Option<i64>,
    pub location: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub fn insert(db: &Database, new: &NewJob) -> Result<JobRow, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO jobs (created_by, organisation_id, category_id, title, description,
             allow_comments, start_accepting_applications_at, stop_accepting_applications_at,
             employment_term, seniority_level, location)
             VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, 1), ?7, ?8, ?9, ?10, ?11)",
            params![
                new.created_by,
                new.organisation_id,
                new.category_id,
                new.title,
                new.description,
                new.allow_comments,
                new.start_accepting_applications_at,
                new.stop_accepting_applications_at,
                new.employment_term,
                new.seniority_level,
                new.location,
            ],
        )?;
        let id = conn.last_insert_rowid();
        let row = conn.query_row("SELECT * FROM jobs WHERE id = ?1", params![id], JobRow::from_row)?;
        Ok(row)
    })
}

pub fn find_by_id(db: &Database, id: i64) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        optional(conn.query_row(
            "SELECT * FROM jobs WHERE id = ?1",
            params![id],
            JobRow::from_row,
        ))
    })
}

/// Queries jobs with filters in creation order, returning (rows, total_count).
pub fn query(db: &Database, filter: &JobFilter) -> Result<(Vec<JobRow>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(created_by) = filter.created_by {
            conditions.push(format!("created_by = ?{}", param_values.len() + 1));
            param_values.push(Box::new(created_by));
        }
        if let Some(organisation_id) = filter.organisation_id {
            conditions.push(format!("organisation_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(organisation_id));
        }
        if let Some(category_id) = filter.category_id {
            conditions.push(format!("category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(category_id));
        }
        if let Some(ref location) = filter.location {
            conditions.push(format!("location = ?{}", param_values.len() + 1));
            param_values.push(Box::new(location.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM jobs {}", where_clause);
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let total: u64 = conn.query_row(&count_sql, params_ref.as_slice(), |r| r.get(0))?;

        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);
        let offset = i64::try_from(filter.offset.unwrap_or(0)).unwrap_or(i64::MAX);
        param_values.push(Box::new(limit));
        param_values.push(Box::new(offset));
        let query_sql = format!(
            "SELECT * FROM jobs {} ORDER BY id LIMIT ?{} OFFSET ?{}",
            where_clause,
            param_values.len() - 1,
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&query_sql)?;
        let rows: Vec<JobRow> = stmt
            .query_map(params_ref.as_slice(), JobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    })
}

/// Lists jobs posted by a user.
pub fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<JobRow>, DatabaseError> {
    let (rows, _) = query(
        db,
        &JobFilter {
            created_by: Some(user_id),
            ..Default::default()
        },
    )?;
    Ok(rows)
}

pub fn list_for_organisation(
    db: &Database,
    organisation_id: i64,
) -> Result<Vec<JobRow>, DatabaseError> {
    let (rows, _) = query(
        db,
        &JobFilter {
            organisation_id: Some(organisation_id),
            ..Default::default()
        },
    )?;
    Ok(rows)
}

pub fn list_for_category(db: &Database, category_id: i64) -> Result<Vec<JobRow>, DatabaseError> {
    let (rows, _) = query(
        db,
        &JobFilter {
            category_id: Some(category_id),
            ..Default::default()
        },
    )?;
    Ok(rows)
}

/// Saves every mutable column. The creator is left unchanged. Returns
/// `false` when no job has that id.
pub fn update(db: &Database, job: &JobRow) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let updated = conn.execute(
            "UPDATE jobs SET organisation_id=?2, category_id=?3, title=?4, description=?5,
             allow_comments=?6, start_accepting_applications_at=?7,
             stop_accepting_applications_at=?8, employment_term=?9, seniority_level=?10,
             location=?11
             WHERE id=?1",
            params![
                job.id,
                job.organisation_id,
                job.category_id,
                job.title,
                job.description,
                job.allow_comments,
                job.start_accepting_applications_at,
                job.stop_accepting_applications_at,
                job.employment_term,
                job.seniority_level,
                job.location,
            ],
        )?;
        Ok(updated > 0)
    })
}

/// Deletes a job and, by cascade, its comments and applications.
pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let deleted = conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::organisation_repo;
    use crate::db::test_support::{fixture, sample_job};
    use crate::db::{job_category_repo, IntegrityKind};

    #[test]
    fn test_insert_applies_defaults() {
        let f = fixture();
        let job = insert(&f.db, &sample_job(&f, "Backend Engineer")).unwrap();

        assert!(job.allow_comments);
        assert_eq!(job.location, "");
        assert_eq!(find_by_id(&f.db, job.id).unwrap(), Some(job));
    }

    #[test]
    fn test_insert_with_comments_disabled() {
        let f = fixture();
        let mut new = sample_job(&f, "Quiet Role");
        new.allow_comments = Some(false);
        new.location = "Remote".to_string();
        let job = insert(&f.db, &new).unwrap();

        assert!(!job.allow_comments);
        assert_eq!(job.location, "Remote");
    }

    #[test]
    fn test_unknown_organisation_rejected() {
        let f = fixture();
        let mut new = sample_job(&f, "Ghost Role");
        new.organisation_id = 999;
        let err = insert(&f.db, &new).unwrap_err();
        assert_eq!(err.integrity_kind(), Some(IntegrityKind::ForeignKey));
    }

    #[test]
    fn test_query_with_filters_and_pagination() {
        let f = fixture();
        let design = job_category_repo::insert(&f.db, "Design").unwrap().id;
        for i in 0..5 {
            insert(&f.db, &sample_job(&f, &format!("Engineer {}", i))).unwrap();
        }
        let mut new = sample_job(&f, "Designer");
        new.category_id = design;
        insert(&f.db, &new).unwrap();

        let (rows, total) = query(&f.db, &JobFilter::default()).unwrap();
        assert_eq!(total, 6);
        assert_eq!(rows.len(), 6);

        let (rows, total) = query(
            &f.db,
            &JobFilter {
                category_id: Some(f.category_id),
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(total, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Engineer 1");

        assert_eq!(list_for_category(&f.db, design).unwrap().len(), 1);
        assert_eq!(list_for_organisation(&f.db, f.organisation_id).unwrap().len(), 6);
        assert_eq!(list_for_user(&f.db, f.user_id).unwrap().len(), 6);
    }

    #[test]
    fn test_update() {
        let f = fixture();
        let mut job = insert(&f.db, &sample_job(&f, "Engineer")).unwrap();
        job.title = "Senior Engineer".to_string();
        job.seniority_level = "Senior".to_string();
        job.allow_comments = false;
        assert!(update(&f.db, &job).unwrap());

        let mut missing = job.clone();
        missing.id = 9999;
        assert!(!update(&f.db, &missing).unwrap());

        assert_eq!(find_by_id(&f.db, job.id).unwrap().unwrap(), job);
    }

    #[test]
    fn test_deleting_organisation_removes_jobs() {
        let f = fixture();
        let job = insert(&f.db, &sample_job(&f, "Engineer")).unwrap();
        organisation_repo::delete(&f.db, f.organisation_id).unwrap();
        assert!(find_by_id(&f.db, job.id).unwrap().is_none());
    }

    #[test]
    fn test_deleting_category_removes_jobs() {
        let f = fixture();
        let job = insert(&f.db, &sample_job(&f, "Engineer")).unwrap();
        assert!(job_category_repo::delete(&f.db, f.category_id).unwrap());
        assert!(find_by_id(&f.db, job.id).unwrap().is_none());
        assert!(list_for_user(&f.db, f.user_id).unwrap().is_empty());
    }

    #[test]
    fn test_query_with_oversized_paging() {
        let f = fixture();
        for i in 0..3 {
            insert(&f.db, &sample_job(&f, &format!("Engineer {}", i))).unwrap();
        }

        let (rows, total) = query(
            &f.db,
            &JobFilter {
                limit: Some(u64::MAX),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!((rows.len(), total), (3, 3));

        let (rows, total) = query(
            &f.db,
            &JobFilter {
                offset: Some(u64::MAX),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 3);
    }
}
