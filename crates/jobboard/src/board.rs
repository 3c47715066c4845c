//! `JobBoard` bundles the three collaborators every operation needs: the
//! database, media storage and the password hasher.

use std::path::Path;

use secrecy::SecretString;

use crate::accounts::{self, NewUser};
use crate::attachments;
use crate::config::Config;
use crate::db::cv_resume_repo::CvResumeRow;
use crate::db::organisation_repo::OrganisationRow;
use crate::db::profile_repo::ProfileRow;
use crate::db::user_repo::UserRow;
use crate::db::Database;
use crate::error::{ConfigError, Result};
use crate::identity::PasswordHasher;
use crate::storage::{FileRef, MediaStorage, Upload};

#[derive(Clone)]
pub struct JobBoard {
    db: Database,
    storage: std::sync::Arc<MediaStorage>,
    hasher: PasswordHasher,
}

impl JobBoard {
    /// Opens the configured database (running migrations) and media root.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config
            .resolved_database_path()
            .ok_or_else(|| ConfigError::Validation {
                message: "No database_path configured and no home directory found".to_string(),
            })?;
        let db = Database::open(&path)?;
        Self::with_database(db, config)
    }

    /// Uses an in-memory database; media still goes to `config.media_root`.
    pub fn open_in_memory(config: &Config) -> Result<Self> {
        Self::with_database(Database::open_in_memory()?, config)
    }

    fn with_database(db: Database, config: &Config) -> Result<Self> {
        let hasher = PasswordHasher::new(&config.password_hashing)?;
        log::info!("Media root at {}", config.media_root.display());
        Ok(Self {
            db,
            storage: std::sync::Arc::new(MediaStorage::new(&config.media_root)),
            hasher,
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn storage(&self) -> &MediaStorage {
        &self.storage
    }

    pub fn media_root(&self) -> &Path {
        self.storage.root()
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn create_user(&self, new: &NewUser) -> Result<UserRow> {
        accounts::create_user(&self.db, &self.hasher, new)
    }

    pub fn authenticate(&self, username: &str, password: &SecretString) -> Result<Option<UserRow>> {
        accounts::authenticate(&self.db, &self.hasher, username, password)
    }

    pub fn set_password(&self, user_id: i64, password: &SecretString) -> Result<bool> {
        accounts::set_password(&self.db, &self.hasher, user_id, password)
    }

    pub fn profile_of(&self, user_id: i64) -> Result<Option<ProfileRow>> {
        accounts::profile_of(&self.db, user_id)
    }

    pub fn create_cv_resume(
        &self,
        user_id: i64,
        cv: Option<&Upload>,
        resume: Option<&Upload>,
    ) -> Result<CvResumeRow> {
        attachments::create_cv_resume(&self.db, &self.storage, user_id, cv, resume)
    }

    pub fn create_organisation(
        &self,
        user_id: i64,
        name: &str,
        description: &str,
        logo: Option<&Upload>,
    ) -> Result<OrganisationRow> {
        attachments::create_organisation(&self.db, &self.storage, user_id, name, description, logo)
    }

    pub fn read_attachment(&self, file: &FileRef) -> Result<Vec<u8>> {
        attachments::read_attachment(&self.storage, file)
    }
}
