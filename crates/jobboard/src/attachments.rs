//! Records that carry uploaded files: CV/resume sets and organisation logos.
//!
//! Files are written first, then the row referencing them. If the row is
//! rejected the files written for it are removed again.

use crate::db::cv_resume_repo::{self, CvResumeRow, NewCvResume};
use crate::db::organisation_repo::{self, NewOrganisation, OrganisationRow};
use crate::db::Database;
use crate::error::{JobBoardError, Result};
use crate::storage::{FileRef, MediaStorage, Upload, CV_UPLOAD_TO, LOGO_UPLOAD_TO, RESUME_UPLOAD_TO};

/// Stores the provided CV and/or resume and creates the record.
pub fn create_cv_resume(
    db: &Database,
    storage: &MediaStorage,
    user_id: i64,
    cv: Option<&Upload>,
    resume: Option<&Upload>,
) -> Result<CvResumeRow> {
    let mut stored = Vec::new();

    let cv = store_optional(storage, CV_UPLOAD_TO, cv, &mut stored)?;
    let resume = match store_optional(storage, RESUME_UPLOAD_TO, resume, &mut stored) {
        Ok(file) => file,
        Err(e) => {
            discard(storage, &stored);
            return Err(e);
        }
    };

    let new = NewCvResume {
        user_id,
        cv,
        resume,
    };
    cv_resume_repo::insert(db, &new).map_err(|e| {
        discard(storage, &stored);
        JobBoardError::from(e)
    })
}

/// Stores the optional logo and creates the organisation.
pub fn create_organisation(
    db: &Database,
    storage: &MediaStorage,
    user_id: i64,
    name: &str,
    description: &str,
    logo: Option<&Upload>,
) -> Result<OrganisationRow> {
    let mut stored = Vec::new();
    let logo = store_optional(storage, LOGO_UPLOAD_TO, logo, &mut stored)?;

    let new = NewOrganisation {
        user_id,
        logo,
        name: name.to_string(),
        description: description.to_string(),
    };
    organisation_repo::insert(db, &new).map_err(|e| {
        discard(storage, &stored);
        JobBoardError::from(e)
    })
}

/// Reads the bytes behind a file column.
pub fn read_attachment(storage: &MediaStorage, file: &FileRef) -> Result<Vec<u8>> {
    Ok(storage.open(file)?)
}

fn store_optional(
    storage: &MediaStorage,
    upload_to: &str,
    upload: Option<&Upload>,
    stored: &mut Vec<FileRef>,
) -> Result<Option<FileRef>> {
    let Some(upload) = upload else {
        return Ok(None);
    };
    let file = storage.save(upload_to, upload)?;
    stored.push(file.clone());
    Ok(Some(file))
}

fn discard(storage: &MediaStorage, files: &[FileRef]) {
    for file in files {
        match storage.delete(file) {
            Ok(_) => log::info!("Removed {} after failed insert", file),
            Err(e) => log::warn!("Failed to remove {} after failed insert: {}", file, e),
        }
    }
}
