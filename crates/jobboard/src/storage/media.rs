use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Upload directory template for CV files.
pub const CV_UPLOAD_TO: &str = "cvs/%Y/%m/%d/";
/// Upload directory template for resume files.
pub const RESUME_UPLOAD_TO: &str = "resumes/%Y/%m/%d/";
/// Upload directory template for organisation logos.
pub const LOGO_UPLOAD_TO: &str = "logos/%Y/%m/%d/";

/// Longest reference a file column accepts.
pub const MAX_REFERENCE_LENGTH: usize = 255;

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// An uploaded file: the client-side name and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A stored file, as a `/`-separated path relative to the media root.
///
/// This is the value persisted in file columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToSql for FileRef {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for FileRef {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(FileRef)
    }
}

/// Stores uploaded media under a root directory.
///
/// Files are created exclusively, so a name collision produces
/// `name_2.ext`, `name_3.ext`, ... instead of overwriting.
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores `upload` under `upload_to` expanded for the current date.
    pub fn save(&self, upload_to: &str, upload: &Upload) -> Result<FileRef, StorageError> {
        self.save_at(upload_to, upload, Utc::now())
    }

    /// Stores `upload` under `upload_to` expanded with `strftime` for `date`.
    pub fn save_at(
        &self,
        upload_to: &str,
        upload: &Upload,
        date: DateTime<Utc>,
    ) -> Result<FileRef, StorageError> {
        let relative_directory = expand_upload_to(upload_to, date)?;
        let filename = valid_filename(&upload.filename);

        let name_budget = if relative_directory.is_empty() {
            MAX_REFERENCE_LENGTH
        } else {
            MAX_REFERENCE_LENGTH.saturating_sub(relative_directory.len() + 1)
        };
        if name_budget == 0 {
            return Err(StorageError::InvalidTemplate(upload_to.to_string()));
        }

        let dir_path = self.resolve(&relative_directory)?;
        self.ensure_directory(&dir_path)?;

        let stored_name =
            self.store_with_atomic_creation(&dir_path, &filename, name_budget, &upload.content)?;
        let name = if relative_directory.is_empty() {
            stored_name
        } else {
            format!("{}/{}", relative_directory, stored_name)
        };

        log::debug!("Stored {} bytes as {}", upload.content.len(), name);
        Ok(FileRef(name))
    }

    /// Reads a stored file back.
    pub fn open(&self, file: &FileRef) -> Result<Vec<u8>, StorageError> {
        let path = self.path(file)?;
        std::fs::read(&path).map_err(|e| StorageError::ReadFile { path, source: e })
    }

    /// Removes a stored file. Returns `false` if it was already gone.
    pub fn delete(&self, file: &FileRef) -> Result<bool, StorageError> {
        let path = self.path(file)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFile { path, source: e }),
        }
    }

    pub fn exists(&self, file: &FileRef) -> Result<bool, StorageError> {
        Ok(self.path(file)?.is_file())
    }

    /// Absolute path of a stored file. References escaping the root are rejected.
    pub fn path(&self, file: &FileRef) -> Result<PathBuf, StorageError> {
        self.resolve(file.as_str())
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let relative_path = Path::new(relative);
        let safe = relative_path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(StorageError::InvalidReference(relative.to_string()));
        }
        Ok(self.root.join(relative_path))
    }

    /// Creates `filename` (or the first free numbered variant) in `dir_path`
    /// and writes `content`. Returns the name actually used, which is at most
    /// `max_len` bytes long.
    fn store_with_atomic_creation(
        &self,
        dir_path: &Path,
        filename: &str,
        max_len: usize,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let (base, ext) = match filename.rfind('.') {
            Some(dot_pos) if dot_pos > 0 => (&filename[..dot_pos], &filename[dot_pos..]),
            _ => (filename, ""),
        };

        for counter in 1..=MAX_NAME_ATTEMPTS {
            let suffix = if counter == 1 {
                String::new()
            } else {
                format!("_{}", counter)
            };
            let try_filename = fit_name(base, &suffix, ext, max_len);
            let try_path = dir_path.join(&try_filename);

            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&try_path)
            {
                Ok(file) => {
                    write_new_file(file, &try_path, content)?;
                    return Ok(try_filename);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::WriteFile {
                        path: try_path,
                        source: e,
                    });
                }
            }
        }

        Err(StorageError::FileExists(dir_path.join(filename)))
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), StorageError> {
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Expands a `strftime` template such as `cvs/%Y/%m/%d/` for `date`,
/// without leading or trailing slashes.
pub fn expand_upload_to(upload_to: &str, date: DateTime<Utc>) -> Result<String, StorageError> {
    let mut expanded = String::new();
    write!(expanded, "{}", date.format(upload_to))
        .map_err(|_| StorageError::InvalidTemplate(upload_to.to_string()))?;
    Ok(expanded.trim_matches('/').to_string())
}

/// Writes `content` into a freshly created file. A failed write removes the
/// partial file.
fn write_new_file(mut file: impl std::io::Write, path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Err(e) = file.write_all(content).and_then(|()| file.flush()) {
        drop(file);
        if let Err(remove_err) = std::fs::remove_file(path) {
            log::warn!("Failed to remove partial file {}: {}", path.display(), remove_err);
        }
        return Err(StorageError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

/// Joins `base`, `suffix` and `ext`, shortening `base` (then the whole name)
/// so the result fits in `max_len` bytes.
fn fit_name(base: &str, suffix: &str, ext: &str, max_len: usize) -> String {
    let fixed = suffix.len() + ext.len();
    let base = truncate_at_char_boundary(base, max_len.saturating_sub(fixed).max(1));
    let name = format!("{}{}{}", base, suffix, ext);
    truncate_at_char_boundary(&name, max_len).to_string()
}

fn truncate_at_char_boundary(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Reduces a client-supplied name to a safe single path segment.
fn valid_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let cleaned: String = last
        .chars()
        .map(|c| match c {
            ' ' => '_',
            c if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') => c,
            _ => '_',
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
