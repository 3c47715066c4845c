pub mod accounts;
pub mod attachments;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod storage;

pub use accounts::NewUser;
pub use board::JobBoard;
pub use config::{load_config, Config};
pub use db::{Database, DatabaseError, IntegrityKind};
pub use error::{ConfigError, JobBoardError, Result, StorageError};
pub use identity::{IdentityError, PasswordHasher};
pub use storage::{FileRef, MediaStorage, Upload};
