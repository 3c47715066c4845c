use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Supported configuration version.
pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite file. Defaults to `~/.jobboard/data/jobboard.db`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Directory that uploaded CVs, resumes and logos are stored under.
    pub media_root: PathBuf,
    #[serde(default)]
    pub password_hashing: PasswordHashingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// A config with default settings rooted at `media_root`.
    pub fn new<P: Into<PathBuf>>(media_root: P) -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            database_path: None,
            media_root: media_root.into(),
            password_hashing: PasswordHashingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// The configured database path, falling back to the default location.
    pub fn resolved_database_path(&self) -> Option<PathBuf> {
        self.database_path
            .clone()
            .or_else(crate::db::default_database_path)
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHashingConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    argon2::Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    argon2::Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    argon2::Params::DEFAULT_P_COST
}

impl Default for PasswordHashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `info` or `jobboard=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
