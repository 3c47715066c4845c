use std::path::Path;

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.media_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "media_root must not be empty".to_string(),
        });
    }

    if let Some(ref path) = config.database_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                message: "database_path must not be empty when set".to_string(),
            });
        }
    }

    let hashing = &config.password_hashing;
    if let Err(e) = argon2::Params::new(hashing.memory_kib, hashing.iterations, hashing.parallelism, None) {
        return Err(ConfigError::Validation {
            message: format!("Invalid password_hashing parameters: {}", e),
        });
    }

    if tracing_subscriber::EnvFilter::try_new(&config.logging.level).is_err() {
        return Err(ConfigError::Validation {
            message: format!("Invalid logging level directive: {}", config.logging.level),
        });
    }

    Ok(())
}
