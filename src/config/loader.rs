//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::EdgeConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file.
///
/// Only reads and parses. Semantic validation runs separately (see
/// [`crate::config::validation`]) so CLI and environment overrides can be
/// applied first; the loaded value is validated exactly once, after them.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: EdgeConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    Ok(config)
}
