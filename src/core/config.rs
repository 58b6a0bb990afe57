//! Configuration loading.
//!
//! Settings live in a TOML file under the platform config directory. Every
//! field is optional; a missing file means defaults. Credentials are never
//! read from the file: they come from the environment only, so a shared
//! config can't leak a key.

use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::persona::DEFAULT_PERSONA;
use crate::core::providers::DEFAULT_REQUEST_TIMEOUT;

pub const DEFAULT_MODEL: &str = "anthropic/claude-3-haiku";
pub const DEFAULT_PRIMARY_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SECONDARY_URL: &str =
    "https://api-inference.huggingface.co/models/HuggingFaceH4/zephyr-7b-beta";

/// Environment variable carrying the primary (chat-completion) credential.
pub const PRIMARY_API_KEY_VAR: &str = "SOLACE_PRIMARY_API_KEY";
/// Environment variable carrying the secondary (text-inference) credential.
pub const SECONDARY_API_KEY_VAR: &str = "SOLACE_SECONDARY_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Persona key used for new sessions (defaults to `friend`).
    pub persona: Option<String>,
    /// Preferred name used in the session greeting.
    pub name: Option<String>,
    /// Model identifier sent to the primary provider.
    pub model: Option<String>,
    /// Base URL of the primary chat-completion API.
    pub primary_base_url: Option<String>,
    /// Full endpoint URL of the secondary text-inference API.
    pub secondary_url: Option<String>,
    /// Per-provider request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "permacommons", "solace")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the platform config directory. A missing file
    /// is not an error; it yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn persona(&self) -> &str {
        self.persona.as_deref().unwrap_or(DEFAULT_PERSONA)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn primary_base_url(&self) -> &str {
        self.primary_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PRIMARY_BASE_URL)
    }

    pub fn secondary_url(&self) -> &str {
        self.secondary_url.as_deref().unwrap_or(DEFAULT_SECONDARY_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Credential for the primary provider, from the environment only.
pub fn primary_api_key() -> Option<String> {
    env::var(PRIMARY_API_KEY_VAR)
        .ok()
        .filter(|key| !key.is_empty())
}

/// Credential for the secondary provider, from the environment only.
pub fn secondary_api_key() -> Option<String> {
    env::var(SECONDARY_API_KEY_VAR)
        .ok()
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_cover_every_setting() {
        let config = Config::default();
        assert_eq!(config.persona(), "friend");
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.primary_base_url(), DEFAULT_PRIMARY_BASE_URL);
        assert_eq!(config.secondary_url(), DEFAULT_SECONDARY_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn file_settings_override_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "persona = \"stoic_bestie\"\nmodel = \"my/model\"\nrequest_timeout_secs = 5"
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.persona(), "stoic_bestie");
        assert_eq!(config.model(), "my/model");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        // Untouched settings keep their defaults.
        assert_eq!(config.primary_base_url(), DEFAULT_PRIMARY_BASE_URL);
    }

    #[test]
    fn invalid_toml_reports_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "persona = [not toml").unwrap();

        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn missing_file_reports_a_read_error() {
        let err = Config::load_from_path(Path::new("/nonexistent/solace-config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
