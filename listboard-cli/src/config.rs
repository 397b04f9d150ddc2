//! Layered settings for the command line.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `listboard.toml` in the working directory, or the file given by `--config`
//! 3. `LISTBOARD_*` environment variables (`LISTBOARD_DATA_DIR`, `LISTBOARD_ENVIRONMENT`, ...)

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use listboard_kanban::{Environment, User};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "listboard.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "LISTBOARD_";

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file is missing
    #[error("config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A source could not be parsed or had the wrong shape
    #[error("failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// A value parsed but is not usable
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(source: figment::Error) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Resolved command line settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory of the file database
    pub data_dir: PathBuf,
    /// Beta data is kept apart from production data
    pub environment: Environment,
    /// Email of the session user; items and tasks are stamped with it
    pub email: Option<String>,
    /// Display name of the session user
    pub user: Option<String>,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".listboard"),
            environment: Environment::default(),
            email: None,
            user: None,
            log: None,
        }
    }
}

impl Settings {
    /// Load settings from every source
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        }
        Self::from_figment(Self::figment(config_path))
    }

    /// The provider stack behind [`Settings::load`]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
    }

    /// Extract and validate settings from an arbitrary provider stack
    pub fn from_figment(figment: Figment) -> ConfigResult<Self> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "data_dir".into(),
                message: "must not be empty".into(),
            });
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ConfigError::InvalidValue {
                    key: "email".into(),
                    message: format!("'{email}' is not an email address"),
                });
            }
        }
        Ok(())
    }

    /// The signed-in user described by these settings, if any
    pub fn session_user(&self) -> Option<User> {
        let email = self.email.as_deref()?.trim().to_lowercase();
        let user = User::new(email);
        Some(match self.user.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => user.with_name(name),
            _ => user,
        })
    }
}
