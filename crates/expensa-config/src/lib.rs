//! # expensa-config
//!
//! Layered configuration loading for Expensa using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EXPENSA_*` prefix, `__` as separator)
//! 2. Project-level `.expensa/config.toml`
//! 3. User-level `~/.config/expensa/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `EXPENSA_DATABASE__PATH` -> `database.path`,
//! `EXPENSA_AUDIT__SYSTEM_DOMAIN` -> `audit.system_domain`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use expensa_config::ExpensaConfig;
//!
//! let config = ExpensaConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod actor;
mod audit;
mod database;
mod error;
mod general;
mod uploads;

pub use actor::ActorConfig;
pub use audit::AuditConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use uploads::{UploadBackend, UploadConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExpensaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub actor: ActorConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ExpensaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a section is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.uploads.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory
    /// (or the workspace root when run under cargo).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a section is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".expensa/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("EXPENSA_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("expensa").join("config.toml"))
    }

    /// Walks up from `CARGO_MANIFEST_DIR` (at most 3 levels) looking for a
    /// `.env`, then falls back to the current directory. Missing files are
    /// not an error.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
