//! Upload delegate configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Where attachment payloads are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadBackend {
    /// Local directory under `root`.
    #[default]
    Local,
    /// Process memory; payloads vanish on exit.
    Memory,
}

fn default_root() -> String {
    ".expensa/uploads".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    #[serde(default)]
    pub backend: UploadBackend,

    /// Directory for the `local` backend.
    #[serde(default = "default_root")]
    pub root: String,

    /// Prefix of the retrievable URL handed back for every stored object.
    /// Defaults to `file://{root}` or `memory://expensa` when empty.
    #[serde(default)]
    pub public_base_url: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            backend: UploadBackend::default(),
            root: default_root(),
            public_base_url: String::new(),
        }
    }
}

impl UploadConfig {
    /// Effective URL prefix, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let base = if self.public_base_url.is_empty() {
            match self.backend {
                UploadBackend::Local => format!("file://{}", self.root),
                UploadBackend::Memory => "memory://expensa".to_string(),
            }
        } else {
            self.public_base_url.clone()
        };
        base.trim_end_matches('/').to_string()
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the local backend has no root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == UploadBackend::Local && self.root.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "uploads.root".into(),
                reason: "local upload backend needs a directory".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_falls_back_per_backend() {
        let mut cfg = UploadConfig::default();
        assert_eq!(cfg.base_url(), "file://.expensa/uploads");

        cfg.backend = UploadBackend::Memory;
        assert_eq!(cfg.base_url(), "memory://expensa");

        cfg.public_base_url = "https://files.example.gov/".into();
        assert_eq!(cfg.base_url(), "https://files.example.gov");
    }

    #[test]
    fn local_backend_requires_root() {
        let cfg = UploadConfig {
            root: " ".into(),
            ..UploadConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
