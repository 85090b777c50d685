//! Binary upload delegate.
//!
//! The attachment store hands each payload to an [`UploadDelegate`] and keeps
//! only the retrievable URL it gets back. [`ObjectStoreUploader`] writes to
//! any `object_store` backend; the CLI uses the local filesystem and tests
//! use the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use expensa_config::{UploadBackend, UploadConfig};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use crate::error::UploadError;

/// A file as handed over by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Stores a binary payload and returns a URL it can be fetched from.
///
/// Failures are surfaced verbatim; callers must not create or mutate any
/// row when this fails.
#[async_trait]
pub trait UploadDelegate: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<String, UploadError>;
}

/// [`UploadDelegate`] backed by an `object_store` implementation.
pub struct ObjectStoreUploader {
    store: Arc<dyn ObjectStore>,
    base_url: String,
}

impl ObjectStoreUploader {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn in_memory(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), base_url)
    }

    /// Write under a local directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if the directory cannot be created or opened.
    pub fn local(root: &str, base_url: impl Into<String>) -> Result<Self, UploadError> {
        std::fs::create_dir_all(root)
            .map_err(|e| UploadError::Rejected(format!("cannot create {root}: {e}")))?;
        let fs = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(fs), base_url))
    }

    /// Build the uploader described by the `[uploads]` config section.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if the local backend cannot be opened.
    pub fn from_config(config: &UploadConfig) -> Result<Self, UploadError> {
        match config.backend {
            UploadBackend::Local => Self::local(&config.root, config.base_url()),
            UploadBackend::Memory => Ok(Self::in_memory(config.base_url())),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

fn object_key(name: &str) -> String {
    format!(
        "attachments/{}-{}",
        Utc::now().timestamp_micros(),
        sanitize_name(name)
    )
}

#[async_trait]
impl UploadDelegate for ObjectStoreUploader {
    async fn upload(&self, file: &UploadFile) -> Result<String, UploadError> {
        if file.name.trim().is_empty() {
            return Err(UploadError::Rejected("file name is empty".into()));
        }
        let key = object_key(&file.name);
        let location = ObjectPath::from(key.as_str());
        self.store
            .put(&location, PutPayload::from(file.bytes.clone()))
            .await?;
        tracing::debug!(key = %key, size = file.bytes.len(), "stored upload");
        Ok(format!("{}/{key}", self.base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_name("hotel receipt (1).pdf"), "hotel_receipt__1_.pdf");
        assert_eq!(sanitize_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_name("..."), "file");
        assert_eq!(sanitize_name("nota-fiscal_02.PNG"), "nota-fiscal_02.PNG");
    }

    #[tokio::test]
    async fn memory_upload_returns_prefixed_url() {
        let uploader = ObjectStoreUploader::in_memory("memory://expensa/");
        let url = uploader
            .upload(&UploadFile::new("a b.pdf", "application/pdf", b"%PDF".to_vec()))
            .await
            .unwrap();
        assert!(url.starts_with("memory://expensa/attachments/"), "{url}");
        assert!(url.ends_with("-a_b.pdf"), "{url}");
    }

    #[tokio::test]
    async fn local_upload_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        let root = root.to_str().unwrap();
        let uploader = ObjectStoreUploader::local(root, "https://files.example.gov").unwrap();

        let url = uploader
            .upload(&UploadFile::new("note.txt", "text/plain", b"hello".to_vec()))
            .await
            .unwrap();
        let key = url.strip_prefix("https://files.example.gov/").unwrap();
        let written = std::fs::read(std::path::Path::new(root).join(key)).unwrap();
        assert_eq!(written, b"hello");
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let uploader = ObjectStoreUploader::in_memory("memory://expensa");
        let err = uploader
            .upload(&UploadFile::new(" ", "text/plain", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Rejected(_)));
    }
}
