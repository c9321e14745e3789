//! Durable slot backends for the document collection

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use super::document::Document;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("stored documents are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to serialize documents: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Persistence backend holding the serialized collection
pub trait StorageBackend: Send + Sync {
    /// Load the collection; `Ok(None)` when the slot has never been written
    fn load(&self) -> Result<Option<Vec<Document>>, StorageError>;

    /// Replace the slot with the given collection
    fn save(&self, documents: &[Document]) -> Result<(), StorageError>;
}

fn parse(raw: &str) -> Result<Vec<Document>, StorageError> {
    serde_json::from_str(raw).map_err(StorageError::Corrupt)
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Vec<Document>>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse(&raw).map(Some)
    }

    fn save(&self, documents: &[Document]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(documents).map_err(StorageError::Serialize)?;

        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!("Wrote {} documents to {}", documents.len(), self.path.display());
        Ok(())
    }
}

/// In-memory slot holding the raw serialized text
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with arbitrary slot contents, corrupt or not
    #[cfg(test)]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw slot contents
    #[cfg(test)]
    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<Document>>, StorageError> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_deref().map(parse).transpose()
    }

    fn save(&self, documents: &[Document]) -> Result<(), StorageError> {
        let json = serde_json::to_string(documents).map_err(StorageError::Serialize)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);
        Ok(())
    }
}
