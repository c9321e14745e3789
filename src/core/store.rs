//! Authoritative document collection with persistence and change broadcast

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use uuid::Uuid;

use super::document::{seed_documents, Document, DocumentPatch, DocumentType};
use super::storage::{StorageBackend, StorageError};

/// Number of characters of an imported file kept in the document preview
pub const IMPORT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist documents")]
    Persist(#[source] StorageError),
    #[error("error reading file {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Time source for document timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The document store.
///
/// Every operation runs as one critical section over the collection. Mutations
/// are written to the backend before they become visible; subscribers then
/// receive the full new snapshot.
pub struct DocumentStore {
    documents: Mutex<Vec<Document>>,
    backend: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    snapshot: watch::Sender<Vec<Document>>,
}

impl DocumentStore {
    /// Open the store over `backend`, falling back to the seed collection
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        Self::with_clock(backend, Box::new(SystemClock))
    }

    pub fn with_clock(backend: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        let documents = match backend.load() {
            Ok(Some(documents)) => {
                tracing::info!("Loaded {} documents from storage", documents.len());
                documents
            }
            Ok(None) => {
                tracing::info!("No stored documents, using sample documents");
                seed_documents()
            }
            Err(e) => {
                tracing::warn!("Error loading documents from storage: {}", e);
                seed_documents()
            }
        };

        let (snapshot, _) = watch::channel(documents.clone());
        Self {
            documents: Mutex::new(documents),
            backend,
            clock,
            snapshot,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Document>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist `next`, then make it the current collection
    fn commit(
        &self,
        current: &mut MutexGuard<'_, Vec<Document>>,
        next: Vec<Document>,
    ) -> Result<(), StoreError> {
        self.backend.save(&next).map_err(StoreError::Persist)?;
        **current = next;
        self.snapshot.send_replace(current.clone());
        Ok(())
    }

    /// Snapshot of all documents
    pub fn list(&self) -> Vec<Document> {
        self.lock().clone()
    }

    /// Receive every new snapshot after a successful mutation
    pub fn subscribe(&self) -> watch::Receiver<Vec<Document>> {
        self.snapshot.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.lock().iter().find(|doc| doc.id == id).cloned()
    }

    /// Create a document from `patch`, defaulting name and type
    pub fn create(&self, patch: DocumentPatch) -> Result<Document, StoreError> {
        let now = self.clock.now();
        let document = Document {
            id: Uuid::new_v4().simple().to_string(),
            name: patch.name.unwrap_or_else(|| "Untitled".to_string()),
            doc_type: patch.doc_type.unwrap_or_default(),
            content: patch.content.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let mut current = self.lock();
        let mut next = current.clone();
        next.push(document.clone());
        self.commit(&mut current, next)?;

        tracing::info!("Created document {} ({})", document.id, document.name);
        Ok(document)
    }

    /// Merge `patch` into the document with `id`; `Ok(None)` if there is none
    pub fn update(&self, id: &str, patch: DocumentPatch) -> Result<Option<Document>, StoreError> {
        let mut current = self.lock();
        let Some(index) = current.iter().position(|doc| doc.id == id) else {
            tracing::debug!("Update of unknown document {}", id);
            return Ok(None);
        };

        let original = &current[index];
        let updated = patch.apply(original, self.next_stamp(original.updated_at));

        let mut next = current.clone();
        next[index] = updated.clone();
        self.commit(&mut current, next)?;

        tracing::info!("Updated document {}", id);
        Ok(Some(updated))
    }

    /// Remove the document with `id`; absent ids are not an error
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut current = self.lock();
        let next: Vec<Document> = current.iter().filter(|doc| doc.id != id).cloned().collect();
        let removed = next.len() != current.len();
        self.commit(&mut current, next)?;

        if removed {
            tracing::info!("Deleted document {}", id);
        }
        Ok(())
    }

    /// Read a file and create a document holding a short preview of it
    pub async fn import_file(
        &self,
        path: &Path,
        doc_type: DocumentType,
    ) -> Result<Document, StoreError> {
        let read_err = |source| StoreError::FileRead {
            path: path.to_path_buf(),
            source,
        };

        // A char is at most four bytes, so this prefix always covers the preview
        let limit = (IMPORT_PREVIEW_CHARS * 4) as u64;
        let file = tokio::fs::File::open(path).await.map_err(read_err)?;
        let mut bytes = Vec::new();
        file.take(limit)
            .read_to_end(&mut bytes)
            .await
            .map_err(read_err)?;

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());

        let text = String::from_utf8_lossy(&bytes);
        let content = import_preview(&file_name, &text);

        self.create(
            DocumentPatch::new()
                .name(file_name)
                .doc_type(doc_type)
                .content(content),
        )
    }

    /// A timestamp strictly after `previous`
    fn next_stamp(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.clock.now();
        if now > previous {
            now
        } else {
            previous + TimeDelta::milliseconds(1)
        }
    }
}

fn import_preview(file_name: &str, text: &str) -> String {
    let snippet: String = text.chars().take(IMPORT_PREVIEW_CHARS).collect();
    format!("File uploaded: {file_name}\n\n{snippet}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryBackend;
    use std::sync::Arc;

    /// Backend sharing its slot with the test
    struct SharedBackend(Arc<MemoryBackend>);

    impl StorageBackend for SharedBackend {
        fn load(&self) -> Result<Option<Vec<Document>>, StorageError> {
            self.0.load()
        }

        fn save(&self, documents: &[Document]) -> Result<(), StorageError> {
            self.0.save(documents)
        }
    }

    struct FailingBackend;

    impl StorageBackend for FailingBackend {
        fn load(&self) -> Result<Option<Vec<Document>>, StorageError> {
            Ok(None)
        }

        fn save(&self, _documents: &[Document]) -> Result<(), StorageError> {
            Err(StorageError::Write {
                path: PathBuf::from("documents.json"),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    /// Clock frozen at one instant
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn store_with_slot(raw: Option<&str>) -> (DocumentStore, Arc<MemoryBackend>) {
        let slot = Arc::new(match raw {
            Some(raw) => MemoryBackend::with_raw(raw),
            None => MemoryBackend::new(),
        });
        let store = DocumentStore::open(Box::new(SharedBackend(slot.clone())));
        (store, slot)
    }

    fn assert_slot_matches(store: &DocumentStore, slot: &MemoryBackend) {
        let persisted = slot.raw().unwrap();
        assert_eq!(persisted, serde_json::to_string(&store.list()).unwrap());
    }

    #[test]
    fn test_empty_slot_uses_seed() {
        let (store, slot) = store_with_slot(None);
        assert_eq!(store.list(), seed_documents());
        assert!(slot.raw().is_none());
    }

    #[test]
    fn test_corrupt_slot_falls_back_to_seed() {
        let (store, _slot) = store_with_slot(Some("{not json"));
        assert_eq!(store.list(), seed_documents());

        store.create(DocumentPatch::new().name("X")).unwrap();
        let docs = store.list();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[2].name, "X");
    }

    #[test]
    fn test_slot_tracks_every_mutation() {
        let (store, slot) = store_with_slot(None);

        let a = store.create(DocumentPatch::new().name("A")).unwrap();
        assert_slot_matches(&store, &slot);

        store
            .update(&a.id, DocumentPatch::new().content("body"))
            .unwrap()
            .unwrap();
        assert_slot_matches(&store, &slot);

        store.delete("1").unwrap();
        assert_slot_matches(&store, &slot);

        store.delete("missing").unwrap();
        assert_slot_matches(&store, &slot);
    }

    #[test]
    fn test_create_defaults_and_timestamps() {
        let (store, _slot) = store_with_slot(None);
        let a = store.create(DocumentPatch::new()).unwrap();
        let b = store.create(DocumentPatch::new()).unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Untitled");
        assert_eq!(a.doc_type, DocumentType::Pdf);
        assert_eq!(a.content, "");
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_empty_patch_only_bumps_updated_at() {
        let clock_time = Utc::now();
        let store = DocumentStore::with_clock(
            Box::new(MemoryBackend::new()),
            Box::new(FixedClock(clock_time)),
        );
        let created = store.create(DocumentPatch::new().name("Doc")).unwrap();

        let updated = store
            .update(&created.id, DocumentPatch::new())
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.doc_type, created.doc_type);
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn test_update_missing_is_none() {
        let (store, slot) = store_with_slot(None);
        let before = store.list();

        let result = store.update("nope", DocumentPatch::new().name("x")).unwrap();

        assert!(result.is_none());
        assert_eq!(store.list(), before);
        assert!(slot.raw().is_none());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (store, _slot) = store_with_slot(None);
        let before = store.list();
        store.delete("nope").unwrap();
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_get() {
        let (store, _slot) = store_with_slot(None);
        assert_eq!(store.get("2").unwrap().name, "Sample Word Document");
        assert!(store.get("3").is_none());
    }

    #[test]
    fn test_failed_save_changes_nothing() {
        let store = DocumentStore::open(Box::new(FailingBackend));
        let before = store.list();

        let err = store.create(DocumentPatch::new().name("X")).unwrap_err();

        assert!(matches!(err, StoreError::Persist(_)));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_subscribers_see_latest_snapshot() {
        let (store, _slot) = store_with_slot(None);
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.create(DocumentPatch::new().name("one")).unwrap();
        store.create(DocumentPatch::new().name("two")).unwrap();

        assert!(rx.has_changed().unwrap());
        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest, store.list());
        assert_eq!(latest.len(), 4);
    }

    #[tokio::test]
    async fn test_import_file_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "x".repeat(500)).unwrap();

        let (store, _slot) = store_with_slot(None);
        let doc = store.import_file(&path, DocumentType::Doc).await.unwrap();

        assert_eq!(doc.name, "notes.txt");
        assert_eq!(doc.doc_type, DocumentType::Doc);
        let expected = format!("File uploaded: notes.txt\n\n{}...", "x".repeat(200));
        assert_eq!(doc.content, expected);
        assert_eq!(store.list().len(), 3);
    }

    #[tokio::test]
    async fn test_import_large_file_reads_prefix_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        let mut body = "\u{1F600}".repeat(250);
        body.push_str(&"tail".repeat(100_000));
        std::fs::write(&path, body).unwrap();

        let (store, _slot) = store_with_slot(None);
        let doc = store.import_file(&path, DocumentType::Pdf).await.unwrap();

        let expected = format!("File uploaded: big.txt\n\n{}...", "\u{1F600}".repeat(200));
        assert_eq!(doc.content, expected);
    }

    #[tokio::test]
    async fn test_import_missing_file_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _slot) = store_with_slot(None);

        let err = store
            .import_file(&dir.path().join("absent.txt"), DocumentType::Pdf)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::FileRead { .. }));
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_import_preview_counts_chars() {
        let text = "é".repeat(300);
        let preview = import_preview("a.txt", &text);
        assert!(preview.ends_with(&format!("{}...", "é".repeat(200))));
    }
}
