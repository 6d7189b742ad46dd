//! Filesystem-backed object and key-value stores
//!
//! Local reference implementations of the storage capabilities: objects
//! land as plain files under a bucket directory, records as one JSON
//! document per key under a collection directory. Collections are created
//! explicitly; a put against a missing collection is a persistence
//! failure, mirroring a missing table in a managed store.

use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::KeyValueStore;
use super::ObjectStore;
use crate::errors::PhotoSageError;
use crate::errors::Result;
use crate::models::ObjectRef;

/// Object store writing bytes under `<root>/<bucket>/`
pub struct FsObjectStore {
    root: PathBuf,
    bucket: String,
}

impl FsObjectStore {
    #[must_use]
    pub fn new(root: impl AsRef<Path>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            bucket: bucket.into(),
        }
    }

    fn extension_for(content_type: &str) -> &'static str {
        match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            _ => "bin",
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, bytes: &[u8], content_type: &str) -> Result<ObjectRef> {
        let key = format!(
            "uploads/{}.{}",
            Uuid::new_v4(),
            Self::extension_for(content_type)
        );
        let path = self.root.join(&self.bucket).join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PhotoSageError::CapabilityUnavailable(e.to_string()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PhotoSageError::CapabilityUnavailable(e.to_string()))?;

        debug!("Stored {} bytes at {}/{}", bytes.len(), self.bucket, key);
        Ok(ObjectRef::new(self.bucket.clone(), key))
    }
}

/// Key-value store writing one JSON document per key under
/// `<root>/collections/<collection>/`
pub struct FsKeyValueStore {
    root: PathBuf,
}

impl FsKeyValueStore {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join("collections").join(collection)
    }

    /// Create a collection so subsequent puts succeed
    pub async fn create_collection(&self, collection: &str) -> Result<()> {
        tokio::fs::create_dir_all(self.collection_dir(collection))
            .await
            .map_err(|e| PhotoSageError::PersistenceFailure(e.to_string()))?;
        Ok(())
    }

    // Keys may carry path separators ("uploads/<uuid>.jpg"); flatten them
    // so every record stays directly inside its collection directory.
    fn file_name_for(key: &str) -> String {
        format!("{}.json", key.replace(['/', '\\'], "_"))
    }
}

#[async_trait]
impl KeyValueStore for FsKeyValueStore {
    async fn put(&self, collection: &str, key: &str, record: serde_json::Value) -> Result<()> {
        let dir = self.collection_dir(collection);
        if !dir.is_dir() {
            return Err(PhotoSageError::PersistenceFailure(format!(
                "collection does not exist: {collection}"
            )));
        }

        let path = dir.join(Self::file_name_for(key));
        let body = serde_json::to_vec_pretty(&record)?;

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| PhotoSageError::PersistenceFailure(e.to_string()))?;

        debug!("Persisted record {} into {}", key, collection);
        Ok(())
    }

    async fn scan(&self, collection: &str) -> Result<Vec<serde_json::Value>> {
        let dir = self.collection_dir(collection);
        if !dir.is_dir() {
            return Err(PhotoSageError::PersistenceFailure(format!(
                "collection does not exist: {collection}"
            )));
        }

        // Directory order is platform-dependent; sort by file name so scans
        // are stable across runs.
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| PhotoSageError::PersistenceFailure(e.to_string()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PhotoSageError::PersistenceFailure(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                names.push(path);
            }
        }
        names.sort();

        let mut records = Vec::with_capacity(names.len());
        for path in names {
            let body = tokio::fs::read(&path)
                .await
                .map_err(|e| PhotoSageError::PersistenceFailure(e.to_string()))?;
            records.push(serde_json::from_slice(&body)?);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_object_store_put_returns_unique_refs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), "photos");

        let first = store.put(b"fake jpeg", "image/jpeg").await.unwrap();
        let second = store.put(b"fake jpeg", "image/jpeg").await.unwrap();

        assert_eq!(first.bucket, "photos");
        assert!(first.key.starts_with("uploads/"));
        assert!(first.key.ends_with(".jpg"));
        assert_ne!(first.key, second.key);

        let on_disk = dir.path().join("photos").join(&first.key);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"fake jpeg");
    }

    #[tokio::test]
    async fn test_kv_put_requires_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsKeyValueStore::new(dir.path());

        let record = serde_json::json!({"description": "A dog."});
        let result = store.put("missing", "k1", record.clone()).await;
        assert!(matches!(
            result,
            Err(PhotoSageError::PersistenceFailure(_))
        ));

        store.create_collection("records").await.unwrap();
        store.put("records", "k1", record).await.unwrap();

        let scanned = store.scan("records").await.unwrap();
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0]["description"], "A dog.");
    }

    #[tokio::test]
    async fn test_kv_scan_is_stable_and_flattens_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsKeyValueStore::new(dir.path());
        store.create_collection("records").await.unwrap();

        store
            .put("records", "uploads/b.jpg", serde_json::json!({"n": 2}))
            .await
            .unwrap();
        store
            .put("records", "uploads/a.jpg", serde_json::json!({"n": 1}))
            .await
            .unwrap();

        let scanned = store.scan("records").await.unwrap();
        assert_eq!(scanned.len(), 2);
        // Sorted by flattened file name, not insertion order
        assert_eq!(scanned[0]["n"], 1);
        assert_eq!(scanned[1]["n"], 2);
    }
}
