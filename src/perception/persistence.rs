//! Best-effort persistence of completed descriptions

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use tracing::warn;

use crate::capabilities::KeyValueStore;
use crate::errors::Result;
use crate::models::DescriptionResult;
use crate::models::ObjectRef;
use crate::models::PersistedRecord;

/// Writer appending one [`PersistedRecord`] per analyzed image.
///
/// Failures are reported as a boolean flag, never as an error: by the
/// time a write happens the generated result has already been delivered
/// to the caller.
pub struct PersistenceWriter {
    kv_store: Arc<dyn KeyValueStore>,
    collection: String,
}

impl PersistenceWriter {
    pub fn new(kv_store: Arc<dyn KeyValueStore>, collection: impl Into<String>) -> Self {
        Self {
            kv_store,
            collection: collection.into(),
        }
    }

    /// Store the result keyed by image identity. Returns whether the
    /// write succeeded.
    pub async fn store(&self, reference: &ObjectRef, result: &DescriptionResult) -> bool {
        match self.try_store(reference, result).await {
            Ok(()) => {
                debug!("Persisted description for {}", reference.key);
                true
            }
            Err(e) => {
                warn!("Skipping persistence for {}: {}", reference.key, e);
                false
            }
        }
    }

    async fn try_store(&self, reference: &ObjectRef, result: &DescriptionResult) -> Result<()> {
        let record = PersistedRecord {
            image_id: reference.key.clone(),
            bucket: reference.bucket.clone(),
            object_key: reference.key.clone(),
            description: result.description.clone(),
            tags: result.tags.clone(),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        self.kv_store
            .put(
                &self.collection,
                &record.image_id,
                serde_json::to_value(&record)?,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::demo::DemoKeyValueStore;

    fn sample_result() -> DescriptionResult {
        DescriptionResult {
            description: "A dog in a park.".to_string(),
            tags: vec!["dog".to_string(), "park".to_string()],
        }
    }

    #[tokio::test]
    async fn test_store_writes_record_keyed_by_object_key() {
        let kv = Arc::new(DemoKeyValueStore::default());
        let writer = PersistenceWriter::new(kv.clone(), "image_descriptions");
        let reference = ObjectRef::new("photos", "uploads/a.jpg");

        assert!(writer.store(&reference, &sample_result()).await);

        let records = kv.scan("image_descriptions").await.unwrap();
        assert_eq!(records.len(), 1);
        let record: PersistedRecord = serde_json::from_value(records[0].clone()).unwrap();
        assert_eq!(record.image_id, "uploads/a.jpg");
        assert_eq!(record.bucket, "photos");
        assert_eq!(record.description, "A dog in a park.");
        assert_eq!(record.tags, vec!["dog".to_string(), "park".to_string()]);
        // Wall-clock format, e.g. "2025-01-01 12:00:00"
        assert_eq!(record.timestamp.len(), 19);
    }

    #[tokio::test]
    async fn test_store_reports_false_on_missing_collection() {
        let kv = Arc::new(DemoKeyValueStore::empty());
        let writer = PersistenceWriter::new(kv, "image_descriptions");
        let reference = ObjectRef::new("photos", "uploads/a.jpg");

        assert!(!writer.store(&reference, &sample_result()).await);
    }
}
