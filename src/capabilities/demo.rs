//! Deterministic in-process capabilities
//!
//! Selected by `mode = "demo"` at startup so the full pipeline runs
//! without any live endpoint, and reused by tests as predictable doubles.
//! Every implementation is pure computation or process-local memory;
//! identical inputs always produce identical outputs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::EmbeddingService;
use super::GenerativeModel;
use super::KeyValueStore;
use super::ObjectStore;
use super::VisionAnalyzer;
use crate::errors::PhotoSageError;
use crate::errors::Result;
use crate::models::DetectedEmotion;
use crate::models::DetectedFace;
use crate::models::DetectedLabel;
use crate::models::ObjectRef;
use crate::models::TextDetection;
use crate::models::TextKind;

/// Embedding dimension used by the demo capability
pub const DEMO_EMBEDDING_DIM: usize = 64;

/// Vision double returning a fixed outdoor-portrait analysis
#[derive(Default)]
pub struct DemoVision;

#[async_trait]
impl VisionAnalyzer for DemoVision {
    async fn detect_labels(
        &self,
        _reference: &ObjectRef,
        max_labels: u32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>> {
        let labels = vec![
            DetectedLabel {
                name: "Person".to_string(),
                confidence: 99.2,
            },
            DetectedLabel {
                name: "Dog".to_string(),
                confidence: 97.8,
            },
            DetectedLabel {
                name: "Park".to_string(),
                confidence: 88.4,
            },
            DetectedLabel {
                name: "Grass".to_string(),
                confidence: 84.1,
            },
            DetectedLabel {
                name: "Tree".to_string(),
                confidence: 71.5,
            },
            DetectedLabel {
                name: "Bench".to_string(),
                confidence: 64.9,
            },
        ];

        Ok(labels
            .into_iter()
            .filter(|l| l.confidence >= min_confidence)
            .take(max_labels as usize)
            .collect())
    }

    async fn detect_text(&self, _reference: &ObjectRef) -> Result<Vec<TextDetection>> {
        Ok(vec![
            TextDetection {
                text: "NO DOGS OFF LEASH".to_string(),
                kind: TextKind::Line,
            },
            TextDetection {
                text: "DOGS".to_string(),
                kind: TextKind::Word,
            },
        ])
    }

    async fn detect_faces(&self, _reference: &ObjectRef) -> Result<Vec<DetectedFace>> {
        Ok(vec![DetectedFace {
            age_low: 25,
            age_high: 35,
            gender: "Female".to_string(),
            emotions: vec![
                DetectedEmotion {
                    name: "HAPPY".to_string(),
                    confidence: 93.5,
                },
                DetectedEmotion {
                    name: "CALM".to_string(),
                    confidence: 41.0,
                },
            ],
        }])
    }
}

/// Embedding double producing a stable pseudo-random vector per text.
///
/// FNV-1a over the input seeds a per-dimension xorshift sequence, so the
/// same text always embeds to the same vector and distinct texts land far
/// apart. Dimension is fixed at [`DEMO_EMBEDDING_DIM`].
#[derive(Default)]
pub struct DemoEmbedding;

impl DemoEmbedding {
    fn hash_seed(text: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in text.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }

    fn vector_for(text: &str) -> Vec<f32> {
        let mut state = Self::hash_seed(text) | 1;
        (0..DEMO_EMBEDDING_DIM)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                // Map the top 24 bits into [-1, 1]
                let unit = (state >> 40) as f32 / 16_777_216.0;
                unit.mul_add(2.0, -1.0)
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingService for DemoEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector_for(text))
    }
}

/// Generative double returning canned completions.
///
/// Description prompts (recognized by the JSON-shape instruction) get a
/// prose-wrapped JSON payload, exercising the same extraction path the
/// live model output goes through; anything else gets a short grounded
/// answer.
#[derive(Default)]
pub struct DemoGenerative;

#[async_trait]
impl GenerativeModel for DemoGenerative {
    async fn complete(
        &self,
        prompt: &str,
        _max_tokens: usize,
        _temperature: f32,
    ) -> Result<String> {
        if prompt.contains("\"description\"") {
            Ok(concat!(
                "Here is the requested analysis: ",
                "{\"description\": \"A woman and her dog enjoy a sunny afternoon in a park. ",
                "She is smiling near a sign reminding visitors to keep dogs on a leash. ",
                "Green grass and trees fill the background.\", ",
                "\"tags\": [\"person\", \"dog\", \"park\", \"outdoors\", \"pet\", \"summer\"]}",
                " Let me know if you need anything else."
            )
            .to_string())
        } else {
            Ok("Based on the provided FAQ context, the assistant analyzes uploaded \
                photos with AI, generates descriptions and tags, and answers questions \
                from the FAQ."
                .to_string())
        }
    }
}

/// In-memory object store
#[derive(Default)]
pub struct DemoObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl ObjectStore for DemoObjectStore {
    async fn put(&self, bytes: &[u8], content_type: &str) -> Result<ObjectRef> {
        let extension = if content_type == "image/png" { "png" } else { "jpg" };
        let key = format!("uploads/{}.{extension}", Uuid::new_v4());

        let mut objects = self
            .objects
            .lock()
            .map_err(|e| PhotoSageError::CapabilityUnavailable(e.to_string()))?;
        objects.insert(key.clone(), bytes.to_vec());

        Ok(ObjectRef::new("demo-bucket", key))
    }
}

/// In-memory key-value store with the same missing-collection semantics
/// as the filesystem backend
pub struct DemoKeyValueStore {
    collections: Mutex<HashMap<String, Vec<(String, serde_json::Value)>>>,
}

impl Default for DemoKeyValueStore {
    fn default() -> Self {
        let mut collections = HashMap::new();
        collections.insert("image_descriptions".to_string(), Vec::new());
        collections.insert("faq_entries".to_string(), Vec::new());
        Self {
            collections: Mutex::new(collections),
        }
    }
}

impl DemoKeyValueStore {
    /// Start with no collections at all; every put fails
    #[must_use]
    pub fn empty() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl KeyValueStore for DemoKeyValueStore {
    async fn put(&self, collection: &str, key: &str, record: serde_json::Value) -> Result<()> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| PhotoSageError::PersistenceFailure(e.to_string()))?;

        let entries = collections.get_mut(collection).ok_or_else(|| {
            PhotoSageError::PersistenceFailure(format!(
                "collection does not exist: {collection}"
            ))
        })?;
        entries.push((key.to_string(), record));
        Ok(())
    }

    async fn scan(&self, collection: &str) -> Result<Vec<serde_json::Value>> {
        let collections = self
            .collections
            .lock()
            .map_err(|e| PhotoSageError::PersistenceFailure(e.to_string()))?;

        let entries = collections.get(collection).ok_or_else(|| {
            PhotoSageError::PersistenceFailure(format!(
                "collection does not exist: {collection}"
            ))
        })?;
        Ok(entries.iter().map(|(_, record)| record.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_embedding_is_deterministic() {
        let service = DemoEmbedding;
        let first = service.embed("are my photos stored?").await.unwrap();
        let second = service.embed("are my photos stored?").await.unwrap();
        let other = service.embed("what can I analyze?").await.unwrap();

        assert_eq!(first.len(), DEMO_EMBEDDING_DIM);
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[tokio::test]
    async fn test_demo_vision_respects_filters() {
        let vision = DemoVision;
        let reference = ObjectRef::new("demo-bucket", "uploads/x.jpg");

        let labels = vision.detect_labels(&reference, 20, 70.0).await.unwrap();
        assert!(labels.iter().all(|l| l.confidence >= 70.0));

        let capped = vision.detect_labels(&reference, 2, 70.0).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn test_demo_kv_missing_collection_fails() {
        let store = DemoKeyValueStore::empty();
        let result = store
            .put("image_descriptions", "k", serde_json::json!({}))
            .await;
        assert!(matches!(
            result,
            Err(PhotoSageError::PersistenceFailure(_))
        ));
    }
}
