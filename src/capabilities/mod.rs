//! External capability seams
//!
//! Everything the core consumes from the outside world lives behind the
//! traits in this module: vision analysis, text embedding, generative
//! completion, object storage and key-value persistence. Pipelines receive
//! one [`CapabilityBundle`] at construction; nothing reaches for a global
//! client. Wiring is decided once at startup from `capabilities.mode` in
//! the configuration.
//!
//! # Examples
//!
//! ```rust
//! use photosage::capabilities::CapabilityBundle;
//!
//! let bundle = CapabilityBundle::demo();
//! assert!(bundle.is_demo());
//! ```

pub mod demo;
pub mod embedding;
pub mod generative;
pub mod store;
pub mod vision;

pub use embedding::EmbeddingClient;
pub use generative::GenerativeClient;
pub use store::FsKeyValueStore;
pub use store::FsObjectStore;
pub use vision::HttpVisionClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::config::CapabilityMode;
use crate::errors::Result;
use crate::models::DetectedFace;
use crate::models::DetectedLabel;
use crate::models::ObjectRef;
use crate::models::TextDetection;

/// Multi-modal image analysis capability
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Detect labeled objects/concepts, pre-filtered by the capability to
    /// `min_confidence` and capped at `max_labels`
    async fn detect_labels(
        &self,
        reference: &ObjectRef,
        max_labels: u32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>>;

    /// Detect text at both line and word granularity
    async fn detect_text(&self, reference: &ObjectRef) -> Result<Vec<TextDetection>>;

    /// Detect faces with raw attribute confidences
    async fn detect_faces(&self, reference: &ObjectRef) -> Result<Vec<DetectedFace>>;
}

/// Text embedding capability. Every vector returned for one deployment
/// shares a fixed dimension.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Generative completion capability: prompt in, free text out
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: usize, temperature: f32) -> Result<String>;
}

/// Binary object storage capability
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store the bytes under a fresh key and return the handle
    async fn put(&self, bytes: &[u8], content_type: &str) -> Result<ObjectRef>;
}

/// Append-only keyed record storage capability
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put(&self, collection: &str, key: &str, record: serde_json::Value) -> Result<()>;

    async fn scan(&self, collection: &str) -> Result<Vec<serde_json::Value>>;
}

/// The full set of capability clients a pipeline needs, shared via `Arc`
/// and immutable after construction.
#[derive(Clone)]
pub struct CapabilityBundle {
    pub vision: Arc<dyn VisionAnalyzer>,
    pub embedding: Arc<dyn EmbeddingService>,
    pub generative: Arc<dyn GenerativeModel>,
    pub object_store: Arc<dyn ObjectStore>,
    pub kv_store: Arc<dyn KeyValueStore>,
    mode: CapabilityMode,
}

impl CapabilityBundle {
    /// Wire capabilities according to the configured mode
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match config.capability_mode() {
            CapabilityMode::Demo => Ok(Self::demo()),
            CapabilityMode::Live => Self::live(config),
        }
    }

    /// Wire the HTTP and filesystem clients against the configured
    /// endpoints
    pub fn live(config: &AppConfig) -> Result<Self> {
        let vision = HttpVisionClient::new(
            config.vision.endpoint.clone(),
            config.request_timeout_secs(),
        )?;
        let embedding = EmbeddingClient::from_config(config)?;
        let generative = GenerativeClient::from_config(config)?;
        let object_store = FsObjectStore::new(&config.storage.root_dir, &config.storage.bucket);
        let kv_store = FsKeyValueStore::new(&config.storage.root_dir);

        Ok(Self {
            vision: Arc::new(vision),
            embedding: Arc::new(embedding),
            generative: Arc::new(generative),
            object_store: Arc::new(object_store),
            kv_store: Arc::new(kv_store),
            mode: CapabilityMode::Live,
        })
    }

    /// Deterministic in-process capabilities; used when no live endpoints
    /// are configured and as test doubles
    #[must_use]
    pub fn demo() -> Self {
        Self {
            vision: Arc::new(demo::DemoVision::default()),
            embedding: Arc::new(demo::DemoEmbedding::default()),
            generative: Arc::new(demo::DemoGenerative::default()),
            object_store: Arc::new(demo::DemoObjectStore::default()),
            kv_store: Arc::new(demo::DemoKeyValueStore::default()),
            mode: CapabilityMode::Demo,
        }
    }

    /// Build a bundle from individual capability handles (test doubles,
    /// partial overrides)
    #[must_use]
    pub fn from_parts(
        vision: Arc<dyn VisionAnalyzer>,
        embedding: Arc<dyn EmbeddingService>,
        generative: Arc<dyn GenerativeModel>,
        object_store: Arc<dyn ObjectStore>,
        kv_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            vision,
            embedding,
            generative,
            object_store,
            kv_store,
            mode: CapabilityMode::Demo,
        }
    }

    /// True when the bundle was wired in demo mode
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.mode == CapabilityMode::Demo
    }
}
