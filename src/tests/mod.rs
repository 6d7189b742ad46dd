//! Cross-component pipeline tests
//!
//! These exercise the two pipelines end-to-end against deterministic
//! capability doubles; no network or filesystem access required.

pub mod description_pipeline_test;

use std::sync::Arc;

use async_trait::async_trait;

use crate::capabilities::EmbeddingService;
use crate::capabilities::GenerativeModel;
use crate::capabilities::VisionAnalyzer;
use crate::config::AppConfig;
use crate::errors::PhotoSageError;
use crate::errors::Result;
use crate::models::DetectedFace;
use crate::models::DetectedLabel;
use crate::models::ObjectRef;
use crate::models::TextDetection;

/// Default configuration used across pipeline tests
pub fn test_config() -> AppConfig {
    AppConfig::default()
}

/// Embedding double with exact, hand-picked vectors per text; anything
/// unknown lands on a vector orthogonal to all known ones
pub struct MappedEmbedding {
    pub mapping: Vec<(&'static str, Vec<f32>)>,
    pub fallback: Vec<f32>,
}

#[async_trait]
impl EmbeddingService for MappedEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self
            .mapping
            .iter()
            .find(|(known, _)| *known == text)
            .map_or_else(|| self.fallback.clone(), |(_, vector)| vector.clone()))
    }
}

/// Generative double that always fails
pub struct OfflineGenerative;

#[async_trait]
impl GenerativeModel for OfflineGenerative {
    async fn complete(
        &self,
        _prompt: &str,
        _max_tokens: usize,
        _temperature: f32,
    ) -> Result<String> {
        Err(PhotoSageError::CapabilityUnavailable(
            "model offline".to_string(),
        ))
    }
}

/// Vision double that always fails
pub struct OfflineVision;

#[async_trait]
impl VisionAnalyzer for OfflineVision {
    async fn detect_labels(
        &self,
        _reference: &ObjectRef,
        _max_labels: u32,
        _min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>> {
        Err(PhotoSageError::CapabilityUnavailable(
            "vision offline".to_string(),
        ))
    }

    async fn detect_text(&self, _reference: &ObjectRef) -> Result<Vec<TextDetection>> {
        Err(PhotoSageError::CapabilityUnavailable(
            "vision offline".to_string(),
        ))
    }

    async fn detect_faces(&self, _reference: &ObjectRef) -> Result<Vec<DetectedFace>> {
        Err(PhotoSageError::CapabilityUnavailable(
            "vision offline".to_string(),
        ))
    }
}

/// Convenience: an `Arc`'d mapped embedding over unit axis vectors
pub fn axis_embedding(known: Vec<(&'static str, Vec<f32>)>, dim: usize) -> Arc<MappedEmbedding> {
    let mut fallback = vec![0.0; dim];
    if let Some(last) = fallback.last_mut() {
        *last = 1.0;
    }
    Arc::new(MappedEmbedding {
        mapping: known,
        fallback,
    })
}
