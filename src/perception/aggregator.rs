//! Aggregation of multi-modal vision signals into one analysis record

use std::sync::Arc;

use tracing::debug;

use crate::capabilities::VisionAnalyzer;
use crate::config::AppConfig;
use crate::errors::PhotoSageError;
use crate::errors::Result;
use crate::models::FaceAttributes;
use crate::models::ImageAnalysis;
use crate::models::ObjectRef;
use crate::models::TextKind;

/// Aggregator joining the three vision calls into one [`ImageAnalysis`]
pub struct PerceptionAggregator {
    vision: Arc<dyn VisionAnalyzer>,
    max_labels: u32,
    min_confidence: f32,
    min_emotion_confidence: f32,
}

impl PerceptionAggregator {
    /// Create a new aggregator with filter settings from configuration
    pub fn new(vision: Arc<dyn VisionAnalyzer>, config: &AppConfig) -> Self {
        Self {
            vision,
            max_labels: config.vision.max_labels,
            min_confidence: config.vision.min_confidence,
            min_emotion_confidence: config.vision.min_emotion_confidence,
        }
    }

    /// Analyze one image reference.
    ///
    /// The three capability calls are independent reads and run
    /// concurrently; if any one fails the whole aggregation fails and no
    /// partial analysis is produced. Label filtering is delegated to the
    /// capability's own threshold parameters; text is reduced to
    /// line-level detections; face emotions below the confidence floor
    /// are dropped.
    pub async fn analyze(&self, reference: &ObjectRef) -> Result<ImageAnalysis> {
        debug!("Aggregating vision signals for {}/{}", reference.bucket, reference.key);

        let (labels, detections, raw_faces) = tokio::try_join!(
            self.vision
                .detect_labels(reference, self.max_labels, self.min_confidence),
            self.vision.detect_text(reference),
            self.vision.detect_faces(reference),
        )
        .map_err(|e| PhotoSageError::VisionFailure(e.to_string()))?;

        let text_lines = detections
            .into_iter()
            .filter(|d| d.kind == TextKind::Line)
            .map(|d| d.text)
            .collect();

        let faces = raw_faces
            .into_iter()
            .map(|face| FaceAttributes {
                age_low: face.age_low,
                age_high: face.age_high,
                gender: face.gender,
                emotions: face
                    .emotions
                    .into_iter()
                    .filter(|e| e.confidence > self.min_emotion_confidence)
                    .map(|e| e.name)
                    .collect(),
            })
            .collect();

        let analysis = ImageAnalysis {
            labels,
            text_lines,
            faces,
        };

        debug!(
            "Aggregated {} labels, {} text lines, {} faces",
            analysis.labels.len(),
            analysis.text_lines.len(),
            analysis.faces.len()
        );

        Ok(analysis)
    }
}
