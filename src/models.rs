use serde::{Deserialize, Serialize};

/// A labeled object/concept detected in an image, with detection confidence
/// as a percentage in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    pub name: String,
    pub confidence: f32,
}

/// Granularity of a text detection as reported by the vision capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    /// A full line of text
    Line,
    /// A single word within a line
    Word,
}

/// A piece of text detected in an image. Only `Line`-kind detections are
/// kept by the perception aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDetection {
    pub text: String,
    pub kind: TextKind,
}

/// A detected emotion with its raw confidence, as reported by the vision
/// capability before aggregation-time filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEmotion {
    pub name: String,
    pub confidence: f32,
}

/// Raw face attributes as reported by the vision capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub age_low: u8,
    pub age_high: u8,
    pub gender: String,
    pub emotions: Vec<DetectedEmotion>,
}

/// Face attributes after aggregation: emotions are kept only above 50%
/// confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceAttributes {
    pub age_low: u8,
    pub age_high: u8,
    pub gender: String,
    pub emotions: Vec<String>,
}

/// Aggregated multi-modal analysis of one image. Immutable once built and
/// owned by the pipeline invocation that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub labels: Vec<DetectedLabel>,
    pub text_lines: Vec<String>,
    pub faces: Vec<FaceAttributes>,
}

impl ImageAnalysis {
    /// True when no modality produced any signal
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.text_lines.is_empty() && self.faces.is_empty()
    }
}

/// Structured result of the description pipeline.
///
/// Invariants: `description` is never empty (the fallback notice is
/// substituted on failure); `tags` targets 5-10 entries but may be empty
/// on fallback. Tag order is generation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionResult {
    pub description: String,
    pub tags: Vec<String>,
}

/// A known question/answer pair with its embedding vector. Every entry in
/// a corpus shares one embedding dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
    pub embedding: Vec<f32>,
}

/// A corpus entry scored against a query. Derived per request, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub question: String,
    pub answer: String,
    pub score: f32,
}

/// Terminal result of the QA pipeline. Exactly one variant is produced per
/// question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerResult {
    /// A corpus entry matched above the similarity threshold
    Matched {
        question: String,
        answer: String,
        score: f32,
    },
    /// Generated from the top-ranked corpus entries as context
    Generated {
        answer_text: String,
        relevant_questions: Vec<String>,
    },
    /// The generation path failed; no answer is fabricated
    Failed { reason: String },
}

/// Opaque handle to an object stored by the object-store capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Append-only record of a completed description, keyed by image identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub image_id: String,
    pub bucket: String,
    pub object_key: String,
    pub description: String,
    pub tags: Vec<String>,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_result_serializes_with_kind_tag() {
        let result = AnswerResult::Matched {
            question: "How does this work?".to_string(),
            answer: "It analyzes photos.".to_string(),
            score: 0.92,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "matched");
        assert_eq!(json["question"], "How does this work?");
    }

    #[test]
    fn test_image_analysis_is_empty() {
        let empty = ImageAnalysis {
            labels: vec![],
            text_lines: vec![],
            faces: vec![],
        };
        assert!(empty.is_empty());

        let with_label = ImageAnalysis {
            labels: vec![DetectedLabel {
                name: "Dog".to_string(),
                confidence: 98.2,
            }],
            text_lines: vec![],
            faces: vec![],
        };
        assert!(!with_label.is_empty());
    }

    #[test]
    fn test_persisted_record_roundtrip() {
        let record = PersistedRecord {
            image_id: "uploads/abc.jpg".to_string(),
            bucket: "photos".to_string(),
            object_key: "uploads/abc.jpg".to_string(),
            description: "A dog in a park.".to_string(),
            tags: vec!["dog".to_string(), "park".to_string()],
            timestamp: "2025-01-01 12:00:00".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: PersistedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
