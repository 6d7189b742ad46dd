//! Semantic retrieval over the FAQ corpus

use std::sync::Arc;

use futures::stream;
use futures::stream::StreamExt;
use tracing::debug;
use tracing::warn;

use crate::capabilities::EmbeddingService;
use crate::capabilities::KeyValueStore;
use crate::errors::PhotoSageError;
use crate::errors::Result;
use crate::models::QaEntry;
use crate::models::SimilarityMatch;

/// Seed question/answer pairs guaranteeing the QA pipeline is answerable
/// before any corpus has been populated
pub const SEED_FAQ: [(&str, &str); 3] = [
    (
        "How does this assistant work?",
        "The assistant analyzes uploaded photos using AI, generates descriptions and tags, \
         and answers questions from the FAQ.",
    ),
    (
        "Are my photos stored?",
        "Photos are stored securely in the cloud, with access control.",
    ),
    (
        "What kinds of photos can I analyze?",
        "You can analyze many kinds of photos, but the system works best with photos of \
         people, animals, landscapes and objects.",
    ),
];

/// Cosine similarity between two vectors of equal dimension.
///
/// Defined as 0.0 when either magnitude is exactly zero; that is an
/// edge-case policy, not an error. Mismatched dimensions make similarity
/// undefined and fail loudly.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(PhotoSageError::EmbeddingDimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Retriever ranking corpus entries against a question embedding.
///
/// The corpus is loaded once at construction and immutable afterwards;
/// when it is empty the built-in seed FAQ is embedded on demand instead.
pub struct EmbeddingRetriever {
    embedding_service: Arc<dyn EmbeddingService>,
    corpus: Vec<QaEntry>,
}

impl EmbeddingRetriever {
    /// Create a retriever over an already-loaded corpus
    #[must_use]
    pub fn with_corpus(embedding_service: Arc<dyn EmbeddingService>, corpus: Vec<QaEntry>) -> Self {
        Self {
            embedding_service,
            corpus,
        }
    }

    /// Load the corpus from the key-value store.
    ///
    /// A failed or empty scan degrades to the seed FAQ rather than
    /// failing; the pipeline must stay answerable.
    pub async fn from_store(
        embedding_service: Arc<dyn EmbeddingService>,
        kv_store: Arc<dyn KeyValueStore>,
        faq_collection: &str,
    ) -> Self {
        let corpus = match kv_store.scan(faq_collection).await {
            Ok(records) => {
                let mut entries = Vec::with_capacity(records.len());
                for record in records {
                    match serde_json::from_value::<QaEntry>(record) {
                        Ok(entry) => entries.push(entry),
                        Err(e) => warn!("Skipping malformed FAQ record: {}", e),
                    }
                }
                entries
            }
            Err(e) => {
                warn!("FAQ corpus unavailable ({}); using seed entries", e);
                Vec::new()
            }
        };

        debug!("Loaded {} FAQ entries", corpus.len());
        Self::with_corpus(embedding_service, corpus)
    }

    /// Embed the question and rank every corpus entry by cosine
    /// similarity, descending. The sort is stable, so equal scores keep
    /// corpus insertion order.
    pub async fn rank(&self, question: &str) -> Result<Vec<SimilarityMatch>> {
        debug!("Ranking corpus against question: {}", question);

        let query = self.embedding_service.embed(question).await?;

        let seeded;
        let entries = if self.corpus.is_empty() {
            seeded = self.embed_seed_entries().await?;
            &seeded
        } else {
            &self.corpus
        };

        let mut matches = Vec::with_capacity(entries.len());
        for entry in entries {
            let score = cosine_similarity(&query, &entry.embedding)?;
            matches.push(SimilarityMatch {
                question: entry.question.clone(),
                answer: entry.answer.clone(),
                score,
            });
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            "Top score {:.3} over {} entries",
            matches.first().map_or(0.0, |m| m.score),
            matches.len()
        );
        Ok(matches)
    }

    /// Embed the seed FAQ on demand, preserving seed order
    async fn embed_seed_entries(&self) -> Result<Vec<QaEntry>> {
        let results: Vec<Result<QaEntry>> = stream::iter(SEED_FAQ.iter())
            .map(|&(question, answer)| async move {
                let embedding = self.embedding_service.embed(question).await?;
                Ok(QaEntry {
                    question: question.to_string(),
                    answer: answer.to_string(),
                    embedding,
                })
            })
            .buffered(SEED_FAQ.len())
            .collect()
            .await;

        let mut entries = Vec::with_capacity(results.len());
        for result in results {
            entries.push(result?);
        }

        Ok(entries)
    }
}
