//! Complete QA pipeline: Embed -> Rank -> Route -> Answer

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::capabilities::CapabilityBundle;
use crate::config::AppConfig;
use crate::models::AnswerResult;
use crate::rag::AnswerRouter;
use crate::rag::EmbeddingRetriever;
use crate::rag::RagGenerator;
use crate::rag::RouteDecision;

/// End-to-end question-answering service.
///
/// The corpus is loaded once here and shared read-only across requests;
/// each `ask` call is an independent linear traversal with at most one
/// fallback branch, terminating in exactly one [`AnswerResult`] variant.
pub struct QaService {
    retriever: EmbeddingRetriever,
    router: AnswerRouter,
    generator: RagGenerator,
}

impl QaService {
    /// Create a new QA service, loading the corpus from the key-value
    /// store
    pub async fn new(config: &AppConfig, capabilities: &CapabilityBundle) -> Self {
        let retriever = EmbeddingRetriever::from_store(
            capabilities.embedding.clone(),
            capabilities.kv_store.clone(),
            &config.storage.faq_collection,
        )
        .await;

        Self::from_parts(config, capabilities, retriever)
    }

    /// Create from an already-built retriever (pre-loaded corpus, test
    /// doubles)
    pub fn from_parts(
        config: &AppConfig,
        capabilities: &CapabilityBundle,
        retriever: EmbeddingRetriever,
    ) -> Self {
        let router = AnswerRouter::new(config.match_threshold(), config.context_top_k());
        let generator = RagGenerator::new(capabilities.generative.clone(), config);

        Self {
            retriever,
            router,
            generator,
        }
    }

    /// Answer a free-text question
    pub async fn ask(&self, question: &str) -> AnswerResult {
        info!("Processing question: {}", question);

        // Step 1: embed and rank against the corpus
        debug!("Step 1: Ranking corpus");
        let matches = match self.retriever.rank(question).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                return AnswerResult::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if matches.is_empty() {
            // Unreachable with the seed fallback in place, but a missing
            // answer must still be explicit rather than a panic.
            return AnswerResult::Failed {
                reason: "no corpus entries available".to_string(),
            };
        }

        // Step 2: route on the similarity threshold
        debug!("Step 2: Routing");
        match self.router.route(matches) {
            RouteDecision::Direct(top) => {
                info!("Matched FAQ entry with score {:.3}", top.score);
                AnswerResult::Matched {
                    question: top.question,
                    answer: top.answer,
                    score: top.score,
                }
            }
            RouteDecision::Generate(context) => {
                // Step 3: context-augmented generation
                debug!("Step 3: Generating from {} context entries", context.len());
                self.generator.generate(question, &context).await
            }
        }
    }
}
