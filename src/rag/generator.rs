//! Context-augmented answer generation

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::capabilities::GenerativeModel;
use crate::config::AppConfig;
use crate::models::AnswerResult;
use crate::models::SimilarityMatch;
use crate::rag::prompts;

/// Generator answering a question from retrieved FAQ context.
///
/// A capability failure here surfaces as [`AnswerResult::Failed`]; no
/// default text is fabricated, because it would misrepresent confidence
/// in an answer that was never generated.
pub struct RagGenerator {
    generative: Arc<dyn GenerativeModel>,
    temperature: f32,
    max_tokens: usize,
}

impl RagGenerator {
    /// Create a new generator with sampling settings from configuration
    pub fn new(generative: Arc<dyn GenerativeModel>, config: &AppConfig) -> Self {
        Self {
            generative,
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
        }
    }

    /// Generate an answer grounded in the given matches (rank order
    /// preserved in `relevant_questions`)
    pub async fn generate(&self, question: &str, matches: &[SimilarityMatch]) -> AnswerResult {
        let context = prompts::build_context_block(matches);
        let prompt = prompts::build_faq_rag_prompt(question, &context);
        debug!("Generating answer from {} context entries", matches.len());

        match self
            .generative
            .complete(&prompt, self.max_tokens, self.temperature)
            .await
        {
            Ok(answer_text) => AnswerResult::Generated {
                answer_text,
                relevant_questions: matches.iter().map(|m| m.question.clone()).collect(),
            },
            Err(e) => {
                warn!("Answer generation failed: {}", e);
                AnswerResult::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
