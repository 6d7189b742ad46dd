//! Threshold routing between a direct FAQ answer and generation

use crate::models::SimilarityMatch;

/// Where a ranked question goes next
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDecision {
    /// Top match is strong enough to answer directly, bypassing
    /// generation entirely
    Direct(SimilarityMatch),
    /// No direct match; generate from the top-ranked entries as context
    Generate(Vec<SimilarityMatch>),
}

/// Router applying the similarity threshold to a ranked match list
pub struct AnswerRouter {
    match_threshold: f32,
    context_top_k: usize,
}

impl AnswerRouter {
    #[must_use]
    pub fn new(match_threshold: f32, context_top_k: usize) -> Self {
        Self {
            match_threshold,
            context_top_k,
        }
    }

    /// Decide on a non-empty ranked match list (descending scores)
    #[must_use]
    pub fn route(&self, mut matches: Vec<SimilarityMatch>) -> RouteDecision {
        let strong_match = matches
            .first()
            .is_some_and(|top| top.score > self.match_threshold);

        if strong_match {
            RouteDecision::Direct(matches.swap_remove(0))
        } else {
            matches.truncate(self.context_top_k);
            RouteDecision::Generate(matches)
        }
    }
}
