//! Prompt templates for the QA generation path

use crate::models::SimilarityMatch;

/// Render retrieved matches as a context block of Q/A pairs separated by
/// blank lines
#[must_use]
pub fn build_context_block(matches: &[SimilarityMatch]) -> String {
    matches
        .iter()
        .map(|m| format!("Q: {}\nA: {}", m.question, m.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the context-augmented FAQ answer prompt
#[must_use]
pub fn build_faq_rag_prompt(question: &str, context: &str) -> String {
    format!(
        r#"A user asked the question: "{question}"

Here are questions and answers from our FAQ:

{context}

Taking this information into account, give the best possible answer to the user's question.
If the question is not related to the available information, say that you do not have enough data to answer."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matches() -> Vec<SimilarityMatch> {
        vec![
            SimilarityMatch {
                question: "Are my photos stored?".to_string(),
                answer: "Photos are stored securely.".to_string(),
                score: 0.7,
            },
            SimilarityMatch {
                question: "How does this work?".to_string(),
                answer: "It analyzes photos with AI.".to_string(),
                score: 0.5,
            },
        ]
    }

    #[test]
    fn test_context_block_joins_pairs_with_blank_lines() {
        let block = build_context_block(&sample_matches());

        assert_eq!(
            block,
            "Q: Are my photos stored?\nA: Photos are stored securely.\n\n\
             Q: How does this work?\nA: It analyzes photos with AI."
        );
    }

    #[test]
    fn test_faq_prompt_embeds_question_and_context() {
        let context = build_context_block(&sample_matches());
        let prompt = build_faq_rag_prompt("Is my data safe?", &context);

        assert!(prompt.contains(r#"A user asked the question: "Is my data safe?""#));
        assert!(prompt.contains("Q: Are my photos stored?"));
        assert!(prompt.contains("not enough data") || prompt.contains("do not have enough data"));
    }
}
