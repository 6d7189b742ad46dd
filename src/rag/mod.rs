//! Retrieval-Augmented QA pipeline
//!
//! This module answers free-text questions against a small FAQ corpus:
//! - Semantic retrieval using vector embeddings and cosine similarity
//! - Threshold routing between a direct FAQ answer and generation
//! - Context-augmented answer generation from the top-ranked entries
//!
//! # Examples
//!
//! ```rust
//! use photosage::capabilities::CapabilityBundle;
//! use photosage::config::AppConfig;
//! use photosage::models::AnswerResult;
//! use photosage::rag::QaService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let bundle = CapabilityBundle::demo();
//!     let service = QaService::new(&config, &bundle).await;
//!
//!     match service.ask("How does this assistant work?").await {
//!         AnswerResult::Matched { answer, score, .. } => {
//!             println!("FAQ match ({score:.2}): {answer}");
//!         }
//!         AnswerResult::Generated { answer_text, .. } => println!("{answer_text}"),
//!         AnswerResult::Failed { reason } => eprintln!("Failed: {reason}"),
//!     }
//! }
//! ```

pub mod generator;
pub mod pipeline;
pub mod prompts;
pub mod retriever;
pub mod router;

pub use generator::RagGenerator;
pub use pipeline::QaService;
pub use retriever::cosine_similarity;
pub use retriever::EmbeddingRetriever;
pub use router::AnswerRouter;
pub use router::RouteDecision;
