//! Perception-to-Generation pipeline
//!
//! Turns an uploaded image into structured metadata:
//! - Multi-modal signal aggregation (labels, text, faces) from the vision capability
//! - Deterministic prompt composition
//! - Generative description with tolerant structured-output extraction
//! - Best-effort persistence of the final result
//!
//! # Examples
//!
//! ```rust,no_run
//! use photosage::capabilities::CapabilityBundle;
//! use photosage::config::AppConfig;
//! use photosage::perception::ImageService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let bundle = CapabilityBundle::from_config(&config)?;
//!     let service = ImageService::new(&config, bundle);
//!
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let (reference, result, stored) =
//!         service.upload_and_analyze(&bytes, "image/jpeg").await?;
//!     println!("{} -> {}", reference.key, result.description);
//!     println!("Tags: {:?} (stored: {stored})", result.tags);
//!
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod composer;
pub mod describer;
pub mod persistence;
pub mod pipeline;

pub use aggregator::PerceptionAggregator;
pub use composer::compose_description_prompt;
pub use describer::GenerativeDescriber;
pub use describer::FALLBACK_DESCRIPTION;
pub use persistence::PersistenceWriter;
pub use pipeline::ImageService;
