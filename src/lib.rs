pub mod capabilities;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod perception;
pub mod rag;

#[cfg(test)]
pub mod tests;

pub use config::AppConfig;
pub use errors::*;
pub use perception::ImageService;
pub use rag::QaService;
