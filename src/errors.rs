use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoSageError {
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Vision analysis failed: {0}")]
    VisionFailure(String),

    #[error("Failed to parse generated output: {0}")]
    GenerationParseError(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimensionMismatch { expected: usize, actual: usize },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhotoSageError>;
