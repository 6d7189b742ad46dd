use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// How capability clients are wired at startup.
///
/// `Demo` selects the deterministic in-process capabilities; `Live` wires
/// the HTTP clients against the configured endpoints. This is decided once
/// from configuration, never inferred per-call from credential presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityMode {
    Live,
    Demo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    pub mode: CapabilityMode,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    pub endpoint: String,
    #[serde(default = "default_max_labels")]
    pub max_labels: u32,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default = "default_min_emotion_confidence")]
    pub min_emotion_confidence: f32,
}

fn default_max_labels() -> u32 {
    20
}

fn default_min_confidence() -> f32 {
    70.0
}

fn default_min_emotion_confidence() -> f32 {
    50.0
}

/// Embedding provider wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    OpenAI,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub provider: EmbeddingProviderKind,
    pub endpoint: String,
    pub model: String,
    pub dimension: usize,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Generative provider wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    OpenAI,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub llm_endpoint: String,
    #[serde(default)]
    pub llm_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_llm_model() -> String {
    "gemma3:27b".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for the filesystem-backed object and key-value stores
    pub root_dir: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_records_collection")]
    pub records_collection: String,
    #[serde(default = "default_faq_collection")]
    pub faq_collection: String,
}

fn default_bucket() -> String {
    "photosage-uploads".to_string()
}

fn default_records_collection() -> String {
    "image_descriptions".to_string()
}

fn default_faq_collection() -> String {
    "faq_entries".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// Similarity above which a corpus entry answers directly, bypassing
    /// generation. Tunable; 0.85 is the canonical default.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    /// How many top matches feed the generation context
    #[serde(default = "default_context_top_k")]
    pub context_top_k: usize,
}

fn default_match_threshold() -> f32 {
    0.85
}

fn default_context_top_k() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub capabilities: CapabilitiesConfig,
    pub vision: VisionConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub qa: QaConfig,
    pub logging: LoggingConfig,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            context_top_k: default_context_top_k(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::PhotoSageError::Io)?;

        let config: AppConfig =
            toml::from_str(&content).map_err(crate::PhotoSageError::TomlParsing)?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::PhotoSageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Reject values that would make similarity or generation undefined
    pub fn validate(&self) -> crate::Result<()> {
        if self.embeddings.dimension == 0 {
            return Err(crate::PhotoSageError::ConfigError(
                "embeddings.dimension must be non-zero".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.qa.match_threshold) {
            return Err(crate::PhotoSageError::ConfigError(format!(
                "qa.match_threshold must be within [-1, 1], got {}",
                self.qa.match_threshold
            )));
        }
        if self.qa.context_top_k == 0 {
            return Err(crate::PhotoSageError::ConfigError(
                "qa.context_top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get capability wiring mode
    pub fn capability_mode(&self) -> CapabilityMode {
        self.capabilities.mode
    }

    /// Get per-request capability timeout in seconds
    pub fn request_timeout_secs(&self) -> u64 {
        self.capabilities.request_timeout_secs
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get generation sampling temperature
    pub fn temperature(&self) -> f32 {
        self.llm.temperature
    }

    /// Get generation token budget
    pub fn max_tokens(&self) -> usize {
        self.llm.max_tokens
    }

    /// Get direct-answer similarity threshold
    pub fn match_threshold(&self) -> f32 {
        self.qa.match_threshold
    }

    /// Get generation context size
    pub fn context_top_k(&self) -> usize {
        self.qa.context_top_k
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capabilities: CapabilitiesConfig {
                mode: CapabilityMode::Demo,
                request_timeout_secs: default_request_timeout_secs(),
            },
            vision: VisionConfig {
                endpoint: "http://localhost:9100".to_string(),
                max_labels: default_max_labels(),
                min_confidence: default_min_confidence(),
                min_emotion_confidence: default_min_emotion_confidence(),
            },
            embeddings: EmbeddingsConfig {
                provider: EmbeddingProviderKind::Ollama,
                endpoint: "http://localhost:11434".to_string(),
                model: "nomic-embed-text".to_string(),
                dimension: 768,
                api_key: None,
            },
            llm: LlmConfig {
                provider: LlmProviderKind::Ollama,
                llm_endpoint: "http://localhost:11434".to_string(),
                llm_key: None,
                llm_model: default_llm_model(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            storage: StorageConfig {
                root_dir: "./data".to_string(),
                bucket: default_bucket(),
                records_collection: default_records_collection(),
                faq_collection: default_faq_collection(),
            },
            qa: QaConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capability_mode(), CapabilityMode::Demo);
        assert!((config.match_threshold() - 0.85).abs() < f32::EPSILON);
        assert_eq!(config.context_top_k(), 3);
        assert!((config.temperature() - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens(), 1000);
    }

    #[test]
    fn test_parse_minimal_toml_with_defaults() {
        let toml_str = r#"
            [capabilities]
            mode = "live"

            [vision]
            endpoint = "http://vision.internal:9100"

            [embeddings]
            provider = "openai"
            endpoint = "https://api.openai.com/v1"
            model = "text-embedding-3-small"
            dimension = 1536
            api_key = "sk-test"

            [llm]
            provider = "openai"
            llm_endpoint = "https://api.openai.com/v1"
            llm_key = "sk-test"
            llm_model = "gpt-4o-mini"

            [storage]
            root_dir = "/var/lib/photosage"

            [logging]
            level = "debug"
            backtrace = false
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.capability_mode(), CapabilityMode::Live);
        // Unset tunables fall back to their defaults
        assert_eq!(config.vision.max_labels, 20);
        assert!((config.vision.min_confidence - 70.0).abs() < f32::EPSILON);
        assert!((config.match_threshold() - 0.85).abs() < f32::EPSILON);
        assert_eq!(config.storage.bucket, "photosage-uploads");
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let mut config = AppConfig::default();
        config.embeddings.dimension = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = AppConfig::default();
        config.qa.match_threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
