//! Generative completion client for OpenAI-compatible and Ollama providers

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::GenerativeModel;
use crate::config::AppConfig;
use crate::config::LlmProviderKind;
use crate::errors::PhotoSageError;
use crate::errors::Result;

/// Client for prompt-in/text-out generation. Sampling parameters travel
/// with each call; the client itself only holds the wiring.
pub struct GenerativeClient {
    provider: LlmProviderKind,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl GenerativeClient {
    /// Create a new generative client
    pub fn new(
        provider: LlmProviderKind,
        model: String,
        endpoint: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PhotoSageError::CapabilityUnavailable(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint,
            api_key,
            client,
        })
    }

    /// Create from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.llm.provider,
            config.llm.llm_model.clone(),
            config.llm.llm_endpoint.clone(),
            config.llm.llm_key.clone(),
            config.request_timeout_secs(),
        )
    }

    /// Complete using an OpenAI-compatible chat API
    async fn complete_openai(
        &self,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            PhotoSageError::ConfigError("LLM API key not provided".to_string())
        })?;

        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            max_tokens: usize,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChatChoiceMessage {
            content: String,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling OpenAI chat API: {}", url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PhotoSageError::CapabilityUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PhotoSageError::CapabilityUnavailable(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            PhotoSageError::CapabilityUnavailable(format!("Failed to parse response: {e}"))
        })?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                PhotoSageError::CapabilityUnavailable("No completion in response".to_string())
            })
    }

    /// Complete using the Ollama generate API
    async fn complete_ollama(
        &self,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct OllamaOptions {
            num_predict: usize,
            temperature: f32,
        }

        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: OllamaOptions,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            response: String,
        }

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Calling Ollama generate API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                num_predict: max_tokens,
                temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PhotoSageError::CapabilityUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PhotoSageError::CapabilityUnavailable(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response.json().await.map_err(|e| {
            PhotoSageError::CapabilityUnavailable(format!("Failed to parse response: {e}"))
        })?;

        Ok(result.response)
    }
}

#[async_trait]
impl GenerativeModel for GenerativeClient {
    async fn complete(&self, prompt: &str, max_tokens: usize, temperature: f32) -> Result<String> {
        match self.provider {
            LlmProviderKind::OpenAI => self.complete_openai(prompt, max_tokens, temperature).await,
            LlmProviderKind::Ollama => self.complete_ollama(prompt, max_tokens, temperature).await,
        }
    }
}
