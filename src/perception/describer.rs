//! Generative description with tolerant structured-output extraction

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::capabilities::GenerativeModel;
use crate::config::AppConfig;
use crate::errors::PhotoSageError;
use crate::errors::Result;
use crate::models::DescriptionResult;

/// Substituted when neither generation attempt produced a usable result
pub const FALLBACK_DESCRIPTION: &str = "Failed to generate a description.";

/// Appended on the retry after a parse failure
const STRICT_INSTRUCTION: &str =
    "Respond with only the JSON object. Do not include any text before or after it.";

/// Describer invoking the generative capability and validating its output.
///
/// Callers always receive a valid [`DescriptionResult`]; capability and
/// parse failures are absorbed into the fallback default and never
/// propagate out of this component.
pub struct GenerativeDescriber {
    generative: Arc<dyn GenerativeModel>,
    temperature: f32,
    max_tokens: usize,
}

impl GenerativeDescriber {
    /// Create a new describer with sampling settings from configuration
    pub fn new(generative: Arc<dyn GenerativeModel>, config: &AppConfig) -> Self {
        Self {
            generative,
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
        }
    }

    /// Generate and parse a description for a composed prompt
    pub async fn describe(&self, prompt: &str) -> DescriptionResult {
        match self.try_describe(prompt).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Falling back to default description: {}", e);
                Self::fallback_result()
            }
        }
    }

    /// The safe default returned when generation fails
    #[must_use]
    pub fn fallback_result() -> DescriptionResult {
        DescriptionResult {
            description: FALLBACK_DESCRIPTION.to_string(),
            tags: Vec::new(),
        }
    }

    async fn try_describe(&self, prompt: &str) -> Result<DescriptionResult> {
        let output = self
            .generative
            .complete(prompt, self.max_tokens, self.temperature)
            .await?;

        match extract_structured(&output) {
            Ok(result) => Ok(result),
            Err(e) => {
                // One retry with a stricter instruction before giving up;
                // a second malformed output falls through to the default.
                debug!("First generation attempt unparseable ({}), retrying strictly", e);
                let strict_prompt = format!("{prompt}\n\n{STRICT_INSTRUCTION}");
                let output = self
                    .generative
                    .complete(&strict_prompt, self.max_tokens, self.temperature)
                    .await?;
                extract_structured(&output)
            }
        }
    }
}

/// Extract a [`DescriptionResult`] from free generative text.
///
/// Models often wrap the JSON payload in prose, so this scans from the
/// first `{` to the last `}` rather than insisting on a bare object.
pub fn extract_structured(output: &str) -> Result<DescriptionResult> {
    let start = output.find('{').ok_or_else(|| {
        PhotoSageError::GenerationParseError("no opening brace in output".to_string())
    })?;
    let end = output.rfind('}').ok_or_else(|| {
        PhotoSageError::GenerationParseError("no closing brace in output".to_string())
    })?;
    if end < start {
        return Err(PhotoSageError::GenerationParseError(
            "braces out of order in output".to_string(),
        ));
    }

    let payload: Value = serde_json::from_str(&output[start..=end])
        .map_err(|e| PhotoSageError::GenerationParseError(e.to_string()))?;

    let description = payload
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PhotoSageError::GenerationParseError("missing description field".to_string())
        })?;
    if description.is_empty() {
        return Err(PhotoSageError::GenerationParseError(
            "empty description field".to_string(),
        ));
    }

    let tags = payload
        .get("tags")
        .and_then(Value::as_array)
        .ok_or_else(|| PhotoSageError::GenerationParseError("missing tags field".to_string()))?
        .iter()
        .map(|tag| {
            tag.as_str().map(ToString::to_string).ok_or_else(|| {
                PhotoSageError::GenerationParseError("non-string tag".to_string())
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DescriptionResult {
        description: description.to_string(),
        tags,
    })
}
