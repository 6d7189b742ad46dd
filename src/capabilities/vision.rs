//! HTTP client for the vision-analysis capability

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::VisionAnalyzer;
use crate::errors::PhotoSageError;
use crate::errors::Result;
use crate::models::DetectedFace;
use crate::models::DetectedLabel;
use crate::models::ObjectRef;
use crate::models::TextDetection;

/// Client for a REST vision-analysis service exposing `/labels`, `/text`
/// and `/faces` routes. Requests reference already-uploaded objects by
/// bucket/key; no image bytes travel through this client.
pub struct HttpVisionClient {
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    bucket: &'a str,
    key: &'a str,
}

#[derive(Serialize)]
struct LabelsRequest<'a> {
    bucket: &'a str,
    key: &'a str,
    max_labels: u32,
    min_confidence: f32,
}

#[derive(Deserialize)]
struct LabelsResponse {
    labels: Vec<DetectedLabel>,
}

#[derive(Deserialize)]
struct TextResponse {
    detections: Vec<TextDetection>,
}

#[derive(Deserialize)]
struct FacesResponse {
    faces: Vec<DetectedFace>,
}

impl HttpVisionClient {
    /// Create a new vision client with a per-request timeout
    pub fn new(endpoint: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PhotoSageError::CapabilityUnavailable(e.to_string()))?;

        Ok(Self { endpoint, client })
    }

    async fn post_json<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        route: &str,
        request: &T,
    ) -> Result<R> {
        let url = format!("{}/{}", self.endpoint, route);
        debug!("Calling vision API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
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
                "Vision API error ({status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PhotoSageError::CapabilityUnavailable(format!(
                "Failed to parse vision response: {e}"
            )))
    }
}

#[async_trait]
impl VisionAnalyzer for HttpVisionClient {
    async fn detect_labels(
        &self,
        reference: &ObjectRef,
        max_labels: u32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>> {
        let request = LabelsRequest {
            bucket: &reference.bucket,
            key: &reference.key,
            max_labels,
            min_confidence,
        };

        let response: LabelsResponse = self.post_json("labels", &request).await?;
        Ok(response.labels)
    }

    async fn detect_text(&self, reference: &ObjectRef) -> Result<Vec<TextDetection>> {
        let request = ImageRequest {
            bucket: &reference.bucket,
            key: &reference.key,
        };

        let response: TextResponse = self.post_json("text", &request).await?;
        Ok(response.detections)
    }

    async fn detect_faces(&self, reference: &ObjectRef) -> Result<Vec<DetectedFace>> {
        let request = ImageRequest {
            bucket: &reference.bucket,
            key: &reference.key,
        };

        let response: FacesResponse = self.post_json("faces", &request).await?;
        Ok(response.faces)
    }
}
