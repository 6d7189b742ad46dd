//! Complete description pipeline: Perceive -> Compose -> Generate -> Persist

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::capabilities::CapabilityBundle;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::DescriptionResult;
use crate::models::ObjectRef;
use crate::perception::compose_description_prompt;
use crate::perception::GenerativeDescriber;
use crate::perception::PerceptionAggregator;
use crate::perception::PersistenceWriter;

/// End-to-end image description service.
///
/// Each call is one independent unit of work owning its transient
/// records; the only shared state is the capability bundle.
pub struct ImageService {
    capabilities: CapabilityBundle,
    aggregator: PerceptionAggregator,
    describer: GenerativeDescriber,
    writer: PersistenceWriter,
}

impl ImageService {
    /// Create a new image service from configuration and wired
    /// capabilities
    pub fn new(config: &AppConfig, capabilities: CapabilityBundle) -> Self {
        let aggregator = PerceptionAggregator::new(capabilities.vision.clone(), config);
        let describer = GenerativeDescriber::new(capabilities.generative.clone(), config);
        let writer = PersistenceWriter::new(
            capabilities.kv_store.clone(),
            config.storage.records_collection.clone(),
        );

        Self {
            capabilities,
            aggregator,
            describer,
            writer,
        }
    }

    /// Analyze an already-uploaded image.
    ///
    /// Always yields a valid [`DescriptionResult`]; every failure in the
    /// pipeline is absorbed into the fallback default.
    pub async fn analyze(&self, reference: &ObjectRef) -> DescriptionResult {
        self.analyze_and_store(reference).await.0
    }

    /// Analyze and persist, reporting the persistence outcome alongside
    /// the result
    pub async fn analyze_and_store(&self, reference: &ObjectRef) -> (DescriptionResult, bool) {
        info!("Processing image {}/{}", reference.bucket, reference.key);

        // Step 1: aggregate perception signals
        debug!("Step 1: Aggregating vision signals");
        let analysis = match self.aggregator.analyze(reference).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Vision analysis failed, returning fallback: {}", e);
                return (GenerativeDescriber::fallback_result(), false);
            }
        };

        // Step 2: compose the generation prompt
        debug!("Step 2: Composing prompt");
        let prompt = compose_description_prompt(&analysis);

        // Step 3: generate and parse the structured result
        debug!("Step 3: Generating description");
        let result = self.describer.describe(&prompt).await;

        // Step 4: persist best-effort; the result is already final
        debug!("Step 4: Persisting record");
        let stored = self.writer.store(reference, &result).await;

        info!(
            "Image analysis completed ({} tags, stored: {})",
            result.tags.len(),
            stored
        );
        (result, stored)
    }

    /// Upload raw bytes through the object store, then analyze them.
    ///
    /// Mirrors the original upload-then-analyze flow; the upload itself
    /// is fallible since without a stored object there is nothing to
    /// analyze.
    pub async fn upload_and_analyze(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(ObjectRef, DescriptionResult, bool)> {
        let reference = self
            .capabilities
            .object_store
            .put(bytes, content_type)
            .await?;

        let (result, stored) = self.analyze_and_store(&reference).await;
        Ok((reference, result, stored))
    }
}
