//! End-to-end tests for the Perception-to-Generation pipeline

use std::sync::Arc;

use crate::capabilities::demo::DemoEmbedding;
use crate::capabilities::demo::DemoGenerative;
use crate::capabilities::demo::DemoKeyValueStore;
use crate::capabilities::demo::DemoObjectStore;
use crate::capabilities::demo::DemoVision;
use crate::capabilities::CapabilityBundle;
use crate::capabilities::KeyValueStore;
use crate::models::PersistedRecord;
use crate::perception::ImageService;
use crate::perception::FALLBACK_DESCRIPTION;
use crate::tests::test_config;
use crate::tests::OfflineVision;

fn demo_bundle() -> CapabilityBundle {
    CapabilityBundle::demo()
}

#[tokio::test]
async fn test_upload_and_analyze_produces_description_and_tags() {
    let config = test_config();
    let bundle = demo_bundle();
    let service = ImageService::new(&config, bundle);

    let (reference, result, stored) = service
        .upload_and_analyze(b"fake jpeg bytes", "image/jpeg")
        .await
        .unwrap();

    assert!(reference.key.starts_with("uploads/"));
    assert!(!result.description.is_empty());
    assert_ne!(result.description, FALLBACK_DESCRIPTION);
    // Tag list target is 5-10
    assert!(result.tags.len() >= 5 && result.tags.len() <= 10);
    assert!(stored);
}

#[tokio::test]
async fn test_analysis_is_persisted_keyed_by_object_key() {
    let config = test_config();
    let kv = Arc::new(DemoKeyValueStore::default());
    let bundle = CapabilityBundle::from_parts(
        Arc::new(DemoVision),
        Arc::new(DemoEmbedding),
        Arc::new(DemoGenerative),
        Arc::new(DemoObjectStore::default()),
        kv.clone(),
    );
    let service = ImageService::new(&config, bundle);

    let (reference, result, stored) = service
        .upload_and_analyze(b"fake jpeg bytes", "image/jpeg")
        .await
        .unwrap();
    assert!(stored);

    let records = kv.scan("image_descriptions").await.unwrap();
    assert_eq!(records.len(), 1);
    let record: PersistedRecord = serde_json::from_value(records[0].clone()).unwrap();
    assert_eq!(record.image_id, reference.key);
    assert_eq!(record.description, result.description);
    assert_eq!(record.tags, result.tags);
}

#[tokio::test]
async fn test_persistence_failure_leaves_result_unchanged() {
    let config = test_config();

    // Same deterministic capabilities, one working store and one with no
    // collections at all
    let working = ImageService::new(&config, demo_bundle());
    let broken = ImageService::new(
        &config,
        CapabilityBundle::from_parts(
            Arc::new(DemoVision),
            Arc::new(DemoEmbedding),
            Arc::new(DemoGenerative),
            Arc::new(DemoObjectStore::default()),
            Arc::new(DemoKeyValueStore::empty()),
        ),
    );

    let reference = crate::models::ObjectRef::new("demo-bucket", "uploads/same.jpg");
    let (expected, stored_ok) = working.analyze_and_store(&reference).await;
    let (actual, stored_broken) = broken.analyze_and_store(&reference).await;

    assert!(stored_ok);
    assert!(!stored_broken);
    // The failure is reported only through the flag; the result is what
    // was already computed
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_vision_failure_absorbed_into_fallback() {
    let config = test_config();
    let bundle = CapabilityBundle::from_parts(
        Arc::new(OfflineVision),
        Arc::new(DemoEmbedding),
        Arc::new(DemoGenerative),
        Arc::new(DemoObjectStore::default()),
        Arc::new(DemoKeyValueStore::default()),
    );
    let service = ImageService::new(&config, bundle);

    let reference = crate::models::ObjectRef::new("demo-bucket", "uploads/x.jpg");
    let (result, stored) = service.analyze_and_store(&reference).await;

    assert_eq!(result.description, FALLBACK_DESCRIPTION);
    assert!(result.tags.is_empty());
    assert!(!stored);
}
