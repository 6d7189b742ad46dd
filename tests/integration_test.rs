//! Integration tests driving the public API with demo capabilities

use photosage::capabilities::CapabilityBundle;
use photosage::config::AppConfig;
use photosage::models::AnswerResult;
use photosage::perception::ImageService;
use photosage::rag::QaService;

#[tokio::test]
async fn test_analyze_then_ask_share_one_bundle() {
    let config = AppConfig::default();
    let bundle = CapabilityBundle::demo();

    let image_service = ImageService::new(&config, bundle.clone());
    let (reference, result, stored) = image_service
        .upload_and_analyze(b"fake jpeg bytes", "image/jpeg")
        .await
        .expect("demo upload cannot fail");

    assert!(reference.key.starts_with("uploads/"));
    assert!(!result.description.is_empty());
    assert!(!result.tags.is_empty());
    assert!(stored);

    let qa_service = QaService::new(&config, &bundle).await;
    let answer = qa_service.ask("How does this assistant work?").await;
    assert!(!matches!(answer, AnswerResult::Failed { .. }));
}

#[tokio::test]
async fn test_filesystem_storage_roundtrip() {
    use std::sync::Arc;

    use photosage::capabilities::demo::DemoEmbedding;
    use photosage::capabilities::demo::DemoGenerative;
    use photosage::capabilities::demo::DemoVision;
    use photosage::capabilities::FsKeyValueStore;
    use photosage::capabilities::FsObjectStore;
    use photosage::capabilities::KeyValueStore;

    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default();

    let kv = Arc::new(FsKeyValueStore::new(dir.path()));
    kv.create_collection("image_descriptions").await.unwrap();

    let bundle = CapabilityBundle::from_parts(
        Arc::new(DemoVision),
        Arc::new(DemoEmbedding),
        Arc::new(DemoGenerative),
        Arc::new(FsObjectStore::new(dir.path(), "photosage-uploads")),
        kv.clone(),
    );

    let service = ImageService::new(&config, bundle);
    let (reference, result, stored) = service
        .upload_and_analyze(b"fake jpeg bytes", "image/jpeg")
        .await
        .unwrap();
    assert!(stored);

    // The record landed on disk and carries the delivered result
    let records = kv.scan("image_descriptions").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["image_id"], reference.key.as_str());
    assert_eq!(records[0]["description"], result.description.as_str());
}
