mod support;

use std::sync::Arc;

use casedeck_application::DocumentService;
use casedeck_core::document::{DocumentPipeline, UploadFile};
use support::{Harness, session, test_case};
use tempfile::TempDir;

fn service(harness: &Harness) -> DocumentService {
    DocumentService::new(
        harness.remote.clone() as Arc<dyn DocumentPipeline>,
        harness.store.clone(),
    )
}

#[tokio::test]
async fn test_upload_requires_active_session() {
    let harness = Harness::with_sessions(vec![session("s1", "One")]);
    harness.store.init().await.unwrap();

    let err = service(&harness)
        .upload(UploadFile::new("prd.md", b"# PRD".to_vec()))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(harness.remote.call_count("documents.upload"), 0);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_format() {
    let one = session("s1", "One");
    let harness = Harness::with_sessions(vec![one.clone()]);
    harness.store.init().await.unwrap();
    harness.store.switch(Some(&one)).await.unwrap();

    let err = service(&harness)
        .upload(UploadFile::new("diagram.png", vec![1, 2, 3]))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(harness.remote.call_count("documents.upload"), 0);
}

#[tokio::test]
async fn test_upload_refreshes_retitled_session() {
    let one = session("s1", "One");
    let mut harness = Harness::with_sessions(vec![one.clone()]);
    harness.store.init().await.unwrap();
    harness.store.switch(Some(&one)).await.unwrap();
    harness.drain_events();

    let document = service(&harness)
        .upload(UploadFile::new("prd.md", b"# Login\nUsers sign in.".to_vec()))
        .await
        .unwrap();

    assert_eq!(document.session_id, "s1");
    assert_eq!(
        document.extracted_content.as_deref(),
        Some("# Login\nUsers sign in.")
    );
    let active = harness.store.active_session().await.unwrap();
    assert_eq!(active.title, "prd.md");
    assert_eq!(harness.drain_messages(), vec!["Document uploaded".to_string()]);
}

#[tokio::test]
async fn test_upload_path_reads_file() {
    let one = session("s1", "One");
    let harness = Harness::with_sessions(vec![one.clone()]);
    harness.store.init().await.unwrap();
    harness.store.switch(Some(&one)).await.unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("requirements.txt");
    std::fs::write(&path, "The system shall export test cases.").unwrap();

    let document = service(&harness).upload_path(&path).await.unwrap();
    assert_eq!(document.file_name, "requirements.txt");
}

#[tokio::test]
async fn test_analyze_refreshes_test_cases() {
    let one = session("s1", "One");
    let harness = Harness::with_sessions(vec![one.clone()]);
    harness.remote.insert_test_case(test_case("c1", "s1", "Existing"));
    harness.remote.set_generated_per_analysis(3);
    harness.store.init().await.unwrap();
    harness.store.switch(Some(&one)).await.unwrap();
    assert_eq!(harness.store.active_test_cases().await.unwrap().unwrap().len(), 1);

    let documents = service(&harness);
    let document = documents
        .upload(UploadFile::new("prd.docx", vec![0x50, 0x4b]))
        .await
        .unwrap();
    let summary = documents.analyze(&document.id).await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.test_cases_count, 3);
    let cases = harness.cache.cached_test_cases("s1").await.unwrap();
    assert_eq!(cases.len(), 4);
}

#[tokio::test]
async fn test_analyze_failure_is_reported() {
    let one = session("s1", "One");
    let mut harness = Harness::with_sessions(vec![one.clone()]);
    harness.store.init().await.unwrap();
    harness.store.switch(Some(&one)).await.unwrap();
    harness.drain_events();

    let err = service(&harness).analyze("missing").await.unwrap_err();

    assert!(err.is_remote());
    assert!(
        harness
            .drain_messages()
            .iter()
            .any(|m| m.starts_with("Failed to analyze document"))
    );
}
