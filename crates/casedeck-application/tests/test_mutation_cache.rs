mod support;

use std::sync::Arc;

use casedeck_application::cache::{Mutation, MutationKind};
use casedeck_application::{CachePartition, MutationCache, Notifier, RemoteCollections};
use casedeck_core::ai_config::AiConfigurationDraft;
use casedeck_core::error::Result;
use casedeck_core::test_case::{CaseLevel, CaseStatus, TestCaseDraft, TestCasePatch};
use support::{FakeRemote, Harness, session, test_case};
use tokio::sync::Notify;

fn seeded() -> Harness {
    let harness = Harness::with_sessions(vec![session("s1", "One"), session("s2", "Two")]);
    harness.remote.insert_test_case(test_case("c1", "s1", "Login"));
    harness.remote.insert_test_case(test_case("c2", "s2", "Logout"));
    harness
}

#[tokio::test]
async fn test_reads_are_served_from_cache_while_fresh() {
    let harness = seeded();

    harness.cache.sessions().await.unwrap();
    harness.cache.sessions().await.unwrap();
    harness.cache.test_cases("s1").await.unwrap();
    harness.cache.test_cases("s1").await.unwrap();

    assert_eq!(harness.remote.call_count("sessions.list"), 1);
    assert_eq!(harness.remote.call_count("test_cases.list"), 1);
}

#[tokio::test]
async fn test_test_case_create_refetches_only_its_session() {
    let harness = seeded();
    harness.cache.sessions().await.unwrap();
    harness.cache.test_cases("s1").await.unwrap();
    harness.cache.test_cases("s2").await.unwrap();
    harness.remote.clear_calls();

    let created = harness
        .cache
        .create_test_case(&TestCaseDraft::new("s1", "Reset password"))
        .await
        .unwrap();

    assert_eq!(
        harness.remote.calls(),
        vec!["test_cases.create".to_string(), "test_cases.list".to_string()]
    );
    // The new record is visible from cache without another fetch.
    let cases = harness.cache.test_cases("s1").await.unwrap();
    assert!(cases.iter().any(|c| c.id == created.id));
    assert_eq!(harness.remote.call_count("test_cases.list"), 1);
    assert_eq!(harness.cache.is_stale(&CachePartition::Sessions).await, Some(false));
}

#[tokio::test]
async fn test_failed_mutation_leaves_cache_untouched() {
    let mut harness = seeded();
    let before = harness.cache.test_cases("s1").await.unwrap();
    harness.remote.fail("test_cases.update");
    harness.remote.clear_calls();

    let patch = TestCasePatch {
        status: Some(CaseStatus::Passed),
        ..TestCasePatch::default()
    };
    let err = harness
        .cache
        .update_test_case("s1", "c1", &patch)
        .await
        .unwrap_err();

    assert!(err.is_remote());
    assert_eq!(harness.remote.calls(), vec!["test_cases.update".to_string()]);
    assert_eq!(
        harness.cache.is_stale(&CachePartition::TestCases("s1".into())).await,
        Some(false)
    );
    assert_eq!(harness.cache.test_cases("s1").await.unwrap(), before);
    assert!(
        harness
            .drain_messages()
            .iter()
            .any(|m| m.starts_with("Failed to update test case"))
    );
}

#[tokio::test]
async fn test_failed_refetch_keeps_stale_data() {
    let harness = seeded();
    let before = harness.cache.test_cases("s1").await.unwrap();
    harness.remote.fail("test_cases.list");

    harness
        .cache
        .delete_test_case("s1", "c1")
        .await
        .unwrap();

    let partition = CachePartition::TestCases("s1".into());
    assert_eq!(harness.cache.is_stale(&partition).await, Some(true));
    assert_eq!(harness.cache.cached_test_cases("s1").await, Some(before));

    // The next read retries and picks up the server state.
    harness.remote.recover("test_cases.list");
    assert!(harness.cache.test_cases("s1").await.unwrap().is_empty());
    assert_eq!(harness.cache.is_stale(&partition).await, Some(false));
}

#[tokio::test]
async fn test_session_delete_refetches_sessions_and_evicts_its_cases() {
    let harness = seeded();
    harness.cache.sessions().await.unwrap();
    harness.cache.test_cases("s1").await.unwrap();
    harness.cache.test_cases("s2").await.unwrap();
    harness.remote.clear_calls();

    harness.cache.delete_session("s1").await.unwrap();

    assert_eq!(
        harness.remote.calls(),
        vec![
            "sessions.delete".to_string(),
            "sessions.list".to_string(),
        ]
    );
    assert!(harness.cache.cached_test_cases("s1").await.is_none());
    assert_eq!(
        harness
            .cache
            .is_stale(&CachePartition::TestCases("s1".into()))
            .await,
        None
    );
    assert_eq!(harness.cache.cached_test_cases("s2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_validation_blocks_remote_call() {
    let harness = seeded();

    let err = harness
        .cache
        .create_test_case(&TestCaseDraft::new("s1", ""))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let mut draft = TestCaseDraft::new("s1", "Too long");
    draft.execution_time_minutes = 481;
    assert!(harness.cache.create_test_case(&draft).await.unwrap_err().is_validation());

    let err = harness
        .cache
        .update_test_case("s1", "c1", &TestCasePatch::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let config = AiConfigurationDraft {
        provider: "openai".to_string(),
        api_endpoint: "not a url".to_string(),
        model_name: "gpt-4o".to_string(),
        api_key: "sk-test".to_string(),
        user_id: None,
        is_active: true,
    };
    assert!(
        harness
            .cache
            .create_ai_configuration(&config)
            .await
            .unwrap_err()
            .is_validation()
    );

    assert!(harness.remote.calls().is_empty());
}

#[tokio::test]
async fn test_ai_configuration_create_refreshes_list() {
    let harness = seeded();
    assert!(harness.cache.ai_configurations().await.unwrap().is_empty());

    let draft = AiConfigurationDraft {
        provider: "openai".to_string(),
        api_endpoint: "https://api.openai.com/v1".to_string(),
        model_name: "gpt-4o".to_string(),
        api_key: "sk-test-1234".to_string(),
        user_id: None,
        is_active: true,
    };
    let created = harness.cache.create_ai_configuration(&draft).await.unwrap();

    let configs = harness.cache.ai_configurations().await.unwrap();
    assert_eq!(configs, vec![created]);
    assert_eq!(harness.remote.call_count("ai_configurations.list"), 2);
}

#[tokio::test]
async fn test_update_reflects_server_answer() {
    let harness = seeded();
    harness.cache.test_cases("s1").await.unwrap();

    let patch = TestCasePatch {
        case_level: Some(CaseLevel::High),
        ..TestCasePatch::default()
    };
    harness.cache.update_test_case("s1", "c1", &patch).await.unwrap();

    let cases = harness.cache.test_cases("s1").await.unwrap();
    assert_eq!(cases[0].case_level, CaseLevel::High);
}

#[tokio::test]
async fn test_same_kind_is_busy_while_in_flight() {
    let remote = FakeRemote::with_sessions(vec![session("s1", "One")]);
    let cache = Arc::new(MutationCache::new(
        RemoteCollections::from_client(remote.clone()),
        Notifier::new(),
    ));
    let entered = Notify::new();
    let release = Notify::new();

    let slow = cache.execute(Mutation::CreateSession, || async {
        entered.notify_one();
        release.notified().await;
        Result::Ok(())
    });
    let second = async {
        entered.notified().await;
        assert!(cache.is_busy(MutationKind::CreateSession));
        let busy = cache.create_session("Another").await.unwrap_err();
        assert!(busy.is_busy());
        // Other kinds are not blocked.
        cache.rename_session("s1", "Renamed").await.unwrap();
        release.notify_one();
    };
    let (first, ()) = tokio::join!(slow, second);

    first.unwrap();
    assert!(!cache.is_busy(MutationKind::CreateSession));
    assert_eq!(remote.call_count("sessions.create"), 0);
    cache.create_session("Now free").await.unwrap();
}

#[tokio::test]
async fn test_busy_slot_released_after_failure() {
    let harness = seeded();
    harness.remote.fail("sessions.create");

    assert!(harness.cache.create_session("A").await.unwrap_err().is_remote());
    assert!(!harness.cache.is_busy(MutationKind::CreateSession));

    harness.remote.recover("sessions.create");
    assert!(harness.cache.create_session("A").await.is_ok());
}
