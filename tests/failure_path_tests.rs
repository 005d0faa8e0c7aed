/// Failure path tests
///
/// Gateway failures settle without rolling the overlay back: the edit
/// surface reopens pre-filled, the failure notice carries the server's
/// reason, and the stale row stays until a refresh reseeds the list.
/// Run with: cargo test --test failure_path_tests
use rustoverlay::backend::{InMemoryBackend, InMemoryGateway};
use rustoverlay::core::{OverlayError, ReconcilePolicy};
use rustoverlay::entity::catalog::{Topic, TopicEntity, TopicParams};
use rustoverlay::surface::{
    ModalCall, NoticeKind, RecordingModal, RecordingNavigator, RecordingNotifier,
};
use rustoverlay::ViewWorkbench;
use std::sync::Arc;

struct Harness {
    backend: InMemoryBackend,
    workbench: ViewWorkbench<TopicEntity>,
    gateway: Arc<InMemoryGateway<TopicEntity>>,
    modal: Arc<RecordingModal<Topic>>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
}

async fn mounted_topics(seeds: &[(&str, &str)]) -> Harness {
    let backend = InMemoryBackend::new();
    let session = backend
        .sign_up("alice@example.com", Some("Alice"), "password123")
        .await
        .unwrap();
    for (name, slug) in seeds {
        backend.seed_topic(name, slug, Some(&session.user.id)).await;
    }

    let stack = backend.topic_stack();
    let modal = Arc::new(RecordingModal::<Topic>::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let workbench = ViewWorkbench::<TopicEntity>::mount(
        stack.source.clone(),
        stack.gateway.clone(),
        modal.clone(),
        notifier.clone(),
        navigator.clone(),
        ReconcilePolicy::default(),
    )
    .await
    .unwrap();

    Harness {
        backend,
        workbench,
        gateway: stack.gateway,
        modal,
        notifier,
        navigator,
    }
}

fn topic_params(name: &str, slug: &str) -> TopicParams {
    TopicParams {
        name: name.into(),
        slug: slug.into(),
    }
}

#[tokio::test]
async fn test_failed_create_reopens_the_form_with_attempted_values() {
    let h = mounted_topics(&[]).await;
    h.gateway.fail_next("server rejected the payload");

    let settlement = h
        .workbench
        .submit(topic_params("Rust", "rust"), None)
        .await
        .unwrap();

    assert!(settlement.outcome.is_failed());
    assert_eq!(
        settlement.outcome.error(),
        Some("server rejected the payload")
    );

    let calls = h.modal.calls();
    assert_eq!(calls[0], ModalCall::Closed);
    assert!(matches!(&calls[1], ModalCall::Opened(Some(record)) if record.name == "Rust"));
    assert_eq!(h.modal.last_prefill().unwrap().slug, "rust");

    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Failure);
    assert_eq!(notice.message, "Failed to create Topic");
    assert_eq!(notice.detail.as_deref(), Some("server rejected the payload"));
}

#[tokio::test]
async fn test_failed_create_leaves_a_dangling_row_until_refresh() {
    let h = mounted_topics(&[("Rust", "rust")]).await;
    h.gateway.fail_next("injected create failure");

    h.workbench
        .submit(topic_params("Zig", "zig"), None)
        .await
        .unwrap();

    // No rollback: the optimistic entry stays in view after the failure.
    let list = h.workbench.list().await;
    assert_eq!(list.len(), 2);
    assert!(list.back().unwrap().id.is_optimistic());
    assert_eq!(h.workbench.pending_count().await, 1);

    h.workbench.refresh().await.unwrap();
    let list = h.workbench.list().await;
    assert_eq!(list.len(), 1);
    assert_eq!(h.workbench.pending_count().await, 0);
}

#[tokio::test]
async fn test_failed_update_shows_attempted_values_until_refresh_reverts() {
    let h = mounted_topics(&[("Rust", "rust")]).await;
    let existing = h.workbench.list().await[0].clone();
    h.gateway.fail_next("injected update failure");

    let settlement = h
        .workbench
        .submit(topic_params("Rust 2024", "rust-2024"), Some(existing.clone()))
        .await
        .unwrap();

    assert!(settlement.outcome.is_failed());
    // The rewritten row keeps its persisted identifier and the values the
    // user attempted.
    let list = h.workbench.list().await;
    assert_eq!(list[0].id, existing.id);
    assert_eq!(list[0].name, "Rust 2024");

    h.workbench.refresh().await.unwrap();
    let list = h.workbench.list().await;
    assert_eq!(list[0].name, "Rust");
    assert_eq!(list[0].slug, "rust");
}

#[tokio::test]
async fn test_failed_delete_restores_the_row_on_refresh() {
    let h = mounted_topics(&[("Rust", "rust")]).await;
    let doomed = h.workbench.list().await[0].clone();
    h.gateway.fail_next("injected delete failure");

    let settlement = h.workbench.request_delete(doomed.clone()).await.unwrap();

    assert!(settlement.outcome.is_failed());
    // Still marked as deleting; nothing navigated.
    let list = h.workbench.list().await;
    assert_eq!(list.len(), 1);
    assert!(list[0].id.is_deleting());
    assert!(h.navigator.paths().is_empty());
    // The delete failure reopens the edit surface like any other action.
    assert!(h.modal.is_open());

    h.workbench.refresh().await.unwrap();
    let list = h.workbench.list().await;
    assert_eq!(list[0].id, doomed.id);
    assert!(list[0].id.is_persisted());
}

#[tokio::test]
async fn test_blank_failure_reason_falls_back_to_the_generic_message() {
    let h = mounted_topics(&[]).await;
    h.gateway.fail_next("   ");

    h.workbench
        .submit(topic_params("Rust", "rust"), None)
        .await
        .unwrap();

    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.detail.as_deref(), Some(OverlayError::GENERIC_FALLBACK));
}

#[tokio::test]
async fn test_duplicate_slug_conflict_reaches_the_user_verbatim() {
    let h = mounted_topics(&[("Rust", "rust")]).await;

    let settlement = h
        .workbench
        .submit(topic_params("Rust again", "rust"), None)
        .await
        .unwrap();

    assert!(settlement.outcome.is_failed());
    assert_eq!(settlement.outcome.error(), Some("duplicate slug"));
    assert_eq!(
        h.notifier.last().unwrap().detail.as_deref(),
        Some("duplicate slug")
    );
}

#[tokio::test]
async fn test_validation_failure_never_touches_overlay_or_gateway() {
    let h = mounted_topics(&[("Rust", "rust")]).await;

    let err = h
        .workbench
        .submit(topic_params("", "Bad Slug"), None)
        .await
        .unwrap_err();

    let OverlayError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert!(errors.field("name").is_some());
    assert!(errors.field("slug").is_some());

    // The modal never closed, nothing was folded in, no notice was shown.
    assert!(h.modal.calls().is_empty());
    assert_eq!(h.workbench.list().await.len(), 1);
    assert!(h.notifier.last().is_none());
}

#[tokio::test]
async fn test_signed_out_user_gets_the_generic_failure() {
    let h = mounted_topics(&[]).await;
    h.backend.sessions().sign_out().await;

    let settlement = h
        .workbench
        .submit(topic_params("Rust", "rust"), None)
        .await
        .unwrap();

    assert!(settlement.outcome.is_failed());
    assert_eq!(
        settlement.outcome.error(),
        Some(OverlayError::GENERIC_FALLBACK)
    );
}

#[tokio::test]
async fn test_armed_fault_is_consumed_by_one_call() {
    let h = mounted_topics(&[]).await;
    h.gateway.fail_next("only once");

    let first = h
        .workbench
        .submit(topic_params("Rust", "rust"), None)
        .await
        .unwrap();
    assert!(first.outcome.is_failed());

    let second = h
        .workbench
        .submit(topic_params("Go", "go"), None)
        .await
        .unwrap();
    assert!(second.is_confirmed());
    // After the confirmed create reseeds, only the stored row remains.
    let list = h.workbench.list().await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Go");
}
