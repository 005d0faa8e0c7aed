/// Concurrent settlement tests
///
/// Mutations that overlap in flight may settle in any order. Every
/// settlement reseeds from authoritative truth, so whichever lands last
/// leaves the overlay converged.
/// Run with: cargo test --test concurrent_settlement_tests
use rustoverlay::backend::{InMemoryBackend, InMemoryGateway};
use rustoverlay::core::ReconcilePolicy;
use rustoverlay::entity::catalog::{Topic, TopicEntity, TopicParams};
use rustoverlay::surface::{NoticeKind, RecordingModal, RecordingNavigator, RecordingNotifier};
use rustoverlay::ViewWorkbench;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    workbench: Arc<ViewWorkbench<TopicEntity>>,
    gateway: Arc<InMemoryGateway<TopicEntity>>,
    notifier: Arc<RecordingNotifier>,
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
    let notifier = Arc::new(RecordingNotifier::new());
    let workbench = ViewWorkbench::<TopicEntity>::mount(
        stack.source.clone(),
        stack.gateway.clone(),
        Arc::new(RecordingModal::<Topic>::new()),
        notifier.clone(),
        Arc::new(RecordingNavigator::new()),
        ReconcilePolicy::default(),
    )
    .await
    .unwrap();

    Harness {
        workbench: Arc::new(workbench),
        gateway: stack.gateway,
        notifier,
    }
}

fn topic_params(name: &str, slug: &str) -> TopicParams {
    TopicParams {
        name: name.into(),
        slug: slug.into(),
    }
}

#[tokio::test]
async fn test_two_in_flight_creates_converge_after_both_settle() {
    let h = mounted_topics(&[]).await;
    h.gateway.set_latency(Duration::from_millis(80));

    let (a, b) = tokio::join!(
        h.workbench.submit(topic_params("Alpha", "alpha"), None),
        h.workbench.submit(topic_params("Beta", "beta"), None),
    );
    assert!(a.unwrap().is_confirmed());
    assert!(b.unwrap().is_confirmed());

    let list = h.workbench.list().await;
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|t| t.id.is_persisted()));
    assert!(list.iter().any(|t| t.name == "Alpha"));
    assert!(list.iter().any(|t| t.name == "Beta"));
    assert_eq!(h.workbench.pending_count().await, 0);

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 2);
    assert!(notices.iter().all(|n| n.kind == NoticeKind::Success));
}

#[tokio::test]
async fn test_out_of_order_settlement_converges_on_the_last_reseed() {
    let h = mounted_topics(&[]).await;
    h.gateway.set_latency(Duration::from_millis(200));

    let workbench = Arc::clone(&h.workbench);
    let slow = tokio::spawn(async move {
        workbench.submit(topic_params("Alpha", "alpha"), None).await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.workbench.pending_count().await, 1);

    // A second submission overtakes the first and settles immediately. Its
    // reseed snaps the overlay to authoritative truth, which does not yet
    // contain the slower create.
    h.gateway.set_latency(Duration::ZERO);
    let fast = h
        .workbench
        .submit(topic_params("Beta", "beta"), None)
        .await
        .unwrap();
    assert!(fast.is_confirmed());

    let list = h.workbench.list().await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Beta");
    assert_eq!(h.workbench.pending_count().await, 0);

    // Once the slower create settles, its reseed brings both rows in.
    let slow = slow.await.unwrap().unwrap();
    assert!(slow.is_confirmed());

    let list = h.workbench.list().await;
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|t| t.id.is_persisted()));
    assert!(list.iter().any(|t| t.name == "Alpha"));
    assert!(list.iter().any(|t| t.name == "Beta"));
}

#[tokio::test]
async fn test_concurrent_delete_and_create_settle_independently() {
    let h = mounted_topics(&[("Rust", "rust")]).await;
    let doomed = h.workbench.list().await[0].clone();
    h.gateway.set_latency(Duration::from_millis(80));

    let (deleted, created) = tokio::join!(
        h.workbench.request_delete(doomed),
        h.workbench.submit(topic_params("Zig", "zig"), None),
    );
    assert!(deleted.unwrap().is_confirmed());
    assert!(created.unwrap().is_confirmed());

    let list = h.workbench.list().await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Zig");
    assert!(list[0].id.is_persisted());
}

#[tokio::test]
async fn test_burst_of_sequential_creates_all_persist() {
    let h = mounted_topics(&[]).await;

    for i in 0..5 {
        let settlement = h
            .workbench
            .submit(
                topic_params(&format!("Topic {}", i), &format!("topic-{}", i)),
                None,
            )
            .await
            .unwrap();
        assert!(settlement.is_confirmed());
    }

    let list = h.workbench.list().await;
    assert_eq!(list.len(), 5);
    assert!(list.iter().all(|t| t.id.is_persisted()));
    assert_eq!(h.notifier.notices().len(), 5);
}
