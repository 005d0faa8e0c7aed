/// Session tests
///
/// Registration, sign in/out, credential validation, and the fail-closed
/// behavior of the data layer when nobody is signed in.
/// Run with: cargo test --test session_tests
use rustoverlay::backend::InMemoryBackend;
use rustoverlay::core::{OverlayError, RecordId};
use rustoverlay::runtime::AuthoritativeSource;

#[tokio::test]
async fn test_sign_up_activates_a_session() {
    let backend = InMemoryBackend::new();
    let session = backend
        .sign_up("alice@example.com", Some("Alice"), "password123")
        .await
        .unwrap();

    assert_eq!(session.user.email, "alice@example.com");
    assert_eq!(session.user.name.as_deref(), Some("Alice"));
    assert!(session.user.id.is_persisted());

    let current = backend.sessions().current().await.unwrap();
    assert_eq!(current.user.id, session.user.id);
}

#[tokio::test]
async fn test_duplicate_registration_is_refused() {
    let backend = InMemoryBackend::new();
    backend
        .sign_up("alice@example.com", None, "password123")
        .await
        .unwrap();

    let err = backend
        .sign_up("alice@example.com", None, "password456")
        .await
        .unwrap_err();
    assert!(matches!(err, OverlayError::Conflict(_)));
}

#[tokio::test]
async fn test_credential_validation_collects_field_errors() {
    let backend = InMemoryBackend::new();
    let err = backend
        .sign_up("not-an-email", None, "short")
        .await
        .unwrap_err();

    let OverlayError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert!(errors.field("email").is_some());
    assert!(errors.field("password").is_some());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_read_the_same() {
    let backend = InMemoryBackend::new();
    let sessions = backend.sessions();
    backend
        .sign_up("alice@example.com", None, "password123")
        .await
        .unwrap();
    sessions.sign_out().await;

    let wrong_password = sessions
        .sign_in("alice@example.com", "password999")
        .await
        .unwrap_err();
    let unknown_email = sessions
        .sign_in("bob@example.com", "password123")
        .await
        .unwrap_err();

    // Neither message reveals which half of the credentials was wrong.
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert!(matches!(wrong_password, OverlayError::Forbidden(_)));
}

#[tokio::test]
async fn test_sign_in_after_sign_out_restores_the_account() {
    let backend = InMemoryBackend::new();
    let sessions = backend.sessions();
    let original = backend
        .sign_up("alice@example.com", Some("Alice"), "password123")
        .await
        .unwrap();

    sessions.sign_out().await;
    assert!(matches!(
        sessions.current().await,
        Err(OverlayError::Unauthenticated)
    ));

    let restored = sessions
        .sign_in("alice@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(restored.user.id, original.user.id);
    assert_eq!(restored.user.name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn test_fetch_list_fails_closed_without_a_session() {
    let backend = InMemoryBackend::new();
    let stack = backend.topic_stack();

    let err = stack.source.fetch_list().await.unwrap_err();
    assert!(matches!(err, OverlayError::Unauthenticated));
}

#[tokio::test]
async fn test_lists_are_scoped_to_the_signed_in_user() {
    let backend = InMemoryBackend::new();
    let alice = backend
        .sign_up("alice@example.com", None, "password123")
        .await
        .unwrap();
    backend.seed_topic("Mine", "mine", Some(&alice.user.id)).await;
    backend
        .seed_topic("Theirs", "theirs", Some(&RecordId::new("someone-else")))
        .await;

    let stack = backend.topic_stack();
    let list = stack.source.fetch_list().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Mine");
}

#[tokio::test]
async fn test_switching_accounts_switches_the_visible_rows() {
    let backend = InMemoryBackend::new();
    let sessions = backend.sessions();
    let alice = backend
        .sign_up("alice@example.com", None, "password123")
        .await
        .unwrap();
    backend
        .seed_topic("Alice's", "alices", Some(&alice.user.id))
        .await;

    // Registering bob switches the active session to him.
    backend
        .sign_up("bob@example.com", None, "password123")
        .await
        .unwrap();
    let stack = backend.topic_stack();
    assert!(stack.source.fetch_list().await.unwrap().is_empty());

    sessions
        .sign_in("alice@example.com", "password123")
        .await
        .unwrap();
    let list = stack.source.fetch_list().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Alice's");
}
