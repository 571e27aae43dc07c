//! Upload coordinator tests.
//!
//! Run with: `cargo test -p galerie-gallery --test uploader_test`

mod helpers;

use galerie_core::FileKind;
use galerie_gallery::test_helpers::MockFileStore;
use galerie_gallery::{UploadCoordinator, UploadStatus};
use helpers::candidate;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn submit_without_owner_fails_without_network() {
    let store = Arc::new(MockFileStore::new());
    let coordinator = UploadCoordinator::new(store.clone());

    let result = coordinator
        .submit(None, vec![candidate("a.png", "image/png", 10)])
        .await;

    assert_eq!(result.unwrap_err().code(), "UNAUTHORIZED");
    assert_eq!(store.upload_calls(), 0);
    assert_eq!(coordinator.status(), UploadStatus::Idle);
}

#[tokio::test]
async fn successful_batch_reaches_succeeded_at_full_progress() {
    let store = Arc::new(MockFileStore::new());
    let coordinator = UploadCoordinator::new(store.clone());
    let owner = Uuid::new_v4();

    let batch = vec![
        candidate("a.png", "image/png", 10),
        candidate("b.jpg", "image/jpeg", 10),
        candidate("facture.pdf", "application/pdf", 10),
    ];
    let stored = coordinator.submit(Some(owner), batch).await.unwrap();

    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].kind, FileKind::Image);
    assert_eq!(stored[2].kind, FileKind::Pdf);
    assert_eq!(coordinator.status(), UploadStatus::Succeeded);
    assert_eq!(coordinator.progress(), 100);
    assert_eq!(store.stored(owner).len(), 3);
}

#[tokio::test]
async fn double_submission_is_rejected_while_uploading() {
    let store = Arc::new(MockFileStore::new());
    store.set_upload_delay(Duration::from_millis(100));
    let coordinator = Arc::new(UploadCoordinator::new(store.clone()));
    let owner = Uuid::new_v4();

    let first = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator
                .submit(Some(owner), vec![candidate("a.png", "image/png", 10)])
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = coordinator
        .submit(Some(owner), vec![candidate("b.png", "image/png", 10)])
        .await;

    assert_eq!(second.unwrap_err().code(), "UPLOAD_IN_PROGRESS");
    assert!(first.await.unwrap().is_ok());
    assert_eq!(store.upload_calls(), 1);
}

#[tokio::test]
async fn progress_is_monotonic_and_clamped() {
    let store = Arc::new(MockFileStore::new());
    store.set_progress_script(vec![10, 5, 30, 200]);
    store.set_progress_step_delay(Duration::from_millis(10));
    let coordinator = Arc::new(UploadCoordinator::new(store.clone()));
    let owner = Uuid::new_v4();

    let mut rx = coordinator.subscribe();
    let collector = tokio::spawn(async move {
        let mut seen = vec![*rx.borrow()];
        while rx.changed().await.is_ok() {
            let value = *rx.borrow();
            seen.push(value);
            if value == 100 {
                break;
            }
        }
        seen
    });

    coordinator
        .submit(Some(owner), vec![candidate("a.png", "image/png", 10)])
        .await
        .unwrap();

    let seen = collector.await.unwrap();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "saw {:?}", seen);
    assert!(seen.iter().all(|&p| p <= 100));
    assert_eq!(*seen.last().unwrap(), 100);
}

#[tokio::test]
async fn failed_upload_keeps_last_progress_and_error() {
    let store = Arc::new(MockFileStore::new());
    store.set_fail_uploads(true);
    store.set_progress_script(vec![40]);
    let coordinator = UploadCoordinator::new(store.clone());
    let owner = Uuid::new_v4();

    let result = coordinator
        .submit(Some(owner), vec![candidate("a.png", "image/png", 10)])
        .await;

    assert_eq!(result.unwrap_err().code(), "UPLOAD_FAILED");
    assert_eq!(coordinator.status(), UploadStatus::Failed);
    assert_eq!(coordinator.progress(), 40);

    let session = coordinator.session();
    assert_eq!(session.error.unwrap().code(), "UPLOAD_FAILED");
}

#[tokio::test]
async fn acknowledge_returns_a_terminal_session_to_idle() {
    let store = Arc::new(MockFileStore::new());
    let coordinator = UploadCoordinator::new(store.clone());
    let owner = Uuid::new_v4();

    coordinator
        .submit(Some(owner), vec![candidate("a.png", "image/png", 10)])
        .await
        .unwrap();
    assert_eq!(coordinator.status(), UploadStatus::Succeeded);

    coordinator.acknowledge();
    assert_eq!(coordinator.status(), UploadStatus::Idle);
    assert!(coordinator.last_error().is_none());
}

#[tokio::test]
async fn superseded_session_progress_is_ignored() {
    let store = Arc::new(MockFileStore::new());
    let coordinator = Arc::new(UploadCoordinator::new(store.clone()));
    let owner = Uuid::new_v4();

    coordinator
        .submit(Some(owner), vec![candidate("a.png", "image/png", 10)])
        .await
        .unwrap();
    let stale = store.held_progress().unwrap();
    coordinator.acknowledge();

    store.set_upload_delay(Duration::from_millis(100));
    store.set_progress_script(vec![0]);
    let second = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator
                .submit(Some(owner), vec![candidate("b.png", "image/png", 10)])
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    // Late event from the first session must not touch the new session.
    stale(77);
    assert_eq!(coordinator.progress(), 0);

    second.await.unwrap().unwrap();
    assert_eq!(coordinator.progress(), 100);
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
    let store = Arc::new(MockFileStore::new());
    let coordinator = UploadCoordinator::new(store.clone());

    let stored = coordinator.submit(Some(Uuid::new_v4()), vec![]).await.unwrap();

    assert!(stored.is_empty());
    assert_eq!(store.upload_calls(), 0);
    assert_eq!(coordinator.status(), UploadStatus::Idle);
}
