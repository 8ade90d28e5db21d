use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use tokio::sync::Notify;

use crate::config::constants::DEFAULT_NOTICE_DURATION;
use crate::models::NoticeKind;
use crate::store::{ItemStore, MockItemStore};

use super::*;

fn controller_with(store: MockItemStore) -> (ItemSyncController, NotificationManager) {
    let notifier = NotificationManager::new();
    let controller = ItemSyncController::new(Arc::new(store), notifier.clone());
    (controller, notifier)
}

#[tokio::test]
async fn test_add_item_reloads_view_and_notifies() {
    let mut store = MockItemStore::new();
    store
        .expect_add()
        .withf(|name, state| name == "Write report" && *state == ItemState::Todo)
        .once()
        .returning(|_, _| Ok(()));
    store
        .expect_fetch_by_state()
        .withf(|state| *state == ItemState::Todo)
        .once()
        .returning(|_| Ok(r#"[{"title":"Write report","state":"to-do"}]"#.to_string()));

    let (controller, notifier) = controller_with(store);
    controller
        .add_item("Write report", ItemState::Todo)
        .await
        .unwrap();

    assert_eq!(
        controller.view(ItemState::Todo).await,
        vec![Item::new("Write report", ItemState::Todo)]
    );

    let notices = notifier.active().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message().message(), "Item added!");
    assert_eq!(*notices[0].message().kind(), NoticeKind::Info);
    assert_eq!(
        notices[0]
            .message()
            .duration()
            .unwrap_or(DEFAULT_NOTICE_DURATION),
        Duration::from_millis(3000)
    );
}

#[tokio::test]
async fn test_empty_title_never_reaches_the_store() {
    // No expectations: any store call fails the test.
    let store = MockItemStore::new();
    let (controller, notifier) = controller_with(store);

    let err = controller.add_item("   ", ItemState::Todo).await;
    assert!(matches!(err, Err(SyncError::EmptyTitle)));

    assert!(controller.view(ItemState::Todo).await.is_empty());
    let notices = notifier.active().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message().message(), "Title must not be empty");
    assert_eq!(*notices[0].message().kind(), NoticeKind::Error);
}

#[tokio::test]
async fn test_add_failure_leaves_views_untouched() {
    let mut store = MockItemStore::new();
    store
        .expect_add()
        .once()
        .returning(|_, _| Err(eyre::eyre!("UNIQUE constraint failed: items.title")));
    // No fetch expectation: a failed add must not trigger a reload.

    let (controller, notifier) = controller_with(store);
    let err = controller.add_item("Write report", ItemState::Todo).await;
    assert!(matches!(err, Err(SyncError::Store(_))));

    assert!(controller.view(ItemState::Todo).await.is_empty());
    let notices = notifier.active().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(*notices[0].message().kind(), NoticeKind::Error);
    assert!(notices[0].message().message().contains("Failed to add item"));
}

#[tokio::test]
async fn test_malformed_payload_is_a_decode_error() {
    let mut store = MockItemStore::new();
    store
        .expect_fetch_by_state()
        .once()
        .returning(|_| Ok("definitely not json".to_string()));

    let (controller, _notifier) = controller_with(store);
    let err = controller.load_by_state(ItemState::Todo).await;
    assert!(matches!(err, Err(SyncError::Decode(_))));
    assert!(controller.view(ItemState::Todo).await.is_empty());
}

#[tokio::test]
async fn test_remove_item_reloads_every_view() {
    let mut store = MockItemStore::new();
    store
        .expect_remove_item()
        .withf(|title| title == "Write report")
        .once()
        .returning(|_| Ok(()));
    store
        .expect_fetch_by_state()
        .times(3)
        .returning(|_| Ok("[]".to_string()));

    let (controller, notifier) = controller_with(store);
    controller.remove_item("Write report").await.unwrap();

    for state in ItemState::ALL {
        assert!(controller.view(state).await.is_empty());
    }
    let notices = notifier.active().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message().message(), "Item removed!");
}

#[tokio::test]
async fn test_remove_item_failure_notifies_and_keeps_views() {
    let mut store = MockItemStore::new();
    store
        .expect_fetch_by_state()
        .once()
        .returning(|_| Ok(r#"[{"title":"Write report","state":"to-do"}]"#.to_string()));
    store
        .expect_remove_item()
        .once()
        .returning(|_| Err(eyre::eyre!("store is on fire")));

    let (controller, notifier) = controller_with(store);
    controller.load_by_state(ItemState::Todo).await.unwrap();

    let err = controller.remove_item("Write report").await;
    assert!(matches!(err, Err(SyncError::Store(_))));

    assert_eq!(controller.view(ItemState::Todo).await.len(), 1);
    let notices = notifier.active().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(*notices[0].message().kind(), NoticeKind::Error);
}

#[tokio::test]
async fn test_clear_all_empties_views_on_success() {
    let mut store = MockItemStore::new();
    store
        .expect_fetch_by_state()
        .once()
        .returning(|_| Ok(r#"[{"title":"Write report","state":"to-do"}]"#.to_string()));
    store.expect_clear().once().returning(|| Ok(()));

    let (controller, notifier) = controller_with(store);
    controller.load_by_state(ItemState::Todo).await.unwrap();
    assert_eq!(controller.view(ItemState::Todo).await.len(), 1);

    controller.clear_all().await.unwrap();

    for state in ItemState::ALL {
        assert!(controller.view(state).await.is_empty());
    }
    let notices = notifier.active().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message().message(), "All items cleared!");
}

#[tokio::test]
async fn test_clear_all_failure_keeps_views() {
    let mut store = MockItemStore::new();
    store
        .expect_fetch_by_state()
        .once()
        .returning(|_| Ok(r#"[{"title":"Write report","state":"to-do"}]"#.to_string()));
    store
        .expect_clear()
        .once()
        .returning(|| Err(eyre::eyre!("store is on fire")));

    let (controller, notifier) = controller_with(store);
    controller.load_by_state(ItemState::Todo).await.unwrap();

    let err = controller.clear_all().await;
    assert!(matches!(err, Err(SyncError::Store(_))));
    assert_eq!(controller.view(ItemState::Todo).await.len(), 1);
    assert_eq!(*notifier.active().await[0].message().kind(), NoticeKind::Error);
}

#[tokio::test]
async fn test_remove_store_empties_views_even_on_failure() {
    let mut store = MockItemStore::new();
    store
        .expect_fetch_by_state()
        .once()
        .returning(|_| Ok(r#"[{"title":"Write report","state":"to-do"}]"#.to_string()));
    store
        .expect_remove()
        .once()
        .returning(|| Err(eyre::eyre!("store is on fire")));

    let (controller, notifier) = controller_with(store);
    controller.load_by_state(ItemState::Todo).await.unwrap();

    let err = controller.remove_store().await;
    assert!(matches!(err, Err(SyncError::Store(_))));

    // The one operation that clears unconditionally.
    for state in ItemState::ALL {
        assert!(controller.view(state).await.is_empty());
    }
    let notices = notifier.active().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(*notices[0].message().kind(), NoticeKind::Error);
}

/// Store double whose first fetch parks on a gate, so a test can get a
/// second fetch issued while the first is still in flight.
struct GatedStore {
    gate: Arc<Notify>,
    calls: AtomicUsize,
}

#[async_trait]
impl ItemStore for GatedStore {
    async fn fetch_by_state(&self, _state: ItemState) -> Result<String> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.gate.notified().await;
            Ok(r#"[{"title":"stale","state":"to-do"}]"#.to_string())
        } else {
            Ok(r#"[{"title":"fresh","state":"to-do"}]"#.to_string())
        }
    }

    async fn add(&self, _name: &str, _state: ItemState) -> Result<()> {
        unreachable!()
    }

    async fn remove_item(&self, _title: &str) -> Result<()> {
        unreachable!()
    }

    async fn clear(&self) -> Result<()> {
        unreachable!()
    }

    async fn remove(&self) -> Result<()> {
        unreachable!()
    }
}

#[tokio::test]
async fn test_slow_stale_fetch_is_dropped() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(GatedStore {
        gate: gate.clone(),
        calls: AtomicUsize::new(0),
    });
    let notifier = NotificationManager::new();
    let controller = ItemSyncController::new(store, notifier);

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.load_by_state(ItemState::Todo).await }
    });
    // Let the first fetch register itself and park on the gate.
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    // The second fetch supersedes the first and resolves immediately.
    let items = controller.load_by_state(ItemState::Todo).await.unwrap();
    assert_eq!(items, vec![Item::new("fresh", ItemState::Todo)]);

    gate.notify_one();
    first.await.unwrap().unwrap();

    // The superseded response never made it into the view.
    assert_eq!(
        controller.view(ItemState::Todo).await,
        vec![Item::new("fresh", ItemState::Todo)]
    );
}
