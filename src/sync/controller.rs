#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::models::{Item, ItemState};
use crate::notify::NotificationManager;
use crate::store::ArcItemStore;
use crate::{error_notice, info_notice};

use super::SyncError;

/// Client-side view of the store, one item list per state.
///
/// After every mutating command the controller re-fetches the affected
/// views instead of patching its snapshot. The store is the only place
/// that can guarantee title uniqueness and ordering once concurrent
/// writers exist, so a locally appended item can drift from truth; do
/// not regress this to an optimistic append.
///
/// Every mutating operation finishes with exactly one notice, success
/// or failure, so the user is never left without feedback.
#[derive(Clone)]
pub struct ItemSyncController {
    store: ArcItemStore,
    notifier: NotificationManager,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    views: HashMap<ItemState, Vec<Item>>,
    inflight: HashMap<ItemState, CancellationToken>,
}

impl ItemSyncController {
    pub fn new(store: ArcItemStore, notifier: NotificationManager) -> ItemSyncController {
        ItemSyncController {
            store,
            notifier,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Snapshot of one view.
    pub async fn view(&self, state: ItemState) -> Vec<Item> {
        self.inner
            .lock()
            .await
            .views
            .get(&state)
            .cloned()
            .unwrap_or_default()
    }

    /// Refreshes a view from the store and returns its content.
    ///
    /// In-flight fetches for the same view are drop-and-replace: issuing
    /// a new fetch cancels the previous one, so a slow early response can
    /// never overwrite a fast later one. The view always reflects the
    /// last fetch issued, not the last response received.
    pub async fn load_by_state(&self, state: ItemState) -> Result<Vec<Item>, SyncError> {
        self.refresh(state).await?;
        Ok(self.view(state).await)
    }

    /// Validates the title locally, then asks the store to create the
    /// item. Obviously invalid input never costs a round trip. On success
    /// the affected view is reloaded from the store.
    pub async fn add_item(&self, title: &str, state: ItemState) -> Result<(), SyncError> {
        let title = title.trim();
        if title.is_empty() {
            self.notifier
                .add(error_notice!("Title must not be empty"))
                .await;
            return Err(SyncError::EmptyTitle);
        }

        match self.store.add(title, state).await {
            Ok(()) => {
                if let Err(err) = self.refresh(state).await {
                    log::warn!("Failed to refresh {} view after add: {}", state, err);
                }
                self.notifier.add(info_notice!("Item added!")).await;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to add item {}: {}", title, err);
                self.notifier
                    .add(error_notice!(format!("Failed to add item: {}", err)))
                    .await;
                Err(SyncError::Store(err))
            }
        }
    }

    /// Removes an item by title and reloads every view; the title may
    /// have lived in any of them.
    pub async fn remove_item(&self, title: &str) -> Result<(), SyncError> {
        match self.store.remove_item(title).await {
            Ok(()) => {
                for state in ItemState::ALL {
                    if let Err(err) = self.refresh(state).await {
                        log::warn!("Failed to refresh {} view after removal: {}", state, err);
                    }
                }
                self.notifier.add(info_notice!("Item removed!")).await;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to remove item {}: {}", title, err);
                self.notifier
                    .add(error_notice!(format!("Failed to remove item: {}", err)))
                    .await;
                Err(SyncError::Store(err))
            }
        }
    }

    /// Clears every stored item. Views empty only once the store
    /// confirmed; on failure they keep showing what the store still
    /// holds.
    pub async fn clear_all(&self) -> Result<(), SyncError> {
        match self.store.clear().await {
            Ok(()) => {
                self.clear_views().await;
                self.notifier.add(info_notice!("All items cleared!")).await;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to clear items: {}", err);
                self.notifier
                    .add(error_notice!(format!("Failed to clear items: {}", err)))
                    .await;
                Err(SyncError::Store(err))
            }
        }
    }

    /// Destroys the persisted store. This is the one operation that
    /// empties local state regardless of the response: the remote has
    /// nothing left to report, so there is nothing to re-fetch.
    pub async fn remove_store(&self) -> Result<(), SyncError> {
        let result = self.store.remove().await;
        self.clear_views().await;
        match result {
            Ok(()) => {
                self.notifier.add(info_notice!("Store removed!")).await;
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to remove store: {}", err);
                self.notifier
                    .add(error_notice!(format!("Failed to remove store: {}", err)))
                    .await;
                Err(SyncError::Store(err))
            }
        }
    }

    async fn refresh(&self, state: ItemState) -> Result<(), SyncError> {
        let token = {
            let mut inner = self.inner.lock().await;
            let token = CancellationToken::new();
            if let Some(stale) = inner.inflight.insert(state, token.clone()) {
                stale.cancel();
            }
            token
        };

        let payload = tokio::select! {
            _ = token.cancelled() => {
                log::debug!("Fetch for {} view superseded, dropping", state);
                return Ok(());
            }
            payload = self.store.fetch_by_state(state) => {
                payload.map_err(SyncError::Store)?
            }
        };
        let items = decode_items(&payload)?;

        let mut inner = self.inner.lock().await;
        if token.is_cancelled() {
            log::debug!("Fetch for {} view superseded, dropping", state);
            return Ok(());
        }
        inner.views.insert(state, items);
        Ok(())
    }

    async fn clear_views(&self) {
        let mut inner = self.inner.lock().await;
        // An in-flight fetch must not resurrect items into an emptied view.
        for token in inner.inflight.values() {
            token.cancel();
        }
        inner.views.clear();
    }
}

fn decode_items(payload: &str) -> Result<Vec<Item>, SyncError> {
    serde_json::from_str(payload).map_err(|err| {
        log::warn!("Malformed store payload, protocol mismatch: {}", err);
        SyncError::Decode(err)
    })
}
