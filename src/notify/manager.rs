#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::config::constants::DEFAULT_NOTICE_DURATION;
use crate::models::{NoticeId, NoticeMessage};

/// A notice currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotice {
    id: NoticeId,
    message: NoticeMessage,
}

impl ActiveNotice {
    pub fn id(&self) -> NoticeId {
        self.id
    }

    pub fn message(&self) -> &NoticeMessage {
        &self.message
    }
}

/// Owns the active notices and their expiry timers for the session.
///
/// Clones share the same collection, so the manager can be handed to any
/// component that needs to enqueue messages. Ids come from a counter that
/// survives the collection emptying; an id is never handed out twice.
#[derive(Clone)]
pub struct NotificationManager {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    next_id: NoticeId,
    active: Vec<ActiveNotice>,
    timers: HashMap<NoticeId, AbortHandle>,
}

impl NotificationManager {
    pub fn new() -> NotificationManager {
        NotificationManager {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 1,
                active: vec![],
                timers: HashMap::new(),
            })),
        }
    }

    /// Enqueues a notice and schedules its expiry. Returns the assigned id
    /// immediately; the removal happens asynchronously once the message's
    /// duration (default 3s, zero expires on the next tick) elapses.
    pub async fn add(&self, message: NoticeMessage) -> NoticeId {
        let duration = message.duration().unwrap_or(DEFAULT_NOTICE_DURATION);

        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.active.push(ActiveNotice { id, message });

        let manager = self.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            manager.remove(id).await;
        });
        inner.timers.insert(id, timer.abort_handle());

        id
    }

    /// Removes a notice and aborts its pending timer. Removing an id that
    /// already expired (or never existed) is a no-op: the timer and an
    /// explicit removal may race, harmlessly.
    pub async fn remove(&self, id: NoticeId) {
        let mut inner = self.inner.lock().await;
        if let Some(timer) = inner.timers.remove(&id) {
            timer.abort();
        }
        inner.active.retain(|notice| notice.id != id);
    }

    /// Snapshot of the active notices in insertion order.
    pub async fn active(&self) -> Vec<ActiveNotice> {
        self.inner.lock().await.active.clone()
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}
