use std::sync::Arc;

use tokio::sync::mpsc;

use super::{Item, ItemState};

#[derive(Debug)]
pub enum Event {
    ItemsFetched { state: ItemState, items: Vec<Item> },
    ItemAdded(String),   // Item title
    ItemRemoved(String), // Item title
    ItemsCleared,
    StoreRemoved,
    ActionFailed(String),
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
