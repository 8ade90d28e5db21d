#[cfg(test)]
#[path = "action_test.rs"]
mod tests;

use std::sync::Arc;

use eyre::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::{Action, ArcEventTx, Event};
use crate::sync::ItemSyncController;

/// Session event loop: turns user actions into controller calls and
/// publishes the outcome as events. Each action runs on its own worker
/// so a slow store command never stalls the loop; the controller
/// serializes whatever must be serialized.
pub struct ActionService {
    event_tx: ArcEventTx,
    action_rx: mpsc::UnboundedReceiver<Action>,
    cancel_token: CancellationToken,
    controller: ItemSyncController,
}

impl ActionService {
    pub fn new(
        controller: ItemSyncController,
        action_rx: mpsc::UnboundedReceiver<Action>,
        event_tx: ArcEventTx,
        cancel_token: CancellationToken,
    ) -> ActionService {
        ActionService {
            event_tx,
            action_rx,
            cancel_token,
            controller,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Action service cancelled");
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    let Some(action) = action else {
                        log::debug!("Action channel closed");
                        return Ok(());
                    };
                    let event_tx = Arc::clone(&self.event_tx);
                    let controller = self.controller.clone();
                    tokio::spawn(async move {
                        if let Err(err) = dispatch(controller, action, event_tx).await {
                            log::error!("Failed to publish event: {}", err);
                        }
                    });
                }
            }
        }
    }
}

async fn dispatch(
    controller: ItemSyncController,
    action: Action,
    event_tx: ArcEventTx,
) -> Result<()> {
    match action {
        Action::LoadItems(state) => match controller.load_by_state(state).await {
            Ok(items) => event_tx.send(Event::ItemsFetched { state, items }).await?,
            Err(err) => event_tx.send(Event::ActionFailed(err.to_string())).await?,
        },

        Action::AddItem { title, state } => match controller.add_item(&title, state).await {
            Ok(()) => event_tx.send(Event::ItemAdded(title)).await?,
            Err(err) => event_tx.send(Event::ActionFailed(err.to_string())).await?,
        },

        Action::RemoveItem(title) => match controller.remove_item(&title).await {
            Ok(()) => event_tx.send(Event::ItemRemoved(title)).await?,
            Err(err) => event_tx.send(Event::ActionFailed(err.to_string())).await?,
        },

        Action::ClearItems => match controller.clear_all().await {
            Ok(()) => event_tx.send(Event::ItemsCleared).await?,
            Err(err) => event_tx.send(Event::ActionFailed(err.to_string())).await?,
        },

        Action::RemoveStore => match controller.remove_store().await {
            Ok(()) => event_tx.send(Event::StoreRemoved).await?,
            Err(err) => event_tx.send(Event::ActionFailed(err.to_string())).await?,
        },
    }
    Ok(())
}
