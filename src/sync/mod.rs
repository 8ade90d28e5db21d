pub mod controller;

pub use controller::ItemSyncController;

use thiserror::Error;

/// What can go wrong between the user and the store. Validation failures
/// never reach the store; a malformed payload is kept apart from a
/// command the store rejected because it signals a protocol mismatch,
/// not a business rule.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("store command failed: {0}")]
    Store(eyre::Error),
    #[error("malformed store payload: {0}")]
    Decode(#[from] serde_json::Error),
}
