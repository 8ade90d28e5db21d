pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use sqlite::Sqlite;

#[cfg(test)]
use mockall::automock;

use crate::config::StorageConfig;
use crate::models::ItemState;

/// Command surface of the authoritative item store.
///
/// `fetch_by_state` answers with encoded text; decoding it into items is
/// the caller's job, so a malformed payload stays distinguishable from a
/// command the store itself rejected.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemStore {
    async fn fetch_by_state(&self, state: ItemState) -> Result<String>;
    async fn add(&self, name: &str, state: ItemState) -> Result<()>;
    async fn remove_item(&self, title: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
    async fn remove(&self) -> Result<()>;
}

pub type ArcItemStore = Arc<dyn ItemStore + Send + Sync>;

pub async fn new_store(config: &StorageConfig) -> Result<ArcItemStore> {
    let store = match config {
        StorageConfig::Sqlite(sqlite_config) => Arc::new(Sqlite::new(sqlite_config.path()).await?),
    };
    Ok(store)
}
