#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;

pub(crate) mod migration;

use async_trait::async_trait;
use eyre::{Context, Result};
use tokio::sync::Mutex;
use tokio_rusqlite::{Connection, OpenFlags, named_params, rusqlite};

use crate::models::{Item, ItemState};
use crate::store::ItemStore;

use migration::MIGRATION;

pub struct Sqlite {
    conn: Mutex<Connection>,
    path: Option<String>,
}

impl Sqlite {
    pub async fn new(path: Option<&str>) -> Result<Self> {
        let conn = open_connection(path).await?;
        let ret = Self {
            conn: Mutex::new(conn),
            path: path.map(str::to_string),
        };
        ret.run_migration().await.wrap_err("running migration")?;
        Ok(ret)
    }

    async fn run_migration(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.call(|conn| Ok::<_, rusqlite::Error>(conn.execute_batch(MIGRATION)?))
            .await
            .wrap_err("executing migration")?;
        Ok(())
    }
}

async fn open_connection(path: Option<&str>) -> Result<Connection> {
    let conn = match path {
        Some(path) => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .await
        .wrap_err(format!("opening database path: {}", path))?,
        None => Connection::open_in_memory()
            .await
            .wrap_err("opening in-memory database")?,
    };
    Ok(conn)
}

#[async_trait]
impl ItemStore for Sqlite {
    async fn fetch_by_state(&self, state: ItemState) -> Result<String> {
        let conn = self.conn.lock().await;
        let rows = conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT title, state FROM items WHERE state = :state")?;
                let mut rows = stmt.query(named_params! { ":state": state.as_str() })?;
                let mut items = vec![];
                while let Some(row) = rows.next()? {
                    let title: String = row.get(0)?;
                    let state: String = row.get(1)?;
                    items.push((title, state));
                }
                Ok::<_, rusqlite::Error>(items)
            })
            .await
            .wrap_err("fetching items")?;

        let items = rows
            .into_iter()
            .map(|(title, state)| Ok(Item::new(title, state.parse::<ItemState>()?)))
            .collect::<Result<Vec<_>>>()?;
        serde_json::to_string(&items).wrap_err("encoding items")
    }

    async fn add(&self, name: &str, state: ItemState) -> Result<()> {
        let title = name.to_string();
        let conn = self.conn.lock().await;
        conn.call(move |conn| {
            let mut stmt =
                conn.prepare("INSERT INTO items (title, state) VALUES (:title, :state)")?;
            stmt.execute(named_params! { ":title": title, ":state": state.as_str() })?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .wrap_err(format!("adding item {}", name))?;
        Ok(())
    }

    async fn remove_item(&self, title: &str) -> Result<()> {
        let owned = title.to_string();
        let conn = self.conn.lock().await;
        conn.call(move |conn| {
            let mut stmt = conn.prepare("DELETE FROM items WHERE title = :title")?;
            stmt.execute(named_params! { ":title": owned })?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .wrap_err(format!("removing item {}", title))?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.call(|conn| Ok::<_, rusqlite::Error>(conn.execute_batch("DELETE FROM items")?))
            .await
            .wrap_err("clearing items")?;
        Ok(())
    }

    // Destroys everything the store persisted, then brings the schema
    // back so the connection stays usable for later adds. File-backed
    // databases start over from a fresh file.
    async fn remove(&self) -> Result<()> {
        let mut conn = self.conn.lock().await;
        match self.path.as_deref() {
            Some(path) => {
                conn.clone().close().await.wrap_err("closing database")?;
                std::fs::remove_file(path)
                    .wrap_err(format!("removing database file {}", path))?;
                *conn = open_connection(Some(path)).await?;
            }
            None => {
                conn.call(|conn| {
                    Ok::<_, rusqlite::Error>(conn.execute_batch("DROP TABLE IF EXISTS items")?)
                })
                    .await
                    .wrap_err("dropping items table")?;
            }
        }
        conn.call(|conn| Ok::<_, rusqlite::Error>(conn.execute_batch(MIGRATION)?))
            .await
            .wrap_err("recreating schema")?;
        Ok(())
    }
}
