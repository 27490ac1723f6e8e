//! Remote persistence boundary. The store only ever talks to the
//! `RemoteStore` trait; the SQLite implementation here keeps whole
//! serialized graphs keyed by id and plays the authoritative side of
//! save/reset.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use sqlx::{Pool, Sqlite, sqlite::SqlitePool};

use crate::model::Graph;

/// Fetch and save whole graphs. Both calls are all-or-nothing: an error
/// must leave the caller's local state untouched.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn fetch(&self, graph_id: &str) -> Result<Graph>;

    /// Persist the graph and return the authoritative stored copy.
    async fn save(&self, graph_id: &str, graph: &Graph) -> Result<Graph>;
}

#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    pub path: PathBuf,
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(
                std::env::var("ONTOGRAPH_DB_PATH").unwrap_or_else(|_| "ontograph.db".to_string()),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteRemoteStore {
    pool: Pool<Sqlite>,
}

impl SqliteRemoteStore {
    pub async fn new(config: SqliteStoreConfig) -> Result<Self> {
        let db_url = if config.path.is_absolute() {
            format!("sqlite:///{}?mode=rwc", config.path.display())
        } else {
            format!("sqlite:{}?mode=rwc", config.path.display())
        };
        let pool = SqlitePool::connect(&db_url)
            .await
            .context("Failed to connect to SQLite database")?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS graphs (
                id TEXT PRIMARY KEY NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create graphs table")?;

        Ok(())
    }
}

impl RemoteStore for SqliteRemoteStore {
    async fn fetch(&self, graph_id: &str) -> Result<Graph> {
        let content: Option<String> =
            sqlx::query_scalar("SELECT content FROM graphs WHERE id = ?")
                .bind(graph_id)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to fetch graph")?;

        let content = content.ok_or_else(|| anyhow!("no stored graph with id '{graph_id}'"))?;
        serde_json::from_str(&content).context("Stored graph content is not valid")
    }

    async fn save(&self, graph_id: &str, graph: &Graph) -> Result<Graph> {
        let content = serde_json::to_string(graph).context("Failed to serialize graph")?;

        sqlx::query(
            r#"
            INSERT INTO graphs (id, content) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET
                content = excluded.content,
                updated_at = datetime('now')
        "#,
        )
        .bind(graph_id)
        .bind(&content)
        .execute(&self.pool)
        .await
        .context("Failed to save graph")?;

        self.fetch(graph_id).await
    }
}
