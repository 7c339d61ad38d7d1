use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqliteConnection, SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{KeyValueStore, Storage};

mod kv_repo;
mod migrate;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Progress entries kept in a local `SQLite` file (`kv_entries` table).
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open a pool on `database_url`. Every new connection runs in WAL mode
    /// and waits up to five seconds on a locked database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` when the database cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .after_connect(|conn, _meta| Box::pin(async move { configure(conn).await }))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// [`SqliteRepository::connect`] followed by [`SqliteRepository::migrate`].
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if either step fails.
    pub async fn open(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the `kv_entries` schema up to date. Safe to run on every start.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration statement fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

async fn configure(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for pragma in ["PRAGMA journal_mode = WAL;", "PRAGMA busy_timeout = 5000;"] {
        sqlx::query(pragma).execute(&mut *conn).await?;
    }
    Ok(())
}

impl Storage {
    /// Progress storage on a migrated `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or migrated.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteRepository::open(database_url).await?);
        Ok(Self { kv })
    }
}
