use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool};
use tokio::sync::Mutex;

use crate::config::DbConfig;

/// A pooled `SQLite` connection; the mutex serializes the blocking work run against it.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// bb8 manager opening `SQLite` connections for one database path.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    path: String,
}

impl SqliteManager {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Build a lazily connecting pool; connections open on first use.
    ///
    /// Must be called from within a Tokio runtime; [`MiddlewarePool::from_config`]
    /// checks that before calling here.
    ///
    /// [`MiddlewarePool::from_config`]: crate::pool::MiddlewarePool::from_config
    #[must_use]
    pub fn build_pool(config: &DbConfig) -> Pool<SqliteManager> {
        let mut builder = Pool::builder();
        if let Some(size) = config.pool_size {
            builder = builder.max_size(size);
        }
        builder.build_unchecked(SqliteManager::new(config.database.clone()))
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = rusqlite::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.path.clone();
        async move {
            let conn = rusqlite::Connection::open(&path)?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            tracing::debug!(path = %path, "sqlite connection opened");
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let conn = Arc::clone(conn);
        async move {
            tokio::task::spawn_blocking(move || {
                let guard = conn.blocking_lock();
                guard.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await
            .map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_INTERNAL),
                    Some(format!("sqlite validity check did not complete: {e}")),
                )
            })?
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn checkout_validation_runs_on_the_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SqliteManager::new(dir.path().join("v.db").to_string_lossy().into_owned());
        let mut conn = manager.connect().await.unwrap();
        manager.is_valid(&mut conn).await.unwrap();

        // the check waits for a connection that is in use
        let held = Arc::clone(&conn).lock_owned().await;
        let check = tokio::spawn({
            let manager = manager.clone();
            let mut conn = Arc::clone(&conn);
            async move { manager.is_valid(&mut conn).await }
        });
        tokio::task::yield_now().await;
        drop(held);
        check.await.unwrap().unwrap();
    }
}
