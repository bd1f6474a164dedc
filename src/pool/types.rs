use std::fmt;

#[cfg(feature = "postgres")]
use crate::postgres::PgManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;

use crate::config::DbConfig;
use crate::error::EasySqlError;
use crate::types::DatabaseType;

/// Connection pool for database access
///
/// This enum wraps the bb8 pool of the configured backend. `Closed` is what is left
/// after [`Driver::end`](super::Driver::end).
#[derive(Clone)]
pub enum MiddlewarePool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(bb8::Pool<PgManager>),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::Pool<SqliteManager>),
    Closed,
}

impl fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => f.debug_tuple("Postgres").field(&pool.state()).finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => f.debug_tuple("Sqlite").field(&pool.state()).finish(),
            Self::Closed => f.write_str("Closed"),
        }
    }
}

impl MiddlewarePool {
    /// Build the pool for `config`. No connection is opened until the first query.
    ///
    /// # Errors
    /// Returns `EasySqlError::ConfigError` if the configuration does not validate, and
    /// `EasySqlError::ConnectionError` when called outside a Tokio runtime (bb8 starts its
    /// maintenance task as the pool is built).
    pub fn from_config(config: &DbConfig) -> Result<Self, EasySqlError> {
        config.validate()?;
        tokio::runtime::Handle::try_current().map_err(|e| {
            EasySqlError::ConnectionError(format!("a Tokio runtime is required: {e}"))
        })?;
        tracing::debug!(
            db_type = ?config.db_type,
            database = %config.database,
            pool_size = ?config.pool_size,
            "building connection pool"
        );
        match config.db_type {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => PgManager::build_pool(config).map(MiddlewarePool::Postgres),
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => Ok(MiddlewarePool::Sqlite(SqliteManager::build_pool(config))),
        }
    }

    /// The backend this pool talks to, or `None` once closed.
    #[must_use]
    pub fn db_type(&self) -> Option<DatabaseType> {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => Some(DatabaseType::Postgres),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => Some(DatabaseType::Sqlite),
            Self::Closed => None,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
