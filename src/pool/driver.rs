use async_trait::async_trait;

use super::types::MiddlewarePool;
use crate::config::DbConfig;
use crate::error::EasySqlError;
use crate::query_builder::Statement;
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "postgres")]
use crate::postgres;
#[cfg(feature = "sqlite")]
use crate::sqlite;

/// What a backend hands back for one statement.
#[derive(Debug, Clone)]
pub enum DriverResponse {
    /// The statement produced result columns (possibly zero rows).
    Rows(ResultSet),
    /// The statement produced no columns; the count of rows it changed.
    Affected(usize),
}

/// The seam between the facade and a database backend.
///
/// [`MiddlewarePool`] is the production implementation; tests substitute their own.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Replace the connection settings. Existing connections are dropped.
    ///
    /// # Errors
    /// Returns `EasySqlError::ConfigError` if `config` is unusable.
    fn configure(&mut self, config: &DbConfig) -> Result<(), EasySqlError>;

    /// Run one statement with `?N` placeholders bound to `params`.
    async fn query(&self, sql: &str, params: &[RowValues]) -> Result<DriverResponse, EasySqlError>;

    /// Run `statements` atomically on one connection and return the last response.
    async fn transaction(&self, statements: &[Statement]) -> Result<DriverResponse, EasySqlError>;

    /// Release pooled connections. Later calls fail with `ConnectionError`.
    async fn end(&mut self) -> Result<(), EasySqlError>;
}

fn closed() -> EasySqlError {
    EasySqlError::ConnectionError("connection pool has been closed".to_string())
}

#[async_trait]
impl Driver for MiddlewarePool {
    fn configure(&mut self, config: &DbConfig) -> Result<(), EasySqlError> {
        *self = MiddlewarePool::from_config(config)?;
        Ok(())
    }

    async fn query(&self, sql: &str, params: &[RowValues]) -> Result<DriverResponse, EasySqlError> {
        match self {
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => postgres::execute(pool, sql, params).await,
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => sqlite::execute(pool, sql, params).await,
            MiddlewarePool::Closed => Err(closed()),
        }
    }

    async fn transaction(&self, statements: &[Statement]) -> Result<DriverResponse, EasySqlError> {
        match self {
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => postgres::execute_transaction(pool, statements).await,
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => sqlite::execute_transaction(pool, statements).await,
            MiddlewarePool::Closed => Err(closed()),
        }
    }

    async fn end(&mut self) -> Result<(), EasySqlError> {
        if !self.is_closed() {
            tracing::debug!(db_type = ?self.db_type(), "closing connection pool");
        }
        // dropping the last pool handle closes its idle connections
        *self = MiddlewarePool::Closed;
        Ok(())
    }
}
