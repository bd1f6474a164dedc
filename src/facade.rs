use crate::config::DbConfig;
use crate::error::EasySqlError;
use crate::executor;
use crate::outcome::{ErrorDetail, QueryFailure, QueryOutcome};
use crate::pool::{Driver, MiddlewarePool};
use crate::query_builder::{Record, Statement, build_delete, build_insert, build_update};

/// A database handle with convenience operations for common statements.
///
/// Every operation resolves to either a [`QueryOutcome`] or a [`QueryFailure`]; parse and
/// build problems surface as `QueryFailure::Invalid`, driver problems follow the
/// [`ErrorDetail`] passed with the call.
///
/// ```rust,no_run
/// use easy_sql::prelude::*;
/// use serde_json::json;
///
/// # async fn run() -> Result<(), QueryFailure> {
/// let db = EasySql::connect(DbConfig::sqlite("app.db")).await?;
/// db.insert("users", &json!({"name": "bob", "age": 3}), ErrorDetail::Include).await?;
/// let row = db.query("SELECT name FROM users", ErrorDetail::Include).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EasySql<D: Driver = MiddlewarePool> {
    driver: D,
    debug: bool,
}

impl EasySql<MiddlewarePool> {
    /// Build a facade for `config`, or `None` when no configuration is given.
    ///
    /// Connections open lazily, so an unreachable database is reported by the first
    /// query. An invalid configuration, or a call made outside a Tokio runtime, logs the
    /// reason and yields `None`.
    #[must_use]
    pub fn create(config: Option<DbConfig>) -> Option<Self> {
        let config = config?;
        match MiddlewarePool::from_config(&config) {
            Ok(pool) => Some(Self::with_driver(pool, config.debug)),
            Err(e) => {
                tracing::error!(error = %e, "invalid database configuration");
                None
            }
        }
    }

    /// Build a facade and check one connection out before returning.
    ///
    /// # Errors
    /// Returns `EasySqlError::ConfigError` for an invalid configuration, or the pool
    /// error when no connection can be opened.
    pub async fn connect(config: DbConfig) -> Result<Self, EasySqlError> {
        let pool = MiddlewarePool::from_config(&config)?;
        match &pool {
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(p) => drop(p.get().await?),
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(p) => drop(p.get().await?),
            MiddlewarePool::Closed => {}
        }
        Ok(Self::with_driver(pool, config.debug))
    }
}

impl<D: Driver> EasySql<D> {
    pub fn with_driver(driver: D, debug: bool) -> Self {
        Self { driver, debug }
    }

    /// Switch to a new configuration; the debug flag is replaced too.
    ///
    /// # Errors
    /// Returns `EasySqlError::ConfigError` if `config` is unusable; the previous driver
    /// is kept in that case.
    pub fn configure(&mut self, config: DbConfig) -> Result<(), EasySqlError> {
        self.driver.configure(&config)?;
        self.debug = config.debug;
        tracing::debug!(db_type = ?config.db_type, database = %config.database, "reconfigured");
        Ok(())
    }

    /// The underlying driver handle.
    pub fn database(&self) -> &D {
        &self.driver
    }

    /// Close the driver's connections. Later operations fail with a connection error.
    ///
    /// # Errors
    /// Returns the driver's error if shutdown fails.
    pub async fn end(&mut self) -> Result<(), EasySqlError> {
        self.driver.end().await
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Run raw SQL.
    ///
    /// # Errors
    /// See [`QueryFailure`].
    pub async fn query(
        &self,
        sql: &str,
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure> {
        self.query_statement(&Statement::new(sql), detail).await
    }

    /// Run a statement with bound parameters.
    ///
    /// # Errors
    /// See [`QueryFailure`].
    pub async fn query_statement(
        &self,
        stmt: &Statement,
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure> {
        executor::execute(&self.driver, stmt, detail, self.debug).await
    }

    /// Insert every key of `data` as a column.
    ///
    /// # Errors
    /// `QueryFailure::Invalid` when `data` cannot be turned into a statement.
    pub async fn insert<'a>(
        &self,
        table: &str,
        data: impl Into<Record<'a>>,
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure> {
        let stmt = build_insert(table, data, None)?;
        self.query_statement(&stmt, detail).await
    }

    /// Insert only the `columns` present in `data`, in `columns` order.
    ///
    /// # Errors
    /// `QueryFailure::Invalid` when no listed column is present in `data`.
    pub async fn insert_with_columns<'a>(
        &self,
        table: &str,
        columns: &[&str],
        data: impl Into<Record<'a>>,
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure> {
        let stmt = build_insert(table, data, Some(columns))?;
        self.query_statement(&stmt, detail).await
    }

    /// Update every key of `data` on the rows matching `where_clause`.
    ///
    /// # Errors
    /// `QueryFailure::Invalid` when `data` cannot be turned into a statement.
    pub async fn update<'a>(
        &self,
        table: &str,
        data: impl Into<Record<'a>>,
        where_clause: &str,
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure> {
        let stmt = build_update(table, data, where_clause, None)?;
        self.query_statement(&stmt, detail).await
    }

    /// # Errors
    /// `QueryFailure::Invalid` when no listed column is present in `data`.
    pub async fn update_with_columns<'a>(
        &self,
        table: &str,
        columns: &[&str],
        data: impl Into<Record<'a>>,
        where_clause: &str,
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure> {
        let stmt = build_update(table, data, where_clause, Some(columns))?;
        self.query_statement(&stmt, detail).await
    }

    /// # Errors
    /// See [`QueryFailure`].
    pub async fn delete(
        &self,
        table: &str,
        where_clause: &str,
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure> {
        self.query_statement(&build_delete(table, where_clause), detail)
            .await
    }

    /// Run `statements` atomically on one connection.
    ///
    /// The outcome is that of the last statement (`Empty` for an empty list). On the
    /// first failure nothing is committed.
    ///
    /// # Errors
    /// See [`QueryFailure`].
    pub async fn transaction<S>(
        &self,
        statements: &[S],
        detail: ErrorDetail,
    ) -> Result<QueryOutcome, QueryFailure>
    where
        S: Clone + Into<Statement>,
    {
        let statements: Vec<Statement> = statements.iter().cloned().map(Into::into).collect();
        executor::execute_transaction(&self.driver, &statements, detail, self.debug).await
    }
}

/// Shorthand for [`EasySql::create`].
#[must_use]
pub fn create(config: Option<DbConfig>) -> Option<EasySql> {
    EasySql::create(config)
}
