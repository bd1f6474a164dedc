use thiserror::Error;

#[derive(Debug, Error)]
pub enum EasySqlError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] bb8::RunError<tokio_postgres::Error>),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolErrorSqlite(#[from] bb8::RunError<rusqlite::Error>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// Malformed object text handed to a statement builder.
    #[error("Parse error at byte {position}: {message}")]
    ParseError { message: String, position: usize },

    /// Data that cannot be turned into a statement (wrong shape, no columns left).
    #[error("Statement build error: {0}")]
    BuildError(String),
}

impl EasySqlError {
    pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
        EasySqlError::ParseError {
            message: message.into(),
            position,
        }
    }
}
