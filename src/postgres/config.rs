use std::future::Future;

use bb8::{ManageConnection, Pool};
use tokio_postgres::{Client, NoTls};

use crate::config::DbConfig;
use crate::error::EasySqlError;

const DEFAULT_PORT: u16 = 5432;

/// bb8 manager for Postgres clients.
pub struct PgManager {
    pub(crate) config: tokio_postgres::Config,
}

impl PgManager {
    #[must_use]
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self { config }
    }

    /// Translate a [`DbConfig`] into driver settings.
    ///
    /// # Errors
    /// Returns `EasySqlError::ConfigError` if host or user is missing.
    pub fn from_db_config(config: &DbConfig) -> Result<Self, EasySqlError> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| EasySqlError::ConfigError("host is required".to_string()))?;
        let user = config
            .user
            .as_deref()
            .ok_or_else(|| EasySqlError::ConfigError("user is required".to_string()))?;

        let mut pg = tokio_postgres::Config::new();
        pg.host(host)
            .port(config.port.unwrap_or(DEFAULT_PORT))
            .user(user)
            .dbname(&config.database);
        if let Some(password) = &config.password {
            pg.password(password);
        }
        Ok(Self::new(pg))
    }

    /// Build a lazily connecting pool; connections open on first use.
    ///
    /// Must be called from within a Tokio runtime; `MiddlewarePool::from_config` checks
    /// that before calling here.
    ///
    /// # Errors
    /// Returns `EasySqlError::ConfigError` if the configuration is incomplete.
    pub fn build_pool(config: &DbConfig) -> Result<Pool<PgManager>, EasySqlError> {
        let manager = Self::from_db_config(config)?;
        let mut builder = Pool::builder();
        if let Some(size) = config.pool_size {
            builder = builder.max_size(size);
        }
        Ok(builder.build_unchecked(manager))
    }
}

impl ManageConnection for PgManager {
    type Connection = Client;
    type Error = tokio_postgres::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let cfg = self.config.clone();
        async move {
            tracing::debug!(
                hosts = ?cfg.get_hosts(),
                db = ?cfg.get_dbname(),
                user = ?cfg.get_user(),
                "postgres connect start"
            );
            let (client, connection) = cfg.connect(NoTls).await?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::warn!(error = %e, "postgres connection closed with error");
                }
            });
            Ok(client)
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move { conn.simple_query("SELECT 1").await.map(|_| ()) }
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        conn.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_and_missing_user_is_rejected() {
        let cfg = DbConfig::postgres("localhost", 6000, "app", "pw", "main");
        let manager = PgManager::from_db_config(&cfg).unwrap();
        assert_eq!(manager.config.get_ports(), &[6000]);
        assert_eq!(manager.config.get_dbname(), Some("main"));

        let mut no_port = cfg.clone();
        no_port.port = None;
        let manager = PgManager::from_db_config(&no_port).unwrap();
        assert_eq!(manager.config.get_ports(), &[DEFAULT_PORT]);

        let mut no_user = cfg;
        no_user.user = None;
        assert!(matches!(
            PgManager::from_db_config(&no_user),
            Err(EasySqlError::ConfigError(_))
        ));
    }
}
