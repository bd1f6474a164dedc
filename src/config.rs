use serde::{Deserialize, Serialize};

use crate::error::EasySqlError;
use crate::lenient_json::parse_lenient;
use crate::types::DatabaseType;

/// Connection settings for one facade.
///
/// Field names follow the usual driver options, so a config object like
/// `{host: 'db', port: 5432, user: 'app', password: 'pw', database: 'main', error_debug: true}`
/// deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    #[serde(default = "default_db_type")]
    pub db_type: DatabaseType,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Database name; for `SQLite` the file path (or a `file:` URI).
    pub database: String,
    /// Log driver errors through `tracing` regardless of the per-call error detail.
    #[serde(default, alias = "error_debug")]
    pub debug: bool,
    /// Upper bound on pooled connections; the pool default applies when unset.
    #[serde(default)]
    pub pool_size: Option<u32>,
}

#[allow(unreachable_code)]
fn default_db_type() -> DatabaseType {
    #[cfg(feature = "sqlite")]
    return DatabaseType::Sqlite;
    #[cfg(feature = "postgres")]
    return DatabaseType::Postgres;
}

impl DbConfig {
    #[must_use]
    #[cfg(feature = "sqlite")]
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: path.into(),
            debug: false,
            pool_size: None,
        }
    }

    #[must_use]
    #[cfg(feature = "postgres")]
    pub fn postgres(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            db_type: DatabaseType::Postgres,
            host: Some(host.into()),
            port: Some(port),
            user: Some(user.into()),
            password: Some(password.into()),
            database: database.into(),
            debug: false,
            pool_size: None,
        }
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = Some(pool_size);
        self
    }

    /// Read a configuration from object text; strict JSON and the lenient form both work.
    ///
    /// # Errors
    /// `ParseError` for malformed text, `ConfigError` when fields are missing or mistyped.
    pub fn from_text(text: &str) -> Result<Self, EasySqlError> {
        let map = parse_lenient(text)?;
        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| EasySqlError::ConfigError(format!("invalid configuration: {e}")))
    }

    /// Reject configurations the selected backend cannot use.
    ///
    /// # Errors
    /// Returns `EasySqlError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), EasySqlError> {
        if self.database.is_empty() {
            return Err(EasySqlError::ConfigError(
                "database is required".to_string(),
            ));
        }
        if self.pool_size == Some(0) {
            return Err(EasySqlError::ConfigError(
                "pool_size must be at least 1".to_string(),
            ));
        }
        #[cfg(feature = "postgres")]
        if self.db_type == DatabaseType::Postgres {
            if self.host.is_none() {
                return Err(EasySqlError::ConfigError("host is required".to_string()));
            }
            if self.user.is_none() {
                return Err(EasySqlError::ConfigError("user is required".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "sqlite", feature = "postgres"))]
mod tests {
    use super::*;

    #[test]
    fn lenient_text_with_error_debug_alias() {
        let cfg = DbConfig::from_text(
            "{db_type: 'postgres', host: 'localhost', port: 5432, user: 'app', \
             password: 'pw', database: 'main', error_debug: true}",
        )
        .unwrap();
        assert_eq!(cfg.db_type, DatabaseType::Postgres);
        assert_eq!(cfg.port, Some(5432));
        assert!(cfg.debug);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn defaults_to_sqlite_without_db_type() {
        let cfg = DbConfig::from_text(r#"{"database": "app.db"}"#).unwrap();
        assert_eq!(cfg.db_type, DatabaseType::Sqlite);
        assert!(!cfg.debug);
        assert_eq!(cfg, DbConfig::sqlite("app.db"));
    }

    #[test]
    fn validation_names_missing_fields() {
        let mut cfg = DbConfig::postgres("h", 5432, "u", "p", "db");
        cfg.host = None;
        assert!(
            matches!(cfg.validate(), Err(EasySqlError::ConfigError(msg)) if msg.contains("host"))
        );
        assert!(DbConfig::sqlite("").validate().is_err());
        assert!(DbConfig::sqlite("x.db").with_pool_size(0).validate().is_err());
    }

    #[test]
    fn missing_database_is_a_config_error() {
        assert!(matches!(
            DbConfig::from_text("{host: 'h'}"),
            Err(EasySqlError::ConfigError(_))
        ));
    }
}
