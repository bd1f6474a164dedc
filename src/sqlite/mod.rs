//! `SQLite` backend: a bb8-pooled `rusqlite` connection driven on the blocking pool.

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SharedSqliteConnection, SqliteManager};
pub use executor::{execute, execute_transaction};
pub use params::Params;
pub use query::{build_result_set, sqlite_extract_value_sync};
