//! Postgres backend: bb8-pooled `tokio-postgres` clients.

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::PgManager;
pub use executor::{execute, execute_transaction};
pub use params::Params;
pub use query::{build_result_set_from_statement, postgres_extract_value};
