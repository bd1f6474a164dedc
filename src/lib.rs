//! Convenience layer over `SQLite` and Postgres connection pools.
//!
//! Statements are built from ordered JSON-like data, run through a bb8 pool with bound
//! parameters, and come back as a tagged [`QueryOutcome`] or [`QueryFailure`].
//!
//! ```rust,no_run
//! use easy_sql::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), QueryFailure> {
//! let db = easy_sql::create(Some(DbConfig::sqlite("app.db"))).expect("config given");
//! db.query("CREATE TABLE IF NOT EXISTS t (id INTEGER, name TEXT)", ErrorDetail::Include)
//!     .await?;
//! db.insert("t", "{id: 1, name: 'a:b'}", ErrorDetail::Include).await?;
//! match db.query("SELECT * FROM t", ErrorDetail::Include).await? {
//!     QueryOutcome::SingleRow(row) => println!("{:?}", row.to_json()),
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable at least one of the `sqlite` or `postgres` features");

pub mod config;
pub mod encoding;
pub mod error;
pub mod executor;
pub mod facade;
pub mod lenient_json;
pub mod outcome;
pub mod pool;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::DbConfig;
pub use error::EasySqlError;
pub use facade::{EasySql, create};
pub use outcome::{ErrorDetail, ErrorReport, QueryFailure, QueryOutcome};
pub use pool::{Driver, DriverResponse, MiddlewarePool};
pub use query_builder::{Record, Statement};
pub use results::{CustomDbRow, ResultSet};
pub use types::{DatabaseType, RowValues};
