//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::DbConfig;
pub use crate::encoding::encode_literal;
pub use crate::error::EasySqlError;
pub use crate::facade::{EasySql, create};
pub use crate::lenient_json::parse_lenient;
pub use crate::outcome::{ErrorDetail, ErrorReport, QueryFailure, QueryOutcome};
pub use crate::pool::{Driver, DriverResponse, MiddlewarePool};
pub use crate::query_builder::{Record, Statement, build_delete, build_insert, build_update};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::translation::{inline_placeholders, translate_placeholders};
pub use crate::types::{DatabaseType, RowValues};
