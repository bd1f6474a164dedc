use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::EasySqlError;
use crate::results::CustomDbRow;

/// Successful result of one facade operation.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The statement returned exactly one row.
    SingleRow(CustomDbRow),
    /// The statement returned two or more rows.
    Rows(Vec<CustomDbRow>),
    /// The statement returned no columns.
    NonSelect { rows_affected: usize },
    /// The statement returned columns but no rows.
    Empty,
}

impl QueryOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryOutcome::Empty)
    }

    #[must_use]
    pub fn rows_affected(&self) -> Option<usize> {
        match self {
            QueryOutcome::NonSelect { rows_affected } => Some(*rows_affected),
            _ => None,
        }
    }

    /// Every returned row, whatever the row count was.
    #[must_use]
    pub fn into_rows(self) -> Vec<CustomDbRow> {
        match self {
            QueryOutcome::SingleRow(row) => vec![row],
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::NonSelect { .. } | QueryOutcome::Empty => Vec::new(),
        }
    }

    /// The outcome as JSON: an object for one row, an array for several,
    /// `{"rows_affected": n}` for writes and `null` when nothing came back.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            QueryOutcome::SingleRow(row) => JsonValue::Object(row.to_json()),
            QueryOutcome::Rows(rows) => rows
                .iter()
                .map(|row| JsonValue::Object(row.to_json()))
                .collect(),
            QueryOutcome::NonSelect { rows_affected } => {
                let mut obj = Map::new();
                obj.insert("rows_affected".to_string(), JsonValue::from(*rows_affected));
                JsonValue::Object(obj)
            }
            QueryOutcome::Empty => JsonValue::Null,
        }
    }
}

/// How much of a driver error reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDetail {
    /// Report only that the operation failed.
    #[default]
    Suppress,
    /// Report the driver's message.
    Include,
}

impl From<bool> for ErrorDetail {
    fn from(include: bool) -> Self {
        if include {
            ErrorDetail::Include
        } else {
            ErrorDetail::Suppress
        }
    }
}

/// Failed result of one facade operation.
#[derive(Debug, thiserror::Error)]
pub enum QueryFailure {
    /// The driver rejected the statement; carries its message.
    #[error("{message}")]
    Driver { message: String },
    /// The driver rejected the statement and detail was not requested.
    #[error("query failed")]
    Suppressed,
    /// The statement could not be built.
    #[error(transparent)]
    Invalid(#[from] EasySqlError),
}

impl QueryFailure {
    /// The `{status: false, message}` report for driver failures that carry detail.
    #[must_use]
    pub fn report(&self) -> Option<ErrorReport> {
        match self {
            QueryFailure::Driver { message } => Some(ErrorReport::new(message.clone())),
            QueryFailure::Suppressed | QueryFailure::Invalid(_) => None,
        }
    }
}

/// Serializable failure report.
///
/// ```rust
/// use easy_sql::prelude::*;
///
/// let report = ErrorReport::new("no such table: t");
/// assert_eq!(
///     serde_json::to_string(&report).unwrap(),
///     r#"{"status":false,"message":"no such table: t"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub status: bool,
    pub message: String,
}

impl ErrorReport {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_detailed_driver_failures_report() {
        let failure = QueryFailure::Driver {
            message: "boom".into(),
        };
        assert_eq!(failure.report(), Some(ErrorReport::new("boom")));
        assert_eq!(QueryFailure::Suppressed.report(), None);

        let invalid: QueryFailure = EasySqlError::BuildError("x".into()).into();
        assert!(invalid.report().is_none());
        assert!(invalid.to_string().contains("x"));
    }

    #[test]
    fn detail_from_flag() {
        assert_eq!(ErrorDetail::from(true), ErrorDetail::Include);
        assert_eq!(ErrorDetail::from(false), ErrorDetail::Suppress);
    }

    #[test]
    fn outcome_helpers() {
        let write = QueryOutcome::NonSelect { rows_affected: 2 };
        assert_eq!(write.rows_affected(), Some(2));
        assert_eq!(write.to_json(), serde_json::json!({"rows_affected": 2}));
        assert!(write.into_rows().is_empty());
        assert!(QueryOutcome::Empty.is_empty());
        assert_eq!(QueryOutcome::Empty.to_json(), JsonValue::Null);
    }
}
