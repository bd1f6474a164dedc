//! Sends statements to a [`Driver`] and shapes what comes back.

use crate::error::EasySqlError;
use crate::outcome::{ErrorDetail, QueryFailure, QueryOutcome};
use crate::pool::{Driver, DriverResponse};
use crate::query_builder::Statement;

/// Fold a driver response into the caller-facing outcome.
///
/// One row gives `SingleRow`, more give `Rows`, none give `Empty`; statements without
/// result columns give `NonSelect`.
#[must_use]
pub fn normalize(response: DriverResponse) -> QueryOutcome {
    match response {
        DriverResponse::Affected(rows_affected) => QueryOutcome::NonSelect { rows_affected },
        DriverResponse::Rows(mut result_set) => match result_set.results.len() {
            0 => QueryOutcome::Empty,
            1 => match result_set.results.pop() {
                Some(row) => QueryOutcome::SingleRow(row),
                None => QueryOutcome::Empty,
            },
            _ => QueryOutcome::Rows(result_set.results),
        },
    }
}

/// Run one statement.
///
/// # Errors
/// A driver error becomes `QueryFailure::Driver` when `detail` is `Include`, otherwise
/// `QueryFailure::Suppressed`. With `debug` set it is also logged at error level.
pub async fn execute<D>(
    driver: &D,
    stmt: &Statement,
    detail: ErrorDetail,
    debug: bool,
) -> Result<QueryOutcome, QueryFailure>
where
    D: Driver + ?Sized,
{
    tracing::debug!(sql = %stmt, "executing statement");
    match driver.query(&stmt.sql, &stmt.params).await {
        Ok(response) => Ok(normalize(response)),
        Err(err) => {
            if debug {
                tracing::error!(error = %err, sql = %stmt, "statement failed");
            }
            Err(driver_failure(&err, detail))
        }
    }
}

/// Run `statements` as one transaction and normalize the last response.
///
/// # Errors
/// Same policy as [`execute`]; the failing transaction has been rolled back.
pub async fn execute_transaction<D>(
    driver: &D,
    statements: &[Statement],
    detail: ErrorDetail,
    debug: bool,
) -> Result<QueryOutcome, QueryFailure>
where
    D: Driver + ?Sized,
{
    tracing::debug!(statements = statements.len(), "executing transaction");
    match driver.transaction(statements).await {
        Ok(response) => Ok(normalize(response)),
        Err(err) => {
            if debug {
                tracing::error!(
                    error = %err,
                    statements = statements.len(),
                    "transaction failed and was rolled back"
                );
            }
            Err(driver_failure(&err, detail))
        }
    }
}

fn driver_failure(err: &EasySqlError, detail: ErrorDetail) -> QueryFailure {
    match detail {
        ErrorDetail::Include => QueryFailure::Driver {
            message: err.to_string(),
        },
        ErrorDetail::Suppress => QueryFailure::Suppressed,
    }
}
