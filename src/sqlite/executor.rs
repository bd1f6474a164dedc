use std::sync::Arc;

use bb8::Pool;

use super::config::{SharedSqliteConnection, SqliteManager};
use super::params::Params;
use super::query::build_result_set;
use crate::error::EasySqlError;
use crate::pool::DriverResponse;
use crate::query_builder::Statement;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run `func` against the connection on Tokio's blocking pool.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, EasySqlError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, EasySqlError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| EasySqlError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

/// Prepare and run one statement, returning rows when it has result columns.
fn execute_on(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &Params,
) -> Result<DriverResponse, EasySqlError> {
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() > 0 {
        return build_result_set(&mut stmt, params.as_values()).map(DriverResponse::Rows);
    }
    let refs: Vec<&dyn rusqlite::ToSql> = params
        .as_values()
        .iter()
        .map(|v| v as &dyn rusqlite::ToSql)
        .collect();
    let affected = stmt.execute(&refs[..])?;
    Ok(DriverResponse::Affected(affected))
}

/// Execute a single statement on a pooled connection.
///
/// # Errors
/// Returns `EasySqlError` if no connection can be checked out or the statement fails.
pub async fn execute(
    pool: &Pool<SqliteManager>,
    sql: &str,
    params: &[RowValues],
) -> Result<DriverResponse, EasySqlError> {
    let conn = pool.get().await?;
    let converted = Params::convert(params);
    let sql = sql.to_owned();
    run_blocking(Arc::clone(&*conn), move |guard| {
        execute_on(guard, &sql, &converted)
    })
    .await
}

/// Run `statements` in order inside one transaction on a single connection.
///
/// Commits after the last statement; the first failure rolls everything back. The
/// response is the last statement's, or an empty row set when `statements` is empty.
///
/// # Errors
/// Returns the error of the first failing statement.
pub async fn execute_transaction(
    pool: &Pool<SqliteManager>,
    statements: &[Statement],
) -> Result<DriverResponse, EasySqlError> {
    let conn = pool.get().await?;
    let prepared: Vec<(String, Params)> = statements
        .iter()
        .map(|stmt| (stmt.sql.clone(), Params::convert(&stmt.params)))
        .collect();

    run_blocking(Arc::clone(&*conn), move |guard| {
        let tx = guard.transaction()?;
        let mut last = DriverResponse::Rows(ResultSet::default());
        for (sql, params) in &prepared {
            // dropping `tx` on error rolls back
            last = execute_on(&tx, sql, params)?;
        }
        tx.commit()?;
        Ok(last)
    })
    .await
}
