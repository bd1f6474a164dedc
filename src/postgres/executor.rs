use bb8::Pool;
use tokio_postgres::GenericClient;

use super::config::PgManager;
use super::params::Params;
use super::query::build_result_set_from_statement;
use crate::error::EasySqlError;
use crate::pool::DriverResponse;
use crate::query_builder::Statement;
use crate::results::ResultSet;
use crate::translation::translate_placeholders;
use crate::types::RowValues;

/// Prepare `sql` on `client`, then query or execute depending on its result columns.
async fn execute_on<C>(
    client: &C,
    sql: &str,
    params: &[RowValues],
) -> Result<DriverResponse, EasySqlError>
where
    C: GenericClient + Sync,
{
    let sql = translate_placeholders(sql);
    let stmt = client.prepare(&sql).await?;
    let converted = Params::convert(params);

    if stmt.columns().is_empty() {
        let rows = client.execute(&stmt, converted.as_refs()).await?;
        let affected = usize::try_from(rows).map_err(|e| {
            EasySqlError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
        })?;
        Ok(DriverResponse::Affected(affected))
    } else {
        let rows = client.query(&stmt, converted.as_refs()).await?;
        build_result_set_from_statement(&stmt, &rows).map(DriverResponse::Rows)
    }
}

/// Execute a single statement on a pooled client.
///
/// `?N` placeholders are rewritten to `$N` first.
///
/// # Errors
/// Returns `EasySqlError` if no client can be checked out or the statement fails.
pub async fn execute(
    pool: &Pool<PgManager>,
    sql: &str,
    params: &[RowValues],
) -> Result<DriverResponse, EasySqlError> {
    let client = pool.get().await?;
    execute_on(&*client, sql, params).await
}

/// Run `statements` in order inside one transaction on a single client.
///
/// # Errors
/// Returns the error of the first failing statement; the transaction is rolled back.
pub async fn execute_transaction(
    pool: &Pool<PgManager>,
    statements: &[Statement],
) -> Result<DriverResponse, EasySqlError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;
    let mut last = DriverResponse::Rows(ResultSet::default());
    for stmt in statements {
        match execute_on(&tx, &stmt.sql, &stmt.params).await {
            Ok(response) => last = response,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        }
    }
    tx.commit().await?;
    Ok(last)
}
