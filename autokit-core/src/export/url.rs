//! Fetches through a connection URL using the `sqlx` any-driver

use sqlx::any::{install_default_drivers, AnyRow};
use sqlx::{AnyConnection, Column, Connection, Executor, Row, ValueRef};
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};

use super::backend::UrlBackend;
use super::table::{CellValue, Table};

/// Runs `query` against the engine behind `backend.url` and closes the connection
pub(super) async fn fetch(query: &str, backend: &UrlBackend) -> ExportResult<Table> {
    install_default_drivers();

    debug!(scheme = backend.url.split(':').next().unwrap_or_default(), "Connecting by URL");
    let mut conn = AnyConnection::connect(&backend.url)
        .await
        .map_err(|e| ExportError::ConnectionFailed(e.to_string()))?;

    let result = run_query(&mut conn, query).await;
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close connection");
    }
    result
}

async fn run_query(conn: &mut AnyConnection, query: &str) -> ExportResult<Table> {
    let rows: Vec<AnyRow> = sqlx::query(query)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ExportError::QueryFailed(e.to_string()))?;

    let columns: Vec<String> = match rows.first() {
        Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
        None => describe_columns(conn, query).await?,
    };

    let mut table = Table::new(columns);
    for row in &rows {
        table.push_row((0..row.len()).map(|i| cell_from_row(row, i)).collect())?;
    }
    Ok(table)
}

/// Column names of a query that returned no rows
async fn describe_columns(conn: &mut AnyConnection, query: &str) -> ExportResult<Vec<String>> {
    let described = (&mut *conn)
        .describe(query)
        .await
        .map_err(|e| ExportError::QueryFailed(e.to_string()))?;
    Ok(described
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect())
}

fn cell_from_row(row: &AnyRow, index: usize) -> CellValue {
    if row.try_get_raw(index).map_or(true, |v| v.is_null()) {
        return CellValue::Null;
    }
    if let Ok(v) = row.try_get::<i64, _>(index) {
        return CellValue::Int(v);
    }
    if let Ok(v) = row.try_get::<i32, _>(index) {
        return CellValue::Int(i64::from(v));
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return CellValue::Float(v);
    }
    if let Ok(v) = row.try_get::<bool, _>(index) {
        return CellValue::Bool(v);
    }
    row.try_get::<String, _>(index)
        .map_or(CellValue::Null, CellValue::Text)
}
