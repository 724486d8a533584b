//! Oracle fetches through a connection descriptor
//!
//! The Oracle client is blocking, so the whole connect/query/close cycle
//! runs on the blocking pool.

use oracle::sql_type::OracleType;
use oracle::{Connection, SqlValue};
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};

use super::backend::DescriptorBackend;
use super::table::{CellValue, Table};

/// Runs `query` against Oracle and closes the connection afterwards
pub(super) async fn fetch(query: &str, backend: &DescriptorBackend) -> ExportResult<Table> {
    let query = query.to_string();
    let backend = backend.clone();
    tokio::task::spawn_blocking(move || fetch_blocking(&query, &backend))
        .await
        .map_err(|e| ExportError::QueryFailed(format!("Oracle worker failed: {e}")))?
}

fn fetch_blocking(query: &str, backend: &DescriptorBackend) -> ExportResult<Table> {
    debug!(descriptor = %backend.redacted_descriptor(), "Connecting to Oracle");
    let conn = Connection::connect(&backend.user, &backend.password, backend.easy_connect())
        .map_err(|e| ExportError::ConnectionFailed(e.to_string()))?;

    let result = run_query(&conn, query);
    if let Err(e) = conn.close() {
        warn!(error = %e, "Failed to close Oracle connection");
    }
    result
}

fn run_query(conn: &Connection, query: &str) -> ExportResult<Table> {
    let rows = conn
        .query(query, &[])
        .map_err(|e| ExportError::QueryFailed(e.to_string()))?;

    let mut table = Table::new(rows.column_info().iter().map(|c| c.name().to_string()));
    for row in rows {
        let row = row.map_err(|e| ExportError::QueryFailed(e.to_string()))?;
        let cells = row
            .sql_values()
            .iter()
            .map(cell_from_sql)
            .collect::<ExportResult<Vec<_>>>()?;
        table.push_row(cells)?;
    }
    Ok(table)
}

fn cell_from_sql(value: &SqlValue) -> ExportResult<CellValue> {
    let err = |e: oracle::Error| ExportError::QueryFailed(e.to_string());

    if value.is_null().map_err(err)? {
        return Ok(CellValue::Null);
    }
    let cell = match value.oracle_type().map_err(err)? {
        OracleType::Number(_, 0) | OracleType::Int64 => {
            CellValue::Int(value.get::<i64>().map_err(err)?)
        }
        OracleType::Number(..)
        | OracleType::Float(_)
        | OracleType::BinaryFloat
        | OracleType::BinaryDouble => CellValue::Float(value.get::<f64>().map_err(err)?),
        OracleType::Boolean => CellValue::Bool(value.get::<bool>().map_err(err)?),
        _ => CellValue::Text(value.get::<String>().map_err(err)?),
    };
    Ok(cell)
}
