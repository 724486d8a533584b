//! SQL Server fetches over TDS

use tiberius::{Client, ColumnData, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};

use super::backend::DriverBackend;
use super::table::{CellValue, Table};

type TdsClient = Client<Compat<TcpStream>>;

/// Runs `query` against SQL Server and closes the connection afterwards
pub(super) async fn fetch(query: &str, backend: &DriverBackend) -> ExportResult<Table> {
    let config = Config::from_ado_string(&backend.ado_connection_string())
        .map_err(|e| ExportError::ConnectionFailed(format!("Invalid connection string: {e}")))?;

    debug!(server = %backend.server, database = %backend.database, "Connecting to SQL Server");
    let tcp = TcpStream::connect(config.get_addr())
        .await
        .map_err(|e| ExportError::ConnectionFailed(format!("{}: {e}", backend.server)))?;
    tcp.set_nodelay(true)
        .map_err(|e| ExportError::ConnectionFailed(e.to_string()))?;

    let mut client = Client::connect(config, tcp.compat_write())
        .await
        .map_err(|e| ExportError::ConnectionFailed(e.to_string()))?;

    let result = run_query(&mut client, query).await;
    if let Err(e) = client.close().await {
        warn!(error = %e, "Failed to close SQL Server connection");
    }
    result
}

async fn run_query(client: &mut TdsClient, query: &str) -> ExportResult<Table> {
    let mut stream = client
        .simple_query(query)
        .await
        .map_err(|e| ExportError::QueryFailed(e.to_string()))?;

    let columns: Vec<String> = stream
        .columns()
        .await
        .map_err(|e| ExportError::QueryFailed(e.to_string()))?
        .map(|cols| cols.iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let rows = stream
        .into_first_result()
        .await
        .map_err(|e| ExportError::QueryFailed(e.to_string()))?;

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.into_iter().map(cell_from_column).collect())?;
    }
    Ok(table)
}

fn cell_from_column(data: ColumnData<'static>) -> CellValue {
    match data {
        ColumnData::U8(v) => v.map_or(CellValue::Null, |v| CellValue::Int(i64::from(v))),
        ColumnData::I16(v) => v.map_or(CellValue::Null, |v| CellValue::Int(i64::from(v))),
        ColumnData::I32(v) => v.map_or(CellValue::Null, |v| CellValue::Int(i64::from(v))),
        ColumnData::I64(v) => v.map_or(CellValue::Null, CellValue::Int),
        ColumnData::F32(v) => v.map_or(CellValue::Null, |v| CellValue::Float(f64::from(v))),
        ColumnData::F64(v) => v.map_or(CellValue::Null, CellValue::Float),
        ColumnData::Bit(v) => v.map_or(CellValue::Null, CellValue::Bool),
        ColumnData::String(v) => v.map_or(CellValue::Null, |s| CellValue::Text(s.into_owned())),
        ColumnData::Guid(v) => v.map_or(CellValue::Null, |g| CellValue::Text(g.to_string())),
        ColumnData::Numeric(v) => v.map_or(CellValue::Null, |n| {
            CellValue::Float(n.value() as f64 / 10f64.powi(i32::from(n.scale())))
        }),
        ColumnData::Binary(v) => v.map_or(CellValue::Null, |b| CellValue::Text(hex::encode(b))),
        // dates and xml are kept in their debug rendering
        other => CellValue::Text(format!("{other:?}")),
    }
}
