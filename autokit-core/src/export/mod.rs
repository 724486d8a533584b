//! Database fetches and spreadsheet export
//!
//! `fetch` opens a connection for one of three backends, runs a single query,
//! closes the connection on every exit path and returns the rows as a
//! `Table`. `export_to_spreadsheet` writes tables to an `.xlsx` workbook.
//!
//! Each backend is compiled in behind its own cargo feature (`mssql`,
//! `oracle`, `sql-any`).

mod backend;
#[cfg(feature = "oracle")]
mod descriptor;
#[cfg(feature = "mssql")]
mod driver;
mod spreadsheet;
mod table;
#[cfg(feature = "sql-any")]
mod url;

pub use backend::{Backend, BackendKind, DescriptorBackend, DriverBackend, UrlBackend};
pub use spreadsheet::{export_to_spreadsheet, sheet_name};
pub use table::{CellValue, Table};

use sqlformat::{FormatOptions, QueryParams};
use tracing::debug;

use crate::config::DatabaseSettings;
use crate::error::{ExportError, ExportResult};

/// Executes `query` on `backend` and returns the result set
///
/// # Errors
///
/// Returns `ExportError::InvalidArgument` for a blank query,
/// `ExportError::BackendUnavailable` if the backend was compiled out, and
/// connection or query errors from the backend.
pub async fn fetch(query: &str, backend: &Backend) -> ExportResult<Table> {
    if query.trim().is_empty() {
        return Err(ExportError::InvalidArgument("query is empty".to_string()));
    }
    debug!(backend = %backend.kind(), "Fetching records");

    match backend {
        Backend::Driver(params) => {
            #[cfg(feature = "mssql")]
            {
                driver::fetch(query, params).await
            }
            #[cfg(not(feature = "mssql"))]
            {
                let _ = params;
                Err(ExportError::BackendUnavailable("mssql"))
            }
        }
        Backend::Descriptor(params) => {
            #[cfg(feature = "oracle")]
            {
                descriptor::fetch(query, params).await
            }
            #[cfg(not(feature = "oracle"))]
            {
                let _ = params;
                Err(ExportError::BackendUnavailable("oracle"))
            }
        }
        Backend::Url(params) => {
            #[cfg(feature = "sql-any")]
            {
                url::fetch(query, params).await
            }
            #[cfg(not(feature = "sql-any"))]
            {
                let _ = params;
                Err(ExportError::BackendUnavailable("sql-any"))
            }
        }
    }
}

/// Parses `tag` and fetches from the matching backend in `settings`
///
/// An unknown tag fails before any connection is attempted.
///
/// # Errors
///
/// Returns `ExportError::UnsupportedBackend` for an unknown tag, otherwise
/// whatever `fetch` returns.
pub async fn fetch_tagged(
    query: &str,
    tag: &str,
    settings: &DatabaseSettings,
) -> ExportResult<Table> {
    let kind: BackendKind = tag.parse()?;
    fetch(query, &Backend::from_kind(kind, settings)).await
}

/// Pretty-prints a SQL query, one clause per line
#[must_use]
pub fn format_sql(query: &str) -> String {
    sqlformat::format(query, &QueryParams::None, FormatOptions::default())
}
