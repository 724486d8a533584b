//! Writing result tables to an `.xlsx` workbook

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::error::{ExportError, ExportResult};

use super::table::{CellValue, Table};

/// Sheet name for the table at `index` (`Sheet1`, `Sheet2`, ...)
#[must_use]
pub fn sheet_name(index: usize) -> String {
    format!("Sheet{}", index + 1)
}

/// Writes each table to its own worksheet at `path`, replacing any existing file
///
/// Sheets are named `Sheet1`, `Sheet2`, ... in input order. The first row of
/// every sheet holds the column names.
///
/// # Errors
///
/// Returns `ExportError::InvalidArgument` if `tables` is empty and
/// `ExportError::Spreadsheet` if the workbook cannot be built or saved.
pub fn export_to_spreadsheet(tables: &[Table], path: &Path) -> ExportResult<()> {
    if tables.is_empty() {
        return Err(ExportError::InvalidArgument(
            "at least one table is required".to_string(),
        ));
    }

    let mut workbook = Workbook::new();
    for (index, table) in tables.iter().enumerate() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(index)).map_err(xlsx_error)?;
        write_table(worksheet, table)?;
    }

    workbook.save(path).map_err(|e| {
        ExportError::Spreadsheet(format!("Failed to save {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), sheets = tables.len(), "Excel file created");
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &Table) -> ExportResult<()> {
    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_string(0, col_index(col)?, name)
            .map_err(xlsx_error)?;
    }

    for (offset, row) in table.rows.iter().enumerate() {
        let row_num = row_index(offset + 1)?;
        for (col, cell) in row.iter().enumerate() {
            let col_num = col_index(col)?;
            let written = match cell {
                CellValue::Null => continue,
                CellValue::Bool(v) => worksheet.write_boolean(row_num, col_num, *v),
                CellValue::Int(v) => worksheet.write_number(row_num, col_num, *v as f64),
                CellValue::Float(v) => worksheet.write_number(row_num, col_num, *v),
                CellValue::Text(v) => worksheet.write_string(row_num, col_num, v),
            };
            written.map_err(xlsx_error)?;
        }
    }
    Ok(())
}

fn row_index(row: usize) -> ExportResult<u32> {
    u32::try_from(row)
        .map_err(|_| ExportError::Spreadsheet(format!("row {row} exceeds sheet limits")))
}

fn col_index(col: usize) -> ExportResult<u16> {
    u16::try_from(col)
        .map_err(|_| ExportError::Spreadsheet(format!("column {col} exceeds sheet limits")))
}

fn xlsx_error(e: XlsxError) -> ExportError {
    ExportError::Spreadsheet(e.to_string())
}
