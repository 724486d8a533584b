//! Shared fixtures for integration tests

use autokit_core::export::{CellValue, Table};

/// Two-column table of employees
#[must_use]
pub fn employees() -> Table {
    let mut table = Table::new(["name", "age"]);
    table
        .push_row(vec![CellValue::from("Ada"), CellValue::Int(36)])
        .unwrap();
    table
        .push_row(vec![CellValue::from("Linus"), CellValue::Int(28)])
        .unwrap();
    table
}

/// Three-column table with a null and a boolean
#[must_use]
pub fn orders() -> Table {
    let mut table = Table::new(["id", "total", "paid"]);
    table
        .push_row(vec![CellValue::Int(1), CellValue::Float(9.5), CellValue::Bool(true)])
        .unwrap();
    table
        .push_row(vec![CellValue::Int(2), CellValue::Null, CellValue::Bool(false)])
        .unwrap();
    table
}

/// Credential file written by an older install, with two accounts
pub const LEGACY_CREDENTIALS: &str = r#"[DEFAULT]
password = "password"

[mail]
password = "qx2"

["build server"]
password = "ijeefo"
"#;
