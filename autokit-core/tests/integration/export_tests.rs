//! Integration tests for spreadsheet export and database fetches

use autokit_core::export::{export_to_spreadsheet, sheet_name, Table};
use calamine::{open_workbook, Data, Reader, Xlsx};
use tempfile::TempDir;

use crate::fixtures::{employees, orders};

fn read_sheet(workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>, name: &str) -> Vec<Vec<Data>> {
    workbook
        .worksheet_range(name)
        .unwrap()
        .rows()
        .map(<[Data]>::to_vec)
        .collect()
}

#[test]
fn test_two_tables_become_two_sheets() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.xlsx");
    export_to_spreadsheet(&[employees(), orders()], &path).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![sheet_name(0), sheet_name(1)]);

    let first = read_sheet(&mut workbook, "Sheet1");
    assert_eq!(first.len(), 3);
    assert_eq!(first[0], vec![Data::String("name".into()), Data::String("age".into())]);
    assert_eq!(first[1], vec![Data::String("Ada".into()), Data::Float(36.0)]);
    assert_eq!(first[2][0], Data::String("Linus".into()));

    let second = read_sheet(&mut workbook, "Sheet2");
    assert_eq!(second[0][2], Data::String("paid".into()));
    assert_eq!(second[1][1], Data::Float(9.5));
    assert_eq!(second[1][2], Data::Bool(true));
    assert_eq!(second[2][1], Data::Empty);
}

#[test]
fn test_export_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.xlsx");
    export_to_spreadsheet(&[employees(), orders()], &path).unwrap();
    export_to_spreadsheet(&[orders()], &path).unwrap();

    let workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
}

#[test]
fn test_header_only_table_exports() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.xlsx");
    export_to_spreadsheet(&[Table::new(["only"])], &path).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let rows = read_sheet(&mut workbook, "Sheet1");
    assert_eq!(rows, vec![vec![Data::String("only".into())]]);
}

#[cfg(feature = "sql-any")]
mod sqlite {
    use autokit_core::export::{export_to_spreadsheet, fetch, Backend, CellValue, UrlBackend};
    use calamine::{open_workbook, Data, Xlsx};
    use tempfile::TempDir;

    use super::read_sheet;

    fn memory() -> Backend {
        Backend::Url(UrlBackend {
            url: "sqlite::memory:".to_string(),
        })
    }

    #[tokio::test]
    async fn test_fetch_literal_row() {
        let table = fetch("SELECT 1 AS one, 'x' AS name", &memory()).await.unwrap();
        assert_eq!(table.columns, vec!["one", "name"]);
        assert_eq!(table.rows, vec![vec![CellValue::Int(1), CellValue::from("x")]]);
    }

    #[tokio::test]
    async fn test_zero_row_result_keeps_columns() {
        let table = fetch("SELECT 1 AS one, 'x' AS name WHERE 1 = 0", &memory())
            .await
            .unwrap();
        assert_eq!(table.columns, vec!["one", "name"]);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_zero_row_export_writes_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.xlsx");
        let table = fetch("SELECT 1 AS one, 'x' AS name WHERE 1 = 0", &memory())
            .await
            .unwrap();
        export_to_spreadsheet(&[table], &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let rows = read_sheet(&mut workbook, "Sheet1");
        assert_eq!(
            rows,
            vec![vec![Data::String("one".into()), Data::String("name".into())]]
        );
    }

    #[tokio::test]
    async fn test_fetch_null_and_float() {
        let table = fetch("SELECT NULL AS missing, 2.5 AS ratio", &memory())
            .await
            .unwrap();
        assert_eq!(table.rows[0], vec![CellValue::Null, CellValue::Float(2.5)]);
    }

    #[tokio::test]
    async fn test_invalid_sql_is_query_error() {
        let result = fetch("SELEC nonsense", &memory()).await;
        assert!(matches!(
            result,
            Err(autokit_core::error::ExportError::QueryFailed(_))
        ));
    }
}
