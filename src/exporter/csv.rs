// file: src/exporter/csv.rs
// description: csv dataset reader and writer with scalar type inference on load
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::models::{Row, Table};
use serde_json::{Number, Value};
use std::path::Path;

fn csv_error(path: &Path, err: ::csv::Error) -> PipelineError {
    PipelineError::Export(format!("{}: {}", path.display(), err))
}

/// Header row from the column union; every row has every column.
pub fn write(table: &Table, path: &Path) -> Result<()> {
    let mut writer = ::csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;

    writer
        .write_record(table.columns())
        .map_err(|e| csv_error(path, e))?;
    for row in table.rows() {
        let record = table
            .columns()
            .iter()
            .map(|column| cell_text(row.get(column).unwrap_or(&Value::Null)));
        writer.write_record(record).map_err(|e| csv_error(path, e))?;
    }

    writer
        .flush()
        .map_err(|e| PipelineError::file_operation(path, e))
}

/// Null is empty, strings are raw, nested values are JSON text.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Type shared by every non-empty cell of a reloaded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Bool,
    Text,
}

pub fn read(path: &Path) -> Result<Table> {
    let mut reader = ::csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| csv_error(path, e))?;

    let kinds: Vec<CellKind> = (0..headers.len())
        .map(|column| infer_column(records.iter().map(|record| record.get(column).unwrap_or(""))))
        .collect();

    let mut table = Table::new();
    for record in &records {
        let row: Row = headers
            .iter()
            .zip(&kinds)
            .zip(record.iter())
            .map(|((header, kind), cell)| (header.clone(), cell_value(*kind, cell)))
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

/// A column is numeric or boolean only when every non-empty cell parses as
/// such; a single non-conforming cell keeps the whole column as text.
fn infer_column<'a>(cells: impl Iterator<Item = &'a str>) -> CellKind {
    let (mut int, mut float, mut boolean) = (true, true, true);
    for cell in cells.filter(|cell| !cell.is_empty()) {
        int &= cell.parse::<i64>().is_ok();
        float &= cell.parse::<f64>().is_ok_and(f64::is_finite);
        boolean &= matches!(cell, "true" | "false");
    }

    if int {
        CellKind::Int
    } else if float {
        CellKind::Float
    } else if boolean {
        CellKind::Bool
    } else {
        CellKind::Text
    }
}

/// Empty cells are null in every column kind.
fn cell_value(kind: CellKind, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match kind {
        CellKind::Int => cell.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
        CellKind::Float => cell
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        CellKind::Bool => Value::Bool(cell == "true"),
        CellKind::Text => Value::String(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn kind_of(cells: &[&str]) -> CellKind {
        infer_column(cells.iter().copied())
    }

    #[test]
    fn test_column_inference() {
        assert_eq!(kind_of(&["42", "", "-7"]), CellKind::Int);
        assert_eq!(kind_of(&["1735732800.25", "3"]), CellKind::Float);
        assert_eq!(kind_of(&["true", "false", ""]), CellKind::Bool);
        assert_eq!(kind_of(&["3", "Yes"]), CellKind::Text);
        assert_eq!(kind_of(&["NaN", "1.0"]), CellKind::Text);
        assert_eq!(cell_value(CellKind::Float, "3"), json!(3.0));
        assert_eq!(cell_value(CellKind::Text, ""), Value::Null);
    }

    #[test]
    fn test_number_like_text_stays_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pairs.csv");
        fs::write(&path, "answer,page_number,score
3,,1
Yes,,2.5
").unwrap();

        let table = read(&path).unwrap();
        let answers: Vec<&Value> = table.column_values("answer").collect();
        assert_eq!(answers, vec![&json!("3"), &json!("Yes")]);
        assert!(table.column_values("page_number").all(Value::is_null));
        let scores: Vec<&Value> = table.column_values("score").collect();
        assert_eq!(scores, vec![&json!(1.0), &json!(2.5)]);
    }

    #[test]
    fn test_write_quotes_and_nulls() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pairs.csv");
        let table = Table::from_rows(vec![
            json!({"question": "a, b", "page_number": null, "meta": {"k": 1}})
                .as_object()
                .cloned()
                .unwrap(),
        ]);

        write(&table, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "question,page_number,meta\n\"a, b\",,\"{\"\"k\"\":1}\"\n"
        );
    }
}
