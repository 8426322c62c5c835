// file: src/models/table.rs
// description: row-oriented tabular dataset shared by export, reload and hub publishing
// reference: internal data structures

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

pub type Row = Map<String, Value>;

static NULL: Value = Value::Null;

/// Rows keyed by column name. Every row holds every column, `null` where a
/// record did not carry the key. Column order is first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self> {
        let rows = records
            .iter()
            .map(|record| -> Result<Row> {
                match serde_json::to_value(record)? {
                    Value::Object(map) => Ok(map),
                    other => {
                        let mut map = Map::new();
                        map.insert("value".to_string(), other);
                        Ok(map)
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_rows(rows))
    }

    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, widening the column set with any unseen keys.
    pub fn push_row(&mut self, row: Row) {
        let mut added = Vec::new();
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
                added.push(key.clone());
            }
        }

        for existing in &mut self.rows {
            for key in &added {
                existing.insert(key.clone(), Value::Null);
            }
        }

        let mut normalized = Map::new();
        let mut row = row;
        for column in &self.columns {
            let value = row.remove(column).unwrap_or(Value::Null);
            normalized.insert(column.clone(), value);
        }
        self.rows.push(normalized);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column in row order.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&NULL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_union_of_keys_in_first_seen_order() {
        let table = Table::from_rows(vec![
            row(json!({"question": "q1", "answer": "a1"})),
            row(json!({"question": "q2", "extra": 7})),
        ]);

        assert_eq!(table.columns(), &["question", "answer", "extra"]);
        assert_eq!(table.rows()[0]["extra"], Value::Null);
        assert_eq!(table.rows()[1]["answer"], Value::Null);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rows_follow_column_order() {
        let table = Table::from_rows(vec![
            row(json!({"a": 1, "b": 2})),
            row(json!({"b": 3, "a": 4})),
        ]);
        let keys: Vec<&String> = table.rows()[1].keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_from_records_uses_struct_fields() {
        #[derive(Serialize)]
        struct Record {
            name: &'static str,
            score: Option<u32>,
        }

        let table = Table::from_records(&[Record {
            name: "x",
            score: None,
        }])
        .unwrap();

        assert_eq!(table.columns(), &["name", "score"]);
        let scores: Vec<&Value> = table.column_values("score").collect();
        assert_eq!(scores, vec![&Value::Null]);
    }
}
