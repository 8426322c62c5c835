// file: src/exporter/parquet.rs
// description: parquet dataset reader and writer over arrow record batches
// reference: https://docs.rs/parquet/latest/parquet/arrow/index.html

use crate::error::{PipelineError, Result};
use crate::models::{Row, Table};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use arrow_array::{ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde_json::{Number, Value};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Arrow type chosen for a column from the values it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Null,
    Int,
    Float,
    Bool,
    Text,
    /// Mixed or nested values, stored as JSON text.
    Json,
}

impl ColumnKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::Text,
            Value::Array(_) | Value::Object(_) => Self::Json,
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Null, kind) | (kind, Self::Null) => kind,
            (a, b) if a == b => a,
            (Self::Int, Self::Float) | (Self::Float, Self::Int) => Self::Float,
            _ => Self::Json,
        }
    }

    fn data_type(self) -> DataType {
        match self {
            Self::Int => DataType::Int64,
            Self::Float => DataType::Float64,
            Self::Bool => DataType::Boolean,
            Self::Null | Self::Text | Self::Json => DataType::Utf8,
        }
    }
}

fn parquet_error(path: &Path, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Export(format!("{}: {}", path.display(), err))
}

fn infer_kind<'a>(values: impl Iterator<Item = &'a Value>) -> ColumnKind {
    values.fold(ColumnKind::Null, |kind, value| kind.merge(ColumnKind::of(value)))
}

fn build_array<'a>(kind: ColumnKind, values: impl Iterator<Item = &'a Value>) -> ArrayRef {
    match kind {
        ColumnKind::Int => Arc::new(values.map(Value::as_i64).collect::<Int64Array>()),
        ColumnKind::Float => Arc::new(values.map(Value::as_f64).collect::<Float64Array>()),
        ColumnKind::Bool => Arc::new(values.map(Value::as_bool).collect::<BooleanArray>()),
        ColumnKind::Null | ColumnKind::Text | ColumnKind::Json => Arc::new(
            values
                .map(|value| match value {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect::<StringArray>(),
        ),
    }
}

pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    if table.columns().is_empty() {
        return Err(PipelineError::Export(
            "cannot write a table without columns".to_string(),
        ));
    }

    let mut fields = Vec::with_capacity(table.columns().len());
    let mut arrays = Vec::with_capacity(table.columns().len());

    for column in table.columns() {
        let kind = infer_kind(table.column_values(column));
        fields.push(Field::new(column, kind.data_type(), true));
        arrays.push(build_array(kind, table.column_values(column)));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .map_err(|e| PipelineError::Export(format!("Failed to build record batch: {}", e)))
}

pub fn write(table: &Table, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = File::create(path).map_err(|e| PipelineError::file_operation(path, e))?;
    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(properties))
        .map_err(|e| parquet_error(path, e))?;
    writer.write(&batch).map_err(|e| parquet_error(path, e))?;
    writer.close().map_err(|e| parquet_error(path, e))?;
    Ok(())
}

pub fn read(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| PipelineError::file_operation(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .and_then(|builder| builder.build())
        .map_err(|e| parquet_error(path, e))?;

    let mut table = Table::new();
    for batch in reader {
        let batch = batch.map_err(|e| parquet_error(path, e))?;
        let schema = batch.schema();

        for index in 0..batch.num_rows() {
            let mut row = Row::new();
            for (field, column) in schema.fields().iter().zip(batch.columns()) {
                let value = cell_value(column.as_ref(), index).map_err(|e| parquet_error(path, e))?;
                row.insert(field.name().clone(), value);
            }
            table.push_row(row);
        }
    }

    Ok(table)
}

fn float_value(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn cell_value(array: &dyn Array, index: usize) -> std::result::Result<Value, arrow::error::ArrowError> {
    if array.is_null(index) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Int64 => Value::from(array.as_primitive::<Int64Type>().value(index)),
        DataType::Int32 => Value::from(array.as_primitive::<Int32Type>().value(index)),
        DataType::Float64 => float_value(array.as_primitive::<Float64Type>().value(index)),
        DataType::Float32 => float_value(f64::from(array.as_primitive::<Float32Type>().value(index))),
        DataType::Boolean => Value::Bool(array.as_boolean().value(index)),
        DataType::Utf8 => Value::String(array.as_string::<i32>().value(index).to_string()),
        DataType::LargeUtf8 => Value::String(array.as_string::<i64>().value(index).to_string()),
        _ => Value::String(array_value_to_string(array, index)?),
    };
    Ok(value)
}
