// file: src/exporter/jsonl.rs
// description: newline-delimited json dataset reader and writer
// reference: https://jsonlines.org

use crate::error::{PipelineError, Result};
use crate::models::Table;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub fn write(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| PipelineError::file_operation(path, e))?;
    let mut writer = BufWriter::new(file);
    write_rows(table, &mut writer)?;
    writer
        .flush()
        .map_err(|e| PipelineError::file_operation(path, e))
}

/// One object per line, keys in column order, non-ASCII kept literal.
pub fn write_rows<W: Write>(table: &Table, writer: &mut W) -> Result<()> {
    for row in table.rows() {
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

pub fn to_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_rows(table, &mut buffer)?;
    Ok(buffer)
}

pub fn read(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| PipelineError::file_operation(path, e))?;
    let mut table = Table::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| PipelineError::file_operation(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line)? {
            Value::Object(row) => table.push_row(row),
            other => {
                return Err(PipelineError::Serialization(format!(
                    "{} line {}: expected a JSON object, got {}",
                    path.display(),
                    index + 1,
                    other
                )));
            }
        }
    }

    Ok(table)
}
