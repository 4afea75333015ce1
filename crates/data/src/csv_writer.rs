use kis_core::{KisError, Table};
use serde_json::Value;
use std::io;
use std::path::Path;

/// Write a table as CSV: one header row of column names, then one line per row.
///
/// String cells are written raw, nulls as empty fields, anything else as JSON text.
pub fn write_csv<W: io::Write>(table: &Table, writer: W) -> Result<(), KisError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(table.columns()).map_err(io::Error::from)?;
    for row in table.rows() {
        out.write_record(row.iter().map(cell_text))
            .map_err(io::Error::from)?;
    }
    out.flush()?;
    Ok(())
}

/// Write a table to a CSV file, replacing it if it exists.
pub fn write_csv_to_path(table: &Table, path: &Path) -> Result<(), KisError> {
    let file = std::fs::File::create(path)?;
    write_csv(table, io::BufWriter::new(file))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
