//! Tables out to CSV: one header row, then one record per row.
//!
//! Nulls and NaN are written as empty fields so they read back as missing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv as csv_crate;
use tabula_core::table::Table;
use tabula_core::types::Scalar;

use crate::error::{Error, Result};

pub fn to_csv(table: &Table) -> Result<String> {
    let mut buf = Vec::new();
    write_to(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Other(format!("csv output is not utf-8: {e}")))
}

pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tracing::trace!(path = %path.display(), rows = table.size(), "writing csv");
    let file = File::create(path)?;
    write_to(table, file)
}

fn write_to<W: Write>(table: &Table, writer: W) -> Result<()> {
    if table.names().is_empty() {
        return Ok(());
    }
    let mut wtr = csv_crate::Writer::from_writer(writer);
    wtr.write_record(table.names())?;

    let columns: Vec<_> = table.columns().map(|(_, c)| c).collect();
    let mut record = Vec::with_capacity(columns.len());
    for row in 0..table.size() {
        record.clear();
        for column in &columns {
            record.push(field(&column.get(row).unwrap_or_default()));
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn field(value: &Scalar) -> String {
    match value {
        Scalar::Float(x) if x.is_nan() => String::new(),
        v => v.to_string(),
    }
}
