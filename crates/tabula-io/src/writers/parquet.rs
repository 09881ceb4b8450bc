//! Tables out to Parquet (enabled with `--features parquet`).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tabula_core::table::Table;

use crate::arrow_convert::table_to_record_batch;
use crate::error::Result;

/// Serialize a table to Parquet bytes (Snappy-compressed).
pub fn to_parquet(table: &Table) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_to(table, &mut buf)?;
    Ok(buf)
}

pub fn write_parquet(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tracing::trace!(path = %path.display(), rows = table.size(), "writing parquet");
    let file = File::create(path)?;
    write_to(table, file)
}

fn write_to<W: Write + Send>(table: &Table, out: W) -> Result<()> {
    let batch = table_to_record_batch(table)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(out, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
