//! Parquet into tables (enabled with `--features parquet`).
//!
//! The whole file is read into one table. Columns named in the type override
//! map are converted to that type; all others must use a directly supported
//! Arrow type.

use std::fs::File;
use std::path::Path;

use bytes::Bytes;
use indexmap::IndexMap;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use tabula_core::column::Column;
use tabula_core::table::{Table, TypeOverrides};

use crate::arrow_convert::{array_to_column, element_type_of};
use crate::error::{Error, Result};

pub fn read_parquet(path: impl AsRef<Path>, types: &TypeOverrides) -> Result<Table> {
    let path = path.as_ref();
    tracing::trace!(path = %path.display(), "reading parquet");
    let file = File::open(path)?;
    from_chunks(file, types)
}

pub fn parse_parquet(data: impl Into<Bytes>, types: &TypeOverrides) -> Result<Table> {
    from_chunks(data.into(), types)
}

fn from_chunks<R: ChunkReader + 'static>(input: R, types: &TypeOverrides) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)?;
    let schema = builder.schema().clone();
    let rows = usize::try_from(builder.metadata().file_metadata().num_rows()).unwrap_or(0);
    let reader = builder.with_batch_size(rows.max(1)).build()?;

    let mut parts: Vec<Vec<Column>> = vec![Vec::new(); schema.fields().len()];
    for batch in reader {
        let batch = batch?;
        for (i, field) in schema.fields().iter().enumerate() {
            let override_ty = types.get(field.name()).copied();
            parts[i].push(array_to_column(field.name(), batch.column(i), override_ty)?);
        }
    }
    tracing::trace!(columns = schema.fields().len(), rows, "parsed parquet");

    let mut columns: IndexMap<String, Column> = IndexMap::with_capacity(parts.len());
    for (field, chunks) in schema.fields().iter().zip(parts) {
        let column = match concat(chunks)? {
            Some(column) => column,
            None => {
                let ty = types
                    .get(field.name())
                    .copied()
                    .or_else(|| element_type_of(field.data_type()))
                    .ok_or_else(|| Error::Schema(format!("unknown type: {}", field.data_type())))?;
                Column::empty(ty)
            }
        };
        columns.insert(field.name().clone(), column);
    }
    Ok(Table::from_parts(columns)?)
}

/// Join per-batch pieces of one column, keeping the first piece's type.
fn concat(chunks: Vec<Column>) -> Result<Option<Column>> {
    let mut chunks = chunks.into_iter();
    let Some(first) = chunks.next() else {
        return Ok(None);
    };
    let rest: Vec<Column> = chunks.collect();
    if rest.is_empty() {
        return Ok(Some(first));
    }
    let ty = first.dtype();
    let mut values = first.to_vec();
    for chunk in &rest {
        values.extend(chunk.iter());
    }
    Ok(Some(Column::from_values_typed(values, ty)?))
}
