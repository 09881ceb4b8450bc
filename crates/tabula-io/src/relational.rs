//! Materialized relational results: column names plus row tuples.

use tabula_core::table::{Table, TypeOverrides};
use tabula_core::types::Scalar;

use crate::error::{Error, Result};
use crate::ingest::RawTable;

/// Build a table from a query result's column names and rows.
pub fn from_result<S: Into<String>>(
    columns: impl IntoIterator<Item = S>,
    rows: Vec<Vec<Scalar>>,
    types: &TypeOverrides,
) -> Result<Table> {
    let names: Vec<String> = columns.into_iter().map(Into::into).collect();
    let mut values: Vec<Vec<Scalar>> = names.iter().map(|_| Vec::with_capacity(rows.len())).collect();
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != names.len() {
            return Err(Error::Schema(format!(
                "row {i}: expected {} values, got {}",
                names.len(),
                row.len()
            )));
        }
        for (column, value) in values.iter_mut().zip(row) {
            column.push(value);
        }
    }
    RawTable::from_columns(names, values)?
        .with_types(types.clone())
        .into_table()
}
