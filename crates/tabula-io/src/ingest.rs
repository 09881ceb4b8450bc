//! Raw column data as produced by the readers, before it becomes a `Table`.
//!
//! Readers hand over a header and row-major scalars; `RawTable` settles the
//! column names (generating names for blank headers and dropping later
//! duplicates), transposes the rows, and applies any type overrides.

use std::collections::HashSet;

use tabula_core::table::{ColumnInput, Table, TypeOverrides};
use tabula_core::types::Scalar;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    names: Vec<String>,
    columns: Vec<Vec<Scalar>>,
    types: TypeOverrides,
}

/// Replace blank names with `unnamed`, `unnamed2`, `unnamed3`, ... skipping
/// any name used elsewhere in the header.
fn fill_blank_names(header: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = header.iter().filter(|h| !h.is_empty()).cloned().collect();
    let mut suffix = 1;
    header
        .iter()
        .map(|h| {
            if !h.is_empty() {
                return h.clone();
            }
            loop {
                let candidate = if suffix == 1 {
                    "unnamed".to_string()
                } else {
                    format!("unnamed{suffix}")
                };
                suffix += 1;
                if used.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}

impl RawTable {
    /// From a header row read out of the data itself. Rows wider than the
    /// header get blank names for the extra fields, which are then named like
    /// any other blank header.
    pub fn new(mut header: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width > header.len() {
            header.resize(width, String::new());
        }
        Self::build(fill_blank_names(&header), rows)
    }

    /// From caller-supplied headers; every row is data. The header count must
    /// equal the width of the data, except that no headers at all yields an
    /// empty table.
    pub fn with_headers(headers: Vec<String>, rows: Vec<Vec<Scalar>>) -> Result<Self> {
        if headers.is_empty() {
            return Ok(Self::default());
        }
        if let Some(first) = rows.first() {
            if first.len() != headers.len() {
                return Err(Error::Schema(format!(
                    "expected {} headers, got {}",
                    first.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self::build(fill_blank_names(&headers), rows))
    }

    /// From column-major data that already has settled names.
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<Scalar>>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(Error::Schema(format!(
                "expected {} columns, got {}",
                names.len(),
                columns.len()
            )));
        }
        Ok(Self {
            names,
            columns,
            types: TypeOverrides::new(),
        })
    }

    fn build(names: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        // First occurrence of a name wins; later ones are dropped with their data.
        let mut seen = HashSet::new();
        let keep: Vec<(usize, String)> = names
            .into_iter()
            .enumerate()
            .filter(|(_, n)| seen.insert(n.clone()))
            .collect();

        let mut columns: Vec<Vec<Scalar>> = keep.iter().map(|_| Vec::with_capacity(rows.len())).collect();
        for row in &rows {
            for (slot, (index, _)) in keep.iter().enumerate() {
                columns[slot].push(row.get(*index).cloned().unwrap_or_default());
            }
        }

        Self {
            names: keep.into_iter().map(|(_, n)| n).collect(),
            columns,
            types: TypeOverrides::new(),
        }
    }

    /// Attach per-column type overrides.
    pub fn with_types(mut self, types: TypeOverrides) -> Self {
        self.types = types;
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn into_table(self) -> Result<Table> {
        let entries = self
            .names
            .into_iter()
            .zip(self.columns)
            .map(|(name, values)| (name, ColumnInput::Values(values)));
        Ok(Table::with_types(entries, &self.types)?)
    }
}
