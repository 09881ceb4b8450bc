use std::collections::HashMap;

use super::Column;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::types::{Scalar, ScalarKey};

impl Column {
    /// Expand a string column into `Int64` indicator columns named
    /// `<prefix><value>`, one per distinct value in first-occurrence order.
    /// With `drop`, the first value gets no column.
    pub fn one_hot(&self, drop: bool, prefix: &str) -> Result<Table> {
        if let Some(bad) = self.iter().find(|v| v.as_str().is_none()) {
            return Err(Error::Type(format!(
                "all elements must be strings, found {}",
                bad.type_name()
            )));
        }
        let values = self.uniq();
        let skip = usize::from(drop);
        let mut entries = Vec::with_capacity(values.len().saturating_sub(skip));
        for value in values.iter().skip(skip) {
            let indicator: Vec<i64> = self.iter().map(|v| i64::from(v.loose_eq(&value))).collect();
            entries.push((format!("{prefix}{value}"), Column::from(indicator)));
        }
        Table::from_columns(entries)
    }

    /// Contingency table: a `_` column with this column's sorted distinct
    /// values, then one `Int64` count column per sorted distinct value of
    /// `other`.
    pub fn crosstab(&self, other: &Column) -> Result<Table> {
        if self.len() != other.len() {
            return Err(Error::size_mismatch(self.len(), other.len()));
        }
        let index = self.uniq().sort();
        let headers = other.uniq().sort();
        let row_of: HashMap<ScalarKey, usize> =
            index.iter().enumerate().map(|(i, v)| (v.key(), i)).collect();
        let col_of: HashMap<ScalarKey, usize> =
            headers.iter().enumerate().map(|(i, v)| (v.key(), i)).collect();

        let mut counts = vec![vec![0i64; index.len()]; headers.len()];
        for (a, b) in self.zip(other) {
            if let (Some(&r), Some(&c)) = (row_of.get(&a.key()), col_of.get(&b.key())) {
                counts[c][r] += 1;
            }
        }

        let mut entries = vec![("_".to_string(), index)];
        for (header, column) in headers.iter().zip(counts) {
            entries.push((label(&header), Column::from(column)));
        }
        Table::from_columns(entries)
    }
}

fn label(value: &Scalar) -> String {
    match value {
        Scalar::Null => "null".to_string(),
        other => other.to_string(),
    }
}
