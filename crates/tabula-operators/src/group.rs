//! Grouping engine: bucket rows by key tuple, then aggregate per bucket.
//!
//! The partition is computed on the first aggregate call and reused by later
//! calls on the same `Group`. Output rows follow the first occurrence of each
//! key tuple; null keys form their own group.

use std::cell::OnceCell;
use std::collections::HashMap;

use indexmap::IndexMap;
use tabula_core::column::Column;
use tabula_core::table::Table;
use tabula_core::types::ScalarKey;

use crate::aggregate::AggFunc;
use crate::traits::OpError;

/// Row positions of each key tuple, in first-occurrence order.
#[derive(Debug)]
struct Partition {
    buckets: Vec<Vec<usize>>,
}

impl Partition {
    fn build(keys: &[&Column], rows: usize) -> Self {
        let mut index: HashMap<Vec<ScalarKey>, usize> = HashMap::new();
        let mut buckets: Vec<Vec<usize>> = Vec::new();
        for row in 0..rows {
            let tuple: Vec<ScalarKey> = keys
                .iter()
                .map(|c| c.get(row).unwrap_or_default().key())
                .collect();
            let slot = *index.entry(tuple).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(row);
        }
        Self { buckets }
    }

    fn first_rows(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b[0]).collect()
    }
}

/// A table grouped by one or more key columns.
pub struct Group<'a> {
    table: &'a Table,
    columns: Vec<String>,
    partition: OnceCell<Partition>,
}

impl<'a> Group<'a> {
    /// Fails when no columns are given or any key column is missing.
    pub fn new<I, S>(table: &'a Table, columns: I) -> Result<Self, OpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(OpError::Schema("no columns given".into()));
        }
        let missing: Vec<&str> = columns
            .iter()
            .filter(|c| !table.contains(c))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(OpError::Schema(format!("missing keys: {}", missing.join(", "))));
        }
        Ok(Self {
            table,
            columns,
            partition: OnceCell::new(),
        })
    }

    /// A new grouping on these keys plus `more`.
    pub fn group<I, S>(&self, more: I) -> Result<Group<'a>, OpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = self
            .columns
            .iter()
            .cloned()
            .chain(more.into_iter().map(Into::into));
        Group::new(self.table, columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the row partition has been computed yet.
    pub fn is_partitioned(&self) -> bool {
        self.partition.get().is_some()
    }

    fn partition(&self) -> Result<&Partition, OpError> {
        if let Some(p) = self.partition.get() {
            return Ok(p);
        }
        let keys = self
            .columns
            .iter()
            .map(|c| self.table.column(c))
            .collect::<Result<Vec<_>, _>>()?;
        let partition = Partition::build(&keys, self.table.size());
        tracing::debug!(
            keys = ?self.columns,
            rows = self.table.size(),
            groups = partition.buckets.len(),
            "partitioned table"
        );
        Ok(self.partition.get_or_init(|| partition))
    }

    /// Number of distinct key tuples.
    pub fn num_groups(&self) -> Result<usize, OpError> {
        Ok(self.partition()?.buckets.len())
    }

    /// One row per key tuple: the key columns (types preserved) followed by
    /// the aggregate column.
    pub fn aggregate(&self, func: &AggFunc) -> Result<Table, OpError> {
        let partition = self.partition()?;
        let first_rows = partition.first_rows();

        let mut out: IndexMap<String, Column> = IndexMap::new();
        for name in &self.columns {
            let keys = self.table.column(name)?.take_indices(&first_rows)?;
            out.insert(name.clone(), keys);
        }

        let input = func.column().map(|c| self.table.column(c)).transpose()?;
        let mut values = Vec::with_capacity(partition.buckets.len());
        for bucket in &partition.buckets {
            let slice = input.map(|c| c.take_indices(bucket)).transpose()?;
            values.push(func.reduce(bucket.len(), slice.as_ref())?);
        }
        out.insert(func.output_name(), Column::from_values(values));
        tracing::debug!(agg = %func.output_name(), groups = first_rows.len(), "aggregated groups");

        Ok(Table::from_parts(out)?)
    }

    pub fn count(&self) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Count)
    }

    pub fn max(&self, column: &str) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Max { column: column.into() })
    }

    pub fn min(&self, column: &str) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Min { column: column.into() })
    }

    pub fn mean(&self, column: &str) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Mean { column: column.into() })
    }

    pub fn median(&self, column: &str) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Median { column: column.into() })
    }

    pub fn percentile(&self, column: &str, q: f64) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Percentile {
            column: column.into(),
            q,
        })
    }

    pub fn sum(&self, column: &str) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Sum { column: column.into() })
    }

    pub fn std(&self, column: &str) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Std { column: column.into() })
    }

    pub fn var(&self, column: &str) -> Result<Table, OpError> {
        self.aggregate(&AggFunc::Var { column: column.into() })
    }
}
