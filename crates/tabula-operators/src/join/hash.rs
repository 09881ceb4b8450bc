//! Hash equality join: build an index on the right, look it up from the left.

use std::collections::HashMap;

use indexmap::IndexMap;
use tabula_core::column::Column;
use tabula_core::table::Table;
use tabula_core::types::{ElementType, Scalar, ScalarKey};

use crate::traits::OpError;

/// Join type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn parse(s: &str) -> Result<Self, OpError> {
        match s.to_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            _ => Err(OpError::Plan(format!("unknown join type: {}", s))),
        }
    }
}

/// Which columns to match on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JoinOn {
    /// Every column name the two tables share, in left order.
    #[default]
    Shared,
    /// The same names on both sides.
    Columns(Vec<String>),
    /// `(left, right)` name pairs.
    Pairs(Vec<(String, String)>),
}

impl From<&str> for JoinOn {
    fn from(name: &str) -> Self {
        JoinOn::Columns(vec![name.to_string()])
    }
}

impl From<Vec<&str>> for JoinOn {
    fn from(names: Vec<&str>) -> Self {
        JoinOn::Columns(names.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for JoinOn {
    fn from(names: Vec<String>) -> Self {
        JoinOn::Columns(names)
    }
}

impl From<Vec<(&str, &str)>> for JoinOn {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        JoinOn::Pairs(
            pairs
                .into_iter()
                .map(|(l, r)| (l.to_string(), r.to_string()))
                .collect(),
        )
    }
}

impl JoinOn {
    /// Key names on each side.
    fn resolve(&self, left: &Table, right: &Table) -> (Vec<String>, Vec<String>) {
        match self {
            JoinOn::Shared => {
                let shared: Vec<String> = left
                    .names()
                    .into_iter()
                    .filter(|n| right.contains(n))
                    .map(String::from)
                    .collect();
                (shared.clone(), shared)
            }
            JoinOn::Columns(names) => (names.clone(), names.clone()),
            JoinOn::Pairs(pairs) => pairs.iter().cloned().unzip(),
        }
    }
}

pub struct HashJoin {
    pub on: JoinOn,
    pub join_type: JoinType,
}

impl Default for HashJoin {
    fn default() -> Self {
        Self {
            on: JoinOn::Shared,
            join_type: JoinType::Inner,
        }
    }
}

fn check_keys(table: &Table, keys: &[String]) -> Result<(), OpError> {
    if keys.is_empty() {
        return Err(OpError::Schema("no keys".into()));
    }
    let missing: Vec<&str> = keys
        .iter()
        .filter(|k| !table.contains(k))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(OpError::Schema(format!("missing keys: {}", missing.join(", "))));
    }
    Ok(())
}

fn key_tuple(columns: &[&Column], row: usize) -> Vec<ScalarKey> {
    columns
        .iter()
        .map(|c| c.get(row).unwrap_or_default().key())
        .collect()
}

/// Shared type when both sides agree, otherwise none (re-infer).
fn output_type(left: Option<ElementType>, right: Option<ElementType>) -> Option<ElementType> {
    match (left, right) {
        (Some(a), Some(b)) if a == b => Some(a),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        _ => None,
    }
}

impl HashJoin {
    pub fn execute(&self, left: &Table, right: &Table) -> Result<Table, OpError> {
        let (left_on, right_on) = self.on.resolve(left, right);
        check_keys(left, &left_on)?;
        check_keys(right, &right_on)?;

        let left_keys = left_on
            .iter()
            .map(|k| left.column(k))
            .collect::<Result<Vec<_>, _>>()?;
        let right_keys = right_on
            .iter()
            .map(|k| right.column(k))
            .collect::<Result<Vec<_>, _>>()?;

        // Build phase: hash table on right side
        let mut hash_table: HashMap<Vec<ScalarKey>, Vec<usize>> = HashMap::new();
        for row in 0..right.size() {
            hash_table
                .entry(key_tuple(&right_keys, row))
                .or_default()
                .push(row);
        }
        tracing::debug!(
            keys = ?left_on,
            right_rows = right.size(),
            distinct = hash_table.len(),
            "built join index"
        );

        // Probe phase: scan left side and emit matches
        let mut output_rows: Vec<(usize, Option<usize>)> = Vec::new(); // (left_idx, right_idx)
        for left_idx in 0..left.size() {
            match hash_table.get(&key_tuple(&left_keys, left_idx)) {
                Some(matches) => output_rows.extend(matches.iter().map(|&r| (left_idx, Some(r)))),
                None if self.join_type == JoinType::Left => output_rows.push((left_idx, None)),
                None => {}
            }
        }
        tracing::debug!(
            join_type = ?self.join_type,
            left_rows = left.size(),
            output_rows = output_rows.len(),
            "matched left rows against join index"
        );

        let mut names: Vec<&str> = left.names();
        names.extend(right.names().into_iter().filter(|n| !left.contains(n)));

        let mut out: IndexMap<String, Column> = IndexMap::with_capacity(names.len());
        for name in names {
            let l = left.get(name);
            let r = right.get(name);
            let values: Vec<Scalar> = output_rows
                .iter()
                .map(|&(li, ri)| {
                    let from_right = match (r, ri) {
                        (Some(col), Some(ri)) => col.get(ri).unwrap_or_default(),
                        _ => Scalar::Null,
                    };
                    // A non-null right value overrides the left one.
                    match (from_right, l) {
                        (Scalar::Null, Some(col)) => col.get(li).unwrap_or_default(),
                        (v, _) => v,
                    }
                })
                .collect();

            let ty = output_type(l.map(Column::dtype), r.map(Column::dtype));
            let has_null = values.iter().any(Scalar::is_null);
            let column = match ty {
                Some(t) if !has_null || t.is_float() || t == ElementType::Object => {
                    Column::from_values_typed(values, t)?
                }
                _ => Column::from_values(values),
            };
            out.insert(name.to_string(), column);
        }

        Ok(Table::from_parts(out)?)
    }
}
