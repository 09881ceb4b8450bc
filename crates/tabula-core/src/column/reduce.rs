//! Reductions, ordering, and set-like helpers.

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;

use super::ops::scalar_binary;
use super::{with_data, BinaryOp, Column, ColumnData, Element};
use crate::error::{Error, Result};
use crate::types::{ElementType, Scalar, ScalarKey};

/// Ascending order with NaN after every number.
fn native_cmp<T: Element>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

fn extreme<T: Element>(v: &[T], want: Ordering) -> Option<T> {
    let mut iter = v.iter().copied();
    let mut best = iter.next()?;
    for x in iter {
        if best.is_nan() {
            break;
        }
        if x.is_nan() || x.partial_cmp(&best) == Some(want) {
            best = x;
        }
    }
    Some(best)
}

impl Column {
    /// Compare two rows of this column under the sort order.
    pub(crate) fn cmp_rows(&self, i: usize, j: usize) -> Ordering {
        with_data!(
            self.data(),
            |v| native_cmp(&v[i], &v[j]),
            bool |b| b[i].cmp(&b[j]),
            object |o| o[i].total_cmp(&o[j]),
        )
    }

    /// Stable ascending permutation.
    pub fn argsort(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.len()).collect();
        idx.sort_by(|&i, &j| self.cmp_rows(i, j));
        idx
    }

    /// Ascending copy; floats put NaN last and objects order
    /// null < bool < numbers < strings.
    pub fn sort(&self) -> Column {
        self.gather(&self.argsort())
    }

    fn extreme(&self, want: Ordering, name: &str) -> Result<Scalar> {
        with_data!(
            self.data(),
            |v| Ok(extreme(v, want).map_or(Scalar::Null, |x| x.to_scalar())),
            bool |b| Ok(match want {
                Ordering::Greater => b.iter().copied().max(),
                _ => b.iter().copied().min(),
            }
            .map_or(Scalar::Null, Scalar::Bool)),
            object |o| {
                // nulls are skipped; an all-null column reduces to null
                let mut iter = o.iter().filter(|v| !v.is_null());
                let Some(mut best) = iter.next() else {
                    return Ok(Scalar::Null);
                };
                for x in iter {
                    match x.partial_cmp_value(best) {
                        Some(ord) if ord == want => best = x,
                        Some(_) => {}
                        None => {
                            return Err(Error::Type(format!(
                                "{name}: comparison of {} with {} failed",
                                x.type_name(),
                                best.type_name()
                            )))
                        }
                    }
                }
                Ok(best.clone())
            },
        )
    }

    /// Largest element; null when empty, NaN when any float is NaN.
    pub fn max(&self) -> Result<Scalar> {
        self.extreme(Ordering::Greater, "max")
    }

    pub fn min(&self) -> Result<Scalar> {
        self.extreme(Ordering::Less, "min")
    }

    /// Sum in the column's own domain: integers wrap to 64 bits, bools count
    /// trues, objects add dynamically.
    pub fn sum(&self) -> Result<Scalar> {
        with_data!(
            self.data(),
            |v| Ok(if self.dtype().is_float() {
                Scalar::Float(v.iter().map(|x| x.to_f64()).sum())
            } else {
                let total = v.iter().fold(0i128, |acc, x| acc.wrapping_add(x.to_i128()));
                if self.dtype().is_unsigned() {
                    Scalar::UInt(total as u64)
                } else {
                    Scalar::Int(total as i64)
                }
            }),
            bool |b| Ok(Scalar::Int(b.iter().filter(|x| **x).count() as i64)),
            object |o| {
                let mut iter = o.iter();
                let Some(first) = iter.next() else {
                    return Ok(Scalar::Int(0));
                };
                iter.try_fold(first.clone(), |acc, x| scalar_binary(&acc, x, BinaryOp::Add))
            },
        )
    }

    /// Values as `f64` for statistics; objects must hold numbers.
    fn to_f64_vec(&self, name: &str) -> Result<Vec<f64>> {
        let c = self
            .cast(ElementType::Float64)
            .map_err(|e| e.with_context(format!("computing {name}")))?;
        Ok(c.as_slice::<f64>().unwrap_or_default().to_vec())
    }

    pub fn mean(&self) -> Result<f64> {
        let v = self.to_f64_vec("mean")?;
        Ok(v.iter().sum::<f64>() / v.len() as f64)
    }

    pub fn median(&self) -> Result<f64> {
        self.percentile(50.0)
    }

    /// Linear interpolation between closest ranks; `q` is in `[0, 100]`.
    pub fn percentile(&self, q: f64) -> Result<f64> {
        if !(0.0..=100.0).contains(&q) {
            return Err(Error::Range(format!("percentile out of range: {q}")));
        }
        let mut v = self.to_f64_vec("percentile")?;
        if v.is_empty() || v.iter().any(|x| x.is_nan()) {
            return Ok(f64::NAN);
        }
        v.sort_by(f64::total_cmp);
        let pos = q / 100.0 * (v.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        Ok(v[lo] + (v[hi] - v[lo]) * (pos - lo as f64))
    }

    /// Sample variance (N - 1 denominator).
    pub fn var(&self) -> Result<f64> {
        let v = self.to_f64_vec("var")?;
        if v.len() < 2 {
            return Ok(f64::NAN);
        }
        let mean = v.iter().sum::<f64>() / v.len() as f64;
        let ss: f64 = v.iter().map(|x| (x - mean) * (x - mean)).sum();
        Ok(ss / (v.len() - 1) as f64)
    }

    /// Sample standard deviation.
    pub fn std(&self) -> Result<f64> {
        Ok(self.var()?.sqrt())
    }

    /// `Bool` column marking NaN (floats) or null (objects).
    pub fn missing(&self) -> Column {
        let out: Vec<bool> = with_data!(
            self.data(),
            |v| v.iter().map(|x| x.is_nan()).collect(),
            bool |b| vec![false; b.len()],
            object |o| o.iter().map(Scalar::is_null).collect(),
        );
        Column::from(out)
    }

    /// Distinct values in first-occurrence order; NaN and null each collapse
    /// to a single entry.
    pub fn uniq(&self) -> Column {
        let mut seen = HashSet::new();
        let first: Vec<usize> = (0..self.len())
            .filter(|&i| seen.insert(self.scalar_at(i).key()))
            .collect();
        self.gather(&first)
    }

    /// Value counts in first-occurrence order.
    pub fn tally(&self) -> Vec<(Scalar, usize)> {
        let mut counts: IndexMap<ScalarKey, usize> = IndexMap::new();
        for v in self.iter() {
            *counts.entry(v.key()).or_insert(0) += 1;
        }
        counts.into_iter().map(|(k, n)| (Scalar::from(k), n)).collect()
    }

    /// Differences between consecutive elements as `Float64`; the first is NaN.
    pub fn diff(&self) -> Result<Column> {
        let v = self.to_f64_vec("diff")?;
        let mut out = Vec::with_capacity(v.len());
        if !v.is_empty() {
            out.push(f64::NAN);
        }
        out.extend(v.windows(2).map(|w| w[1] - w[0]));
        Ok(Column::new(ColumnData::Float64(out)))
    }
}
