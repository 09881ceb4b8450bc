//! Row selection and element writes.

use std::ops::{Bound, RangeBounds};

use super::{with_data, with_native, Column, ColumnData, Element};
use crate::error::{Error, Result};
use crate::types::{ElementType, Scalar};

/// Resolve a range against a length, clamping to the bounds.
pub(crate) fn clamp_range(range: impl RangeBounds<usize>, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    (start.min(end), end)
}

/// Positions selected by a `Bool` mask of matching length.
pub(crate) fn mask_positions(mask: &Column, len: usize) -> Result<Vec<usize>> {
    let bits = mask.as_bools().ok_or_else(|| {
        Error::Type(format!("mask must be a bool column, got {}", mask.dtype()))
    })?;
    if bits.len() != len {
        return Err(Error::size_mismatch(len, bits.len()));
    }
    Ok(bits
        .iter()
        .enumerate()
        .filter_map(|(i, keep)| keep.then_some(i))
        .collect())
}

impl Column {
    /// Gather rows by position. Positions must be in bounds.
    pub(crate) fn gather(&self, idx: &[usize]) -> Column {
        let data = with_data!(
            self.data(),
            |v| Element::into_data(idx.iter().map(|&i| v[i]).collect::<Vec<_>>()),
            bool |b| ColumnData::Bool(idx.iter().map(|&i| b[i]).collect()),
            object |o| ColumnData::Object(idx.iter().map(|&i| o[i].clone()).collect()),
        );
        Column::new(data)
    }

    /// Gather rows by position; duplicates are honored.
    pub fn take_indices(&self, idx: &[usize]) -> Result<Column> {
        if let Some(bad) = idx.iter().find(|&&i| i >= self.len()) {
            return Err(Error::Schema(format!(
                "index {bad} out of range for size {}",
                self.len()
            )));
        }
        Ok(self.gather(idx))
    }

    /// Contiguous rows, clamped to the column length.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Column {
        let (start, end) = clamp_range(range, self.len());
        let data = with_data!(
            self.data(),
            |v| Element::into_data(v[start..end].to_vec()),
            bool |b| ColumnData::Bool(b[start..end].to_vec()),
            object |o| ColumnData::Object(o[start..end].to_vec()),
        );
        Column::new(data)
    }

    /// Rows where `mask` is true.
    pub fn filter(&self, mask: &Column) -> Result<Column> {
        Ok(self.gather(&mask_positions(mask, self.len())?))
    }

    pub fn first(&self, n: usize) -> Column {
        if n >= self.len() {
            return self.clone();
        }
        self.slice(..n)
    }

    pub fn last(&self, n: usize) -> Column {
        if n >= self.len() {
            return self.clone();
        }
        self.slice(self.len() - n..)
    }

    /// First `n` rows; negative `n` is an error.
    pub fn take(&self, n: i64) -> Result<Column> {
        let n = usize::try_from(n)
            .map_err(|_| Error::Range("attempt to take negative size".into()))?;
        Ok(self.first(n))
    }

    /// First `n` rows; negative `n` keeps all but the last `|n|`.
    pub fn head(&self, n: i64) -> Column {
        self.first(relative_count(n, self.len()))
    }

    /// Last `n` rows; negative `n` keeps all but the first `|n|`.
    pub fn tail(&self, n: i64) -> Column {
        self.last(relative_count(n, self.len()))
    }

    /// Write `value`, converted to this column's type, at each position.
    fn assign(&mut self, positions: &[usize], value: &Scalar) -> Result<()> {
        if let Some(bad) = positions.iter().find(|&&i| i >= self.len()) {
            return Err(Error::Schema(format!(
                "index {bad} out of range for size {}",
                self.len()
            )));
        }
        let cell = ColumnData::Object(vec![value.clone()]).cast(self.dtype())?;
        macro_rules! fill {
            ($dst:expr, $src:expr, $at:expr; $($variant:ident),*) => {
                match ($dst, $src) {
                    $(
                        (ColumnData::$variant(dst), ColumnData::$variant(src)) => {
                            for &i in $at {
                                dst[i] = src[0].clone();
                            }
                        }
                    )*
                    _ => return Err(Error::Invariant("assigned value lost its type".into())),
                }
            };
        }
        fill!(
            self.data_mut(), cell, positions;
            Bool, Int8, Int16, Int32, Int64, UInt8, UInt16, UInt32, UInt64, Float32, Float64, Object
        );
        Ok(())
    }

    /// Overwrite one element in place.
    pub fn set(&mut self, idx: usize, value: impl Into<Scalar>) -> Result<()> {
        self.assign(&[idx], &value.into())
    }

    pub fn set_range(&mut self, range: impl RangeBounds<usize>, value: impl Into<Scalar>) -> Result<()> {
        let (start, end) = clamp_range(range, self.len());
        let positions: Vec<usize> = (start..end).collect();
        self.assign(&positions, &value.into())
    }

    /// Overwrite every element where `mask` is true.
    pub fn set_where(&mut self, mask: &Column, value: impl Into<Scalar>) -> Result<()> {
        let positions = mask_positions(mask, self.len())?;
        self.assign(&positions, &value.into())
    }

    /// Limit numeric values to `[min, max]`, keeping the element type.
    pub fn clamp(&self, min: impl Into<Scalar>, max: impl Into<Scalar>) -> Result<Column> {
        let ty = self.dtype();
        let bounds = ColumnData::Object(vec![min.into(), max.into()]).cast(ty)?;
        with_native!(
            ty,
            |T| {
                let (Some(v), Some(b)) = (self.as_slice::<T>(), T::slice_of(&bounds)) else {
                    return Err(Error::Invariant("clamp bounds lost their type".into()));
                };
                let (lo, hi) = (b[0], b[1]);
                let out: Vec<T> = v
                    .iter()
                    .map(|&x| {
                        if x < lo {
                            lo
                        } else if x > hi {
                            hi
                        } else {
                            x
                        }
                    })
                    .collect();
                Ok(Column::from(out))
            },
            else Err(Error::Type(format!("no operation clamp for {ty}"))),
        )
    }

    /// Apply `f` to every element; the result type is re-inferred.
    pub fn map(&self, f: impl FnMut(Scalar) -> Scalar) -> Column {
        Column::from_values(self.iter().map(f).collect())
    }

    pub fn map_in_place(&mut self, f: impl FnMut(Scalar) -> Scalar) {
        *self = self.map(f);
    }

    /// `Bool` column marking elements equal to any of `values`.
    pub fn is_in(&self, values: &[Scalar]) -> Column {
        let out: Vec<bool> = self
            .iter()
            .map(|x| values.iter().any(|v| x.loose_eq(v)))
            .collect();
        Column::from(out)
    }
}

fn relative_count(n: i64, len: usize) -> usize {
    if n >= 0 {
        n as usize
    } else {
        len.saturating_sub(n.unsigned_abs() as usize)
    }
}
