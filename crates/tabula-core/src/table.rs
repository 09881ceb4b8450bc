//! Tables: insertion-ordered collections of equal-length named columns.

use std::collections::HashMap;
use std::ops::{Index, Range};

use indexmap::IndexMap;

use crate::column::{Column, Element};
use crate::error::{Error, Result};
use crate::types::{ElementType, Scalar};

/// One row as a name → value mapping, in column order.
pub type Row = IndexMap<String, Scalar>;

/// Per-column element type overrides applied at construction.
pub type TypeOverrides = HashMap<String, ElementType>;

/// Anything that can become a table column.
#[derive(Debug, Clone)]
pub enum ColumnInput {
    Column(Column),
    /// Untyped values; the element type is inferred unless overridden.
    Values(Vec<Scalar>),
    /// Broadcast to the table's row count.
    Scalar(Scalar),
}

impl ColumnInput {
    fn declared_len(&self) -> Option<usize> {
        match self {
            ColumnInput::Column(c) => Some(c.len()),
            ColumnInput::Values(v) => Some(v.len()),
            ColumnInput::Scalar(_) => None,
        }
    }

    fn into_column(self, size: usize, ty: Option<ElementType>) -> Result<Column> {
        let column = match self {
            ColumnInput::Column(c) => c,
            ColumnInput::Values(v) => match ty {
                Some(t) => return Column::from_values_typed(v, t),
                None => Column::from_values(v),
            },
            ColumnInput::Scalar(s) => Column::filled(s, size),
        };
        match ty {
            Some(t) => column.cast(t),
            None => Ok(column),
        }
    }
}

impl From<Column> for ColumnInput {
    fn from(c: Column) -> Self {
        ColumnInput::Column(c)
    }
}

impl From<&Column> for ColumnInput {
    fn from(c: &Column) -> Self {
        ColumnInput::Column(c.clone())
    }
}

impl From<Vec<Scalar>> for ColumnInput {
    fn from(v: Vec<Scalar>) -> Self {
        ColumnInput::Values(v)
    }
}

impl<T: Element> From<Vec<T>> for ColumnInput {
    fn from(v: Vec<T>) -> Self {
        ColumnInput::Column(Column::from(v))
    }
}

impl From<Vec<bool>> for ColumnInput {
    fn from(v: Vec<bool>) -> Self {
        ColumnInput::Column(Column::from(v))
    }
}

impl From<Vec<&str>> for ColumnInput {
    fn from(v: Vec<&str>) -> Self {
        ColumnInput::Column(Column::from(v))
    }
}

impl From<Vec<String>> for ColumnInput {
    fn from(v: Vec<String>) -> Self {
        ColumnInput::Column(Column::from(v))
    }
}

macro_rules! input_from_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ColumnInput {
                fn from(v: $t) -> Self {
                    ColumnInput::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

input_from_scalar!(Scalar, bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String);

/// Row or column selection for `Table::select`.
#[derive(Debug, Clone)]
pub enum Selector {
    /// One row, as a single-row table.
    Row(usize),
    /// Contiguous rows, clamped to the table size.
    Range(Range<usize>),
    /// Rows by position; order and duplicates are kept.
    Positions(Vec<usize>),
    /// Rows where a `Bool` column is true.
    Mask(Column),
    /// A column subset, in the given order.
    Names(Vec<String>),
}

impl From<usize> for Selector {
    fn from(i: usize) -> Self {
        Selector::Row(i)
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::Range(r)
    }
}

impl From<Vec<usize>> for Selector {
    fn from(v: Vec<usize>) -> Self {
        Selector::Positions(v)
    }
}

impl From<&[usize]> for Selector {
    fn from(v: &[usize]) -> Self {
        Selector::Positions(v.to_vec())
    }
}

impl From<Column> for Selector {
    fn from(mask: Column) -> Self {
        Selector::Mask(mask)
    }
}

impl From<&Column> for Selector {
    fn from(mask: &Column) -> Self {
        Selector::Mask(mask.clone())
    }
}

impl From<Vec<&str>> for Selector {
    fn from(v: Vec<&str>) -> Self {
        Selector::Names(v.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Selector {
    fn from(v: &[&str]) -> Self {
        Selector::Names(v.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for Selector {
    fn from(v: Vec<String>) -> Self {
        Selector::Names(v)
    }
}

/// One key of a multi-column sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

impl From<&str> for SortKey {
    fn from(column: &str) -> Self {
        SortKey::asc(column)
    }
}

/// An ordered mapping of unique names to equal-length columns.
#[derive(Clone, Default)]
pub struct Table {
    columns: IndexMap<String, Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, column-like)` entries. Scalars broadcast to the
    /// length of the first non-scalar entry, or 1.
    pub fn from_columns<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ColumnInput>,
    {
        Self::with_types(entries, &TypeOverrides::new())
    }

    /// Like `from_columns`, casting the named columns to the given types.
    pub fn with_types<I, K, V>(entries: I, types: &TypeOverrides) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ColumnInput>,
    {
        let entries: Vec<(String, ColumnInput)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let size = entries
            .iter()
            .find_map(|(_, input)| input.declared_len())
            .unwrap_or(1);

        let mut columns = IndexMap::with_capacity(entries.len());
        for (name, input) in entries {
            if columns.contains_key(&name) {
                return Err(Error::Schema(format!("duplicate column: {name}")));
            }
            let column = input.into_column(size, types.get(&name).copied())?;
            columns.insert(name, column);
        }
        Self::from_parts(columns)
    }

    /// Assemble from named columns, checking that their lengths agree.
    pub fn from_parts(columns: IndexMap<String, Column>) -> Result<Self> {
        let mut sizes: Vec<usize> = Vec::new();
        for column in columns.values() {
            if !sizes.contains(&column.len()) {
                sizes.push(column.len());
            }
        }
        if sizes.len() > 1 {
            return Err(Error::Schema(format!("different sizes: {sizes:?}")));
        }
        Ok(Self { columns })
    }

    /// Build from row mappings. The column set is the union of row keys in
    /// first-seen order; absent keys become null.
    pub fn from_rows<I, R, K, V>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        Self::from_rows_typed(rows, &TypeOverrides::new())
    }

    pub fn from_rows_typed<I, R, K, V>(rows: I, types: &TypeOverrides) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        let mut values: IndexMap<String, Vec<Scalar>> = IndexMap::new();
        let mut n = 0;
        for row in rows {
            for (key, value) in row {
                let column = values
                    .entry(key.into())
                    .or_insert_with(|| vec![Scalar::Null; n]);
                if column.len() > n {
                    column[n] = value.into();
                } else {
                    column.push(value.into());
                }
            }
            n += 1;
            for column in values.values_mut() {
                column.resize(n, Scalar::Null);
            }
        }
        Self::with_types(
            values.into_iter().map(|(k, v)| (k, ColumnInput::Values(v))),
            types,
        )
    }

    /// Number of rows.
    pub fn size(&self) -> usize {
        self.columns.values().next().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.size(), self.columns.len())
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn types(&self) -> IndexMap<String, ElementType> {
        self.columns
            .iter()
            .map(|(k, c)| (k.clone(), c.dtype()))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Borrow a column, failing with name suggestions when it is absent.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| self.missing(name))
    }

    /// Mutable access to a column; writes must keep its length.
    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        if !self.columns.contains_key(name) {
            return Err(self.missing(name));
        }
        self.columns
            .get_mut(name)
            .ok_or_else(|| Error::Invariant(format!("column {name} vanished")))
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub(crate) fn missing(&self, name: &str) -> Error {
        Error::missing_column(name, self.columns.keys().map(String::as_str))
    }

    /// Add or replace a column. Its length must match unless the table has
    /// no columns; scalars broadcast to the current size.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ColumnInput>) -> Result<()> {
        let size = self.size();
        let column = value.into().into_column(size, None)?;
        if !self.columns.is_empty() && column.len() != size {
            return Err(Error::size_mismatch(size, column.len()));
        }
        self.columns.insert(name.into(), column);
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Option<Column> {
        self.columns.shift_remove(name)
    }

    /// A copy without the named columns; unknown names are ignored.
    pub fn except(&self, names: &[&str]) -> Table {
        let mut out = self.clone();
        for name in names {
            out.delete(name);
        }
        out
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    fn map_columns(&self, f: impl Fn(&Column) -> Column) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|(k, c)| (k.clone(), f(c)))
                .collect(),
        }
    }

    pub(crate) fn gather_rows(&self, idx: &[usize]) -> Table {
        self.map_columns(|c| c.gather(idx))
    }

    /// Select rows (position, range, positions, mask) or a column subset.
    pub fn select(&self, selector: impl Into<Selector>) -> Result<Table> {
        let size = self.size();
        match selector.into() {
            Selector::Row(i) => {
                if i >= size {
                    return Err(Error::Schema(format!("index {i} out of range for size {size}")));
                }
                Ok(self.gather_rows(&[i]))
            }
            Selector::Range(r) => Ok(self.map_columns(|c| c.slice(r.clone()))),
            Selector::Positions(p) => {
                if let Some(bad) = p.iter().find(|&&i| i >= size) {
                    return Err(Error::Schema(format!("index {bad} out of range for size {size}")));
                }
                Ok(self.gather_rows(&p))
            }
            Selector::Mask(mask) => {
                let positions = crate::column::mask_positions(&mask, size)?;
                Ok(self.gather_rows(&positions))
            }
            Selector::Names(names) => {
                let mut columns = IndexMap::with_capacity(names.len());
                for name in names {
                    let column = self.column(&name)?.clone();
                    columns.insert(name, column);
                }
                Ok(Table { columns })
            }
        }
    }

    pub fn first(&self, n: usize) -> Table {
        self.map_columns(|c| c.first(n))
    }

    pub fn last(&self, n: usize) -> Table {
        self.map_columns(|c| c.last(n))
    }

    /// First `n` rows; negative `n` keeps all but the last `|n|`.
    pub fn head(&self, n: i64) -> Table {
        self.map_columns(|c| c.head(n))
    }

    /// Last `n` rows; negative `n` keeps all but the first `|n|`.
    pub fn tail(&self, n: i64) -> Table {
        self.map_columns(|c| c.tail(n))
    }

    pub fn row(&self, i: usize) -> Option<Row> {
        (i < self.size()).then(|| {
            self.columns
                .iter()
                .map(|(k, c)| (k.clone(), c.scalar_at(i)))
                .collect()
        })
    }

    pub fn rows(&self) -> Vec<Row> {
        (0..self.size()).filter_map(|i| self.row(i)).collect()
    }

    pub fn to_columns(&self) -> IndexMap<String, Vec<Scalar>> {
        self.columns
            .iter()
            .map(|(k, c)| (k.clone(), c.to_vec()))
            .collect()
    }

    /// Stable sort on one or more columns.
    pub fn sort_by(&self, keys: &[SortKey]) -> Result<Table> {
        let resolved = keys
            .iter()
            .map(|k| Ok((self.column(&k.column)?, k.descending)))
            .collect::<Result<Vec<_>>>()?;
        let mut idx: Vec<usize> = (0..self.size()).collect();
        idx.sort_by(|&i, &j| {
            resolved
                .iter()
                .map(|(column, descending)| {
                    let ord = column.cmp_rows(i, j);
                    if *descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(self.gather_rows(&idx))
    }

    /// Stable sort on a key computed from each row.
    pub fn sort_by_key<K: Ord>(&self, mut f: impl FnMut(&Row) -> K) -> Table {
        let keys: Vec<K> = self.rows().iter().map(&mut f).collect();
        let mut idx: Vec<usize> = (0..self.size()).collect();
        idx.sort_by(|&i, &j| keys[i].cmp(&keys[j]));
        self.gather_rows(&idx)
    }

    /// Stack `other` below `self`. Columns missing on either side are filled
    /// with null; element types are re-inferred.
    pub fn concat(&self, other: &Table) -> Table {
        let (n, m) = (self.size(), other.size());
        let mut columns = IndexMap::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            let mut values = column.to_vec();
            match other.get(name) {
                Some(tail) => values.extend(tail.iter()),
                None => values.resize(n + m, Scalar::Null),
            }
            columns.insert(name.clone(), Column::from_values(values));
        }
        for (name, column) in &other.columns {
            if self.contains(name) {
                continue;
            }
            let mut values = vec![Scalar::Null; n];
            values.extend(column.iter());
            columns.insert(name.clone(), Column::from_values(values));
        }
        Table { columns }
    }

    /// Add or replace every column of `other`; sizes must agree.
    pub fn merge(&self, other: &Table) -> Result<Table> {
        let mut out = self.clone();
        for (name, column) in &other.columns {
            out.set(name.clone(), column)?;
        }
        Ok(out)
    }

    /// A copy that shares no column storage with `self`.
    pub fn deep_copy(&self) -> Table {
        self.map_columns(Column::deep_copy)
    }

    /// One-hot encode every `Object` column as `<name>_<value>` indicators;
    /// other columns are kept as they are.
    pub fn one_hot(&self, drop: bool) -> Result<Table> {
        let mut out = Table::new();
        for (name, column) in &self.columns {
            if column.dtype() != ElementType::Object {
                out.set(name.clone(), column)?;
                continue;
            }
            let encoded = column.one_hot(drop, &format!("{name}_")).map_err(|e| match e {
                Error::Type(_) => Error::Type("all elements must be numeric or strings".into()),
                other => other,
            })?;
            out = out.merge(&encoded)?;
        }
        Ok(out)
    }

    pub fn max(&self, column: &str) -> Result<Scalar> {
        self.column(column)?.max()
    }

    pub fn min(&self, column: &str) -> Result<Scalar> {
        self.column(column)?.min()
    }

    pub fn sum(&self, column: &str) -> Result<Scalar> {
        self.column(column)?.sum()
    }

    pub fn mean(&self, column: &str) -> Result<f64> {
        self.column(column)?.mean()
    }

    pub fn median(&self, column: &str) -> Result<f64> {
        self.column(column)?.median()
    }

    pub fn percentile(&self, column: &str, q: f64) -> Result<f64> {
        self.column(column)?.percentile(q)
    }

    pub fn std(&self, column: &str) -> Result<f64> {
        self.column(column)?.std()
    }

    pub fn var(&self, column: &str) -> Result<f64> {
        self.column(column)?.var()
    }
}

impl PartialEq for Table {
    /// Equal size, equal name sequence and elementwise-equal values. Element
    /// types are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size()
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|((ka, a), (kb, b))| ka == kb && a == b)
    }
}

impl Index<&str> for Table {
    type Output = Column;

    /// # Panics
    /// Panics when the column does not exist; use `Table::column` to get an
    /// error instead.
    fn index(&self, name: &str) -> &Column {
        match self.columns.get(name) {
            Some(column) => column,
            None => panic!("{}", self.missing(name)),
        }
    }
}

/// Build a table from literal columns. Returns `Result<Table>`.
///
/// ```
/// use tabula_core::table;
/// let t = table! { "a" => [1, 2, 3], "b" => ["one", "two", "three"] }.unwrap();
/// assert_eq!(t.shape(), (3, 2));
/// ```
#[macro_export]
macro_rules! table {
    () => {
        $crate::table::Table::from_parts(::std::default::Default::default())
    };
    ($($name:expr => [$($v:expr),* $(,)?]),+ $(,)?) => {
        $crate::table::Table::from_columns(::std::vec![
            $(($name, $crate::col![$($v),*])),+
        ])
    };
}
