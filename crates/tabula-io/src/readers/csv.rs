//! CSV into tables.
//!
//! Fields that parse as integers become `Int`, other numbers `Float`, empty
//! fields null, and everything else stays a string. Column types are then
//! inferred per column unless `CsvOptions::types` names one.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv as csv_crate;
use serde::{Deserialize, Serialize};
use tabula_core::table::{Table, TypeOverrides};
use tabula_core::types::Scalar;

use crate::error::{Error, Result};
use crate::ingest::RawTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Whether the first record is a header row.
    pub has_headers: bool,
    /// Column names to use instead of a header row; every record is then data.
    pub headers: Option<Vec<String>>,
    pub types: TypeOverrides,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            headers: None,
            types: TypeOverrides::new(),
        }
    }
}

impl CsvOptions {
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_types(mut self, types: TypeOverrides) -> Self {
        self.types = types;
        self
    }
}

pub fn read_csv(path: impl AsRef<Path>, opts: &CsvOptions) -> Result<Table> {
    let path = path.as_ref();
    tracing::trace!(path = %path.display(), "reading csv");
    let file = File::open(path)?;
    from_reader(file, opts)
}

pub fn parse_csv(text: &str, opts: &CsvOptions) -> Result<Table> {
    from_reader(text.as_bytes(), opts)
}

fn from_reader<R: Read>(reader: R, opts: &CsvOptions) -> Result<Table> {
    if !opts.has_headers && opts.headers.is_none() {
        return Err(Error::Schema("must specify headers".into()));
    }

    let mut rdr = csv_crate::ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();
    let raw = match &opts.headers {
        Some(headers) => {
            let rows = records
                .map(|r| r.map(|rec| rec.iter().map(detect).collect()))
                .collect::<std::result::Result<Vec<Vec<Scalar>>, _>>()?;
            RawTable::with_headers(headers.clone(), rows)?
        }
        None => {
            let header: Vec<String> = match records.next() {
                Some(rec) => rec?.iter().map(String::from).collect(),
                None => Vec::new(),
            };
            let rows = records
                .map(|r| r.map(|rec| rec.iter().map(detect).collect()))
                .collect::<std::result::Result<Vec<Vec<Scalar>>, _>>()?;
            RawTable::new(header, rows)
        }
    };
    tracing::trace!(columns = raw.names().len(), rows = raw.num_rows(), "parsed csv");

    raw.with_types(opts.types.clone()).into_table()
}

/// Numeric detection for a single field.
fn detect(field: &str) -> Scalar {
    if field.is_empty() {
        return Scalar::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Scalar::Int(i);
    }
    // f64 parsing also accepts words like "inf" and "NaN"
    if field.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(x) = field.parse::<f64>() {
            return Scalar::Float(x);
        }
    }
    Scalar::Str(field.to_string())
}
