#![forbid(unsafe_code)]
//! tabula-io: adapters between tables and the outside world.
//!
//! - `ingest`: the raw column contract every reader produces.
//! - `readers`: CSV text/files into tables (Parquet with `--features parquet`).
//! - `writers`: tables back out to CSV (Parquet with `--features parquet`).
//! - `relational`: materialized query results (names plus row tuples).

pub mod error;
pub mod ingest;
pub mod readers;
pub mod relational;
pub mod writers;

#[cfg(feature = "parquet")]
pub mod arrow_convert;

pub use error::{Error, Result};
pub use ingest::RawTable;
pub use readers::csv::{parse_csv, read_csv, CsvOptions};
pub use relational::from_result;
pub use writers::csv::{to_csv, write_csv};

#[cfg(feature = "parquet")]
pub use readers::parquet::{parse_parquet, read_parquet};
#[cfg(feature = "parquet")]
pub use writers::parquet::{to_parquet, write_parquet};
