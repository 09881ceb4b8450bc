//! Writers: CSV always, Parquet behind the `parquet` feature.

pub mod csv;

#[cfg(feature = "parquet")]
pub mod parquet;
