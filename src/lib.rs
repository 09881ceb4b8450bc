#![forbid(unsafe_code)]
//! tabula: an in-memory columnar table engine.
//!
//! This crate ties the workspace together:
//! - [`tabula_core`]: element types, columns, and tables.
//! - [`tabula_operators`]: grouping and joins.
//! - [`tabula_io`]: CSV, Parquet, and relational-row adapters.
//!
//! Most code only needs `use tabula::prelude::*;`.

pub use tabula_core;
pub use tabula_io;
pub use tabula_operators;

pub use tabula_core::{col, table};

pub mod prelude {
    pub use tabula_core::prelude::*;
    pub use tabula_io::{from_result, parse_csv, read_csv, to_csv, write_csv, CsvOptions, RawTable};
    pub use tabula_operators::{AggFunc, Group, HashJoin, JoinOn, JoinType, OpError, TableExt};

    #[cfg(feature = "parquet")]
    pub use tabula_io::{parse_parquet, read_parquet, to_parquet, write_parquet};
}
