#![forbid(unsafe_code)]
//! tabula-core: element types, columns, and tables.
//!
//! Everything here is pure, single-threaded computation over in-memory
//! buffers. There is **no I/O** and **no logging** in this crate; adapters
//! live in `tabula-io` and the grouping/join engines in `tabula-operators`.
//!
//! - `types`: `ElementType` with its coercion rules, and the boxed `Scalar`.
//! - `column`: typed, copy-on-write `Column` with elementwise operators.
//! - `table`: `Table`, an ordered mapping of names to equal-length columns.

pub mod column;
pub mod config;
mod display;
pub mod error;
pub mod prelude;
pub mod table;
pub mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
