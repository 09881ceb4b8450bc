#![forbid(unsafe_code)]
//! tabula-operators: grouping and join engines over `tabula-core` tables.
//!
//! Both engines are synchronous and single-threaded. They log partition and
//! index sizes through `tracing` at `debug` level; no subscriber is installed
//! here.

pub mod aggregate;
pub mod group;
pub mod join;
pub mod traits;

pub use aggregate::AggFunc;
pub use group::Group;
pub use join::{HashJoin, JoinOn, JoinType};
pub use traits::{OpError, TableExt};
