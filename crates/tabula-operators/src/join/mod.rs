//! Equality joins between two tables.

pub mod hash;

pub use hash::{HashJoin, JoinOn, JoinType};
