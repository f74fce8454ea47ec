//! Must-alias partition of points-to variables
//!
//! Groups every variable of a table into classes whose members point to
//! exactly the same heap objects. Layered as domain (bitsets and the
//! points-to map), infrastructure (union-find), application (the
//! engine).

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::MustAlias;
pub use domain::{HeapSet, HeapUniverse, PointsToMap};
pub use infrastructure::UnionFind;
