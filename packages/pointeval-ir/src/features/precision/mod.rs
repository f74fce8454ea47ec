//! Precision metrics across the two IR frontends
//!
//! Compares the Soot and Wala points-to relations for one benchmark:
//! IR precision over virtual-call receivers in interesting methods, and
//! class-hierarchy precision corrected for IR-exclusive classes.

pub mod application;
pub mod domain;

pub use application::{select_virtual_call_variables, ComputePrecision};
pub use domain::{ClassHierarchyPrecisionResult, IrPrecisionResult};
