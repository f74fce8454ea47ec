pub mod results;

pub use results::{ClassHierarchyPrecisionResult, IrPrecisionResult};
