pub mod compute;

pub use compute::{select_virtual_call_variables, ComputePrecision};
