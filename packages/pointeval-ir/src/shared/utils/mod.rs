//! Utility modules shared across features

pub mod identifiers;

pub use identifiers::{declared_type, enclosing_method, heap_type, type_tag};
