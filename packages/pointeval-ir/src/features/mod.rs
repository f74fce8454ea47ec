pub mod must_alias;
pub mod precision;
pub mod reporting;
pub mod store;
