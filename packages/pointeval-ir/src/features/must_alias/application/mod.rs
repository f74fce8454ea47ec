pub mod must_alias;

pub use must_alias::MustAlias;
