//! Relational store over the ingested analysis logs
//!
//! - [`Store`]: the shared SQLite handle
//! - [`VarPointsToTable`]: typed query surface over one (benchmark,
//!   analysis, IR) points-to relation
//! - [`VirtualCallTable`]: receiver variables at dynamically dispatched
//!   call sites, plus externally sourced call-site totals
//! - [`class_inventory`]: exclusive-class set differences
//! - [`ingest`]: TSV log materialization

pub mod class_inventory;
pub mod ingest;
pub mod points_to_table;
pub mod store;
pub mod virtual_calls;

pub use class_inventory::{
    exclusive_classes, exclusive_classes_soot, exclusive_classes_wala, insert_classes,
    is_exclusive_type,
};
pub use points_to_table::VarPointsToTable;
pub use store::Store;
pub use virtual_calls::{record_virtual_call_site_count, virtual_call_site_count, VirtualCallTable};
