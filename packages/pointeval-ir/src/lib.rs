/*
 * Pointeval IR - Pointer-Analysis Precision Evaluation Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (keys, errors, identifier grammar)
 * - features/    : Vertical slices (store → must_alias → precision → reporting)
 *
 * Compares the points-to output of the Soot and Wala IR frontends over
 * the DaCapo benchmarks: must-alias partitions via bitsets + union-find,
 * IR precision over virtual-call receivers, and class-hierarchy
 * precision corrected for IR-exclusive classes.
 */

// Crate-level lint configuration
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

pub mod features;
pub mod shared;

pub use features::must_alias::{HeapSet, HeapUniverse, MustAlias, PointsToMap, UnionFind};
pub use features::precision::{
    ClassHierarchyPrecisionResult, ComputePrecision, IrPrecisionResult,
};
pub use features::reporting::{BenchmarkRow, CsvReporter, JsonReporter, TerminalReporter};
pub use features::store::{Store, VarPointsToTable, VirtualCallTable};
pub use shared::models::{
    ErrorKind, EvalError, HeapObjectKey, Ir, Result, TableKey, VariableKey,
};
