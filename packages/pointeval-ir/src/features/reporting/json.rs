//! JSON report generation

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::shared::models::Result;

use super::record::BenchmarkRow;

pub struct JsonReporter;

impl JsonReporter {
    pub fn save<T: Serialize>(rows: &[BenchmarkRow<T>], path: &Path) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(rows)?;
        std::fs::write(path, json)?;
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::precision::ClassHierarchyPrecisionResult;
    use tempfile::TempDir;

    #[test]
    fn test_save_flattens_result_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("soot-cha-results-1cs.json");
        let rows = vec![BenchmarkRow::new(
            "batik",
            ClassHierarchyPrecisionResult {
                ex_type: 1,
                ex_vars: 0,
                ex_heap_objs: 0,
                heap_objs: 10,
                variables: 5,
                precision: 2.0,
                precision_prev: 2.0,
                ex_vars_types: Default::default(),
            },
        )];
        JsonReporter::save(&rows, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["benchmark"], "batik");
        assert_eq!(value[0]["heap_objs"], 10);
    }
}
