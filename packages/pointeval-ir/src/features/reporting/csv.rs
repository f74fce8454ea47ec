//! CSV report generation

use std::path::{Path, PathBuf};

use crate::shared::models::Result;

use super::record::{BenchmarkRow, ReportRecord};

pub struct CsvReporter;

impl CsvReporter {
    pub fn save<T: ReportRecord>(rows: &[BenchmarkRow<T>], path: &Path) -> Result<PathBuf> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(BenchmarkRow::<T>::header())?;
        for row in rows {
            writer.write_record(row.fields())?;
        }
        writer.flush()?;
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::precision::IrPrecisionResult;
    use tempfile::TempDir;

    #[test]
    fn test_save_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("soot-ir-results-1cs.csv");
        let rows = vec![BenchmarkRow::new(
            "avrora",
            IrPrecisionResult {
                interesting_types: 1,
                relevant_vars: 2,
                relevant_heap_objects: 3,
                vars: 4,
                heap_objects: 5,
                precision_ir: 1.5,
                precision_actual: 1.25,
                nb_virtual_calls: 2,
            },
        )];
        CsvReporter::save(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("benchmark,interesting_types"));
        assert_eq!(lines.next().unwrap(), "avrora,1,2,3,4,5,1.5,1.25,2");
    }
}
