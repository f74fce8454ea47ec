//! Terminal (pretty-print) report generation
//!
//! Plain-text tables with column widths sized to the data, written
//! either to stdout or into the combined per-analysis results file.

use std::io::Write;

use crate::shared::models::Result;

use super::record::{BenchmarkRow, ReportRecord};

pub struct TerminalReporter;

impl TerminalReporter {
    /// Render rows as an aligned table with a dashed header rule.
    pub fn render<T: ReportRecord>(rows: &[BenchmarkRow<T>]) -> String {
        let header = BenchmarkRow::<T>::header();
        let body: Vec<Vec<String>> = rows.iter().map(|r| r.fields()).collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for row in &body {
            for (i, field) in row.iter().enumerate() {
                widths[i] = widths[i].max(field.len());
            }
        }

        let mut out = String::new();
        for (i, h) in header.into_iter().enumerate() {
            push_cell(&mut out, h, widths[i], i + 1 == widths.len());
        }
        out.push('\n');
        for (i, width) in widths.iter().enumerate() {
            push_cell(&mut out, &"-".repeat(*width), *width, i + 1 == widths.len());
        }
        out.push('\n');
        for row in &body {
            for (i, field) in row.iter().enumerate() {
                push_cell(&mut out, field, widths[i], i + 1 == widths.len());
            }
            out.push('\n');
        }
        out
    }

    /// Write a titled table into an open results file.
    pub fn write_section<T: ReportRecord>(
        mut out: impl Write,
        title: &str,
        rows: &[BenchmarkRow<T>],
    ) -> Result<()> {
        writeln!(out, "\n~~~~~~~~~~~~ {title} ~~~~~~~~~~~~")?;
        out.write_all(Self::render(rows).as_bytes())?;
        Ok(())
    }

    pub fn print<T: ReportRecord>(rows: &[BenchmarkRow<T>]) {
        print!("{}", Self::render(rows));
    }
}

fn push_cell(out: &mut String, text: &str, width: usize, last: bool) {
    if last {
        out.push_str(text);
    } else {
        out.push_str(&format!("{text:<width$}  "));
    }
}
