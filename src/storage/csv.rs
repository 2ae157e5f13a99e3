//! CSV export for benchmark results.

use std::io::Write;
use std::path::Path;

use crate::core::schema::BenchmarkResult;
use crate::{BenchError, BenchResult};

/// CSV column headers in deterministic order.
pub const CSV_HEADERS: &[&str] = &[
    "program",
    "input",
    "runs",
    "min_ms",
    "max_ms",
    "median_ms",
    "mean_ms",
    "stddev_ms",
    "samples_ms",
];

/// CSV exporter for a finished result set.
///
/// One row per cell, in result order. Summary columns are blank for an empty
/// cell. Raw samples are joined with `;` in the last column.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        CsvExporter
    }

    /// Export results to a CSV file, creating parent directories.
    pub fn export(&self, results: &[BenchmarkResult], output: &Path) -> BenchResult<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BenchError::io("failed to create directory", parent, e))?;
            }
        }

        let file = std::fs::File::create(output)
            .map_err(|e| BenchError::io("failed to create file", output, e))?;

        self.export_to_writer(results, file)
    }

    /// Export results to any writer implementing Write.
    pub fn export_to_writer<W: Write>(
        &self,
        results: &[BenchmarkResult],
        writer: W,
    ) -> BenchResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(CSV_HEADERS)
            .map_err(|e| BenchError::Message(format!("failed to write CSV headers: {e}")))?;

        for result in results {
            csv_writer
                .write_record(&self.result_to_row(result))
                .map_err(|e| BenchError::Message(format!("failed to write CSV row: {e}")))?;
        }

        csv_writer
            .flush()
            .map_err(|e| BenchError::Message(format!("failed to flush CSV writer: {e}")))?;

        Ok(())
    }

    fn result_to_row(&self, result: &BenchmarkResult) -> Vec<String> {
        let summary = result.summary();
        let stat = |f: fn(&crate::core::SummaryStatistics) -> f64| {
            summary
                .as_ref()
                .map(|s| format!("{:.3}", f(s)))
                .unwrap_or_default()
        };
        let samples = result
            .times_ms()
            .iter()
            .map(|ms| format!("{ms:.3}"))
            .collect::<Vec<_>>()
            .join(";");

        vec![
            result.program.clone(),
            result.input.to_string(),
            result.len().to_string(),
            stat(|s| s.min_ms),
            stat(|s| s.max_ms),
            stat(|s| s.median_ms),
            stat(|s| s.mean_ms),
            stat(|s| s.stddev_ms),
            samples,
        ]
    }
}
