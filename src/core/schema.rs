//! Benchmark results and the exported record schema.

use serde::{Deserialize, Serialize};

use crate::bench::config::VerifyMode;

use super::env::EnvironmentInfo;
use super::stats::SummaryStatistics;

/// Schema version for forward compatibility
pub const SCHEMA_VERSION: u32 = 1;

/// One extracted duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSample {
    pub repetition: usize,
    pub ms: f64,
}

/// All samples gathered for one (program, input size) cell.
///
/// Samples are kept in repetition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub program: String,
    pub input: u32,
    samples: Vec<TimingSample>,
}

impl BenchmarkResult {
    pub fn new(program: impl Into<String>, input: u32) -> Self {
        BenchmarkResult {
            program: program.into(),
            input,
            samples: Vec::new(),
        }
    }

    /// Append the duration measured for `repetition`.
    pub fn record(&mut self, repetition: usize, ms: f64) {
        self.samples.push(TimingSample { repetition, ms });
    }

    pub fn samples(&self) -> &[TimingSample] {
        &self.samples
    }

    pub fn times_ms(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.ms).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Summary statistics, absent for an empty cell.
    pub fn summary(&self) -> Option<SummaryStatistics> {
        SummaryStatistics::from_samples(&self.times_ms())
    }
}

/// Run configuration recorded alongside each exported cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub runs: usize,
    pub verify_mode: VerifyMode,
}

/// Exported form of one finished cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRecord {
    /// Schema version for forward compatibility
    pub schema_version: u32,

    /// ISO 8601 timestamp
    pub timestamp: String,

    pub program: String,

    pub input: u32,

    /// Raw samples in repetition order
    pub times_ms: Vec<f64>,

    pub summary: SummaryStatistics,

    pub config: RunConfig,

    /// Environment information (CPU, OS, git, etc.)
    pub env: EnvironmentInfo,
}

impl BenchRecord {
    /// Build a record from a finished cell; `None` for an empty cell.
    pub fn from_result(
        result: &BenchmarkResult,
        timestamp: impl Into<String>,
        config: RunConfig,
        env: EnvironmentInfo,
    ) -> Option<Self> {
        let summary = result.summary()?;
        Some(BenchRecord {
            schema_version: SCHEMA_VERSION,
            timestamp: timestamp.into(),
            program: result.program.clone(),
            input: result.input,
            times_ms: result.times_ms(),
            summary,
            config,
            env,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_records_in_order() {
        let mut result = BenchmarkResult::new("rust", 18);
        result.record(0, 3.0);
        result.record(1, 1.0);
        result.record(2, 2.0);

        assert_eq!(result.len(), 3);
        assert_eq!(result.times_ms(), vec![3.0, 1.0, 2.0]);
        assert_eq!(result.samples()[1], TimingSample { repetition: 1, ms: 1.0 });

        let summary = result.summary().unwrap();
        assert_eq!(summary.median_ms, 2.0);
    }

    #[test]
    fn test_empty_result_has_no_summary() {
        let result = BenchmarkResult::new("go", 20);
        assert!(result.is_empty());
        assert!(result.summary().is_none());
    }

    #[test]
    fn test_record_from_empty_result_is_none() {
        let config = RunConfig {
            runs: 0,
            verify_mode: VerifyMode::Off,
        };
        let record = BenchRecord::from_result(
            &BenchmarkResult::new("go", 20),
            "2026-01-01T00:00:00Z",
            config,
            EnvironmentInfo::default(),
        );
        assert!(record.is_none());
    }

    #[test]
    fn test_record_serializes_verify_mode() {
        let mut result = BenchmarkResult::new("rust", 18);
        result.record(0, 5.0);
        let config = RunConfig {
            runs: 1,
            verify_mode: VerifyMode::PerRun,
        };
        let record = BenchRecord::from_result(
            &result,
            "2026-01-01T00:00:00Z",
            config,
            EnvironmentInfo::default(),
        )
        .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["config"]["verify_mode"], "per-run");
        assert_eq!(json["summary"]["count"], 1);
        assert_eq!(json["times_ms"][0], 5.0);
    }
}
