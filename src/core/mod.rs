//! Core types for fft-bench.
//!
//! Program adapters, per-cell benchmark results, summary statistics and the
//! exported record schema.

pub mod adapter;
pub mod env;
pub mod schema;
pub mod stats;

// Re-export key types for convenience
pub use adapter::ProgramAdapter;
pub use env::EnvironmentInfo;
pub use schema::{BenchRecord, BenchmarkResult, RunConfig, SCHEMA_VERSION, TimingSample};
pub use stats::SummaryStatistics;
