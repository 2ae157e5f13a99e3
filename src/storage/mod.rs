//! Storage layer for benchmark results.
//!
//! JSONL records for appending across runs, and a flat CSV of one result set.

pub mod csv;
pub mod jsonl;

// Re-export key types
pub use csv::{CSV_HEADERS, CsvExporter};
pub use jsonl::JsonlWriter;
