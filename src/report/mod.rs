//! Reporting for a finished result set.
//!
//! This module provides:
//! - the fixed-width summary table printed to stdout
//! - `ChartRenderer` and its SVG line chart of averages

pub mod chart;
pub mod table;

// Re-export key types
pub use chart::{ChartRenderer, SvgLineChart};
pub use table::{format_ms, print_table, render_table};
