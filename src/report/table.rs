//! Fixed-width summary table for the terminal.

use std::fmt::Write;

use crate::core::BenchmarkResult;

const RULE_WIDTH: usize = 72;

/// `{:8.3} ms`
pub fn format_ms(ms: f64) -> String {
    format!("{ms:8.3} ms")
}

/// Render the summary table.
///
/// Rows keep the order of `results`. A `-` separator precedes every printed
/// row whose input size differs from the previous printed row. Cells with no
/// samples are skipped.
pub fn render_table(results: &[BenchmarkResult]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let header = format!(
        "{:20} {:>7} {:>6} {:>12} {:>12} {:>12} {:>12}",
        "Program", "Input", "Runs", "Fastest", "Slowest", "Median", "Average"
    );
    let separator = "-".repeat(header.len());

    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Benchmark Summary (execution time in ms)");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{separator}");

    let mut last_input = None;
    for result in results {
        let Some(summary) = result.summary() else {
            continue;
        };
        if last_input.is_some_and(|prev| prev != result.input) {
            let _ = writeln!(out, "{separator}");
        }
        last_input = Some(result.input);

        let _ = writeln!(
            out,
            "{:20} {:7} {:6} {:>12} {:>12} {:>12} {:>12}",
            result.program,
            result.input,
            summary.count,
            format_ms(summary.min_ms),
            format_ms(summary.max_ms),
            format_ms(summary.median_ms),
            format_ms(summary.mean_ms),
        );
    }

    let _ = writeln!(out, "{rule}");
    out
}

/// Print the table to stdout, framed by blank lines.
pub fn print_table(results: &[BenchmarkResult]) {
    println!();
    print!("{}", render_table(results));
    println!();
}
