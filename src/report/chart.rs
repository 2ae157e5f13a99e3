//! Line chart of average execution time per input size.
//!
//! The chart is plain SVG text with no scripts or external assets. Output is
//! byte-for-byte deterministic for a given result set.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::core::BenchmarkResult;

/// Renders a finished result set to an image file.
pub trait ChartRenderer {
    fn render_to(&self, results: &[BenchmarkResult], output: &Path) -> anyhow::Result<()>;
}

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const PAD_L: f64 = 70.0;
const PAD_R: f64 = 130.0;
const PAD_T: f64 = 40.0;
const PAD_B: f64 = 50.0;

const PALETTE: &[&str] = &[
    "#e45756", "#4c78a8", "#54a24b", "#f58518", "#b279a2", "#72b7b2", "#eeca3b", "#9d755d",
];
const DASHES: &[&str] = &["", "6 3", "2 3", "8 3 2 3"];

/// SVG line chart, one polyline per program sorted by name.
#[derive(Debug, Clone)]
pub struct SvgLineChart {
    pub title: String,
}

impl Default for SvgLineChart {
    fn default() -> Self {
        SvgLineChart {
            title: "FFT Benchmark: Average Time by Input Size".to_string(),
        }
    }
}

/// Averages keyed by program, then input. Empty cells are skipped.
fn collect_averages(results: &[BenchmarkResult]) -> BTreeMap<&str, BTreeMap<u32, f64>> {
    let mut data: BTreeMap<&str, BTreeMap<u32, f64>> = BTreeMap::new();
    for result in results {
        if let Some(summary) = result.summary() {
            data.entry(result.program.as_str())
                .or_default()
                .insert(result.input, summary.mean_ms);
        }
    }
    data
}

/// Escape text for SVG content and attribute values.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl SvgLineChart {
    pub fn new(title: impl Into<String>) -> Self {
        SvgLineChart {
            title: title.into(),
        }
    }

    /// Render the chart as an SVG document.
    pub fn render_svg(&self, results: &[BenchmarkResult]) -> String {
        let data = collect_averages(results);
        let inputs: BTreeSet<u32> = data.values().flat_map(|m| m.keys().copied()).collect();

        let mut svg = String::with_capacity(8 * 1024);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="monospace">"#
        );
        let _ = writeln!(
            svg,
            r##"<rect x="0" y="0" width="{WIDTH}" height="{HEIGHT}" fill="#ffffff"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            WIDTH / 2.0,
            escape_xml(&self.title)
        );

        let plot_w = WIDTH - PAD_L - PAD_R;
        let plot_h = HEIGHT - PAD_T - PAD_B;
        let bottom = HEIGHT - PAD_B;

        // Axes
        let _ = writeln!(
            svg,
            r##"<line x1="{PAD_L}" y1="{bottom}" x2="{:.2}" y2="{bottom}" stroke="#333333" stroke-width="1"/>"##,
            PAD_L + plot_w
        );
        let _ = writeln!(
            svg,
            r##"<line x1="{PAD_L}" y1="{PAD_T}" x2="{PAD_L}" y2="{bottom}" stroke="#333333" stroke-width="1"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="12">log2(input_size)</text>"#,
            PAD_L + plot_w / 2.0,
            HEIGHT - 10.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{:.2}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {:.2})">Average time (ms)</text>"#,
            PAD_T + plot_h / 2.0,
            PAD_T + plot_h / 2.0
        );

        let (Some(&x_min), Some(&x_max)) = (inputs.first(), inputs.last()) else {
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="12">No data</text>"#,
                PAD_L + plot_w / 2.0,
                PAD_T + plot_h / 2.0
            );
            svg.push_str("</svg>\n");
            return svg;
        };

        let y_max = data
            .values()
            .flat_map(|m| m.values().copied())
            .fold(0.0_f64, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let scale_x = |input: u32| {
            if x_max == x_min {
                PAD_L + plot_w / 2.0
            } else {
                PAD_L + f64::from(input - x_min) / f64::from(x_max - x_min) * plot_w
            }
        };
        let scale_y = |ms: f64| bottom - (ms / y_max) * plot_h;

        // X ticks at each measured input size
        for &input in &inputs {
            let x = scale_x(input);
            let _ = writeln!(
                svg,
                r##"<line x1="{x:.2}" y1="{PAD_T}" x2="{x:.2}" y2="{bottom}" stroke="#dddddd" stroke-dasharray="4 4"/>"##
            );
            let _ = writeln!(
                svg,
                r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle" font-size="10">{input}</text>"#,
                bottom + 16.0
            );
        }

        // Y ticks: 0, half, max
        for value in [0.0, y_max / 2.0, y_max] {
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="end" font-size="10">{value:.1}</text>"#,
                PAD_L - 6.0,
                scale_y(value) + 4.0
            );
        }

        for (idx, (program, points)) in data.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            let dash = DASHES[idx % DASHES.len()];
            let name = escape_xml(program);

            let coords: Vec<String> = points
                .iter()
                .map(|(&input, &ms)| format!("{:.2},{:.2}", scale_x(input), scale_y(ms)))
                .collect();
            let dash_attr = if dash.is_empty() {
                String::new()
            } else {
                format!(r#" stroke-dasharray="{dash}""#)
            };
            let _ = writeln!(
                svg,
                r#"<polyline data-program="{name}" points="{}" fill="none" stroke="{color}" stroke-width="1.5"{dash_attr}/>"#,
                coords.join(" ")
            );
            for (&input, &ms) in points {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{color}"/>"#,
                    scale_x(input),
                    scale_y(ms)
                );
            }

            // Legend
            let ly = PAD_T + 10.0 + idx as f64 * 18.0;
            let lx = WIDTH - PAD_R + 12.0;
            let _ = writeln!(
                svg,
                r#"<line x1="{lx:.2}" y1="{ly:.2}" x2="{:.2}" y2="{ly:.2}" stroke="{color}" stroke-width="2"{dash_attr}/>"#,
                lx + 20.0
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-size="11">{name}</text>"#,
                lx + 26.0,
                ly + 4.0
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl ChartRenderer for SvgLineChart {
    fn render_to(&self, results: &[BenchmarkResult], output: &Path) -> anyhow::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        fs::write(output, self.render_svg(results))
            .with_context(|| format!("failed to write chart to {}", output.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(program: &str, input: u32, samples: &[f64]) -> BenchmarkResult {
        let mut result = BenchmarkResult::new(program, input);
        for (i, ms) in samples.iter().enumerate() {
            result.record(i, *ms);
        }
        result
    }

    fn sample_results() -> Vec<BenchmarkResult> {
        vec![
            cell("rust", 18, &[10.0, 12.0]),
            cell("go", 18, &[20.0]),
            cell("rust", 20, &[40.0]),
            cell("go", 20, &[80.0]),
        ]
    }

    #[test]
    fn test_chart_is_deterministic() {
        let chart = SvgLineChart::default();
        let a = chart.render_svg(&sample_results());
        let b = chart.render_svg(&sample_results());
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_one_polyline_per_program_sorted() {
        let svg = SvgLineChart::default().render_svg(&sample_results());
        assert_eq!(svg.matches("<polyline").count(), 2);

        let go = svg.find(r#"data-program="go""#).unwrap();
        let rust = svg.find(r#"data-program="rust""#).unwrap();
        assert!(go < rust);
        assert!(svg.contains("log2(input_size)"));
    }

    #[test]
    fn test_empty_cells_are_not_plotted() {
        let results = vec![cell("rust", 18, &[1.0]), cell("zig", 18, &[])];
        let svg = SvgLineChart::default().render_svg(&results);
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(!svg.contains("zig"));
    }

    #[test]
    fn test_program_names_are_escaped() {
        let results = vec![cell("c<&>", 18, &[1.0])];
        let svg = SvgLineChart::default().render_svg(&results);
        assert!(svg.contains("c&lt;&amp;&gt;"));
        assert!(!svg.contains("c<&>"));
    }

    #[test]
    fn test_empty_result_set() {
        let svg = SvgLineChart::default().render_svg(&[]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("No data"));
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("charts/bench_avg.svg");
        SvgLineChart::default()
            .render_to(&sample_results(), &output)
            .unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, SvgLineChart::default().render_svg(&sample_results()));
    }
}
