//! `fft-bench run`: resolve configuration, benchmark, then report and export.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::bench::config::{
    BenchConfig, DEFAULT_INPUTS, DEFAULT_RUNS, DEFAULT_VERIFY_DIR, FileDefaults, resolve_config,
};
use crate::core::{BenchRecord, BenchmarkResult, EnvironmentInfo, RunConfig};
use crate::engine::run_benchmarks;
use crate::process::SystemRunner;
use crate::report::{ChartRenderer, SvgLineChart, print_table};
use crate::storage::{CsvExporter, JsonlWriter};
use crate::{BenchResult, now_string};

pub const DEFAULT_CHART: &str = "bench_avg.svg";

/// Options gathered from the command line; `None` falls back to the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub no_build: bool,
    pub runs: Option<usize>,
    pub inputs: Option<Vec<u32>>,
    pub verify: bool,
    pub verify_per_run: bool,
    pub verify_dir: Option<PathBuf>,
    /// Seconds; 0 disables the timeout.
    pub timeout_secs: Option<u64>,
    pub config: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub no_chart: bool,
    pub jsonl: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub verbose: bool,
}

impl RunOptions {
    /// Merge with file defaults: CLI first, then the file, then built-in defaults.
    pub fn to_bench_config(&self, defaults: &FileDefaults) -> BenchConfig {
        let timeout_secs = self.timeout_secs.or(defaults.timeout_secs).unwrap_or(0);
        BenchConfig {
            skip_build: self.no_build,
            runs: self.runs.or(defaults.runs).unwrap_or(DEFAULT_RUNS),
            inputs: self
                .inputs
                .clone()
                .or_else(|| defaults.inputs.clone())
                .unwrap_or_else(|| DEFAULT_INPUTS.to_vec()),
            verify: self.verify,
            verify_per_run: self.verify_per_run,
            verify_dir: self
                .verify_dir
                .clone()
                .or_else(|| defaults.verify_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VERIFY_DIR)),
            verbose: self.verbose,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        }
    }

    fn chart_path(&self) -> Option<PathBuf> {
        if self.no_chart {
            return None;
        }
        Some(self.chart.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CHART)))
    }
}

/// Run the benchmark, print the table, then write the chart and exports.
///
/// Nothing is printed or written when the benchmark itself fails.
pub fn run(opts: RunOptions) -> BenchResult<Vec<BenchmarkResult>> {
    let loaded = resolve_config(opts.config.as_deref())?;
    match &loaded.source {
        Some(path) => info!(config = %path.display(), "loaded configuration"),
        None => info!("no config file, using built-in programs"),
    }

    let config = opts.to_bench_config(&loaded.defaults);
    let run_config = RunConfig {
        runs: config.runs,
        verify_mode: config.verify_mode(),
    };
    let runner = SystemRunner::new().with_timeout(config.timeout);

    let results = run_benchmarks(config, &loaded.registry, &runner)?;

    print_table(&results);

    if let Some(path) = opts.chart_path() {
        SvgLineChart::default().render_to(&results, &path)?;
        println!("[INFO] Saved average line chart to {}", path.display());
    }

    if let Some(path) = &opts.jsonl {
        let timestamp = now_string();
        let env = EnvironmentInfo::detect_for(loaded.registry.programs());
        let records: Vec<BenchRecord> = results
            .iter()
            .filter_map(|r| {
                BenchRecord::from_result(r, timestamp.clone(), run_config.clone(), env.clone())
            })
            .collect();
        JsonlWriter::new(path).append_all(&records)?;
        println!("[INFO] Appended {} records to {}", records.len(), path.display());
    }

    if let Some(path) = &opts.csv {
        CsvExporter::new().export(&results, path)?;
        println!("[INFO] Wrote CSV to {}", path.display());
    }

    Ok(results)
}
