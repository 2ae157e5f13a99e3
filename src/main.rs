#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use fft_bench::run_cmd::RunOptions;
use fft_bench::{BenchError, exit_code, list_cmd, run_cmd};

#[derive(Parser, Debug)]
#[command(name = "fft-bench")]
#[command(about = "Build, verify and time FFT implementations across languages", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set FFT_BENCH_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build every program, then time each one at each input size
    Run {
        /// Skip building the programs
        #[arg(long)]
        no_build: bool,
        /// Number of runs per input
        #[arg(long)]
        runs: Option<usize>,
        /// Input sizes (log2 of the transform length)
        #[arg(long, num_args = 0..)]
        inputs: Option<Vec<u32>>,
        /// Cross-check producer and consumer outputs before timing each input
        #[arg(long)]
        verify: bool,
        /// Verify before every timed run of the consumer
        #[arg(long, requires = "verify")]
        verify_per_run: bool,
        /// Directory for verification artifacts
        #[arg(long)]
        verify_dir: Option<PathBuf>,
        /// Per-invocation timeout in seconds (0 disables)
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Path to bench-config.toml
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the average-time chart to this SVG file
        #[arg(long, conflicts_with = "no_chart")]
        chart: Option<PathBuf>,
        /// Do not write a chart
        #[arg(long)]
        no_chart: bool,
        /// Append one JSON record per cell to this file
        #[arg(long)]
        jsonl: Option<PathBuf>,
        /// Write a CSV summary to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List registered programs
    List {
        /// Path to bench-config.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("FFT_BENCH_LOG").unwrap_or_else(|_| {
        if verbose { "fft_bench=debug".to_string() } else { "fft_bench=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn report_error(e: &BenchError) {
    eprintln!("[ERROR] {e}");
    if let Some(command) = e.command() {
        eprintln!("Command: {command}");
    }
    if let Some(outcome) = e.outcome() {
        if !outcome.stdout.is_empty() {
            eprintln!("Output:");
            eprintln!("{}", outcome.stdout);
        }
        if !outcome.stderr.is_empty() {
            eprintln!("{}", outcome.stderr);
        }
    }
}

fn main() {
    color_eyre::install().ok();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // usage errors share the harness exit code; --help and --version succeed
            let code = if e.use_stderr() { exit_code::HARNESS_ERROR } else { exit_code::SUCCESS };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            no_build,
            runs,
            inputs,
            verify,
            verify_per_run,
            verify_dir,
            timeout,
            config,
            chart,
            no_chart,
            jsonl,
            csv,
        } => run_cmd::run(RunOptions {
            no_build,
            runs,
            inputs,
            verify,
            verify_per_run,
            verify_dir,
            timeout_secs: timeout,
            config,
            chart,
            no_chart,
            jsonl,
            csv,
            verbose: cli.verbose,
        })
        .map(|_| ()),
        Commands::List { config } => list_cmd::list(config),
    };

    match result {
        Ok(()) => std::process::exit(exit_code::SUCCESS),
        Err(e) => {
            report_error(&e);
            std::process::exit(e.exit_code());
        }
    }
}
