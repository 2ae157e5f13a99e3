//! The benchmark control loop.
//!
//! Loop order is fixed: input sizes (outer), registered programs (middle),
//! repetitions (inner). Every invocation blocks until its process exits, so no
//! two programs under test ever overlap. Any failure aborts the whole run and
//! the results gathered so far are dropped.

use std::collections::HashSet;

use tracing::{debug, info, info_span};

use crate::bench::config::{BenchConfig, ProgramRegistry};
use crate::core::{BenchmarkResult, ProgramAdapter};
use crate::process::ProcessRunner;
use crate::timing::extract_timing;
use crate::{BenchError, BenchResult};

use super::build::build_all;
use super::verify::{VerificationPlan, Verifier};

/// Build, optionally verify, and time every (input, program) cell.
///
/// # Returns
/// One `BenchmarkResult` per cell in input-major, program-minor order, each
/// holding `config.runs` samples.
pub fn run_benchmarks(
    config: BenchConfig,
    registry: &ProgramRegistry,
    runner: &dyn ProcessRunner,
) -> BenchResult<Vec<BenchmarkResult>> {
    if config.verbose {
        println!("[INFO] {}", config.describe());
    }

    // The pair is resolved before anything executes.
    let plan = VerificationPlan::prepare(registry, &config)?;

    if config.skip_build {
        info!("skipping build step");
    } else {
        build_all(registry.programs(), runner)?;
    }

    let mut results = Vec::with_capacity(config.inputs.len() * registry.programs().len());
    let mut verified = HashSet::new();

    for &input in &config.inputs {
        let verifier = plan.as_ref().map(|p| p.verifier(input));

        if let Some(verifier) = &verifier {
            if verified.insert(input) {
                verifier.step(runner, None)?;
            }
        }

        for program in registry.programs() {
            let per_run = match (&plan, &verifier) {
                (Some(plan), Some(verifier)) if plan.checks_each_run_of(program) => Some(verifier),
                _ => None,
            };
            results.push(run_cell(program, input, config.runs, runner, per_run)?);
        }
    }

    Ok(results)
}

/// Time `runs` repetitions of one program at one input size.
///
/// With `per_run` set, a verification step precedes each repetition.
pub fn run_cell(
    program: &ProgramAdapter,
    input: u32,
    runs: usize,
    runner: &dyn ProcessRunner,
    per_run: Option<&Verifier<'_>>,
) -> BenchResult<BenchmarkResult> {
    let _span = info_span!("cell", program = program.name(), input).entered();
    println!("[RUN] {} n={}", program.name(), input);

    let mut result = BenchmarkResult::new(program.name(), input);
    for repetition in 0..runs {
        if let Some(verifier) = per_run {
            verifier.step(runner, Some(repetition))?;
        }
        let ms = run_once(program, input, runner)?;
        result.record(repetition, ms);
    }
    Ok(result)
}

/// One timed invocation: `<exe> <input>`, then extract the reported duration.
pub fn run_once(
    program: &ProgramAdapter,
    input: u32,
    runner: &dyn ProcessRunner,
) -> BenchResult<f64> {
    let outcome = runner.run(&program.timed_command(input), program.workdir())?;
    if !outcome.is_success() {
        return Err(BenchError::RunFailure {
            program: program.name().to_string(),
            input,
            outcome,
        });
    }

    let Some(ms) = extract_timing(&outcome) else {
        return Err(BenchError::ParseFailure {
            program: program.name().to_string(),
            input,
            outcome,
        });
    };
    debug!(ms, "execution time");
    Ok(ms)
}
