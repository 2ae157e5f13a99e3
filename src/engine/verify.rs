//! Differential verification of the designated producer/consumer pair.
//!
//! A step runs the producer with `[input, artifact]` so it writes its result to
//! the artifact, then runs the consumer with the same arguments. The consumer
//! recomputes, compares, and reports agreement through its exit status. Any
//! failure in either half is fatal.

use std::path::{Path, PathBuf};

use tracing::{debug, info_span};

use crate::bench::config::{BenchConfig, ProgramRegistry, VerifyMode, absolutize};
use crate::core::ProgramAdapter;
use crate::process::ProcessRunner;
use crate::{BenchError, BenchResult};

/// Artifact path for `input` inside `dir`, made absolute.
///
/// Producer and consumer run in different working directories, so the path
/// handed to them must not be relative.
pub fn artifact_path(dir: &Path, input: u32) -> PathBuf {
    absolutize(dir).join(format!("fft_{input}.out"))
}

/// Verification settings resolved for one harness run.
#[derive(Debug, Clone)]
pub struct VerificationPlan<'a> {
    producer: &'a ProgramAdapter,
    consumer: &'a ProgramAdapter,
    dir: PathBuf,
    mode: VerifyMode,
}

impl<'a> VerificationPlan<'a> {
    /// Resolve the pair and create the artifact directory.
    ///
    /// Returns `None` when verification is off.
    pub fn prepare(registry: &'a ProgramRegistry, config: &BenchConfig) -> BenchResult<Option<Self>> {
        let mode = config.verify_mode();
        if mode == VerifyMode::Off {
            return Ok(None);
        }

        let (producer, consumer) = registry.verification_pair()?;
        let dir = absolutize(&config.verify_dir);
        std::fs::create_dir_all(&dir)
            .map_err(|e| BenchError::io("failed to create verification directory", &dir, e))?;

        Ok(Some(VerificationPlan {
            producer,
            consumer,
            dir,
            mode,
        }))
    }

    pub fn mode(&self) -> VerifyMode {
        self.mode
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn producer(&self) -> &'a ProgramAdapter {
        self.producer
    }

    pub fn consumer(&self) -> &'a ProgramAdapter {
        self.consumer
    }

    /// True when `program` is the consumer whose every repetition is checked.
    pub fn checks_each_run_of(&self, program: &ProgramAdapter) -> bool {
        self.mode == VerifyMode::PerRun && program.name() == self.consumer.name()
    }

    /// Verifier bound to `input`.
    pub fn verifier(&self, input: u32) -> Verifier<'a> {
        Verifier {
            producer: self.producer,
            consumer: self.consumer,
            input,
            artifact: artifact_path(&self.dir, input),
        }
    }
}

/// One input size's verification step.
///
/// The same artifact path is reused, and overwritten by the producer, on every
/// step for this input.
#[derive(Debug, Clone)]
pub struct Verifier<'a> {
    producer: &'a ProgramAdapter,
    consumer: &'a ProgramAdapter,
    input: u32,
    artifact: PathBuf,
}

impl<'a> Verifier<'a> {
    pub fn new(
        producer: &'a ProgramAdapter,
        consumer: &'a ProgramAdapter,
        input: u32,
        artifact: PathBuf,
    ) -> Self {
        Verifier {
            producer,
            consumer,
            input,
            artifact,
        }
    }

    pub fn input(&self) -> u32 {
        self.input
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Run producer then consumer. `repetition` only tags diagnostics.
    pub fn step(&self, runner: &dyn ProcessRunner, repetition: Option<usize>) -> BenchResult<()> {
        let _span = info_span!("verify", input = self.input, repetition = ?repetition).entered();

        match repetition {
            Some(r) => println!(
                "[VERIFY] {} -> {} n={} run={}",
                self.producer.name(),
                self.consumer.name(),
                self.input,
                r
            ),
            None => println!(
                "[VERIFY] {} -> {} n={}",
                self.producer.name(),
                self.consumer.name(),
                self.input
            ),
        }

        let produced = runner.run(
            &self.producer.verify_command(self.input, &self.artifact),
            self.producer.workdir(),
        )?;
        if !produced.is_success() {
            return Err(BenchError::ProducerFailure {
                program: self.producer.name().to_string(),
                input: self.input,
                outcome: produced,
            });
        }

        let checked = runner.run(
            &self.consumer.verify_command(self.input, &self.artifact),
            self.consumer.workdir(),
        )?;
        if !checked.is_success() {
            return Err(BenchError::VerificationFailure {
                program: self.consumer.name().to_string(),
                input: self.input,
                repetition,
                outcome: checked,
            });
        }

        debug!(artifact = %self.artifact.display(), "outputs agree");
        Ok(())
    }
}
