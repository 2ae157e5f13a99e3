//! Engine module: builds, verifies and times the registered programs.
//!
//! # Architecture
//!
//! - **build**: compiles every program in registration order before any timing.
//! - **verify**: the producer/consumer differential check over an artifact file.
//! - **workflow**: the benchmark loop that composes both and collects samples.
//!
//! Every subprocess goes through a `crate::process::ProcessRunner`, so the
//! whole engine can be driven by `ScriptedRunner` in tests.

pub mod build;
pub mod verify;
pub mod workflow;

// Re-export key types for convenience
pub use build::{build_all, build_program};
pub use verify::{VerificationPlan, Verifier, artifact_path};
pub use workflow::{run_benchmarks, run_cell, run_once};
