//! Build step: compile every registered program before benchmarking.

use tracing::{debug, info};

use crate::core::ProgramAdapter;
use crate::process::ProcessRunner;
use crate::{BenchError, BenchResult};

/// Build each program in registration order, stopping at the first failure.
pub fn build_all(programs: &[ProgramAdapter], runner: &dyn ProcessRunner) -> BenchResult<()> {
    for program in programs {
        build_program(program, runner)?;
    }
    Ok(())
}

/// Run one program's build command in its working directory.
///
/// A program with an empty build command is treated as prebuilt.
pub fn build_program(program: &ProgramAdapter, runner: &dyn ProcessRunner) -> BenchResult<()> {
    let Some(command) = program.build_command() else {
        debug!(program = program.name(), "no build command, skipping");
        return Ok(());
    };

    println!("[BUILD] {} ...", program.name());
    let outcome = runner.run(&command, program.workdir())?;
    if !outcome.is_success() {
        return Err(BenchError::BuildFailure {
            program: program.name().to_string(),
            command: command.display_line(),
            outcome,
        });
    }
    info!(program = program.name(), "built");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::process::{ExecutionOutcome, ScriptedRunner};

    fn programs() -> Vec<ProgramAdapter> {
        vec![
            ProgramAdapter::new(
                "rust",
                "/bench/rs",
                vec!["cargo".into(), "build".into(), "--release".into()],
                "target/release/main",
            ),
            ProgramAdapter::new("c", "/bench/c", Vec::new(), "fft"),
            ProgramAdapter::new(
                "go",
                "/bench/go",
                vec!["go".into(), "build".into()],
                "main",
            ),
        ]
    }

    #[test]
    fn test_build_all_in_registration_order() {
        let runner = ScriptedRunner::always(ExecutionOutcome::success(""));
        build_all(&programs(), &runner).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2, "prebuilt program must not be built");
        assert_eq!(calls[0].command.display_line(), "cargo build --release");
        assert_eq!(calls[0].workdir, PathBuf::from("/bench/rs"));
        assert_eq!(calls[1].command.display_line(), "go build");
        assert_eq!(calls[1].workdir, PathBuf::from("/bench/go"));
    }

    #[test]
    fn test_build_failure_stops_immediately() {
        let runner = ScriptedRunner::new(|cmd, _| {
            if cmd.program == PathBuf::from("cargo") {
                ExecutionOutcome::new(Some(101), "compiling", "error[E0308]: mismatched types")
            } else {
                ExecutionOutcome::success("")
            }
        });

        let err = build_all(&programs(), &runner).unwrap_err();
        assert_eq!(runner.call_count(), 1, "no builds after the failing one");
        match err {
            BenchError::BuildFailure {
                program,
                command,
                outcome,
            } => {
                assert_eq!(program, "rust");
                assert_eq!(command, "cargo build --release");
                assert_eq!(outcome.stdout, "compiling");
                assert!(outcome.stderr.contains("E0308"));
            }
            other => panic!("expected BuildFailure, got {other:?}"),
        }
    }
}
