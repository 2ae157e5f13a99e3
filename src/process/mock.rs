//! Scripted runner for testing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::BenchResult;

use super::traits::{CommandSpec, ExecutionOutcome, ProcessRunner};

/// One invocation seen by a `ScriptedRunner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: CommandSpec,
    pub workdir: PathBuf,
}

impl RecordedCall {
    /// File name of the invoked program, or the whole program path.
    pub fn program_name(&self) -> String {
        self.command
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.command.program.to_string_lossy().into_owned())
    }
}

type Responder = Box<dyn Fn(&CommandSpec, &Path) -> ExecutionOutcome + Send + Sync>;

/// Runner that never spawns anything.
///
/// Each call is recorded and answered by a responder function, so tests can
/// drive the orchestrator through any sequence of outcomes.
pub struct ScriptedRunner {
    responder: Responder,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    /// Create a runner that answers every call with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CommandSpec, &Path) -> ExecutionOutcome + Send + Sync + 'static,
    {
        ScriptedRunner {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with a clone of `outcome`.
    pub fn always(outcome: ExecutionOutcome) -> Self {
        Self::new(move |_, _| outcome.clone())
    }

    /// Succeed on every call, printing `execution time: <ms> ms`.
    pub fn timing(ms: f64) -> Self {
        Self::always(ExecutionOutcome::success(format!("execution time: {ms} ms\n")))
    }

    /// All calls seen so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &CommandSpec, workdir: &Path) -> BenchResult<ExecutionOutcome> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                command: command.clone(),
                workdir: workdir.to_path_buf(),
            });
        Ok((self.responder)(command, workdir))
    }
}
