//! Runner trait and the values that flow through it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;

use crate::BenchResult;

/// A command to execute: the program followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Build from an argument vector whose first element is the program.
    ///
    /// Returns `None` for an empty vector.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, rest) = argv.split_first()?;
        Some(CommandSpec {
            program: PathBuf::from(program),
            args: rest.to_vec(),
        })
    }

    /// Shell-quoted command line, as used in logs and diagnostics.
    pub fn display_line(&self) -> String {
        let program = self.program.to_string_lossy();
        let mut words: Vec<&str> = Vec::with_capacity(self.args.len() + 1);
        words.push(program.as_ref());
        words.extend(self.args.iter().map(String::as_str));
        shlex::try_join(words.iter().copied()).unwrap_or_else(|_| words.join(" "))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}

/// Result of running one external command to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Exit code; `None` when the child was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutcome {
    pub fn new(status: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        ExecutionOutcome {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Exit code 0 with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(Some(0), stdout, "")
    }

    /// Non-zero exit with the given stderr.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self::new(Some(code), "", stderr)
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }

    /// stdout and stderr joined by a newline, in that order.
    pub fn combined_output(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        text.push('\n');
        text.push_str(&self.stderr);
        text
    }
}

impl From<Output> for ExecutionOutcome {
    fn from(output: Output) -> Self {
        ExecutionOutcome {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Synchronous command execution.
///
/// Implementations spawn exactly one process per call and block until it
/// terminates. A non-zero exit status is returned as part of the outcome; only
/// adapter faults (spawn failure, timeout) are errors.
pub trait ProcessRunner: Send + Sync {
    /// Run `command` with `workdir` as its working directory.
    fn run(&self, command: &CommandSpec, workdir: &Path) -> BenchResult<ExecutionOutcome>;
}
