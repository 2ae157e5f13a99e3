//! Runner backed by `std::process::Command`.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::{BenchError, BenchResult};

use super::traits::{CommandSpec, ExecutionOutcome, ProcessRunner};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs commands as real child processes.
///
/// Without a timeout the runner blocks on `Command::output`. With one, the
/// child's pipes are drained on helper threads while this thread polls for exit,
/// and a child that overruns is killed. The same deadline bounds the wait for
/// the pipes to close: a background process that inherited them turns a clean
/// exit into a timeout, and its drain thread is left to finish on its own.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-invocation timeout. `None` or a zero duration disables it.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn command(spec: &CommandSpec, workdir: &Path) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn wait_with_timeout(
        mut child: Child,
        spec: &CommandSpec,
        timeout: Duration,
    ) -> BenchResult<Output> {
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        let deadline = Instant::now() + timeout;
        let timed_out = || BenchError::Timeout {
            command: spec.display_line(),
            timeout,
        };

        loop {
            let polled = child
                .try_wait()
                .map_err(|e| BenchError::Message(format!("failed to wait on `{spec}`: {e}")))?;
            if let Some(status) = polled {
                let stdout = collect(stdout, deadline).ok_or_else(timed_out)?;
                let stderr = collect(stderr, deadline).ok_or_else(timed_out)?;
                return Ok(Output {
                    status,
                    stdout,
                    stderr,
                });
            }

            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(timed_out());
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

/// Captured bytes, or `None` if the pipe is still open at `deadline`.
fn collect(rx: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<Vec<u8>> {
    let Some(rx) = rx else {
        return Some(Vec::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, workdir: &Path) -> BenchResult<ExecutionOutcome> {
        debug!(command = %spec, workdir = %workdir.display(), "exec");

        let mut cmd = Self::command(spec, workdir);
        let spawn_err = |source| BenchError::Spawn {
            command: spec.display_line(),
            source,
        };

        let output = match self.timeout {
            None => cmd.output().map_err(spawn_err)?,
            Some(timeout) => {
                let child = cmd.spawn().map_err(spawn_err)?;
                Self::wait_with_timeout(child, spec, timeout)?
            }
        };

        let outcome = ExecutionOutcome::from(output);
        debug!(status = ?outcome.status, "exited");
        Ok(outcome)
    }
}
