//! A program under test and the commands used to build and invoke it.

use std::path::{Path, PathBuf};

use crate::process::CommandSpec;

/// One registered program under test.
///
/// Built once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAdapter {
    name: String,
    workdir: PathBuf,
    build_argv: Vec<String>,
    exe_path: PathBuf,
}

impl ProgramAdapter {
    /// Create an adapter.
    ///
    /// # Arguments
    /// * `name` - Identity shown in progress output and the report
    /// * `workdir` - Directory the build and every run execute in
    /// * `build_argv` - Build command as an argument vector (empty for none)
    /// * `exe_path` - Built executable, relative to `workdir`
    pub fn new(
        name: impl Into<String>,
        workdir: impl Into<PathBuf>,
        build_argv: Vec<String>,
        exe_path: impl Into<PathBuf>,
    ) -> Self {
        ProgramAdapter {
            name: name.into(),
            workdir: workdir.into(),
            build_argv,
            exe_path: exe_path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn build_argv(&self) -> &[String] {
        &self.build_argv
    }

    pub fn exe_path(&self) -> &Path {
        &self.exe_path
    }

    /// Build command, or `None` when there is nothing to build.
    pub fn build_command(&self) -> Option<CommandSpec> {
        CommandSpec::from_argv(&self.build_argv)
    }

    /// Full path of the built executable.
    pub fn executable(&self) -> PathBuf {
        self.workdir.join(&self.exe_path)
    }

    /// Timed invocation: the input size is the only argument.
    pub fn timed_command(&self, input: u32) -> CommandSpec {
        CommandSpec::new(self.executable()).arg(input.to_string())
    }

    /// Verification invocation: input size followed by the artifact path.
    pub fn verify_command(&self, input: u32, artifact: &Path) -> CommandSpec {
        CommandSpec::new(self.executable())
            .arg(input.to_string())
            .arg(artifact.to_string_lossy())
    }
}
