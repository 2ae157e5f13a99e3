//! Host and toolchain facts recorded next to exported results.

use std::collections::BTreeMap;
use std::process::Command;

use serde::{Deserialize, Serialize};

use super::adapter::ProgramAdapter;

/// Where a result set was measured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ram_bytes: Option<u64>,

    pub os: String,

    pub arch: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty: Option<bool>,

    /// First line of `<build tool> --version`, keyed by build tool.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub toolchains: BTreeMap<String, String>,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        EnvironmentInfo {
            cpu_model: None,
            cpu_cores: None,
            total_ram_bytes: None,
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            hostname: None,
            git_sha: None,
            git_dirty: None,
            toolchains: BTreeMap::new(),
        }
    }
}

impl EnvironmentInfo {
    /// Host facts only.
    pub fn detect() -> Self {
        use sysinfo::System;

        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        EnvironmentInfo {
            cpu_model: sys.cpus().first().map(|c| c.brand().trim().to_string()),
            cpu_cores: sys.physical_core_count().map(|c| c as u32),
            total_ram_bytes: Some(sys.total_memory()),
            os: System::long_os_version()
                .or_else(System::name)
                .unwrap_or_else(|| std::env::consts::OS.to_string()),
            arch: std::env::consts::ARCH.to_string(),
            hostname: System::host_name(),
            git_sha: git_output(&["rev-parse", "HEAD"]).filter(|s| !s.is_empty()),
            git_dirty: git_output(&["status", "--porcelain"]).map(|s| !s.is_empty()),
            toolchains: BTreeMap::new(),
        }
    }

    /// Host facts plus the version of each program's build tool.
    pub fn detect_for(programs: &[ProgramAdapter]) -> Self {
        let mut env = Self::detect();
        for program in programs {
            let Some(tool) = program.build_argv().first() else {
                continue;
            };
            if env.toolchains.contains_key(tool) {
                continue;
            }
            if let Some(version) = tool_version(tool) {
                env.toolchains.insert(tool.clone(), version);
            }
        }
        env
    }
}

/// Trimmed stdout of a successful `git` invocation.
fn git_output(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
}

/// `--version`, falling back to a `version` subcommand (go, moon).
fn tool_version(tool: &str) -> Option<String> {
    ["--version", "version"].iter().find_map(|flag| {
        Command::new(tool)
            .arg(flag)
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|s| s.lines().next().map(|l| l.trim().to_string()))
            .filter(|l| !l.is_empty())
    })
}
