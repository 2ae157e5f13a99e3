//! Run configuration, the program registry and the `bench-config.toml` loader.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shlex::Shlex;

use crate::core::ProgramAdapter;
use crate::{BenchError, BenchResult};

pub const DEFAULT_CONFIG: &str = "bench-config.toml";
pub const DEFAULT_RUNS: usize = 10;
pub const DEFAULT_INPUTS: &[u32] = &[18, 20, 22];
pub const DEFAULT_VERIFY_DIR: &str = "out/verify";

/// When the designated producer/consumer pair is cross-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerifyMode {
    Off,
    /// Once per input size, before any repetitions for it.
    OncePerInput,
    /// Before every timed repetition of the consumer.
    PerRun,
}

/// Immutable configuration for one harness invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Skip the build step (binaries are already built).
    pub skip_build: bool,
    /// Timed repetitions per (program, input) cell.
    pub runs: usize,
    /// Input sizes, in benchmark order.
    pub inputs: Vec<u32>,
    pub verify: bool,
    pub verify_per_run: bool,
    /// Directory holding verification artifacts.
    pub verify_dir: PathBuf,
    /// Print the resolved configuration before running. The tracing filter
    /// is set separately from the same CLI flag.
    pub verbose: bool,
    /// Per-invocation timeout; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            skip_build: false,
            runs: DEFAULT_RUNS,
            inputs: DEFAULT_INPUTS.to_vec(),
            verify: false,
            verify_per_run: false,
            verify_dir: PathBuf::from(DEFAULT_VERIFY_DIR),
            verbose: false,
            timeout: None,
        }
    }
}

impl BenchConfig {
    pub fn verify_mode(&self) -> VerifyMode {
        match (self.verify, self.verify_per_run) {
            (false, _) => VerifyMode::Off,
            (true, false) => VerifyMode::OncePerInput,
            (true, true) => VerifyMode::PerRun,
        }
    }

    /// One-line summary of the resolved settings.
    pub fn describe(&self) -> String {
        let mode = match self.verify_mode() {
            VerifyMode::Off => "off",
            VerifyMode::OncePerInput => "once-per-input",
            VerifyMode::PerRun => "per-run",
        };
        let timeout = self
            .timeout
            .map(|t| format!("{}s", t.as_secs_f64()))
            .unwrap_or_else(|| "none".to_string());
        format!(
            "runs={} inputs={:?} verify={} verify_dir={} timeout={} build={}",
            self.runs,
            self.inputs,
            mode,
            self.verify_dir.display(),
            timeout,
            if self.skip_build { "skip" } else { "yes" }
        )
    }
}

/// Names of the producer and consumer used for differential verification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationPair {
    pub producer: String,
    pub consumer: String,
}

/// Registered programs, in registration order.
#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    programs: Vec<ProgramAdapter>,
    verification: Option<VerificationPair>,
}

impl ProgramRegistry {
    /// Create a registry; names must be non-empty and unique.
    pub fn new(
        programs: Vec<ProgramAdapter>,
        verification: Option<VerificationPair>,
    ) -> BenchResult<Self> {
        let mut seen = HashSet::new();
        for p in &programs {
            if p.name().trim().is_empty() {
                return Err(BenchError::Config("program name must not be empty".into()));
            }
            if !seen.insert(p.name()) {
                return Err(BenchError::Config(format!(
                    "duplicate program name '{}'",
                    p.name()
                )));
            }
        }
        Ok(ProgramRegistry {
            programs,
            verification,
        })
    }

    /// Registry used when no config file is present.
    ///
    /// Working directories are resolved against the current directory.
    pub fn builtin() -> Self {
        let argv = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        let programs = vec![
            ProgramAdapter::new(
                "rust",
                absolutize(Path::new("fft/rs")),
                argv(&["cargo", "build", "--release"]),
                "target/release/main",
            ),
            ProgramAdapter::new(
                "go",
                absolutize(Path::new("fft/go")),
                argv(&["go", "build", "-o", "main", "."]),
                "main",
            ),
            ProgramAdapter::new(
                "moonbit",
                absolutize(Path::new("fft/mbt")),
                argv(&["moon", "build", "--target", "native", "--release"]),
                "target/native/release/build/main/main.exe",
            ),
        ];
        ProgramRegistry {
            programs,
            verification: Some(VerificationPair {
                producer: "go".into(),
                consumer: "rust".into(),
            }),
        }
    }

    pub fn programs(&self) -> &[ProgramAdapter] {
        &self.programs
    }

    pub fn get(&self, name: &str) -> Option<&ProgramAdapter> {
        self.programs.iter().find(|p| p.name() == name)
    }

    pub fn verification(&self) -> Option<&VerificationPair> {
        self.verification.as_ref()
    }

    /// Look up the designated (producer, consumer) adapters.
    pub fn verification_pair(&self) -> BenchResult<(&ProgramAdapter, &ProgramAdapter)> {
        let pair = self.verification.as_ref().ok_or_else(|| {
            BenchError::Config("verification enabled but no [verification] pair configured".into())
        })?;
        if pair.producer == pair.consumer {
            return Err(BenchError::Config(format!(
                "verification producer and consumer must differ (both '{}')",
                pair.producer
            )));
        }
        let lookup = |role: &str, name: &str| {
            self.get(name).ok_or_else(|| {
                BenchError::Config(format!("verification {role} '{name}' is not a registered program"))
            })
        };
        Ok((
            lookup("producer", &pair.producer)?,
            lookup("consumer", &pair.consumer)?,
        ))
    }
}

/// Optional `[defaults]` table; CLI flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileDefaults {
    pub runs: Option<usize>,
    pub inputs: Option<Vec<u32>>,
    pub verify_dir: Option<PathBuf>,
    /// 0 disables the timeout.
    pub timeout_secs: Option<u64>,
}

/// A loaded configuration: where it came from, its registry and its defaults.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub source: Option<PathBuf>,
    pub registry: ProgramRegistry,
    pub defaults: FileDefaults,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBuild {
    Argv(Vec<String>),
    Line(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProgram {
    name: String,
    workdir: PathBuf,
    #[serde(default)]
    build: Option<RawBuild>,
    exe: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    defaults: FileDefaults,
    #[serde(rename = "program", default)]
    programs: Vec<RawProgram>,
    #[serde(default)]
    verification: Option<VerificationPair>,
}

/// Parse config text; relative paths resolve against `base_dir`.
pub fn parse_config(text: &str, base_dir: &Path) -> BenchResult<(ProgramRegistry, FileDefaults)> {
    let raw: RawConfig = toml::from_str(text).map_err(|e| BenchError::Config(e.to_string()))?;
    if raw.programs.is_empty() {
        return Err(BenchError::Config("no [[program]] entries".into()));
    }

    let mut programs = Vec::with_capacity(raw.programs.len());
    for p in raw.programs {
        let build_argv = match p.build {
            None => Vec::new(),
            Some(RawBuild::Argv(argv)) => argv,
            Some(RawBuild::Line(line)) => {
                let mut lexer = Shlex::new(&line);
                let words: Vec<String> = lexer.by_ref().collect();
                if lexer.had_error {
                    return Err(BenchError::Config(format!(
                        "unbalanced quoting in build command for '{}'",
                        p.name
                    )));
                }
                words
            }
        };
        programs.push(ProgramAdapter::new(
            p.name,
            absolutize(&base_dir.join(&p.workdir)),
            build_argv,
            p.exe,
        ));
    }

    let mut defaults = raw.defaults;
    defaults.verify_dir = defaults.verify_dir.map(|d| base_dir.join(d));

    Ok((ProgramRegistry::new(programs, raw.verification)?, defaults))
}

/// Load a config file.
pub fn load_config(path: &Path) -> BenchResult<LoadedConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| BenchError::io("failed to read config", path, e))?;
    let base_dir = absolutize(path.parent().unwrap_or(Path::new("")));
    let (registry, defaults) = parse_config(&text, &base_dir)?;
    Ok(LoadedConfig {
        source: Some(path.to_path_buf()),
        registry,
        defaults,
    })
}

/// Load `explicit` if given, else `bench-config.toml` if present, else the builtin registry.
pub fn resolve_config(explicit: Option<&Path>) -> BenchResult<LoadedConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let default_path = Path::new(DEFAULT_CONFIG);
    if default_path.exists() {
        return load_config(default_path);
    }
    Ok(LoadedConfig {
        source: None,
        registry: ProgramRegistry::builtin(),
        defaults: FileDefaults::default(),
    })
}

/// Make `path` absolute against the current directory.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        return std::env::current_dir().unwrap_or_default();
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[defaults]
runs = 3
inputs = [10, 12]
verify_dir = "out/v"

[[program]]
name = "rust"
workdir = "fft/rs"
build = ["cargo", "build", "--release"]
exe = "target/release/main"

[[program]]
name = "go"
workdir = "/abs/fft/go"
build = "go build -o 'main' ."
exe = "main"

[[program]]
name = "c"
workdir = "fft/c"
exe = "fft"

[verification]
producer = "go"
consumer = "rust"
"#;

    #[test]
    fn test_parse_config_programs_in_order() {
        let (registry, _) = parse_config(SAMPLE, Path::new("/bench")).unwrap();
        let names: Vec<&str> = registry.programs().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["rust", "go", "c"]);

        let rust = registry.get("rust").unwrap();
        assert_eq!(rust.workdir(), Path::new("/bench/fft/rs"));
        assert_eq!(rust.build_argv(), ["cargo", "build", "--release"]);

        let go = registry.get("go").unwrap();
        assert_eq!(go.workdir(), Path::new("/abs/fft/go"));
        assert_eq!(go.build_argv(), ["go", "build", "-o", "main", "."]);

        assert!(registry.get("c").unwrap().build_command().is_none());
    }

    #[test]
    fn test_parse_config_defaults() {
        let (_, defaults) = parse_config(SAMPLE, Path::new("/bench")).unwrap();
        assert_eq!(defaults.runs, Some(3));
        assert_eq!(defaults.inputs, Some(vec![10, 12]));
        assert_eq!(defaults.verify_dir, Some(PathBuf::from("/bench/out/v")));
        assert_eq!(defaults.timeout_secs, None);
    }

    #[test]
    fn test_verification_pair_lookup() {
        let (registry, _) = parse_config(SAMPLE, Path::new("/bench")).unwrap();
        let (producer, consumer) = registry.verification_pair().unwrap();
        assert_eq!(producer.name(), "go");
        assert_eq!(consumer.name(), "rust");
    }

    #[test]
    fn test_verification_pair_unknown_program() {
        let programs = vec![ProgramAdapter::new("rust", "/r", Vec::new(), "main")];
        let pair = VerificationPair {
            producer: "zig".into(),
            consumer: "rust".into(),
        };
        let registry = ProgramRegistry::new(programs, Some(pair)).unwrap();
        let err = registry.verification_pair().unwrap_err();
        assert!(err.to_string().contains("producer 'zig'"), "{err}");
    }

    #[test]
    fn test_verification_pair_missing() {
        let programs = vec![ProgramAdapter::new("rust", "/r", Vec::new(), "main")];
        let registry = ProgramRegistry::new(programs, None).unwrap();
        assert!(matches!(
            registry.verification_pair(),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = r#"
[[program]]
name = "rust"
workdir = "a"
exe = "main"

[[program]]
name = "rust"
workdir = "b"
exe = "main"
"#;
        let err = parse_config(text, Path::new("/bench")).unwrap_err();
        assert!(err.to_string().contains("duplicate program name 'rust'"));
    }

    #[test]
    fn test_unbalanced_build_quotes_rejected() {
        let text = r#"
[[program]]
name = "go"
workdir = "fft/go"
build = "go build -o 'main"
exe = "main"
"#;
        assert!(matches!(
            parse_config(text, Path::new("/bench")),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn test_empty_config_rejected() {
        assert!(parse_config("", Path::new("/bench")).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = r#"
[[program]]
name = "rust"
workdir = "a"
exe = "main"
flags = ["-O3"]
"#;
        assert!(parse_config(text, Path::new("/bench")).is_err());
    }

    #[test]
    fn test_verify_mode_mapping() {
        let mut config = BenchConfig::default();
        assert_eq!(config.verify_mode(), VerifyMode::Off);
        config.verify_per_run = true;
        assert_eq!(config.verify_mode(), VerifyMode::Off);
        config.verify = true;
        assert_eq!(config.verify_mode(), VerifyMode::PerRun);
        config.verify_per_run = false;
        assert_eq!(config.verify_mode(), VerifyMode::OncePerInput);
    }

    #[test]
    fn test_describe_resolved_config() {
        let config = BenchConfig {
            runs: 3,
            inputs: vec![18, 20],
            verify: true,
            verify_per_run: true,
            timeout: Some(Duration::from_secs(30)),
            skip_build: true,
            ..BenchConfig::default()
        };
        assert_eq!(
            config.describe(),
            "runs=3 inputs=[18, 20] verify=per-run verify_dir=out/verify timeout=30s build=skip"
        );
        assert!(BenchConfig::default().describe().contains("timeout=none build=yes"));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = ProgramRegistry::builtin();
        let names: Vec<&str> = registry.programs().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["rust", "go", "moonbit"]);
        assert!(registry.programs().iter().all(|p| p.workdir().is_absolute()));
        assert!(registry.verification_pair().is_ok());
    }

    #[test]
    fn test_load_config_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench-config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        let rust = loaded.registry.get("rust").unwrap();
        assert_eq!(rust.workdir(), dir.path().join("fft/rs"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/bench-config.toml")).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
    }
}
