//! `fft-bench list`: show the registered programs and the verification pair.

use std::fmt::Write;
use std::path::PathBuf;

use crate::BenchResult;
use crate::bench::config::{LoadedConfig, resolve_config};

/// Render the registry, one program per line in registration order.
pub fn render_registry(loaded: &LoadedConfig) -> String {
    let mut out = String::new();
    match &loaded.source {
        Some(path) => {
            let _ = writeln!(out, "config: {}", path.display());
        }
        None => {
            let _ = writeln!(out, "config: built-in");
        }
    }

    for program in loaded.registry.programs() {
        let build = program
            .build_command()
            .map(|c| c.display_line())
            .unwrap_or_else(|| "(prebuilt)".to_string());
        let _ = writeln!(
            out,
            "{} => {} build=[{}] exe={}",
            program.name(),
            program.workdir().display(),
            build,
            program.exe_path().display()
        );
    }

    match loaded.registry.verification() {
        Some(pair) => {
            let _ = writeln!(out, "verify: {} -> {}", pair.producer, pair.consumer);
        }
        None => {
            let _ = writeln!(out, "verify: (none)");
        }
    }
    out
}

/// List programs from the config file, or the built-in registry.
pub fn list(config: Option<PathBuf>) -> BenchResult<()> {
    let loaded = resolve_config(config.as_deref())?;
    print!("{}", render_registry(&loaded));
    Ok(())
}
