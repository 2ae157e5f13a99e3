//! Harness configuration: the run record and the program registry.

pub mod config;

pub use config::{
    BenchConfig, FileDefaults, LoadedConfig, ProgramRegistry, VerificationPair, VerifyMode,
    load_config, resolve_config,
};
