//! Process execution adapter.
//!
//! Every external invocation made by the harness (builds, timed runs and
//! verification steps) goes through a `ProcessRunner`. A call blocks until the
//! child exits; a non-zero exit status is a normal outcome, not an error.

pub mod mock;
pub mod system;
pub mod traits;

// Re-export key types
pub use mock::{RecordedCall, ScriptedRunner};
pub use system::SystemRunner;
pub use traits::{CommandSpec, ExecutionOutcome, ProcessRunner};
