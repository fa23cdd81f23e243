//! Task-runner error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StackError {
    /// The profile's env file must exist before the stack can start.
    #[error("environment file {} not found", .0.display())]
    MissingEnvFile(PathBuf),

    /// The program could not be started at all (not installed, not executable, ...).
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
