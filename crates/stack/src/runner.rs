//! Process execution seam.

use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use crate::StackError;

/// Runs an external program to completion and reports its exit code.
pub trait CommandRunner {
    /// Run `program` with `args`, inheriting stdio.
    ///
    /// `Ok(code)` means the program ran; `code` may be non-zero.
    fn run(&self, program: &str, args: &[String]) -> Result<i32, StackError>;
}

/// [`CommandRunner`] backed by real OS processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    current_dir: PathBuf,
}

impl SystemRunner {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<i32, StackError> {
        info!("$ {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .current_dir(&self.current_dir)
            .status()
            .map_err(|source| StackError::Spawn {
                program: program.to_string(),
                source,
            })?;
        // Killed by a signal: no code, report a generic failure.
        Ok(status.code().unwrap_or(1))
    }
}
