//! The fixed task surface exposed through `make`.

use std::path::Path;

use crate::compose::{Profile, DEV_API_SERVICE, DOCKER};
use crate::test_stack::run_tests;
use crate::{CommandRunner, StackError};

const CARGO: &str = "cargo";

/// A named task runner operation. None take parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Build the dev images.
    BuildDev,
    /// Start the dev stack in the background.
    StartDev,
    /// Stop the dev stack; its volume is kept.
    StopDev,
    /// Run the test stack end to end and tear it down unconditionally.
    Test,
    /// Apply migrations against the running dev database.
    Migrate,
    /// Format and apply clippy fixes.
    LintFix,
    /// Check formatting and lints without modifying files.
    LintCheck,
}

/// Run `task` from `project_dir` and return the exit code to propagate.
///
/// Multi-step tasks stop at the first non-zero step.
pub fn run_task<R: CommandRunner + ?Sized>(
    task: Task,
    runner: &R,
    project_dir: &Path,
) -> Result<i32, StackError> {
    match task {
        Task::BuildDev => {
            Profile::Dev.require_env_file(project_dir)?;
            runner.run(DOCKER, &Profile::Dev.args(&["build"]))
        }
        Task::StartDev => {
            Profile::Dev.require_env_file(project_dir)?;
            runner.run(DOCKER, &Profile::Dev.args(&["up", "-d"]))
        }
        Task::StopDev => runner.run(DOCKER, &Profile::Dev.args(&["down"])),
        Task::Test => {
            Profile::Test.require_env_file(project_dir)?;
            run_tests(runner)
        }
        Task::Migrate => {
            Profile::Dev.require_env_file(project_dir)?;
            runner.run(
                DOCKER,
                &Profile::Dev.args(&[
                    "exec",
                    DEV_API_SERVICE,
                    "cargo",
                    "run",
                    "-q",
                    "-p",
                    "cli",
                    "--",
                    "migrate",
                ]),
            )
        }
        Task::LintFix => run_steps(
            runner,
            &[
                &["fmt", "--all"],
                &[
                    "clippy",
                    "--workspace",
                    "--all-targets",
                    "--all-features",
                    "--fix",
                    "--allow-dirty",
                    "--allow-staged",
                ],
            ],
        ),
        Task::LintCheck => run_steps(
            runner,
            &[
                &["fmt", "--all", "--", "--check"],
                &[
                    "clippy",
                    "--workspace",
                    "--all-targets",
                    "--all-features",
                    "--",
                    "-D",
                    "warnings",
                ],
            ],
        ),
    }
}

fn run_steps<R: CommandRunner + ?Sized>(runner: &R, steps: &[&[&str]]) -> Result<i32, StackError> {
    for step in steps {
        let args: Vec<String> = step.iter().map(|s| s.to_string()).collect();
        let code = runner.run(CARGO, &args)?;
        if code != 0 {
            return Ok(code);
        }
    }
    Ok(0)
}
