//! `docker compose` argument building for the two stack profiles.

use std::path::{Path, PathBuf};

use crate::StackError;

/// Program every compose invocation goes through.
pub const DOCKER: &str = "docker";

/// API service of the dev profile.
pub const DEV_API_SERVICE: &str = "api-dev";

/// API service of the test profile; its exit code is the test result.
pub const TEST_API_SERVICE: &str = "api-test";

/// Compose profile, one per isolated stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Test,
}

impl Profile {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
        }
    }

    /// Env file the profile's services read.
    pub fn env_file(self) -> &'static str {
        match self {
            Self::Dev => ".env",
            Self::Test => ".env.test",
        }
    }

    /// `compose --profile <name> <rest...>`
    pub fn args(self, rest: &[&str]) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "--profile".to_string(),
            self.name().to_string(),
        ];
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }

    /// Fail unless the profile's env file exists under `project_dir`.
    pub fn require_env_file(self, project_dir: &Path) -> Result<PathBuf, StackError> {
        let path = project_dir.join(self.env_file());
        if path.is_file() {
            Ok(path)
        } else {
            Err(StackError::MissingEnvFile(path))
        }
    }
}
