//! The test stack as a scoped resource.
//!
//! [`TestStack`] owns a running `test` profile. Its teardown
//! (`down --volumes`) runs exactly once: through [`TestStack::release`] or,
//! on any path that skips it, from `Drop`. [`run_tests`] surfaces the test
//! container's exit code, never the teardown's.

use tracing::{info, warn};

use crate::compose::{Profile, DOCKER, TEST_API_SERVICE};
use crate::{CommandRunner, StackError};

/// Guard over a started (or starting) test stack.
pub struct TestStack<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    released: bool,
}

impl<'a, R: CommandRunner + ?Sized> TestStack<'a, R> {
    /// Take ownership of the test stack. Teardown is armed from here on.
    pub fn acquire(runner: &'a R) -> Self {
        Self {
            runner,
            released: false,
        }
    }

    /// Build and start the stack, wait for the test container to exit and
    /// return its exit code.
    pub fn run_suite(&self) -> Result<i32, StackError> {
        let args = Profile::Test.args(&[
            "up",
            "--build",
            "--abort-on-container-exit",
            "--exit-code-from",
            TEST_API_SERVICE,
        ]);
        self.runner.run(DOCKER, &args)
    }

    /// Tear the stack down, volumes included, and return teardown's exit code.
    pub fn release(mut self) -> Result<i32, StackError> {
        self.released = true;
        self.teardown()
    }

    fn teardown(&self) -> Result<i32, StackError> {
        info!("Tearing down test stack");
        let args = Profile::Test.args(&["down", "--volumes", "--remove-orphans"]);
        self.runner.run(DOCKER, &args)
    }
}

impl<R: CommandRunner + ?Sized> Drop for TestStack<'_, R> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match self.teardown() {
            Ok(0) => {}
            Ok(code) => warn!(code, "test stack teardown exited non-zero"),
            Err(e) => warn!("test stack teardown failed: {e}"),
        }
    }
}

/// Run the test suite end to end and return the test container's exit code.
///
/// Teardown always runs. Its failures are logged and otherwise ignored.
pub fn run_tests<R: CommandRunner + ?Sized>(runner: &R) -> Result<i32, StackError> {
    let stack = TestStack::acquire(runner);
    let outcome = stack.run_suite();

    match stack.release() {
        Ok(0) => {}
        Ok(code) => warn!(code, "test stack teardown exited non-zero"),
        Err(e) => warn!("test stack teardown failed: {e}"),
    }

    match &outcome {
        Ok(code) => info!(code, "Test suite finished"),
        Err(e) => warn!("Test suite could not start: {e}"),
    }
    outcome
}
