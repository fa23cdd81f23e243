//! `stack` crate: the task runner behind the `Makefile`.
//!
//! Each [`Task`] is a fixed sequence of `docker compose` / `cargo`
//! invocations. Commands go through the [`CommandRunner`] trait so the
//! sequencing (and especially the unconditional test-stack teardown) can be
//! exercised without Docker.

pub mod compose;
pub mod error;
pub mod mock;
pub mod runner;
pub mod tasks;
pub mod test_stack;

pub use compose::Profile;
pub use error::StackError;
pub use runner::{CommandRunner, SystemRunner};
pub use tasks::{run_task, Task};
pub use test_stack::{run_tests, TestStack};
