//! `RecordingRunner`: a test double for `CommandRunner`.
//!
//! Records every invocation and answers with scripted results, so task
//! sequencing can be asserted without Docker or cargo on the machine.

use std::io;
use std::sync::Mutex;

use crate::{CommandRunner, StackError};

/// Scripted outcome for commands whose argument line contains a pattern.
enum Reply {
    Exit(i32),
    SpawnError,
}

/// A runner that records calls and returns scripted results.
///
/// Unscripted commands exit with code 0.
#[derive(Default)]
pub struct RecordingRunner {
    replies: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands whose `program args...` line contains `pattern` exit with `code`.
    pub fn exiting(mut self, pattern: impl Into<String>, code: i32) -> Self {
        self.replies.push((pattern.into(), Reply::Exit(code)));
        self
    }

    /// Commands whose line contains `pattern` fail to spawn.
    pub fn failing_spawn(mut self, pattern: impl Into<String>) -> Self {
        self.replies.push((pattern.into(), Reply::SpawnError));
        self
    }

    /// Every command line seen so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<i32, StackError> {
        let line = format!("{program} {}", args.join(" "));
        self.calls.lock().unwrap().push(line.clone());

        match self.replies.iter().find(|(p, _)| line.contains(p.as_str())) {
            Some((_, Reply::Exit(code))) => Ok(*code),
            Some((_, Reply::SpawnError)) => Err(StackError::Spawn {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
            None => Ok(0),
        }
    }
}
