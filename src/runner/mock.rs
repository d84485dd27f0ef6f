use crate::error::{PatchOpsError, Result};
use crate::runner::{CommandRunner, Invocation};
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted outcome of one command line
#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Failure { code: i32, stderr: String },
}

/// Mock runner for testing without spawning processes
///
/// Responses are keyed by [Invocation::command_line]. Commands without a
/// scripted response fail as if the program exited with status 127.
pub struct MockRunner {
    responses: HashMap<String, Response>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a new mock with no scripted commands
    pub fn new() -> Self {
        MockRunner {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the standard output of `command_line`
    pub fn respond(mut self, command_line: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses
            .insert(command_line.into(), Response::Output(output.into()));
        self
    }

    /// Script `command_line` to exit with `code`
    pub fn fail(
        mut self,
        command_line: impl Into<String>,
        code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        self.responses.insert(
            command_line.into(),
            Response::Failure {
                code,
                stderr: stderr.into(),
            },
        );
        self
    }

    /// Every invocation run so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Command lines run so far, in order
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(invocation.clone()),
            Err(poisoned) => poisoned.into_inner().push(invocation.clone()),
        }

        let command_line = invocation.command_line();
        match self.responses.get(&command_line) {
            Some(Response::Output(out)) => Ok(out.clone()),
            Some(Response::Failure { code, stderr }) => Err(PatchOpsError::CommandFailed {
                command: command_line,
                code: Some(*code),
                stderr: stderr.clone(),
            }),
            None => Err(PatchOpsError::CommandFailed {
                command: command_line,
                code: Some(127),
                stderr: "no scripted response".to_string(),
            }),
        }
    }
}
