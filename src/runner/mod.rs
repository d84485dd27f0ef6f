//! External command execution layer
//!
//! Every patchops operation is a single call into an external tool (git or
//! diffstat) followed by text processing of its output. This module provides
//! the trait that abstracts that call, so operations can run against the real
//! tools or against scripted output in tests.
//!
//! # Overview
//!
//! - [Invocation]: one command, built from an explicit argument list, with an
//!   optional working directory and optional standard input
//! - [CommandRunner]: runs an invocation and returns captured standard output
//! - [system::SystemRunner]: real implementation using `std::process::Command`
//! - [mock::MockRunner]: scripted implementation for testing
//!
//! Invocations are never passed through a shell, so commit references and
//! paths supplied by callers are not interpreted as shell syntax.
//!
//! ```rust
//! # use patchops::runner::{CommandRunner, Invocation};
//! # fn example<R: CommandRunner>(runner: &R) -> patchops::Result<()> {
//! let tags = runner.run(&Invocation::git(["tag", "-l", "v*"]).current_dir("/src/linux"))?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod system;

pub use mock::MockRunner;
pub use system::SystemRunner;

use crate::error::{PatchOpsError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// External tools patchops knows how to invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Git,
    Diffstat,
}

impl Tool {
    /// Program name used when no override is configured
    pub fn default_program(&self) -> &'static str {
        match self {
            Tool::Git => "git",
            Tool::Diffstat => "diffstat",
        }
    }
}

/// A single external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub input: Option<String>,
}

impl Invocation {
    /// Create an invocation of `tool` with the given arguments
    pub fn new<I, S>(tool: Tool, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            tool,
            args: args.into_iter().map(Into::into).collect(),
            current_dir: None,
            input: None,
        }
    }

    /// Create a git invocation
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Git, args)
    }

    /// Create a diffstat invocation
    pub fn diffstat<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Diffstat, args)
    }

    /// Run the command inside `dir`
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Feed `text` to the command's standard input
    pub fn input(mut self, text: impl Into<String>) -> Self {
        self.input = Some(text.into());
        self
    }

    /// Human-readable command line, e.g. `git tag -l v*`
    ///
    /// Used for logging, error messages and as the lookup key of
    /// [MockRunner]. It is never handed to a shell.
    pub fn command_line(&self) -> String {
        let mut line = self.tool.default_program().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Refuses caller-supplied revisions and names that git would read as options
pub fn check_revision(revision: &str) -> Result<()> {
    if revision.starts_with('-') {
        return Err(PatchOpsError::invalid_revision(revision));
    }
    Ok(())
}

/// Synchronous command execution
///
/// Implementors run the invocation to completion and return its standard
/// output as text. A non-zero exit status or a failure to start the program
/// must be reported as an error; implementors never retry.
///
/// All implementors must be `Send + Sync` so a runner can be shared by
/// callers on several threads.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` and return its captured standard output
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_joins_arguments() {
        let inv = Invocation::git(["tag", "-l", "v*"]);
        assert_eq!(inv.command_line(), "git tag -l v*");
        assert_eq!(inv.to_string(), "git tag -l v*");
    }

    #[test]
    fn test_builder_sets_dir_and_input() {
        let inv = Invocation::diffstat(["-p1"])
            .current_dir("/tmp/repo")
            .input("Subject: x\n");
        assert_eq!(inv.tool, Tool::Diffstat);
        assert_eq!(inv.current_dir, Some(PathBuf::from("/tmp/repo")));
        assert_eq!(inv.input.as_deref(), Some("Subject: x\n"));
    }

    #[test]
    fn test_check_revision() {
        assert!(check_revision("v6.1").is_ok());
        assert!(check_revision("HEAD~2").is_ok());
        assert!(check_revision("--output=/tmp/x").is_err());
        assert!(check_revision("-p").is_err());
    }

    #[test]
    fn test_default_programs() {
        assert_eq!(Tool::Git.default_program(), "git");
        assert_eq!(Tool::Diffstat.default_program(), "diffstat");
    }
}
