use crate::config::ToolsConfig;
use crate::error::{PatchOpsError, Result};
use crate::runner::{CommandRunner, Invocation, Tool};
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Runs invocations as real child processes.
///
/// Programs are resolved through `PATH` unless the configuration names
/// explicit binaries. Output is forced to the C locale so that labels such as
/// `URL:` in `git remote show` are not translated.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    git: String,
    diffstat: String,
}

impl SystemRunner {
    /// Create a runner using `git` and `diffstat` from `PATH`
    pub fn new() -> Self {
        Self::from_config(&ToolsConfig::default())
    }

    /// Create a runner using the binaries named in the configuration
    pub fn from_config(tools: &ToolsConfig) -> Self {
        SystemRunner {
            git: tools.git.clone(),
            diffstat: tools.diffstat.clone(),
        }
    }

    fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::Git => &self.git,
            Tool::Diffstat => &self.diffstat,
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        let command_line = invocation.command_line();
        debug!(
            "Running `{}` in {:?}",
            command_line,
            invocation.current_dir.as_deref().unwrap_or(std::path::Path::new("."))
        );

        let mut cmd = Command::new(self.program(invocation.tool));
        cmd.args(&invocation.args).env("LC_ALL", "C");
        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if invocation.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let spawn_err = |source: std::io::Error| PatchOpsError::Spawn {
            command: command_line.clone(),
            source,
        };

        let mut child = cmd.spawn().map_err(spawn_err)?;

        // Feed stdin from a separate thread so a child that writes output
        // before draining its input cannot deadlock against us.
        let writer = match (child.stdin.take(), invocation.input.clone()) {
            (Some(mut stdin), Some(text)) => Some(thread::spawn(move || {
                stdin.write_all(text.as_bytes())
            })),
            _ => None,
        };

        let output = child.wait_with_output().map_err(spawn_err)?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                // The child may exit without reading all input; its exit
                // status decides success.
                Ok(Err(e)) => debug!("Writing stdin of `{}` failed: {}", command_line, e),
                Err(_) => debug!("stdin writer for `{}` panicked", command_line),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(
                "`{}` exited with {:?}: {}",
                command_line,
                output.status.code(),
                stderr
            );
            return Err(PatchOpsError::CommandFailed {
                command: command_line,
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| PatchOpsError::Utf8 {
            command: command_line.clone(),
        })?;
        debug!("`{}` produced {} bytes", command_line, stdout.len());
        Ok(stdout)
    }
}
