//! External process invocation
//!
//! The Android command-line tools do not report failures consistently through their exit
//! status, so a run is judged only by what it wrote to stderr. That rule lives in
//! [`ProcessOutcome::is_failure`] and nowhere else.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{ProvisionError, Result};

/// Captured output of one process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    /// Any non-blank stderr output counts as a failure, whatever the exit status was
    pub fn is_failure(&self) -> bool {
        !self.stderr.trim().is_empty()
    }

    /// Turn a failed outcome into the fatal error for `program`
    pub fn into_result(self, program: &Path) -> Result<ProcessOutcome> {
        if self.is_failure() {
            return Err(ProvisionError::ProcessFailed {
                program: program_name(program),
                stderr: self.stderr.trim_end().to_string(),
            });
        }
        Ok(self)
    }
}

/// Environment for one invocation
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    /// Written to the child's stdin, which is then closed
    pub stdin: Option<String>,
}

impl ProcessOptions {
    /// Run from the directory holding `program`
    pub fn in_dir_of(program: &Path) -> Self {
        Self {
            working_dir: program.parent().map(Path::to_path_buf),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

pub trait ProcessRunner {
    /// Run `program` to completion and capture its output.
    ///
    /// Only a failure to start the process is an `Err`; whatever the process itself
    /// reports comes back in the outcome.
    fn invoke(
        &self,
        program: &Path,
        args: &[String],
        options: &ProcessOptions,
    ) -> Result<ProcessOutcome>;
}

/// Runs real child processes with `std::process::Command`
#[derive(Debug, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn invoke(
        &self,
        program: &Path,
        args: &[String],
        options: &ProcessOptions,
    ) -> Result<ProcessOutcome> {
        tracing::debug!("running {} {}", program.display(), args.join(" "));

        let mut command = Command::new(program);
        command
            .args(args)
            .envs(&options.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if options.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });
        if let Some(dir) = &options.working_dir {
            command.current_dir(dir);
        }

        let spawn_failed = |e: std::io::Error| ProvisionError::ProcessSpawnFailed {
            program: program.display().to_string(),
            reason: e.to_string(),
        };

        let mut child = command.spawn().map_err(spawn_failed)?;
        if let (Some(input), Some(mut stdin)) = (&options.stdin, child.stdin.take()) {
            // A tool that exits without reading its stdin yields a broken pipe here,
            // which is not a failure of the tool itself.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                tracing::debug!("could not write stdin of {}: {e}", program.display());
            }
        }

        let output = child.wait_with_output().map_err(spawn_failed)?;
        tracing::debug!("{} exited with {}", program.display(), output.status);

        Ok(ProcessOutcome {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn program_name(program: &Path) -> String {
    program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}
