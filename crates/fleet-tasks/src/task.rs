//! Task types and definitions

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::process::Stdio;

use fleet_core::{TaskError, Target};
use tokio::process::Command;

/// The command run in every target: a program and its fixed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Create a new command template
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Set the arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the process for one target directory, with both output streams piped
    pub fn command_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Execution record for one target: captured output and outcome.
///
/// A task is moved into the job that runs it and handed back once the job
/// is finished, so only one worker ever touches it while the batch runs.
#[derive(Debug)]
pub struct Task {
    /// Target this task runs in
    pub target: Target,
    /// Combined stdout and stderr, in arrival order
    pub output: Vec<u8>,
    /// Why the command failed, if it did
    pub error: Option<TaskError>,
}

impl Task {
    /// Create a pending task with no output and no outcome
    pub fn new(target: Target) -> Self {
        Self {
            target,
            output: Vec::new(),
            error: None,
        }
    }

    /// Working directory of the task
    pub fn dir(&self) -> &Path {
        &self.target.dir
    }

    /// Whether the command ran and exited successfully
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Captured output decoded as text
    pub fn output_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

/// Create one empty task per target, preserving order
pub fn prepare(targets: Vec<Target>) -> Vec<Task> {
    targets.into_iter().map(Task::new).collect()
}
