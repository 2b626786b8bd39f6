//! Jobs: one task bound to the batch command

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use fleet_core::TaskError;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::progress::CompletionSender;
use crate::task::{CommandTemplate, Task};

const CHUNK_SIZE: usize = 8 * 1024;

/// A task waiting to be run, together with its slot in the result list
#[derive(Debug)]
pub struct Job {
    slot: usize,
    task: Task,
    command: Arc<CommandTemplate>,
    completions: CompletionSender,
}

impl Job {
    pub fn new(
        slot: usize,
        task: Task,
        command: Arc<CommandTemplate>,
        completions: CompletionSender,
    ) -> Self {
        Self {
            slot,
            task,
            command,
            completions,
        }
    }

    /// Position of the task in the batch
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Give the task back without running it, marked as never run.
    ///
    /// Still sends its completion event, so every slot is accounted for.
    pub fn abandon(self) -> (usize, Task) {
        let Job {
            slot,
            mut task,
            completions,
            ..
        } = self;
        task.error = Some(TaskError::NotRun);
        completions.notify();
        (slot, task)
    }

    /// Run the command to completion in the task directory.
    ///
    /// Any failure is recorded on the task. Exactly one completion event is
    /// sent, whatever the outcome.
    pub async fn run(self) -> (usize, Task) {
        let Job {
            slot,
            mut task,
            command,
            completions,
        } = self;

        let start = Instant::now();
        debug!(slot, dir = %task.dir().display(), command = %command, "running job");

        if let Err(e) = execute(&command, &task.target.dir, &mut task.output).await {
            debug!(slot, dir = %task.dir().display(), error = %e, "job failed");
            task.error = Some(e);
        }

        debug!(
            slot,
            duration_ms = start.elapsed().as_millis(),
            bytes = task.output.len(),
            "job finished"
        );
        completions.notify();
        (slot, task)
    }
}

/// Spawn the command and capture both streams into `output`
async fn execute(
    command: &CommandTemplate,
    dir: &Path,
    output: &mut Vec<u8>,
) -> Result<(), TaskError> {
    let mut child = command
        .command_in(dir)
        .spawn()
        .map_err(|source| TaskError::Spawn {
            program: command.program().to_string(),
            source,
        })?;

    let captured = capture(child.stdout.take(), child.stderr.take(), output).await;
    let status = child.wait().await.map_err(TaskError::Capture)?;
    captured.map_err(TaskError::Capture)?;

    if status.success() {
        Ok(())
    } else {
        Err(TaskError::Exit(status))
    }
}

/// Read two streams concurrently, appending chunks in the order they arrive
async fn capture<O, E>(
    mut stdout: Option<O>,
    mut stderr: Option<E>,
    output: &mut Vec<u8>,
) -> std::io::Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out_chunk = vec![0u8; CHUNK_SIZE];
    let mut err_chunk = vec![0u8; CHUNK_SIZE];

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            read = read_chunk(&mut stdout, &mut out_chunk), if stdout.is_some() => {
                match read? {
                    0 => stdout = None,
                    n => output.extend_from_slice(&out_chunk[..n]),
                }
            }
            read = read_chunk(&mut stderr, &mut err_chunk), if stderr.is_some() => {
                match read? {
                    0 => stderr = None,
                    n => output.extend_from_slice(&err_chunk[..n]),
                }
            }
        }
    }

    Ok(())
}

async fn read_chunk<R: AsyncRead + Unpin>(
    stream: &mut Option<R>,
    chunk: &mut [u8],
) -> std::io::Result<usize> {
    match stream {
        Some(reader) => reader.read(chunk).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::completion_channel;
    use fleet_core::Target;
    use tempfile::TempDir;

    fn job(dir: &Path, command: CommandTemplate) -> (Job, crate::progress::CompletionReceiver) {
        let (tx, rx) = completion_channel();
        let task = Task::new(Target::new(dir, "main", ""));
        (Job::new(3, task, Arc::new(command), tx), rx)
    }

    #[tokio::test]
    async fn test_job_captures_output() {
        let temp = TempDir::new().unwrap();
        let (job, mut rx) = job(temp.path(), CommandTemplate::new("echo").with_args(["ok"]));

        let (slot, task) = job.run().await;
        assert_eq!(slot, 3);
        assert!(task.is_success());
        assert_eq!(task.output, b"ok\n");
        assert_eq!(rx.try_recv(), Some(()));
        assert_eq!(rx.try_recv(), None);
    }

    #[tokio::test]
    async fn test_job_captures_both_streams() {
        let temp = TempDir::new().unwrap();
        let command = CommandTemplate::new("sh").with_args(["-c", "echo out; echo err 1>&2"]);
        let (job, _rx) = job(temp.path(), command);

        let (_, task) = job.run().await;
        let text = task.output_text();
        assert!(text.contains("out\n"));
        assert!(text.contains("err\n"));
        assert_eq!(text.len(), 8);
    }

    #[tokio::test]
    async fn test_job_runs_in_target_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();
        let (job, _rx) = job(temp.path(), CommandTemplate::new("ls"));

        let (_, task) = job.run().await;
        assert!(task.output_text().contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_job_nonzero_exit() {
        let temp = TempDir::new().unwrap();
        let command = CommandTemplate::new("sh").with_args(["-c", "echo partial; exit 3"]);
        let (job, mut rx) = job(temp.path(), command);

        let (_, task) = job.run().await;
        let error = task.error.as_ref().unwrap();
        assert_eq!(error.exit_code(), Some(3));
        assert_eq!(task.output, b"partial\n");
        assert_eq!(rx.try_recv(), Some(()));
    }

    #[tokio::test]
    async fn test_job_missing_executable() {
        let temp = TempDir::new().unwrap();
        let (job, mut rx) = job(temp.path(), CommandTemplate::new("fleet-definitely-missing"));

        let (_, task) = job.run().await;
        assert!(task.error.as_ref().unwrap().is_spawn());
        assert!(task.output.is_empty());
        assert_eq!(rx.try_recv(), Some(()));
    }

    #[tokio::test]
    async fn test_job_missing_directory() {
        let temp = TempDir::new().unwrap();
        let (job, _rx) = job(&temp.path().join("gone"), CommandTemplate::new("true"));

        let (_, task) = job.run().await;
        assert!(task.error.as_ref().unwrap().is_spawn());
    }
}
