//! Batch scheduler: run one command across many targets

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fleet_core::Target;
use tracing::{info, instrument, warn};

use crate::dispatch::Dispatcher;
use crate::pool::WorkerPool;
use crate::progress::{completion_channel, CompletionSender, ProgressReporter, DEFAULT_DELAY};
use crate::task::{prepare, CommandTemplate, Task};

/// Options for the batch scheduler
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Maximum concurrent jobs; zero or negative means one worker per task
    pub concurrency: i32,
    /// Warm-up before the progress indicator appears
    pub progress_delay: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            concurrency: 0,
            progress_delay: DEFAULT_DELAY,
        }
    }
}

/// Number of workers for a batch of `tasks` under `limit`
pub fn effective_concurrency(limit: i32, tasks: usize) -> usize {
    match usize::try_from(limit) {
        Ok(n) if n > 0 => n,
        _ => tasks,
    }
}

/// Runs a command in every target of a batch.
///
/// Every run gets its own queue, pool and completion sender, so independent
/// batches never share state.
#[derive(Debug, Clone)]
pub struct Scheduler {
    command: Arc<CommandTemplate>,
    options: SchedulerOptions,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(command: CommandTemplate, options: SchedulerOptions) -> Self {
        Self {
            command: Arc::new(command),
            options,
        }
    }

    /// Run the batch, sending one completion event per task to `completions`.
    ///
    /// Returns the tasks in target order once every worker has exited. Task
    /// failures are recorded on the tasks; the batch itself cannot fail.
    #[instrument(skip_all, fields(command = %self.command, targets = targets.len()))]
    pub async fn run(&self, targets: Vec<Target>, completions: CompletionSender) -> Vec<Task> {
        if targets.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let tasks = prepare(targets);
        let total = tasks.len();
        let workers = effective_concurrency(self.options.concurrency, total);

        let (queue, pool) = WorkerPool::spawn(workers);
        let abandoned = Dispatcher::new(Arc::clone(&self.command), completions)
            .dispatch(queue, tasks)
            .await;
        // A worker panic is resumed here, so abandoned tasks only surface
        // when the pool stopped without one.
        let mut finished = pool.join().await;
        finished.extend(abandoned);

        // Every slot comes back exactly once, run or abandoned.
        finished.sort_by_key(|(slot, _)| *slot);
        let tasks: Vec<Task> = finished.into_iter().map(|(_, task)| task).collect();
        debug_assert_eq!(tasks.len(), total);

        let failed = tasks.iter().filter(|t| !t.is_success()).count();
        info!(
            total,
            failed,
            workers,
            duration_ms = start.elapsed().as_millis(),
            "batch complete"
        );
        tasks
    }

    /// Run the batch with a progress indicator drawn on `sink`.
    ///
    /// The indicator is cleared before this returns.
    pub async fn run_with_progress<W>(&self, targets: Vec<Target>, sink: W) -> Vec<Task>
    where
        W: Write + Send + 'static,
    {
        let (tx, rx) = completion_channel();
        let delay = self.options.progress_delay;
        let reporter = ProgressReporter::start(targets.len(), rx, delay, sink);
        let tasks = self.run(targets, tx).await;
        if let Err(e) = reporter.finish().await {
            warn!(error = %e, "progress reporting failed");
        }
        tasks
    }
}
