//! Fleet Tasks - concurrent batch executor
//!
//! Runs one command in every target of a batch on a bounded pool of
//! workers, collecting each target's output and outcome in target order,
//! with a progress indicator that only shows up for long batches.

pub mod dispatch;
pub mod job;
pub mod pool;
pub mod progress;
pub mod scheduler;
pub mod task;

#[cfg(test)]
mod test_support;

pub use dispatch::Dispatcher;
pub use job::Job;
pub use pool::{WorkQueue, WorkerPool};
pub use progress::{
    completion_channel, CompletionReceiver, CompletionSender, ProgressReporter, ProgressState,
};
pub use scheduler::{effective_concurrency, Scheduler, SchedulerOptions};
pub use task::{prepare, CommandTemplate, Task};
