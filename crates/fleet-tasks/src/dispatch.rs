//! Dispatcher: turns tasks into jobs and feeds the work queue

use std::sync::Arc;

use tracing::{debug, error};

use crate::job::Job;
use crate::pool::WorkQueue;
use crate::progress::CompletionSender;
use crate::task::{CommandTemplate, Task};

/// Binds every task of a batch to the same command
#[derive(Debug, Clone)]
pub struct Dispatcher {
    command: Arc<CommandTemplate>,
    completions: CompletionSender,
}

impl Dispatcher {
    pub fn new(command: Arc<CommandTemplate>, completions: CompletionSender) -> Self {
        Self {
            command,
            completions,
        }
    }

    fn job(&self, slot: usize, task: Task) -> Job {
        Job::new(
            slot,
            task,
            Arc::clone(&self.command),
            self.completions.clone(),
        )
    }

    /// Push one job per task, in order, then close the queue.
    ///
    /// Each task keeps its index as the slot it is returned to. Tasks that no
    /// worker took, because the whole pool is gone, are returned abandoned.
    pub async fn dispatch(&self, mut queue: WorkQueue, tasks: Vec<Task>) -> Vec<(usize, Task)> {
        let total = tasks.len();
        let mut tasks = tasks.into_iter().enumerate();
        let mut abandoned = Vec::new();

        for (slot, task) in tasks.by_ref() {
            if let Err(job) = queue.push(self.job(slot, task)).await {
                error!(slot, "work queue closed before dispatch finished");
                abandoned.push(job.abandon());
                break;
            }
        }
        abandoned.extend(tasks.map(|(slot, task)| self.job(slot, task).abandon()));

        queue.close();
        debug!(jobs = total, abandoned = abandoned.len(), "dispatch complete");
        abandoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::WorkerPool;
    use crate::progress::completion_channel;
    use fleet_core::{TaskError, Target};

    #[tokio::test]
    async fn test_dispatch_feeds_all_tasks() {
        let (tx, mut rx) = completion_channel();
        let dispatcher = Dispatcher::new(
            Arc::new(CommandTemplate::new("echo").with_args(["hi"])),
            tx,
        );
        let tasks = vec![Task::new(Target::root()), Task::new(Target::root())];

        let (queue, pool) = WorkerPool::spawn(1);
        assert!(dispatcher.dispatch(queue, tasks).await.is_empty());
        let finished = pool.join().await;

        assert_eq!(finished.len(), 2);
        assert!(finished.iter().all(|(_, t)| t.output == b"hi\n"));
        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_tasks_without_workers_come_back_abandoned() {
        let (tx, mut rx) = completion_channel();
        let dispatcher = Dispatcher::new(Arc::new(CommandTemplate::new("true")), tx);
        let tasks = vec![Task::new(Target::root()), Task::new(Target::root())];

        let (queue, pool) = WorkerPool::spawn(0);
        let abandoned = dispatcher.dispatch(queue, tasks).await;
        assert!(pool.join().await.is_empty());

        let slots: Vec<usize> = abandoned.iter().map(|(slot, _)| *slot).collect();
        assert_eq!(slots, vec![0, 1]);
        assert!(abandoned
            .iter()
            .all(|(_, task)| matches!(task.error, Some(TaskError::NotRun))));
        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_workers_run_while_dispatch_is_pending() {
        let (tx, mut rx) = completion_channel();
        let dispatcher = Dispatcher::new(
            Arc::new(CommandTemplate::new("sleep").with_args(["0.3"])),
            tx,
        );
        let tasks: Vec<Task> = (0..3).map(|_| Task::new(Target::root())).collect();

        let (queue, pool) = WorkerPool::spawn(1);
        let dispatching = tokio::spawn(async move { dispatcher.dispatch(queue, tasks).await });

        // The first job finishes while the third one still waits for the worker.
        rx.recv().await.unwrap();
        assert!(!dispatching.is_finished());

        assert!(dispatching.await.unwrap().is_empty());
        assert_eq!(pool.join().await.len(), 3);
    }
}
