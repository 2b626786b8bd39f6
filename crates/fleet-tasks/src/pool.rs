//! Worker pool draining the work queue

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::job::Job;
use crate::task::Task;

/// An idle worker asking for its next job
type JobRequest = oneshot::Sender<Job>;

/// Dispatcher side of the work queue.
///
/// Nothing is buffered: a push completes only when an idle worker takes the
/// job, so the dispatcher waits while every worker is busy. Dropping the
/// queue closes it.
#[derive(Debug)]
pub struct WorkQueue {
    requests: mpsc::Receiver<JobRequest>,
}

impl WorkQueue {
    /// Hand a job to the next idle worker, waiting until there is one.
    ///
    /// Gives the job back if every worker is gone.
    pub async fn push(&mut self, mut job: Job) -> Result<(), Job> {
        while let Some(worker) = self.requests.recv().await {
            match worker.send(job) {
                Ok(()) => return Ok(()),
                // The worker went away after asking; try the next one.
                Err(returned) => job = returned,
            }
        }
        Err(job)
    }

    /// Close the queue; idle workers exit and busy ones exit after their job
    pub fn close(self) {
        drop(self);
    }
}

/// A fixed set of workers, each running one job at a time
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<JoinHandle<Vec<(usize, Task)>>>,
}

impl WorkerPool {
    /// Start `size` workers and return the queue that feeds them.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(size: usize) -> (WorkQueue, WorkerPool) {
        // One request per worker at most, so asking never blocks a worker.
        let (tx, rx) = mpsc::channel(size.max(1));

        let workers = (0..size)
            .map(|id| tokio::spawn(work(id, tx.clone())))
            .collect();
        debug!(workers = size, "worker pool started");

        (WorkQueue { requests: rx }, WorkerPool { workers })
    }

    /// Wait for every worker to exit and collect the finished tasks with their slots.
    ///
    /// Returns only after the queue is closed and no job is still running. A
    /// worker panic is resumed on the caller.
    pub async fn join(self) -> Vec<(usize, Task)> {
        let mut finished = Vec::new();
        for worker in self.workers {
            match worker.await {
                Ok(done) => finished.extend(done),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => debug!(error = %e, "worker cancelled"),
            }
        }
        finished
    }
}

async fn work(id: usize, requests: mpsc::Sender<JobRequest>) -> Vec<(usize, Task)> {
    let mut finished = Vec::new();
    loop {
        let (ask, answer) = oneshot::channel();
        if requests.send(ask).await.is_err() {
            break;
        }
        // The request is dropped unanswered when the queue closes.
        let Ok(job) = answer.await else {
            break;
        };
        trace!(worker = id, slot = job.slot(), "picked up job");
        finished.push(job.run().await);
    }
    trace!(worker = id, jobs = finished.len(), "worker exiting");
    finished
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{completion_channel, CompletionSender};
    use crate::task::CommandTemplate;
    use fleet_core::Target;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn job(slot: usize, command: CommandTemplate, completions: CompletionSender) -> Job {
        Job::new(slot, Task::new(Target::root()), Arc::new(command), completions)
    }

    fn true_job(slot: usize, completions: CompletionSender) -> Job {
        job(slot, CommandTemplate::new("true"), completions)
    }

    #[tokio::test]
    async fn test_pool_runs_every_job() {
        let (tx, mut rx) = completion_channel();
        let (mut queue, pool) = WorkerPool::spawn(2);

        for slot in 0..5 {
            queue.push(true_job(slot, tx.clone())).await.unwrap();
        }
        queue.close();

        let mut finished = pool.join().await;
        finished.sort_by_key(|(slot, _)| *slot);
        let slots: Vec<usize> = finished.iter().map(|(slot, _)| *slot).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
        assert!(finished.iter().all(|(_, task)| task.is_success()));

        let mut events = 0;
        while rx.try_recv().is_some() {
            events += 1;
        }
        assert_eq!(events, 5);
    }

    #[tokio::test]
    async fn test_empty_queue_releases_workers() {
        let (queue, pool) = WorkerPool::spawn(3);
        queue.close();
        assert!(pool.join().await.is_empty());
    }

    #[tokio::test]
    async fn test_push_waits_for_an_idle_worker() {
        let (tx, mut rx) = completion_channel();
        let (mut queue, pool) = WorkerPool::spawn(1);

        let sleeper = job(0, CommandTemplate::new("sleep").with_args(["1"]), tx.clone());
        queue.push(sleeper).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let second = queue.push(true_job(1, tx.clone()));
        let blocked = timeout(Duration::from_millis(200), second).await;
        assert!(blocked.is_err(), "push returned while the only worker was busy");
        assert!(rx.try_recv().is_none());

        // Once the worker is free again the next push is accepted.
        queue.push(true_job(2, tx)).await.unwrap();
        assert!(rx.try_recv().is_some());
        queue.close();

        let finished = pool.join().await;
        let mut slots: Vec<usize> = finished.into_iter().map(|(slot, _)| slot).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_push_fails_without_workers() {
        let (mut queue, pool) = WorkerPool::spawn(0);
        let rejected = queue.push(true_job(0, CompletionSender::detached())).await;
        assert_eq!(rejected.map_err(|job| job.slot()), Err(0));
        assert!(pool.join().await.is_empty());
    }
}
