//! Live "completed / total" indicator for long batches
//!
//! The reporter counts completion events and stays silent during a warm-up
//! delay, so short batches never print anything. Once the delay expires it
//! redraws the counter in place on every event, and wipes it when the batch
//! is finished so the report that follows starts on a clean line.

use std::io::{self, Write};
use std::time::Duration;

use console::measure_text_width;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// Default warm-up before the indicator is shown
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Sending half of the completion event channel, cloned into every job
#[derive(Debug, Clone)]
pub struct CompletionSender {
    tx: mpsc::UnboundedSender<()>,
}

impl CompletionSender {
    /// A sender nobody listens to, for batches run without a reporter
    pub fn detached() -> Self {
        let (tx, _) = completion_channel();
        tx
    }

    /// Signal that one task finished
    pub fn notify(&self) {
        // The reporter may already be gone; events are best effort.
        let _ = self.tx.send(());
    }
}

/// Receiving half of the completion event channel
#[derive(Debug)]
pub struct CompletionReceiver {
    rx: mpsc::UnboundedReceiver<()>,
}

impl CompletionReceiver {
    /// Wait for the next event; `None` once every sender is dropped
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Take an already delivered event, if any
    pub fn try_recv(&mut self) -> Option<()> {
        self.rx.try_recv().ok()
    }
}

/// Create a completion event channel
pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CompletionSender { tx }, CompletionReceiver { rx })
}

/// Lifecycle of the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// Counting silently, warm-up timer running
    Idle,
    /// Counter is on screen
    Active,
    /// Batch finished, counter wiped
    Done,
}

/// Handle on a running progress reporter
#[derive(Debug)]
pub struct ProgressReporter {
    done: oneshot::Sender<()>,
    handle: JoinHandle<io::Result<usize>>,
}

impl ProgressReporter {
    /// Start observing `completions` for a batch of `total` tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<W>(total: usize, completions: CompletionReceiver, delay: Duration, sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (done, done_rx) = oneshot::channel();
        let indicator = Indicator::new(sink, total);
        let handle = tokio::spawn(observe(indicator, completions, delay, done_rx));
        Self { done, handle }
    }

    /// Signal that no more events will come and wait until the indicator is cleared.
    ///
    /// Returns the number of completion events observed.
    pub async fn finish(self) -> io::Result<usize> {
        let _ = self.done.send(());
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }
}

async fn observe<W: Write>(
    mut indicator: Indicator<W>,
    mut completions: CompletionReceiver,
    delay: Duration,
    mut done: oneshot::Receiver<()>,
) -> io::Result<usize> {
    let mut state = ProgressState::Idle;
    let warmup = tokio::time::sleep(delay);
    tokio::pin!(warmup);

    while state != ProgressState::Done {
        tokio::select! {
            // Pending events are drained before the finish signal is honoured.
            biased;

            Some(()) = completions.recv() => {
                indicator.completed += 1;
                if state == ProgressState::Active {
                    indicator.draw()?;
                }
            }
            _ = &mut warmup, if state == ProgressState::Idle => {
                debug!(
                    completed = indicator.completed,
                    total = indicator.total,
                    "showing progress"
                );
                state = ProgressState::Active;
                indicator.draw()?;
            }
            _ = &mut done => {
                state = ProgressState::Done;
            }
        }
    }

    indicator.clear()?;
    Ok(indicator.completed)
}

/// The rendered counter and what is currently on screen
struct Indicator<W> {
    sink: W,
    total: usize,
    completed: usize,
    drawn: usize,
}

impl<W: Write> Indicator<W> {
    fn new(sink: W, total: usize) -> Self {
        Self {
            sink,
            total,
            completed: 0,
            drawn: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} / {}", self.completed, self.total)
    }

    /// Replace the previous render with the current count
    fn draw(&mut self) -> io::Result<()> {
        self.erase()?;
        let msg = self.message();
        self.sink.write_all(msg.as_bytes())?;
        self.drawn = measure_text_width(&msg);
        self.sink.flush()
    }

    /// Remove the render, if any, leaving the cursor at column zero
    fn clear(&mut self) -> io::Result<()> {
        if self.drawn > 0 {
            self.erase()?;
            self.sink.flush()?;
        }
        Ok(())
    }

    fn erase(&mut self) -> io::Result<()> {
        if self.drawn > 0 {
            write!(self.sink, "\r{}\r", " ".repeat(self.drawn))?;
            self.drawn = 0;
        }
        Ok(())
    }
}
