//! Request pacing for the Spotify Web API.
//!
//! The Web API enforces a rate limit whose exact value is not published. All
//! outgoing requests are funnelled through a [`Throttler`], which admits
//! queued tasks in submission order, runs at most `width` of them at the same
//! time and keeps a minimum delay between two dispatches.
//!
//! ## Scheduling
//!
//! Pending tasks wait in an unbounded FIFO queue. Whenever the queue is not
//! empty a single drain loop takes up to `width` tasks as one batch, starts
//! them (each one waiting for its dispatch slot first) and waits for the whole
//! batch to settle before taking the next one. Completion order inside a batch
//! is not defined.
//!
//! A failing task only fails its own caller. There are no retries, no
//! priorities and no cancellation: once submitted, a task runs to completion.

use std::{collections::VecDeque, fmt, future::Future, pin::Pin, sync::Arc, time::Duration};

use futures::future::join_all;
use thiserror::Error;
use tokio::{
    sync::{Mutex, oneshot},
    time::{Instant, sleep_until},
};
use tracing::{debug, warn};

use crate::config;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// The task was dropped before it produced a value, i.e. it panicked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("throttled task ended before producing a result")]
pub struct TaskDropped;

#[derive(Clone)]
pub struct Throttler {
    inner: Arc<Inner>,
}

struct Inner {
    width: usize,
    min_delay: Duration,
    queue: Mutex<Queue>,
    last_dispatch: Mutex<Option<Instant>>,
}

#[derive(Default)]
struct Queue {
    pending: VecDeque<Job>,
    processing: bool,
}

impl Throttler {
    /// Creates a throttler running at most `width` tasks at once with at
    /// least `min_delay` between two dispatches. A width of 0 is treated as 1.
    pub fn new(width: usize, min_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                width: width.max(1),
                min_delay,
                queue: Mutex::new(Queue::default()),
                last_dispatch: Mutex::new(None),
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.inner.width
    }

    /// Number of tasks waiting for admission.
    pub async fn pending(&self) -> usize {
        self.inner.queue.lock().await.pending.len()
    }

    /// Queues `task` and resolves with its output once it has run.
    ///
    /// Must be called from within a Tokio runtime; the drain loop is spawned
    /// on demand.
    pub async fn submit<F, T>(&self, task: F) -> Result<T, TaskDropped>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            // the caller may have stopped waiting, nothing to do then
            let _ = tx.send(task.await);
        });

        let start_drain = {
            let mut queue = self.inner.queue.lock().await;
            queue.pending.push_back(job);
            !std::mem::replace(&mut queue.processing, true)
        };

        if start_drain {
            tokio::spawn(Self::drain(Arc::clone(&self.inner)));
        }

        rx.await.map_err(|_| TaskDropped)
    }

    async fn drain(inner: Arc<Inner>) {
        loop {
            let batch: Vec<Job> = {
                let mut queue = inner.queue.lock().await;
                let take = queue.pending.len().min(inner.width);
                if take == 0 {
                    queue.processing = false;
                    return;
                }
                queue.pending.drain(..take).collect()
            };

            debug!(batch = batch.len(), "dispatching throttled batch");
            join_all(batch.into_iter().map(|job| inner.dispatch(job))).await;
        }
    }
}

impl Inner {
    async fn dispatch(&self, job: Job) {
        self.wait_for_slot().await;
        // spawned so a panicking task cannot take the drain loop down with it
        if let Err(e) = tokio::spawn(job).await {
            warn!(error = %e, "throttled task aborted");
        }
    }

    /// Reserves the next dispatch slot and sleeps until it is due.
    async fn wait_for_slot(&self) {
        let slot = {
            let mut last = self.last_dispatch.lock().await;
            let now = Instant::now();
            let slot = match *last {
                Some(previous) => (previous + self.min_delay).max(now),
                None => now,
            };
            *last = Some(slot);
            slot
        };
        sleep_until(slot).await;
    }
}

impl Default for Throttler {
    fn default() -> Self {
        Self::new(
            config::DEFAULT_THROTTLE_WIDTH,
            Duration::from_millis(config::DEFAULT_THROTTLE_DELAY_MS),
        )
    }
}

impl fmt::Debug for Throttler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttler")
            .field("width", &self.inner.width)
            .field("min_delay", &self.inner.min_delay)
            .finish()
    }
}
