use anyhow::{Context, Result};
use crossbeam_channel::{Sender, unbounded};
use log::{debug, info};
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Skipped,
    Failed,
    /// Dequeued after a shutdown request and dropped without running
    Cancelled,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub submitted: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
}

/// Producer side of the shared queue. Only lives on the dispatching thread.
pub struct TaskQueue<T> {
    sender: Sender<T>,
    submitted: Cell<usize>,
}

impl<T> TaskQueue<T> {
    /// Returns `false` once every worker has gone away.
    pub fn submit(&self, task: T) -> bool {
        if self.sender.send(task).is_err() {
            return false;
        }
        self.submitted.set(self.submitted.get() + 1);
        true
    }

    #[must_use]
    pub fn submitted(&self) -> usize {
        self.submitted.get()
    }
}

/// Fixed-size worker pool draining one unbounded queue.
///
/// The producer runs on the calling thread while the workers consume. When the
/// producer returns the queue is closed; each worker exits once it is drained,
/// and `run` returns after the last one has.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    workers: usize,
}

impl Dispatcher {
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn run<T, P, W>(&self, produce: P, work: W) -> Result<DispatchSummary>
    where
        T: Send,
        P: FnOnce(&TaskQueue<T>),
        W: Fn(usize, T) -> TaskOutcome + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("sheet-worker-{i}"))
            .build()
            .context("Failed to build worker pool")?;

        let (sender, receiver) = unbounded::<T>();
        let completed = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let cancelled = AtomicUsize::new(0);

        info!("Starting {} workers", self.workers);

        let submitted = pool.in_place_scope(|scope| {
            for worker_id in 0..self.workers {
                let receiver = receiver.clone();
                let work = &work;
                let counters = (&completed, &skipped, &failed, &cancelled);

                scope.spawn(move |_| {
                    for task in receiver.iter() {
                        let (completed, skipped, failed, cancelled) = counters;
                        let counter = match work(worker_id, task) {
                            TaskOutcome::Completed => completed,
                            TaskOutcome::Skipped => skipped,
                            TaskOutcome::Failed => failed,
                            TaskOutcome::Cancelled => cancelled,
                        };
                        counter.fetch_add(1, Ordering::Relaxed);
                    }
                    debug!("Worker {worker_id} drained the queue");
                });
            }

            let queue = TaskQueue {
                sender,
                submitted: Cell::new(0),
            };
            produce(&queue);
            let submitted = queue.submitted();
            // closes the queue
            drop(queue);
            submitted
        });

        Ok(DispatchSummary {
            submitted,
            completed: completed.into_inner(),
            skipped: skipped.into_inner(),
            failed: failed.into_inner(),
            cancelled: cancelled.into_inner(),
        })
    }
}
