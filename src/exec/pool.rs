// src/exec/pool.rs

//! Fixed-size pool of worker threads draining a [`JobQueue`].

use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace};

use crate::errors::Result;
use crate::exec::queue::{JobFailure, JobQueue};

/// Owns `N` worker threads for its whole lifetime.
///
/// Dropping the pool stops the queue and joins every worker, so no worker
/// outlives the pool.
pub(crate) struct ThreadPool {
    queue: Arc<JobQueue>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    pub(crate) fn new(size: NonZeroUsize) -> Result<Self> {
        let queue = Arc::new(JobQueue::new());
        let mut workers = Vec::with_capacity(size.get());

        for worker in 0..size.get() {
            let worker_queue = Arc::clone(&queue);
            let handle = thread::Builder::new()
                .name(format!("paratask-worker-{worker}"))
                .spawn(move || worker_loop(worker, &worker_queue));

            match handle {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    // Tear down the workers that did start before bailing out.
                    let partial = Self { queue, workers };
                    drop(partial);
                    return Err(err.into());
                }
            }
        }

        debug!(workers = size.get(), "thread pool started");
        Ok(Self { queue, workers })
    }

    pub(crate) fn size(&self) -> usize {
        self.workers.len()
    }

    pub(crate) fn queue(&self) -> &JobQueue {
        &self.queue
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.queue.shutdown();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
        debug!("thread pool stopped");
    }
}

fn worker_loop(worker: usize, queue: &JobQueue) {
    debug!(worker, "worker started");

    while let Some(job) = queue.pop() {
        let (task_id, job_index) = (job.task_id, job.job_index);
        trace!(worker, %task_id, job_index, job_count = job.job_count, "running job");

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
            let message = panic_message(payload.as_ref());
            error!(worker, %task_id, job_index, %message, "job panicked");
            queue.record_failure(JobFailure {
                task_id,
                job_index,
                message,
            });
        }

        queue.complete();
    }

    debug!(worker, "worker exiting");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
