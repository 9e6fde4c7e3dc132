// src/exec/queue.rs

//! Shared FIFO of pending jobs plus the outstanding-job barrier.
//!
//! Two independent signals live here:
//! - `job_available`: a job was pushed or the pool is stopping (workers wait).
//! - `all_done`: the outstanding counter dropped to zero (the driver waits).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::exec::job::Job;
use crate::types::TaskId;

/// First job panic observed since the last [`JobQueue::take_failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JobFailure {
    pub(crate) task_id: TaskId,
    pub(crate) job_index: usize,
    pub(crate) message: String,
}

#[derive(Default)]
struct QueueState {
    jobs: VecDeque<Job>,
    stopping: bool,
}

pub(crate) struct JobQueue {
    state: Mutex<QueueState>,
    job_available: Condvar,
    /// Jobs pushed but not yet finished.
    outstanding: AtomicUsize,
    done_lock: Mutex<()>,
    all_done: Condvar,
    failure: Mutex<Option<JobFailure>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Jobs never run while one of these locks is held, so a poisoned lock
    // still guards consistent data.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            job_available: Condvar::new(),
            outstanding: AtomicUsize::new(0),
            done_lock: Mutex::new(()),
            all_done: Condvar::new(),
            failure: Mutex::new(None),
        }
    }

    /// Append a job and wake one idle worker.
    ///
    /// The outstanding counter is bumped before the job becomes visible to
    /// workers, so it can never be observed at zero while the job is queued.
    pub(crate) fn push(&self, job: Job) {
        let mut state = lock(&self.state);
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        state.jobs.push_back(job);
        drop(state);
        self.job_available.notify_one();
    }

    /// Block until a job is available or the queue is stopping.
    ///
    /// Returns `None` once stopping; a worker receiving `None` must exit.
    pub(crate) fn pop(&self) -> Option<Job> {
        let state = lock(&self.state);
        let mut state = self
            .job_available
            .wait_while(state, |s| !s.stopping && s.jobs.is_empty())
            .unwrap_or_else(PoisonError::into_inner);

        if state.stopping {
            return None;
        }
        state.jobs.pop_front()
    }

    /// Mark one popped job as finished, waking the driver on the last one.
    pub(crate) fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Take the lock so the wakeup cannot slip in between the driver's
            // check and its wait.
            let _guard = lock(&self.done_lock);
            self.all_done.notify_all();
        }
    }

    /// Block the calling thread until every pushed job has completed.
    pub(crate) fn wait_idle(&self) {
        let mut guard = lock(&self.done_lock);
        while self.outstanding.load(Ordering::Acquire) != 0 {
            guard = self
                .all_done
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Keep the first failure; later ones are only logged by the worker.
    pub(crate) fn record_failure(&self, failure: JobFailure) {
        let mut slot = lock(&self.failure);
        if slot.is_none() {
            *slot = Some(failure);
        }
    }

    pub(crate) fn take_failure(&self) -> Option<JobFailure> {
        lock(&self.failure).take()
    }

    /// Stop handing out jobs and wake every worker.
    ///
    /// Jobs still queued are discarded, not run.
    pub(crate) fn shutdown(&self) {
        let mut state = lock(&self.state);
        state.stopping = true;
        let discarded = state.jobs.len();
        state.jobs.clear();
        drop(state);

        if discarded > 0 {
            warn!(discarded, "job queue shut down with unexecuted jobs; discarding them");
            self.outstanding.fetch_sub(discarded, Ordering::AcqRel);
        } else {
            debug!("job queue shut down");
        }
        self.job_available.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: TaskId, _: usize, _: usize) {}

    fn queued_job(job_index: usize) -> Job {
        // SAFETY: `noop` is a `'static` function item.
        unsafe { Job::new(TaskId::FIRST, job_index, 3, &noop) }
    }

    #[test]
    fn shutdown_discards_queued_jobs_and_settles_the_counter() {
        let queue = JobQueue::new();
        for job_index in 0..3 {
            queue.push(queued_job(job_index));
        }
        assert_eq!(queue.outstanding(), 3);

        queue.shutdown();

        assert!(queue.pop().is_none());
        assert_eq!(queue.outstanding(), 0);
        // Returns immediately: nothing is left to wait for.
        queue.wait_idle();
    }

    #[test]
    fn shutdown_only_discards_jobs_not_yet_popped() {
        let queue = JobQueue::new();
        queue.push(queued_job(0));
        queue.push(queued_job(1));

        let running = queue.pop().expect("a job is queued");
        queue.shutdown();
        assert_eq!(queue.outstanding(), 1);

        running.run();
        queue.complete();
        assert_eq!(queue.outstanding(), 0);
        queue.wait_idle();
    }

    #[test]
    fn keeps_only_the_first_failure() {
        let queue = JobQueue::new();
        for job_index in [4, 7] {
            queue.record_failure(JobFailure {
                task_id: TaskId::FIRST,
                job_index,
                message: format!("boom {job_index}"),
            });
        }

        let failure = queue.take_failure().expect("a failure was recorded");
        assert_eq!(failure.job_index, 4);
        assert!(queue.take_failure().is_none());
    }
}
