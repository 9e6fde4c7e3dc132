// src/work.rs

//! The capability callers implement to give a task something to do.

use crate::types::TaskId;

/// One task's work, split into `job_count` independently runnable jobs.
///
/// The scheduler calls `run` exactly once per job, from worker threads, with
/// no ordering between jobs of the same wave. Implementations that mutate
/// shared state are responsible for partitioning it by `job_index`.
///
/// A panic inside `run` is caught on the worker and reported from
/// [`Scheduler::run_to_completion`](crate::dag::Scheduler::run_to_completion)
/// as [`ParataskError::JobPanicked`](crate::errors::ParataskError::JobPanicked).
pub trait WorkItem: Sync {
    fn run(&self, task_id: TaskId, job_index: usize, job_count: usize);
}

impl<F> WorkItem for F
where
    F: Fn(TaskId, usize, usize) + Sync,
{
    fn run(&self, task_id: TaskId, job_index: usize, job_count: usize) {
        self(task_id, job_index, job_count)
    }
}
