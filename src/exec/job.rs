// src/exec/job.rs

//! A single queued job invocation.

use crate::types::TaskId;
use crate::work::WorkItem;

/// One `(task_id, job_index, job_count)` invocation of a task's work item.
///
/// Jobs are created when their task's wave is dispatched and dropped right
/// after they run.
pub(crate) struct Job {
    pub(crate) task_id: TaskId,
    pub(crate) job_index: usize,
    pub(crate) job_count: usize,
    work: &'static dyn WorkItem,
}

impl Job {
    /// # Safety
    ///
    /// The work item is borrowed for an unbounded lifetime. The caller must
    /// guarantee that `work` outlives the job, i.e. that the job has run (or
    /// been dropped) before the borrow it was created from ends.
    pub(crate) unsafe fn new<'a>(
        task_id: TaskId,
        job_index: usize,
        job_count: usize,
        work: &'a (dyn WorkItem + 'a),
    ) -> Self {
        // SAFETY: only the lifetime changes; the caller upholds that the
        // referent outlives every use of the job.
        let work = unsafe {
            std::mem::transmute::<&'a (dyn WorkItem + 'a), &'static (dyn WorkItem + 'static)>(work)
        };
        Self {
            task_id,
            job_index,
            job_count,
            work,
        }
    }

    pub(crate) fn run(self) {
        self.work.run(self.task_id, self.job_index, self.job_count);
    }
}
