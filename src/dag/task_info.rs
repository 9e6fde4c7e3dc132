// src/dag/task_info.rs

//! Task metadata and lifecycle state.

use crate::work::WorkItem;

/// Lifecycle of a registered task. States only ever move forward:
/// `Waiting -> Ready -> Dispatched -> Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Registered with at least one prerequisite not yet released.
    Waiting,
    /// All prerequisites released; part of the next wave.
    Ready,
    /// Jobs enqueued in the wave that is currently running.
    Dispatched,
    /// Every job finished and successors were notified.
    Released,
}

/// What the registry remembers about one task.
pub(crate) struct TaskInfo<'a> {
    pub(crate) work: &'a dyn WorkItem,
    pub(crate) job_count: usize,
    pub(crate) state: TaskState,
}
