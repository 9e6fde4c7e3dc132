// src/dag/registry.rs

//! Task registry: `TaskId -> (work item, job count, state)`.

use crate::dag::task_info::{TaskInfo, TaskState};
use crate::types::TaskId;
use crate::work::WorkItem;

/// Owns the id counter and per-task metadata.
///
/// Ids are dense (1, 2, 3, ...) so tasks live in a `Vec` indexed by
/// `id - 1`. Entries are never removed; a released task keeps its slot so
/// later lookups can tell "released" apart from "unknown".
pub(crate) struct TaskRegistry<'a> {
    tasks: Vec<TaskInfo<'a>>,
}

impl<'a> TaskRegistry<'a> {
    pub(crate) fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// The id the next call to [`register`](Self::register) will return.
    pub(crate) fn next_id(&self) -> TaskId {
        TaskId::from_index(self.tasks.len())
    }

    pub(crate) fn register(
        &mut self,
        work: &'a dyn WorkItem,
        job_count: usize,
        state: TaskState,
    ) -> TaskId {
        let id = self.next_id();
        self.tasks.push(TaskInfo {
            work,
            job_count,
            state,
        });
        id
    }

    pub(crate) fn get(&self, id: TaskId) -> Option<&TaskInfo<'a>> {
        self.tasks.get(id.index())
    }

    pub(crate) fn set_state(&mut self, id: TaskId, state: TaskState) {
        if let Some(info) = self.tasks.get_mut(id.index()) {
            info.state = state;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}
