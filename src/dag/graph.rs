// src/dag/graph.rs

use std::collections::{HashMap, VecDeque};

use tracing::warn;

use crate::types::TaskId;

/// Dependency graph driving the wave-by-wave release.
///
/// Keeps, per task, the list of direct successors and the number of
/// prerequisites not yet released (in-degree). A task with in-degree zero sits
/// in the ready frontier; it enters the frontier exactly once, either when it
/// is added without prerequisites or when its last prerequisite is released.
///
/// Entries are dropped as tasks are released, so memory is bounded by the
/// tasks that have not run yet.
///
/// The graph trusts its caller: prerequisites must be known, unreleased and
/// distinct. [`Scheduler`](crate::dag::Scheduler) checks that before calling
/// [`add_task`](Self::add_task).
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    successors: HashMap<TaskId, Vec<TaskId>>,
    in_degree: HashMap<TaskId, usize>,
    ready: VecDeque<TaskId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `task` with edges `dep -> task` for every entry of `deps`.
    ///
    /// Returns `true` if the task went straight into the ready frontier.
    pub fn add_task(&mut self, task: TaskId, deps: &[TaskId]) -> bool {
        if deps.is_empty() {
            self.ready.push_back(task);
            return true;
        }

        self.in_degree.insert(task, deps.len());
        for &dep in deps {
            self.successors.entry(dep).or_default().push(task);
        }
        false
    }

    /// Drain the ready frontier, in insertion order.
    pub fn take_ready(&mut self) -> Vec<TaskId> {
        self.ready.drain(..).collect()
    }

    /// Put tasks back at the front of the ready frontier, keeping their order.
    pub fn restore_ready(&mut self, tasks: Vec<TaskId>) {
        for task in tasks.into_iter().rev() {
            self.ready.push_front(task);
        }
    }

    /// Notify `task`'s successors that it has been released.
    ///
    /// Returns the successors whose in-degree dropped to zero, in the order
    /// their edges were recorded. The task's edge list is discarded.
    pub fn release(&mut self, task: TaskId) -> Vec<TaskId> {
        let Some(successors) = self.successors.remove(&task) else {
            return Vec::new();
        };

        let mut newly_ready = Vec::new();
        for succ in successors {
            let Some(remaining) = self.in_degree.get_mut(&succ) else {
                warn!(task = %task, successor = %succ, "successor has no in-degree entry; ignoring edge");
                continue;
            };
            *remaining -= 1;
            if *remaining == 0 {
                self.in_degree.remove(&succ);
                newly_ready.push(succ);
            }
        }
        newly_ready
    }

    /// Number of prerequisites of `task` still unreleased (0 if none or unknown).
    pub fn in_degree(&self, task: TaskId) -> usize {
        self.in_degree.get(&task).copied().unwrap_or(0)
    }

    /// Direct successors recorded for `task` so far.
    pub fn successors_of(&self, task: TaskId) -> &[TaskId] {
        self.successors
            .get(&task)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks in the ready frontier, in the order they will be dispatched.
    pub fn ready(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.ready.iter().copied()
    }

    /// Tasks still waiting on at least one prerequisite, sorted by id.
    pub fn waiting(&self) -> Vec<TaskId> {
        let mut waiting: Vec<TaskId> = self.in_degree.keys().copied().collect();
        waiting.sort_unstable();
        waiting
    }

    /// Simulate the remaining waves without touching `self`.
    pub fn plan(&self) -> Vec<Vec<TaskId>> {
        let mut sim = self.clone();
        let mut waves = Vec::new();
        let mut frontier = sim.take_ready();

        while !frontier.is_empty() {
            let next: Vec<TaskId> = frontier.iter().flat_map(|&t| sim.release(t)).collect();
            waves.push(frontier);
            frontier = next;
        }
        waves
    }
}
