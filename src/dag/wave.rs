// src/dag/wave.rs

//! Reports produced by [`Scheduler::run_to_completion`](crate::dag::Scheduler::run_to_completion).

use crate::types::TaskId;

/// One level of the drain: tasks dispatched together behind one barrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveSummary {
    /// 1-based position of the wave within its run.
    pub index: usize,
    /// Tasks of the wave, in dispatch order.
    pub tasks: Vec<TaskId>,
    /// Jobs enqueued for the wave (sum of the tasks' job counts).
    pub jobs: usize,
}

/// Everything one `run_to_completion` call executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub waves: Vec<WaveSummary>,
}

impl RunSummary {
    pub fn total_jobs(&self) -> usize {
        self.waves.iter().map(|w| w.jobs).sum()
    }

    pub fn tasks_released(&self) -> usize {
        self.waves.iter().map(|w| w.tasks.len()).sum()
    }

    /// Wave index (1-based) in which `task` ran, if it ran in this run.
    pub fn wave_of(&self, task: TaskId) -> Option<usize> {
        self.waves
            .iter()
            .find(|w| w.tasks.contains(&task))
            .map(|w| w.index)
    }
}
