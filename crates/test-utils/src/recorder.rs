use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use paratask::{TaskId, WorkItem};

/// Logical clock shared by several [`RecordingWork`]s.
///
/// Every start and end of a job takes a fresh tick, so "A finished before B
/// started" becomes `a.end < b.start`.
#[derive(Debug, Default)]
pub struct Clock(AtomicU64);

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// One observed job invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub task_id: TaskId,
    pub job_index: usize,
    pub job_count: usize,
    pub start: u64,
    pub end: u64,
}

/// Work item that records every invocation against a shared [`Clock`].
///
/// An optional per-job delay widens the window in which a misordered job
/// would be observed.
pub struct RecordingWork<'c> {
    clock: &'c Clock,
    delay: Duration,
    invocations: Mutex<Vec<Invocation>>,
}

impl<'c> RecordingWork<'c> {
    pub fn new(clock: &'c Clock) -> Self {
        Self::with_delay(clock, Duration::ZERO)
    }

    pub fn with_delay(clock: &'c Clock, delay: Duration) -> Self {
        Self {
            clock,
            delay,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// All invocations so far, sorted by start tick.
    pub fn invocations(&self) -> Vec<Invocation> {
        let mut all = self.invocations.lock().unwrap().clone();
        all.sort_by_key(|inv| inv.start);
        all
    }

    /// Invocations belonging to `task`.
    pub fn of_task(&self, task: TaskId) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|inv| inv.task_id == task)
            .collect()
    }

    /// Sorted job indices observed for `task`.
    pub fn job_indices(&self, task: TaskId) -> Vec<usize> {
        let mut indices: Vec<usize> = self.of_task(task).iter().map(|inv| inv.job_index).collect();
        indices.sort_unstable();
        indices
    }
}

impl WorkItem for RecordingWork<'_> {
    fn run(&self, task_id: TaskId, job_index: usize, job_count: usize) {
        let start = self.clock.tick();
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let end = self.clock.tick();

        self.invocations.lock().unwrap().push(Invocation {
            task_id,
            job_index,
            job_count,
            start,
            end,
        });
    }
}

/// Latest end tick among `invocations` (0 if empty).
pub fn last_end(invocations: &[Invocation]) -> u64 {
    invocations.iter().map(|inv| inv.end).max().unwrap_or(0)
}

/// Earliest start tick among `invocations` (`u64::MAX` if empty).
pub fn first_start(invocations: &[Invocation]) -> u64 {
    invocations.iter().map(|inv| inv.start).min().unwrap_or(u64::MAX)
}
