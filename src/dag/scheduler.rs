use std::collections::HashSet;
use std::num::NonZeroUsize;

use tracing::{debug, error, info, warn};

use crate::dag::graph::DependencyGraph;
use crate::dag::registry::TaskRegistry;
use crate::dag::task_info::TaskState;
use crate::dag::wave::{RunSummary, WaveSummary};
use crate::errors::{ParataskError, Result};
use crate::exec::{Job, ThreadPool};
use crate::types::TaskId;
use crate::work::WorkItem;

/// Runs registered tasks on a fixed pool of worker threads, one dependency
/// level ("wave") at a time.
///
/// Usage is two-phase and single-threaded on the caller's side:
/// 1. register tasks with [`submit`](Self::submit) /
///    [`submit_with_dependencies`](Self::submit_with_dependencies);
/// 2. call [`run_to_completion`](Self::run_to_completion), which blocks until
///    every registered task has run.
///
/// Work items are borrowed for `'a` and never copied; they must outlive the
/// scheduler. Within a wave, jobs run in any order and interleaving. All jobs
/// of a wave finish, with their side effects visible, before any job of the
/// next wave starts. Because the barrier is per wave, a task may wait on
/// unrelated tasks of the previous wave, not only on its own prerequisites.
pub struct Scheduler<'a> {
    pool: ThreadPool,
    registry: TaskRegistry<'a>,
    graph: DependencyGraph,
}

impl<'a> Scheduler<'a> {
    /// Spawn `workers` worker threads. `workers == 0` is rejected.
    pub fn new(workers: usize) -> Result<Self> {
        let size = NonZeroUsize::new(workers).ok_or(ParataskError::InvalidWorkerCount)?;
        let pool = ThreadPool::new(size)?;
        info!(workers, "scheduler created");

        Ok(Self {
            pool,
            registry: TaskRegistry::new(),
            graph: DependencyGraph::new(),
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    /// Register a task with no prerequisites. It runs in the first wave of the
    /// next [`run_to_completion`](Self::run_to_completion).
    pub fn submit(&mut self, work: &'a dyn WorkItem, job_count: usize) -> TaskId {
        let id = self.registry.register(work, job_count, TaskState::Ready);
        self.graph.add_task(id, &[]);
        debug!(task = %id, job_count, "task submitted");
        id
    }

    /// Register a task whose jobs may only start once every task in `deps`
    /// has finished all of its jobs.
    ///
    /// Every entry of `deps` must be a task returned earlier by this scheduler
    /// that has not been released by a previous run, and must appear only
    /// once. Violations are rejected and no id is consumed.
    pub fn submit_with_dependencies(
        &mut self,
        work: &'a dyn WorkItem,
        job_count: usize,
        deps: &[TaskId],
    ) -> Result<TaskId> {
        if deps.is_empty() {
            return Ok(self.submit(work, job_count));
        }

        self.check_dependencies(deps)?;

        let id = self.registry.register(work, job_count, TaskState::Waiting);
        self.graph.add_task(id, deps);
        debug!(task = %id, job_count, ?deps, "task submitted with dependencies");
        Ok(id)
    }

    /// Drain every registered task, wave by wave, blocking until done.
    ///
    /// For each wave: enqueue all jobs of the frontier, compute the next
    /// frontier, then wait on the completion barrier. Returns what ran.
    ///
    /// # Errors
    ///
    /// - [`ParataskError::JobPanicked`] if a job panicked. The wave it belongs
    ///   to is still waited on; no later wave is started. Tasks that became
    ///   ready stay queued, so a later call continues from there.
    /// - [`ParataskError::Unsatisfiable`] if tasks remain whose prerequisites
    ///   can never all be released.
    pub fn run_to_completion(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut frontier = self.graph.take_ready();

        info!(
            ready = frontier.len(),
            registered = self.registry.len(),
            "run started"
        );

        while !frontier.is_empty() {
            let index = summary.waves.len() + 1;
            let jobs = self.dispatch(&frontier);
            let next = self.release(&frontier);

            debug!(
                wave = index,
                tasks = frontier.len(),
                jobs,
                next = next.len(),
                "wave dispatched; waiting for its jobs"
            );
            self.pool.queue().wait_idle();
            debug_assert_eq!(self.pool.queue().outstanding(), 0);

            for &task in &frontier {
                self.registry.set_state(task, TaskState::Released);
            }
            summary.waves.push(WaveSummary {
                index,
                tasks: frontier,
                jobs,
            });

            if let Some(failure) = self.pool.queue().take_failure() {
                error!(
                    wave = index,
                    task = %failure.task_id,
                    job_index = failure.job_index,
                    "run aborted after job panic"
                );
                self.graph.restore_ready(next);
                return Err(ParataskError::JobPanicked {
                    task_id: failure.task_id,
                    job_index: failure.job_index,
                    message: failure.message,
                });
            }

            frontier = next;
        }

        let pending = self.graph.waiting();
        if !pending.is_empty() {
            error!(?pending, "tasks left with unreleased prerequisites");
            return Err(ParataskError::Unsatisfiable { pending });
        }

        info!(
            waves = summary.waves.len(),
            tasks = summary.tasks_released(),
            jobs = summary.total_jobs(),
            "run finished"
        );
        Ok(summary)
    }

    /// The waves the next [`run_to_completion`](Self::run_to_completion)
    /// would execute, without running anything.
    pub fn plan(&self) -> Vec<Vec<TaskId>> {
        self.graph.plan()
    }

    pub fn state_of(&self, task: TaskId) -> Option<TaskState> {
        self.registry.get(task).map(|info| info.state)
    }

    /// Number of registered tasks that have not run yet.
    pub fn pending_tasks(&self) -> usize {
        self.graph.ready().count() + self.graph.waiting().len()
    }

    fn check_dependencies(&self, deps: &[TaskId]) -> Result<()> {
        let mut seen = HashSet::with_capacity(deps.len());

        for &dep in deps {
            let Some(info) = self.registry.get(dep) else {
                warn!(dep = %dep, next_id = %self.registry.next_id(), "dependency on unknown task");
                return Err(ParataskError::UnknownDependency(dep));
            };
            if info.state == TaskState::Released {
                warn!(dep = %dep, "dependency on already released task");
                return Err(ParataskError::ReleasedDependency(dep));
            }
            if !seen.insert(dep) {
                warn!(dep = %dep, "dependency listed twice");
                return Err(ParataskError::DuplicateDependency(dep));
            }
        }
        Ok(())
    }

    /// Enqueue every job of every task in `frontier`. Returns the job count.
    fn dispatch(&mut self, frontier: &[TaskId]) -> usize {
        let queue = self.pool.queue();
        let mut jobs = 0;

        for &task in frontier {
            let Some(info) = self.registry.get(task) else {
                warn!(task = %task, "frontier task missing from registry; skipping");
                continue;
            };
            for job_index in 0..info.job_count {
                // SAFETY: `info.work` is borrowed for `'a`, which outlives
                // `self`. `run_to_completion` waits on the barrier for every
                // wave it dispatches, and dropping the pool joins all workers,
                // so no job outlives that borrow.
                let job = unsafe { Job::new(task, job_index, info.job_count, info.work) };
                queue.push(job);
            }
            jobs += info.job_count;
        }

        for &task in frontier {
            self.registry.set_state(task, TaskState::Dispatched);
        }
        jobs
    }

    /// Release every task of `frontier` in the graph and return the next
    /// frontier. Tasks in it are marked ready but not dispatched.
    fn release(&mut self, frontier: &[TaskId]) -> Vec<TaskId> {
        let mut next = Vec::new();
        for &task in frontier {
            for succ in self.graph.release(task) {
                self.registry.set_state(succ, TaskState::Ready);
                next.push(succ);
            }
        }
        next
    }
}

impl Drop for Scheduler<'_> {
    fn drop(&mut self) {
        let unrun = self.pending_tasks();
        if unrun > 0 {
            warn!(unrun, "scheduler dropped with tasks that never ran");
        }
    }
}
