// src/engine/runtime.rs

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::dag::{DependencyGraph, RunSummary, Scheduler};
use crate::errors::{ParataskError, Result};
use crate::types::TaskId;
use crate::work::WorkItem;

/// Work item backing a config-declared task: logs every job and counts them.
#[derive(Debug)]
pub struct LoggingWork {
    name: String,
    executed: AtomicUsize,
}

impl LoggingWork {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            executed: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn executed(&self) -> usize {
        self.executed.load(Ordering::Acquire)
    }
}

impl WorkItem for LoggingWork {
    fn run(&self, task_id: TaskId, job_index: usize, job_count: usize) {
        info!(task = %self.name, id = %task_id, job_index, job_count, "job executed");
        self.executed.fetch_add(1, Ordering::AcqRel);
    }
}

/// Outcome of running a config.
#[derive(Debug, Clone)]
pub struct ConfigRun {
    pub summary: RunSummary,
    /// Id assigned to each task name.
    pub ids: BTreeMap<String, TaskId>,
    /// Jobs executed per task name.
    pub executed: BTreeMap<String, usize>,
}

impl ConfigRun {
    /// Task names of each wave, in dispatch order.
    pub fn wave_names(&self) -> Vec<Vec<String>> {
        let names: BTreeMap<TaskId, &str> = self
            .ids
            .iter()
            .map(|(name, &id)| (id, name.as_str()))
            .collect();
        self.summary
            .waves
            .iter()
            .map(|w| w.tasks.iter().map(|id| names[id].to_string()).collect())
            .collect()
    }
}

/// Register every task of `cfg` on a fresh scheduler and run it to completion.
pub fn run_config(cfg: &ConfigFile, workers: usize) -> Result<ConfigRun> {
    let works: Vec<LoggingWork> = cfg
        .registration_order()
        .iter()
        .map(|name| LoggingWork::new(name.as_str()))
        .collect();

    let (summary, ids) = {
        let mut scheduler = Scheduler::new(workers)?;
        let ids = register_all(&mut scheduler, cfg, &works)?;
        let summary = scheduler.run_to_completion()?;
        (summary, ids)
    };

    let executed = works
        .iter()
        .map(|w| (w.name().to_string(), w.executed()))
        .collect();

    Ok(ConfigRun {
        summary,
        ids,
        executed,
    })
}

/// Waves `cfg` would run in, by task name, without starting any threads.
pub fn plan_config(cfg: &ConfigFile) -> Vec<Vec<String>> {
    let order = cfg.registration_order();
    let ids: BTreeMap<&str, TaskId> = order
        .iter()
        .zip(1u64..)
        .filter_map(|(name, raw)| TaskId::new(raw).map(|id| (name.as_str(), id)))
        .collect();

    let mut graph = DependencyGraph::new();
    for name in order {
        let deps: Vec<TaskId> = cfg.task[name]
            .after
            .iter()
            .filter_map(|dep| ids.get(dep.as_str()).copied())
            .collect();
        graph.add_task(ids[name.as_str()], &deps);
    }

    graph
        .plan()
        .into_iter()
        .map(|wave| wave.into_iter().map(|id| order[id.index()].clone()).collect())
        .collect()
}

fn register_all<'a>(
    scheduler: &mut Scheduler<'a>,
    cfg: &ConfigFile,
    works: &'a [LoggingWork],
) -> Result<BTreeMap<String, TaskId>> {
    let mut ids: BTreeMap<String, TaskId> = BTreeMap::new();

    for work in works {
        let task = cfg.task.get(work.name()).ok_or_else(|| {
            ParataskError::ConfigError(format!("task '{}' missing from config", work.name()))
        })?;

        let deps = task
            .after
            .iter()
            .map(|dep| {
                ids.get(dep).copied().ok_or_else(|| {
                    ParataskError::ConfigError(format!(
                        "task '{}' registered before its dependency '{}'",
                        work.name(),
                        dep
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let id = scheduler.submit_with_dependencies(work, task.jobs, &deps)?;
        debug!(task = %work.name(), id = %id, jobs = task.jobs, "registered config task");
        ids.insert(work.name().to_string(), id);
    }

    Ok(ids)
}
