// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Configuration file as deserialized from TOML, before validation.
///
/// ```toml
/// [config]
/// workers = 4
///
/// [task.load]
/// jobs = 5
///
/// [task.transform]
/// jobs = 4
/// after = ["load"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `config::validate`),
/// which guarantees every `after` reference resolves and the graph is acyclic.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskConfig>,
    /// Task names ordered so every task comes after all of its `after` entries.
    order: Vec<String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<String, TaskConfig>,
        order: Vec<String>,
    ) -> Self {
        Self {
            config,
            task,
            order,
        }
    }

    /// Task names in an order that only ever references earlier tasks.
    pub fn registration_order(&self) -> &[String] {
        &self.order
    }

    /// Worker count from `[config]`, or the machine's available parallelism.
    pub fn effective_workers(&self) -> usize {
        self.config.workers.unwrap_or_else(default_workers)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Number of worker threads. Defaults to the available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// How many jobs the task fans out into. `0` is allowed: the task runs
    /// no jobs but still releases its dependents.
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Tasks that must finish all of their jobs before this one starts.
    #[serde(default)]
    pub after: Vec<String>,

    /// Free-form text shown in dry-run output.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_jobs() -> usize {
    1
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
