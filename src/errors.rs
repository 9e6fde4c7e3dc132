// src/errors.rs

//! Crate-wide error type.

use thiserror::Error;

use crate::types::TaskId;

#[derive(Error, Debug)]
pub enum ParataskError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("dependency on unknown task {0}")]
    UnknownDependency(TaskId),

    #[error("dependency on task {0} listed more than once")]
    DuplicateDependency(TaskId),

    #[error("dependency on task {0}, which was already released by an earlier run")]
    ReleasedDependency(TaskId),

    #[error("{} task(s) never became ready: {pending:?}", pending.len())]
    Unsatisfiable { pending: Vec<TaskId> },

    #[error("job {job_index} of task {task_id} panicked: {message}")]
    JobPanicked {
        task_id: TaskId,
        job_index: usize,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ParataskError>;
