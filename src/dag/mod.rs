// src/dag/mod.rs

//! Task graph and wave scheduling.
//!
//! - [`graph`] tracks successors and unresolved-prerequisite counts.
//! - [`registry`] maps task ids to their work item and job count.
//! - [`task_info`] holds per-task metadata and lifecycle state.
//! - [`scheduler`] drains the graph level by level through the thread pool.
//! - [`wave`] describes what a run executed.

pub mod graph;
pub(crate) mod registry;
pub mod scheduler;
pub mod task_info;
pub mod wave;

pub use graph::DependencyGraph;
pub use scheduler::Scheduler;
pub use task_info::TaskState;
pub use wave::{RunSummary, WaveSummary};
