// src/engine/mod.rs

//! Runs task graphs loaded from a config file through the [`Scheduler`].
//!
//! Each `[task.<name>]` becomes one scheduler task backed by a
//! [`LoggingWork`], registered in dependency order.
//!
//! [`Scheduler`]: crate::dag::Scheduler

pub mod runtime;

pub use runtime::{ConfigRun, LoggingWork, plan_config, run_config};
