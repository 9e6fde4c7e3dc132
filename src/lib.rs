// src/lib.rs

//! In-process task scheduler: fan-out tasks run on a fixed thread pool, one
//! dependency level at a time.
//!
//! ```no_run
//! use paratask::{Scheduler, TaskId};
//!
//! let log = |task: TaskId, job: usize, jobs: usize| println!("{task}: {job}/{jobs}");
//! let mut scheduler = Scheduler::new(4)?;
//! let a = scheduler.submit(&log, 5);
//! let b = scheduler.submit_with_dependencies(&log, 4, &[a])?;
//! scheduler.submit_with_dependencies(&log, 1, &[a, b])?;
//! scheduler.submit(&log, 2);
//! scheduler.run_to_completion()?;
//! # Ok::<(), paratask::errors::ParataskError>(())
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
mod exec;
pub mod logging;
pub mod types;
pub mod work;
pub mod workload;

use anyhow::{Context, Result, ensure};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::config::model::default_workers;

pub use crate::dag::{RunSummary, Scheduler, TaskState, WaveSummary};
pub use crate::errors::ParataskError;
pub use crate::types::TaskId;
pub use crate::work::WorkItem;

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> Result<()> {
    if let Some(count) = args.sort {
        let workers = args.workers.unwrap_or_else(default_workers);
        return run_sort(count, workers);
    }

    let config_path = args.config;
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let workers = args.workers.unwrap_or_else(|| cfg.effective_workers());
    let outcome = engine::run_config(&cfg, workers)?;

    for (index, names) in outcome.wave_names().iter().enumerate() {
        info!(wave = index + 1, tasks = ?names, "wave completed");
    }
    info!(
        waves = outcome.summary.waves.len(),
        jobs = outcome.summary.total_jobs(),
        "all tasks completed"
    );
    Ok(())
}

fn run_sort(count: usize, workers: usize) -> Result<()> {
    let data = workload::scrambled(count, 0x5eed);
    info!(count, workers, "sorting generated numbers");

    let sorted = workload::parallel_merge_sort(workers, data)?;
    ensure!(
        sorted.windows(2).all(|w| w[0] <= w[1]),
        "merge sort produced unsorted output"
    );

    info!(count, "sorted");
    Ok(())
}

/// Print tasks, their dependencies and the wave plan.
fn print_dry_run(cfg: &ConfigFile) {
    println!("paratask dry-run");
    println!("  config.workers = {}", cfg.effective_workers());
    println!();

    println!("tasks ({}):", cfg.task.len());
    for name in cfg.registration_order() {
        let task = &cfg.task[name];
        println!("  - {name}");
        println!("      jobs: {}", task.jobs);
        if !task.after.is_empty() {
            println!("      after: {:?}", task.after);
        }
        if let Some(ref description) = task.description {
            println!("      description: {description}");
        }
    }
    println!();

    println!("waves:");
    for (index, wave) in engine::plan_config(cfg).iter().enumerate() {
        println!("  {}: {}", index + 1, wave.join(", "));
    }

    debug!("dry-run complete (no execution)");
}
