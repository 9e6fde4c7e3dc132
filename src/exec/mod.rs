// src/exec/mod.rs

//! Job execution layer.
//!
//! - [`job`] is the ephemeral `(task, index, count)` invocation.
//! - [`queue`] holds pending jobs, the outstanding-job counter and the
//!   completion barrier the scheduler waits on between waves.
//! - [`pool`] owns the worker threads that drain the queue.

pub(crate) mod job;
pub(crate) mod pool;
pub(crate) mod queue;

pub(crate) use job::Job;
pub(crate) use pool::ThreadPool;
