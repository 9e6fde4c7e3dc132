// src/workload.rs

//! Parallel merge sort expressed as a chain of fan-out tasks.
//!
//! One sorting task sorts fixed-width chunks; each following merging task
//! depends on the previous one and merges neighbouring runs of doubling width.
//! Jobs of the same task touch disjoint ranges of the shared buffer.

use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::dag::Scheduler;
use crate::errors::Result;
use crate::types::TaskId;
use crate::work::WorkItem;

/// Data shared by every job of a sort.
///
/// Jobs copy their range out, work without holding the lock, then write the
/// range back, so disjoint jobs of one wave run in parallel.
#[derive(Debug)]
pub struct SortBuffer {
    data: Mutex<Vec<i64>>,
    len: usize,
}

impl SortBuffer {
    pub fn new(data: Vec<i64>) -> Self {
        let len = data.len();
        Self {
            data: Mutex::new(data),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.data.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<i64>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self, range: Range<usize>) -> Vec<i64> {
        self.lock()[range].to_vec()
    }

    fn write(&self, start: usize, values: &[i64]) {
        self.lock()[start..start + values.len()].copy_from_slice(values);
    }
}

/// Sorts chunk `job_index` (of width `chunk`) in place.
pub struct SortingWork<'b> {
    buffer: &'b SortBuffer,
    chunk: usize,
}

impl<'b> SortingWork<'b> {
    pub fn new(buffer: &'b SortBuffer, chunk: usize) -> Self {
        Self {
            buffer,
            chunk: chunk.max(1),
        }
    }

    /// One job per chunk.
    pub fn jobs(&self) -> usize {
        self.buffer.len().div_ceil(self.chunk)
    }
}

impl WorkItem for SortingWork<'_> {
    fn run(&self, _task_id: TaskId, job_index: usize, _job_count: usize) {
        let len = self.buffer.len();
        let start = (job_index * self.chunk).min(len);
        let end = (start + self.chunk).min(len);
        if start == end {
            return;
        }

        let mut part = self.buffer.read(start..end);
        part.sort_unstable();
        self.buffer.write(start, &part);
    }
}

/// Merges the sorted runs `[l, l + width)` and `[l + width, l + 2 * width)`
/// where `l = job_index * 2 * width`.
pub struct MergingWork<'b> {
    buffer: &'b SortBuffer,
    width: usize,
}

impl<'b> MergingWork<'b> {
    pub fn new(buffer: &'b SortBuffer, width: usize) -> Self {
        Self {
            buffer,
            width: width.max(1),
        }
    }

    /// One job per pair of neighbouring runs.
    pub fn jobs(&self) -> usize {
        self.buffer.len().div_ceil(2 * self.width)
    }
}

impl WorkItem for MergingWork<'_> {
    fn run(&self, _task_id: TaskId, job_index: usize, _job_count: usize) {
        let len = self.buffer.len();
        let start = (job_index * 2 * self.width).min(len);
        let mid = (start + self.width).min(len);
        let end = (start + 2 * self.width).min(len);
        if mid == end {
            // Lone trailing run; already sorted.
            return;
        }

        let run = self.buffer.read(start..end);
        let merged = merge_sorted(&run[..mid - start], &run[mid - start..]);
        self.buffer.write(start, &merged);
    }
}

fn merge_sorted(left: &[i64], right: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            out.push(left[i]);
            i += 1;
        } else {
            out.push(right[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}

/// Widths of the successive merge levels for `len` elements sorted in
/// chunks of `chunk`.
pub fn merge_widths(len: usize, chunk: usize) -> Vec<usize> {
    let mut widths = Vec::new();
    let mut width = chunk.max(1);
    while width < len {
        widths.push(width);
        width *= 2;
    }
    widths
}

/// Sort `data` on `workers` threads: `workers` chunks sorted in the first
/// wave, then one merge level per wave.
pub fn parallel_merge_sort(workers: usize, data: Vec<i64>) -> Result<Vec<i64>> {
    let buffer = SortBuffer::new(data);
    let len = buffer.len();
    let chunk = len.div_ceil(workers.max(1)).max(1);

    let sorting = SortingWork::new(&buffer, chunk);
    let merging: Vec<MergingWork<'_>> = merge_widths(len, chunk)
        .into_iter()
        .map(|width| MergingWork::new(&buffer, width))
        .collect();

    debug!(len, workers, chunk, levels = merging.len(), "merge sort planned");

    {
        let mut scheduler = Scheduler::new(workers)?;
        let mut previous = scheduler.submit(&sorting, sorting.jobs());
        for level in &merging {
            previous = scheduler.submit_with_dependencies(level, level.jobs(), &[previous])?;
        }
        scheduler.run_to_completion()?;
    }
    drop(merging);

    Ok(buffer.into_inner())
}

/// Deterministic pseudo-random numbers (xorshift64*) for demos and tests.
pub fn scrambled(count: usize, seed: u64) -> Vec<i64> {
    let mut state = seed.max(1);
    (0..count)
        .map(|_| {
            state ^= state >> 12;
            state ^= state << 25;
            state ^= state >> 27;
            (state.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 1) as i64
        })
        .collect()
}
