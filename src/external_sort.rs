//! External sort: replacement-selection run generation and k-way merge.
//!
//! Working memory is bounded by [`SortConfig`]: a fixed-capacity array
//! min-heap plus a bounded secondary holding area for records that belong to
//! a future run. Runs are written one record per line as
//! `university,department,score` with no header, then merged into a single
//! department-ordered stream.
//!
//! Run ordering compares departments only; records of the same department
//! compare equal and score is deliberately not consulted. The bulk builder
//! restores per-department score order when it folds records into lists, so
//! the comparator must not be "fixed" here without revisiting that step.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::reader::{RowReader, RunReader};
use crate::types::Record;

/// Default working-set capacity of the replacement-selection heap.
pub const HEAP_SIZE: usize = 7500;

/// Default capacity of the secondary holding area for next-run records.
pub const SECONDARY_STORAGE_SIZE: usize = 2500;

/// Memory bounds for one external-sort invocation.
#[derive(Debug, Clone, Copy)]
pub struct SortConfig {
    /// Maximum records held in the replacement-selection heap.
    /// A value of 0 is treated as 1.
    pub heap_capacity: usize,
    /// Maximum records parked for the next run while the current one drains.
    pub secondary_capacity: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            heap_capacity: HEAP_SIZE,
            secondary_capacity: SECONDARY_STORAGE_SIZE,
        }
    }
}

/// Run ordering: department lexicographic, ties equal.
fn record_cmp(a: &Record, b: &Record) -> Ordering {
    a.department.cmp(&b.department)
}

// ============================================================================
// ARRAY MIN-HEAP
// ============================================================================
//
// Replacement selection needs two operations std's BinaryHeap cannot express:
// replacing the root in place, and shrinking by moving the last element onto
// the root. Both phases share these sift helpers.

fn sift_down<T>(heap: &mut [T], mut index: usize, cmp: impl Fn(&T, &T) -> Ordering) {
    loop {
        let left = 2 * index + 1;
        let right = left + 1;
        let mut smallest = index;
        if left < heap.len() && cmp(&heap[left], &heap[smallest]) == Ordering::Less {
            smallest = left;
        }
        if right < heap.len() && cmp(&heap[right], &heap[smallest]) == Ordering::Less {
            smallest = right;
        }
        if smallest == index {
            break;
        }
        heap.swap(index, smallest);
        index = smallest;
    }
}

fn build_heap<T>(heap: &mut [T], cmp: impl Fn(&T, &T) -> Ordering + Copy) {
    for index in (0..heap.len() / 2).rev() {
        sift_down(heap, index, cmp);
    }
}

/// Shrink the heap by one: last element moves onto the root slot.
fn shrink<T>(heap: &mut Vec<T>) {
    let last = heap.pop().expect("shrink on non-empty heap");
    if !heap.is_empty() {
        heap[0] = last;
    }
}

// ============================================================================
// EXTERNAL SORTER
// ============================================================================

/// Bounded-memory external sorter over admission records.
#[derive(Debug, Default)]
pub struct ExternalSorter {
    config: SortConfig,
}

impl ExternalSorter {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    /// Generate sorted runs from `input` via replacement selection.
    ///
    /// Returns the run file paths (under `dir`) and the total number of
    /// records consumed. A record that compares below the just-emitted
    /// minimum is parked in the secondary holding area for the next run;
    /// when that area is full the record waits in a one-slot pending buffer
    /// and input is not consumed again until the next run seeds.
    pub fn create_runs<R: BufRead>(
        &self,
        input: &mut RowReader<R>,
        dir: &Path,
    ) -> Result<(Vec<PathBuf>, u64)> {
        // A zero heap would emit no runs and silently discard the input.
        let heap_capacity = self.config.heap_capacity.max(1);
        let mut heap: Vec<Record> = Vec::with_capacity(heap_capacity);
        let mut pending: Option<Record> = None;
        let mut more_input = true;
        let mut total: u64 = 0;

        while heap.len() < heap_capacity {
            match input.next_record()? {
                Some(record) => {
                    total += 1;
                    heap.push(record);
                }
                None => {
                    more_input = false;
                    break;
                }
            }
        }

        let mut run_paths = Vec::new();
        while !heap.is_empty() {
            let path = dir.join(format!("run_{}.tmp", run_paths.len()));
            let mut out = BufWriter::new(File::create(&path)?);
            build_heap(&mut heap, record_cmp);

            let mut secondary: Vec<Record> = Vec::with_capacity(self.config.secondary_capacity);
            let mut emitted: u64 = 0;
            while !heap.is_empty() {
                write_record(&mut out, &heap[0])?;
                emitted += 1;

                // A parked record blocks further reads until the next run.
                let incoming = if pending.is_none() && more_input {
                    match input.next_record()? {
                        Some(record) => {
                            total += 1;
                            Some(record)
                        }
                        None => {
                            more_input = false;
                            None
                        }
                    }
                } else {
                    None
                };

                match incoming {
                    Some(record) => {
                        if record_cmp(&record, &heap[0]) != Ordering::Less {
                            // Still fits the current run: replace the root.
                            heap[0] = record;
                        } else if secondary.len() < self.config.secondary_capacity {
                            secondary.push(record);
                            shrink(&mut heap);
                        } else {
                            pending = Some(record);
                            shrink(&mut heap);
                        }
                    }
                    None => shrink(&mut heap),
                }
                if !heap.is_empty() {
                    sift_down(&mut heap, 0, record_cmp);
                }
            }
            out.flush()?;
            debug!(
                run = run_paths.len(),
                records = emitted,
                parked = secondary.len(),
                "sorted run written"
            );
            run_paths.push(path);

            // The holding area (plus any parked record) seeds the next run.
            heap = secondary;
            if let Some(record) = pending.take() {
                heap.push(record);
            }
        }

        Ok((run_paths, total))
    }

    /// Merge sorted runs into one department-ordered stream at `out_path`.
    ///
    /// Keeps one front record per still-open run in a min-heap; an exhausted
    /// run's slot is replaced by the heap's last element.
    pub fn merge_runs(&self, runs: &[PathBuf], out_path: &Path) -> Result<()> {
        struct MergeEntry {
            record: Record,
            run: usize,
        }

        let mut out = BufWriter::new(File::create(out_path)?);
        let mut readers = Vec::with_capacity(runs.len());
        for path in runs {
            readers.push(RunReader::new(BufReader::new(File::open(path)?)));
        }

        let mut heap: Vec<MergeEntry> = Vec::with_capacity(runs.len());
        for (run, reader) in readers.iter_mut().enumerate() {
            if let Some(record) = reader.next_record()? {
                heap.push(MergeEntry { record, run });
            }
        }
        let entry_cmp = |a: &MergeEntry, b: &MergeEntry| record_cmp(&a.record, &b.record);
        build_heap(&mut heap, entry_cmp);

        while !heap.is_empty() {
            write_record(&mut out, &heap[0].record)?;
            match readers[heap[0].run].next_record()? {
                Some(record) => heap[0].record = record,
                None => shrink(&mut heap),
            }
            if !heap.is_empty() {
                sift_down(&mut heap, 0, entry_cmp);
            }
        }
        out.flush()?;
        debug!(runs = runs.len(), "runs merged");
        Ok(())
    }
}

fn write_record<W: Write>(out: &mut W, record: &Record) -> Result<()> {
    writeln!(
        out,
        "{},{},{}",
        record.university, record.department, record.score
    )?;
    Ok(())
}
