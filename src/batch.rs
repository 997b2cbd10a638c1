//! Concurrent property computation.
//!
//! Records are independent once parsed, so the batch runner spawns one task
//! per record on a fixed-size rayon pool and collects the results over a
//! channel until everything is done or the deadline passes. A timeout is
//! reported, not raised: tasks still running finish on their own and their
//! results are discarded.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::{info, warn};
use thiserror::Error;

use crate::engine::PropertyEngine;
use crate::genetic_code::TranslationError;
use crate::model::{Record, SequenceKind};

/// Default ceiling for waiting on a batch (30 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Errors that prevent a batch from starting.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Requested pool size; `None` uses the default share of the CPUs
    pub workers: Option<usize>,
    /// How long to wait for all records
    pub timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Completed records, in input order
    pub records: Vec<Record>,
    /// Tasks that had not reported back by the deadline
    pub pending: usize,
    /// Records whose computation failed, by input index and header
    pub errors: Vec<(usize, String, TranslationError)>,
}

impl BatchOutcome {
    /// True when every record was computed.
    pub fn is_complete(&self) -> bool {
        self.pending == 0 && self.errors.is_empty()
    }
}

/// Number of processing units, at least 1.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// 75% of the available units, at least 1.
pub fn default_worker_count(available: usize) -> usize {
    (available * 3 / 4).max(1)
}

/// Clamps a requested pool size to what the machine offers.
///
/// Zero or more than `available` falls back to `default_worker_count`.
pub fn resolve_worker_count(requested: Option<usize>, available: usize) -> usize {
    match requested {
        Some(n) if n >= 1 && n <= available => n,
        Some(n) => {
            let fallback = default_worker_count(available);
            warn!(
                "Invalid worker count {} ({} available), using {}",
                n, available, fallback
            );
            fallback
        }
        None => default_worker_count(available),
    }
}

/// Computes properties for every record on a worker pool.
pub fn run_batch(
    engine: PropertyEngine,
    records: Vec<Record>,
    kind: SequenceKind,
    config: &BatchConfig,
) -> Result<BatchOutcome, BatchError> {
    let workers = resolve_worker_count(config.workers, available_workers());
    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    let total = records.len();
    info!("Computing {} records on {} workers", total, workers);

    let (tx, rx) = mpsc::channel();
    for (index, mut record) in records.into_iter().enumerate() {
        let tx = tx.clone();
        pool.spawn(move || {
            let result = engine.compute(&mut record, kind);
            // The receiver is gone only after a timeout; the result is dropped then
            let _ = tx.send((index, record, result));
        });
    }
    drop(tx);

    let deadline = Instant::now() + config.timeout;
    let mut slots: Vec<Option<Record>> = (0..total).map(|_| None).collect();
    let mut errors = Vec::new();
    let mut received = 0;

    while received < total {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((index, record, Ok(()))) => {
                slots[index] = Some(record);
                received += 1;
            }
            Ok((index, record, Err(e))) => {
                errors.push((index, record.header, e));
                received += 1;
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Batch timed out after {:?} with {} of {} records pending",
                    config.timeout,
                    total - received,
                    total
                );
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    errors.sort_by_key(|(index, _, _)| *index);
    Ok(BatchOutcome {
        records: slots.into_iter().flatten().collect(),
        pending: total - received,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna_records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(format!(">seq{}", i), "ATGAAACCCGGGTTTTAA".repeat(i % 4 + 1)))
            .collect()
    }

    #[test]
    fn test_resolve_worker_count() {
        assert_eq!(resolve_worker_count(Some(2), 8), 2);
        assert_eq!(resolve_worker_count(Some(8), 8), 8);
        assert_eq!(resolve_worker_count(Some(0), 8), 6);
        assert_eq!(resolve_worker_count(Some(9), 8), 6);
        assert_eq!(resolve_worker_count(None, 8), 6);
        assert_eq!(resolve_worker_count(None, 1), 1);
        assert_eq!(resolve_worker_count(Some(3), 1), 1);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let records = dna_records(25);
        let engine = PropertyEngine::new();

        let mut expected = records.clone();
        engine.compute_all(&mut expected, SequenceKind::Dna).unwrap();

        let outcome = run_batch(engine, records, SequenceKind::Dna, &BatchConfig::default()).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.records, expected);
    }

    #[test]
    fn test_batch_reports_errors() {
        let mut records = dna_records(3);
        records.push(Record::new(">broken", "ATGNNN"));

        let outcome = run_batch(
            PropertyEngine::new(),
            records,
            SequenceKind::Dna,
            &BatchConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].0, 3);
        assert_eq!(outcome.errors[0].1, ">broken");
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_zero_timeout_accounts_for_every_record() {
        let config = BatchConfig {
            workers: Some(1),
            timeout: Duration::ZERO,
        };
        let outcome = run_batch(PropertyEngine::new(), dna_records(50), SequenceKind::Dna, &config).unwrap();
        assert_eq!(outcome.records.len() + outcome.pending + outcome.errors.len(), 50);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = run_batch(
            PropertyEngine::new(),
            Vec::new(),
            SequenceKind::Peptide,
            &BatchConfig::default(),
        )
        .unwrap();
        assert!(outcome.records.is_empty());
        assert!(outcome.is_complete());
    }
}
