//! Caller-owned analysis session.
//!
//! A session keeps the records of every analyzed source in insertion
//! order. What happens when a source is added twice is decided by the
//! caller through `DuplicatePolicy`.

use std::path::Path;

use log::info;
use thiserror::Error;

use crate::batch::{self, BatchConfig, BatchError};
use crate::engine::PropertyEngine;
use crate::fasta::{self, FormatError};
use crate::genetic_code::TranslationError;
use crate::model::{Record, SequenceKind};

/// Errors raised while analyzing a source.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{source_id}: {error}")]
    Format {
        source_id: String,
        #[source]
        error: FormatError,
    },

    #[error("{source_id}: {error}")]
    Translation {
        source_id: String,
        #[source]
        error: TranslationError,
    },

    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// What to do when a source is already in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the existing records, ignore the new ones
    #[default]
    Skip,
    /// Drop the existing records, keep the new ones
    Replace,
    /// Add the new records after the existing ones
    Append,
}

/// Outcome of adding records to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    New,
    Skipped,
    Replaced,
    Appended,
}

/// Ordered mapping from source identifier to its records.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    engine: PropertyEngine,
    sources: Vec<(String, Vec<Record>)>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session computing with the given engine.
    pub fn with_engine(engine: PropertyEngine) -> Self {
        Self {
            engine,
            sources: Vec::new(),
        }
    }

    /// Source identifier used for a path: its file name.
    pub fn source_id<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Stores records under `source_id` according to `policy`.
    pub fn add_records(
        &mut self,
        source_id: impl Into<String>,
        records: Vec<Record>,
        policy: DuplicatePolicy,
    ) -> Insertion {
        let source_id = source_id.into();
        let Some(pos) = self.position(&source_id) else {
            self.sources.push((source_id, records));
            return Insertion::New;
        };

        info!("Source {} already analyzed ({:?})", source_id, policy);
        match policy {
            DuplicatePolicy::Skip => Insertion::Skipped,
            DuplicatePolicy::Replace => {
                self.sources[pos].1 = records;
                Insertion::Replaced
            }
            DuplicatePolicy::Append => {
                self.sources[pos].1.extend(records);
                Insertion::Appended
            }
        }
    }

    /// Parses and computes a file sequentially, then stores it.
    ///
    /// With `DuplicatePolicy::Skip` a known source is not read again.
    pub fn analyze_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        kind: SequenceKind,
        policy: DuplicatePolicy,
    ) -> Result<Insertion, SessionError> {
        let source_id = Self::source_id(&path);
        if policy == DuplicatePolicy::Skip && self.contains(&source_id) {
            info!("Skipping already analyzed source {}", source_id);
            return Ok(Insertion::Skipped);
        }

        let mut records = self.parse(&path, &source_id, kind)?;
        self.engine
            .compute_all(&mut records, kind)
            .map_err(|error| SessionError::Translation {
                source_id: source_id.clone(),
                error,
            })?;
        Ok(self.add_records(source_id, records, policy))
    }

    /// Like `analyze_file`, but computes on a worker pool.
    ///
    /// Records still pending at the deadline are left out; failed records
    /// turn the first failure into an error.
    pub fn analyze_file_batch<P: AsRef<Path>>(
        &mut self,
        path: P,
        kind: SequenceKind,
        policy: DuplicatePolicy,
        config: &BatchConfig,
    ) -> Result<Insertion, SessionError> {
        let source_id = Self::source_id(&path);
        if policy == DuplicatePolicy::Skip && self.contains(&source_id) {
            info!("Skipping already analyzed source {}", source_id);
            return Ok(Insertion::Skipped);
        }

        let records = self.parse(&path, &source_id, kind)?;
        let outcome = batch::run_batch(self.engine, records, kind, config)?;
        if let Some((_, _, error)) = outcome.errors.into_iter().next() {
            return Err(SessionError::Translation { source_id, error });
        }
        Ok(self.add_records(source_id, outcome.records, policy))
    }

    fn parse<P: AsRef<Path>>(
        &self,
        path: P,
        source_id: &str,
        kind: SequenceKind,
    ) -> Result<Vec<Record>, SessionError> {
        fasta::parse_file(path, kind).map_err(|error| SessionError::Format {
            source_id: source_id.to_string(),
            error,
        })
    }

    fn position(&self, source_id: &str) -> Option<usize> {
        self.sources.iter().position(|(id, _)| id == source_id)
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.position(source_id).is_some()
    }

    /// Records of one source.
    pub fn records(&self, source_id: &str) -> Option<&[Record]> {
        self.position(source_id).map(|pos| self.sources[pos].1.as_slice())
    }

    /// Source identifiers in insertion order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(id, _)| id.as_str())
    }

    /// (source, records) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.sources.iter().map(|(id, records)| (id.as_str(), records.as_slice()))
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Total number of records across sources.
    pub fn record_count(&self) -> usize {
        self.sources.iter().map(|(_, records)| records.len()).sum()
    }
}
