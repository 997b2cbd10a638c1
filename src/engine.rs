//! Property computation for parsed records.
//!
//! `PropertyEngine::compute` fills every computed field of one record. The
//! engine holds no mutable state, so it can be shared between threads and
//! called concurrently on distinct records.

use log::debug;

use crate::alphabet;
use crate::genetic_code::{self, TranslationError};
use crate::model::{Record, SequenceKind};
use crate::properties::{self, REFERENCE_PH};

/// Computes composition and physicochemical properties.
#[derive(Debug, Clone, Copy)]
pub struct PropertyEngine {
    /// pH used for the reported net charge
    pub ph: f64,
}

impl Default for PropertyEngine {
    fn default() -> Self {
        Self { ph: REFERENCE_PH }
    }
}

impl PropertyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the computed fields of `record` as if it were of `kind`.
    ///
    /// Running again with another kind overwrites the previous results.
    /// Properties that do not apply to `kind` are left at `0.0`.
    pub fn compute(&self, record: &mut Record, kind: SequenceKind) -> Result<(), TranslationError> {
        record.clear_properties();
        record.length = record.sequence.len();
        record.alphabet_count = alphabet::count(&record.sequence);

        let counts = &record.alphabet_count;
        record.gc_enrichment = properties::gc_enrichment(kind, counts, record.length).unwrap_or(0.0);
        record.molecular_weight = properties::molecular_weight(kind, counts).unwrap_or(0.0);
        record.melting_point =
            properties::melting_point(kind, counts, record.length).unwrap_or(0.0);

        // Nucleotide records report the charge of their translated product
        let peptide_counts = if kind.is_nucleotide() {
            let translated = genetic_code::translate(&record.sequence)?;
            let translated_counts = alphabet::count(&translated);
            record.translated_sequence = Some(translated);
            translated_counts
        } else {
            record.alphabet_count.clone()
        };

        record.net_charge = properties::net_charge(kind, &peptide_counts, self.ph).unwrap_or(0.0);
        record.isoelectric_point =
            properties::isoelectric_point(kind, &peptide_counts).unwrap_or(0.0);
        record.kind = Some(kind);

        debug!("Computed properties for {} as {}", record.id(), kind);
        Ok(())
    }

    /// Computes every record in order, stopping at the first error.
    pub fn compute_all(&self, records: &mut [Record], kind: SequenceKind) -> Result<(), TranslationError> {
        records.iter_mut().try_for_each(|record| self.compute(record, kind))
    }
}
