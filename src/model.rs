//! Data model for sequence records.
//!
//! This module contains the data structures shared by the parser and the
//! property engine:
//! - `SequenceKind`: the declared type of a file's sequences
//! - `Record`: one parsed FASTA entry plus its computed properties

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::alphabet::AlphabetCount;

/// Raised when a declared sequence type token matches no `SequenceKind`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Unrecognized sequence type '{0}'.\n\
     Valid sequence types: dna, rna, peptide, ambiguous"
)]
pub struct UnrecognizedSequenceType(pub String);

/// The sequence type declared for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Dna,
    Rna,
    Peptide,
    Ambiguous,
}

impl SequenceKind {
    /// All kinds, in declaration order.
    pub const ALL: [SequenceKind; 4] = [
        SequenceKind::Dna,
        SequenceKind::Rna,
        SequenceKind::Peptide,
        SequenceKind::Ambiguous,
    ];

    /// Returns true for DNA and RNA.
    pub fn is_nucleotide(self) -> bool {
        matches!(self, SequenceKind::Dna | SequenceKind::Rna)
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceKind::Dna => write!(f, "DNA"),
            SequenceKind::Rna => write!(f, "RNA"),
            SequenceKind::Peptide => write!(f, "PEPTIDE"),
            SequenceKind::Ambiguous => write!(f, "AMBIGUOUS"),
        }
    }
}

impl FromStr for SequenceKind {
    type Err = UnrecognizedSequenceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dna" => Ok(SequenceKind::Dna),
            "rna" => Ok(SequenceKind::Rna),
            "peptide" => Ok(SequenceKind::Peptide),
            "ambiguous" => Ok(SequenceKind::Ambiguous),
            _ => Err(UnrecognizedSequenceType(s.to_string())),
        }
    }
}

/// One parsed entry with its computed properties.
///
/// Computed fields stay at `0.0` until the property engine runs, and also
/// when a property does not apply to the kind it was computed with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The full header line, including the leading '>'
    pub header: String,
    /// Uppercase sequence data
    pub sequence: String,
    /// Peptide view of a DNA/RNA record
    pub translated_sequence: Option<String>,
    /// Occurrences of each character in `sequence`
    pub alphabet_count: AlphabetCount,
    /// Length of `sequence`
    pub length: usize,
    pub gc_enrichment: f64,
    pub molecular_weight: f64,
    pub melting_point: f64,
    pub net_charge: f64,
    pub isoelectric_point: f64,
    /// Kind the computed fields were last produced with
    pub kind: Option<SequenceKind>,
}

impl Record {
    /// Creates a record holding only a header and its sequence.
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        let sequence = sequence.into();
        Self {
            header: header.into(),
            length: sequence.len(),
            sequence,
            ..Self::default()
        }
    }

    /// Returns the identifier: the header without '>' up to the first space.
    pub fn id(&self) -> &str {
        let header = self.header.strip_prefix('>').unwrap_or(&self.header);
        header.split_whitespace().next().unwrap_or(header)
    }

    /// Returns true once the property engine has run on this record.
    pub fn is_computed(&self) -> bool {
        self.kind.is_some()
    }

    /// Resets every computed field to its default.
    pub fn clear_properties(&mut self) {
        self.translated_sequence = None;
        self.alphabet_count = AlphabetCount::default();
        self.gc_enrichment = 0.0;
        self.molecular_weight = 0.0;
        self.melting_point = 0.0;
        self.net_charge = 0.0;
        self.isoelectric_point = 0.0;
        self.kind = None;
    }
}
