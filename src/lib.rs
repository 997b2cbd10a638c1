//! # seqstat - Sequence Property Calculator
//!
//! Parses FASTA-like files and computes per-record physicochemical
//! properties: composition, GC content, molecular weight, melting point,
//! net charge and isoelectric point.
//!
//! ## Architecture
//!
//! - `model`: Records and sequence kinds
//! - `fasta`: FASTA parsing and alphabet validation
//! - `alphabet`: Character frequency counting
//! - `genetic_code`: Codon table and nucleotide translation
//! - `properties`: Per-kind formulas
//! - `engine`: Fills a record's computed fields
//! - `batch`: Worker pool for computing many records
//! - `session`: Caller-owned collection of analyzed sources
//! - `report`: Plain-text output

pub mod alphabet;
pub mod batch;
pub mod engine;
pub mod fasta;
pub mod genetic_code;
pub mod model;
pub mod properties;
pub mod report;
pub mod session;
