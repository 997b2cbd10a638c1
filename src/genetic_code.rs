//! Standard genetic code and nucleotide translation.
//!
//! Translation always reads frame +1: triplets start at offset 0 and any
//! trailing 1-2 bases are dropped. RNA is read as DNA (`U` → `T`).

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

/// NCBI table 1, in TCAG codon order.
const STANDARD_NCBIEAA: &str = "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Symbol emitted for stop codons.
pub const STOP: char = '*';

/// A triplet that is not in the codon table.
///
/// Sequences are alphabet-checked before translation, so this signals a
/// programming error rather than bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Codon '{0}' is not in the genetic code table")]
    UnknownCodon(String),
}

/// A genetic code table for translating codons to amino acids.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    /// Name of the genetic code
    pub name: String,
    /// Codon to amino acid mapping (64 entries)
    codon_table: HashMap<String, char>,
}

impl GeneticCode {
    /// Builds a table from a 64-character NCBI amino acid string.
    fn new(name: &str, ncbieaa: &str) -> Self {
        let bases = ['T', 'C', 'A', 'G'];
        let mut codon_table = HashMap::with_capacity(64);

        // NCBI order: TTT, TTC, TTA, TTG, TCT, TCC, ... (Base1, Base2, Base3)
        let mut aminos = ncbieaa.chars();
        for &b1 in &bases {
            for &b2 in &bases {
                for &b3 in &bases {
                    if let Some(aa) = aminos.next() {
                        codon_table.insert(format!("{}{}{}", b1, b2, b3), aa);
                    }
                }
            }
        }

        Self {
            name: name.to_string(),
            codon_table,
        }
    }

    /// The standard code, built once and shared.
    pub fn standard() -> &'static GeneticCode {
        static STANDARD: OnceLock<GeneticCode> = OnceLock::new();
        STANDARD.get_or_init(|| GeneticCode::new("Standard", STANDARD_NCBIEAA))
    }

    /// Number of codons in the table.
    pub fn len(&self) -> usize {
        self.codon_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codon_table.is_empty()
    }

    /// Translates a single codon. `U` is read as `T`; lowercase is accepted.
    pub fn translate_codon(&self, codon: &str) -> Result<char, TranslationError> {
        let codon_dna: String = codon
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'U' => 'T',
                other => other,
            })
            .collect();

        self.codon_table
            .get(&codon_dna)
            .copied()
            .ok_or(TranslationError::UnknownCodon(codon_dna))
    }

    /// Translates a nucleotide sequence in frame +1.
    pub fn translate_sequence(&self, sequence: &str) -> Result<String, TranslationError> {
        let chars: Vec<char> = sequence.chars().collect();
        let mut result = String::with_capacity(chars.len() / 3);

        for codon in chars.chunks_exact(3) {
            let codon: String = codon.iter().collect();
            result.push(self.translate_codon(&codon)?);
        }

        Ok(result)
    }
}

/// Translates with the standard genetic code.
pub fn translate(sequence: &str) -> Result<String, TranslationError> {
    GeneticCode::standard().translate_sequence(sequence)
}
