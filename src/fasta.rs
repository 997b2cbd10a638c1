//! FASTA record parser.
//!
//! This module reads FASTA-like files into `Record`s, checking every
//! sequence line against the alphabet of the declared `SequenceKind` while
//! streaming. A malformed file yields an error and no records at all.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ; comment lines are ignored
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::model::{Record, SequenceKind};

const DNA_ALPHABET: &str = "ACGT";
const RNA_ALPHABET: &str = "ACGU";
const PEPTIDE_ALPHABET: &str = "ACDEFGHIKLMNPQRSTVWY";
const AMBIGUOUS_ALPHABET: &str = "ACDEFGHIKLMNPQRSTUVWY";

/// A peptide line needs more distinct residues than this.
const MIN_PEPTIDE_DISTINCT: usize = 4;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("No header line ('>') found")]
    NoHeaderFound,

    #[error("Header '{0}' has no sequence")]
    MissingSequence(String),

    #[error("Line does not match the {kind} alphabet: {line}")]
    AlphabetMismatch { kind: SequenceKind, line: String },
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FormatError>;

/// Characters allowed in a sequence line of the given kind.
pub fn legal_alphabet(kind: SequenceKind) -> &'static str {
    match kind {
        SequenceKind::Dna => DNA_ALPHABET,
        SequenceKind::Rna => RNA_ALPHABET,
        SequenceKind::Peptide => PEPTIDE_ALPHABET,
        SequenceKind::Ambiguous => AMBIGUOUS_ALPHABET,
    }
}

/// Checks an uppercase sequence line against the alphabet of `kind`.
///
/// Peptide lines must also hold more than four distinct residues, which
/// keeps short nucleotide-looking lines out of peptide files.
pub fn is_valid_line(kind: SequenceKind, line: &str) -> bool {
    let alphabet = legal_alphabet(kind);
    if !line.chars().all(|c| alphabet.contains(c)) {
        return false;
    }
    if kind == SequenceKind::Peptide {
        let distinct: HashSet<char> = line.chars().collect();
        return distinct.len() > MIN_PEPTIDE_DISTINCT;
    }
    true
}

/// Where the parser stands relative to the last header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    BeforeFirstHeader,
    /// Header seen, no sequence line yet
    InHeader,
    /// At least one sequence line since the last header
    InSequence,
}

/// Line-driven parser state machine.
///
/// Finalized records live in `records`; the entry being filled is always
/// `current`, so committing never has to look anything up.
#[derive(Debug)]
pub struct RecordParser {
    kind: SequenceKind,
    state: ParserState,
    records: Vec<Record>,
    current: Option<String>,
    buffer: String,
    line_number: usize,
}

impl RecordParser {
    /// Creates a parser validating against `kind`.
    pub fn new(kind: SequenceKind) -> Self {
        Self {
            kind,
            state: ParserState::BeforeFirstHeader,
            records: Vec::new(),
            current: None,
            buffer: String::new(),
            line_number: 0,
        }
    }

    /// Feeds one line of input.
    pub fn push_line(&mut self, line: &str) -> FastaResult<()> {
        self.line_number += 1;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            return Ok(());
        }

        if line.starts_with('>') {
            if self.state == ParserState::InHeader {
                return Err(FormatError::MissingSequence(self.current.take().unwrap_or_default()));
            }
            self.commit();
            self.current = Some(line.to_string());
            self.state = ParserState::InHeader;
        } else if line.starts_with(';') {
            debug!("Skipping comment at line {}", self.line_number);
        } else {
            if self.state == ParserState::BeforeFirstHeader {
                return Err(FormatError::NoHeaderFound);
            }

            let sequence: String = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_ascii_uppercase())
                .collect();

            if !is_valid_line(self.kind, &sequence) {
                return Err(FormatError::AlphabetMismatch {
                    kind: self.kind,
                    line: line.to_string(),
                });
            }

            self.buffer.push_str(&sequence);
            self.state = ParserState::InSequence;
        }

        Ok(())
    }

    /// Ends the input and returns the records in file order.
    pub fn finish(mut self) -> FastaResult<Vec<Record>> {
        match self.state {
            ParserState::BeforeFirstHeader => Err(FormatError::NoHeaderFound),
            ParserState::InHeader => Err(FormatError::MissingSequence(
                self.current.take().unwrap_or_default(),
            )),
            ParserState::InSequence => {
                self.commit();
                Ok(self.records)
            }
        }
    }

    /// Moves the in-progress header and buffer into a finished record.
    fn commit(&mut self) {
        if let Some(header) = self.current.take() {
            let sequence = std::mem::take(&mut self.buffer);
            self.records.push(Record::new(header, sequence));
        }
    }
}

/// Parses already-split lines.
pub fn parse_records<I, S>(lines: I, kind: SequenceKind) -> FastaResult<Vec<Record>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = RecordParser::new(kind);
    for line in lines {
        parser.push_line(line.as_ref())?;
    }
    parser.finish()
}

/// Parses FASTA content from a reader.
pub fn parse_reader<R: BufRead>(reader: R, kind: SequenceKind) -> FastaResult<Vec<Record>> {
    let mut parser = RecordParser::new(kind);
    for line_result in reader.lines() {
        parser.push_line(&line_result?)?;
    }
    parser.finish()
}

/// Parses FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_str(content: &str, kind: SequenceKind) -> FastaResult<Vec<Record>> {
    parse_records(content.lines(), kind)
}

/// Parses a FASTA file.
///
/// # Examples
///
/// ```no_run
/// use seqstat::fasta::parse_file;
/// use seqstat::model::SequenceKind;
///
/// let records = parse_file("sequences.fasta", SequenceKind::Dna).unwrap();
/// println!("Loaded {} records", records.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P, kind: SequenceKind) -> FastaResult<Vec<Record>> {
    let file = File::open(&path)?;
    let records = parse_reader(BufReader::new(file), kind)?;
    info!(
        "Parsed {} {} records from {}",
        records.len(),
        kind,
        path.as_ref().display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fasta() {
        let content = ">seq1\nACGT\n>seq2\nTGCA\n";
        let records = parse_str(content, SequenceKind::Dna).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header, ">seq1");
        assert_eq!(records[0].sequence, "ACGT");
        assert_eq!(records[1].header, ">seq2");
        assert_eq!(records[1].sequence, "TGCA");
    }

    #[test]
    fn test_parse_multiline_sequence() {
        let content = ">seq1\nACGT\nTGCA\nAAAA\n";
        let records = parse_str(content, SequenceKind::Dna).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, "ACGTTGCAAAAA");
        assert_eq!(records[0].length, 12);
    }

    #[test]
    fn test_header_keeps_description() {
        let content = ">seq1 This is a description\nACGT\n";
        let records = parse_str(content, SequenceKind::Dna).unwrap();

        assert_eq!(records[0].header, ">seq1 This is a description");
        assert_eq!(records[0].id(), "seq1");
    }

    #[test]
    fn test_parse_with_empty_lines_and_comments() {
        let content = "; leading comment\n>seq1\nACGT\n\n; inside\n>seq2\n\nTGCA\n;trailing\n";
        let records = parse_str(content, SequenceKind::Dna).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, "ACGT");
        assert_eq!(records[1].sequence, "TGCA");
    }

    #[test]
    fn test_comment_does_not_count_as_sequence() {
        let content = ">seq1\n; only a comment\n>seq2\nACGT\n";
        let result = parse_str(content, SequenceKind::Dna);
        assert!(matches!(result, Err(FormatError::MissingSequence(h)) if h == ">seq1"));
    }

    #[test]
    fn test_lowercase_is_uppercased() {
        let content = ">seq1\nacgt\n";
        let records = parse_str(content, SequenceKind::Dna).unwrap();
        assert_eq!(records[0].sequence, "ACGT");
    }

    #[test]
    fn test_duplicate_headers_are_kept() {
        let content = ">dup\nAC\n>dup\nGT\n";
        let records = parse_str(content, SequenceKind::Dna).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, "AC");
        assert_eq!(records[1].sequence, "GT");
    }

    #[test]
    fn test_empty_input() {
        let result = parse_str("", SequenceKind::Dna);
        assert!(matches!(result, Err(FormatError::NoHeaderFound)));
    }

    #[test]
    fn test_sequence_without_header() {
        let result = parse_str("ACGT\n", SequenceKind::Dna);
        assert!(matches!(result, Err(FormatError::NoHeaderFound)));
    }

    #[test]
    fn test_double_header() {
        let result = parse_str(">a\n>b\nACGT\n", SequenceKind::Dna);
        assert!(matches!(result, Err(FormatError::MissingSequence(h)) if h == ">a"));
    }

    #[test]
    fn test_header_at_end_of_input() {
        let result = parse_str(">a\nACGT\n>b\n", SequenceKind::Dna);
        assert!(matches!(result, Err(FormatError::MissingSequence(h)) if h == ">b"));
    }

    #[test]
    fn test_alphabet_mismatch() {
        let result = parse_str(">a\nACGU\n", SequenceKind::Dna);
        assert!(matches!(
            result,
            Err(FormatError::AlphabetMismatch { kind: SequenceKind::Dna, ref line }) if line == "ACGU"
        ));

        let result = parse_str(">a\nACGT\n", SequenceKind::Rna);
        assert!(matches!(result, Err(FormatError::AlphabetMismatch { .. })));
    }

    #[test]
    fn test_peptide_needs_more_than_four_distinct() {
        assert!(!is_valid_line(SequenceKind::Peptide, "ACGT"));
        assert!(!is_valid_line(SequenceKind::Peptide, "KKKKKKKK"));
        assert!(is_valid_line(SequenceKind::Peptide, "ACGTK"));
        assert!(is_valid_line(SequenceKind::Peptide, "MKWVTFISLL"));
        // X is not a standard residue
        assert!(!is_valid_line(SequenceKind::Peptide, "MKWVTX"));
    }

    #[test]
    fn test_ambiguous_accepts_union() {
        assert!(is_valid_line(SequenceKind::Ambiguous, "ACGU"));
        assert!(is_valid_line(SequenceKind::Ambiguous, "ACGT"));
        assert!(is_valid_line(SequenceKind::Ambiguous, "KK"));
        assert!(!is_valid_line(SequenceKind::Ambiguous, "ACGN"));
    }

    #[test]
    fn test_parse_reader_matches_parse_str() {
        let content = ">s\nACG\nTTA\n";
        let from_reader = parse_reader(content.as_bytes(), SequenceKind::Dna).unwrap();
        let from_str = parse_str(content, SequenceKind::Dna).unwrap();
        assert_eq!(from_reader, from_str);
    }

    #[test]
    fn test_failure_is_atomic() {
        // The first record is fine but the file as a whole is rejected
        let result = parse_str(">ok\nACGT\n>bad\nACGX\n", SequenceKind::Dna);
        assert!(result.is_err());
    }
}
