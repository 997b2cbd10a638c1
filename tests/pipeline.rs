//! End-to-end tests: file on disk → session → report.

use std::io::Write;
use std::time::Duration;

use approx::assert_relative_eq;
use tempfile::{Builder, NamedTempFile};

use seqstat::batch::BatchConfig;
use seqstat::fasta::FormatError;
use seqstat::model::SequenceKind;
use seqstat::properties::{peptide_net_charge, PI_TOLERANCE};
use seqstat::report::write_session_report;
use seqstat::session::{AnalysisSession, DuplicatePolicy, Insertion, SessionError};

fn fasta_file(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".fasta").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const DNA: &str = "\
; two DNA records
>seq1 first
ATGC
>seq2 second
ATGAAA
TAA
";

const PEPTIDE: &str = "\
>pep1
MKWVTFISLLFLFSSAYSRGVFRRDTHKSEIAHRFKDLGEEHFKGLVLIAFSQYLQQCPFDEHVKLVNELTEFAKTCVADESHAGCEKSLHTLFGDELCKVASLRETYGDMADCCEKQEPERNECFLSHKDDSPDLPKLKPDPNTLCDEFKADEKKFWGKYLYEIARRHPYFYAPELLYYANKYNGVFQECCQAEDKGACLLPKIETMREKVLASSARQRLRCASIQKFGERALKAWSVARLSQKFPKAEFVEVTKLVTDLTKVHKECCHGDLLECADDRADLAKYICDNQDTISSKLKECCDKPLLEKSHCIAEVEKDAIPENLPPLTADFAEDKDVCKNYQEAKDAFLGSFLYEYSRRHPEYAVSVLLRLAKEYEATLEECCAKDDPHACYSTVFDKLKHLVDEPQNLIKQNCDQFEKLGEYGFQNALIVRYTRKVPQVSTPTLVEVSRSLGKVGTRCCTKPESERMPCTEDYLSLILNRLCVLHEKTPVSEKVTKCCTESLVNRRPCFSALTPDETYVPKAFDEKLFTFHADICTLPDTEKQIKKQTALVELLKHKPKATEEQLKTVMENFVAFVDKCCAADDKEACFAVEGPKLVVSTQTALA
>pep2
DDEEDDAGHW
";

#[test]
fn test_dna_file_end_to_end() {
    let file = fasta_file(DNA);
    let mut session = AnalysisSession::new();
    let insertion = session
        .analyze_file(file.path(), SequenceKind::Dna, DuplicatePolicy::Skip)
        .unwrap();
    assert_eq!(insertion, Insertion::New);

    let source = AnalysisSession::source_id(file.path());
    let records = session.records(&source).unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.header, ">seq1 first");
    assert_eq!(first.length, 4);
    assert_relative_eq!(first.gc_enrichment, 0.5);
    assert_relative_eq!(first.molecular_weight, 1173.84, epsilon = 1e-9);

    let second = &records[1];
    assert_eq!(second.sequence, "ATGAAATAA");
    assert_eq!(second.translated_sequence.as_deref(), Some("MK*"));
    let expected = peptide_net_charge(&seqstat::alphabet::count("MK*"), 7.0);
    assert_relative_eq!(second.net_charge, expected);
}

#[test]
fn test_peptide_file_end_to_end() {
    let file = fasta_file(PEPTIDE);
    let mut session = AnalysisSession::new();
    session
        .analyze_file(file.path(), SequenceKind::Peptide, DuplicatePolicy::Skip)
        .unwrap();

    let source = AnalysisSession::source_id(file.path());
    for record in session.records(&source).unwrap() {
        assert_eq!(record.gc_enrichment, 0.0);
        assert_eq!(record.molecular_weight, 0.0);
        assert!(record.isoelectric_point > 0.0);
        let residual = peptide_net_charge(&record.alphabet_count, record.isoelectric_point);
        assert!(residual.abs() <= PI_TOLERANCE, "{}: {}", record.header, residual);
    }

    let acidic = &session.records(&source).unwrap()[1];
    assert!(acidic.net_charge < 0.0);
    assert!(acidic.isoelectric_point < 7.0);
}

#[test]
fn test_malformed_file_yields_no_records() {
    let file = fasta_file(">a\n>b\nACGT\n");
    let mut session = AnalysisSession::new();
    let result = session.analyze_file(file.path(), SequenceKind::Dna, DuplicatePolicy::Skip);

    assert!(matches!(
        result,
        Err(SessionError::Format { error: FormatError::MissingSequence(_), .. })
    ));
    assert!(session.is_empty());
}

#[test]
fn test_wrong_declared_type() {
    let file = fasta_file(PEPTIDE);
    let mut session = AnalysisSession::new();
    let result = session.analyze_file(file.path(), SequenceKind::Dna, DuplicatePolicy::Skip);

    assert!(matches!(
        result,
        Err(SessionError::Format { error: FormatError::AlphabetMismatch { kind: SequenceKind::Dna, .. }, .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let mut session = AnalysisSession::new();
    let result = session.analyze_file(
        "/nonexistent/dir/missing.fasta",
        SequenceKind::Dna,
        DuplicatePolicy::Skip,
    );
    assert!(matches!(
        result,
        Err(SessionError::Format { error: FormatError::Io(_), .. })
    ));
}

#[test]
fn test_same_file_twice() {
    let file = fasta_file(DNA);
    let mut session = AnalysisSession::new();
    session
        .analyze_file(file.path(), SequenceKind::Dna, DuplicatePolicy::Skip)
        .unwrap();
    let again = session
        .analyze_file(file.path(), SequenceKind::Dna, DuplicatePolicy::Skip)
        .unwrap();
    assert_eq!(again, Insertion::Skipped);
    assert_eq!(session.record_count(), 2);

    let appended = session
        .analyze_file(file.path(), SequenceKind::Ambiguous, DuplicatePolicy::Append)
        .unwrap();
    assert_eq!(appended, Insertion::Appended);
    assert_eq!(session.record_count(), 4);
    assert_eq!(session.len(), 1);
}

#[test]
fn test_batch_and_sequential_agree() {
    let file = fasta_file(DNA);

    let mut sequential = AnalysisSession::new();
    sequential
        .analyze_file(file.path(), SequenceKind::Dna, DuplicatePolicy::Skip)
        .unwrap();

    let mut batched = AnalysisSession::new();
    let config = BatchConfig {
        workers: Some(2),
        timeout: Duration::from_secs(60),
    };
    batched
        .analyze_file_batch(file.path(), SequenceKind::Dna, DuplicatePolicy::Skip, &config)
        .unwrap();

    let source = AnalysisSession::source_id(file.path());
    assert_eq!(sequential.records(&source), batched.records(&source));
}

#[test]
fn test_session_report() {
    let dna = fasta_file(DNA);
    let peptide = fasta_file(PEPTIDE);

    let mut session = AnalysisSession::new();
    session
        .analyze_file(dna.path(), SequenceKind::Dna, DuplicatePolicy::Skip)
        .unwrap();
    session
        .analyze_file(peptide.path(), SequenceKind::Peptide, DuplicatePolicy::Skip)
        .unwrap();

    let mut out = Vec::new();
    write_session_report(&mut out, &session).unwrap();
    let text = String::from_utf8(out).unwrap();

    let ids: Vec<&str> = text
        .lines()
        .filter_map(|l| l.strip_prefix("Sequence ID: "))
        .collect();
    assert_eq!(ids, vec![">seq1 first", ">seq2 second", ">pep1", ">pep2"]);
    assert!(text.contains("Isoelectric Point: "));
}
