//! Plain-text report of computed records.
//!
//! Properties equal to `0.0` are left out, so a property that does not
//! apply to a record's kind and one that computed to exactly zero look
//! the same in the report.

use std::io::{self, Write};

use crate::model::Record;
use crate::session::AnalysisSession;

/// Column width for translated sequences.
pub const TRANSLATION_WIDTH: usize = 60;

/// Writes one record.
pub fn write_record<W: Write>(writer: &mut W, record: &Record) -> io::Result<()> {
    writeln!(writer, "Sequence ID: {}", record.header)?;
    write!(writer, "Sequence Length: {};", record.length)?;
    if record.molecular_weight != 0.0 {
        write!(writer, "Molecular Weight: {:.2}g/mole;", record.molecular_weight)?;
    }
    if record.melting_point != 0.0 {
        write!(writer, "Melting Point: {:.2}°C;", record.melting_point)?;
    }
    if record.gc_enrichment != 0.0 {
        write!(writer, "GC Enrichment: {:.2}%;", record.gc_enrichment * 100.0)?;
    }
    if record.net_charge != 0.0 {
        write!(writer, "Net Charge(at pH 7): {:.2};", record.net_charge)?;
    }
    if record.isoelectric_point != 0.0 {
        write!(writer, "Isoelectric Point: {:.2}pH;", record.isoelectric_point)?;
    }
    writeln!(writer)?;

    if let Some(translated) = record.translated_sequence.as_deref().filter(|t| !t.is_empty()) {
        writeln!(writer, "Translation:")?;
        let options = textwrap::Options::new(TRANSLATION_WIDTH).break_words(true);
        for line in textwrap::wrap(translated, options) {
            writeln!(writer, "{}", line)?;
        }
    }
    Ok(())
}

/// Writes records in order.
pub fn write_report<W: Write>(writer: &mut W, records: &[Record]) -> io::Result<()> {
    for record in records {
        write_record(writer, record)?;
    }
    Ok(())
}

/// Writes every source of a session, in insertion order.
pub fn write_session_report<W: Write>(writer: &mut W, session: &AnalysisSession) -> io::Result<()> {
    for (_, records) in session.iter() {
        write_report(writer, records)?;
    }
    Ok(())
}
