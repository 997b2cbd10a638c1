//! seqstat - Sequence Property Calculator
//!
//! ## Usage
//!
//! ```bash
//! seqstat -i dna.fasta -t dna
//! seqstat -i a.fa b.fa -t dna peptide -o report.txt
//! seqstat -i big.fa -t rna -j 8 --timeout 600
//! ```
//!
//! ## Sequence Types
//!
//! - `dna`, `rna`: GC enrichment, molecular weight, melting point (DNA),
//!   and charge/pI of the translated peptide
//! - `peptide`: net charge and isoelectric point
//! - `ambiguous`: composition only

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};

use seqstat::batch::BatchConfig;
use seqstat::model::SequenceKind;
use seqstat::report::write_session_report;
use seqstat::session::{AnalysisSession, DuplicatePolicy};

/// seqstat - Composition and physicochemical properties of FASTA records
///
/// Every input file needs a sequence type. Use "ambiguous" if it is not known.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input FASTA files
    #[arg(short = 'i', long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Sequence type of each input file (dna, rna, peptide, ambiguous)
    #[arg(short = 't', long = "sequence-type", required = true, num_args = 1..)]
    types: Vec<String>,

    /// Report file. Use "-" for stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,

    /// Compute on a worker pool of this size (clamped to the available CPUs)
    #[arg(short = 'j', long = "workers")]
    workers: Option<usize>,

    /// Seconds to wait for a worker pool before giving up on pending records
    #[arg(long = "timeout", default_value_t = 1800)]
    timeout: u64,

    /// Keep records of a file given twice instead of skipping it
    #[arg(long = "keep-duplicates")]
    keep_duplicates: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.inputs.len() != args.types.len() {
        anyhow::bail!(
            "Please provide one sequence type per input file (got {} files, {} types)",
            args.inputs.len(),
            args.types.len()
        );
    }

    let kinds = args
        .types
        .iter()
        .map(|t| t.parse::<SequenceKind>())
        .collect::<Result<Vec<_>, _>>()?;

    let policy = if args.keep_duplicates {
        DuplicatePolicy::Append
    } else {
        DuplicatePolicy::Skip
    };
    let batch_config = args.workers.map(|workers| BatchConfig {
        workers: Some(workers),
        timeout: Duration::from_secs(args.timeout),
    });

    let mut session = AnalysisSession::new();
    for (path, kind) in args.inputs.iter().zip(kinds) {
        let insertion = match &batch_config {
            Some(config) => session.analyze_file_batch(path, kind, policy, config),
            None => session.analyze_file(path, kind, policy),
        }
        .with_context(|| format!("Failed to analyze {}", path.display()))?;
        info!("{}: {:?}", path.display(), insertion);
    }

    if args.output == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_session_report(&mut handle, &session)?;
        handle.flush()?;
    } else {
        let file = std::fs::File::create(&args.output)
            .with_context(|| format!("Failed to create {}", args.output))?;
        let mut writer = io::BufWriter::new(file);
        write_session_report(&mut writer, &session)?;
        writer.flush()?;
        eprintln!(
            "Wrote {} records from {} files to {}",
            session.record_count(),
            session.len(),
            args.output
        );
    }

    Ok(())
}
