//! marc_grep - Extract fields and subfields from binary MARC files
//!
//! Reads every record of a MARC-21 file, applies a field reference such as
//! `245`, `859aw` or `L[7]=s;245a`, and prints the selected values one per
//! line. A summary of matching records is printed to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use marcutil::{FieldQuery, MarcReader, RecordStructureValidator};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Extract fields and subfields from binary MARC files
#[derive(Parser, Debug)]
#[command(name = "marc_grep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Binary MARC file to read
    input: PathBuf,

    /// Field reference: `[L[offset]=c;]TAG[codes][:TAG[codes]...]`
    field_reference: String,

    /// Only print values matching this regular expression
    #[arg(short, long, value_name = "REGEX")]
    matching: Option<String>,

    /// Recompose each record and check its structure
    #[arg(long)]
    check: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Record counts for the summary line.
#[derive(Debug, Default)]
struct Summary {
    records: usize,
    matched: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut query = FieldQuery::parse(&cli.field_reference)
        .with_context(|| format!("Invalid field reference: {}", cli.field_reference))?;
    if let Some(pattern) = &cli.matching {
        query = query.with_value_pattern(pattern)?;
    }
    debug!(?query, "parsed field reference");

    let summary = grep_file(&cli, &query)?;

    eprintln!(
        "Matched {} records of {} overall records.",
        summary.matched, summary.records
    );
    Ok(())
}

fn grep_file(cli: &Cli, query: &FieldQuery) -> Result<Summary> {
    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open: {}", cli.input.display()))?;
    info!("Reading {}", cli.input.display());

    let mut reader = MarcReader::new(BufReader::new(file));
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut summary = Summary::default();

    while let Some(record) = reader
        .read_record()
        .with_context(|| format!("Failed to read record {}", summary.records + 1))?
    {
        summary.records += 1;

        if cli.check {
            let bytes = record.to_bytes().with_context(|| {
                format!("Failed to recompose record {}", summary.records)
            })?;
            RecordStructureValidator::validate(&bytes).with_context(|| {
                format!("Recomposed record {} is malformed", summary.records)
            })?;
        }

        let Some(hits) = query.search(&record) else {
            continue;
        };
        if !query.references().is_empty() && hits.is_empty() {
            continue;
        }

        summary.matched += 1;
        for hit in &hits {
            hit.write_line(&mut out)
                .context("Failed to write to stdout")?;
        }
    }

    out.flush().context("Failed to write to stdout")?;
    info!(records = summary.records, matched = summary.matched, "done");
    Ok(summary)
}
