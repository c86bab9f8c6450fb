//! Sales Analytics CLI
//!
//! Reads a pipe-delimited sales file, validates and optionally filters it,
//! and prints a sales report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- data/sales_data.txt --region North --min-amount 1000
//! cargo run -- data/sales_data.txt --output cleaned.txt --report report.txt
//! ```
//!
//! Progress goes to stderr; the report goes to stdout unless `--report` is
//! given.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use clap::Parser;
use sales_analytics::{
    parse_transactions, read_lines_or_empty, validate_and_filter, write_report,
    write_transactions, FilterCriteria, Money, Result, SalesReport, TextEncoding,
    DEFAULT_ENCODINGS, DEFAULT_TOP_N,
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

const STEPS: usize = 7;

#[derive(Parser, Debug)]
#[command(name = "sales-analytics", version, about = "Clean, validate and summarize sales transactions")]
struct Args {
    /// Pipe-delimited sales file
    input: PathBuf,

    /// Keep only transactions from this region
    #[arg(long)]
    region: Option<String>,

    /// Keep only transactions worth at least this amount
    #[arg(long)]
    min_amount: Option<Money>,

    /// Keep only transactions worth at most this amount
    #[arg(long)]
    max_amount: Option<Money>,

    /// Number of products in the top-products table
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Encoding to try, in order (repeatable; default utf-8, latin-1, cp1252)
    #[arg(long = "encoding")]
    encodings: Vec<TextEncoding>,

    /// Write the cleaned transactions to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let encodings = if args.encodings.is_empty() {
        DEFAULT_ENCODINGS.to_vec()
    } else {
        args.encodings.clone()
    };

    eprintln!("[1/{}] Reading sales data...", STEPS);
    let lines = read_lines_or_empty(&args.input, &encodings);
    eprintln!("Read {} transactions", lines.len());

    eprintln!("[2/{}] Parsing and cleaning data...", STEPS);
    let parsed = parse_transactions(&lines);
    eprintln!(
        "Parsed {} records ({} skipped)",
        parsed.records.len(),
        parsed.skipped()
    );

    let criteria = FilterCriteria {
        region: args.region.clone(),
        min_amount: args.min_amount,
        max_amount: args.max_amount,
    };
    let outcome = validate_and_filter(&parsed.records, &criteria);

    eprintln!("[3/{}] Filter options available:", STEPS);
    let options = &outcome.options;
    let regions: Vec<&str> = options.regions.iter().map(String::as_str).collect();
    eprintln!("Regions: {}", regions.join(", "));
    if let Some((min, max)) = options.amount_range {
        eprintln!("Amount range: {} - {}", min, max);
    }

    eprintln!("[4/{}] Validating transactions...", STEPS);
    let summary = &outcome.summary;
    eprintln!("Valid: {} | Invalid: {}", summary.valid(), outcome.invalid);
    if criteria != FilterCriteria::default() {
        eprintln!("After region filter: {}", summary.after_region());
        eprintln!("After min amount filter: {}", summary.after_min_amount());
        eprintln!("After max amount filter: {}", summary.final_count);
    }

    eprintln!("[5/{}] Analyzing sales data...", STEPS);
    let report = SalesReport::build(&outcome, args.top);

    eprintln!("[6/{}] Saving cleaned data...", STEPS);
    match &args.output {
        Some(path) => {
            write_transactions(BufWriter::new(File::create(path)?), &outcome.transactions)?;
            eprintln!("Saved to: {}", path.display());
        }
        None => eprintln!("Skipped (no --output given)"),
    }

    eprintln!("[7/{}] Generating report...", STEPS);
    match &args.report {
        Some(path) => {
            write_report(BufWriter::new(File::create(path)?), &report)?;
            eprintln!("Report saved to: {}", path.display());
        }
        None => write_report(io::stdout().lock(), &report)?,
    }

    Ok(())
}
