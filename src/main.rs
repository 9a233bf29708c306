//! Line counting tool
//!
//! Walks a folder, classifies every line of every file as blank, comment or
//! code using a fixed set of comment markers, and writes a fixed-width report
//! (`result.txt`) plus a comma-delimited table (`result.csv`) to the current
//! directory before printing a short summary.

mod classifier;
mod error;
mod languages;
mod report;
mod scanner;
mod walk;

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use colored::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::classifier::CommentSymbols;
use crate::error::{exit_code, TlocError};
use crate::languages::LanguageTable;
use crate::report::{scan_files, write_summary, Reporter, RunTotals};
use crate::walk::collect_files;

const REPORT_FILE: &str = "result.txt";
const TABLE_FILE: &str = "result.csv";
const LOG_ENV_VAR: &str = "TLOC_LOG";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Counts total, blank, comment and code lines of every file in a folder"
)]
struct Args {
    /// Folder path to conduct line of code count.
    #[arg(short, long)]
    folder: PathBuf,

    /// Exclude files whose name contains any of these substrings (e.g. .git .vscode).
    #[arg(short = 'x', long, num_args = 1.., action = ArgAction::Append)]
    exclude: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let stdout = io::stdout();
    let mut console = stdout.lock();
    let result = env::current_dir()
        .map_err(TlocError::from)
        .and_then(|output_dir| run_cli(&args, &mut console, &output_dir));

    if let Err(err) = result {
        let _ = console.flush();
        eprintln!("{}: {}", "Error".red().bold(), err);
        process::exit(exit_code(&err));
    }
}

/// One complete run: discover, scan, write both outputs into `output_dir`,
/// then print the summary to `console`.
fn run_cli<W: Write + ?Sized>(
    args: &Args,
    console: &mut W,
    output_dir: &Path,
) -> Result<RunTotals, TlocError> {
    writeln!(console, "Scanning files...")?;
    let files = collect_files(&args.folder, &args.exclude);
    if files.is_empty() {
        writeln!(console, "No files found.")?;
        return Err(TlocError::NoFilesFound(args.folder.clone()));
    }

    let languages = LanguageTable::bundled()?;
    debug!(
        files = files.len(),
        extensions = languages.len(),
        "starting scan"
    );
    writeln!(console, "Loading...")?;

    let report = BufWriter::new(File::create(output_dir.join(REPORT_FILE))?);
    let table = BufWriter::new(File::create(output_dir.join(TABLE_FILE))?);
    let reporter = Reporter::new(report, table)?;
    let totals = scan_files(&files, &languages, &CommentSymbols::default(), reporter)?;

    writeln!(console, "{}", "Success!".green())?;
    write_summary(console, &totals)?;
    Ok(totals)
}
