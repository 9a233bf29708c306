//! Aggregation and rendering of scan results.
//!
//! Three sinks are involved and each message names its target explicitly:
//! the fixed-width text report, the comma-delimited table, and the console
//! that receives the closing summary.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::*;
use tracing::debug;

use crate::classifier::CommentSymbols;
use crate::languages::LanguageTable;
use crate::scanner::{scan_file, FileRecord};

pub const HEADERS: [&str; 6] = ["Filename", "Language", "lines", "blank", "comment", "code"];

const NAME_WIDTH: usize = 106;
const LANG_WIDTH: usize = 23;
const NUM_WIDTH: usize = 8;
const BORDER_WIDTH: usize = 178;

/// Run-wide totals, accumulated in scan order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTotals {
    pub files: u64,
    pub lines: u64,
    pub blank: u64,
    pub comment: u64,
}

impl RunTotals {
    /// Every record counts as a file; degraded ones add no lines.
    pub fn record(&mut self, record: &FileRecord) {
        self.files += 1;
        if let Some(counts) = record.counts {
            self.lines += counts.lines;
            self.blank += counts.blank;
            self.comment += counts.comment;
        }
    }

    pub fn code(&self) -> u64 {
        self.lines - self.blank - self.comment
    }
}

/// Truncates to `max_len` characters by keeping the tail and prefixing "...".
fn truncate_start(s: &str, max_len: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_len {
        Cow::Borrowed(s)
    } else {
        let skip_count = char_count - (max_len - 3);
        let truncated: String = s.chars().skip(skip_count).collect();
        Cow::Owned(format!("...{}", truncated))
    }
}

fn format_row(name: &str, language: &str, numbers: &[String; 4]) -> String {
    let mut row = format!(
        "|  {:<name_w$} |  {:<lang_w$} |",
        truncate_start(name, NAME_WIDTH),
        truncate_start(language, LANG_WIDTH),
        name_w = NAME_WIDTH,
        lang_w = LANG_WIDTH
    );
    for n in numbers {
        row.push_str(&format!("{:>width$} |", n, width = NUM_WIDTH));
    }
    row
}

/// Numeric columns of a record; empty strings for a degraded record.
fn number_fields(record: &FileRecord) -> [String; 4] {
    match record.counts {
        Some(c) => [
            c.lines.to_string(),
            c.blank.to_string(),
            c.comment.to_string(),
            c.code().to_string(),
        ],
        None => Default::default(),
    }
}

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_csv_row<W: Write, S: AsRef<str>>(out: &mut W, fields: &[S]) -> io::Result<()> {
    let line = fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    write!(out, "{}\r\n", line)
}

fn totals_lines(totals: &RunTotals) -> [(&'static str, u64); 5] {
    [
        ("Files:         ", totals.files),
        ("Lines:         ", totals.lines),
        ("Blank lines:   ", totals.blank),
        ("Comment lines: ", totals.comment),
        ("Code lines:    ", totals.code()),
    ]
}

/// Writes report and table rows as records arrive and keeps the running totals.
pub struct Reporter<R: Write, T: Write> {
    report: R,
    table: T,
    totals: RunTotals,
}

impl<R: Write, T: Write> Reporter<R, T> {
    /// Writes the header of both outputs.
    pub fn new(mut report: R, mut table: T) -> io::Result<Self> {
        write_csv_row(&mut table, &HEADERS)?;
        writeln!(report, "{}", "-".repeat(BORDER_WIDTH))?;
        let [name, language, rest @ ..] = HEADERS;
        writeln!(
            report,
            "{}",
            format_row(name, language, &rest.map(String::from))
        )?;
        writeln!(report, "{}", "-".repeat(BORDER_WIDTH))?;
        Ok(Reporter {
            report,
            table,
            totals: RunTotals::default(),
        })
    }

    pub fn record(&mut self, record: &FileRecord) -> io::Result<()> {
        let numbers = number_fields(record);
        let path = record.path.to_string_lossy();
        write_csv_row(
            &mut self.table,
            &[
                &*path,
                record.language.as_str(),
                numbers[0].as_str(),
                numbers[1].as_str(),
                numbers[2].as_str(),
                numbers[3].as_str(),
            ],
        )?;

        let name = record
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or(path);
        writeln!(
            self.report,
            "{}",
            format_row(&name, &record.language, &numbers)
        )?;

        self.totals.record(record);
        Ok(())
    }

    /// Appends the totals block to the report (never to the table) and flushes
    /// both outputs.
    pub fn finish(mut self) -> io::Result<RunTotals> {
        writeln!(self.report, "{}", "-".repeat(BORDER_WIDTH))?;
        writeln!(self.report)?;
        writeln!(self.report, "Totals")?;
        writeln!(self.report, "{}", "-".repeat(20))?;
        for (label, value) in totals_lines(&self.totals) {
            writeln!(self.report, "{}{}", label, value)?;
        }
        self.report.flush()?;
        self.table.flush()?;
        Ok(self.totals)
    }
}

/// Scan `files` in the given order, feeding every record to `reporter`.
pub fn scan_files<R: Write, T: Write>(
    files: &[PathBuf],
    languages: &LanguageTable,
    symbols: &CommentSymbols,
    mut reporter: Reporter<R, T>,
) -> io::Result<RunTotals> {
    let mut degraded = 0usize;
    for path in files {
        let record = scan_file(path, languages, symbols);
        if record.is_degraded() {
            degraded += 1;
        }
        reporter.record(&record)?;
    }
    debug!(files = files.len(), degraded, "scan complete");
    reporter.finish()
}

/// The short summary printed to the console once both outputs are written.
pub fn write_summary<W: Write + ?Sized>(console: &mut W, totals: &RunTotals) -> io::Result<()> {
    writeln!(console)?;
    writeln!(console, "{}", "Summary".blue().bold())?;
    writeln!(console, "{}", "-".repeat(20))?;
    for (label, value) in totals_lines(totals) {
        writeln!(console, "{}{}", label, value.to_string().bright_yellow())?;
    }
    Ok(())
}
