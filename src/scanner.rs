//! Per-file line counting.

use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::classifier::{CommentSymbols, LineClassifier, LineKind};
use crate::languages::{LanguageTable, UNSUPPORTED_FILE};

const READ_FAIL_TAG: &str = "__tloc_read_fail__";
const FAULT_ENV_VAR: &str = "TLOC_ENABLE_FAULTS";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    pub lines: u64,
    pub blank: u64,
    pub comment: u64,
}

impl LineCounts {
    pub fn code(&self) -> u64 {
        self.lines - self.blank - self.comment
    }

    fn record(&mut self, kind: LineKind) {
        self.lines += 1;
        match kind {
            LineKind::Blank => self.blank += 1,
            LineKind::Comment => self.comment += 1,
            LineKind::Code => {}
        }
    }
}

/// Result of scanning one file.
///
/// `counts` is `None` when the file could not be read. That is different
/// from an empty file, which has `Some` all-zero counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub language: String,
    pub counts: Option<LineCounts>,
}

impl FileRecord {
    pub fn degraded(path: &Path) -> Self {
        FileRecord {
            path: path.to_path_buf(),
            language: UNSUPPORTED_FILE.to_string(),
            counts: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.counts.is_none()
    }
}

/// Reads lines as ISO-8859-1, so every byte decodes to the code point of the
/// same value and no input is rejected.
struct Latin1LineReader<R> {
    reader: BufReader<R>,
    buffer: Vec<u8>,
}

impl<R: Read> Latin1LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: Vec::with_capacity(8 * 1024),
        }
    }
}

impl<R: Read> Latin1LineReader<R> {
    /// Appends the next line's bytes to `buffer` and consumes its terminator.
    /// `\n`, `\r\n` and a lone `\r` all end a line. Returns `false` at end of
    /// input when nothing was read.
    fn read_line_bytes(&mut self) -> io::Result<bool> {
        let mut read_any = false;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok(read_any);
            }
            read_any = true;

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    let terminator = available[pos];
                    self.buffer.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    if terminator == b'\r' {
                        self.skip_newline()?;
                    }
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buffer.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }

    // The `\n` of a `\r\n` pair may only arrive with the next fill.
    fn skip_newline(&mut self) -> io::Result<()> {
        loop {
            match self.reader.fill_buf() {
                Ok(available) => {
                    if available.first() == Some(&b'\n') {
                        self.reader.consume(1);
                    }
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R: Read> Iterator for Latin1LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.read_line_bytes() {
            Ok(false) => None,
            Ok(true) => Some(Ok(self.buffer.iter().map(|&b| char::from(b)).collect())),
            Err(err) => Some(Err(err)),
        }
    }
}

fn failure_injection_enabled() -> bool {
    cfg!(test) || std::env::var_os(FAULT_ENV_VAR).is_some()
}

fn should_simulate_read_failure(path: &Path) -> bool {
    failure_injection_enabled()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name == READ_FAIL_TAG)
            .unwrap_or(false)
}

fn open_file(path: &Path) -> io::Result<fs::File> {
    if should_simulate_read_failure(path) {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "simulated open failure",
        ));
    }
    fs::File::open(path)
}

/// Classify every line of `reader`, in order, with a fresh block-comment state.
pub fn count_reader<R: Read>(reader: R, symbols: &CommentSymbols) -> io::Result<LineCounts> {
    let mut classifier = LineClassifier::new(symbols);
    let mut counts = LineCounts::default();
    for line in Latin1LineReader::new(reader) {
        counts.record(classifier.classify(&line?));
    }
    Ok(counts)
}

pub fn count_file(path: &Path, symbols: &CommentSymbols) -> io::Result<LineCounts> {
    count_reader(open_file(path)?, symbols)
}

/// Scan one file. Read failures never propagate; they produce a degraded record.
pub fn scan_file(path: &Path, languages: &LanguageTable, symbols: &CommentSymbols) -> FileRecord {
    match count_file(path, symbols) {
        Ok(counts) => FileRecord {
            path: path.to_path_buf(),
            language: languages.classify_path(path).to_string(),
            counts: Some(counts),
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read file");
            FileRecord::degraded(path)
        }
    }
}
