//! Per-line blank/comment/code classification.
//!
//! Comment detection is purely textual: a trimmed line is a comment if it
//! starts with one of the configured markers, and a block comment stays open
//! until a line ends with a closing marker. Nothing is tokenized, so markers
//! inside string literals or after code are not recognised.

/// Literal comment markers matched against trimmed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSymbols {
    pub line: &'static [&'static str],
    pub block_open: &'static [&'static str],
    pub block_close: &'static [&'static str],
}

impl Default for CommentSymbols {
    fn default() -> Self {
        CommentSymbols {
            line: &["//", "#", "--", "%", "'"],
            block_open: &["'''", "/*", "=begin", "{-", "<!--"],
            block_close: &["'''", "*/", "=end", "-}", "-->"],
        }
    }
}

impl CommentSymbols {
    fn starts_line_comment(&self, trimmed: &str) -> bool {
        self.line.iter().any(|m| trimmed.starts_with(m))
    }

    fn opens_block(&self, trimmed: &str) -> bool {
        self.block_open.iter().any(|m| trimmed.starts_with(m))
    }

    fn closes_block(&self, trimmed: &str) -> bool {
        self.block_close.iter().any(|m| trimmed.ends_with(m))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InBlockComment,
}

/// Unicode `White_Space` plus the ASCII information separators 0x1C..=0x1F.
fn is_line_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Classifies the lines of a single file, in order.
///
/// Block comment state is carried from one line to the next, so a fresh
/// classifier must be used for every file.
#[derive(Debug)]
pub struct LineClassifier<'a> {
    symbols: &'a CommentSymbols,
    state: ScanState,
}

impl<'a> LineClassifier<'a> {
    pub fn new(symbols: &'a CommentSymbols) -> Self {
        LineClassifier {
            symbols,
            state: ScanState::Normal,
        }
    }

    #[cfg(test)]
    fn in_block_comment(&self) -> bool {
        self.state == ScanState::InBlockComment
    }

    pub fn classify(&mut self, line: &str) -> LineKind {
        let trimmed = line.trim_matches(is_line_whitespace);
        // Blank wins even inside an open block comment and leaves the state alone.
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        match self.state {
            ScanState::Normal => {
                if self.symbols.starts_line_comment(trimmed) {
                    LineKind::Comment
                } else if self.symbols.opens_block(trimmed) {
                    if !self.symbols.closes_block(trimmed) {
                        self.state = ScanState::InBlockComment;
                    }
                    LineKind::Comment
                } else {
                    LineKind::Code
                }
            }
            ScanState::InBlockComment => {
                if self.symbols.closes_block(trimmed) {
                    self.state = ScanState::Normal;
                }
                LineKind::Comment
            }
        }
    }
}
