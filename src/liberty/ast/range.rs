//! Source position types
//!
//!     Tokens carry byte ranges into the source text. Anything user-facing
//!     (errors, diagnostics) wants line:column positions instead, so this
//!     module provides the conversion: `SourceLocation` pre-computes the
//!     byte offset of every line start once, then each conversion is a
//!     binary search over that table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line:column position in the source text, 1-based on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte-offset to line:column conversion for one source text.
pub struct SourceLocation {
    line_starts: Vec<usize>,
}

impl SourceLocation {
    /// Build the line-start table for `source` (O(n), done once per file).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a position (O(log n) binary search).
    ///
    /// Offsets past the end of the source clamp to the last line, which is
    /// what "unexpected end of file" diagnostics want.
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Position::new(line + 1, offset - self.line_starts[line] + 1)
    }
}
