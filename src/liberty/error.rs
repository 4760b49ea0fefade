//! Error taxonomy for the parsing pipeline
//!
//!     Three classes, matching the three pipeline stages:
//!
//!         - `ScanError`: malformed token (unterminated string or comment,
//!           stray character). Fatal for the file.
//!         - `ParseError`: no grammar alternative matched after exhausting
//!           backtracking, the nesting depth guard tripped, or input was
//!           left over after the library group closed. Fatal for the file.
//!         - `TransformError`: a parse-tree node the AST builder has no
//!           case for. This is a grammar/builder mismatch, a programming
//!           error rather than a user-data error, and should not occur with
//!           a correctly paired grammar and builder.
//!
//!     All three are file-scoped: the batch orchestrator captures them per
//!     file and never lets one file's failure affect another. The library
//!     never prints; callers get structured values with line:column
//!     locations and render their own diagnostics.

use crate::liberty::parsing::ir::Rule;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed token in the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unterminated quoted string starting at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("unterminated block comment starting at {line}:{column}")]
    UnterminatedComment { line: usize, column: usize },
    #[error("invalid character {found:?} at {line}:{column}")]
    InvalidCharacter {
        found: char,
        line: usize,
        column: usize,
    },
}

/// No grammar alternative matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The engine's farthest failure: position, the grammar symbols that
    /// were being attempted there, and what was actually found.
    #[error("parse error at {line}:{column}: expected {}, found {found}", .expected.join(" or "))]
    Unexpected {
        line: usize,
        column: usize,
        /// Sorted, deduplicated set of expected grammar symbols
        expected: Vec<String>,
        found: String,
    },
    /// The recursion-depth guard tripped before the grammar resolved.
    /// Surfaced as a parse error rather than a stack overflow.
    #[error("parse error at {line}:{column}: nesting exceeds the depth limit of {limit}")]
    DepthExceeded {
        line: usize,
        column: usize,
        limit: usize,
    },
}

/// Parse-tree node with no AST mapping: the grammar and the builder have
/// drifted apart. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("internal: no AST mapping for {} node in this position", .rule.name())]
    UnexpectedRule { rule: Rule },
    #[error("internal: malformed {} node: {detail}", .rule.name())]
    MalformedNode { rule: Rule, detail: String },
}

/// Any failure to turn one file into a `Library`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
