//! Scanner
//!
//!     This module wraps the logos-derived token set into the scanning stage
//!     of the pipeline: it turns raw source text into a flat sequence of
//!     positioned tokens, or a `ScanError` if the text contains a malformed
//!     token.
//!
//!     Logos tokens carry the byte range of their source text. That range is
//!     not consulted during grammar evaluation but must be perfectly
//!     preserved for location tracking: the AST builder uses it to recover
//!     verbatim expression text, and every error type uses it for
//!     line:column reporting. No stage after this one may alter it.
//!
//! Error classification
//!
//!     Logos reports a malformed token as an anonymous error span. The
//!     format only has three ways to get there, so the offending source
//!     suffix disambiguates: a `"` that never closes is an unterminated
//!     string, a `/*` that never closes is an unterminated comment, and
//!     anything else is a stray character. Each is fatal for the file and
//!     carries the start location.

use crate::liberty::ast::range::SourceLocation;
use crate::liberty::error::ScanError;
use crate::liberty::token::Token;
use logos::Logos;
use std::ops::Range;

/// Type alias for a token with its byte range
pub type TokenLocation = (Token, Range<usize>);

/// Tokenize `source` into a flat positioned token stream.
///
/// Whitespace and both comment forms are consumed between tokens and never
/// appear in the output. The stream is fully materialized before grammar
/// evaluation starts; parsing never touches the filesystem or blocks
/// mid-file.
pub fn tokenize(source: &str) -> Result<Vec<TokenLocation>, ScanError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(classify_error(source, span.start)),
        }
    }

    Ok(tokens)
}

fn classify_error(source: &str, offset: usize) -> ScanError {
    let position = SourceLocation::new(source).position(offset);
    let rest = &source[offset..];

    if rest.starts_with('"') {
        ScanError::UnterminatedString {
            line: position.line,
            column: position.column,
        }
    } else if rest.starts_with("/*") {
        ScanError::UnterminatedComment {
            line: position.line,
            column: position.column,
        }
    } else {
        ScanError::InvalidCharacter {
            found: rest.chars().next().unwrap_or('\0'),
            line: position.line,
            column: position.column,
        }
    }
}
