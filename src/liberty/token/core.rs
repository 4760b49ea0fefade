//! Liberty token set, derived with logos.
//!
//!     The scanner recognizes identifiers, bus-indexed identifiers, quoted
//!     strings, numbers with an optional unit suffix, the structural
//!     punctuation of the format, and the small operator set that appears in
//!     unquoted pin-function expressions. Whitespace and both comment forms
//!     are skipped between tokens.
//!
//!     Tokens carry no position themselves; the lexing pipeline pairs each
//!     token with the byte range of its source text. That range is never
//!     touched after tokenization and is what the AST builder and the error
//!     types use for location reporting.

use logos::Logos;
use std::fmt;

/// A bus-indexed identifier such as `D[3]` or `DATA[7:0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusIndex {
    /// Identifier part before the bracket
    pub base: String,
    /// First (or only) index
    pub msb: u32,
    /// Second index of an `[i:j]` range, if present
    pub lsb: Option<u32>,
}

/// A numeric literal with an optional unit suffix (`1.5n`, `3p`, `0.17`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLit {
    pub value: f64,
    pub unit: Option<String>,
}

/// Token types for the Liberty format
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
// Liberty allows continuing a statement across lines with a trailing `\`
#[logos(skip r"\\\r?\n")]
pub enum Token {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(":")]
    Colon,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    // Operators of unquoted pin-function expressions
    #[token("!")]
    Bang,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("'")]
    Apostrophe,

    // Quoted strings are atomic: commas, parentheses and braces inside the
    // quotes never split into separate tokens. Escaped quotes are handled.
    #[regex(r#""([^"\\]|\\[\s\S])*""#, |lex| parse_quoted(lex.slice()))]
    Quoted(String),

    // Must be listed before Ident so `DATA[7:0]` wins over `DATA` by length
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$.]*\[[0-9]+(:[0-9]+)?\]", |lex| parse_bus(lex.slice()))]
    BusIdent(BusIndex),

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$.]*", |lex| lex.slice().to_owned())]
    Ident(String),

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][-+]?[0-9]+)?[A-Za-z]*", |lex| parse_number(lex.slice()))]
    Number(NumberLit),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Colon => write!(f, ":"),
            Token::Semi => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Bang => write!(f, "!"),
            Token::Star => write!(f, "*"),
            Token::Plus => write!(f, "+"),
            Token::Apostrophe => write!(f, "'"),
            Token::Quoted(s) => write!(f, "\"{}\"", s),
            Token::BusIdent(b) => match b.lsb {
                Some(lsb) => write!(f, "{}[{}:{}]", b.base, b.msb, lsb),
                None => write!(f, "{}[{}]", b.base, b.msb),
            },
            Token::Ident(s) => write!(f, "{}", s),
            Token::Number(n) => match &n.unit {
                Some(unit) => write!(f, "{}{}", n.value, unit),
                None => write!(f, "{}", n.value),
            },
        }
    }
}

/// Parse a quoted string literal (remove quotes and handle escapes)
fn parse_quoted(slice: &str) -> Option<String> {
    let without_quotes = &slice[1..slice.len() - 1];
    let mut result = String::new();
    let mut chars = without_quotes.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('"') => result.push('"'),
                Some('\\') => result.push('\\'),
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some(c) => {
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'),
            },
            c => result.push(c),
        }
    }

    Some(result)
}

/// Parse a bus-indexed identifier (`name[i]` or `name[i:j]`)
fn parse_bus(slice: &str) -> Option<BusIndex> {
    let bracket = slice.find('[')?;
    let base = slice[..bracket].to_owned();
    let index = &slice[bracket + 1..slice.len() - 1];

    match index.split_once(':') {
        Some((msb, lsb)) => Some(BusIndex {
            base,
            msb: msb.parse().ok()?,
            lsb: Some(lsb.parse().ok()?),
        }),
        None => Some(BusIndex {
            base,
            msb: index.parse().ok()?,
            lsb: None,
        }),
    }
}

/// Parse a numeric literal with an optional trailing unit suffix
fn parse_number(slice: &str) -> Option<NumberLit> {
    let digits_end = slice
        .rfind(|c: char| !c.is_ascii_alphabetic())
        .map(|i| i + 1)
        .unwrap_or(slice.len());

    // An exponent `e`/`E` must not be mistaken for a suffix; it is always
    // followed by digits, so the alphabetic tail never reaches into it.
    let (num, suffix) = slice.split_at(digits_end);
    let value: f64 = num.parse().ok()?;
    let unit = if suffix.is_empty() {
        None
    } else {
        Some(suffix.to_owned())
    };

    Some(NumberLit { value, unit })
}
