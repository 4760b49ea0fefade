//! Parsing
//!
//!     This module orchestrates the single-file pipeline: tokenize, evaluate
//!     the PEG grammar into an untyped parse tree, then hand the tree to the
//!     AST builder. Each stage's failure type is file-scoped and structured;
//!     see [error](crate::liberty::error).
//!
//!     The grammar itself lives in [grammar] as a declarative rule table,
//!     the evaluator in [engine], and the parse-tree node types in [ir].
//!     Keeping the three apart mirrors the rest of the pipeline: grammar
//!     changes are data edits, and the engine stays testable on its own.

pub mod engine;
pub mod grammar;
pub mod ir;

use crate::liberty::ast::Library;
use crate::liberty::building::ast_tree::AstTreeBuilder;
use crate::liberty::error::Error;
use crate::liberty::lexing;
use crate::liberty::parsing::grammar::GRAMMAR;
use crate::liberty::parsing::ir::ParseNode;

/// Knobs for a single-file parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Rule-application depth limit; exceeding it is a `ParseError`, not a
    /// stack overflow. The default admits well over a hundred nested groups.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: engine::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse one Liberty source text into a typed [`Library`].
///
/// The whole text is scanned up front; trailing unconsumed input after the
/// library group closes is a parse error, never a partial success.
pub fn parse(source: &str) -> Result<Library, Error> {
    parse_with_options(source, &ParseOptions::default())
}

/// [`parse`] with explicit options.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Library, Error> {
    let tree = parse_tree(source, options)?;
    let library = AstTreeBuilder::new().build(tree)?;
    Ok(library)
}

/// Run only the scanner and grammar engine, returning the untyped parse
/// tree. Exposed for tooling that wants the raw rule structure.
pub fn parse_tree(source: &str, options: &ParseOptions) -> Result<ParseNode, Error> {
    let tokens = lexing::tokenize(source)?;
    let tree = engine::run(&GRAMMAR, &tokens, source, options.max_depth)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liberty::ast::Value;
    use crate::liberty::error::ParseError;

    #[test]
    fn test_parse_minimal_library() {
        let library = parse("library (demo) { }").expect("parse failed");
        assert_eq!(library.name, "demo");
        assert!(library.elements.is_empty());
    }

    #[test]
    fn test_parse_reports_location() {
        let err = parse("library (demo) {\n  pin (A) { direction input; }\n}").unwrap_err();
        match err {
            Error::Parse(ParseError::Unexpected { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_attribute_value_kinds() {
        let source = r#"library (demo) {
            nom_voltage : 1.8;
            default_cell_leakage_power : 0.0;
            in_place_swap_mode : match_footprint;
            tristate : true;
            function : "A*B";
        }"#;
        let library = parse(source).expect("parse failed");
        assert_eq!(
            library.simple("nom_voltage").and_then(Value::as_f64),
            Some(1.8)
        );
        assert_eq!(
            library.simple("in_place_swap_mode").and_then(Value::as_str),
            Some("match_footprint")
        );
        assert_eq!(
            library.simple("tristate").and_then(Value::as_bool),
            Some(true)
        );
        assert_eq!(
            library.simple("function"),
            Some(&Value::QuotedString("A*B".to_string()))
        );
    }
}
