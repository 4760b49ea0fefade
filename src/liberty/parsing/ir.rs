//! Intermediate Representation for the Parser
//!
//!     The grammar engine produces a tree of `ParseNode`s: untyped,
//!     rule-tagged nodes holding the terminal tokens matched directly by the
//!     rule's body plus the child nodes produced by nested rule references.
//!     The IR describes the desired AST structure without coupling the
//!     engine to the AST building logic; the builder in
//!     [ast_tree](crate::liberty::building::ast_tree) does the conversion in
//!     a single bottom-up pass.

use crate::liberty::token::Token;
use std::ops::Range;

/// Type alias for a token with its byte range in the source
pub type TokenLocation = (Token, Range<usize>);

/// The grammar rules of the Liberty language.
///
/// This is a closed set: every production the grammar can emit appears
/// here, and the AST builder matches over it exhaustively, so a grammar
/// change without a matching builder case fails to compile rather than
/// silently dropping nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Library,
    Element,
    Group,
    ComplexAttribute,
    SimpleAttribute,
    NameList,
    ValueList,
    Value,
    Expression,
}

impl Rule {
    pub const COUNT: usize = 9;

    /// Rule name as it appears in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Rule::Library => "library",
            Rule::Element => "element",
            Rule::Group => "group",
            Rule::ComplexAttribute => "complex attribute",
            Rule::SimpleAttribute => "simple attribute",
            Rule::NameList => "name list",
            Rule::ValueList => "value list",
            Rule::Value => "value",
            Rule::Expression => "expression",
        }
    }
}

/// A node in the parse tree.
#[derive(Debug, Clone)]
pub struct ParseNode {
    pub rule: Rule,
    /// Terminal tokens matched directly by this rule's body, in match order.
    /// Structural punctuation is kept here for diagnostics; the AST builder
    /// skips it.
    pub tokens: Vec<TokenLocation>,
    /// Nodes produced by nested rule references, in match order
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn new(rule: Rule, tokens: Vec<TokenLocation>, children: Vec<ParseNode>) -> Self {
        Self {
            rule,
            tokens,
            children,
        }
    }

    /// Byte range covered by this node, from its first to its last terminal.
    pub fn span(&self) -> Option<Range<usize>> {
        let start = self
            .tokens
            .first()
            .map(|(_, r)| r.start)
            .into_iter()
            .chain(self.children.iter().filter_map(|c| c.span().map(|r| r.start)))
            .min()?;
        let end = self
            .tokens
            .last()
            .map(|(_, r)| r.end)
            .into_iter()
            .chain(self.children.iter().filter_map(|c| c.span().map(|r| r.end)))
            .max()?;
        Some(start..end)
    }
}
