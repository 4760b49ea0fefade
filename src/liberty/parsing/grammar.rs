//! Grammar Definition
//!
//!     This module defines the Liberty grammar declaratively as a table
//!     mapping each [Rule](crate::liberty::parsing::ir::Rule) to a parsing
//!     expression. Alternatives are tried in declaration order for correct
//!     disambiguation; the engine commits to the first that matches and
//!     backtracks freely otherwise.
//!
//! The Grammar
//!
//!     library        := "library" "(" value ")" "{" element* "}"
//!     element        := group / complex_attribute / simple_attribute
//!     group          := ident "(" namelist? ")" "{" element* "}"
//!     namelist       := value ("," value)*
//!     complex_attr   := ident "(" valuelist? ")" ";"
//!     simple_attr    := ident ":" value ";"
//!     valuelist      := value ("," value)*
//!     value          := quoted / expression / number / bus_ident / ident
//!     expression     := atom? (op atom?)+     op := "!" / "*" / "+" / "'"
//!     atom           := bus_ident / ident / number
//!
//!     The sole structural ambiguity of the format is that a group and a
//!     complex attribute share the `ident ( args )` prefix. Ordered choice
//!     resolves it: group is tried first and only commits on a following
//!     `{`; on failure the engine backtracks past the argument list and
//!     tries the attribute production, which requires `;`.
//!
//!     `expression` requires at least one operator token, so a lone
//!     identifier always parses as an identifier, never as a degenerate
//!     expression. Leading and trailing operator forms (`!A`, `B1'`) both
//!     match because the atoms around an operator are optional. Expression
//!     must be tried before the single-token value alternatives: choice is
//!     ordered and committing, so once `1` matched as a number the engine
//!     would never revisit `1 + 2` as an expression.
//!
//!     The compiled grammar is built once into a static and shared
//!     read-only by every parse, on any thread.

use crate::liberty::parsing::ir::Rule;
use crate::liberty::token::Token;
use once_cell::sync::Lazy;

/// Terminal token classes the grammar can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Ident,
    BusIdent,
    Quoted,
    Number,
    Operator,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Colon,
    Semi,
    Comma,
}

impl TokenClass {
    /// Whether `token` belongs to this class.
    pub fn matches(self, token: &Token) -> bool {
        matches!(
            (self, token),
            (TokenClass::Ident, Token::Ident(_))
                | (TokenClass::BusIdent, Token::BusIdent(_))
                | (TokenClass::Quoted, Token::Quoted(_))
                | (TokenClass::Number, Token::Number(_))
                | (
                    TokenClass::Operator,
                    Token::Bang | Token::Star | Token::Plus | Token::Apostrophe
                )
                | (TokenClass::LParen, Token::LParen)
                | (TokenClass::RParen, Token::RParen)
                | (TokenClass::LBrace, Token::LBrace)
                | (TokenClass::RBrace, Token::RBrace)
                | (TokenClass::Colon, Token::Colon)
                | (TokenClass::Semi, Token::Semi)
                | (TokenClass::Comma, Token::Comma)
        )
    }

    /// Name used in "expected …" diagnostics.
    pub fn expected_name(self) -> &'static str {
        match self {
            TokenClass::Ident => "identifier",
            TokenClass::BusIdent => "bus identifier",
            TokenClass::Quoted => "quoted string",
            TokenClass::Number => "number",
            TokenClass::Operator => "operator",
            TokenClass::LParen => "'('",
            TokenClass::RParen => "')'",
            TokenClass::LBrace => "'{'",
            TokenClass::RBrace => "'}'",
            TokenClass::Colon => "':'",
            TokenClass::Semi => "';'",
            TokenClass::Comma => "','",
        }
    }
}

/// A parsing expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Reference to a named rule; a successful match adds a child node
    Rule(Rule),
    /// Any token of a class; a successful match records the token
    Tok(TokenClass),
    /// An identifier with this exact text
    Kw(&'static str),
    /// All in order
    Seq(Vec<Expr>),
    /// First matching alternative wins; the rest are never consulted
    Choice(Vec<Expr>),
    /// Zero or more, greedy
    Star(Box<Expr>),
    /// One or more, greedy
    Plus(Box<Expr>),
    /// Zero or one
    Opt(Box<Expr>),
    /// And-predicate: match without consuming
    And(Box<Expr>),
    /// Not-predicate: succeed only if the inner expression fails
    Not(Box<Expr>),
}

fn rule(r: Rule) -> Expr {
    Expr::Rule(r)
}

fn tok(c: TokenClass) -> Expr {
    Expr::Tok(c)
}

fn kw(text: &'static str) -> Expr {
    Expr::Kw(text)
}

fn seq(items: Vec<Expr>) -> Expr {
    Expr::Seq(items)
}

fn choice(items: Vec<Expr>) -> Expr {
    Expr::Choice(items)
}

fn star(inner: Expr) -> Expr {
    Expr::Star(Box::new(inner))
}

fn plus(inner: Expr) -> Expr {
    Expr::Plus(Box::new(inner))
}

fn opt(inner: Expr) -> Expr {
    Expr::Opt(Box::new(inner))
}

/// The compiled grammar: one production per rule.
pub struct Grammar {
    productions: Vec<Expr>,
}

impl Grammar {
    /// The production for `rule`.
    pub fn production(&self, rule: Rule) -> &Expr {
        &self.productions[rule as usize]
    }

    /// Build the Liberty grammar. Called once; use [`GRAMMAR`] instead.
    fn liberty() -> Self {
        use Rule::*;
        use TokenClass::*;

        // Indexed by `Rule as usize`; declaration order must match the enum.
        let productions = vec![
            // Library
            seq(vec![
                kw("library"),
                tok(LParen),
                rule(Value),
                tok(RParen),
                tok(LBrace),
                star(rule(Element)),
                tok(RBrace),
            ]),
            // Element
            choice(vec![
                rule(Group),
                rule(ComplexAttribute),
                rule(SimpleAttribute),
            ]),
            // Group
            seq(vec![
                tok(Ident),
                tok(LParen),
                opt(rule(NameList)),
                tok(RParen),
                tok(LBrace),
                star(rule(Element)),
                tok(RBrace),
            ]),
            // ComplexAttribute
            seq(vec![
                tok(Ident),
                tok(LParen),
                opt(rule(ValueList)),
                tok(RParen),
                tok(Semi),
            ]),
            // SimpleAttribute
            seq(vec![tok(Ident), tok(Colon), rule(Value), tok(Semi)]),
            // NameList
            seq(vec![
                rule(Value),
                star(seq(vec![tok(Comma), rule(Value)])),
            ]),
            // ValueList
            seq(vec![
                rule(Value),
                star(seq(vec![tok(Comma), rule(Value)])),
            ]),
            // Value
            choice(vec![
                tok(Quoted),
                rule(Expression),
                tok(Number),
                tok(BusIdent),
                tok(Ident),
            ]),
            // Expression: at least one operator, atoms optional around it
            seq(vec![
                opt(expression_atom()),
                plus(seq(vec![tok(Operator), opt(expression_atom())])),
            ]),
        ];

        debug_assert_eq!(productions.len(), Rule::COUNT);
        Grammar { productions }
    }
}

fn expression_atom() -> Expr {
    choice(vec![
        tok(TokenClass::BusIdent),
        tok(TokenClass::Ident),
        tok(TokenClass::Number),
    ])
}

/// The Liberty grammar, compiled once and shared read-only across all
/// parses and worker threads.
pub static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::liberty);
