//! PEG Engine
//!
//!     This module evaluates the declarative grammar against the token
//!     stream. It is a straightforward backtracking PEG interpreter:
//!     ordered choice commits to the first matching alternative, failed
//!     alternatives rewind both the position and any partially collected
//!     output, and predicates look ahead without consuming.
//!
//! Memoization
//!
//!     Rule applications are cached keyed by (rule, position), packrat
//!     style. The Liberty grammar's one ambiguity (group vs. complex
//!     attribute) makes the engine re-parse each argument list at most
//!     once, so memoization is not needed for correctness, but it keeps
//!     evaluation linear on large characterization files where deeply
//!     nested value tables would otherwise be re-visited.
//!
//! Failure reporting
//!
//!     The engine tracks the farthest position any terminal match failed
//!     at, together with the set of symbols expected there. When the whole
//!     parse fails, that frontier becomes the `ParseError`: one location,
//!     every alternative that was viable at it. Failures inside
//!     predicates are expected as part of normal matching and are kept out
//!     of the frontier.
//!
//! Depth guard
//!
//!     Evaluation is recursive, so pathological nesting is bounded by an
//!     explicit rule-application depth limit and surfaced as a
//!     `ParseError` instead of a stack overflow. Liberty files nest groups
//!     dozens of levels deep; the default limit leaves two orders of
//!     magnitude of headroom above that.

use crate::liberty::ast::range::SourceLocation;
use crate::liberty::error::ParseError;
use crate::liberty::lexing::TokenLocation;
use crate::liberty::parsing::grammar::{Expr, Grammar};
use crate::liberty::parsing::ir::{ParseNode, Rule};
use crate::liberty::token::Token;
use std::collections::{BTreeSet, HashMap};

/// Rule-application depth limit. Each nesting level of a Liberty group
/// costs a handful of rule applications, so this admits well over a
/// hundred nested groups.
pub const DEFAULT_MAX_DEPTH: usize = 500;

/// Evaluate `grammar` from [`Rule::Library`] over the whole token stream.
///
/// Trailing unconsumed input is a parse error, not a partial success.
pub fn run(
    grammar: &Grammar,
    tokens: &[TokenLocation],
    source: &str,
    max_depth: usize,
) -> Result<ParseNode, ParseError> {
    let mut engine = Engine::new(grammar, tokens, max_depth);

    match engine.apply(Rule::Library, 0) {
        Ok(Some((node, end))) => {
            if end < tokens.len() {
                Err(unexpected_at(
                    tokens,
                    source,
                    end,
                    vec!["end of file".to_string()],
                ))
            } else {
                Ok(node)
            }
        }
        Ok(None) => {
            let expected = engine.expected.iter().cloned().collect();
            Err(unexpected_at(tokens, source, engine.farthest, expected))
        }
        Err(Overflow { at }) => {
            let position = position_of(tokens, source, at);
            Err(ParseError::DepthExceeded {
                line: position.line,
                column: position.column,
                limit: max_depth,
            })
        }
    }
}

/// Hard abort: the depth guard tripped. Not a backtrackable failure.
#[derive(Debug)]
struct Overflow {
    at: usize,
}

type EvalResult = Result<Option<usize>, Overflow>;

/// Output collected while matching one rule body: terminals matched
/// directly, and child nodes from nested rule references.
#[derive(Default)]
struct Scratch {
    tokens: Vec<TokenLocation>,
    children: Vec<ParseNode>,
}

impl Scratch {
    fn mark(&self) -> (usize, usize) {
        (self.tokens.len(), self.children.len())
    }

    fn rewind(&mut self, mark: (usize, usize)) {
        self.tokens.truncate(mark.0);
        self.children.truncate(mark.1);
    }
}

struct Engine<'g, 't> {
    grammar: &'g Grammar,
    tokens: &'t [TokenLocation],
    memo: HashMap<(Rule, usize), Option<(ParseNode, usize)>>,
    /// Farthest token index a terminal failed at
    farthest: usize,
    /// Symbols expected at the farthest failure
    expected: BTreeSet<String>,
    /// Non-zero while inside an and-/not-predicate
    lookahead: usize,
    depth: usize,
    max_depth: usize,
}

impl<'g, 't> Engine<'g, 't> {
    fn new(grammar: &'g Grammar, tokens: &'t [TokenLocation], max_depth: usize) -> Self {
        Self {
            grammar,
            tokens,
            memo: HashMap::new(),
            farthest: 0,
            expected: BTreeSet::new(),
            lookahead: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Apply a named rule at `pos`, producing a rule-tagged node.
    fn apply(&mut self, rule: Rule, pos: usize) -> Result<Option<(ParseNode, usize)>, Overflow> {
        if let Some(cached) = self.memo.get(&(rule, pos)) {
            return Ok(cached.clone());
        }

        if self.depth >= self.max_depth {
            return Err(Overflow { at: pos });
        }
        self.depth += 1;
        let result = self.apply_uncached(rule, pos);
        self.depth -= 1;

        if let Ok(ref outcome) = result {
            self.memo.insert((rule, pos), outcome.clone());
        }
        result
    }

    fn apply_uncached(
        &mut self,
        rule: Rule,
        pos: usize,
    ) -> Result<Option<(ParseNode, usize)>, Overflow> {
        let mut scratch = Scratch::default();
        match self.eval(self.grammar.production(rule), pos, &mut scratch)? {
            Some(end) => Ok(Some((
                ParseNode::new(rule, scratch.tokens, scratch.children),
                end,
            ))),
            None => Ok(None),
        }
    }

    fn eval(&mut self, expr: &Expr, pos: usize, out: &mut Scratch) -> EvalResult {
        match expr {
            Expr::Tok(class) => match self.tokens.get(pos) {
                Some((token, range)) if class.matches(token) => {
                    out.tokens.push((token.clone(), range.clone()));
                    Ok(Some(pos + 1))
                }
                _ => {
                    self.record(pos, class.expected_name());
                    Ok(None)
                }
            },
            Expr::Kw(text) => match self.tokens.get(pos) {
                Some((token @ Token::Ident(name), range)) if name.as_str() == *text => {
                    out.tokens.push((token.clone(), range.clone()));
                    Ok(Some(pos + 1))
                }
                _ => {
                    self.record(pos, &format!("'{}'", text));
                    Ok(None)
                }
            },
            Expr::Rule(rule) => match self.apply(*rule, pos)? {
                Some((node, end)) => {
                    out.children.push(node);
                    Ok(Some(end))
                }
                None => Ok(None),
            },
            Expr::Seq(items) => {
                let mark = out.mark();
                let mut cur = pos;
                for item in items {
                    match self.eval(item, cur, out)? {
                        Some(next) => cur = next,
                        None => {
                            out.rewind(mark);
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(cur))
            }
            Expr::Choice(alternatives) => {
                for alternative in alternatives {
                    let mark = out.mark();
                    match self.eval(alternative, pos, out)? {
                        Some(end) => return Ok(Some(end)),
                        None => out.rewind(mark),
                    }
                }
                Ok(None)
            }
            Expr::Star(inner) => {
                let mut cur = pos;
                loop {
                    let mark = out.mark();
                    match self.eval(inner, cur, out)? {
                        // A zero-width match would repeat forever; stop.
                        Some(next) if next > cur => cur = next,
                        Some(_) => break,
                        None => {
                            out.rewind(mark);
                            break;
                        }
                    }
                }
                Ok(Some(cur))
            }
            Expr::Plus(inner) => {
                let mark = out.mark();
                match self.eval(inner, pos, out)? {
                    Some(first) => {
                        let mut cur = first;
                        loop {
                            let rep_mark = out.mark();
                            match self.eval(inner, cur, out)? {
                                Some(next) if next > cur => cur = next,
                                Some(_) => break,
                                None => {
                                    out.rewind(rep_mark);
                                    break;
                                }
                            }
                        }
                        Ok(Some(cur))
                    }
                    None => {
                        out.rewind(mark);
                        Ok(None)
                    }
                }
            }
            Expr::Opt(inner) => {
                let mark = out.mark();
                match self.eval(inner, pos, out)? {
                    Some(end) => Ok(Some(end)),
                    None => {
                        out.rewind(mark);
                        Ok(Some(pos))
                    }
                }
            }
            Expr::And(inner) => {
                let matched = self.probe(inner, pos)?;
                Ok(matched.map(|_| pos))
            }
            Expr::Not(inner) => match self.probe(inner, pos)? {
                Some(_) => Ok(None),
                None => Ok(Some(pos)),
            },
        }
    }

    /// Evaluate without consuming input or emitting output, for predicates.
    fn probe(&mut self, expr: &Expr, pos: usize) -> EvalResult {
        let mut scratch = Scratch::default();
        self.lookahead += 1;
        let result = self.eval(expr, pos, &mut scratch);
        self.lookahead -= 1;
        result
    }

    /// Track the farthest failure frontier for diagnostics. Failures
    /// inside predicates are part of normal matching and are not recorded.
    fn record(&mut self, pos: usize, expected: &str) {
        if self.lookahead > 0 {
            return;
        }
        if pos > self.farthest {
            self.farthest = pos;
            self.expected.clear();
        }
        if pos == self.farthest {
            self.expected.insert(expected.to_string());
        }
    }
}

fn position_of(
    tokens: &[TokenLocation],
    source: &str,
    pos: usize,
) -> crate::liberty::ast::range::Position {
    let offset = tokens
        .get(pos)
        .map(|(_, range)| range.start)
        .unwrap_or(source.len());
    SourceLocation::new(source).position(offset)
}

fn unexpected_at(
    tokens: &[TokenLocation],
    source: &str,
    pos: usize,
    expected: Vec<String>,
) -> ParseError {
    let position = position_of(tokens, source, pos);
    let found = match tokens.get(pos) {
        Some((token, _)) => token.to_string(),
        None => "end of file".to_string(),
    };
    ParseError::Unexpected {
        line: position.line,
        column: position.column,
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liberty::lexing::tokenize;
    use crate::liberty::parsing::grammar::{TokenClass, GRAMMAR};

    fn engine_for<'t>(tokens: &'t [TokenLocation]) -> Engine<'static, 't> {
        Engine::new(&GRAMMAR, tokens, DEFAULT_MAX_DEPTH)
    }

    #[test]
    fn test_group_vs_complex_attribute_prefix() {
        // Identical `foo(x,y)` prefix; the suffix decides the rule.
        let as_group = tokenize("foo(x,y){ }").unwrap();
        let as_attr = tokenize("foo(x,y);").unwrap();

        let mut engine = engine_for(&as_group);
        let (node, end) = engine.apply(Rule::Element, 0).unwrap().unwrap();
        assert_eq!(end, as_group.len());
        assert_eq!(node.children[0].rule, Rule::Group);

        let mut engine = engine_for(&as_attr);
        let (node, end) = engine.apply(Rule::Element, 0).unwrap().unwrap();
        assert_eq!(end, as_attr.len());
        assert_eq!(node.children[0].rule, Rule::ComplexAttribute);
    }

    #[test]
    fn test_empty_name_list_is_legal() {
        let tokens = tokenize("statetable () { }").unwrap();
        let mut engine = engine_for(&tokens);
        let (node, end) = engine.apply(Rule::Group, 0).unwrap().unwrap();
        assert_eq!(end, tokens.len());
        // No NameList child and no Element children
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_single_identifier_is_not_an_expression() {
        let tokens = tokenize("input").unwrap();
        let mut engine = engine_for(&tokens);
        let (node, _) = engine.apply(Rule::Value, 0).unwrap().unwrap();
        assert!(node.children.is_empty(), "no Expression child expected");
        assert!(matches!(node.tokens[0].0, Token::Ident(_)));
    }

    #[test]
    fn test_operator_run_is_an_expression() {
        for source in ["A*B", "!A", "B1'", "B1'+B2'", "!A * B"] {
            let tokens = tokenize(source).unwrap();
            let mut engine = engine_for(&tokens);
            let (node, end) = engine
                .apply(Rule::Value, 0)
                .unwrap()
                .unwrap_or_else(|| panic!("value failed on {source}"));
            assert_eq!(end, tokens.len(), "partial match on {source}");
            assert_eq!(node.children[0].rule, Rule::Expression);
        }
    }

    #[test]
    fn test_failure_frontier_reports_expected_set() {
        // After `foo(x,y)` neither `{` (group) nor `;` (complex attribute)
        // appears, so both must be in the expected set.
        let source = "library(l){ foo(x,y) bar : 1; }";
        let tokens = tokenize(source).unwrap();
        let err = run(&GRAMMAR, &tokens, source, DEFAULT_MAX_DEPTH).unwrap_err();
        match err {
            ParseError::Unexpected { expected, .. } => {
                assert!(expected.contains(&"'{'".to_string()), "{expected:?}");
                assert!(expected.contains(&"';'".to_string()), "{expected:?}");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_input_is_an_error() {
        let source = "library(l){ } extra";
        let tokens = tokenize(source).unwrap();
        let err = run(&GRAMMAR, &tokens, source, DEFAULT_MAX_DEPTH).unwrap_err();
        match err {
            ParseError::Unexpected {
                expected, found, ..
            } => {
                assert_eq!(expected, vec!["end of file".to_string()]);
                assert_eq!(found, "extra");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_guard_trips_on_pathological_nesting() {
        let levels = 2_000;
        let mut source = String::from("library(l){ ");
        for _ in 0..levels {
            source.push_str("g(){ ");
        }
        for _ in 0..levels {
            source.push_str("} ");
        }
        source.push('}');

        let tokens = tokenize(&source).unwrap();
        let err = run(&GRAMMAR, &tokens, &source, DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(matches!(err, ParseError::DepthExceeded { .. }), "{err:?}");
    }

    #[test]
    fn test_not_predicate_succeeds_on_mismatch() {
        let tokens = tokenize("pin").unwrap();
        let mut engine = engine_for(&tokens);
        let mut scratch = Scratch::default();

        let not_comma = Expr::Not(Box::new(Expr::Tok(TokenClass::Comma)));
        assert_eq!(engine.eval(&not_comma, 0, &mut scratch).unwrap(), Some(0));

        let not_ident = Expr::Not(Box::new(Expr::Tok(TokenClass::Ident)));
        assert_eq!(engine.eval(&not_ident, 0, &mut scratch).unwrap(), None);

        // Predicates never pollute the failure frontier
        assert!(engine.expected.is_empty());
    }

    #[test]
    fn test_and_predicate_consumes_nothing() {
        let tokens = tokenize("pin").unwrap();
        let mut engine = engine_for(&tokens);
        let mut scratch = Scratch::default();

        let and_ident = Expr::And(Box::new(Expr::Tok(TokenClass::Ident)));
        assert_eq!(engine.eval(&and_ident, 0, &mut scratch).unwrap(), Some(0));
        assert!(scratch.tokens.is_empty());
    }
}
