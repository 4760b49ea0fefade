//! AST Builder from ParseNode IR
//!
//!     This module contains the `AstTreeBuilder`, which walks the
//!     `ParseNode` tree produced by the grammar engine bottom-up and
//!     constructs the typed AST.
//!
//!     Dispatch is an exhaustive match over the closed [Rule] enum: every
//!     grammar production maps to exactly one constructor, and a node the
//!     builder has no case for in its position is a [TransformError]: a
//!     grammar/builder mismatch, never a user-data error. Structural
//!     punctuation tokens inside a node are skipped; they are retained in
//!     the IR only for diagnostics.
//!
//!     The builder performs no vocabulary validation: an unknown group kind
//!     or attribute name passes through untouched, because Liberty's
//!     group/attribute vocabulary is open-ended.

use crate::liberty::ast::{
    ComplexAttribute, Group, GroupItem, Library, SimpleAttribute, Value,
};
use crate::liberty::error::TransformError;
use crate::liberty::parsing::ir::{ParseNode, Rule};
use crate::liberty::token::Token;

/// A builder that constructs a typed AST from a `ParseNode` tree.
#[derive(Default)]
pub struct AstTreeBuilder;

impl AstTreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds a `Library` from the root `ParseNode`.
    pub fn build(&self, root: ParseNode) -> Result<Library, TransformError> {
        if root.rule != Rule::Library {
            return Err(TransformError::UnexpectedRule { rule: root.rule });
        }

        let mut children = root.children.into_iter();
        let name_node = children.next().ok_or_else(|| TransformError::MalformedNode {
            rule: Rule::Library,
            detail: "missing library name".to_string(),
        })?;
        let name = value_into_name(self.build_value(name_node)?);

        let elements = children
            .map(|child| self.build_element(child))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Library { name, elements })
    }

    /// Unwraps an `Element` node into the member it chose.
    fn build_element(&self, node: ParseNode) -> Result<GroupItem, TransformError> {
        if node.rule != Rule::Element {
            return Err(TransformError::UnexpectedRule { rule: node.rule });
        }
        let inner = node
            .children
            .into_iter()
            .next()
            .ok_or_else(|| TransformError::MalformedNode {
                rule: Rule::Element,
                detail: "element without a member".to_string(),
            })?;
        self.build_member(inner)
    }

    fn build_member(&self, node: ParseNode) -> Result<GroupItem, TransformError> {
        match node.rule {
            Rule::Group => Ok(GroupItem::Group(self.build_group(node)?)),
            Rule::ComplexAttribute => Ok(GroupItem::Complex(self.build_complex(node)?)),
            Rule::SimpleAttribute => Ok(GroupItem::Simple(self.build_simple(node)?)),
            rule => Err(TransformError::UnexpectedRule { rule }),
        }
    }

    fn build_group(&self, node: ParseNode) -> Result<Group, TransformError> {
        let kind = first_ident(&node)?;
        let mut names = Vec::new();
        let mut members = Vec::new();

        for child in node.children {
            match child.rule {
                Rule::NameList => names = self.build_values(child)?,
                Rule::Element => members.push(self.build_element(child)?),
                rule => return Err(TransformError::UnexpectedRule { rule }),
            }
        }

        Ok(Group {
            kind,
            names,
            members,
        })
    }

    fn build_complex(&self, node: ParseNode) -> Result<ComplexAttribute, TransformError> {
        let name = first_ident(&node)?;
        let values = match node.children.into_iter().next() {
            Some(child) if child.rule == Rule::ValueList => self.build_values(child)?,
            Some(child) => return Err(TransformError::UnexpectedRule { rule: child.rule }),
            // `define_group();` and friends: an empty value list is legal
            None => Vec::new(),
        };
        Ok(ComplexAttribute { name, values })
    }

    fn build_simple(&self, node: ParseNode) -> Result<SimpleAttribute, TransformError> {
        let name = first_ident(&node)?;
        let value_node =
            node.children
                .into_iter()
                .next()
                .ok_or_else(|| TransformError::MalformedNode {
                    rule: Rule::SimpleAttribute,
                    detail: "missing value".to_string(),
                })?;
        let value = self.build_value(value_node)?;
        Ok(SimpleAttribute { name, value })
    }

    /// Builds the values of a `NameList` or `ValueList` node.
    fn build_values(&self, node: ParseNode) -> Result<Vec<Value>, TransformError> {
        node.children
            .into_iter()
            .map(|child| self.build_value(child))
            .collect()
    }

    fn build_value(&self, node: ParseNode) -> Result<Value, TransformError> {
        if node.rule != Rule::Value {
            return Err(TransformError::UnexpectedRule { rule: node.rule });
        }

        // An expression alternative carries a child node; every other
        // alternative is a single terminal.
        if let Some(child) = node.children.into_iter().next() {
            if child.rule != Rule::Expression {
                return Err(TransformError::UnexpectedRule { rule: child.rule });
            }
            return Ok(Value::Expression(expression_text(&child)?));
        }

        let (token, _) =
            node.tokens
                .into_iter()
                .next()
                .ok_or_else(|| TransformError::MalformedNode {
                    rule: Rule::Value,
                    detail: "value without a token".to_string(),
                })?;

        Ok(match token {
            Token::Quoted(s) => Value::QuotedString(s),
            Token::Number(n) => Value::Number {
                value: n.value,
                unit: n.unit,
            },
            Token::BusIdent(b) => Value::BusIdentifier {
                base: b.base,
                msb: b.msb,
                lsb: b.lsb,
            },
            Token::Ident(s) if s == "true" => Value::Boolean(true),
            Token::Ident(s) if s == "false" => Value::Boolean(false),
            Token::Ident(s) => Value::Identifier(s),
            other => {
                return Err(TransformError::MalformedNode {
                    rule: Rule::Value,
                    detail: format!("unexpected token {other}"),
                })
            }
        })
    }
}

/// Library names are occasionally quoted; either way the name is a string.
fn value_into_name(value: Value) -> String {
    match value {
        Value::Identifier(s) | Value::QuotedString(s) => s,
        other => other.to_string(),
    }
}

/// Kind or attribute name: the first identifier terminal of the node.
fn first_ident(node: &ParseNode) -> Result<String, TransformError> {
    node.tokens
        .iter()
        .find_map(|(token, _)| match token {
            Token::Ident(s) => Some(s.clone()),
            _ => None,
        })
        .ok_or_else(|| TransformError::MalformedNode {
            rule: node.rule,
            detail: "missing identifier".to_string(),
        })
}

/// Reconstruct expression text from the expression node's tokens.
///
/// The text is rebuilt from tokens rather than sliced from the source so
/// that a comment buried inside an unquoted expression can never leak into
/// the AST. Spacing is canonical: postfix `'` attaches to its operand,
/// prefix `!` attaches forward, everything else is space-separated. The
/// result retokenizes to the same token sequence.
fn expression_text(node: &ParseNode) -> Result<String, TransformError> {
    if node.tokens.is_empty() {
        return Err(TransformError::MalformedNode {
            rule: Rule::Expression,
            detail: "empty expression".to_string(),
        });
    }

    let mut text = String::new();
    for (token, _) in &node.tokens {
        let glued = matches!(token, Token::Apostrophe)
            || text.ends_with('!')
            || text.is_empty();
        if !glued {
            text.push(' ');
        }
        text.push_str(&token.to_string());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liberty::parsing::{parse_tree, ParseOptions};

    fn build(source: &str) -> Library {
        let tree = parse_tree(source, &ParseOptions::default()).expect("parse failed");
        AstTreeBuilder::new().build(tree).expect("build failed")
    }

    #[test]
    fn test_build_nested_groups_in_order() {
        let library = build(
            "library (demo) { cell (BUF) { pin (A) { } pin (Y) { } } cell (INV) { } }",
        );
        let cells: Vec<_> = library.cells().filter_map(Group::name).collect();
        assert_eq!(cells, vec!["BUF", "INV"]);

        let buf = library.cells().next().unwrap();
        let pins: Vec<_> = buf.groups("pin").filter_map(Group::name).collect();
        assert_eq!(pins, vec!["A", "Y"]);
    }

    #[test]
    fn test_build_two_part_name_list() {
        let library = build("library (demo) { cell (DFF) { ff (IQ, IQN) { } } }");
        let cell = library.cells().next().unwrap();
        let ff = cell.groups("ff").next().unwrap();
        assert_eq!(
            ff.names,
            vec![
                Value::Identifier("IQ".to_string()),
                Value::Identifier("IQN".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_empty_group_and_empty_complex() {
        let library = build("library (demo) { statetable () { } define_group (); }");
        match &library.elements[0] {
            GroupItem::Group(g) => {
                assert_eq!(g.kind, "statetable");
                assert!(g.names.is_empty());
                assert!(g.members.is_empty());
            }
            other => panic!("expected group, got {other:?}"),
        }
        match &library.elements[1] {
            GroupItem::Complex(attr) => {
                assert_eq!(attr.name, "define_group");
                assert!(attr.values.is_empty());
            }
            other => panic!("expected complex attribute, got {other:?}"),
        }
    }

    #[test]
    fn test_build_expression_value_canonical_text() {
        let library = build("library (demo) { test_expr : B1'*B2; negated : !A * B; }");
        assert_eq!(
            library.simple("test_expr"),
            Some(&Value::Expression("B1' * B2".to_string()))
        );
        assert_eq!(
            library.simple("negated"),
            Some(&Value::Expression("!A * B".to_string()))
        );
    }

    #[test]
    fn test_build_duplicate_groups_are_all_preserved() {
        // A second sequential group must not overwrite the first.
        let library = build(
            "library (demo) { cell (X) { latch (IQ, IQN) { } latch (P, PN) { } } }",
        );
        let cell = library.cells().next().unwrap();
        let latches: Vec<_> = cell.groups("latch").filter_map(Group::name).collect();
        assert_eq!(latches, vec!["IQ", "P"]);
    }

    #[test]
    fn test_unexpected_rule_is_a_transform_error() {
        let tree = parse_tree("library (demo) { }", &ParseOptions::default()).unwrap();
        // Hand the builder a node it has no case for at the root.
        let bogus = ParseNode::new(Rule::ValueList, vec![], tree.children);
        let err = AstTreeBuilder::new().build(bogus).unwrap_err();
        assert_eq!(
            err,
            TransformError::UnexpectedRule {
                rule: Rule::ValueList
            }
        );
    }
}
