//! Typed domain model for Liberty libraries
//!
//!     The AST mirrors the shape of the format itself: a `Library` is the
//!     root group, and every group holds an ordered sequence of members,
//!     each of which is a simple attribute, a complex attribute, or a nested
//!     group. Member order is semantically significant (later `pin` groups
//!     may reference earlier-declared pins) and is preserved exactly as it
//!     appears in the source.
//!
//!     The group/attribute vocabulary of Liberty is open-ended, so the AST
//!     enforces no schema: a `cell` group and a `statetable` group are both
//!     just `Group`s with a different `kind`. Downstream consumers match on
//!     `kind` and attribute names themselves; the [extraction](crate::liberty::building::extraction)
//!     module does exactly that for the common cell-characteristics record.
//!
//!     All nodes are immutable after construction and owned exclusively by
//!     their parent. Nothing here is shared across files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute or name value.
///
/// Exactly one variant is active; the parser decides which based on the
/// token shape, never on the attribute name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A bare identifier (`input`, `BUF`, `clk`)
    Identifier(String),
    /// A bus-indexed identifier (`D[3]`, `DATA[7:0]`)
    BusIdentifier {
        base: String,
        msb: u32,
        lsb: Option<u32>,
    },
    /// A quoted string, unescaped (`"A * B"` carries `A * B`)
    QuotedString(String),
    /// A number with an optional unit suffix (`1.5n`, `0.17`)
    Number { value: f64, unit: Option<String> },
    /// The literals `true` / `false`
    Boolean(bool),
    /// Raw unquoted Boolean-like pin-function text (`B1'*B2`). The text is
    /// kept verbatim; parsing it is the netlist emitter's responsibility.
    Expression(String),
}

impl Value {
    /// The string content of an identifier or quoted-string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Identifier(s) | Value::QuotedString(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric content of a number value, ignoring any unit suffix.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The raw text of a function expression, whether it was written quoted
    /// or bare.
    pub fn as_expression_text(&self) -> Option<&str> {
        match self {
            Value::QuotedString(s) | Value::Expression(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Identifier(s) => write!(f, "{}", s),
            Value::BusIdentifier { base, msb, lsb } => match lsb {
                Some(lsb) => write!(f, "{}[{}:{}]", base, msb, lsb),
                None => write!(f, "{}[{}]", base, msb),
            },
            Value::QuotedString(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Value::Number { value, unit } => match unit {
                Some(unit) => write!(f, "{}{}", value, unit),
                None => write!(f, "{}", value),
            },
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Expression(text) => write!(f, "{}", text),
        }
    }
}

/// `name : value ;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleAttribute {
    pub name: String,
    pub value: Value,
}

/// `name ( v1, v2, … ) ;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexAttribute {
    pub name: String,
    pub values: Vec<Value>,
}

/// One member of a group body, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupItem {
    Simple(SimpleAttribute),
    Complex(ComplexAttribute),
    Group(Group),
}

/// A named, possibly parameterized, brace-delimited nesting construct
/// (`cell`, `pin`, `bus`, `timing`, `ff`, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group kind (`cell`, `pin`, `timing`, …)
    pub kind: String,
    /// Positional names; usually 0, 1 or 2 (an `ff` group takes two).
    /// Names are values because real libraries quote them
    /// (`operating_conditions("typical")`) and index them (`bus(D[7:0])`).
    pub names: Vec<Value>,
    /// Body members in source order
    pub members: Vec<GroupItem>,
}

impl Group {
    /// First positional name as a string, the overwhelmingly common case.
    pub fn name(&self) -> Option<&str> {
        self.names.first().and_then(Value::as_str)
    }

    /// Value of the simple attribute `name`, first occurrence.
    pub fn simple(&self, name: &str) -> Option<&Value> {
        self.members.iter().find_map(|item| match item {
            GroupItem::Simple(attr) if attr.name == name => Some(&attr.value),
            _ => None,
        })
    }

    /// Values of the complex attribute `name`, first occurrence.
    pub fn complex(&self, name: &str) -> Option<&[Value]> {
        self.members.iter().find_map(|item| match item {
            GroupItem::Complex(attr) if attr.name == name => Some(attr.values.as_slice()),
            _ => None,
        })
    }

    /// All nested groups of the given kind, in source order.
    pub fn groups<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Group> {
        self.members.iter().filter_map(move |item| match item {
            GroupItem::Group(g) if g.kind == kind => Some(g),
            _ => None,
        })
    }
}

/// The root group of a Liberty file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    /// Top-level members in source order
    pub elements: Vec<GroupItem>,
}

impl Library {
    /// Value of a top-level simple attribute (`nom_voltage`, `time_unit`, …).
    pub fn simple(&self, name: &str) -> Option<&Value> {
        self.elements.iter().find_map(|item| match item {
            GroupItem::Simple(attr) if attr.name == name => Some(&attr.value),
            _ => None,
        })
    }

    /// All top-level groups of the given kind (`cell` being the usual ask).
    pub fn groups<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Group> {
        self.elements.iter().filter_map(move |item| match item {
            GroupItem::Group(g) if g.kind == kind => Some(g),
            _ => None,
        })
    }

    /// Top-level `cell` groups, in source order.
    pub fn cells(&self) -> impl Iterator<Item = &Group> {
        self.groups("cell")
    }
}
