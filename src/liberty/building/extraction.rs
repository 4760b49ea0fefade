//! Cell characteristics extraction
//!
//!     The netlist-emission side does not want to re-walk the whole AST for
//!     every cell, so this module flattens a `cell` group into the record it
//!     actually consumes: pin name lists by direction, raw pin-function
//!     text per output pin, any sequential elements (`ff` / `latch`) with
//!     their control attributes, and tri-state functions.
//!
//!     Function expressions are passed through as raw text, `'` trailing
//!     negation, `*`/`+`/`!` operators and parenthesized sub-expressions
//!     included. Parsing or normalizing that text is the emitter's job.
//!
//!     Every member of the cell is considered in source order, and every
//!     sequential group is kept: a cell with two `latch` groups yields two
//!     `SequentialElement`s, never one overwriting the other.

use crate::liberty::ast::{Group, Library, Value};
use serde::{Deserialize, Serialize};

/// Pin direction as declared by the `direction` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
    Inout,
    Internal,
}

impl Direction {
    fn from_value(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            "inout" => Some(Direction::Inout),
            "internal" => Some(Direction::Internal),
            _ => None,
        }
    }
}

/// A pin together with its raw function text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinFunction {
    pub pin: String,
    pub function: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequentialKind {
    Ff,
    Latch,
}

/// One `ff` or `latch` group of a cell.
///
/// The attribute set differs between the two kinds (`clocked_on` /
/// `next_state` for flip-flops, `enable` / `data_in` for latches), so every
/// field is optional and carries whatever the group declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialElement {
    pub kind: SequentialKind,
    /// The group's positional names, i.e. its output state variables
    pub outputs: Vec<String>,
    pub clocked_on: Option<String>,
    pub next_state: Option<String>,
    pub enable: Option<String>,
    pub data_in: Option<String>,
    pub preset: Option<String>,
    pub clear: Option<String>,
}

/// The flattened record the netlist emitter consumes for one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellCharacteristics {
    pub name: String,
    /// Input pin names, in declaration order
    pub inputs: Vec<String>,
    /// Output pin names, in declaration order
    pub outputs: Vec<String>,
    /// Raw function text per output pin that declares one
    pub functions: Vec<PinFunction>,
    /// Raw `three_state` function text per pin that declares one
    pub three_state: Vec<PinFunction>,
    /// All sequential elements, in declaration order
    pub sequential: Vec<SequentialElement>,
}

/// Flatten one `cell` group.
pub fn cell_characteristics(cell: &Group) -> CellCharacteristics {
    let mut record = CellCharacteristics {
        name: cell.name().unwrap_or_default().to_string(),
        inputs: Vec::new(),
        outputs: Vec::new(),
        functions: Vec::new(),
        three_state: Vec::new(),
        sequential: Vec::new(),
    };

    for pin in pin_like_groups(cell) {
        let Some(name) = pin_name(pin) else { continue };

        match pin.simple("direction").and_then(Direction::from_value) {
            Some(Direction::Input) => record.inputs.push(name.clone()),
            Some(Direction::Output) | Some(Direction::Inout) => record.outputs.push(name.clone()),
            _ => {}
        }

        if let Some(text) = pin.simple("function").and_then(Value::as_expression_text) {
            record.functions.push(PinFunction {
                pin: name.clone(),
                function: text.to_string(),
            });
        }
        if let Some(text) = pin
            .simple("three_state")
            .and_then(Value::as_expression_text)
        {
            record.three_state.push(PinFunction {
                pin: name,
                function: text.to_string(),
            });
        }
    }

    for item in &cell.members {
        let crate::liberty::ast::GroupItem::Group(group) = item else {
            continue;
        };
        match group.kind.as_str() {
            "ff" => record
                .sequential
                .push(sequential_element(group, SequentialKind::Ff)),
            "latch" => record
                .sequential
                .push(sequential_element(group, SequentialKind::Latch)),
            _ => {}
        }
    }

    record
}

/// The library's `nom_voltage` attribute, if present.
pub fn nom_voltage(library: &Library) -> Option<f64> {
    library.simple("nom_voltage").and_then(Value::as_f64)
}

/// `pin` and `bus` groups of a cell, in declaration order.
fn pin_like_groups(cell: &Group) -> impl Iterator<Item = &Group> {
    cell.members.iter().filter_map(|item| match item {
        crate::liberty::ast::GroupItem::Group(g) if g.kind == "pin" || g.kind == "bus" => Some(g),
        _ => None,
    })
}

/// Pin names are usually identifiers but bus members are indexed.
fn pin_name(pin: &Group) -> Option<String> {
    pin.names.first().map(ToString::to_string)
}

fn sequential_element(group: &Group, kind: SequentialKind) -> SequentialElement {
    let text = |name: &str| {
        group
            .simple(name)
            .and_then(Value::as_expression_text)
            .map(str::to_string)
    };

    SequentialElement {
        kind,
        outputs: group.names.iter().map(ToString::to_string).collect(),
        clocked_on: text("clocked_on"),
        next_state: text("next_state"),
        enable: text("enable"),
        data_in: text("data_in"),
        preset: text("preset"),
        clear: text("clear"),
    }
}
