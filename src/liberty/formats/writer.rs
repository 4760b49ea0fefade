//! Liberty writer
//!
//!     Re-serializes an AST to grammar-conformant Liberty text: one member
//!     per line, four-space indentation per nesting level. Reparsing the
//!     output yields a structurally equal AST: member order, names and
//!     values all survive, which is exactly the round-trip property the
//!     test suite pins down.

use crate::liberty::ast::{Group, GroupItem, Library, Value};

const INDENT: &str = "    ";

/// Types that render themselves as Liberty source text.
pub trait ToLibertyString {
    fn to_liberty_string(&self) -> String;
}

impl ToLibertyString for Library {
    fn to_liberty_string(&self) -> String {
        let mut out = String::new();
        out.push_str("library (");
        out.push_str(&ident_or_quoted(&self.name));
        out.push_str(") {\n");
        for item in &self.elements {
            write_item(&mut out, item, 1);
        }
        out.push_str("}\n");
        out
    }
}

impl ToLibertyString for Group {
    fn to_liberty_string(&self) -> String {
        let mut out = String::new();
        write_group(&mut out, self, 0);
        out
    }
}

fn write_item(out: &mut String, item: &GroupItem, depth: usize) {
    match item {
        GroupItem::Simple(attr) => {
            push_indent(out, depth);
            out.push_str(&attr.name);
            out.push_str(" : ");
            out.push_str(&attr.value.to_string());
            out.push_str(";\n");
        }
        GroupItem::Complex(attr) => {
            push_indent(out, depth);
            out.push_str(&attr.name);
            out.push_str(" (");
            push_values(out, &attr.values);
            out.push_str(");\n");
        }
        GroupItem::Group(group) => write_group(out, group, depth),
    }
}

fn write_group(out: &mut String, group: &Group, depth: usize) {
    push_indent(out, depth);
    out.push_str(&group.kind);
    out.push_str(" (");
    push_values(out, &group.names);
    out.push_str(") {\n");
    for member in &group.members {
        write_item(out, member, depth + 1);
    }
    push_indent(out, depth);
    out.push_str("}\n");
}

fn push_values(out: &mut String, values: &[Value]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&value.to_string());
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Library names are written bare when they scan as one identifier and
/// quoted otherwise, so the output always reparses.
fn ident_or_quoted(name: &str) -> String {
    let ident_shaped = name
        .chars()
        .enumerate()
        .all(|(i, c)| {
            if i == 0 {
                c.is_ascii_alphabetic() || c == '_' || c == '$'
            } else {
                c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')
            }
        })
        && !name.is_empty();

    if ident_shaped {
        name.to_string()
    } else {
        Value::QuotedString(name.to_string()).to_string()
    }
}
