//! Property-based round-trip tests
//!
//! For any library AST, rendering it to Liberty text and reparsing must
//! yield a structurally equal AST: names, values, and member order all
//! survive. The strategies below generate ASTs directly, shaped the way the
//! grammar can actually produce them (e.g. a bare identifier value is never
//! the text `true`, which the parser would classify as a boolean).

use liberty_parser::liberty::ast::{
    ComplexAttribute, Group, GroupItem, Library, SimpleAttribute, Value,
};
use liberty_parser::liberty::formats::ToLibertyString;
use liberty_parser::liberty::parsing::parse;
use proptest::prelude::*;

/// Generate identifier-shaped strings
fn ident_strategy() -> impl Strategy<Value = String> + Clone {
    "[A-Za-z_][A-Za-z0-9_]{0,10}"
        .prop_filter("boolean literals parse as booleans", |s| {
            s != "true" && s != "false"
        })
}

/// Generate quoted-string payloads, including characters that need escaping
/// and the separators that must stay inside the quotes.
fn quoted_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,;:(){}*+!'\"\\\\-]{0,20}").unwrap()
}

/// Generate expression text in the canonical spacing the parser itself
/// produces, so the round-trip is a fixed point.
fn expression_strategy() -> impl Strategy<Value = String> {
    let atom = ident_strategy();
    prop_oneof![
        (atom.clone(), ident_strategy()).prop_map(|(a, b)| format!("{a} * {b}")),
        (atom.clone(), ident_strategy()).prop_map(|(a, b)| format!("{a} + {b}")),
        atom.clone().prop_map(|a| format!("!{a}")),
        atom.clone().prop_map(|a| format!("{a}'")),
        (atom.clone(), ident_strategy()).prop_map(|(a, b)| format!("{a}' * {b}'")),
        (atom, ident_strategy()).prop_map(|(a, b)| format!("!{a} * {b}")),
    ]
}

fn number_strategy() -> impl Strategy<Value = Value> {
    (
        prop_oneof![
            (-1_000_000i64..1_000_000i64).prop_map(|n| n as f64),
            (-1000.0f64..1000.0f64),
        ],
        proptest::option::of("[a-z]{1,2}"),
    )
        .prop_map(|(value, unit)| Value::Number { value, unit })
}

fn bus_strategy() -> impl Strategy<Value = Value> {
    (ident_strategy(), 0u32..64, proptest::option::of(0u32..64))
        .prop_map(|(base, msb, lsb)| Value::BusIdentifier { base, msb, lsb })
}

/// Any attribute value
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        ident_strategy().prop_map(Value::Identifier),
        quoted_strategy().prop_map(Value::QuotedString),
        number_strategy(),
        bus_strategy(),
        any::<bool>().prop_map(Value::Boolean),
        expression_strategy().prop_map(Value::Expression),
    ]
}

/// Group names: identifiers, quoted strings, numbers, or bus indices
fn name_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        ident_strategy().prop_map(Value::Identifier),
        quoted_strategy().prop_map(Value::QuotedString),
        number_strategy(),
        bus_strategy(),
    ]
}

fn simple_attribute_strategy() -> impl Strategy<Value = GroupItem> {
    (ident_strategy(), value_strategy())
        .prop_map(|(name, value)| GroupItem::Simple(SimpleAttribute { name, value }))
}

fn complex_attribute_strategy() -> impl Strategy<Value = GroupItem> {
    (ident_strategy(), prop::collection::vec(value_strategy(), 0..4))
        .prop_map(|(name, values)| GroupItem::Complex(ComplexAttribute { name, values }))
}

/// Groups nest: up to three levels deep, a handful of members per level
fn group_item_strategy() -> impl Strategy<Value = GroupItem> {
    let leaf = prop_oneof![simple_attribute_strategy(), complex_attribute_strategy()];
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            ident_strategy(),
            prop::collection::vec(name_strategy(), 0..3),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(kind, names, members)| {
                GroupItem::Group(Group {
                    kind,
                    names,
                    members,
                })
            })
    })
}

fn library_strategy() -> impl Strategy<Value = Library> {
    (
        ident_strategy(),
        prop::collection::vec(group_item_strategy(), 0..4),
    )
        .prop_map(|(name, elements)| Library { name, elements })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip_library(library in library_strategy()) {
        let rendered = library.to_liberty_string();
        let reparsed = parse(&rendered)
            .unwrap_or_else(|e| panic!("rendered output failed to reparse: {e}\n{rendered}"));
        prop_assert_eq!(library, reparsed);
    }

    #[test]
    fn roundtrip_single_value(value in value_strategy()) {
        let library = Library {
            name: "probe".to_string(),
            elements: vec![GroupItem::Simple(SimpleAttribute {
                name: "attr".to_string(),
                value,
            })],
        };
        let rendered = library.to_liberty_string();
        let reparsed = parse(&rendered)
            .unwrap_or_else(|e| panic!("rendered output failed to reparse: {e}\n{rendered}"));
        prop_assert_eq!(library, reparsed);
    }
}
