//! Core token types shared across the scanner, parser, and tooling.

pub mod core;

pub use core::{BusIndex, NumberLit, Token};
