//! # liberty-parser
//!
//! A parser for the Liberty cell-library format.
//!
//! Liberty files describe standard-cell characterization data (cells, pins,
//! buses, timing groups, attributes) as a tree of nested named groups. This
//! crate turns that text into a typed AST suitable for downstream tooling
//! such as netlist generation and timing analysis.
//!
//! Pipeline
//!
//!     The parsing pipeline has three stages, each with its own module:
//!
//!         1. Scanning: source text is tokenized with a logos lexer. See
//!            [lexing](liberty::lexing).
//!         2. Grammar evaluation: a PEG engine applies the declarative
//!            Liberty grammar to the token stream and produces an untyped,
//!            rule-tagged parse tree. See [parsing](liberty::parsing).
//!         3. AST building: the parse tree is walked bottom-up and converted
//!            into the typed domain model. See [building](liberty::building)
//!            and [ast](liberty::ast).
//!
//!     The [batch](liberty::batch) module fans this pipeline out over many
//!     files with a bounded worker pool and fans the results back in as one
//!     entry per input path.
//!
//! Entry points
//!
//!     Most callers only need [`parse`] for a single source text and
//!     [`parse_all`] for a set of files.

pub mod liberty;

pub use liberty::ast::{ComplexAttribute, Group, GroupItem, Library, SimpleAttribute, Value};
pub use liberty::batch::{parse_all, parse_all_with_options, BatchOptions};
pub use liberty::error::{Error, ParseError, ScanError, TransformError};
pub use liberty::parsing::{parse, parse_with_options, ParseOptions};
