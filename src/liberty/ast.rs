//! AST definitions and utilities for the Liberty format
//!
//!     This module provides the typed Abstract Syntax Tree produced by the
//!     parser, plus the source-position types used throughout the pipeline.
//!
//! Ownership
//!
//!     The AST is a plain ownership tree: each node owns its children, there
//!     is no interior mutability and no sharing. A `Library` can therefore
//!     move freely across threads, which is what the batch orchestrator
//!     relies on when handing per-file results back to the caller.
//!
//! Modules
//!
//!     - `elements` - the node types (`Library`, `Group`, attributes, `Value`)
//!     - `range` - `Position` and `SourceLocation` for byte → line:column

pub mod elements;
pub mod range;

pub use elements::{ComplexAttribute, Group, GroupItem, Library, SimpleAttribute, Value};
pub use range::{Position, SourceLocation};
