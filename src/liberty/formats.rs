//! Output formats
//!
//!     Consumers of the AST sometimes need Liberty text back: fixtures,
//!     golden files, and the round-trip property tests all re-serialize a
//!     `Library`. The [writer] module provides that; JSON snapshots come
//!     for free from the serde derives on the AST types.

pub mod writer;

pub use writer::ToLibertyString;
