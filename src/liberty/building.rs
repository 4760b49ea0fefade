//! AST building
//!
//!     The modules here consume the untyped parse tree and produce typed
//!     values: [ast_tree] converts rule-tagged nodes into the domain model,
//!     and [extraction] flattens a parsed cell into the characteristics
//!     record the netlist-emission side consumes.

pub mod ast_tree;
pub mod extraction;
