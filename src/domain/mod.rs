// Domain model for uninitc: syntax tree, traversal, and findings.

pub mod ast;
pub mod finding;
pub mod source_map;
pub mod uninit;
pub mod visit;
