// Infrastructure implementations for uninitc.

pub mod c_parser;
pub mod report;
pub mod source_loader;

pub use c_parser::{ParseError, TreeSitterCParser};
pub use report::{JsonReport, TextReport};
pub use source_loader::{CppSourceLoader, RawSourceLoader};
