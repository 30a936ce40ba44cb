use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::domain::ast::TranslationUnit;
use crate::domain::finding::Finding;
use crate::domain::source_map::PreparedSource;

/// Produces the text to parse for an input file.
pub trait SourceLoader {
    fn load(&self, path: &Path) -> Result<PreparedSource>;
}

/// Turns C source text into the domain syntax tree.
pub trait SyntaxTreeParser {
    fn parse(&self, source: &str) -> Result<TranslationUnit>;
}

pub trait ReportWriter {
    fn write(&self, findings: &[Finding], out: &mut dyn Write) -> std::io::Result<()>;
}
