/// Source Map Module
///
/// Maps line numbers of the text handed to the parser back to the file and
/// line they came from. Preprocessed text carries GNU line markers
/// (`# 12 "foo.c" 2`) or `#line` directives; raw text maps to itself.

use std::path::{Path, PathBuf};

/// Where a parsed line originally came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub file: PathBuf,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct SourceMap {
    primary: PathBuf,
    /// Indexed by parsed line - 1. `None` for identity maps.
    lines: Option<Vec<Option<Origin>>>,
}

/// Source text ready for parsing together with its line map.
#[derive(Debug, Clone)]
pub struct PreparedSource {
    pub text: String,
    pub map: SourceMap,
}

impl SourceMap {
    pub fn identity(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            lines: None,
        }
    }

    pub fn primary(&self) -> &Path {
        &self.primary
    }

    /// Resolve a 1-based parsed line. `None` for marker lines and lines
    /// past the end of the map.
    pub fn resolve(&self, line: usize) -> Option<Origin> {
        match &self.lines {
            None => Some(Origin {
                file: self.primary.clone(),
                line,
            }),
            Some(lines) => lines.get(line.checked_sub(1)?).cloned().flatten(),
        }
    }

    /// Resolve a line and keep it only if it belongs to the primary file.
    pub fn resolve_primary(&self, line: usize) -> Option<usize> {
        self.resolve(line)
            .filter(|origin| origin.file == self.primary)
            .map(|origin| origin.line)
    }
}

impl PreparedSource {
    pub fn raw(primary: impl Into<PathBuf>, text: String) -> Self {
        Self {
            text,
            map: SourceMap::identity(primary),
        }
    }

    /// Build from preprocessor output. Marker lines are blanked so parsed
    /// line numbers equal preprocessed line numbers.
    pub fn from_preprocessed(primary: impl Into<PathBuf>, output: &str) -> Self {
        let primary = primary.into();
        let mut text = String::with_capacity(output.len());
        let mut lines = Vec::new();
        let mut file = primary.clone();
        let mut next_line = 1usize;

        for raw in output.lines() {
            match parse_line_marker(raw) {
                Some((line, marker_file)) => {
                    if let Some(marker_file) = marker_file {
                        file = PathBuf::from(marker_file);
                    }
                    next_line = line;
                    lines.push(None);
                }
                None => {
                    text.push_str(raw);
                    lines.push(Some(Origin {
                        file: file.clone(),
                        line: next_line,
                    }));
                    next_line += 1;
                }
            }
            text.push('\n');
        }

        Self {
            text,
            map: SourceMap {
                primary,
                lines: Some(lines),
            },
        }
    }
}

/// Parse `# <line> "<file>" <flags>` or `#line <line> "<file>"`.
fn parse_line_marker(line: &str) -> Option<(usize, Option<String>)> {
    let rest = line.trim_start().strip_prefix('#')?.trim_start();
    let rest = match rest.strip_prefix("line") {
        Some(after) if after.starts_with(char::is_whitespace) => after.trim_start(),
        _ => rest,
    };

    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let number: usize = rest[..digits_end].parse().ok()?;
    let rest = &rest[digits_end..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim_start();
    let file = rest.strip_prefix('"').map(unquote);
    Some((number, file))
}

/// Read a marker filename up to the closing quote, undoing `\"` and `\\`.
fn unquote(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
