/// Source Loaders.
///
/// - `RawSourceLoader`: reads the file as-is; lines map to themselves.
/// - `CppSourceLoader`: runs the C preprocessor and keeps its line markers
///   so findings can be mapped back to the input file. Falls back to the raw
///   source when the preprocessor is not installed, unless told not to.
///
/// Bytes that are not valid UTF-8 (Latin-1 comments, mostly) are replaced
/// with U+FFFD rather than rejecting the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::domain::source_map::PreparedSource;
use crate::ports::SourceLoader;

pub const DEFAULT_CPP_COMMAND: &str = "cpp";

// ═══════════════════════════════════════════════════════════════════════════
// Raw source
// ═══════════════════════════════════════════════════════════════════════════

pub struct RawSourceLoader;

impl SourceLoader for RawSourceLoader {
    fn load(&self, path: &Path) -> Result<PreparedSource> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        let text = decode(bytes, path);
        debug!(path = %path.display(), bytes = text.len(), "read source");
        Ok(PreparedSource::raw(path, text))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Preprocessed source
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppSourceLoader {
    pub command: String,
    pub include_dirs: Vec<PathBuf>,
    pub defines: Vec<String>,
    /// Parse the raw file when `command` is not installed.
    pub fallback_to_raw: bool,
}

impl Default for CppSourceLoader {
    fn default() -> Self {
        Self {
            command: DEFAULT_CPP_COMMAND.to_string(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            fallback_to_raw: true,
        }
    }
}

impl CppSourceLoader {
    /// Arguments passed to the preprocessor for `path`, input last.
    pub fn args(&self, path: &Path) -> Vec<String> {
        let mut args = Vec::with_capacity(self.include_dirs.len() + self.defines.len() + 1);
        args.extend(self.include_dirs.iter().map(|dir| format!("-I{}", dir.display())));
        args.extend(self.defines.iter().map(|def| format!("-D{}", def)));
        args.push(path.display().to_string());
        args
    }
}

impl SourceLoader for CppSourceLoader {
    fn load(&self, path: &Path) -> Result<PreparedSource> {
        if !path.is_file() {
            bail!("Failed to read file {}: not found", path.display());
        }

        let args = self.args(path);
        info!(command = %self.command, ?args, "running preprocessor");

        let output = match Command::new(&self.command).args(&args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.fallback_to_raw {
                    warn!(command = %self.command, "preprocessor not found, parsing the raw source");
                    return RawSourceLoader.load(path);
                }
                bail!("Preprocessor `{}` not found in PATH", self.command);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to execute {}", self.command));
            }
        };

        if !output.status.success() {
            bail!(
                "{} failed with exit code {:?}: {}",
                self.command,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let text = decode(output.stdout, path);
        debug!(bytes = text.len(), "preprocessed source");

        // Markers name the input exactly as it was passed on the command line.
        Ok(PreparedSource::from_preprocessed(path.display().to_string(), &text))
    }
}

fn decode(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), "source is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
