// Use case wiring for uninitc: load, parse, check, report.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::domain::finding::Finding;
use crate::domain::uninit::UninitializedDeclChecker;
use crate::infrastructure::{CppSourceLoader, JsonReport, RawSourceLoader, TextReport, TreeSitterCParser};
use crate::ports::{ReportWriter, SourceLoader, SyntaxTreeParser};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub format: OutputFormat,
    /// Run the preprocessor before parsing when set; `None` parses the raw file.
    pub preprocessor: Option<CppSourceLoader>,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            preprocessor: Some(CppSourceLoader::default()),
        }
    }
}

pub struct AnalyzeUsecase<'a> {
    pub loader: &'a dyn SourceLoader,
    pub parser: &'a dyn SyntaxTreeParser,
    pub reporter: &'a dyn ReportWriter,
}

impl<'a> AnalyzeUsecase<'a> {
    /// Findings for `path`, numbered by line of the input file. Declarations
    /// coming from included headers are dropped.
    pub fn analyze(&self, path: &Path) -> Result<Vec<Finding>> {
        let prepared = self.loader.load(path)?;
        let unit = self
            .parser
            .parse(&prepared.text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let findings: Vec<Finding> = UninitializedDeclChecker::check(&unit)
            .into_iter()
            .filter_map(|finding| {
                let line = prepared.map.resolve_primary(finding.line)?;
                Some(Finding { line, ..finding })
            })
            .collect();

        info!(path = %path.display(), findings = findings.len(), "analysis finished");
        Ok(findings)
    }

    pub fn run(&self, path: &Path, out: &mut dyn Write) -> Result<Vec<Finding>> {
        let findings = self.analyze(path)?;
        self.reporter
            .write(&findings, out)
            .context("Failed to write report")?;
        Ok(findings)
    }
}

/// Build the adapters described by `config` and run the analysis.
pub fn run_with_config(config: &AnalyzeConfig, path: &Path, out: &mut dyn Write) -> Result<Vec<Finding>> {
    let loader: &dyn SourceLoader = match &config.preprocessor {
        Some(cpp) => cpp,
        None => &RawSourceLoader,
    };
    let reporter: &dyn ReportWriter = match config.format {
        OutputFormat::Text => &TextReport,
        OutputFormat::Json => &JsonReport,
    };
    debug!(?config, "configured analysis");

    let usecase = AnalyzeUsecase {
        loader,
        parser: &TreeSitterCParser,
        reporter,
    };
    usecase.run(path, out)
}
