// Command-line entry point for uninitc.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uninitc::application::{run_with_config, AnalyzeConfig, OutputFormat};
use uninitc::infrastructure::source_loader::DEFAULT_CPP_COMMAND;
use uninitc::infrastructure::CppSourceLoader;

const USAGE: &str = "Please provide a file name as an argument";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// C source file to scan
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Parse the file as written, without running the C preprocessor
    #[arg(long)]
    no_cpp: bool,

    /// Preprocessor program
    #[arg(long, default_value = DEFAULT_CPP_COMMAND)]
    cpp_command: String,

    /// Include directory for the preprocessor (can specify multiple)
    #[arg(short = 'I', long = "include")]
    include_dirs: Vec<PathBuf>,

    /// Macro definition for the preprocessor, NAME or NAME=VALUE (can specify multiple)
    #[arg(short = 'D', long = "define")]
    defines: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> AnalyzeConfig {
        AnalyzeConfig {
            format: self.format,
            preprocessor: (!self.no_cpp).then(|| CppSourceLoader {
                command: self.cpp_command.clone(),
                include_dirs: self.include_dirs.clone(),
                defines: self.defines.clone(),
                fallback_to_raw: true,
            }),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Print the usage line when no file is given, otherwise analyze it.
fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let Some(path) = &cli.file else {
        writeln!(out, "{}", USAGE)?;
        return Ok(());
    };
    run_with_config(&cli.config(), path, out)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&cli, &mut out) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_no_file_prints_usage_only() {
        // A missing preprocessor and JSON output would both show up if the
        // file path were ever followed.
        let cli = Cli::parse_from(["uninitc", "--format", "json", "--cpp-command", "definitely-not-a-preprocessor"]);
        let mut out = Vec::new();
        run(&cli, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", USAGE));
    }

    #[test]
    fn test_preprocessing_on_by_default() {
        let cli = Cli::parse_from(["uninitc", "a.c", "-I", "inc", "-D", "X=1"]);
        let cpp = cli.config().preprocessor.expect("preprocessor enabled by default");
        assert_eq!(cpp.command, "cpp");
        assert_eq!(cpp.include_dirs, vec![PathBuf::from("inc")]);
        assert_eq!(cpp.defines, vec!["X=1".to_string()]);
    }

    #[test]
    fn test_no_cpp_parses_raw() {
        let cli = Cli::parse_from(["uninitc", "--no-cpp", "a.c"]);
        assert!(cli.config().preprocessor.is_none());
    }

    #[test]
    fn test_run_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.c");
        fs::write(&path, "void f(void) {\n  extern int counter;\n  int x;\n}\n").unwrap();

        let cli = Cli::parse_from(["uninitc", "--no-cpp", path.to_str().unwrap()]);
        let mut out = Vec::new();
        run(&cli, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "line 2: extern int counter\nline 3: int x\n"
        );
    }
}
