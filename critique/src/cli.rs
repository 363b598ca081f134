//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use critique_core::Language;

/// Terminal client that sends source code to Gemini for a structured review.
#[derive(Debug, Parser)]
#[command(name = "critique", version, about)]
pub struct Cli {
    /// Source file to load at startup.
    pub file: Option<PathBuf>,

    /// Initial language tag (javascript, python, rust, ...).
    #[arg(short, long, value_parser = parse_language)]
    pub language: Option<Language>,

    /// Run a single review of FILE without the TUI and print the report.
    #[arg(long, requires = "file")]
    pub print: bool,

    /// Write the printed report to this path instead of stdout.
    #[arg(short, long, requires = "print")]
    pub output: Option<PathBuf>,

    /// Alternate config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model name, e.g. gemini-2.5-flash.
    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,

    /// Log file location.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_language(raw: &str) -> Result<Language, String> {
    raw.parse::<Language>().map_err(|e| e.to_string())
}
