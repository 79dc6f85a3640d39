//! Shared command line arguments

use clap::Args;
use std::path::PathBuf;

/// Logging flags accepted by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Pipeline configuration file (.toml, .yaml or .yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Input corpus of commit-file records
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// JSONL file with one commit-file per line
    #[arg(long)]
    pub code: PathBuf,

    /// Stop after this many commit-files
    #[arg(long)]
    pub max: Option<usize>,
}

/// Output location of sequence files
#[derive(Args, Debug, Clone)]
pub struct SeqArgs {
    /// Path prefix of the sequence files, e.g. `output/seq`
    #[arg(long, default_value = "output/seq")]
    pub seq: PathBuf,
}

impl CommonArgs {
    /// Determines the log level from the flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether human-facing summaries should be printed
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}

impl CorpusArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.code.is_file() {
            return Err(format!("File not found: {}", self.code.display()));
        }
        if self.max == Some(0) {
            return Err("--max must be greater than zero".to_string());
        }
        Ok(())
    }
}
