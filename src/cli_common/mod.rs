//! Shared helpers for the command line front end
//!
//! - Logging initialization
//! - Colored status output
//! - Path checks and duration formatting

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod progress;

pub use args::{CommonArgs, CorpusArgs, SeqArgs};
pub use progress::ProgressReporter;

/// Initializes logging at the given level. `RUST_LOG` directives still apply.
pub fn init_logging(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ️".blue(), message);
}

/// Fails when `path` does not exist
pub fn validate_path(path: &Path, description: &str) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "{} does not exist: {}",
            description,
            path.display()
        ));
    }
    Ok(())
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Formats a duration for summaries: `500ms`, `1.250s`, `2m 5s`
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{:03}s", secs, millis)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}
