//! Length filter over buggy/correct sequence file pairs.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::record::Category;

static PAIR_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"seq-(repair|mutant|nominal)(\d+)\.(buggy|correct)$").expect("valid regex")
});

/// Buggy/correct files of one category and bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePair {
    pub buggy: Option<PathBuf>,
    pub correct: Option<PathBuf>,
}

/// Counts for one filtered pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub dropped: usize,
}

/// Finds `seq-<category><bucket>.<buggy|correct>` files directly in `dir`
pub fn discover_pairs(dir: &Path) -> Result<BTreeMap<(Category, usize), FilePair>> {
    let mut pairs: BTreeMap<(Category, usize), FilePair> = BTreeMap::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let Some(captures) = PAIR_FILE.captures(&name) else {
            continue;
        };

        let Some(category) = Category::from_name(&captures[1]) else {
            continue;
        };
        let bucket: usize = captures[2]
            .parse()
            .with_context(|| format!("Invalid bucket number in {}", name))?;

        let pair = pairs.entry((category, bucket)).or_default();
        match &captures[3] {
            "buggy" => pair.buggy = Some(entry.path().to_path_buf()),
            _ => pair.correct = Some(entry.path().to_path_buf()),
        }
    }

    Ok(pairs)
}

/// Token count of a space-separated sequence line
pub fn sequence_length(line: &str) -> usize {
    line.split_whitespace().count()
}

/// Copies aligned lines whose buggy and correct sequences both fit in
/// `max_length` tokens. Files with different line counts are an error.
pub fn filter_pair(
    buggy: &Path,
    correct: &Path,
    out_dir: &Path,
    max_length: usize,
) -> Result<FilterStats> {
    let buggy_content = std::fs::read_to_string(buggy)
        .with_context(|| format!("Failed to read {}", buggy.display()))?;
    let correct_content = std::fs::read_to_string(correct)
        .with_context(|| format!("Failed to read {}", correct.display()))?;

    let buggy_lines: Vec<&str> = buggy_content.lines().collect();
    let correct_lines: Vec<&str> = correct_content.lines().collect();
    if buggy_lines.len() != correct_lines.len() {
        bail!(
            "File pairs must have the same number of sequences: {} has {}, {} has {}",
            buggy.display(),
            buggy_lines.len(),
            correct.display(),
            correct_lines.len()
        );
    }

    let mut buggy_out = create_output(out_dir, buggy)?;
    let mut correct_out = create_output(out_dir, correct)?;
    let mut stats = FilterStats::default();

    for (b, c) in buggy_lines.iter().zip(&correct_lines) {
        if sequence_length(b) <= max_length && sequence_length(c) <= max_length {
            writeln!(buggy_out, "{}", b)?;
            writeln!(correct_out, "{}", c)?;
            stats.kept += 1;
        } else {
            stats.dropped += 1;
        }
    }

    buggy_out.flush()?;
    correct_out.flush()?;
    Ok(stats)
}

fn create_output(out_dir: &Path, input: &Path) -> Result<BufWriter<File>> {
    let name = input
        .file_name()
        .with_context(|| format!("No file name in {}", input.display()))?;
    let path = out_dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Filters every complete pair in `seq_dir` into `out_dir`
pub fn filter_directory(
    seq_dir: &Path,
    out_dir: &Path,
    max_length: usize,
) -> Result<BTreeMap<(Category, usize), FilterStats>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    let mut results = BTreeMap::new();
    for (key, pair) in discover_pairs(seq_dir)? {
        let (Some(buggy), Some(correct)) = (&pair.buggy, &pair.correct) else {
            debug!(category = %key.0, bucket = key.1, "incomplete pair, skipping");
            continue;
        };
        let stats = filter_pair(buggy, correct, out_dir, max_length)?;
        info!(
            category = %key.0,
            bucket = key.1,
            kept = stats.kept,
            dropped = stats.dropped,
            "filtered sequence pair"
        );
        results.insert(key, stats);
    }
    Ok(results)
}
