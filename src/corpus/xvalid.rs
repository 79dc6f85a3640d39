//! Cross-validation split of classification sequences.
//!
//! Reads `seq-<category><bucket>.seq` files and, for each fold, writes
//! `test<fold>` from the bucket equal to the fold and `train<fold>` from all
//! other buckets. Each `.input` line has a matching label in `.expected`.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::record::Category;
use super::sink::{sequence_path, SEQUENCE_EXTENSION};

pub const MISSING_TRY_LABEL: &str = "MISSING_TRY";
pub const NOMINAL_LABEL: &str = "NOMINAL";

/// Categories taking part in the split, in processing order
pub const SPLIT_CATEGORIES: [Category; 3] =
    [Category::Candidate, Category::Mutant, Category::Nominal];

/// Classification label of a category
pub fn label_for(category: Category) -> &'static str {
    match category {
        Category::Mutant => MISSING_TRY_LABEL,
        _ => NOMINAL_LABEL,
    }
}

/// Whether a sequence carries an update or insertion marker
pub fn has_change(sequence: &str) -> bool {
    sequence.contains("~UPDATED_START") || sequence.contains("~INSERTED_START")
}

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub folds: usize,
    pub buckets: usize,
    /// Keep one nominal sequence in this many
    pub nominal_sample_every: usize,
}

/// Line counts of one fold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    pub train: usize,
    pub test: usize,
    /// Sequences without change markers
    pub omitted: usize,
    /// Nominal sequences left out by sampling
    pub skipped: usize,
}

struct LabelledWriter {
    input: BufWriter<File>,
    expected: BufWriter<File>,
}

impl LabelledWriter {
    fn create(out_dir: &Path, name: &str) -> Result<Self> {
        let open = |extension: &str| -> Result<BufWriter<File>> {
            let path = out_dir.join(format!("{}.{}", name, extension));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(BufWriter::new(file))
        };
        Ok(Self {
            input: open("input")?,
            expected: open("expected")?,
        })
    }

    fn write(&mut self, sequence: &str, label: &str) -> Result<()> {
        writeln!(self.input, "{}", sequence)?;
        writeln!(self.expected, "{}", label)?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.input.flush()?;
        self.expected.flush()?;
        Ok(())
    }
}

/// Builds every fold from the `.seq` files under `seq_dir`.
///
/// `prefix_name` is the file name prefix used when the sequences were
/// written (usually `seq`). Missing bucket files are treated as empty.
pub fn build_folds(
    seq_dir: &Path,
    prefix_name: &str,
    out_dir: &Path,
    options: &SplitOptions,
) -> Result<BTreeMap<usize, FoldStats>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    let prefix: PathBuf = seq_dir.join(prefix_name);
    let sample_every = options.nominal_sample_every.max(1);
    let mut results = BTreeMap::new();

    for fold in 0..options.folds {
        let mut train = LabelledWriter::create(out_dir, &format!("train{}", fold))?;
        let mut test = LabelledWriter::create(out_dir, &format!("test{}", fold))?;
        let mut stats = FoldStats::default();

        for bucket in 0..options.buckets {
            let is_test = bucket == fold;
            for category in SPLIT_CATEGORIES {
                let path = sequence_path(&prefix, category, Some(bucket), SEQUENCE_EXTENSION);
                if !path.exists() {
                    debug!(path = %path.display(), "no sequence file");
                    continue;
                }
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;

                let label = label_for(category);
                let mut nominal_seen = 0usize;
                for line in content.lines().filter(|line| !line.is_empty()) {
                    if !has_change(line) {
                        stats.omitted += 1;
                        continue;
                    }
                    if category == Category::Nominal {
                        nominal_seen += 1;
                        if (nominal_seen - 1) % sample_every != 0 {
                            stats.skipped += 1;
                            continue;
                        }
                    }
                    if is_test {
                        test.write(line, label)?;
                        stats.test += 1;
                    } else {
                        train.write(line, label)?;
                        stats.train += 1;
                    }
                }
            }
        }

        train.finish()?;
        test.finish()?;
        info!(
            fold,
            train = stats.train,
            test = stats.test,
            omitted = stats.omitted,
            skipped = stats.skipped,
            "built cross-validation fold"
        );
        results.insert(fold, stats);
    }

    Ok(results)
}
