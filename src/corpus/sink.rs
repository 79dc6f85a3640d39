//! Line-oriented sequence files.
//!
//! Pairs go to `<prefix>-<category><bucket>.buggy` / `.correct`, single
//! sequences to `<prefix>-<category><bucket>.seq`. One space-separated
//! sequence per line. Files are truncated the first time a run writes them.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::record::Category;
use crate::sequence::TokenSequence;

pub const BUGGY_EXTENSION: &str = "buggy";
pub const CORRECT_EXTENSION: &str = "correct";
pub const SEQUENCE_EXTENSION: &str = "seq";

/// Path of one sequence file, e.g. `out/seq-mutant3.buggy`
pub fn sequence_path(prefix: &Path, category: Category, bucket: Option<usize>, extension: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    match bucket {
        Some(bucket) => name.push(format!("-{}{}.{}", category, bucket, extension)),
        None => name.push(format!("-{}.{}", category, extension)),
    }
    PathBuf::from(name)
}

/// Writes sequences to per-category, per-bucket files
pub struct SequenceSink {
    prefix: PathBuf,
    writers: BTreeMap<PathBuf, (BufWriter<File>, usize)>,
}

impl SequenceSink {
    pub fn new(prefix: impl Into<PathBuf>) -> Result<Self> {
        let prefix = prefix.into();
        if let Some(parent) = prefix.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }
        Ok(Self {
            prefix,
            writers: BTreeMap::new(),
        })
    }

    /// Appends an aligned buggy/correct pair
    pub fn write_pair(
        &mut self,
        category: Category,
        bucket: Option<usize>,
        buggy: &TokenSequence,
        correct: &TokenSequence,
    ) -> Result<()> {
        self.write_line(category, bucket, BUGGY_EXTENSION, buggy)?;
        self.write_line(category, bucket, CORRECT_EXTENSION, correct)
    }

    /// Appends a single sequence to the `.seq` file
    pub fn write_sequence(
        &mut self,
        category: Category,
        bucket: Option<usize>,
        sequence: &TokenSequence,
    ) -> Result<()> {
        self.write_line(category, bucket, SEQUENCE_EXTENSION, sequence)
    }

    fn write_line(
        &mut self,
        category: Category,
        bucket: Option<usize>,
        extension: &str,
        sequence: &TokenSequence,
    ) -> Result<()> {
        let path = sequence_path(&self.prefix, category, bucket, extension);
        if !self.writers.contains_key(&path) {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            self.writers.insert(path.clone(), (BufWriter::new(file), 0));
        }
        if let Some((writer, lines)) = self.writers.get_mut(&path) {
            writeln!(writer, "{}", sequence)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            *lines += 1;
        }
        Ok(())
    }

    /// Flushes every file and returns the number of lines written to each
    pub fn finish(self) -> Result<BTreeMap<PathBuf, usize>> {
        let mut written = BTreeMap::new();
        for (path, (mut writer, lines)) in self.writers {
            writer
                .flush()
                .with_context(|| format!("Failed to flush {}", path.display()))?;
            written.insert(path, lines);
        }
        Ok(written)
    }
}
