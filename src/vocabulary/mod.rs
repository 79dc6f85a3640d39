/*!
# Vocabulary

Corpus vocabulary mining and the resulting known-word set.

- [`TrieMinHeap`] - bounded top-K frequency miner
- [`VocabularyBuilder`] - feeds identifier names and literal words of ASTs
  into a miner
- [`Vocabulary`] - the mined word set, persisted one word per line
*/

pub mod trie_heap;

pub use trie_heap::{TrieMinHeap, WordCount};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::ast::{normalize_literal, LiteralValue, Node, NodeKind};
use crate::core::SeqResult;

/// Word extracted from a node for vocabulary purposes, if any.
///
/// Identifiers contribute their name; literals contribute their normalized
/// raw text. Regex literals and placeholders contribute nothing.
pub fn vocabulary_word(node: &Node) -> Option<String> {
    match &node.kind {
        NodeKind::Identifier { name } => Some(name.clone()),
        NodeKind::Literal { value, raw, regex } => {
            if regex.is_some() || matches!(value, LiteralValue::Regex(_)) {
                None
            } else {
                Some(normalize_literal(raw))
            }
        }
        _ => None,
    }
}

/// Mines the most frequent identifiers and literals of a corpus
#[derive(Debug)]
pub struct VocabularyBuilder {
    miner: TrieMinHeap,
    asts: usize,
}

impl VocabularyBuilder {
    pub fn new(size: usize) -> SeqResult<Self> {
        Ok(Self {
            miner: TrieMinHeap::new(size)?,
            asts: 0,
        })
    }

    /// Counts every vocabulary word in the tree
    pub fn add_ast(&mut self, ast: &Node) {
        let mut stack = vec![ast];
        while let Some(node) = stack.pop() {
            if let Some(word) = vocabulary_word(node) {
                self.miner.increment(&word);
            }
            stack.extend(node.children());
        }
        self.asts += 1;
    }

    /// Number of trees added so far
    pub fn ast_count(&self) -> usize {
        self.asts
    }

    pub fn miner(&self) -> &TrieMinHeap {
        &self.miner
    }

    /// Top words, most frequent first
    pub fn top_words(&self) -> Vec<String> {
        self.miner
            .top_k_sorted()
            .into_iter()
            .map(|(word, _)| word.to_string())
            .collect()
    }

    pub fn build(&self) -> Vocabulary {
        Vocabulary::from_words(self.top_words())
    }
}

/// Set of known words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Loads a vocabulary file, one word per line; blank lines are ignored
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read vocabulary from {}", path.as_ref().display())
        })?;
        Ok(Self::from_words(
            content.lines().filter(|line| !line.is_empty()),
        ))
    }
}

/// Writes words one per line, in the given order
pub fn save_words<P: AsRef<Path>>(path: P, words: &[String]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }
    }
    std::fs::write(&path, words.join("\n")).with_context(|| {
        format!("Failed to write vocabulary to {}", path.as_ref().display())
    })
}
