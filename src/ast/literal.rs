//! Literal values and the single normalization rule shared by every pass
//! that turns literal source text into a word.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapses every whitespace run in a literal's raw text to `_`, so the
/// literal is exactly one word.
///
/// The sequence generator, the vocabulary builder and the vocabulary
/// abstractor all go through this function; membership tests depend on it.
pub fn normalize_literal(raw: &str) -> String {
    WHITESPACE.replace_all(raw, "_").into_owned()
}

/// Regex payload as esprima reports it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexValue {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub flags: Option<String>,
}

/// Cooked value of a literal.
///
/// Regex literals serialize their value as an object (`{}` after a JSON
/// round trip), which lands in the `Regex` arm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Number(f64),
    String(String),
    Regex(RegexValue),
    #[default]
    Null,
}
