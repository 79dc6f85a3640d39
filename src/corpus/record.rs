//! Commit-file records: one JSON object per line of a corpus file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::ast::Node;
use crate::core::{SeqError, SeqResult};

/// How a before/after pair was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairType {
    Nominal,
    MutantRepair,
    Repair,
    #[default]
    #[serde(other)]
    Other,
}

/// Output file family a sequence is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Nominal,
    Mutant,
    Repair,
    Error,
    Candidate,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Nominal => "nominal",
            Category::Mutant => "mutant",
            Category::Repair => "repair",
            Category::Error => "error",
            Category::Candidate => "candidate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nominal" => Some(Category::Nominal),
            "mutant" => Some(Category::Mutant),
            "repair" => Some(Category::Repair),
            "error" => Some(Category::Error),
            "candidate" => Some(Category::Candidate),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PairType> for Category {
    fn from(pair_type: PairType) -> Self {
        match pair_type {
            PairType::Nominal => Category::Nominal,
            PairType::MutantRepair => Category::Mutant,
            PairType::Repair => Category::Repair,
            PairType::Other => Category::Error,
        }
    }
}

/// One changed slice of a file, before and after the commit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SliceChangePair {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(rename = "before-ast", default)]
    pub before_ast: Option<serde_json::Value>,
    #[serde(rename = "after-ast", default)]
    pub after_ast: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub pair_type: PairType,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl SliceChangePair {
    /// Whether the pair is labelled as a real repair
    pub fn is_repair(&self) -> bool {
        self.labels.iter().any(|label| label == "REPAIR")
    }

    /// The before tree; `None` when the slice did not exist before the commit
    pub fn before_tree(&self) -> SeqResult<Option<Node>> {
        parse_tree(self.before_ast.as_ref())
    }

    /// The after tree, which every pair must carry
    pub fn after_tree(&self) -> SeqResult<Node> {
        parse_tree(self.after_ast.as_ref())?
            .ok_or_else(|| SeqError::malformed("slice change pair has no after-ast"))
    }
}

fn parse_tree(value: Option<&serde_json::Value>) -> SeqResult<Option<Node>> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => Node::deserialize(value).map(Some).map_err(SeqError::from),
    }
}

/// One line of a corpus file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFile {
    #[serde(rename = "projectID")]
    pub project_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "fileName", default)]
    pub file_name: String,
    #[serde(rename = "sliceChangePair", default)]
    pub slice_change_pairs: Vec<SliceChangePair>,
}

impl CommitFile {
    pub fn from_line(line: &str) -> SeqResult<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Non-empty lines of a corpus file, in order
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read corpus from {}", path.as_ref().display()))?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeType;
    use serde_json::json;

    #[test]
    fn test_parse_commit_file() {
        let line = json!({
            "projectID": "p1",
            "url": "https://example.org/repo",
            "fileName": "src/a.js",
            "sliceChangePair": [{
                "before": "x;",
                "after": "try { x; } catch (e) {}",
                "before-ast": null,
                "after-ast": { "type": "Program", "body": [] },
                "type": "MUTANT_REPAIR",
                "labels": ["REPAIR", "TRY"]
            }]
        })
        .to_string();

        let record = CommitFile::from_line(&line).unwrap();
        assert_eq!(record.project_id, "p1");
        let pair = &record.slice_change_pairs[0];
        assert_eq!(pair.pair_type, PairType::MutantRepair);
        assert!(pair.is_repair());
        assert!(pair.before_tree().unwrap().is_none());
        assert_eq!(pair.after_tree().unwrap().node_type(), NodeType::Program);
    }

    #[test]
    fn test_unknown_pair_type_maps_to_error_category() {
        let pair: SliceChangePair = serde_json::from_value(json!({ "type": "REFACTOR" })).unwrap();
        assert_eq!(pair.pair_type, PairType::Other);
        assert_eq!(Category::from(pair.pair_type), Category::Error);
        assert!(matches!(pair.after_tree(), Err(SeqError::MalformedInput(_))));
    }

    #[test]
    fn test_category_names() {
        for category in [
            Category::Nominal,
            Category::Mutant,
            Category::Repair,
            Category::Error,
            Category::Candidate,
        ] {
            assert_eq!(Category::from_name(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_name("bogus"), None);
    }
}
