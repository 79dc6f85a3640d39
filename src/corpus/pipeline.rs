//! Per-record processing shared by the CLI subcommands.
//!
//! Each function handles one commit-file and owns the trees it parses, so
//! records can be fanned out across worker threads. Failures are reported
//! per pair; the caller decides whether to log and move on.

use tracing::debug;

use super::record::{Category, CommitFile, PairType, SliceChangePair};
use crate::abstraction::{prepare, AbstractionSettings};
use crate::core::{SeqError, SeqResult};
use crate::mutation::mutant_sequences;
use crate::sequence::{generate, TokenSequence};
use crate::vocabulary::{Vocabulary, VocabularyBuilder};

/// Aligned before/after sequences of one pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePair {
    pub category: Category,
    pub buggy: TokenSequence,
    pub correct: TokenSequence,
}

/// Mutants of one after-tree plus the unmutated sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutantSet {
    /// Where the unmutated sequence goes: candidate for real repairs,
    /// nominal otherwise
    pub category: Category,
    pub original: TokenSequence,
    pub mutants: Vec<TokenSequence>,
}

/// Outcome of processing one commit-file
#[derive(Debug)]
pub struct RecordOutput<T> {
    pub project_id: String,
    pub items: Vec<T>,
    pub failures: Vec<(usize, SeqError)>,
}

impl<T> RecordOutput<T> {
    fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

fn each_pair<T, F>(record: &CommitFile, mut process: F) -> RecordOutput<T>
where
    F: FnMut(&SliceChangePair) -> SeqResult<Option<T>>,
{
    let mut output = RecordOutput::new(&record.project_id);
    for (index, pair) in record.slice_change_pairs.iter().enumerate() {
        match process(pair) {
            Ok(Some(item)) => output.items.push(item),
            Ok(None) => {}
            Err(e) => {
                debug!(index, error = %e, file = %record.file_name, "pair failed");
                output.failures.push((index, e));
            }
        }
    }
    output
}

/// Change-annotated sequences of a pair. A missing before-tree yields an
/// empty buggy sequence. Pairs labelled REPAIR go to the repair files.
pub fn annotated_pair(pair: &SliceChangePair) -> SeqResult<SequencePair> {
    let buggy = match pair.before_tree()? {
        Some(before) => generate(&before)?,
        None => TokenSequence::default(),
    };
    let correct = generate(&pair.after_tree()?)?;
    let category = if pair.is_repair() {
        Category::Repair
    } else {
        Category::Nominal
    };
    Ok(SequencePair {
        category,
        buggy,
        correct,
    })
}

/// Abstracted sequences of a pair, categorized by pair type. Pairs without
/// a before-tree are skipped.
pub fn abstracted_pair(
    pair: &SliceChangePair,
    settings: &AbstractionSettings,
    vocabulary: Option<&Vocabulary>,
) -> SeqResult<Option<SequencePair>> {
    let Some(mut before) = pair.before_tree()? else {
        return Ok(None);
    };
    let mut after = pair.after_tree()?;

    prepare(&mut before, settings, vocabulary);
    prepare(&mut after, settings, vocabulary);

    Ok(Some(SequencePair {
        category: Category::from(pair.pair_type),
        buggy: generate(&before)?,
        correct: generate(&after)?,
    }))
}

/// Missing-try mutants of the pair's after-tree
pub fn mutant_set(pair: &SliceChangePair) -> SeqResult<MutantSet> {
    let mut after = pair.after_tree()?;
    let original = generate(&after)?;
    let mutants = mutant_sequences(&mut after)?;
    let category = if pair.is_repair() {
        Category::Candidate
    } else {
        Category::Nominal
    };
    Ok(MutantSet {
        category,
        original,
        mutants,
    })
}

pub fn annotated_record(record: &CommitFile) -> RecordOutput<SequencePair> {
    each_pair(record, |pair| annotated_pair(pair).map(Some))
}

pub fn abstracted_record(
    record: &CommitFile,
    settings: &AbstractionSettings,
    vocabulary: Option<&Vocabulary>,
) -> RecordOutput<SequencePair> {
    each_pair(record, |pair| abstracted_pair(pair, settings, vocabulary))
}

pub fn mutant_record(record: &CommitFile) -> RecordOutput<MutantSet> {
    each_pair(record, |pair| mutant_set(pair).map(Some))
}

/// Feeds the after-trees of MUTANT_REPAIR pairs into the miner. Returns the
/// number of pairs that failed to parse.
pub fn mine_record(builder: &mut VocabularyBuilder, record: &CommitFile) -> usize {
    let mut failures = 0;
    for pair in &record.slice_change_pairs {
        if pair.pair_type != PairType::MutantRepair {
            continue;
        }
        match pair.after_tree() {
            Ok(after) => builder.add_ast(&after),
            Err(e) => {
                debug!(error = %e, file = %record.file_name, "skipping unparsable after-ast");
                failures += 1;
            }
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn try_program(change: &str) -> serde_json::Value {
        json!({
            "type": "Program",
            "body": [{
                "type": "TryStatement",
                "change-noprop": change,
                "block": {
                    "type": "BlockStatement",
                    "body": [{
                        "type": "ExpressionStatement",
                        "expression": { "type": "Identifier", "name": "work" }
                    }]
                },
                "handler": {
                    "type": "CatchClause",
                    "param": { "type": "Identifier", "name": "e" },
                    "body": { "type": "BlockStatement", "body": [] }
                },
                "finalizer": null
            }]
        })
    }

    fn record(pairs: Vec<serde_json::Value>) -> CommitFile {
        serde_json::from_value(json!({
            "projectID": "p",
            "url": "u",
            "fileName": "f.js",
            "sliceChangePair": pairs
        }))
        .unwrap()
    }

    #[test]
    fn test_annotated_pair_with_missing_before() {
        let output = annotated_record(&record(vec![json!({
            "before-ast": null,
            "after-ast": try_program("INSERTED"),
            "type": "REPAIR",
            "labels": ["REPAIR"]
        })]));

        assert!(output.failures.is_empty());
        let pair = &output.items[0];
        assert_eq!(pair.category, Category::Repair);
        assert!(pair.buggy.is_empty());
        assert_eq!(pair.correct.iter().next(), Some("~INSERTED_START~"));
    }

    #[test]
    fn test_mutant_set_unwraps_inserted_try() {
        let output = mutant_record(&record(vec![json!({
            "after-ast": try_program("INSERTED"),
            "type": "MUTANT_REPAIR",
            "labels": []
        })]));

        let set = &output.items[0];
        assert_eq!(set.category, Category::Nominal);
        assert_eq!(set.mutants.len(), 1);
        assert_eq!(set.mutants[0], ["work", ";"]);
    }

    #[test]
    fn test_failures_are_collected_per_pair() {
        let output = annotated_record(&record(vec![
            json!({ "after-ast": { "type": "Program", "body": [{ "type": "WithStatement" }] } }),
            json!({ "after-ast": try_program("UNCHANGED") }),
        ]));

        assert_eq!(output.items.len(), 1);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].0, 0);
    }

    #[test]
    fn test_abstracted_pair_skips_missing_before() {
        let settings = AbstractionSettings::default();
        let output = abstracted_record(
            &record(vec![json!({ "after-ast": try_program("UNCHANGED"), "type": "NOMINAL" })]),
            &settings,
            None,
        );
        assert!(output.items.is_empty());
        assert!(output.failures.is_empty());
    }

    #[test]
    fn test_mining_only_counts_mutant_repairs() {
        let mut builder = VocabularyBuilder::new(10).unwrap();
        let failures = mine_record(
            &mut builder,
            &record(vec![
                json!({ "after-ast": try_program("UNCHANGED"), "type": "MUTANT_REPAIR" }),
                json!({ "after-ast": try_program("UNCHANGED"), "type": "NOMINAL" }),
            ]),
        );
        assert_eq!(failures, 0);
        assert_eq!(builder.miner().count("work"), Some(1));
        assert_eq!(builder.miner().count("e"), Some(1));
    }
}
