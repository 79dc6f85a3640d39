//! Corpus files in, dataset files out

use pretty_assertions::assert_eq;
use repair_seq::abstraction::AbstractionSettings;
use repair_seq::corpus::{
    abstracted_record, build_folds, filter_directory, mine_record, mutant_record, read_lines,
    BucketAssigner, Category, CommitFile, SequenceSink, SplitOptions,
};
use repair_seq::vocabulary::{save_words, Vocabulary, VocabularyBuilder};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

fn call(callee: &str, argument: &str) -> Value {
    json!({
        "type": "ExpressionStatement",
        "expression": {
            "type": "CallExpression",
            "callee": ident(callee),
            "arguments": [ident(argument)]
        }
    })
}

fn guarded(callee: &str, argument: &str) -> Value {
    json!({
        "type": "Program",
        "body": [{
            "type": "TryStatement",
            "change-noprop": "INSERTED",
            "block": { "type": "BlockStatement", "body": [call(callee, argument)] },
            "handler": {
                "type": "CatchClause",
                "param": ident("e"),
                "body": { "type": "BlockStatement", "body": [] }
            },
            "finalizer": null
        }]
    })
}

fn commit_line(project: &str, pair_type: &str, after: Value) -> String {
    json!({
        "projectID": project,
        "url": format!("https://example.org/{}", project),
        "fileName": "index.js",
        "sliceChangePair": [{
            "before-ast": { "type": "Program", "body": [call("parse", "input")] },
            "after-ast": after,
            "type": pair_type,
            "labels": []
        }]
    })
    .to_string()
}

fn write_corpus(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("commits.jsonl");
    let lines = [
        commit_line("alpha", "MUTANT_REPAIR", guarded("parse", "input")),
        commit_line("beta", "MUTANT_REPAIR", guarded("parse", "body")),
        commit_line("alpha", "NOMINAL", guarded("load", "input")),
    ];
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

fn load(path: &std::path::Path) -> Vec<CommitFile> {
    read_lines(path)
        .unwrap()
        .iter()
        .map(|line| CommitFile::from_line(line).unwrap())
        .collect()
}

#[test]
fn test_vocabulary_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let records = load(&write_corpus(&dir));

    let mut builder = VocabularyBuilder::new(2).unwrap();
    for record in &records {
        assert_eq!(mine_record(&mut builder, record), 0);
    }
    assert_eq!(builder.ast_count(), 2);

    let words = builder.top_words();
    // ties sort by word
    assert_eq!(words, ["e", "parse"]);

    let path = dir.path().join("out").join("vocab.txt");
    save_words(&path, &words).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "e\nparse");

    let vocabulary = Vocabulary::load_from_file(&path).unwrap();
    assert!(vocabulary.contains("parse"));
    assert!(!vocabulary.contains("input"));
}

#[test]
fn test_abstracted_sequences_hide_unknown_words() {
    let dir = TempDir::new().unwrap();
    let records = load(&write_corpus(&dir));
    let vocabulary = Vocabulary::from_words(["parse"]);

    let output = abstracted_record(&records[0], &AbstractionSettings::default(), Some(&vocabulary));
    assert!(output.failures.is_empty());

    let pair = &output.items[0];
    assert_eq!(pair.category, Category::Mutant);
    assert_eq!(pair.buggy.to_string(), "parse ( __abs__identifier__1__ ) ;");
    // breadth first: the catch parameter is reached before the call argument
    assert_eq!(
        pair.correct.to_string(),
        "~INSERTED_START~ try { parse ( __abs__identifier__2__ ) ; } \
         catch ( __abs__identifier__1__ ) { } ~INSERTED_END~"
    );
}

#[test]
fn test_mutants_to_cross_validation_folds() {
    let dir = TempDir::new().unwrap();
    let records = load(&write_corpus(&dir));
    let seq_dir = dir.path().join("seq");

    let mut sink = SequenceSink::new(seq_dir.join("seq")).unwrap();
    let mut buckets = BucketAssigner::new(2);
    for record in &records {
        let output = mutant_record(record);
        assert!(output.failures.is_empty());
        let bucket = buckets.assign(&output.project_id);
        for set in &output.items {
            sink.write_sequence(set.category, Some(bucket), &set.original)
                .unwrap();
            for mutant in &set.mutants {
                sink.write_sequence(Category::Mutant, Some(bucket), mutant)
                    .unwrap();
            }
        }
    }
    let written = sink.finish().unwrap();

    // alpha -> bucket 0, beta -> bucket 1
    assert_eq!(written[&seq_dir.join("seq-mutant0.seq")], 2);
    assert_eq!(written[&seq_dir.join("seq-nominal0.seq")], 2);
    assert_eq!(written[&seq_dir.join("seq-mutant1.seq")], 1);
    assert_eq!(written[&seq_dir.join("seq-nominal1.seq")], 1);
    assert_eq!(
        fs::read_to_string(seq_dir.join("seq-mutant1.seq")).unwrap(),
        "parse ( body ) ;\n"
    );

    let options = SplitOptions {
        folds: 2,
        buckets: 2,
        nominal_sample_every: 1,
    };
    let out_dir = dir.path().join("xfold");
    let folds = build_folds(&seq_dir, "seq", &out_dir, &options).unwrap();

    // mutant lines carry no change markers and are omitted
    assert_eq!(folds[&0].test, 2);
    assert_eq!(folds[&0].train, 1);
    assert_eq!(folds[&0].omitted, 3);
    assert_eq!(
        fs::read_to_string(out_dir.join("test0.expected")).unwrap(),
        "NOMINAL\nNOMINAL\n"
    );
}

#[test]
fn test_length_filter_drops_long_pairs() {
    let dir = TempDir::new().unwrap();
    let seq_dir = dir.path().join("seq");
    let out_dir = dir.path().join("filtered");
    fs::create_dir_all(&seq_dir).unwrap();
    fs::write(seq_dir.join("seq-repair0.buggy"), "a b\na b c d e\n").unwrap();
    fs::write(seq_dir.join("seq-repair0.correct"), "a\na\n").unwrap();

    let results = filter_directory(&seq_dir, &out_dir, 3).unwrap();
    let stats = results[&(Category::Repair, 0)];
    assert_eq!((stats.kept, stats.dropped), (1, 1));
    assert_eq!(
        fs::read_to_string(out_dir.join("seq-repair0.buggy")).unwrap(),
        "a b\n"
    );

    fs::write(seq_dir.join("seq-repair0.correct"), "a\n").unwrap();
    assert!(filter_directory(&seq_dir, &out_dir, 3).is_err());
}
