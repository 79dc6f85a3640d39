/*!
# repair-seq

Training data preparation for sequence-based program repair models.

Takes JavaScript ASTs already annotated with per-node change tags by an
external diff step and turns them into flat token sequences: raw
change-annotated sequences, abstracted sequences with nested structure and
rare words hidden, and synthetic "missing try" mutants used as negative
examples for repair classification.

## Architecture

```text
repair-seq
├── ast          - ESTree node model, change tags, literal normalization
├── sequence     - change-aware AST -> token sequence generator
├── abstraction  - depth-bounded and vocabulary abstraction passes
├── vocabulary   - trie-backed bounded top-K word miner
├── mutation     - reversible try-statement removal
├── corpus       - commit-file records, buckets, sinks, filter, folds
├── config       - TOML/YAML pipeline configuration
└── cli_common   - logging and terminal helpers for the binary
```

## Usage

### CLI
```bash
# Mine the vocabulary
repair-seq vocab --code data/commits.jsonl --output output/vocab.txt

# Abstracted sequences bucketed by project
repair-seq abstract --code data/commits.jsonl --vocab output/vocab.txt --seq output/seq

# Missing-try mutants, then the cross-validation split
repair-seq mutants --code data/commits.jsonl --seq output/seq
repair-seq xvalid --dir output --out output/xfold
```

### Library
```rust,ignore
use repair_seq::{generate_sequence, mutation::MutationGenerator, Node};

let mut ast = Node::from_json(&annotated)?;
println!("{}", generate_sequence(&ast)?);

for mutant in MutationGenerator::new(&mut ast) {
    if let Some(tokens) = mutant?.sequence() {
        println!("{}", tokens);
    }
}
```
*/

pub mod abstraction;
pub mod ast;
pub mod cli_common;
pub mod config;
pub mod core;
pub mod corpus;
pub mod mutation;
pub mod sequence;
pub mod vocabulary;

pub use abstraction::{prepare, AbstractionContext, AbstractionSettings, PlaceholderMap};
pub use ast::{ChangeTag, Node, NodeKind, NodeType};
pub use config::PipelineConfig;
pub use core::{SeqError, SeqResult};
pub use mutation::{Mutant, MutationGenerator};
pub use sequence::TokenSequence;
pub use vocabulary::{TrieMinHeap, Vocabulary, VocabularyBuilder};

/// Linearizes an annotated tree. Pure: the same tree always yields the same
/// sequence.
pub fn generate_sequence(ast: &Node) -> SeqResult<TokenSequence> {
    sequence::generate(ast)
}

/// Replaces mapped node kinds at or below `min_depth` with placeholders.
/// Returns the number of replaced nodes.
pub fn abstract_depth(ast: &mut Node, placeholders: &PlaceholderMap, min_depth: usize) -> usize {
    abstraction::abstract_depth(ast, placeholders, min_depth)
}

/// Hides identifiers and literals outside `vocabulary`, numbering the
/// abstracted identifiers. Returns the number of replaced nodes.
pub fn abstract_vocab(ast: &mut Node, vocabulary: &Vocabulary) -> usize {
    abstraction::VocabularyAbstractor::new(vocabulary)
        .with_unique_identifiers(true)
        .apply(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_surface_functions() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "ExpressionStatement",
                "change-noprop": "UPDATED",
                "expression": {
                    "type": "CallExpression",
                    "callee": { "type": "Identifier", "name": "log" },
                    "arguments": [
                        { "type": "Literal", "value": 42, "raw": "42" },
                        { "type": "Identifier", "name": "user" }
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(
            generate_sequence(&ast).unwrap().to_string(),
            "~UPDATED_START~ log ( 42 , user ) ; ~UPDATED_END~"
        );

        let replaced = abstract_depth(&mut ast, &abstraction::default_placeholders(), 0);
        assert_eq!(replaced, 0);

        let vocab = Vocabulary::from_words(["log"]);
        assert_eq!(abstract_vocab(&mut ast, &vocab), 2);
        assert_eq!(
            generate_sequence(&ast).unwrap().to_string(),
            "~UPDATED_START~ log ( __abs__numlit , __abs__identifier__1__ ) ; ~UPDATED_END~"
        );
    }
}
