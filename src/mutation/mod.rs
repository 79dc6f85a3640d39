/*!
# Try-Statement Mutation Generator

Manufactures "missing try" examples: every try-statement the change
INSERTED is unwrapped in turn, the mutated tree is linearized, and the tree
is put back.

```rust,ignore
let mut ast = Node::from_json(json)?;
for mutant in MutationGenerator::new(&mut ast) {
    match mutant? {
        Mutant::Sequence(tokens) => println!("{}", tokens),
        Mutant::Skipped { owner } => eprintln!("skipped try owned by {}", owner),
    }
}
// ast is structurally identical to what was parsed
```

The generator borrows the tree mutably for its whole lifetime, so no other
code can observe a half-mutated tree.
*/

pub mod discovery;
pub mod patch;

pub use discovery::{discover, Candidate};
pub use patch::{detach, Patch};

use tracing::debug;

use crate::ast::{Node, NodeType};
use crate::core::{SeqError, SeqResult};
use crate::sequence::{generate, TokenSequence};

/// Outcome of one mutation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutant {
    /// Sequence of the tree with one try-statement unwrapped
    Sequence(TokenSequence),
    /// The try's owner has no detach rule; the candidate is consumed
    Skipped { owner: NodeType },
}

impl Mutant {
    pub fn sequence(&self) -> Option<&TokenSequence> {
        match self {
            Mutant::Sequence(tokens) => Some(tokens),
            Mutant::Skipped { .. } => None,
        }
    }

    pub fn into_sequence(self) -> Option<TokenSequence> {
        match self {
            Mutant::Sequence(tokens) => Some(tokens),
            Mutant::Skipped { .. } => None,
        }
    }
}

/// Iterator over the mutants of one tree. `None` is the end marker.
#[derive(Debug)]
pub struct MutationGenerator<'a> {
    ast: &'a mut Node,
    candidates: Vec<Candidate>,
    cursor: usize,
}

impl<'a> MutationGenerator<'a> {
    /// Discovers candidates; the list and its order are fixed from here on
    pub fn new(ast: &'a mut Node) -> Self {
        let candidates = discover(ast);
        debug!(candidates = candidates.len(), "discovered try-statement mutations");
        Self {
            ast,
            candidates,
            cursor: 0,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidates not yet consumed
    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.cursor
    }

    fn mutate(&mut self, candidate: &Candidate) -> SeqResult<Mutant> {
        let patch = match detach(self.ast, candidate) {
            Ok(patch) => patch,
            Err(SeqError::UnsupportedOwnerKind(owner)) => {
                debug!(%owner, path = ?candidate.path(), "skipping try-statement");
                return Ok(Mutant::Skipped { owner });
            }
            Err(e) => return Err(e),
        };

        // restore even when generation fails
        let generated = generate(self.ast);
        patch.restore(self.ast)?;
        generated.map(Mutant::Sequence)
    }
}

impl Iterator for MutationGenerator<'_> {
    type Item = SeqResult<Mutant>;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.candidates.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(self.mutate(&candidate))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for MutationGenerator<'_> {}

/// Sequences of every supported mutant of `ast`, skipping unsupported owners
pub fn mutant_sequences(ast: &mut Node) -> SeqResult<Vec<TokenSequence>> {
    let mut sequences = Vec::new();
    for mutant in MutationGenerator::new(ast) {
        if let Some(tokens) = mutant?.into_sequence() {
            sequences.push(tokens);
        }
    }
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ChangeTag;
    use serde_json::json;

    fn statement(name: &str) -> serde_json::Value {
        json!({
            "type": "ExpressionStatement",
            "expression": { "type": "Identifier", "name": name }
        })
    }

    fn inserted_try(body: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "type": "TryStatement",
            "change-noprop": "INSERTED",
            "block": { "type": "BlockStatement", "body": body },
            "handler": {
                "type": "CatchClause",
                "param": { "type": "Identifier", "name": "e" },
                "body": { "type": "BlockStatement", "body": [] }
            },
            "finalizer": null
        })
    }

    #[test]
    fn test_flattened_owner_body() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [statement("A"), inserted_try(vec![statement("B")]), statement("C")]
        }))
        .unwrap();
        let original = ast.clone();
        let flattened = Node::from_value(json!({
            "type": "Program",
            "body": [statement("A"), statement("B"), statement("C")]
        }))
        .unwrap();

        let mutants: Vec<Mutant> = MutationGenerator::new(&mut ast)
            .collect::<SeqResult<_>>()
            .unwrap();

        assert_eq!(mutants, vec![Mutant::Sequence(generate(&flattened).unwrap())]);
        assert_eq!(ast, original);
    }

    #[test]
    fn test_skipped_owner_consumes_candidate() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [
                {
                    "type": "SwitchStatement",
                    "discriminant": { "type": "Identifier", "name": "x" },
                    "cases": [{ "type": "SwitchCase", "test": null, "consequent": [inserted_try(vec![])] }]
                },
                inserted_try(vec![statement("B")])
            ]
        }))
        .unwrap();
        let original = ast.clone();

        let mut generator = MutationGenerator::new(&mut ast);
        assert_eq!(generator.len(), 2);

        let first = generator.next().unwrap().unwrap();
        assert_eq!(first, Mutant::Skipped { owner: NodeType::SwitchCase });
        assert_eq!(generator.remaining(), 1);

        let second = generator.next().unwrap().unwrap();
        assert!(second.sequence().is_some());
        assert!(generator.next().is_none());
        assert!(generator.next().is_none());
        drop(generator);

        assert_eq!(ast, original);
    }

    #[test]
    fn test_inherited_statement_is_exposed_as_inserted() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "IfStatement",
                "test": { "type": "Identifier", "name": "c" },
                "consequent": inserted_try(vec![json!({
                    "type": "ReturnStatement",
                    "change-noprop": "INHERITED",
                    "argument": null
                })]),
                "alternate": null
            }]
        }))
        .unwrap();

        let sequences = mutant_sequences(&mut ast).unwrap();
        assert_eq!(
            sequences,
            vec![generate(
                &Node::from_value(json!({
                    "type": "Program",
                    "body": [{
                        "type": "IfStatement",
                        "test": { "type": "Identifier", "name": "c" },
                        "consequent": { "type": "ReturnStatement", "change-noprop": "INSERTED", "argument": null },
                        "alternate": null
                    }]
                }))
                .unwrap()
            )
            .unwrap()]
        );
        assert!(sequences[0].iter().any(|t| t == "~INSERTED_START~"));

        // the tag is concealed again after the pass
        let restored = discovery::node_at(&ast, &[0, 1, 0, 0]).unwrap();
        assert_eq!(restored.change, ChangeTag::Inherited);
    }

    #[test]
    fn test_generation_failure_still_restores() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [inserted_try(vec![json!({
                "type": "WithStatement",
                "object": { "type": "Identifier", "name": "o" },
                "body": { "type": "EmptyStatement" }
            })])]
        }))
        .unwrap();
        let original = ast.clone();

        let results: Vec<SeqResult<Mutant>> = MutationGenerator::new(&mut ast).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(SeqError::UnsupportedNodeKind { .. })));
        assert_eq!(ast, original);
    }

    #[test]
    fn test_no_candidates() {
        let mut ast = Node::from_value(json!({ "type": "Program", "body": [statement("A")] })).unwrap();
        let mut generator = MutationGenerator::new(&mut ast);
        assert!(generator.candidates().is_empty());
        assert!(generator.next().is_none());
    }
}
