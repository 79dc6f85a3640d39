/*!
# Change-Aware Sequence Generator

Linearizes an annotated AST into a flat list of word tokens.

Two mutually recursive production families mirror the source syntax:
statement-level productions live in `statements.rs`, expression-level ones
in `expressions.rs`. A node whose change tag is INSERTED, REMOVED or UPDATED
has its sub-sequence wrapped in `~<TAG>_START~ ... ~<TAG>_END~`; wrapping
nests freely.

## Usage

```rust,ignore
use repair_seq::{ast::Node, sequence::generate};

let ast = Node::from_json(json)?;
let tokens = generate(&ast)?;
println!("{}", tokens); // space separated
```
*/

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::{ChangeTag, Node, NodeKind};
use crate::core::{Production, SeqError, SeqResult};

mod expressions;
mod statements;

/// Immutable token sequence produced by [`generate`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSequence(Vec<String>);

impl TokenSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl From<Vec<String>> for TokenSequence {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl<'a> FromIterator<&'a str> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl PartialEq<[&str]> for TokenSequence {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for TokenSequence {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

/// Generates the token sequence for an annotated AST.
///
/// A top-level function declaration tagged INHERITED takes its underlying
/// change instead, which recovers its identity when whole functions were
/// diffed as snippets. The tree is never modified.
pub fn generate(node: &Node) -> SeqResult<TokenSequence> {
    let change = match (&node.kind, node.change) {
        (NodeKind::FunctionDeclaration { .. }, ChangeTag::Inherited) => node.underlying_change,
        _ => node.change,
    };

    let mut emitter = Emitter::default();
    emitter.wrapped(change, |e| e.statement_kind(node))?;
    Ok(TokenSequence(emitter.tokens))
}

/// Token buffer shared by both production families
#[derive(Default)]
struct Emitter {
    tokens: Vec<String>,
}

impl Emitter {
    fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    fn push_all(&mut self, tokens: &[&str]) {
        self.tokens.extend(tokens.iter().map(|t| t.to_string()));
    }

    fn statement(&mut self, node: &Node) -> SeqResult<()> {
        self.wrapped(node.change, |e| e.statement_kind(node))
    }

    fn expression(&mut self, node: &Node) -> SeqResult<()> {
        self.wrapped(node.change, |e| e.expression_kind(node))
    }

    fn wrapped<F>(&mut self, change: ChangeTag, produce: F) -> SeqResult<()>
    where
        F: FnOnce(&mut Self) -> SeqResult<()>,
    {
        if !change.is_wrapped() {
            return produce(self);
        }
        self.push(change.start_marker());
        produce(self)?;
        self.push(change.end_marker());
        Ok(())
    }

    /// Expressions joined by `,`
    fn comma_separated<'a, I>(&mut self, nodes: I) -> SeqResult<()>
    where
        I: IntoIterator<Item = &'a Node>,
    {
        for (i, node) in nodes.into_iter().enumerate() {
            if i > 0 {
                self.push(",");
            }
            self.expression(node)?;
        }
        Ok(())
    }

    fn unsupported(node: &Node, production: Production) -> SeqError {
        SeqError::UnsupportedNodeKind {
            kind: node.node_type(),
            production,
        }
    }
}
