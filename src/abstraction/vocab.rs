//! Vocabulary abstraction.
//!
//! Identifiers and literals outside the mined vocabulary are replaced by
//! generic placeholders, so rare names do not blow up the model vocabulary.

use std::collections::VecDeque;

use crate::ast::{normalize_literal, LiteralValue, Node, NodeKind};
use crate::vocabulary::Vocabulary;

pub const IDENTIFIER_PLACEHOLDER: &str = "__abs__identifier";
pub const NUMBER_PLACEHOLDER: &str = "__abs__numlit";
pub const STRING_PLACEHOLDER: &str = "__abs__stringlit";
pub const REGEX_PLACEHOLDER: &str = "__abs__regexlit";

/// State for one abstraction call
#[derive(Debug, Default)]
pub struct AbstractionContext {
    next_id: usize,
}

impl AbstractionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique identifier placeholder, starting at `__abs__identifier__1__`
    fn unique_identifier(&mut self) -> String {
        self.next_id += 1;
        format!("{}__{}__", IDENTIFIER_PLACEHOLDER, self.next_id)
    }

    /// Identifier placeholders handed out so far
    pub fn abstracted_identifiers(&self) -> usize {
        self.next_id
    }
}

/// Replaces out-of-vocabulary identifiers and literals with placeholders
#[derive(Debug)]
pub struct VocabularyAbstractor<'a> {
    vocabulary: &'a Vocabulary,
    unique_identifiers: bool,
}

impl<'a> VocabularyAbstractor<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            vocabulary,
            unique_identifiers: false,
        }
    }

    /// Numbers each abstracted identifier so repeated occurrences stay
    /// distinguishable
    pub fn with_unique_identifiers(mut self, unique: bool) -> Self {
        self.unique_identifiers = unique;
        self
    }

    /// Abstracts the tree in place, breadth first. The root is never
    /// replaced. Returns the number of replaced nodes.
    pub fn apply(&self, root: &mut Node) -> usize {
        let mut context = AbstractionContext::new();
        self.apply_with(root, &mut context)
    }

    pub fn apply_with(&self, root: &mut Node, context: &mut AbstractionContext) -> usize {
        let mut replaced = 0;
        let mut queue: VecDeque<&mut Node> = root.children_mut().into();

        while let Some(node) = queue.pop_front() {
            match self.placeholder_for(node, context) {
                Some(name) => {
                    node.kind = NodeKind::Placeholder { name };
                    replaced += 1;
                }
                None => queue.extend(node.children_mut()),
            }
        }

        replaced
    }

    fn placeholder_for(&self, node: &Node, context: &mut AbstractionContext) -> Option<String> {
        match &node.kind {
            NodeKind::Identifier { name } if !self.vocabulary.contains(name) => {
                if self.unique_identifiers {
                    Some(context.unique_identifier())
                } else {
                    Some(IDENTIFIER_PLACEHOLDER.to_string())
                }
            }
            NodeKind::Literal { value, raw, regex } => {
                if self.vocabulary.contains(&normalize_literal(raw)) {
                    return None;
                }
                if regex.is_some() {
                    return Some(REGEX_PLACEHOLDER.to_string());
                }
                match value {
                    LiteralValue::Number(_) => Some(NUMBER_PLACEHOLDER.to_string()),
                    LiteralValue::String(_) => Some(STRING_PLACEHOLDER.to_string()),
                    LiteralValue::Regex(_) => Some(REGEX_PLACEHOLDER.to_string()),
                    LiteralValue::Bool(_) | LiteralValue::Null => None,
                }
            }
            _ => None,
        }
    }
}
