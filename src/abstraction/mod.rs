/*!
# Abstraction Passes

In-place tree rewrites applied before linearization:

1. [`abstract_depth`] collapses nested functions and object literals
2. [`VocabularyAbstractor`] hides identifiers and literals outside the
   mined vocabulary

[`prepare`] runs both in that order.
*/

pub mod depth;
pub mod vocab;

pub use depth::{
    abstract_depth, default_placeholders, min_depth_for, PlaceholderMap, FUNCTION_PLACEHOLDER,
    OBJECT_PLACEHOLDER,
};
pub use vocab::{
    AbstractionContext, VocabularyAbstractor, IDENTIFIER_PLACEHOLDER, NUMBER_PLACEHOLDER,
    REGEX_PLACEHOLDER, STRING_PLACEHOLDER,
};

use tracing::trace;

use crate::ast::Node;
use crate::vocabulary::Vocabulary;

/// Options for [`prepare`]
#[derive(Debug, Clone)]
pub struct AbstractionSettings {
    pub placeholders: PlaceholderMap,
    pub unique_identifiers: bool,
}

impl Default for AbstractionSettings {
    fn default() -> Self {
        Self {
            placeholders: default_placeholders(),
            unique_identifiers: true,
        }
    }
}

/// Nodes replaced by [`prepare`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbstractionStats {
    pub structural: usize,
    pub vocabulary: usize,
}

/// Depth abstraction followed by vocabulary abstraction when a vocabulary
/// is given
pub fn prepare(
    ast: &mut Node,
    settings: &AbstractionSettings,
    vocabulary: Option<&Vocabulary>,
) -> AbstractionStats {
    let min_depth = min_depth_for(ast);
    let structural = abstract_depth(ast, &settings.placeholders, min_depth);

    let vocabulary = vocabulary.map_or(0, |vocabulary| {
        VocabularyAbstractor::new(vocabulary)
            .with_unique_identifiers(settings.unique_identifiers)
            .apply(ast)
    });

    trace!(min_depth, structural, vocabulary, "abstracted tree");
    AbstractionStats {
        structural,
        vocabulary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::generate;
    use serde_json::json;

    #[test]
    fn test_prepare_runs_both_passes() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "FunctionDeclaration",
                "id": { "type": "Identifier", "name": "handler" },
                "params": [{ "type": "Identifier", "name": "req" }],
                "body": {
                    "type": "BlockStatement",
                    "body": [{
                        "type": "ReturnStatement",
                        "argument": {
                            "type": "FunctionExpression",
                            "id": null,
                            "params": [],
                            "body": { "type": "BlockStatement", "body": [] }
                        }
                    }]
                }
            }]
        }))
        .unwrap();

        let vocab = Vocabulary::from_words(["req"]);
        let stats = prepare(&mut ast, &AbstractionSettings::default(), Some(&vocab));

        assert_eq!(
            stats,
            AbstractionStats {
                structural: 1,
                vocabulary: 1
            }
        );
        assert_eq!(
            generate(&ast).unwrap(),
            [
                "function",
                "__abs__identifier__1__",
                "(",
                "req",
                ")",
                "{",
                "return",
                "@function",
                ";",
                "}"
            ]
        );
    }

    #[test]
    fn test_prepare_without_vocabulary() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "ExpressionStatement",
                "expression": { "type": "Identifier", "name": "rare" }
            }]
        }))
        .unwrap();

        let stats = prepare(&mut ast, &AbstractionSettings::default(), None);
        assert_eq!(stats, AbstractionStats::default());
        assert_eq!(generate(&ast).unwrap(), ["rare", ";"]);
    }
}
