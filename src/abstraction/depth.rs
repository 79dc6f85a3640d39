//! Depth-bounded structural abstraction.
//!
//! Collapses nested functions and object literals into placeholder tokens
//! once they sit deep enough in the tree. Depth only grows when descending
//! into a block body or an object literal.

use std::collections::BTreeMap;

use crate::ast::{Node, NodeKind, NodeType};

/// Placeholder used for collapsed functions
pub const FUNCTION_PLACEHOLDER: &str = "@function";
/// Placeholder used for collapsed object literals
pub const OBJECT_PLACEHOLDER: &str = "@objectlit";

/// Kind to placeholder map applied by [`abstract_depth`]
pub type PlaceholderMap = BTreeMap<NodeType, String>;

pub fn default_placeholders() -> PlaceholderMap {
    let mut map = PlaceholderMap::new();
    map.insert(NodeType::FunctionDeclaration, FUNCTION_PLACEHOLDER.to_string());
    map.insert(NodeType::FunctionExpression, FUNCTION_PLACEHOLDER.to_string());
    map.insert(NodeType::ObjectExpression, OBJECT_PLACEHOLDER.to_string());
    map
}

/// Depth at which replacement starts for this tree: 1 when the tree is a
/// single top-level function (its signature stays visible), 0 otherwise
pub fn min_depth_for(root: &Node) -> usize {
    if root.is_single_function() {
        1
    } else {
        0
    }
}

/// Replaces every mapped descendant at depth `>= min_depth` with its
/// placeholder, in place. The root itself is never replaced.
///
/// Replaced subtrees are not visited. Placeholders keep the change tags of
/// the node they replace. Returns the number of replacements.
pub fn abstract_depth(root: &mut Node, placeholders: &PlaceholderMap, min_depth: usize) -> usize {
    let mut replaced = 0;
    let mut stack: Vec<(&mut Node, usize)> = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        for child in node.children_mut() {
            let child_type = child.node_type();
            match placeholders.get(&child_type) {
                Some(name) if depth >= min_depth => {
                    child.kind = NodeKind::Placeholder { name: name.clone() };
                    replaced += 1;
                }
                _ => {
                    let child_depth = depth + usize::from(child_type.increases_depth());
                    stack.push((child, child_depth));
                }
            }
        }
    }

    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ChangeTag;
    use crate::sequence::generate;
    use serde_json::json;

    fn function(name: &str, body: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "type": "FunctionDeclaration",
            "id": { "type": "Identifier", "name": name },
            "params": [],
            "body": { "type": "BlockStatement", "body": body }
        })
    }

    fn object_assignment() -> serde_json::Value {
        json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "AssignmentExpression",
                "operator": "=",
                "left": { "type": "Identifier", "name": "o" },
                "right": { "type": "ObjectExpression", "properties": [] }
            }
        })
    }

    #[test]
    fn test_single_function_keeps_signature() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [function("outer", vec![function("inner", vec![]), object_assignment()])]
        }))
        .unwrap();

        let min_depth = min_depth_for(&ast);
        assert_eq!(min_depth, 1);

        let replaced = abstract_depth(&mut ast, &default_placeholders(), min_depth);
        assert_eq!(replaced, 2);
        assert_eq!(
            generate(&ast).unwrap(),
            ["function", "outer", "(", ")", "{", "@function", "o", "=", "@objectlit", ";", "}"]
        );
    }

    #[test]
    fn test_top_level_functions_collapse_at_depth_zero() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [function("a", vec![]), function("b", vec![])]
        }))
        .unwrap();

        let min_depth = min_depth_for(&ast);
        assert_eq!(min_depth, 0);
        abstract_depth(&mut ast, &default_placeholders(), min_depth);
        assert_eq!(generate(&ast).unwrap(), ["@function", "@function"]);
    }

    #[test]
    fn test_object_literal_outside_block_stays_at_depth() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [object_assignment()]
        }))
        .unwrap();

        // depth 0 < 1, and nothing below it is mapped
        assert_eq!(abstract_depth(&mut ast, &default_placeholders(), 1), 0);
        assert_eq!(generate(&ast).unwrap(), ["o", "=", "{", "}", ";"]);
    }

    #[test]
    fn test_placeholder_keeps_change_tag() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "FunctionDeclaration",
                "change-noprop": "INSERTED",
                "id": { "type": "Identifier", "name": "f" },
                "params": [],
                "body": { "type": "BlockStatement", "body": [] }
            }]
        }))
        .unwrap();

        abstract_depth(&mut ast, &default_placeholders(), 0);
        let children = ast.children();
        assert_eq!(children[0].node_type(), NodeType::Placeholder);
        assert_eq!(children[0].change, ChangeTag::Inserted);
        assert_eq!(
            generate(&ast).unwrap(),
            ["~INSERTED_START~", "@function", "~INSERTED_END~"]
        );
    }

    #[test]
    fn test_empty_map_changes_nothing() {
        let mut ast = Node::from_value(json!({
            "type": "Program",
            "body": [function("a", vec![])]
        }))
        .unwrap();
        let before = ast.clone();

        assert_eq!(abstract_depth(&mut ast, &PlaceholderMap::new(), 0), 0);
        assert_eq!(ast, before);
    }
}
