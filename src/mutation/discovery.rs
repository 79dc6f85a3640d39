//! Candidate discovery: INSERTED try-statements and their owners.

use crate::ast::{ChangeTag, Node, NodeType};

/// Location of one try-statement: the path to its owner plus the try's
/// position among the owner's children.
///
/// Paths index into [`Node::children`] order and stay valid as long as every
/// mutation is undone before the next one is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub owner: Vec<usize>,
    pub index: usize,
}

impl Candidate {
    /// Path from the root to the try-statement itself
    pub fn path(&self) -> Vec<usize> {
        let mut path = self.owner.clone();
        path.push(self.index);
        path
    }
}

/// Whether the node is a try-statement added by the change
pub fn is_mutable_try(node: &Node) -> bool {
    node.node_type() == NodeType::TryStatement && node.change == ChangeTag::Inserted
}

/// Every mutable try-statement below `root`, in preorder.
///
/// The root itself has no owner and is never a candidate.
pub fn discover(root: &Node) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut path = Vec::new();
    visit(root, &mut path, &mut candidates);
    candidates
}

fn visit(node: &Node, path: &mut Vec<usize>, out: &mut Vec<Candidate>) {
    for (index, child) in node.children().into_iter().enumerate() {
        if is_mutable_try(child) {
            out.push(Candidate {
                owner: path.clone(),
                index,
            });
        }
        path.push(index);
        visit(child, path, out);
        path.pop();
    }
}

/// Resolves a child-index path
pub fn node_at<'a>(root: &'a Node, path: &[usize]) -> Option<&'a Node> {
    let mut current = root;
    for &index in path {
        current = current.children().into_iter().nth(index)?;
    }
    Some(current)
}

/// Resolves a child-index path for rewriting
pub fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> Option<&'a mut Node> {
    let mut current = root;
    for &index in path {
        current = current.children_mut().into_iter().nth(index)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn try_statement(change: &str, body: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "type": "TryStatement",
            "change-noprop": change,
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
    fn test_finds_inserted_tries_in_preorder() {
        let inner = try_statement("INSERTED", vec![]);
        let outer = try_statement("INSERTED", vec![inner]);
        let unchanged = try_statement("UNCHANGED", vec![]);
        let ast = Node::from_value(json!({
            "type": "Program",
            "body": [unchanged, outer]
        }))
        .unwrap();

        let candidates = discover(&ast);
        assert_eq!(
            candidates,
            vec![
                Candidate {
                    owner: vec![],
                    index: 1
                },
                // Program > outer try > its block
                Candidate {
                    owner: vec![1, 0],
                    index: 0
                },
            ]
        );
        for candidate in &candidates {
            let node = node_at(&ast, &candidate.path()).unwrap();
            assert!(is_mutable_try(node));
        }
    }

    #[test]
    fn test_inherited_try_inside_insertion_is_not_a_candidate() {
        let inner = try_statement("INHERITED", vec![]);
        let ast = Node::from_value(json!({
            "type": "Program",
            "body": [try_statement("INSERTED", vec![inner])]
        }))
        .unwrap();

        assert_eq!(
            discover(&ast),
            vec![Candidate {
                owner: vec![],
                index: 0
            }]
        );
    }

    #[test]
    fn test_root_try_is_not_a_candidate() {
        let ast = Node::from_value(try_statement("INSERTED", vec![])).unwrap();
        assert!(discover(&ast).is_empty());
    }

    #[test]
    fn test_tries_inside_function_expressions_are_found() {
        let ast = Node::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "FunctionExpression",
                "id": null,
                "params": [],
                "body": { "type": "BlockStatement", "body": [try_statement("INSERTED", vec![])] }
            }
        }))
        .unwrap();

        let candidates = discover(&ast);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            node_at(&ast, &candidates[0].owner).map(Node::node_type),
            Some(NodeType::BlockStatement)
        );
    }

    #[test]
    fn test_invalid_path_resolves_to_none() {
        let mut ast = Node::from_value(json!({ "type": "Program", "body": [] })).unwrap();
        assert!(node_at(&ast, &[0]).is_none());
        assert!(node_at_mut(&mut ast, &[3, 1]).is_none());
        assert!(node_at_mut(&mut ast, &[]).is_some());
    }
}
