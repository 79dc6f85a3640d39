//! Detach/restore of one try-statement, recorded as an undo log.
//!
//! [`detach`] unwraps a try-statement in place and returns a [`Patch`];
//! [`Patch::restore`] is its exact inverse. A failed detach leaves the tree
//! untouched.

use std::mem;

use super::discovery::{node_at_mut, Candidate};
use crate::ast::{ChangeTag, Node, NodeKind, NodeType};
use crate::core::{SeqError, SeqResult};

/// How the try-block's content took the try-statement's place
#[derive(Debug, Clone, PartialEq)]
enum Exposure {
    /// Block statements spliced into the owner's statement list
    Spliced { len: usize, retagged: Vec<usize> },
    /// The block's only statement took the slot
    Statement { retagged: bool },
    /// The whole block took the slot
    Block { retagged: bool },
}

/// Undo record for one detached try-statement
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    owner: Vec<usize>,
    index: usize,
    /// The try-statement, its block emptied or stubbed out
    try_node: Node,
    exposure: Exposure,
}

/// How an owner holds its statements
enum OwnerShape {
    List,
    Slot,
}

fn owner_shape(owner: NodeType) -> SeqResult<OwnerShape> {
    match owner {
        NodeType::Program | NodeType::BlockStatement => Ok(OwnerShape::List),
        NodeType::IfStatement
        | NodeType::WhileStatement
        | NodeType::ForStatement
        | NodeType::ForInStatement => Ok(OwnerShape::Slot),
        other => Err(SeqError::UnsupportedOwnerKind(other)),
    }
}

fn statement_list(owner: &mut Node) -> SeqResult<&mut Vec<Node>> {
    let owner_type = owner.node_type();
    match &mut owner.kind {
        NodeKind::Program { body } | NodeKind::BlockStatement { body } => Ok(body),
        _ => Err(SeqError::UnsupportedOwnerKind(owner_type)),
    }
}

fn try_block(node: &mut Node) -> SeqResult<&mut Vec<Node>> {
    match &mut node.kind {
        NodeKind::TryStatement { block, .. } => match &mut block.kind {
            NodeKind::BlockStatement { body } => Ok(body),
            _ => Err(SeqError::malformed("try block is not a block statement")),
        },
        _ => Err(SeqError::malformed("mutation candidate is not a try statement")),
    }
}

/// Checks the candidate without touching the tree
fn validate(node: &Node) -> SeqResult<()> {
    match &node.kind {
        NodeKind::TryStatement { block, .. } if block.node_type() == NodeType::BlockStatement => {
            Ok(())
        }
        NodeKind::TryStatement { .. } => {
            Err(SeqError::malformed("try block is not a block statement"))
        }
        _ => Err(SeqError::malformed("mutation candidate is not a try statement")),
    }
}

fn expose(node: &mut Node) -> bool {
    if node.change == ChangeTag::Inherited {
        node.change = ChangeTag::Inserted;
        true
    } else {
        false
    }
}

fn conceal(node: &mut Node, retagged: bool) {
    if retagged {
        node.change = ChangeTag::Inherited;
    }
}

fn missing_owner() -> SeqError {
    SeqError::malformed("mutation owner path no longer resolves")
}

/// Replaces the candidate try-statement with the content of its block.
///
/// List owners (program, block) get the block's statements spliced in.
/// Single-statement owners (if, while, for, for-in) get the block's only
/// statement, or the block itself when it holds zero or several. Exposed
/// statements tagged INHERITED become INSERTED.
pub fn detach(root: &mut Node, candidate: &Candidate) -> SeqResult<Patch> {
    let owner = node_at_mut(root, &candidate.owner).ok_or_else(missing_owner)?;
    let index = candidate.index;

    match owner_shape(owner.node_type())? {
        OwnerShape::List => {
            let body = statement_list(owner)?;
            validate(body.get(index).ok_or_else(missing_owner)?)?;

            let mut try_node = body.remove(index);
            let mut statements = mem::take(try_block(&mut try_node)?);
            let retagged = statements
                .iter_mut()
                .enumerate()
                .filter_map(|(offset, stmt)| expose(stmt).then_some(offset))
                .collect();
            let len = statements.len();
            body.splice(index..index, statements);

            Ok(Patch {
                owner: candidate.owner.clone(),
                index,
                try_node,
                exposure: Exposure::Spliced { len, retagged },
            })
        }
        OwnerShape::Slot => {
            let slot = owner
                .children_mut()
                .into_iter()
                .nth(index)
                .ok_or_else(missing_owner)?;
            validate(slot)?;

            let mut try_node = mem::replace(slot, Node::new(NodeKind::EmptyStatement));
            let promote = try_block(&mut try_node)?.len() == 1;
            let mut exposed = if promote {
                try_block(&mut try_node)?
                    .pop()
                    .ok_or_else(|| SeqError::malformed("try block emptied"))?
            } else {
                take_block(&mut try_node)?
            };

            let retagged = expose(&mut exposed);
            let exposure = if promote {
                Exposure::Statement { retagged }
            } else {
                Exposure::Block { retagged }
            };
            *slot = exposed;

            Ok(Patch {
                owner: candidate.owner.clone(),
                index,
                try_node,
                exposure,
            })
        }
    }
}

/// Swaps the try's block for an empty stub and returns the block
fn take_block(node: &mut Node) -> SeqResult<Node> {
    match &mut node.kind {
        NodeKind::TryStatement { block, .. } => {
            let stub = Node::new(NodeKind::BlockStatement { body: Vec::new() });
            Ok(mem::replace(&mut **block, stub))
        }
        _ => Err(SeqError::malformed("mutation candidate is not a try statement")),
    }
}

impl Patch {
    /// Puts the try-statement back exactly as it was before [`detach`]
    pub fn restore(self, root: &mut Node) -> SeqResult<()> {
        let Patch {
            owner,
            index,
            mut try_node,
            exposure,
        } = self;
        let owner = node_at_mut(root, &owner).ok_or_else(missing_owner)?;

        match exposure {
            Exposure::Spliced { len, retagged } => {
                let body = statement_list(owner)?;
                if index + len > body.len() {
                    return Err(missing_owner());
                }
                let mut statements: Vec<Node> = body.drain(index..index + len).collect();
                for offset in retagged {
                    if let Some(stmt) = statements.get_mut(offset) {
                        conceal(stmt, true);
                    }
                }
                *try_block(&mut try_node)? = statements;
                body.insert(index, try_node);
            }
            Exposure::Statement { retagged } => {
                let slot = owner
                    .children_mut()
                    .into_iter()
                    .nth(index)
                    .ok_or_else(missing_owner)?;
                let mut statement = mem::replace(slot, Node::new(NodeKind::EmptyStatement));
                conceal(&mut statement, retagged);
                try_block(&mut try_node)?.push(statement);
                *slot = try_node;
            }
            Exposure::Block { retagged } => {
                let slot = owner
                    .children_mut()
                    .into_iter()
                    .nth(index)
                    .ok_or_else(missing_owner)?;
                let mut block = mem::replace(slot, Node::new(NodeKind::EmptyStatement));
                conceal(&mut block, retagged);
                match &mut try_node.kind {
                    NodeKind::TryStatement { block: stub, .. } => **stub = block,
                    _ => return Err(SeqError::malformed("patched node is not a try statement")),
                }
                *slot = try_node;
            }
        }
        Ok(())
    }
}
