/*!
# Error System

Errors raised by the sequence pipeline.

| Error | Raised by | Caller's reaction |
|---|---|---|
| `UnsupportedNodeKind` | sequence generator dispatch miss | abandon the subtree's record |
| `UnsupportedOwnerKind` | mutation detach/restore | skip the candidate |
| `MalformedInput` | missing or inconsistent children | skip the record |
| `InvalidCapacity` | miner construction | configuration error |
*/

use std::fmt;
use thiserror::Error;

use crate::ast::NodeType;

/// Result type used throughout the library
pub type SeqResult<T> = Result<T, SeqError>;

/// Production family a node was dispatched into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Production {
    Statement,
    Expression,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Production::Statement => write!(f, "statement"),
            Production::Expression => write!(f, "expression"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SeqError {
    #[error("unsupported node kind `{kind}` in {production} position")]
    UnsupportedNodeKind { kind: NodeType, production: Production },

    #[error("no detach entry for owner kind `{0}`")]
    UnsupportedOwnerKind(NodeType),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("heap capacity must be greater than zero")]
    InvalidCapacity,
}

impl SeqError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Whether the error only affects a single mutation candidate
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SeqError::UnsupportedOwnerKind(_))
    }
}

impl From<serde_json::Error> for SeqError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedInput(e.to_string())
    }
}
