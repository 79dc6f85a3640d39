/*!
# Annotated AST

ESTree-shaped syntax tree as produced by an external JavaScript parser, with
the per-node change tags computed by an external diff step.

Each node is a closed tagged variant ([`NodeKind`]) plus two change tags:

- `change-noprop` ([`Node::change`]) - the node's own tag, used for sequence
  wrapping and mutation discovery
- `change` ([`Node::underlying_change`]) - the propagated tag, consulted when a
  whole top-level function was diffed as one snippet

Children are owned exclusively by their parent. The mutation pass relinks
them temporarily and always hands them back.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{SeqError, SeqResult};

mod literal;
mod traversal;

pub use literal::{normalize_literal, LiteralValue, RegexValue};

/// Diff annotation attached to every node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeTag {
    Inserted,
    Removed,
    Updated,
    Moved,
    Unchanged,
    Inherited,
    #[default]
    Unknown,
}

impl ChangeTag {
    /// Whether the tag is made visible in token sequences
    pub fn is_wrapped(self) -> bool {
        matches!(self, Self::Inserted | Self::Removed | Self::Updated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "INSERTED",
            Self::Removed => "REMOVED",
            Self::Updated => "UPDATED",
            Self::Moved => "MOVED",
            Self::Unchanged => "UNCHANGED",
            Self::Inherited => "INHERITED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Opening boundary token, e.g. `~UPDATED_START~`
    pub fn start_marker(self) -> String {
        format!("~{}_START~", self.as_str())
    }

    /// Closing boundary token, e.g. `~UPDATED_END~`
    pub fn end_marker(self) -> String {
        format!("~{}_END~", self.as_str())
    }
}

impl fmt::Display for ChangeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AST node: syntactic kind plus change annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(rename = "change-noprop", default)]
    pub change: ChangeTag,
    #[serde(rename = "change", default)]
    pub underlying_change: ChangeTag,
}

/// Syntactic node kinds understood by the pipeline.
///
/// Field names follow ESTree so parser output deserializes directly.
/// `Placeholder` never comes from a parser; the abstraction passes create it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    VariableDeclaration {
        kind: String,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        #[serde(default)]
        init: Option<Box<Node>>,
    },
    FunctionDeclaration {
        #[serde(default)]
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
    },
    FunctionExpression {
        #[serde(default)]
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
    },
    ExpressionStatement {
        expression: Box<Node>,
    },
    BreakStatement {
        #[serde(default)]
        label: Option<Box<Node>>,
    },
    ContinueStatement {
        #[serde(default)]
        label: Option<Box<Node>>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    EmptyStatement,
    EmptyExpression,
    LabeledStatement {
        label: Box<Node>,
        body: Box<Node>,
    },
    ForStatement {
        #[serde(default)]
        init: Option<Box<Node>>,
        #[serde(default)]
        test: Option<Box<Node>>,
        #[serde(default)]
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        #[serde(default)]
        alternate: Option<Box<Node>>,
    },
    DebuggerStatement,
    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<Node>>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    SwitchCase {
        #[serde(default)]
        test: Option<Box<Node>>,
        consequent: Vec<Node>,
    },
    ThrowStatement {
        argument: Box<Node>,
    },
    TryStatement {
        block: Box<Node>,
        #[serde(default)]
        handler: Option<Box<Node>>,
        #[serde(default)]
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        #[serde(default)]
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    WithStatement {
        object: Box<Node>,
        body: Box<Node>,
    },
    Identifier {
        name: String,
    },
    Literal {
        #[serde(default)]
        value: LiteralValue,
        raw: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        regex: Option<RegexValue>,
    },
    XmlLiteral,
    ArrayExpression {
        elements: Vec<Option<Node>>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        #[serde(default)]
        computed: bool,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        #[serde(default)]
        arguments: Vec<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    ThisExpression,
    ObjectExpression {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        #[serde(default)]
        computed: bool,
        #[serde(default = "default_property_kind")]
        kind: String,
        #[serde(default)]
        method: bool,
        #[serde(default)]
        shorthand: bool,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
        #[serde(default = "default_true")]
        prefix: bool,
    },
    UpdateExpression {
        operator: String,
        argument: Box<Node>,
        #[serde(default)]
        prefix: bool,
    },
    YieldExpression {
        #[serde(default)]
        argument: Option<Box<Node>>,
        #[serde(default)]
        delegate: bool,
    },
    Placeholder {
        name: String,
    },
    /// Any ESTree kind the pipeline has no production for
    #[serde(other)]
    Other,
}

fn default_property_kind() -> String {
    "init".to_string()
}

fn default_true() -> bool {
    true
}

/// Fieldless discriminant of [`NodeKind`], usable as a map key
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NodeType {
    Program,
    BlockStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    FunctionExpression,
    ExpressionStatement,
    BreakStatement,
    ContinueStatement,
    WhileStatement,
    DoWhileStatement,
    EmptyStatement,
    EmptyExpression,
    LabeledStatement,
    ForStatement,
    ForInStatement,
    IfStatement,
    DebuggerStatement,
    ReturnStatement,
    SwitchStatement,
    SwitchCase,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WithStatement,
    Identifier,
    Literal,
    XmlLiteral,
    ArrayExpression,
    AssignmentExpression,
    ConditionalExpression,
    MemberExpression,
    CallExpression,
    NewExpression,
    BinaryExpression,
    LogicalExpression,
    ThisExpression,
    ObjectExpression,
    Property,
    UnaryExpression,
    UpdateExpression,
    YieldExpression,
    Placeholder,
    Other,
}

impl NodeType {
    pub const ALL: &'static [NodeType] = &[
        NodeType::Program,
        NodeType::BlockStatement,
        NodeType::VariableDeclaration,
        NodeType::VariableDeclarator,
        NodeType::FunctionDeclaration,
        NodeType::FunctionExpression,
        NodeType::ExpressionStatement,
        NodeType::BreakStatement,
        NodeType::ContinueStatement,
        NodeType::WhileStatement,
        NodeType::DoWhileStatement,
        NodeType::EmptyStatement,
        NodeType::EmptyExpression,
        NodeType::LabeledStatement,
        NodeType::ForStatement,
        NodeType::ForInStatement,
        NodeType::IfStatement,
        NodeType::DebuggerStatement,
        NodeType::ReturnStatement,
        NodeType::SwitchStatement,
        NodeType::SwitchCase,
        NodeType::ThrowStatement,
        NodeType::TryStatement,
        NodeType::CatchClause,
        NodeType::WithStatement,
        NodeType::Identifier,
        NodeType::Literal,
        NodeType::XmlLiteral,
        NodeType::ArrayExpression,
        NodeType::AssignmentExpression,
        NodeType::ConditionalExpression,
        NodeType::MemberExpression,
        NodeType::CallExpression,
        NodeType::NewExpression,
        NodeType::BinaryExpression,
        NodeType::LogicalExpression,
        NodeType::ThisExpression,
        NodeType::ObjectExpression,
        NodeType::Property,
        NodeType::UnaryExpression,
        NodeType::UpdateExpression,
        NodeType::YieldExpression,
        NodeType::Placeholder,
        NodeType::Other,
    ];

    /// Looks a kind up by its ESTree name
    pub fn from_name(name: &str) -> Option<NodeType> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// ESTree name of the kind
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Program => "Program",
            NodeType::BlockStatement => "BlockStatement",
            NodeType::VariableDeclaration => "VariableDeclaration",
            NodeType::VariableDeclarator => "VariableDeclarator",
            NodeType::FunctionDeclaration => "FunctionDeclaration",
            NodeType::FunctionExpression => "FunctionExpression",
            NodeType::ExpressionStatement => "ExpressionStatement",
            NodeType::BreakStatement => "BreakStatement",
            NodeType::ContinueStatement => "ContinueStatement",
            NodeType::WhileStatement => "WhileStatement",
            NodeType::DoWhileStatement => "DoWhileStatement",
            NodeType::EmptyStatement => "EmptyStatement",
            NodeType::EmptyExpression => "EmptyExpression",
            NodeType::LabeledStatement => "LabeledStatement",
            NodeType::ForStatement => "ForStatement",
            NodeType::ForInStatement => "ForInStatement",
            NodeType::IfStatement => "IfStatement",
            NodeType::DebuggerStatement => "DebuggerStatement",
            NodeType::ReturnStatement => "ReturnStatement",
            NodeType::SwitchStatement => "SwitchStatement",
            NodeType::SwitchCase => "SwitchCase",
            NodeType::ThrowStatement => "ThrowStatement",
            NodeType::TryStatement => "TryStatement",
            NodeType::CatchClause => "CatchClause",
            NodeType::WithStatement => "WithStatement",
            NodeType::Identifier => "Identifier",
            NodeType::Literal => "Literal",
            NodeType::XmlLiteral => "XmlLiteral",
            NodeType::ArrayExpression => "ArrayExpression",
            NodeType::AssignmentExpression => "AssignmentExpression",
            NodeType::ConditionalExpression => "ConditionalExpression",
            NodeType::MemberExpression => "MemberExpression",
            NodeType::CallExpression => "CallExpression",
            NodeType::NewExpression => "NewExpression",
            NodeType::BinaryExpression => "BinaryExpression",
            NodeType::LogicalExpression => "LogicalExpression",
            NodeType::ThisExpression => "ThisExpression",
            NodeType::ObjectExpression => "ObjectExpression",
            NodeType::Property => "Property",
            NodeType::UnaryExpression => "UnaryExpression",
            NodeType::UpdateExpression => "UpdateExpression",
            NodeType::YieldExpression => "YieldExpression",
            NodeType::Placeholder => "Placeholder",
            NodeType::Other => "Other",
        }
    }

    /// Block bodies and object literals are the only constructs that nest
    /// one level deeper for depth abstraction.
    pub fn increases_depth(self) -> bool {
        matches!(self, NodeType::BlockStatement | NodeType::ObjectExpression)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Program { .. } => NodeType::Program,
            NodeKind::BlockStatement { .. } => NodeType::BlockStatement,
            NodeKind::VariableDeclaration { .. } => NodeType::VariableDeclaration,
            NodeKind::VariableDeclarator { .. } => NodeType::VariableDeclarator,
            NodeKind::FunctionDeclaration { .. } => NodeType::FunctionDeclaration,
            NodeKind::FunctionExpression { .. } => NodeType::FunctionExpression,
            NodeKind::ExpressionStatement { .. } => NodeType::ExpressionStatement,
            NodeKind::BreakStatement { .. } => NodeType::BreakStatement,
            NodeKind::ContinueStatement { .. } => NodeType::ContinueStatement,
            NodeKind::WhileStatement { .. } => NodeType::WhileStatement,
            NodeKind::DoWhileStatement { .. } => NodeType::DoWhileStatement,
            NodeKind::EmptyStatement => NodeType::EmptyStatement,
            NodeKind::EmptyExpression => NodeType::EmptyExpression,
            NodeKind::LabeledStatement { .. } => NodeType::LabeledStatement,
            NodeKind::ForStatement { .. } => NodeType::ForStatement,
            NodeKind::ForInStatement { .. } => NodeType::ForInStatement,
            NodeKind::IfStatement { .. } => NodeType::IfStatement,
            NodeKind::DebuggerStatement => NodeType::DebuggerStatement,
            NodeKind::ReturnStatement { .. } => NodeType::ReturnStatement,
            NodeKind::SwitchStatement { .. } => NodeType::SwitchStatement,
            NodeKind::SwitchCase { .. } => NodeType::SwitchCase,
            NodeKind::ThrowStatement { .. } => NodeType::ThrowStatement,
            NodeKind::TryStatement { .. } => NodeType::TryStatement,
            NodeKind::CatchClause { .. } => NodeType::CatchClause,
            NodeKind::WithStatement { .. } => NodeType::WithStatement,
            NodeKind::Identifier { .. } => NodeType::Identifier,
            NodeKind::Literal { .. } => NodeType::Literal,
            NodeKind::XmlLiteral => NodeType::XmlLiteral,
            NodeKind::ArrayExpression { .. } => NodeType::ArrayExpression,
            NodeKind::AssignmentExpression { .. } => NodeType::AssignmentExpression,
            NodeKind::ConditionalExpression { .. } => NodeType::ConditionalExpression,
            NodeKind::MemberExpression { .. } => NodeType::MemberExpression,
            NodeKind::CallExpression { .. } => NodeType::CallExpression,
            NodeKind::NewExpression { .. } => NodeType::NewExpression,
            NodeKind::BinaryExpression { .. } => NodeType::BinaryExpression,
            NodeKind::LogicalExpression { .. } => NodeType::LogicalExpression,
            NodeKind::ThisExpression => NodeType::ThisExpression,
            NodeKind::ObjectExpression { .. } => NodeType::ObjectExpression,
            NodeKind::Property { .. } => NodeType::Property,
            NodeKind::UnaryExpression { .. } => NodeType::UnaryExpression,
            NodeKind::UpdateExpression { .. } => NodeType::UpdateExpression,
            NodeKind::YieldExpression { .. } => NodeType::YieldExpression,
            NodeKind::Placeholder { .. } => NodeType::Placeholder,
            NodeKind::Other => NodeType::Other,
        }
    }
}

impl Node {
    /// Creates an untagged node
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            change: ChangeTag::Unknown,
            underlying_change: ChangeTag::Unknown,
        }
    }

    /// Sets the node's own change tag
    pub fn with_change(mut self, change: ChangeTag) -> Self {
        self.change = change;
        self
    }

    /// Sets the propagated change tag
    pub fn with_underlying_change(mut self, change: ChangeTag) -> Self {
        self.underlying_change = change;
        self
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Identifier { name: name.into() })
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Placeholder { name: name.into() })
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Parses one annotated ESTree document
    pub fn from_json(json: &str) -> SeqResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> SeqResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> SeqResult<String> {
        serde_json::to_string(self).map_err(|e| SeqError::MalformedInput(e.to_string()))
    }

    /// Whether the tree is a single top-level function declaration, the
    /// shape produced when whole functions are diffed as snippets
    pub fn is_single_function(&self) -> bool {
        match &self.kind {
            NodeKind::Program { body } => {
                body.len() == 1 && body[0].node_type() == NodeType::FunctionDeclaration
            }
            _ => false,
        }
    }
}
