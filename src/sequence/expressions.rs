//! Expression-level productions

use super::Emitter;
use crate::ast::{normalize_literal, Node, NodeKind};
use crate::core::{Production, SeqError, SeqResult};

impl Emitter {
    /// Emits an expression without its change wrapping
    pub(super) fn expression_kind(&mut self, node: &Node) -> SeqResult<()> {
        match &node.kind {
            NodeKind::VariableDeclarator { id, init } => {
                self.expression(id)?;
                if let Some(init) = init {
                    self.push("=");
                    self.expression(init)?;
                }
            }
            NodeKind::Identifier { name } | NodeKind::Placeholder { name } => {
                self.push(name.as_str())
            }
            NodeKind::Literal { raw, .. } => self.push(normalize_literal(raw)),
            NodeKind::ArrayExpression { elements } => {
                self.push("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.push(",");
                    }
                    // holes emit nothing between their commas
                    if let Some(element) = element {
                        self.expression(element)?;
                    }
                }
                self.push("]");
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            }
            | NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
            | NodeKind::LogicalExpression {
                operator,
                left,
                right,
            } => {
                self.expression(left)?;
                self.push(operator.as_str());
                self.expression(right)?;
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test)?;
                self.push("?");
                self.expression(consequent)?;
                self.push(":");
                self.expression(alternate)?;
            }
            NodeKind::EmptyExpression | NodeKind::EmptyStatement => {}
            NodeKind::MemberExpression {
                object,
                property,
                computed,
            } => {
                self.expression(object)?;
                if *computed {
                    self.push("[");
                    self.expression(property)?;
                    self.push("]");
                } else {
                    self.push(".");
                    self.expression(property)?;
                }
            }
            NodeKind::VariableDeclaration { kind, declarations } => {
                if declarations.is_empty() {
                    return Err(SeqError::malformed(
                        "variable declaration has no declarators",
                    ));
                }
                self.push(kind.as_str());
                self.comma_separated(declarations)?;
            }
            NodeKind::XmlLiteral => self.push("@xmllit"),
            NodeKind::CallExpression { callee, arguments } => {
                self.expression(callee)?;
                self.push("(");
                self.comma_separated(arguments)?;
                self.push(")");
            }
            NodeKind::NewExpression { callee, arguments } => {
                self.push("new");
                self.expression(callee)?;
                self.push("(");
                self.comma_separated(arguments)?;
                self.push(")");
            }
            NodeKind::FunctionDeclaration { id, params, body }
            | NodeKind::FunctionExpression { id, params, body } => {
                self.push("function");
                if let Some(id) = id {
                    self.expression(id)?;
                }
                self.push("(");
                self.comma_separated(params)?;
                self.push(")");
                self.statement(body)?;
            }
            NodeKind::ThisExpression => self.push("this"),
            NodeKind::ObjectExpression { properties } => {
                self.push("{");
                self.comma_separated(properties)?;
                self.push("}");
            }
            NodeKind::Property {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.push("[");
                    self.expression(key)?;
                    self.push("]");
                } else {
                    self.expression(key)?;
                }
                self.push(":");
                self.expression(value)?;
            }
            NodeKind::SwitchCase { test, consequent } => {
                match test {
                    Some(test) => {
                        self.push("case");
                        self.expression(test)?;
                    }
                    None => self.push("default"),
                }
                self.push(":");
                for stmt in consequent {
                    self.statement(stmt)?;
                }
            }
            NodeKind::CatchClause { param, body } => {
                self.push("catch");
                if let Some(param) = param {
                    self.push("(");
                    self.expression(param)?;
                    self.push(")");
                }
                self.statement(body)?;
            }
            NodeKind::UnaryExpression {
                operator,
                argument,
                prefix,
            }
            | NodeKind::UpdateExpression {
                operator,
                argument,
                prefix,
            } => {
                if *prefix {
                    self.push(operator.as_str());
                }
                self.expression(argument)?;
                if !*prefix {
                    self.push(operator.as_str());
                }
            }
            NodeKind::YieldExpression { argument, .. } => {
                self.push("yield");
                if let Some(argument) = argument {
                    self.expression(argument)?;
                }
            }
            NodeKind::Program { .. }
            | NodeKind::BlockStatement { .. }
            | NodeKind::ExpressionStatement { .. }
            | NodeKind::BreakStatement { .. }
            | NodeKind::ContinueStatement { .. }
            | NodeKind::WhileStatement { .. }
            | NodeKind::DoWhileStatement { .. }
            | NodeKind::LabeledStatement { .. }
            | NodeKind::ForStatement { .. }
            | NodeKind::ForInStatement { .. }
            | NodeKind::IfStatement { .. }
            | NodeKind::DebuggerStatement
            | NodeKind::ReturnStatement { .. }
            | NodeKind::SwitchStatement { .. }
            | NodeKind::ThrowStatement { .. }
            | NodeKind::TryStatement { .. }
            | NodeKind::WithStatement { .. }
            | NodeKind::Other => return Err(Self::unsupported(node, Production::Expression)),
        }
        Ok(())
    }
}
