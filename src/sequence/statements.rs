//! Statement-level productions

use super::Emitter;
use crate::ast::{Node, NodeKind};
use crate::core::{Production, SeqError, SeqResult};

impl Emitter {
    /// Emits a statement without its change wrapping
    pub(super) fn statement_kind(&mut self, node: &Node) -> SeqResult<()> {
        match &node.kind {
            NodeKind::Program { body } => {
                for stmt in body {
                    self.statement(stmt)?;
                }
            }
            NodeKind::BlockStatement { body } => {
                self.push("{");
                for stmt in body {
                    self.statement(stmt)?;
                }
                self.push("}");
            }
            NodeKind::VariableDeclaration { .. } => {
                self.expression_kind(node)?;
                self.push(";");
            }
            NodeKind::FunctionDeclaration { .. } => self.expression_kind(node)?,
            NodeKind::ExpressionStatement { expression } => {
                self.expression(expression)?;
                self.push(";");
            }
            NodeKind::BreakStatement { label } => {
                self.push("break");
                if let Some(label) = label {
                    self.expression(label)?;
                }
                self.push(";");
            }
            NodeKind::ContinueStatement { label } => {
                self.push("continue");
                if let Some(label) = label {
                    self.expression(label)?;
                }
                self.push(";");
            }
            NodeKind::WhileStatement { test, body } => {
                self.push_all(&["while", "("]);
                self.expression(test)?;
                self.push(")");
                self.statement(body)?;
            }
            NodeKind::DoWhileStatement { body, test } => {
                self.push("do");
                self.statement(body)?;
                self.push_all(&["while", "("]);
                self.expression(test)?;
                self.push(")");
            }
            NodeKind::EmptyStatement => self.push(";"),
            NodeKind::LabeledStatement { label, body } => {
                self.expression(label)?;
                self.push(":");
                self.statement(body)?;
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                self.push_all(&["for", "("]);
                if let Some(init) = init {
                    self.expression(init)?;
                }
                self.push(";");
                if let Some(test) = test {
                    self.expression(test)?;
                }
                self.push(";");
                if let Some(update) = update {
                    self.expression(update)?;
                }
                self.push(")");
                self.statement(body)?;
            }
            NodeKind::ForInStatement { left, right, body } => {
                self.push_all(&["for", "("]);
                self.expression(left)?;
                self.push("in");
                self.expression(right)?;
                self.push(")");
                self.statement(body)?;
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.push_all(&["if", "("]);
                self.expression(test)?;
                self.push(")");
                self.statement(consequent)?;
                if let Some(alternate) = alternate {
                    self.push("else");
                    self.statement(alternate)?;
                }
            }
            NodeKind::DebuggerStatement => self.push_all(&["debugger", ";"]),
            NodeKind::ReturnStatement { argument } => {
                self.push("return");
                if let Some(argument) = argument {
                    self.expression(argument)?;
                }
                self.push(";");
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.push_all(&["switch", "("]);
                self.expression(discriminant)?;
                self.push_all(&[")", "{"]);
                for case in cases {
                    self.expression(case)?;
                }
                self.push("}");
            }
            NodeKind::ThrowStatement { argument } => {
                self.push("throw");
                self.expression(argument)?;
                self.push(";");
            }
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                if handler.is_none() && finalizer.is_none() {
                    return Err(SeqError::malformed(
                        "try statement has neither a handler nor a finalizer",
                    ));
                }
                self.push("try");
                self.statement(block)?;
                if let Some(handler) = handler {
                    self.expression(handler)?;
                }
                if let Some(finalizer) = finalizer {
                    self.push("finally");
                    self.statement(finalizer)?;
                }
            }
            NodeKind::Identifier { .. } | NodeKind::Placeholder { .. } => {
                self.expression_kind(node)?
            }
            NodeKind::VariableDeclarator { .. }
            | NodeKind::FunctionExpression { .. }
            | NodeKind::EmptyExpression
            | NodeKind::SwitchCase { .. }
            | NodeKind::CatchClause { .. }
            | NodeKind::WithStatement { .. }
            | NodeKind::Literal { .. }
            | NodeKind::XmlLiteral
            | NodeKind::ArrayExpression { .. }
            | NodeKind::AssignmentExpression { .. }
            | NodeKind::ConditionalExpression { .. }
            | NodeKind::MemberExpression { .. }
            | NodeKind::CallExpression { .. }
            | NodeKind::NewExpression { .. }
            | NodeKind::BinaryExpression { .. }
            | NodeKind::LogicalExpression { .. }
            | NodeKind::ThisExpression
            | NodeKind::ObjectExpression { .. }
            | NodeKind::Property { .. }
            | NodeKind::UnaryExpression { .. }
            | NodeKind::UpdateExpression { .. }
            | NodeKind::YieldExpression { .. }
            | NodeKind::Other => return Err(Self::unsupported(node, Production::Statement)),
        }
        Ok(())
    }
}
