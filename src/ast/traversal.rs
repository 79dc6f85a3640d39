//! Generic child enumeration in source order.
//!
//! Passes that do not care about node semantics (abstraction, vocabulary
//! mining, mutation discovery) walk the tree through these two methods.
//! Child order matches the order in which the sequence generator emits them.

use super::{Node, NodeKind};

impl Node {
    /// Direct children, in source order
    pub fn children(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = Vec::new();
        match &self.kind {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => out.extend(body),
            NodeKind::VariableDeclaration { declarations, .. } => out.extend(declarations),
            NodeKind::VariableDeclarator { id, init } => {
                out.push(id);
                out.extend(init.as_deref());
            }
            NodeKind::FunctionDeclaration { id, params, body }
            | NodeKind::FunctionExpression { id, params, body } => {
                out.extend(id.as_deref());
                out.extend(params);
                out.push(body);
            }
            NodeKind::ExpressionStatement { expression } => out.push(expression),
            NodeKind::BreakStatement { label } | NodeKind::ContinueStatement { label } => {
                out.extend(label.as_deref());
            }
            NodeKind::WhileStatement { test, body } => {
                out.push(test);
                out.push(body);
            }
            NodeKind::DoWhileStatement { body, test } => {
                out.push(body);
                out.push(test);
            }
            NodeKind::LabeledStatement { label, body } => {
                out.push(label);
                out.push(body);
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                out.extend(init.as_deref());
                out.extend(test.as_deref());
                out.extend(update.as_deref());
                out.push(body);
            }
            NodeKind::ForInStatement { left, right, body } => {
                out.push(left);
                out.push(right);
                out.push(body);
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.extend(alternate.as_deref());
            }
            NodeKind::ReturnStatement { argument } | NodeKind::YieldExpression { argument, .. } => {
                out.extend(argument.as_deref());
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                out.push(discriminant);
                out.extend(cases);
            }
            NodeKind::SwitchCase { test, consequent } => {
                out.extend(test.as_deref());
                out.extend(consequent);
            }
            NodeKind::ThrowStatement { argument } => out.push(argument),
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                out.push(block);
                out.extend(handler.as_deref());
                out.extend(finalizer.as_deref());
            }
            NodeKind::CatchClause { param, body } => {
                out.extend(param.as_deref());
                out.push(body);
            }
            NodeKind::WithStatement { object, body } => {
                out.push(object);
                out.push(body);
            }
            NodeKind::ArrayExpression { elements } => out.extend(elements.iter().flatten()),
            NodeKind::AssignmentExpression { left, right, .. }
            | NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.push(alternate);
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => {
                out.push(object);
                out.push(property);
            }
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                out.push(callee);
                out.extend(arguments);
            }
            NodeKind::ObjectExpression { properties } => out.extend(properties),
            NodeKind::Property { key, value, .. } => {
                out.push(key);
                out.push(value);
            }
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => out.push(argument),
            NodeKind::EmptyStatement
            | NodeKind::EmptyExpression
            | NodeKind::DebuggerStatement
            | NodeKind::Identifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::XmlLiteral
            | NodeKind::ThisExpression
            | NodeKind::Placeholder { .. }
            | NodeKind::Other => {}
        }
        out
    }

    /// Direct children for in-place rewriting, in the same order as
    /// [`Node::children`]
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        let mut out: Vec<&mut Node> = Vec::new();
        match &mut self.kind {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => {
                out.extend(body.iter_mut())
            }
            NodeKind::VariableDeclaration { declarations, .. } => {
                out.extend(declarations.iter_mut())
            }
            NodeKind::VariableDeclarator { id, init } => {
                out.push(id);
                out.extend(init.as_deref_mut());
            }
            NodeKind::FunctionDeclaration { id, params, body }
            | NodeKind::FunctionExpression { id, params, body } => {
                out.extend(id.as_deref_mut());
                out.extend(params.iter_mut());
                out.push(body);
            }
            NodeKind::ExpressionStatement { expression } => out.push(expression),
            NodeKind::BreakStatement { label } | NodeKind::ContinueStatement { label } => {
                out.extend(label.as_deref_mut());
            }
            NodeKind::WhileStatement { test, body } => {
                out.push(test);
                out.push(body);
            }
            NodeKind::DoWhileStatement { body, test } => {
                out.push(body);
                out.push(test);
            }
            NodeKind::LabeledStatement { label, body } => {
                out.push(label);
                out.push(body);
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                out.extend(init.as_deref_mut());
                out.extend(test.as_deref_mut());
                out.extend(update.as_deref_mut());
                out.push(body);
            }
            NodeKind::ForInStatement { left, right, body } => {
                out.push(left);
                out.push(right);
                out.push(body);
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.extend(alternate.as_deref_mut());
            }
            NodeKind::ReturnStatement { argument } | NodeKind::YieldExpression { argument, .. } => {
                out.extend(argument.as_deref_mut());
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                out.push(discriminant);
                out.extend(cases.iter_mut());
            }
            NodeKind::SwitchCase { test, consequent } => {
                out.extend(test.as_deref_mut());
                out.extend(consequent.iter_mut());
            }
            NodeKind::ThrowStatement { argument } => out.push(argument),
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                out.push(block);
                out.extend(handler.as_deref_mut());
                out.extend(finalizer.as_deref_mut());
            }
            NodeKind::CatchClause { param, body } => {
                out.extend(param.as_deref_mut());
                out.push(body);
            }
            NodeKind::WithStatement { object, body } => {
                out.push(object);
                out.push(body);
            }
            NodeKind::ArrayExpression { elements } => out.extend(elements.iter_mut().flatten()),
            NodeKind::AssignmentExpression { left, right, .. }
            | NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                out.push(test);
                out.push(consequent);
                out.push(alternate);
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => {
                out.push(object);
                out.push(property);
            }
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                out.push(callee);
                out.extend(arguments.iter_mut());
            }
            NodeKind::ObjectExpression { properties } => out.extend(properties.iter_mut()),
            NodeKind::Property { key, value, .. } => {
                out.push(key);
                out.push(value);
            }
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => out.push(argument),
            NodeKind::EmptyStatement
            | NodeKind::EmptyExpression
            | NodeKind::DebuggerStatement
            | NodeKind::Identifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::XmlLiteral
            | NodeKind::ThisExpression
            | NodeKind::Placeholder { .. }
            | NodeKind::Other => {}
        }
        out
    }

    /// Total number of nodes in the subtree, the node itself included
    pub fn subtree_size(&self) -> usize {
        let mut size = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            size += 1;
            stack.extend(node.children());
        }
        size
    }
}
