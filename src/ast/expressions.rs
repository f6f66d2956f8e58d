//! Expression node payloads and their constructors.
//!
//! Operands are created first and handed to the constructor of the node that
//! owns them, which links them back to their new parent. Every expression
//! carries a type cache that starts as `Unknown` and is written by the type
//! checker.

use std::fmt::Display;

use crate::context::context::ScopeId;

use super::{
    ast::{Ast, NodeId, NodeKind},
    types::ExprType,
};

#[derive(Debug, Clone, PartialEq)]
pub struct IdentNode {
    pub name: String,
    pub expr_type: ExprType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub value: String,
    pub expr_type: ExprType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinOpNode {
    pub op: String,
    pub lhs: NodeId,
    pub rhs: NodeId,
    pub expr_type: ExprType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnOpNode {
    pub op: String,
    pub value: NodeId,
    pub expr_type: ExprType,
}

/// Ternary `if cond { a } else { b }` used as a value.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExprNode {
    pub cond: NodeId,
    pub if_true: NodeId,
    pub if_false: NodeId,
    pub expr_type: ExprType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeCastNode {
    pub expr: NodeId,
    pub target: ExprType,
}

/// Call of a builtin or user function. Arguments are the node's children.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub name: String,
    pub field: Option<String>,
    pub index1: Option<String>,
    pub index2: Option<String>,
    pub fun_type: ExprType,
    /// Definition node of a user function, `None` for builtins.
    pub definition: Option<NodeId>,
}

/// Read of transaction group or global state, e.g. `gtxn[0].Amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeFieldNode {
    pub op: String,
    pub field: String,
    pub index1: Option<String>,
    pub index2: Option<String>,
    pub expr_type: ExprType,
}

impl Display for RuntimeFieldNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let index1 = self.index1.as_deref().unwrap_or_default();
        let index2 = self.index2.as_deref().unwrap_or_default();
        match self.op.as_str() {
            "gtxn" | "gtxns" => write!(f, "{}[{}].{}", self.op, index1, self.field),
            "gtxna" => write!(f, "{}[{}].{}[{}]", self.op, index1, self.field, index2),
            "txna" | "itxna" => write!(f, "{}.{}[{}]", self.op, self.field, index1),
            "txnas" => write!(f, "{}.{}[var]", self.op, self.field),
            _ => write!(f, "{}.{}", self.op, self.field),
        }
    }
}

/// Read of a logic signature argument, e.g. `arg 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeArgNode {
    pub op: String,
    pub number: String,
    pub expr_type: ExprType,
}

impl Ast {
    pub fn new_ident(&mut self, scope: ScopeId, name: &str) -> NodeId {
        self.add(
            scope,
            NodeKind::Ident(IdentNode {
                name: name.to_string(),
                expr_type: ExprType::Unknown,
            }),
        )
    }

    pub fn new_literal(&mut self, scope: ScopeId, expr_type: ExprType, value: &str) -> NodeId {
        self.add(
            scope,
            NodeKind::Literal(LiteralNode {
                value: value.to_string(),
                expr_type,
            }),
        )
    }

    pub fn new_bin_op(&mut self, scope: ScopeId, op: &str, lhs: NodeId, rhs: NodeId) -> NodeId {
        let id = self.add(
            scope,
            NodeKind::BinOp(BinOpNode {
                op: op.to_string(),
                lhs,
                rhs,
                expr_type: ExprType::Unknown,
            }),
        );
        self.adopt(id, lhs);
        self.adopt(id, rhs);
        id
    }

    pub fn new_group(&mut self, scope: ScopeId, value: NodeId) -> NodeId {
        let id = self.add(scope, NodeKind::Group(GroupNode { value }));
        self.adopt(id, value);
        id
    }

    pub fn new_un_op(&mut self, scope: ScopeId, op: &str, value: NodeId) -> NodeId {
        let id = self.add(
            scope,
            NodeKind::UnOp(UnOpNode {
                op: op.to_string(),
                value,
                expr_type: ExprType::Unknown,
            }),
        );
        self.adopt(id, value);
        id
    }

    pub fn new_if_expr(
        &mut self,
        scope: ScopeId,
        cond: NodeId,
        if_true: NodeId,
        if_false: NodeId,
    ) -> NodeId {
        let id = self.add(
            scope,
            NodeKind::IfExpr(IfExprNode {
                cond,
                if_true,
                if_false,
                expr_type: ExprType::Unknown,
            }),
        );
        for operand in [cond, if_true, if_false] {
            self.adopt(id, operand);
        }
        id
    }

    pub fn new_type_cast(&mut self, scope: ScopeId, target: ExprType, expr: NodeId) -> NodeId {
        let id = self.add(scope, NodeKind::TypeCast(TypeCastNode { expr, target }));
        self.adopt(id, expr);
        id
    }

    /// Creates a call; `args` become the node's children in order.
    pub fn new_call(&mut self, scope: ScopeId, name: &str, args: &[NodeId]) -> NodeId {
        let id = self.add(
            scope,
            NodeKind::Call(CallNode {
                name: name.to_string(),
                field: None,
                index1: None,
                index2: None,
                fun_type: ExprType::Unknown,
                definition: None,
            }),
        );
        for arg in args {
            self.append(id, *arg);
        }
        id
    }

    pub fn new_runtime_field(
        &mut self,
        scope: ScopeId,
        op: &str,
        field: &str,
        indices: &[&str],
    ) -> NodeId {
        self.add(
            scope,
            NodeKind::RuntimeField(RuntimeFieldNode {
                op: op.to_string(),
                field: field.to_string(),
                index1: indices.first().map(|index| index.to_string()),
                index2: indices.get(1).map(|index| index.to_string()),
                expr_type: ExprType::Unknown,
            }),
        )
    }

    pub fn new_runtime_arg(&mut self, scope: ScopeId, op: &str, number: &str) -> NodeId {
        self.add(
            scope,
            NodeKind::RuntimeArg(RuntimeArgNode {
                op: op.to_string(),
                number: number.to_string(),
                expr_type: ExprType::Unknown,
            }),
        )
    }
}
