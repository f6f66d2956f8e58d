use crate::context::context::ScopeId;

use super::{
    ast::{Ast, NodeId, NodeKind},
    types::ExprType,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgramNode {
    /// Function definitions emitted as callable subroutines.
    pub non_inline_funcs: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunArg {
    pub name: String,
    pub arg_type: ExprType,
}

/// Function definition. Its children are the body statements.
#[derive(Debug, Clone, PartialEq)]
pub struct FunDefNode {
    pub name: String,
    pub args: Vec<FunArg>,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnNode {
    pub value: Option<NodeId>,
    pub definition: Option<NodeId>,
}

/// `itxn.Field = value` inside an inner transaction block.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignInnerTxnNode {
    pub name: String,
    pub expr_type: ExprType,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakNode {
    pub value: Option<NodeId>,
}

/// Names bound by an assignment or declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    Single(String),
    /// Two results, high word first.
    Tuple { high: String, low: String },
    /// Four results of a wide division.
    Quadruple {
        high: String,
        low: String,
        rem_high: String,
        rem_low: String,
    },
}

impl Targets {
    pub fn arity(&self) -> usize {
        match self {
            Targets::Single(_) => 1,
            Targets::Tuple { .. } => 2,
            Targets::Quadruple { .. } => 4,
        }
    }

    /// Target names in the order their types are reported by the type checker.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Targets::Single(name) => vec![name.as_str()],
            Targets::Tuple { high, low } => vec![high.as_str(), low.as_str()],
            Targets::Quadruple {
                high,
                low,
                rem_high,
                rem_low,
            } => vec![high.as_str(), low.as_str(), rem_high.as_str(), rem_low.as_str()],
        }
    }
}

/// Shared payload of `Assign` and `VarDecl` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub targets: Targets,
    /// One type per target, filled in by the type checker.
    pub expr_types: Vec<ExprType>,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstNode {
    pub name: String,
    pub expr_type: ExprType,
    pub value: String,
}

/// Children are the true branch block and the optional else block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmtNode {
    pub cond: NodeId,
}

/// Children are the loop body block.
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub cond: NodeId,
}

impl Ast {
    pub fn new_program(&mut self, scope: ScopeId) -> NodeId {
        self.add(scope, NodeKind::Program(ProgramNode::default()))
    }

    pub fn new_fun_def(
        &mut self,
        scope: ScopeId,
        name: &str,
        args: Vec<FunArg>,
        inline: bool,
    ) -> NodeId {
        self.add(
            scope,
            NodeKind::FunctionDef(FunDefNode {
                name: name.to_string(),
                args,
                inline,
            }),
        )
    }

    /// Appends a definition to the program, listing it unless it is inlined.
    pub fn add_function(&mut self, program: NodeId, definition: NodeId) {
        let inline = matches!(self.kind(definition), NodeKind::FunctionDef(def) if def.inline);
        self.append(program, definition);
        if let NodeKind::Program(program) = self.kind_mut(program) {
            if !inline {
                program.non_inline_funcs.push(definition);
            }
        }
    }

    pub fn new_block(&mut self, scope: ScopeId) -> NodeId {
        self.add(scope, NodeKind::Block)
    }

    pub fn new_return(
        &mut self,
        scope: ScopeId,
        value: Option<NodeId>,
        definition: Option<NodeId>,
    ) -> NodeId {
        let id = self.add(scope, NodeKind::Return(ReturnNode { value, definition }));
        if let Some(value) = value {
            self.adopt(id, value);
        }
        id
    }

    pub fn new_error(&mut self, scope: ScopeId) -> NodeId {
        self.add(scope, NodeKind::Error)
    }

    pub fn new_inner_txn_begin(&mut self, scope: ScopeId) -> NodeId {
        self.add(scope, NodeKind::InnerTxnBegin)
    }

    pub fn new_inner_txn_end(&mut self, scope: ScopeId) -> NodeId {
        self.add(scope, NodeKind::InnerTxnEnd)
    }

    pub fn new_assign_inner_txn(&mut self, scope: ScopeId, name: &str, value: NodeId) -> NodeId {
        let id = self.add(
            scope,
            NodeKind::AssignInnerTxn(AssignInnerTxnNode {
                name: name.to_string(),
                expr_type: ExprType::Unknown,
                value,
            }),
        );
        self.adopt(id, value);
        id
    }

    pub fn new_break(&mut self, scope: ScopeId, value: Option<NodeId>) -> NodeId {
        let id = self.add(scope, NodeKind::Break(BreakNode { value }));
        if let Some(value) = value {
            self.adopt(id, value);
        }
        id
    }

    pub fn new_assign(&mut self, scope: ScopeId, targets: Targets, value: NodeId) -> NodeId {
        let node = AssignNode {
            expr_types: vec![ExprType::Unknown; targets.arity()],
            targets,
            value,
        };
        let id = self.add(scope, NodeKind::Assign(node));
        self.adopt(id, value);
        id
    }

    pub fn new_var_decl(&mut self, scope: ScopeId, targets: Targets, value: NodeId) -> NodeId {
        let node = AssignNode {
            expr_types: vec![ExprType::Unknown; targets.arity()],
            targets,
            value,
        };
        let id = self.add(scope, NodeKind::VarDecl(node));
        self.adopt(id, value);
        id
    }

    pub fn new_const(
        &mut self,
        scope: ScopeId,
        name: &str,
        expr_type: ExprType,
        value: &str,
    ) -> NodeId {
        self.add(
            scope,
            NodeKind::Const(ConstNode {
                name: name.to_string(),
                expr_type,
                value: value.to_string(),
            }),
        )
    }

    /// Creates an if statement with its branch blocks as children.
    pub fn new_if_stmt(
        &mut self,
        scope: ScopeId,
        cond: NodeId,
        then_block: NodeId,
        else_block: Option<NodeId>,
    ) -> NodeId {
        let id = self.add(scope, NodeKind::IfStatement(IfStmtNode { cond }));
        self.adopt(id, cond);
        self.append(id, then_block);
        if let Some(else_block) = else_block {
            self.append(id, else_block);
        }
        id
    }

    pub fn new_for(&mut self, scope: ScopeId, cond: NodeId, body: NodeId) -> NodeId {
        let id = self.add(scope, NodeKind::For(ForNode { cond }));
        self.adopt(id, cond);
        self.append(id, body);
        id
    }
}
