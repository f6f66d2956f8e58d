use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        statements::AssignNode,
        types::ExprType,
    },
    context::context::{FunctionBinding, VarInfo, VarKind},
    errors::errors::{Error, ErrorImpl},
};

use super::{returns::ensure_block_returns, type_checker::TypeChecker};

impl TypeChecker<'_> {
    /// Checks every function and top level statement of a program.
    #[tracing::instrument(skip(self))]
    pub fn check_program(&mut self, program: NodeId) -> Result<(), Error> {
        for child in self.ast.children(program).to_vec() {
            self.type_check_stmt(child)?;
        }
        Ok(())
    }

    /// Checks a function body, makes sure it returns on every path and
    /// records its return type on the function descriptor.
    #[tracing::instrument(skip(self))]
    pub fn check_function(&mut self, definition: NodeId) -> Result<ExprType, Error> {
        let name = match self.ast.kind(definition) {
            NodeKind::FunctionDef(def) => def.name.clone(),
            kind => {
                return Err(Error::new(
                    ErrorImpl::NotAnExpression {
                        kind: kind.name().to_string(),
                    },
                    self.ast.position(definition).clone(),
                ))
            }
        };
        self.bind_definition(definition, &name)?;

        self.check_block(definition)?;
        if !ensure_block_returns(self.ast, definition) {
            return Err(Error::new(
                ErrorImpl::MissingReturn { function: name },
                self.ast.position(definition).clone(),
            ));
        }

        let return_type = self.function_return_type(definition)?;
        let scope = self.ast.scope(definition);
        if let Ok(info) = self.ast.contexts.lookup(scope, &name) {
            if info.expr_type.is_known()
                && return_type.is_known()
                && info.expr_type != return_type
            {
                return Err(Error::new(
                    ErrorImpl::TypeMatchError {
                        expected: info.expr_type.to_string(),
                        received: return_type.to_string(),
                        expr: self.ast.render(definition),
                    },
                    self.ast.position(definition).clone(),
                ));
            }
            if return_type.is_known() {
                self.patch_function_type(scope, &name, return_type)?;
            }
        }
        tracing::debug!(function = %name, %return_type, "function checked");
        Ok(return_type)
    }

    /// Checks the direct statements of a block.
    pub fn check_block(&mut self, block: NodeId) -> Result<(), Error> {
        for stmt in self.ast.children(block).to_vec() {
            self.type_check_stmt(stmt)?;
        }
        Ok(())
    }

    /// Binds a function descriptor still waiting for its body to `definition`.
    fn bind_definition(&mut self, definition: NodeId, name: &str) -> Result<(), Error> {
        let scope = self.ast.scope(definition);
        let unresolved = matches!(
            self.ast.contexts.lookup(scope, name),
            Ok(VarInfo {
                kind: VarKind::Function {
                    binding: FunctionBinding::Unresolved
                },
                ..
            })
        );
        if unresolved {
            self.set_binding(scope, name, FunctionBinding::Resolved(definition))?;
        }
        Ok(())
    }

    fn type_check_stmt(&mut self, stmt: NodeId) -> Result<(), Error> {
        let position = self.ast.position(stmt).clone();
        self.check_stmt_kind(stmt)
            .map_err(|error| error.or_position(&position))
    }

    fn check_stmt_kind(&mut self, stmt: NodeId) -> Result<(), Error> {
        match self.ast.kind(stmt).clone() {
            NodeKind::Program(_) => self.check_program(stmt),
            NodeKind::FunctionDef(_) => self.check_function(stmt).map(|_| ()),
            NodeKind::Block => self.check_block(stmt),
            NodeKind::Return(ret) => match ret.value {
                Some(value) => self.type_check_expr(value).map(|_| ()),
                None => Ok(()),
            },
            NodeKind::Break(brk) => match brk.value {
                Some(value) => self.type_check_expr(value).map(|_| ()),
                None => Ok(()),
            },
            NodeKind::Error | NodeKind::InnerTxnBegin | NodeKind::InnerTxnEnd => Ok(()),
            NodeKind::Const(_) => Ok(()),
            NodeKind::AssignInnerTxn(assign) => {
                let expected = self.spec.runtime_field_type("itxn_field", &assign.name)?;
                let received = self.type_check_expr(assign.value)?;
                if received.is_known() && received != expected {
                    return Err(self.type_mismatch(stmt, expected, received));
                }
                if let NodeKind::AssignInnerTxn(node) = self.ast.kind_mut(stmt) {
                    node.expr_type = expected;
                }
                Ok(())
            }
            NodeKind::Assign(assign) | NodeKind::VarDecl(assign) => {
                self.check_assign(stmt, &assign)
            }
            NodeKind::IfStatement(if_stmt) => {
                self.type_check_expr(if_stmt.cond)?;
                self.expect_condition(if_stmt.cond)?;
                for branch in self.ast.children(stmt).to_vec() {
                    self.type_check_stmt(branch)?;
                }
                Ok(())
            }
            NodeKind::For(for_stmt) => {
                self.type_check_expr(for_stmt.cond)?;
                self.expect_condition(for_stmt.cond)?;
                for body in self.ast.children(stmt).to_vec() {
                    self.type_check_stmt(body)?;
                }
                Ok(())
            }
            _ => self.type_check_expr(stmt).map(|_| ()),
        }
    }

    /// Types an expression and every sub-expression, validating the
    /// arguments of each builtin call inside it.
    pub fn type_check_expr(&mut self, expr: NodeId) -> Result<ExprType, Error> {
        let expr_type = self.get_type(expr)?;
        self.check_calls(expr)?;
        Ok(expr_type)
    }

    fn check_calls(&mut self, expr: NodeId) -> Result<(), Error> {
        let operands = match self.ast.kind(expr) {
            NodeKind::BinOp(binop) => vec![binop.lhs, binop.rhs],
            NodeKind::Group(group) => vec![group.value],
            NodeKind::UnOp(unop) => vec![unop.value],
            NodeKind::IfExpr(if_expr) => vec![if_expr.cond, if_expr.if_true, if_expr.if_false],
            NodeKind::TypeCast(cast) => vec![cast.expr],
            NodeKind::Call(call) => {
                let builtin = call.definition.is_none()
                    && !self
                        .ast
                        .contexts
                        .lookup(self.ast.scope(expr), &call.name)
                        .is_ok_and(|info| info.function());
                let args = self.ast.children(expr).to_vec();
                for arg in args.iter() {
                    self.get_type(*arg)?;
                    self.check_calls(*arg)?;
                }
                if builtin {
                    self.check_builtin_args(expr)?;
                }
                return Ok(());
            }
            _ => vec![],
        };
        for operand in operands {
            self.get_type(operand)?;
            self.check_calls(operand)?;
        }
        Ok(())
    }

    /// Records the value types of an assignment or declaration and
    /// back-patches the targets' descriptors.
    fn check_assign(&mut self, stmt: NodeId, assign: &AssignNode) -> Result<(), Error> {
        self.type_check_expr(assign.value)?;
        let types = match assign.targets.arity() {
            1 => vec![self.get_type(assign.value)?],
            2 => {
                let (high, low) = self.get_type_tuple(assign.value)?;
                vec![high, low]
            }
            _ => {
                let (high, low, rem_high, rem_low) = self.get_type_quadruple(assign.value)?;
                vec![high, low, rem_high, rem_low]
            }
        };

        let scope = self.ast.scope(stmt);
        for (name, expr_type) in assign.targets.names().into_iter().zip(types.iter().copied()) {
            let info = self.ast.contexts.lookup(scope, name)?;
            if info.expr_type.is_known() && expr_type.is_known() && info.expr_type != expr_type {
                return Err(Error::unpositioned(ErrorImpl::TypeMatchError {
                    expected: info.expr_type.to_string(),
                    received: expr_type.to_string(),
                    expr: self.ast.render(stmt),
                }));
            }
            if !info.expr_type.is_known() && expr_type.is_known() {
                let mut info = info.clone();
                info.expr_type = expr_type;
                self.ast.contexts.update(scope, name, info)?;
            }
        }

        match self.ast.kind_mut(stmt) {
            NodeKind::Assign(node) | NodeKind::VarDecl(node) => node.expr_types = types,
            _ => {}
        }
        Ok(())
    }
}
