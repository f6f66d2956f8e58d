use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        types::ExprType,
    },
    builtins::builtins::OpSpec,
    context::context::{FunctionBinding, ScopeId, VarInfo, VarKind},
    errors::errors::{Error, ErrorImpl},
};

/// Materializes the body of a user function on its first call.
pub trait FunctionParser {
    /// Parses the function `name` declared in or above `scope` on behalf of
    /// `call` and returns its `FunctionDef` node.
    fn parse_function(
        &mut self,
        ast: &mut Ast,
        scope: ScopeId,
        call: NodeId,
        name: &str,
    ) -> Result<NodeId, Error>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCheckerConfig {
    /// Let an abort statement take any return type instead of `uint64`.
    pub typeless_abort: bool,
}

pub struct TypeChecker<'a> {
    pub ast: &'a mut Ast,
    pub(super) spec: &'a dyn OpSpec,
    parser: Option<&'a mut dyn FunctionParser>,
    pub(super) config: TypeCheckerConfig,
    /// Function definitions whose return type is being computed.
    pub(super) resolving: Vec<NodeId>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(ast: &'a mut Ast, spec: &'a dyn OpSpec) -> Self {
        TypeChecker {
            ast,
            spec,
            parser: None,
            config: TypeCheckerConfig::default(),
            resolving: vec![],
        }
    }

    pub fn with_parser(mut self, parser: &'a mut dyn FunctionParser) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_config(mut self, config: TypeCheckerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TypeCheckerConfig {
        &self.config
    }

    /// Infers the type of an expression node, caching the result in the node.
    ///
    /// Only concrete types are cached, so an expression that typed as
    /// `Unknown` is inferred again on the next request.
    pub fn get_type(&mut self, id: NodeId) -> Result<ExprType, Error> {
        let position = self.ast.position(id).clone();
        self.infer(id).map_err(|error| error.or_position(&position))
    }

    fn infer(&mut self, id: NodeId) -> Result<ExprType, Error> {
        match self.ast.kind(id).clone() {
            NodeKind::Literal(literal) => Ok(literal.expr_type),
            NodeKind::Const(constant) => Ok(constant.expr_type),
            NodeKind::Ident(ident) => {
                if ident.expr_type.is_known() {
                    return Ok(ident.expr_type);
                }
                let expr_type = self.ident_type(id, &ident.name)?;
                self.cache(id, expr_type);
                Ok(expr_type)
            }
            NodeKind::BinOp(binop) => {
                if binop.expr_type.is_known() {
                    return Ok(binop.expr_type);
                }
                let tp = self.spec.op_type(&binop.op, 0)?;
                let lt = self.spec.arg_type(&binop.op, 0)?;
                let rt = self.spec.arg_type(&binop.op, 1)?;
                let ltp = self.operand_type(binop.lhs)?;
                let rtp = self.operand_type(binop.rhs)?;

                self.expect_operand(id, "left", lt, ltp)?;
                self.expect_operand(id, "right", rt, rtp)?;
                if ltp != rtp {
                    return Err(self.type_mismatch(id, ltp, rtp));
                }

                self.cache(id, tp);
                Ok(tp)
            }
            NodeKind::Group(group) => self.get_type(group.value),
            NodeKind::UnOp(unop) => {
                if unop.expr_type.is_known() {
                    return Ok(unop.expr_type);
                }
                let tp = self.spec.op_type(&unop.op, 0)?;
                let at = self.spec.arg_type(&unop.op, 0)?;
                let vt = self.operand_type(unop.value)?;

                if at.is_known() && at != vt {
                    return Err(self.type_mismatch(id, at, vt));
                }
                if tp != vt {
                    return Err(self.type_mismatch(id, tp, vt));
                }

                self.cache(id, tp);
                Ok(tp)
            }
            NodeKind::IfExpr(if_expr) => {
                if if_expr.expr_type.is_known() {
                    return Ok(if_expr.expr_type);
                }
                self.expect_condition(if_expr.cond)?;
                let tt = self.get_type(if_expr.if_true)?;
                let ft = self.get_type(if_expr.if_false)?;
                if tt != ft {
                    return Err(Error::unpositioned(ErrorImpl::BranchTypeMismatch {
                        first: tt.to_string(),
                        second: ft.to_string(),
                    }));
                }

                self.cache(id, tt);
                Ok(tt)
            }
            NodeKind::TypeCast(cast) => {
                let inner = self.get_type(cast.expr)?;
                if inner != ExprType::Unknown && inner != cast.target {
                    return Err(Error::unpositioned(ErrorImpl::CastError {
                        from: inner.to_string(),
                        to: cast.target.to_string(),
                    }));
                }
                Ok(cast.target)
            }
            NodeKind::Call(call) => {
                if call.fun_type.is_known() {
                    return Ok(call.fun_type);
                }
                self.call_type(id)
            }
            NodeKind::RuntimeField(field) => {
                if field.expr_type.is_known() {
                    return Ok(field.expr_type);
                }
                let expr_type = self.spec.runtime_field_type(&field.op, &field.field)?;
                self.cache(id, expr_type);
                Ok(expr_type)
            }
            NodeKind::RuntimeArg(arg) => {
                if arg.expr_type.is_known() {
                    return Ok(arg.expr_type);
                }
                let expr_type = self.spec.op_type(&arg.op, 0)?;
                self.cache(id, expr_type);
                Ok(expr_type)
            }
            kind => Err(Error::unpositioned(ErrorImpl::NotAnExpression {
                kind: kind.name().to_string(),
            })),
        }
    }

    fn ident_type(&self, id: NodeId, name: &str) -> Result<ExprType, Error> {
        let info = self
            .ast
            .contexts
            .lookup(self.ast.scope(id), name)
            .map_err(|error| {
                Error::unpositioned(ErrorImpl::IdentLookupFailed {
                    ident: name.to_string(),
                    reason: error.to_string(),
                })
            })?;
        if info.expr_type == ExprType::Invalid {
            return Err(Error::unpositioned(ErrorImpl::IdentLookupFailed {
                ident: name.to_string(),
                reason: String::from("invalid type"),
            }));
        }
        Ok(info.expr_type)
    }

    /// Types an operand, naming it in the error when it fails.
    fn operand_type(&mut self, operand: NodeId) -> Result<ExprType, Error> {
        let expr_type = self.get_type(operand).map_err(|error| {
            let position = error.get_position().clone();
            Error::new(
                ErrorImpl::InvalidOperand {
                    operand: self.ast.render(operand),
                    inner: Box::new(error.into_internal()),
                },
                position,
            )
        })?;
        if expr_type == ExprType::Invalid {
            return Err(Error::unpositioned(ErrorImpl::InvalidOperand {
                operand: self.ast.render(operand),
                inner: Box::new(ErrorImpl::TypeMatchError {
                    expected: String::from("a value"),
                    received: expr_type.to_string(),
                    expr: self.ast.render(operand),
                }),
            }));
        }
        Ok(expr_type)
    }

    fn expect_operand(
        &self,
        id: NodeId,
        side: &str,
        expected: ExprType,
        received: ExprType,
    ) -> Result<(), Error> {
        if expected.is_known() && expected != received {
            return Err(Error::unpositioned(ErrorImpl::OperandTypeMatchError {
                side: side.to_string(),
                expected: expected.to_string(),
                received: received.to_string(),
                expr: self.ast.render(id),
            }));
        }
        Ok(())
    }

    pub(super) fn expect_condition(&mut self, cond: NodeId) -> Result<(), Error> {
        let received = self.get_type(cond)?;
        if received != ExprType::UInt64 {
            let position = self.ast.position(cond).clone();
            return Err(Error::new(
                ErrorImpl::ConditionTypeError {
                    received: received.to_string(),
                },
                position,
            ));
        }
        Ok(())
    }

    pub(super) fn type_mismatch(
        &self,
        id: NodeId,
        expected: ExprType,
        received: ExprType,
    ) -> Error {
        Error::unpositioned(ErrorImpl::TypeMatchError {
            expected: expected.to_string(),
            received: received.to_string(),
            expr: self.ast.render(id),
        })
    }

    fn cache(&mut self, id: NodeId, expr_type: ExprType) {
        if !expr_type.is_known() {
            return;
        }
        tracing::trace!(node = id.0, %expr_type, "type cached");
        match self.ast.kind_mut(id) {
            NodeKind::Ident(node) => node.expr_type = expr_type,
            NodeKind::BinOp(node) => node.expr_type = expr_type,
            NodeKind::UnOp(node) => node.expr_type = expr_type,
            NodeKind::IfExpr(node) => node.expr_type = expr_type,
            NodeKind::Call(node) => node.fun_type = expr_type,
            NodeKind::RuntimeField(node) => node.expr_type = expr_type,
            NodeKind::RuntimeArg(node) => node.expr_type = expr_type,
            _ => {}
        }
    }

    /// Resolves a call against user functions first, then builtins.
    fn call_type(&mut self, id: NodeId) -> Result<ExprType, Error> {
        let (name, field) = match self.ast.kind(id) {
            NodeKind::Call(call) => (call.name.clone(), call.field.clone()),
            kind => {
                return Err(Error::unpositioned(ErrorImpl::NotAnExpression {
                    kind: kind.name().to_string(),
                }))
            }
        };
        let scope = self.ast.scope(id);

        if let Some(binding) = self.function_binding(scope, &name) {
            return self.user_call_type(id, scope, &name, binding);
        }
        if !self.spec.is_builtin_fun(&name) {
            return Err(Error::unpositioned(ErrorImpl::FunctionLookupFailed { function: name }));
        }

        let mut fun_type = match field {
            Some(field) => self.spec.runtime_field_type(&name, &field)?,
            None => match self.spec.op_type(&name, 0) {
                Ok(expr_type) => expr_type,
                Err(error) if matches!(error.get_internal(), ErrorImpl::InvalidPosition { .. }) => {
                    ExprType::Unknown
                }
                Err(error) => return Err(error),
            },
        };
        if fun_type == ExprType::Unknown {
            if let Some(position) = self.spec.dependent_arg(&name) {
                if let Some(arg) = self.ast.children(id).get(position).copied() {
                    fun_type = self.get_type(arg)?;
                }
            }
        }

        self.cache(id, fun_type);
        Ok(fun_type)
    }

    fn function_binding(&self, scope: ScopeId, name: &str) -> Option<FunctionBinding> {
        match self.ast.contexts.lookup(scope, name) {
            Ok(VarInfo {
                kind: VarKind::Function { binding },
                ..
            }) => Some(*binding),
            _ => None,
        }
    }

    fn user_call_type(
        &mut self,
        id: NodeId,
        scope: ScopeId,
        name: &str,
        binding: FunctionBinding,
    ) -> Result<ExprType, Error> {
        let definition = match binding {
            FunctionBinding::Resolved(definition) => definition,
            FunctionBinding::Pending(_) => {
                tracing::debug!(function = name, call = id.0, "recursive call while parsing");
                return Ok(ExprType::Unknown);
            }
            FunctionBinding::Unresolved => self.materialize(scope, id, name)?,
        };
        if let NodeKind::Call(call) = self.ast.kind_mut(id) {
            call.definition = Some(definition);
        }

        let fun_type = self.function_return_type(definition)?;
        if fun_type.is_known() {
            self.cache(id, fun_type);
            self.patch_function_type(scope, name, fun_type)?;
        }
        Ok(fun_type)
    }

    fn materialize(&mut self, scope: ScopeId, call: NodeId, name: &str) -> Result<NodeId, Error> {
        self.set_binding(scope, name, FunctionBinding::Pending(call))?;

        let parsed = match self.parser.as_deref_mut() {
            Some(parser) => parser.parse_function(self.ast, scope, call, name),
            None => Err(Error::unpositioned(ErrorImpl::FunctionNotResolved {
                function: name.to_string(),
                reason: String::from("no function parser configured"),
            })),
        };

        match parsed {
            Ok(definition) => {
                tracing::debug!(
                    function = name,
                    definition = definition.0,
                    "function body materialized"
                );
                self.set_binding(scope, name, FunctionBinding::Resolved(definition))?;
                Ok(definition)
            }
            Err(error) => {
                self.set_binding(scope, name, FunctionBinding::Unresolved)?;
                Err(match error.into_internal() {
                    inner @ ErrorImpl::FunctionNotResolved { .. } => Error::unpositioned(inner),
                    inner => Error::unpositioned(ErrorImpl::FunctionNotResolved {
                        function: name.to_string(),
                        reason: inner.to_string(),
                    }),
                })
            }
        }
    }

    /// Unified return type of a definition, `Unknown` when it is already
    /// being computed further up the stack.
    pub(super) fn function_return_type(&mut self, definition: NodeId) -> Result<ExprType, Error> {
        if self.resolving.contains(&definition) {
            return Ok(ExprType::Unknown);
        }
        self.resolving.push(definition);
        let result = self.determine_block_return_type(definition);
        self.resolving.pop();
        result
    }

    pub(super) fn set_binding(
        &mut self,
        scope: ScopeId,
        name: &str,
        binding: FunctionBinding,
    ) -> Result<(), Error> {
        let mut info = self.ast.contexts.lookup(scope, name)?.clone();
        info.kind = VarKind::Function { binding };
        self.ast.contexts.update(scope, name, info)
    }

    /// Records an inferred return type on a function descriptor declared
    /// without one.
    pub(super) fn patch_function_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        fun_type: ExprType,
    ) -> Result<(), Error> {
        let info = self.ast.contexts.lookup(scope, name)?;
        if info.expr_type.is_known() {
            return Ok(());
        }
        let mut info = info.clone();
        info.expr_type = fun_type;
        self.ast.contexts.update(scope, name, info)
    }

    /// Checks every argument of a builtin call against the builtin table.
    pub fn check_builtin_args(&mut self, call: NodeId) -> Result<(), Error> {
        let name = self.call_name(call)?;
        let args = self.ast.children(call).to_vec();
        for (position, arg) in args.into_iter().enumerate() {
            let expected = self.spec.arg_type(&name, position)?;
            let received = self.get_type(arg)?;
            if expected.is_known() && received.is_known() && expected != received {
                let error_position = self.ast.position(arg).clone();
                return Err(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        position,
                        expected: expected.to_string(),
                        received: received.to_string(),
                        expr: self.ast.render(call),
                    },
                    error_position,
                ));
            }
        }
        Ok(())
    }

    /// Result types of a two-valued builtin, high word first.
    pub fn get_type_tuple(&mut self, call: NodeId) -> Result<(ExprType, ExprType), Error> {
        let types = self.multi_value_types(call, 2)?;
        Ok((types[0], types[1]))
    }

    /// Result types of a four-valued builtin as `(high, low, rem_high, rem_low)`.
    pub fn get_type_quadruple(
        &mut self,
        call: NodeId,
    ) -> Result<(ExprType, ExprType, ExprType, ExprType), Error> {
        let types = self.multi_value_types(call, 4)?;
        Ok((types[3], types[2], types[1], types[0]))
    }

    /// Reads `count` result slots in table order; a slot typed `Unknown`
    /// falls back to the call's own type. Only the first such slot is
    /// filled.
    fn multi_value_types(&mut self, call: NodeId, count: usize) -> Result<Vec<ExprType>, Error> {
        let name = self.call_name(call)?;
        let fun_type = self.get_type(call)?;
        let is_user_function = matches!(
            self.ast.kind(call),
            NodeKind::Call(node) if node.definition.is_some()
        );
        if is_user_function {
            return Err(Error::unpositioned(ErrorImpl::NotMultiValue { function: name }));
        }

        let mut types = (0..count)
            .map(|position| self.spec.op_type(&name, position))
            .collect::<Result<Vec<ExprType>, Error>>()
            .map_err(|_| {
                Error::unpositioned(ErrorImpl::NotMultiValue {
                    function: name.clone(),
                })
            })?;
        if let Some(slot) = types.iter_mut().find(|slot| **slot == ExprType::Unknown) {
            *slot = fun_type;
        }
        Ok(types)
    }

    /// Qualifies a builtin call with a field and fixes its type from the
    /// runtime field table.
    pub fn resolve_field_arg(&mut self, call: NodeId, field: &str) -> Result<ExprType, Error> {
        let name = self.call_name(call)?;
        let expr_type = self.spec.runtime_field_type(&name, field)?;
        if let NodeKind::Call(node) = self.ast.kind_mut(call) {
            node.field = Some(field.to_string());
            node.fun_type = expr_type;
        }
        Ok(expr_type)
    }

    fn call_name(&self, call: NodeId) -> Result<String, Error> {
        match self.ast.kind(call) {
            NodeKind::Call(node) => Ok(node.name.clone()),
            _ => Err(Error::unpositioned(ErrorImpl::NotMultiValue {
                function: self.ast.render(call),
            })),
        }
    }
}
