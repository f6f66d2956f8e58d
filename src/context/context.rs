use std::collections::HashMap;

use crate::{
    ast::{ast::NodeId, types::ExprType},
    errors::errors::{Error, ErrorImpl},
};

use super::literals::{LiteralPool, FALSE_CONST_VALUE, TRUE_CONST_VALUE};

/// Index of a scope inside [`Contexts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// Lazy binding of a user function to its definition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionBinding {
    /// Declared, body not materialized yet.
    Unresolved,
    /// The body is being materialized on behalf of this call site.
    Pending(NodeId),
    Resolved(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarKind {
    /// Stack resident variable.
    Variable { address: usize },
    /// Named literal, addressed by its literal pool offset.
    Constant { offset: usize, value: String },
    Function { binding: FunctionBinding },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
    pub name: String,
    pub expr_type: ExprType,
    pub kind: VarKind,
}

impl VarInfo {
    pub fn constant(&self) -> bool {
        matches!(self.kind, VarKind::Constant { .. })
    }

    pub fn function(&self) -> bool {
        matches!(self.kind, VarKind::Function { .. })
    }

    /// Stack address for variables, pool offset for constants.
    pub fn address(&self) -> Option<usize> {
        match self.kind {
            VarKind::Variable { address } => Some(address),
            VarKind::Constant { offset, .. } => Some(offset),
            VarKind::Function { .. } => None,
        }
    }

    fn same_kind(&self, other: &VarInfo) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
    }
}

#[derive(Debug)]
pub struct Context {
    pub name: String,
    parent: Option<ScopeId>,
    vars: HashMap<String, VarInfo>,
    address_entry: usize,
    address_next: usize,
}

impl Context {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn get(&self, name: &str) -> Option<&VarInfo> {
        self.vars.get(name)
    }

    pub fn vars(&self) -> impl Iterator<Item = &VarInfo> {
        self.vars.values()
    }

    pub fn entry_address(&self) -> usize {
        self.address_entry
    }

    pub fn last_address(&self) -> usize {
        self.address_next
    }
}

/// Scope tree of one compilation unit together with its literal pool.
///
/// Scopes are never removed; the whole tree is dropped with the unit.
#[derive(Debug)]
pub struct Contexts {
    scopes: Vec<Context>,
    literals: LiteralPool,
}

impl Contexts {
    /// Creates the tree with its root scope, seeding the boolean literals.
    pub fn new(root_name: &str) -> Result<Self, Error> {
        let mut contexts = Contexts {
            scopes: vec![Context {
                name: root_name.to_string(),
                parent: None,
                vars: HashMap::new(),
                address_entry: 0,
                address_next: 0,
            }],
            literals: LiteralPool::new(),
        };
        contexts.add_literal(FALSE_CONST_VALUE, ExprType::UInt64)?;
        contexts.add_literal(TRUE_CONST_VALUE, ExprType::UInt64)?;
        Ok(contexts)
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Opens a child scope whose addresses start at the parent's next free slot.
    pub fn new_context(&mut self, name: &str, parent: ScopeId) -> ScopeId {
        let entry = self.scopes[parent.0].address_next;
        self.scopes.push(Context {
            name: name.to_string(),
            parent: Some(parent),
            vars: HashMap::new(),
            address_entry: entry,
            address_next: entry,
        });
        let id = ScopeId(self.scopes.len() - 1);
        tracing::debug!(name, parent = parent.0, scope = id.0, entry, "scope created");
        id
    }

    pub fn get(&self, scope: ScopeId) -> &Context {
        &self.scopes[scope.0]
    }

    pub fn literals(&self) -> &LiteralPool {
        &self.literals
    }

    /// Walks from `scope` to the root and yields every scope on the way.
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |current| self.scopes[current.0].parent)
    }

    fn declaring_scope(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.chain(scope).find(|id| self.scopes[id.0].vars.contains_key(name))
    }

    pub fn lookup(&self, scope: ScopeId, name: &str) -> Result<&VarInfo, Error> {
        self.declaring_scope(scope, name)
            .and_then(|id| self.scopes[id.0].vars.get(name))
            .ok_or_else(|| {
                Error::unpositioned(ErrorImpl::IdentNotDefined {
                    ident: name.to_string(),
                })
            })
    }

    /// Overwrites the nearest declaration of `name`; its kind must stay the same.
    pub fn update(&mut self, scope: ScopeId, name: &str, info: VarInfo) -> Result<(), Error> {
        let declaring = self.declaring_scope(scope, name).ok_or_else(|| {
            Error::unpositioned(ErrorImpl::UpdateFailed {
                ident: name.to_string(),
            })
        })?;
        let slot = self.scopes[declaring.0]
            .vars
            .get_mut(name)
            .ok_or_else(|| {
                Error::unpositioned(ErrorImpl::UpdateFailed {
                    ident: name.to_string(),
                })
            })?;
        if !slot.same_kind(&info) {
            return Err(Error::unpositioned(ErrorImpl::DescriptorKindChanged {
                ident: name.to_string(),
            }));
        }
        *slot = info;
        Ok(())
    }

    /// Moves this scope's variables to `[new_base, new_base + n)`, keeping their order.
    pub fn remap_to(&mut self, scope: ScopeId, new_base: usize) {
        let context = &mut self.scopes[scope.0];
        let mut vars: Vec<&mut VarInfo> = context
            .vars
            .values_mut()
            .filter(|info| matches!(info.kind, VarKind::Variable { .. }))
            .collect();
        vars.sort_by_key(|info| info.address());

        let mut next = new_base;
        for info in vars {
            info.kind = VarKind::Variable { address: next };
            next += 1;
        }

        tracing::debug!(
            scope = scope.0,
            from = context.address_entry,
            to = new_base,
            "scope remapped"
        );
        context.address_entry = new_base;
        context.address_next = next;
    }

    pub fn new_var(
        &mut self,
        scope: ScopeId,
        name: &str,
        expr_type: ExprType,
    ) -> Result<usize, Error> {
        let context = &mut self.scopes[scope.0];
        if context.vars.contains_key(name) {
            return Err(Error::unpositioned(ErrorImpl::VariableAlreadyDeclared {
                variable: name.to_string(),
            }));
        }
        let address = context.address_next;
        context.vars.insert(
            name.to_string(),
            VarInfo {
                name: name.to_string(),
                expr_type,
                kind: VarKind::Variable { address },
            },
        );
        context.address_next += 1;
        Ok(address)
    }

    pub fn new_const(
        &mut self,
        scope: ScopeId,
        name: &str,
        expr_type: ExprType,
        value: &str,
    ) -> Result<usize, Error> {
        if self.scopes[scope.0].vars.contains_key(name) {
            return Err(Error::unpositioned(ErrorImpl::ConstantAlreadyDeclared {
                constant: name.to_string(),
            }));
        }
        let offset = self.add_literal(value, expr_type)?;
        self.scopes[scope.0].vars.insert(
            name.to_string(),
            VarInfo {
                name: name.to_string(),
                expr_type,
                kind: VarKind::Constant {
                    offset,
                    value: value.to_string(),
                },
            },
        );
        Ok(offset)
    }

    pub fn new_func(
        &mut self,
        scope: ScopeId,
        name: &str,
        expr_type: ExprType,
    ) -> Result<(), Error> {
        let context = &mut self.scopes[scope.0];
        if context.vars.contains_key(name) {
            return Err(Error::unpositioned(ErrorImpl::FunctionAlreadyDeclared {
                function: name.to_string(),
            }));
        }
        context.vars.insert(
            name.to_string(),
            VarInfo {
                name: name.to_string(),
                expr_type,
                kind: VarKind::Function {
                    binding: FunctionBinding::Unresolved,
                },
            },
        );
        Ok(())
    }

    pub fn add_literal(&mut self, value: &str, literal_type: ExprType) -> Result<usize, Error> {
        self.literals.add(value, literal_type)
    }

    /// Dumps the descriptors of one scope at debug level.
    pub fn print(&self, scope: ScopeId) {
        let context = &self.scopes[scope.0];
        for (name, info) in context.vars.iter() {
            tracing::debug!(scope = %context.name, name = %name, ?info);
        }
    }
}
