//! Return type unification and termination checks over function bodies.

use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        types::ExprType,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::type_checker::TypeChecker;

impl TypeChecker<'_> {
    /// Unifies the types of every exit of a block.
    ///
    /// Direct `Return` and `Error` statements contribute, nested `if`
    /// statements and blocks contribute their own unified type. Loop bodies
    /// are not entered.
    pub fn determine_block_return_type(&mut self, block: NodeId) -> Result<ExprType, Error> {
        let mut result = ExprType::Unknown;
        for stmt in self.ast.children(block).to_vec() {
            let contributed = match self.ast.kind(stmt) {
                NodeKind::Return(ret) => match ret.value {
                    Some(value) => self.get_type(value)?,
                    None => ExprType::Unknown,
                },
                NodeKind::Error if self.config.typeless_abort => ExprType::Unknown,
                NodeKind::Error => ExprType::UInt64,
                NodeKind::IfStatement(_) | NodeKind::Block => {
                    self.determine_block_return_type(stmt)?
                }
                _ => continue,
            };

            if !contributed.is_known() {
                continue;
            }
            if result.is_known() && result != contributed {
                let position = self.ast.position(stmt).clone();
                return Err(Error::new(
                    ErrorImpl::BlockTypeMismatch {
                        first: result.to_string(),
                        second: contributed.to_string(),
                    },
                    position,
                ));
            }
            result = contributed;
        }
        Ok(result)
    }
}

/// Returns whether every path through `block` ends in a return or an abort.
pub fn ensure_block_returns(ast: &Ast, block: NodeId) -> bool {
    let Some(last) = ast.children(block).last().copied() else {
        return false;
    };
    match ast.kind(last) {
        NodeKind::Return(_) | NodeKind::Error => true,
        NodeKind::IfStatement(_) => {
            let branches = ast.children(last);
            branches.len() == 2 && branches.iter().all(|branch| ensure_block_returns(ast, *branch))
        }
        _ => false,
    }
}
