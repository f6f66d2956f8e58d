//! Type inference and control-flow validation.
//!
//! The checker works directly on the node arena:
//!
//! - Infers expression types on demand and caches them in the nodes
//! - Resolves calls to builtins or to lazily parsed user functions
//! - Unifies the return types of every exit of a function body
//! - Verifies that every path through a function returns
//!
//! Builtin signatures come from an [`crate::builtins::builtins::OpSpec`]
//! and function bodies from a [`type_checker::FunctionParser`], both
//! supplied by the caller.

pub mod check;
pub mod returns;
pub mod type_checker;
