//! Builtin operation table.
//!
//! Operators, builtin functions and runtime fields are not declared by user
//! code; their argument and result types come from a static table consumed
//! through the [`builtins::OpSpec`] lookup trait.

pub mod builtins;

#[cfg(test)]
mod tests;
