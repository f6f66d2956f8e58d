//! Scoped symbol tables and the literal pool.
//!
//! Scopes form a tree rooted at the compilation unit's global scope. Each
//! scope owns its declarations and a contiguous range of stack addresses;
//! the literal pool is shared by the whole tree.

pub mod context;
pub mod literals;

#[cfg(test)]
mod tests;
