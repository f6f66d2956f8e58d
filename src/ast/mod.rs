/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node arena, the closed set of node kinds and rendering
/// - expressions: Payloads and constructors of expression nodes
/// - statements: Payloads and constructors of statement nodes
/// - types: The type tags carried by expressions
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
