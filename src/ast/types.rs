//! Type tags for the expression language.
//!
//! The language only knows two value types: unsigned 64-bit integers (which
//! also encode booleans) and byte strings. `Unknown` is a placeholder used
//! while resolving and as a wildcard by builtin signatures, `Invalid` marks a
//! failed resolution.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExprType {
    #[default]
    Unknown,
    UInt64,
    Bytes,
    Invalid,
}

impl ExprType {
    pub fn is_known(&self) -> bool {
        matches!(self, ExprType::UInt64 | ExprType::Bytes)
    }
}

impl Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprType::UInt64 => write!(f, "uint64"),
            ExprType::Bytes => write!(f, "byte[]"),
            ExprType::Invalid => write!(f, "invalid"),
            ExprType::Unknown => write!(f, "unknown"),
        }
    }
}
