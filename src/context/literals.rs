//! Literal pool shared by every scope of a compilation unit.
//!
//! Integer literals are kept as their source text, byte literals are parsed
//! into raw bytes when first pooled. Each literal is stored once and its
//! offset is its index in the type-specific sequence.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::types::ExprType,
    errors::errors::{Error, ErrorImpl},
};

pub const FALSE_CONST_VALUE: &str = "0";
pub const TRUE_CONST_VALUE: &str = "1";

lazy_static! {
    static ref HEX_LITERAL: Regex = Regex::new(r"^0x((?:[0-9a-fA-F]{2})*)$").unwrap();
    static ref QUOTED_LITERAL: Regex = Regex::new(r#"^"((?s).*)"$"#).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralDesc {
    pub offset: usize,
    pub literal_type: ExprType,
}

#[derive(Debug, Default)]
pub struct LiteralPool {
    literals: HashMap<String, LiteralDesc>,
    intc: Vec<String>,
    bytec: Vec<Vec<u8>>,
}

impl LiteralPool {
    pub fn new() -> Self {
        LiteralPool {
            literals: HashMap::new(),
            intc: Vec::with_capacity(128),
            bytec: Vec::with_capacity(128),
        }
    }

    /// Interns `value` and returns its offset in the sequence for `literal_type`.
    ///
    /// A value that is already pooled keeps the offset it was given first.
    pub fn add(&mut self, value: &str, literal_type: ExprType) -> Result<usize, Error> {
        if let Some(desc) = self.literals.get(value) {
            return Ok(desc.offset);
        }

        let offset = match literal_type {
            ExprType::UInt64 => {
                let offset = self.intc.len();
                self.intc.push(value.to_string());
                offset
            }
            ExprType::Bytes => {
                let parsed = parse_string_literal(value)?;
                let offset = self.bytec.len();
                self.bytec.push(parsed);
                offset
            }
            _ => {
                return Err(Error::unpositioned(ErrorImpl::UnknownLiteralType {
                    type_: literal_type.to_string(),
                    value: value.to_string(),
                }))
            }
        };

        tracing::debug!(value, %literal_type, offset, "literal pooled");
        self.literals
            .insert(value.to_string(), LiteralDesc { offset, literal_type });
        Ok(offset)
    }

    pub fn get(&self, value: &str) -> Option<LiteralDesc> {
        self.literals.get(value).copied()
    }

    pub fn intc(&self) -> &[String] {
        &self.intc
    }

    pub fn bytec(&self) -> &[Vec<u8>] {
        &self.bytec
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Parses a byte literal as written in source: `"text"` with escapes or `0x` hex.
pub fn parse_string_literal(literal: &str) -> Result<Vec<u8>, Error> {
    let format_error = |reason: &str| {
        Error::unpositioned(ErrorImpl::LiteralFormatError {
            literal: literal.to_string(),
            reason: reason.to_string(),
        })
    };

    if let Some(captures) = HEX_LITERAL.captures(literal) {
        let digits = captures[1].as_bytes();
        return digits
            .chunks(2)
            .map(|pair| {
                let high = hex_value(pair[0]).ok_or_else(|| format_error("bad hex digit"))?;
                let low = hex_value(pair[1]).ok_or_else(|| format_error("bad hex digit"))?;
                Ok(high << 4 | low)
            })
            .collect();
    }

    let body = match QUOTED_LITERAL.captures(literal) {
        Some(captures) => captures[1].to_string(),
        None if literal.starts_with("0x") => return Err(format_error("odd or invalid hex digits")),
        None => return Err(format_error("expected quoted string or hex")),
    };

    let mut result = Vec::with_capacity(body.len());
    let mut bytes = body.bytes();
    while let Some(byte) = bytes.next() {
        if byte != b'\\' {
            if byte == b'"' {
                return Err(format_error("unescaped quote"));
            }
            result.push(byte);
            continue;
        }
        match bytes.next() {
            Some(b'n') => result.push(b'\n'),
            Some(b'r') => result.push(b'\r'),
            Some(b't') => result.push(b'\t'),
            Some(b'\\') => result.push(b'\\'),
            Some(b'"') => result.push(b'"'),
            Some(b'x') => {
                let high = bytes.next().and_then(hex_value);
                let low = bytes.next().and_then(hex_value);
                match (high, low) {
                    (Some(high), Some(low)) => result.push(high << 4 | low),
                    _ => return Err(format_error("\\x needs two hex digits")),
                }
            }
            Some(other) => {
                return Err(format_error(&format!(
                    "unknown escape \\{}",
                    other as char
                )))
            }
            None => return Err(format_error("dangling escape")),
        }
    }
    Ok(result)
}

fn hex_value(digit: u8) -> Option<u8> {
    (digit as char).to_digit(16).map(|value| value as u8)
}
