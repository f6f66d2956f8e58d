//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::VariableAlreadyDeclared {
            variable: "x".to_string(),
        },
        Position(10, Rc::new("test.tl".to_string())),
    );

    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_error_message() {
    let error = Error::unpositioned(ErrorImpl::IdentNotDefined {
        ident: "foo".to_string(),
    });

    assert_eq!(error.to_string(), "ident 'foo' not defined");
    assert!(error.get_position().is_null());
}

#[test]
fn test_or_position_keeps_existing() {
    let pos = Position(42, Rc::new("test.tl".to_string()));
    let other = Position(7, Rc::new("test.tl".to_string()));

    let error = Error::new(ErrorImpl::MissingReturn { function: "f".to_string() }, pos);
    assert_eq!(error.or_position(&other).get_position().0, 42);

    let error = Error::unpositioned(ErrorImpl::MissingReturn { function: "f".to_string() });
    assert_eq!(error.or_position(&other).get_position().0, 7);
}

#[test]
fn test_block_type_mismatch_message() {
    let error = Error::unpositioned(ErrorImpl::BlockTypeMismatch {
        first: "uint64".to_string(),
        second: "byte[]".to_string(),
    });

    assert_eq!(error.get_error_name(), "BlockTypeMismatch");
    assert_eq!(error.to_string(), "block types mismatch: uint64 vs byte[]");
}

#[test]
fn test_invalid_operand_wraps_inner() {
    let error = Error::unpositioned(ErrorImpl::InvalidOperand {
        operand: "ident x".to_string(),
        inner: Box::new(ErrorImpl::IdentNotDefined {
            ident: "x".to_string(),
        }),
    });

    assert_eq!(
        error.to_string(),
        "operand 'ident x' has invalid type: ident 'x' not defined"
    );
}

#[test]
fn test_argument_mismatch_names_position() {
    let error = Error::unpositioned(ErrorImpl::ArgumentTypeMatchError {
        position: 1,
        expected: "uint64".to_string(),
        received: "byte[]".to_string(),
        expr: "itob ([1])".to_string(),
    });

    let message = error.to_string();
    assert!(message.contains("argument 1"));
    assert!(message.contains("uint64"));
    assert!(message.contains("byte[]"));
}

#[test]
fn test_error_tip_none() {
    let error = Error::unpositioned(ErrorImpl::UpdateFailed {
        ident: "x".to_string(),
    });

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::unpositioned(ErrorImpl::MissingReturn {
        function: "main".to_string(),
    });

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("main")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_from_error_impl() {
    let error: Error = ErrorImpl::UnknownOperation { op: "**".to_string() }.into();
    assert_eq!(error.get_error_name(), "UnknownOperation");
    assert_eq!(error.to_string(), "op '**' not in the language");
}
