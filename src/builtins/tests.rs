//! Unit tests for the builtin operation table.

use crate::ast::types::ExprType;

use super::builtins::{OpSpec, StaticOpSpec};

#[test]
fn test_binary_operator_signature() {
    let spec = StaticOpSpec;
    assert_eq!(spec.op_type("+", 0).unwrap(), ExprType::UInt64);
    assert_eq!(spec.arg_type("+", 0).unwrap(), ExprType::UInt64);
    assert_eq!(spec.arg_type("+", 1).unwrap(), ExprType::UInt64);
}

#[test]
fn test_equality_accepts_any_operands() {
    let spec = StaticOpSpec;
    assert_eq!(spec.arg_type("==", 0).unwrap(), ExprType::Unknown);
    assert_eq!(spec.op_type("==", 0).unwrap(), ExprType::UInt64);
}

#[test]
fn test_unknown_operation() {
    let spec = StaticOpSpec;
    let error = spec.op_type("**", 0).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownOperation");
}

#[test]
fn test_position_out_of_range() {
    let spec = StaticOpSpec;
    let error = spec.arg_type("len", 1).unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidPosition");

    let error = spec.op_type("log", 0).unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidPosition");
}

#[test]
fn test_builtin_functions_exclude_operators() {
    let spec = StaticOpSpec;
    assert!(spec.is_builtin_fun("sha256"));
    assert!(spec.is_builtin_fun("divmodw"));
    assert!(!spec.is_builtin_fun("+"));
    assert!(!spec.is_builtin_fun("b=="));
    assert!(!spec.is_builtin_fun("arg"));
    assert!(!spec.is_builtin_fun("main"));
}

#[test]
fn test_multi_value_results() {
    let spec = StaticOpSpec;
    assert_eq!(spec.op_type("mulw", 1).unwrap(), ExprType::UInt64);
    assert_eq!(spec.op_type("divmodw", 3).unwrap(), ExprType::UInt64);
    assert_eq!(spec.op_type("app_global_get_ex", 0).unwrap(), ExprType::Unknown);
    assert_eq!(spec.op_type("app_global_get_ex", 1).unwrap(), ExprType::UInt64);
}

#[test]
fn test_dependent_result_type() {
    let spec = StaticOpSpec;
    assert_eq!(spec.dependent_arg("select"), Some(0));
    assert_eq!(spec.dependent_arg("sha256"), None);
}

#[test]
fn test_runtime_fields() {
    let spec = StaticOpSpec;
    assert_eq!(spec.runtime_field_type("txn", "Amount").unwrap(), ExprType::UInt64);
    assert_eq!(spec.runtime_field_type("gtxn", "Sender").unwrap(), ExprType::Bytes);
    assert_eq!(spec.runtime_field_type("txna", "ApplicationArgs").unwrap(), ExprType::Bytes);
    assert_eq!(spec.runtime_field_type("global", "GroupSize").unwrap(), ExprType::UInt64);
    assert_eq!(
        spec.runtime_field_type("acct_params_get", "AcctBalance").unwrap(),
        ExprType::UInt64
    );
    assert_eq!(spec.runtime_field_type("itxn_field", "Accounts").unwrap(), ExprType::Bytes);

    let error = spec.runtime_field_type("txn", "Nope").unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownField");
    assert!(spec.runtime_field_type("txna", "Amount").is_err());
}
