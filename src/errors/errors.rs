use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Builds an error that is not attached to any source construct.
    pub fn unpositioned(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn into_internal(self) -> ErrorImpl {
        self.internal_error
    }

    /// Replaces the position when the error was raised without one.
    pub fn or_position(mut self, position: &Position) -> Self {
        if self.position.is_null() {
            self.position = position.clone();
        }
        self
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::ConstantAlreadyDeclared { .. } => "ConstantAlreadyDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::IdentNotDefined { .. } => "IdentNotDefined",
            ErrorImpl::IdentLookupFailed { .. } => "IdentLookupFailed",
            ErrorImpl::UpdateFailed { .. } => "UpdateFailed",
            ErrorImpl::DescriptorKindChanged { .. } => "DescriptorKindChanged",
            ErrorImpl::UnknownLiteralType { .. } => "UnknownLiteralType",
            ErrorImpl::LiteralFormatError { .. } => "LiteralFormatError",
            ErrorImpl::UnknownOperation { .. } => "UnknownOperation",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::InvalidPosition { .. } => "InvalidPosition",
            ErrorImpl::OperandTypeMatchError { .. } => "OperandTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::ConditionTypeError { .. } => "ConditionTypeError",
            ErrorImpl::BranchTypeMismatch { .. } => "BranchTypeMismatch",
            ErrorImpl::BlockTypeMismatch { .. } => "BlockTypeMismatch",
            ErrorImpl::CastError { .. } => "CastError",
            ErrorImpl::FunctionLookupFailed { .. } => "FunctionLookupFailed",
            ErrorImpl::NotMultiValue { .. } => "NotMultiValue",
            ErrorImpl::FunctionNotResolved { .. } => "FunctionNotResolved",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::NotAnExpression { .. } => "NotAnExpression",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is already declared in this scope",
                variable
            )),
            ErrorImpl::ConstantAlreadyDeclared { constant } => ErrorTip::Suggestion(format!(
                "Constant `{}` is already declared in this scope",
                constant
            )),
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already defined", function))
            }
            ErrorImpl::IdentNotDefined { ident } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in any enclosing scope", ident))
            }
            ErrorImpl::IdentLookupFailed { ident, .. } => {
                ErrorTip::Suggestion(format!("`{}` could not be resolved to a typed value", ident))
            }
            ErrorImpl::UpdateFailed { .. } => ErrorTip::None,
            ErrorImpl::DescriptorKindChanged { ident } => ErrorTip::Suggestion(format!(
                "`{}` cannot change between variable, constant and function",
                ident
            )),
            ErrorImpl::UnknownLiteralType { .. } => ErrorTip::Suggestion(String::from(
                "Only uint64 and byte[] literals can be pooled",
            )),
            ErrorImpl::LiteralFormatError { .. } => ErrorTip::Suggestion(String::from(
                "Byte literals are either \"quoted\" strings or 0x-prefixed hex",
            )),
            ErrorImpl::UnknownOperation { op } => {
                ErrorTip::Suggestion(format!("`{}` is not an operation of the language", op))
            }
            ErrorImpl::UnknownField { op, field } => {
                ErrorTip::Suggestion(format!("`{}` has no field `{}`", op, field))
            }
            ErrorImpl::InvalidPosition { op, .. } => {
                ErrorTip::Suggestion(format!(
                    "Check the number of values `{}` takes and returns",
                    op
                ))
            }
            ErrorImpl::OperandTypeMatchError {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected operand type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::TypeMatchError { expected, received, .. } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError {
                position,
                expected,
                received,
                ..
            } => ErrorTip::Suggestion(format!(
                "Expected argument {} of type `{}`, received `{}`",
                position, expected, received
            )),
            ErrorImpl::InvalidOperand { .. } => ErrorTip::None,
            ErrorImpl::ConditionTypeError { received } => ErrorTip::Suggestion(format!(
                "Conditions must be `uint64`, received `{}`",
                received
            )),
            ErrorImpl::BranchTypeMismatch { .. } => ErrorTip::Suggestion(String::from(
                "Both branches of an if expression must have the same type",
            )),
            ErrorImpl::BlockTypeMismatch { .. } => ErrorTip::Suggestion(String::from(
                "Every return of a function must have the same type",
            )),
            ErrorImpl::CastError { .. } => ErrorTip::None,
            ErrorImpl::FunctionLookupFailed { function } => ErrorTip::Suggestion(format!(
                "`{}` is neither a declared function nor a builtin",
                function
            )),
            ErrorImpl::NotMultiValue { function } => ErrorTip::Suggestion(format!(
                "`{}` does not produce multiple values",
                function
            )),
            ErrorImpl::FunctionNotResolved { .. } => ErrorTip::None,
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "Add a return or an else branch at the end of `{}`",
                function
            )),
            ErrorImpl::NotAnExpression { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

impl From<ErrorImpl> for Error {
    fn from(error_impl: ErrorImpl) -> Self {
        Error::unpositioned(error_impl)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("variable '{variable}' already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("const '{constant}' already declared")]
    ConstantAlreadyDeclared { constant: String },
    #[error("function '{function}' already defined")]
    FunctionAlreadyDeclared { function: String },
    #[error("ident '{ident}' not defined")]
    IdentNotDefined { ident: String },
    #[error("ident lookup for {ident} failed: {reason}")]
    IdentLookupFailed { ident: String, reason: String },
    #[error("failed to update ident {ident}")]
    UpdateFailed { ident: String },
    #[error("descriptor kind of '{ident}' cannot change")]
    DescriptorKindChanged { ident: String },
    #[error("unknown literal type {type_} ({value})")]
    UnknownLiteralType { type_: String, value: String },
    #[error("cannot parse byte literal {literal}: {reason}")]
    LiteralFormatError { literal: String, reason: String },
    #[error("op '{op}' not in the language")]
    UnknownOperation { op: String },
    #[error("field '{field}' of '{op}' lookup failed")]
    UnknownField { op: String, field: String },
    #[error("{kind} position {position} of '{op}' is not defined")]
    InvalidPosition {
        op: String,
        kind: String,
        position: usize,
    },
    #[error("incompatible {side} operand type: '{expected}' vs '{received}' in expr '{expr}'")]
    OperandTypeMatchError {
        side: String,
        expected: String,
        received: String,
        expr: String,
    },
    #[error("incompatible types: '{expected}' vs '{received}' in expr '{expr}'")]
    TypeMatchError {
        expected: String,
        received: String,
        expr: String,
    },
    #[error("incompatible types at argument {position}: (exp) {expected} vs {received} (actual) in expr '{expr}'")]
    ArgumentTypeMatchError {
        position: usize,
        expected: String,
        received: String,
        expr: String,
    },
    #[error("operand '{operand}' has invalid type: {inner}")]
    InvalidOperand {
        operand: String,
        inner: Box<ErrorImpl>,
    },
    #[error("cond type is '{received}', expected 'uint64'")]
    ConditionTypeError { received: String },
    #[error("if blocks types mismatch '{first}' vs '{second}'")]
    BranchTypeMismatch { first: String, second: String },
    #[error("block types mismatch: {first} vs {second}")]
    BlockTypeMismatch { first: String, second: String },
    #[error("cannot cast {from} to {to}")]
    CastError { from: String, to: String },
    #[error("function {function} lookup failed")]
    FunctionLookupFailed { function: String },
    #[error("function {function} does not return multiple values")]
    NotMultiValue { function: String },
    #[error("function {function} body could not be resolved: {reason}")]
    FunctionNotResolved { function: String, reason: String },
    #[error("function {function} may not return on all paths")]
    MissingReturn { function: String },
    #[error("node '{kind}' is not an expression")]
    NotAnExpression { kind: String },
}
