use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExpressionError {
    #[error("Expression references the query parameter and cannot be evaluated locally")]
    ParameterReference,

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Invalid function arguments for {function}: {message}")]
    InvalidFunctionArgs { function: String, message: String },

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Unknown member '{member}' on {value_type}")]
    UnknownMember { member: String, value_type: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in {0}")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, ExpressionError>;
