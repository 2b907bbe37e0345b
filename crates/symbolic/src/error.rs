use thiserror::Error;

use crate::Shape;

/// Errors from field algebra, such as combining fields of different shapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: Shape, found: Shape },

    #[error("field has {components} components but {symbols} symbols were given")]
    DimensionMismatch { components: usize, symbols: usize },
}

/// Errors that can occur when binding an ordered symbol list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("symbols are already bound")]
    AlreadyBound,

    #[error("symbol `{name}` appears more than once in the binding list")]
    DuplicateSymbol { name: String },

    #[error("expression references symbol `{name}` which is not in the binding list")]
    UnknownSymbol { name: String },
}

/// Errors that can occur during numeric point evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("symbols must be bound before evaluation")]
    NotBound,

    #[error("expected {expected} argument values, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("no value for symbol `{name}`")]
    UnboundSymbol { name: String },

    #[error("evaluation produced a non-finite value: {value}")]
    NonFinite { value: f64 },
}
