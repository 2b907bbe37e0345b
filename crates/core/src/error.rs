use famms_symbolic::{BindError, EvalError, FieldError};
use thiserror::Error;

use crate::{Artifact, FunctorShape, SetterError};

/// Errors raised while deriving manufactured solutions or attaching callbacks.
///
/// None of these are retried internally. In a coupled system, the first
/// failing problem aborts the remaining ones and is reported as
/// [`Error::Problem`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("assign requires both an equation and a solution; missing the {missing}")]
    MissingDerivationInput { missing: &'static str },

    #[error("could not evaluate the {which}")]
    Evaluation {
        which: Artifact,
        #[source]
        source: EvalError,
    },

    #[error(
        "could not attach functors to the simulator using `{value_setter}` and `{source_setter}`"
    )]
    CallbackAttachment {
        value_setter: String,
        source_setter: String,
        #[source]
        source: SetterError,
    },

    #[error("could not attach extra callback through `{setter}`")]
    ExtraCallbackAttachment {
        setter: String,
        #[source]
        source: SetterError,
    },

    #[error("unsupported functor kind `{0}`")]
    UnsupportedFunctorKind(String),

    #[error("callbacks have already been prepared; assign may only be called once")]
    AlreadyPrepared,

    #[error("symbol binding failed")]
    Binding(#[from] BindError),

    #[error("equation operator failed")]
    Equation(#[from] FieldError),

    #[error("functor has no attached evaluator")]
    FunctorNotAttached,

    #[error("functor has no gradient evaluator")]
    GradientUnavailable,

    #[error("{expected} functor received {components} components")]
    ShapeMismatch {
        expected: FunctorShape,
        components: usize,
    },

    #[error("output buffer holds {len} values but {needed} are required")]
    BufferTooSmall { needed: usize, len: usize },

    #[error("problem {index} failed")]
    Problem {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

/// Malformed construction or assignment arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("number of space dimensions must be at least 1")]
    ZeroDimension,

    #[error("explicit space symbols must not be empty")]
    EmptySpaceSymbols,

    #[error("number of problems must be at least 1")]
    NoProblems,

    #[error("{which} setter name must not be empty")]
    EmptySetterName { which: &'static str },

    #[error("expected {expected} per-problem dimensions, got {got}")]
    InvalidDimensionSpec { expected: usize, got: usize },

    #[error("problem {index} has dimension {dimension}, outside 1..={max}")]
    DimensionOutOfRange {
        index: usize,
        dimension: usize,
        max: usize,
    },

    #[error(
        "expected {expected} callback names per list, got {value_names} value and {source_names} source names"
    )]
    CallbackNamesLength {
        expected: usize,
        value_names: usize,
        source_names: usize,
    },

    #[error("expected {expected} {what}, got {got}")]
    ProblemCount {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("extra callback `{name}` would overwrite a primary callback setter")]
    ReservedCallbackName { name: String },

    #[error("extra callback `{name}` is registered more than once")]
    DuplicateCallbackName { name: String },
}
