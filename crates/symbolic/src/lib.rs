//! Symbolic expressions for the Famms manufactured-solution pipeline.
//!
//! This crate provides the small expression engine the core consumes:
//!
//! - [`Symbol`]: a named placeholder for a coordinate axis or time
//! - [`Expr`]: a scalar expression tree with differentiation and simplification
//! - [`Field`]: a scalar or vector-valued expression, the unit a manufactured
//!   solution is written in
//! - [`PointEvaluator`]: binds a field to an ordered symbol list and evaluates
//!   it at numeric points
//!
//! Equation operators are written against [`Field`] using its calculus helpers
//! ([`Field::diff`], [`Field::gradient`], [`Field::divergence`],
//! [`Field::laplacian`]).

mod error;
mod evaluator;
mod expr;
mod field;
mod symbol;

pub use error::{BindError, EvalError, FieldError};
pub use evaluator::PointEvaluator;
pub use expr::{Expr, Function};
pub use field::{Field, Shape};
pub use symbol::Symbol;
