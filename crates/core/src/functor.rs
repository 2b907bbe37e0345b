//! Callback functors handed to simulators.
//!
//! A functor bundles the point evaluators for one derived quantity in the
//! shape a simulator family expects. Every functor implements the uniform
//! [`Functor`] trait; each family additionally exposes its own calling
//! convention on the concrete type, reachable through [`Functor::as_any`]:
//!
//! - [`FieldFunctor`] and [`FieldsFunctor`] for
//!   [`FunctorKind::NativeSimulator`]
//! - [`ExtensionFunctor`], with a buffer-filling convention, for
//!   [`FunctorKind::CompiledExtension`]
//! - [`CallableFunctor`] for [`FunctorKind::GenericCallable`]
//!
//! The scalar and vector constructors for a kind come from [`select`].

mod callable;
mod evaluators;
mod extension;
mod kind;
mod native;
mod value;

use std::{any::Any, fmt};

use crate::Error;

pub use callable::CallableFunctor;
pub use evaluators::{Evaluators, PointFn, point_fn};
pub use extension::ExtensionFunctor;
pub use kind::{FunctorCtor, FunctorKind, select};
pub use native::{FieldFunctor, FieldsFunctor};
pub use value::{FunctorShape, Value};

/// A callable value object wrapping point evaluators for a simulator.
pub trait Functor: fmt::Debug + Send + Sync {
    /// The simulator family this functor was built for.
    fn kind(&self) -> FunctorKind;

    /// Whether this functor yields scalar or vector values.
    fn shape(&self) -> FunctorShape;

    /// Binds the underlying evaluator functions, replacing any attached before.
    fn attach(&mut self, evaluators: Evaluators);

    /// Evaluates the attached value at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is attached, the evaluator fails, or the
    /// result does not match this functor's shape.
    fn evaluate(&self, point: &[f64], time: f64) -> Result<Value, Error>;

    /// Evaluates the attached gradient at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GradientUnavailable`] if no gradient is attached, or
    /// the evaluator's error.
    fn evaluate_gradient(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error>;

    /// Evaluates at `point` with the default time of `0.0`.
    ///
    /// # Errors
    ///
    /// See [`Functor::evaluate`].
    fn evaluate_at(&self, point: &[f64]) -> Result<Value, Error> {
        self.evaluate(point, 0.0)
    }

    /// Returns `self` for downcasting to the concrete functor type.
    fn as_any(&self) -> &dyn Any;
}
