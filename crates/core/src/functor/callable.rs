use std::any::Any;

use crate::Error;

use super::{Evaluators, Functor, FunctorKind, FunctorShape, Value, evaluators::Slot};

/// Functor for simulators that accept any callable.
///
/// Point evaluation is available as [`eval_pt`] and [`eval_grad_pt`]; other
/// per-application queries can be built on top of [`Functor::evaluate`].
///
/// [`eval_pt`]: CallableFunctor::eval_pt
/// [`eval_grad_pt`]: CallableFunctor::eval_grad_pt
#[derive(Debug, Clone)]
pub struct CallableFunctor {
    shape: FunctorShape,
    slot: Slot,
}

impl CallableFunctor {
    pub fn scalar() -> Self {
        Self {
            shape: FunctorShape::Scalar,
            slot: Slot::default(),
        }
    }

    pub fn vector() -> Self {
        Self {
            shape: FunctorShape::Vector,
            slot: Slot::default(),
        }
    }

    /// Evaluates the attached value at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is attached or evaluation fails.
    pub fn eval_pt(&self, point: &[f64], time: f64) -> Result<Value, Error> {
        self.slot.value(self.shape, point, time)
    }

    /// Evaluates the attached gradient at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if no gradient is attached or evaluation fails.
    pub fn eval_grad_pt(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.slot.gradient(point, time)
    }
}

impl Functor for CallableFunctor {
    fn kind(&self) -> FunctorKind {
        FunctorKind::GenericCallable
    }

    fn shape(&self) -> FunctorShape {
        self.shape
    }

    fn attach(&mut self, evaluators: Evaluators) {
        self.slot.set(evaluators);
    }

    fn evaluate(&self, point: &[f64], time: f64) -> Result<Value, Error> {
        self.eval_pt(point, time)
    }

    fn evaluate_gradient(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.eval_grad_pt(point, time)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
