use std::any::Any;

use crate::Error;

use super::{Evaluators, Functor, FunctorKind, FunctorShape, Value, evaluators::Slot};

/// Scalar field functor for native simulators.
///
/// Native simulators query scalar fields point by point and ask for the
/// gradient separately, so this type exposes [`value_pt`] and
/// [`gradient_pt`] directly.
///
/// [`value_pt`]: FieldFunctor::value_pt
/// [`gradient_pt`]: FieldFunctor::gradient_pt
#[derive(Debug, Clone, Default)]
pub struct FieldFunctor {
    slot: Slot,
}

impl FieldFunctor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scalar value at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is attached or evaluation fails.
    pub fn value_pt(&self, point: &[f64], time: f64) -> Result<f64, Error> {
        match self.slot.value(FunctorShape::Scalar, point, time)? {
            Value::Scalar(v) => Ok(v),
            Value::Vector(values) => Err(Error::ShapeMismatch {
                expected: FunctorShape::Scalar,
                components: values.len(),
            }),
        }
    }

    /// Returns the gradient at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if no gradient is attached or evaluation fails.
    pub fn gradient_pt(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.slot.gradient(point, time)
    }
}

impl Functor for FieldFunctor {
    fn kind(&self) -> FunctorKind {
        FunctorKind::NativeSimulator
    }

    fn shape(&self) -> FunctorShape {
        FunctorShape::Scalar
    }

    fn attach(&mut self, evaluators: Evaluators) {
        self.slot.set(evaluators);
    }

    fn evaluate(&self, point: &[f64], time: f64) -> Result<Value, Error> {
        self.value_pt(point, time).map(Value::Scalar)
    }

    fn evaluate_gradient(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.gradient_pt(point, time)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Vector field functor for native simulators.
#[derive(Debug, Clone, Default)]
pub struct FieldsFunctor {
    slot: Slot,
}

impl FieldsFunctor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all components at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is attached or evaluation fails.
    pub fn values_pt(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.slot
            .value(FunctorShape::Vector, point, time)
            .map(Value::into_vec)
    }

    /// Returns component `index` at `point` and `time`, or `None` if the
    /// field has fewer components.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is attached or evaluation fails.
    pub fn component_pt(&self, point: &[f64], index: usize, time: f64) -> Result<Option<f64>, Error> {
        Ok(self.values_pt(point, time)?.get(index).copied())
    }

    /// Returns the flattened Jacobian at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if no gradient is attached or evaluation fails.
    pub fn gradient_pt(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.slot.gradient(point, time)
    }
}

impl Functor for FieldsFunctor {
    fn kind(&self) -> FunctorKind {
        FunctorKind::NativeSimulator
    }

    fn shape(&self) -> FunctorShape {
        FunctorShape::Vector
    }

    fn attach(&mut self, evaluators: Evaluators) {
        self.slot.set(evaluators);
    }

    fn evaluate(&self, point: &[f64], time: f64) -> Result<Value, Error> {
        self.values_pt(point, time).map(Value::Vector)
    }

    fn evaluate_gradient(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.gradient_pt(point, time)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
