use std::{fmt, sync::Arc};

use crate::Error;

use super::{FunctorShape, Value};

/// A point evaluator: maps a point and a time to component values.
pub type PointFn = Arc<dyn Fn(&[f64], f64) -> Result<Vec<f64>, Error> + Send + Sync>;

/// Wraps a closure as a [`PointFn`].
pub fn point_fn<F>(f: F) -> PointFn
where
    F: Fn(&[f64], f64) -> Result<Vec<f64>, Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The evaluator functions attached to a functor.
///
/// The value evaluator is required; the gradient is present only for
/// analytical-solution functors.
#[derive(Clone)]
pub struct Evaluators {
    value: PointFn,
    gradient: Option<PointFn>,
}

impl Evaluators {
    pub fn new(value: PointFn) -> Self {
        Self {
            value,
            gradient: None,
        }
    }

    #[must_use]
    pub fn with_gradient(mut self, gradient: PointFn) -> Self {
        self.gradient = Some(gradient);
        self
    }

    pub fn has_gradient(&self) -> bool {
        self.gradient.is_some()
    }

    /// Calls the value evaluator.
    ///
    /// # Errors
    ///
    /// Propagates the evaluator's error.
    pub fn value(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        (self.value)(point, time)
    }

    /// Calls the gradient evaluator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GradientUnavailable`] if none is attached, or the
    /// evaluator's error.
    pub fn gradient(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        let gradient = self.gradient.as_ref().ok_or(Error::GradientUnavailable)?;
        gradient(point, time)
    }
}

impl fmt::Debug for Evaluators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluators")
            .field("gradient", &self.has_gradient())
            .finish_non_exhaustive()
    }
}

/// Evaluators a functor may not have received yet.
#[derive(Debug, Clone, Default)]
pub(super) struct Slot(Option<Evaluators>);

impl Slot {
    pub(super) fn set(&mut self, evaluators: Evaluators) {
        self.0 = Some(evaluators);
    }

    pub(super) fn get(&self) -> Result<&Evaluators, Error> {
        self.0.as_ref().ok_or(Error::FunctorNotAttached)
    }

    /// Evaluates the value and checks it against `shape`.
    pub(super) fn value(&self, shape: FunctorShape, point: &[f64], time: f64) -> Result<Value, Error> {
        let values = self.get()?.value(point, time)?;
        match (shape, values.as_slice()) {
            (FunctorShape::Scalar, [v]) => Ok(Value::Scalar(*v)),
            (FunctorShape::Scalar, _) => Err(Error::ShapeMismatch {
                expected: shape,
                components: values.len(),
            }),
            (FunctorShape::Vector, _) => Ok(Value::Vector(values)),
        }
    }

    pub(super) fn gradient(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.get()?.gradient(point, time)
    }
}
