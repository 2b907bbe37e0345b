use std::any::Any;

use crate::Error;

use super::{Evaluators, Functor, FunctorKind, FunctorShape, Value, evaluators::Slot};

/// Functor for simulators implemented as compiled extensions.
///
/// Compiled simulators typically call a functor with a point buffer and,
/// for vector quantities, a caller-owned output buffer to fill. One type
/// serves both shapes; the shape is fixed at construction.
#[derive(Debug, Clone)]
pub struct ExtensionFunctor {
    shape: FunctorShape,
    slot: Slot,
}

impl ExtensionFunctor {
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

    /// Returns the scalar value at `point` and `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] for vector functors, or an evaluation
    /// error.
    pub fn call_scalar(&self, point: &[f64], time: f64) -> Result<f64, Error> {
        match self.slot.value(self.shape, point, time)? {
            Value::Scalar(v) => Ok(v),
            Value::Vector(values) => Err(Error::ShapeMismatch {
                expected: FunctorShape::Scalar,
                components: values.len(),
            }),
        }
    }

    /// Writes the value at `point` and `time` into the front of `out` and
    /// returns the number of values written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `out` cannot hold every
    /// component, or an evaluation error.
    pub fn call_into(&self, point: &[f64], out: &mut [f64], time: f64) -> Result<usize, Error> {
        let value = self.slot.value(self.shape, point, time)?;
        fill(value.as_slice(), out)
    }

    /// Writes the gradient at `point` and `time` into the front of `out` and
    /// returns the number of values written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `out` is too short, or an
    /// evaluation error.
    pub fn gradient_into(&self, point: &[f64], out: &mut [f64], time: f64) -> Result<usize, Error> {
        let gradient = self.slot.gradient(point, time)?;
        fill(&gradient, out)
    }
}

fn fill(values: &[f64], out: &mut [f64]) -> Result<usize, Error> {
    let Some(dest) = out.get_mut(..values.len()) else {
        return Err(Error::BufferTooSmall {
            needed: values.len(),
            len: out.len(),
        });
    };
    dest.copy_from_slice(values);
    Ok(values.len())
}

impl Functor for ExtensionFunctor {
    fn kind(&self) -> FunctorKind {
        FunctorKind::CompiledExtension
    }

    fn shape(&self) -> FunctorShape {
        self.shape
    }

    fn attach(&mut self, evaluators: Evaluators) {
        self.slot.set(evaluators);
    }

    fn evaluate(&self, point: &[f64], time: f64) -> Result<Value, Error> {
        self.slot.value(self.shape, point, time)
    }

    fn evaluate_gradient(&self, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        self.slot.gradient(point, time)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
