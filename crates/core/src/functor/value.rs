use std::fmt;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// Whether a functor yields scalar or vector values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum FunctorShape {
    Scalar,
    Vector,
}

impl fmt::Display for FunctorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Vector => f.write_str("vector"),
        }
    }
}

/// The result of evaluating a functor at a point.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    pub fn shape(&self) -> FunctorShape {
        match self {
            Self::Scalar(_) => FunctorShape::Scalar,
            Self::Vector(_) => FunctorShape::Vector,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Vector(_) => None,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::Vector(values) => values,
        }
    }

    pub fn into_vec(self) -> Vec<f64> {
        match self {
            Self::Scalar(v) => vec![v],
            Self::Vector(values) => values,
        }
    }
}
