use std::{collections::BTreeSet, fmt, slice};

use crate::{Expr, FieldError, Symbol};

/// The shape of a [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    Vector(usize),
}

impl Shape {
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::Scalar)
    }

    /// Returns the number of components a value of this shape has.
    pub fn len(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector(n) => n,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Vector(n) => write!(f, "vector[{n}]"),
        }
    }
}

/// A scalar or vector-valued symbolic expression.
///
/// Manufactured solutions, their gradients, and derived source terms are all
/// fields. The variant is stated explicitly when the field is built and is
/// never inferred from the expression contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(Expr),
    Vector(Vec<Expr>),
}

impl Field {
    pub fn scalar(expr: impl Into<Expr>) -> Self {
        Self::Scalar(expr.into())
    }

    pub fn vector<I, E>(components: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self::Vector(components.into_iter().map(Into::into).collect())
    }

    pub fn shape(&self) -> Shape {
        match self {
            Self::Scalar(_) => Shape::Scalar,
            Self::Vector(components) => Shape::Vector(components.len()),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns the field's components; a scalar has exactly one.
    pub fn components(&self) -> &[Expr] {
        match self {
            Self::Scalar(expr) => slice::from_ref(expr),
            Self::Vector(components) => components,
        }
    }

    /// Returns the scalar expression.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] if the field is a vector.
    pub fn as_scalar(&self) -> Result<&Expr, FieldError> {
        match self {
            Self::Scalar(expr) => Ok(expr),
            Self::Vector(_) => Err(FieldError::ShapeMismatch {
                expected: Shape::Scalar,
                found: self.shape(),
            }),
        }
    }

    /// Applies `f` to every component, keeping the shape.
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(&Expr) -> Expr) -> Self {
        match self {
            Self::Scalar(expr) => Self::Scalar(f(expr)),
            Self::Vector(components) => Self::Vector(components.iter().map(f).collect()),
        }
    }

    /// Combines two fields of the same shape component by component.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] if the shapes differ.
    pub fn zip_with(
        &self,
        other: &Field,
        mut f: impl FnMut(&Expr, &Expr) -> Expr,
    ) -> Result<Self, FieldError> {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => Ok(Self::Scalar(f(a, b))),
            (Self::Vector(a), Self::Vector(b)) if a.len() == b.len() => Ok(Self::Vector(
                a.iter().zip(b).map(|(a, b)| f(a, b)).collect(),
            )),
            _ => Err(FieldError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            }),
        }
    }

    /// Adds two fields of the same shape.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] if the shapes differ.
    pub fn try_add(&self, other: &Field) -> Result<Self, FieldError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Subtracts `other` from this field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] if the shapes differ.
    pub fn try_sub(&self, other: &Field) -> Result<Self, FieldError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Multiplies every component by `factor`.
    #[must_use]
    pub fn scale(&self, factor: impl Into<Expr>) -> Self {
        let factor = factor.into();
        self.map(|e| &factor * e)
    }

    /// Partial derivative of every component with respect to `symbol`.
    #[must_use]
    pub fn diff(&self, symbol: &Symbol) -> Self {
        self.map(|e| e.diff(symbol))
    }

    /// Returns the spatial gradient over `symbols`.
    ///
    /// A scalar field yields the vector of its partial derivatives. A vector
    /// field with `m` components yields its `m × n` Jacobian flattened in
    /// row-major order, so entry `i * n + j` is `∂v_i/∂x_j`.
    #[must_use]
    pub fn gradient(&self, symbols: &[Symbol]) -> Self {
        Self::Vector(
            self.components()
                .iter()
                .flat_map(|e| symbols.iter().map(move |s| e.diff(s)))
                .collect(),
        )
    }

    /// Returns the divergence of a vector field over `symbols`.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is scalar or its length differs from the
    /// number of symbols.
    pub fn divergence(&self, symbols: &[Symbol]) -> Result<Self, FieldError> {
        let Self::Vector(components) = self else {
            return Err(FieldError::ShapeMismatch {
                expected: Shape::Vector(symbols.len()),
                found: Shape::Scalar,
            });
        };
        if components.len() != symbols.len() {
            return Err(FieldError::DimensionMismatch {
                components: components.len(),
                symbols: symbols.len(),
            });
        }
        let sum = components
            .iter()
            .zip(symbols)
            .fold(Expr::zero(), |acc, (e, s)| acc + e.diff(s));
        Ok(Self::Scalar(sum.simplify()))
    }

    /// Returns the component-wise Laplacian over `symbols`.
    #[must_use]
    pub fn laplacian(&self, symbols: &[Symbol]) -> Self {
        self.map(|e| {
            symbols
                .iter()
                .fold(Expr::zero(), |acc, s| acc + e.diff_n(s, 2))
                .simplify()
        })
    }

    #[must_use]
    pub fn simplify(&self) -> Self {
        self.map(Expr::simplify)
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        self.components()
            .iter()
            .flat_map(Expr::free_symbols)
            .collect()
    }
}

impl From<Expr> for Field {
    fn from(expr: Expr) -> Self {
        Self::Scalar(expr)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(expr) => write!(f, "{expr}"),
            Self::Vector(components) => {
                f.write_str("[")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("]")
            }
        }
    }
}
