use famms_symbolic::{BindError, Expr, Field, Shape, Symbol};

/// A manufactured analytical solution.
///
/// The solution records the spatial symbols it is expressed in. These are
/// set once before derivation; setting the same symbols again is a no-op and
/// setting different ones is an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    field: Field,
    spatial: Option<Vec<Symbol>>,
}

impl Solution {
    pub fn new(field: impl Into<Field>) -> Self {
        Self {
            field: field.into(),
            spatial: None,
        }
    }

    pub fn scalar(expr: impl Into<Expr>) -> Self {
        Self::new(Field::scalar(expr))
    }

    pub fn vector<I, E>(components: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self::new(Field::vector(components))
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn shape(&self) -> Shape {
        self.field.shape()
    }

    pub fn spatial_symbols(&self) -> Option<&[Symbol]> {
        self.spatial.as_deref()
    }

    /// Records the spatial symbols this solution is expressed in.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::AlreadyBound`] if different symbols were set
    /// before.
    pub fn set_spatial_symbols(&mut self, symbols: &[Symbol]) -> Result<(), BindError> {
        match &self.spatial {
            Some(existing) if existing.as_slice() == symbols => Ok(()),
            Some(_) => Err(BindError::AlreadyBound),
            None => {
                self.spatial = Some(symbols.to_vec());
                Ok(())
            }
        }
    }

    /// Returns the gradient over the recorded spatial symbols, or `None`
    /// before they are set.
    pub fn gradient(&self) -> Option<Field> {
        self.spatial
            .as_deref()
            .map(|symbols| self.field.gradient(symbols))
    }
}

impl From<Field> for Solution {
    fn from(field: Field) -> Self {
        Self::new(field)
    }
}

impl From<Expr> for Solution {
    fn from(expr: Expr) -> Self {
        Self::scalar(expr)
    }
}
