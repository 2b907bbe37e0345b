use famms_symbolic::{Field, FieldError};

/// A governing equation operator.
///
/// The operator maps the full, ordered list of solution fields in a system to
/// the expression that must equal the source term. For a single problem the
/// list holds just that problem's solution. Equations are stateless and are
/// applied exactly once per derivation.
///
/// Any closure `Fn(&[Field]) -> Result<Field, FieldError>` is an equation.
pub trait Equation {
    /// Applies the operator to the solution fields.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the fields have shapes the operator cannot
    /// handle.
    fn apply(&self, solutions: &[Field]) -> Result<Field, FieldError>;
}

impl<F> Equation for F
where
    F: Fn(&[Field]) -> Result<Field, FieldError>,
{
    fn apply(&self, solutions: &[Field]) -> Result<Field, FieldError> {
        self(solutions)
    }
}
