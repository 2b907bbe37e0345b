use std::collections::{HashMap, HashSet};

use crate::{BindError, EvalError, Field, Shape, Symbol};

/// A field prepared for numeric evaluation at points.
///
/// The evaluator must be bound to an ordered symbol list exactly once before
/// it can be evaluated. Argument values passed to [`evaluate`] are matched to
/// the bound symbols by position.
///
/// # Example
///
/// ```
/// use famms_symbolic::{Field, PointEvaluator, Symbol};
///
/// let x = Symbol::new("x_0");
/// let t = Symbol::new("t");
/// let mut v = PointEvaluator::new(Field::scalar(x.expr().powi(2) + t.expr()));
///
/// v.bind_symbols(&[x, t]).unwrap();
/// assert_eq!(v.evaluate(&[2.0, 0.5]).unwrap(), vec![4.5]);
/// ```
///
/// [`evaluate`]: PointEvaluator::evaluate
#[derive(Debug, Clone)]
pub struct PointEvaluator {
    field: Field,
    binding: Option<Binding>,
}

#[derive(Debug, Clone)]
struct Binding {
    symbols: Vec<Symbol>,
    positions: HashMap<Symbol, usize>,
}

impl PointEvaluator {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            binding: None,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn shape(&self) -> Shape {
        self.field.shape()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Returns the bound symbols in argument order, if bound.
    pub fn symbols(&self) -> Option<&[Symbol]> {
        self.binding.as_ref().map(|b| b.symbols.as_slice())
    }

    /// Binds the ordered symbol list used to interpret evaluation arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluator is already bound, if `symbols`
    /// contains duplicates, or if the field depends on a symbol not in
    /// `symbols`.
    pub fn bind_symbols(&mut self, symbols: &[Symbol]) -> Result<(), BindError> {
        if self.binding.is_some() {
            return Err(BindError::AlreadyBound);
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(dup) = symbols.iter().find(|s| !seen.insert(*s)) {
            return Err(BindError::DuplicateSymbol {
                name: dup.name().to_owned(),
            });
        }

        if let Some(unknown) = self
            .field
            .free_symbols()
            .into_iter()
            .find(|s| !seen.contains(s))
        {
            return Err(BindError::UnknownSymbol {
                name: unknown.name().to_owned(),
            });
        }

        let positions = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        self.binding = Some(Binding {
            symbols: symbols.to_vec(),
            positions,
        });
        Ok(())
    }

    /// Evaluates every component of the field at `args`.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluator is unbound, if the number of
    /// arguments does not match the bound symbols, or if a component
    /// evaluates to a non-finite value.
    pub fn evaluate(&self, args: &[f64]) -> Result<Vec<f64>, EvalError> {
        let binding = self.binding.as_ref().ok_or(EvalError::NotBound)?;
        if args.len() != binding.symbols.len() {
            return Err(EvalError::Arity {
                expected: binding.symbols.len(),
                got: args.len(),
            });
        }

        let lookup = |s: &Symbol| binding.positions.get(s).map(|&i| args[i]);
        self.field
            .components()
            .iter()
            .map(|e| {
                let value = e.eval_with(&lookup)?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(EvalError::NonFinite { value })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn heat_solution() -> (PointEvaluator, Symbol, Symbol) {
        let x = Symbol::new("x_0");
        let t = Symbol::new("t");
        let field = Field::scalar(x.expr().powi(2) + t.expr());
        (PointEvaluator::new(field), x, t)
    }

    #[test]
    fn evaluating_before_binding_fails() {
        let (v, _, _) = heat_solution();
        assert_eq!(v.evaluate(&[1.0, 0.0]), Err(EvalError::NotBound));
    }

    #[test]
    fn repeated_evaluation_is_idempotent() {
        let (mut v, x, t) = heat_solution();
        v.bind_symbols(&[x, t]).unwrap();
        let first = v.evaluate(&[2.0, 0.5]).unwrap();
        let second = v.evaluate(&[2.0, 0.5]).unwrap();
        assert_eq!(first, second);
        assert_relative_eq!(first[0], 4.5);
    }

    #[test]
    fn binding_twice_fails() {
        let (mut v, x, t) = heat_solution();
        v.bind_symbols(&[x.clone(), t.clone()]).unwrap();
        assert_eq!(v.bind_symbols(&[x, t]), Err(BindError::AlreadyBound));
    }

    #[test]
    fn binding_rejects_missing_and_duplicate_symbols() {
        let (mut v, x, _) = heat_solution();
        assert_eq!(
            v.bind_symbols(&[x.clone()]),
            Err(BindError::UnknownSymbol {
                name: "t".to_owned()
            })
        );
        assert_eq!(
            v.bind_symbols(&[x.clone(), x]),
            Err(BindError::DuplicateSymbol {
                name: "x_0".to_owned()
            })
        );
        assert!(!v.is_bound());
    }

    #[test]
    fn extra_bound_symbols_are_allowed() {
        let mut v = PointEvaluator::new(Field::scalar(3.0));
        v.bind_symbols(&Symbol::coordinates(2)).unwrap();
        assert_eq!(v.evaluate(&[7.0, 8.0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn arity_is_checked() {
        let (mut v, x, t) = heat_solution();
        v.bind_symbols(&[x, t]).unwrap();
        assert_eq!(
            v.evaluate(&[1.0]),
            Err(EvalError::Arity {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn non_finite_values_are_errors() {
        let x = Symbol::new("x_0");
        let mut v = PointEvaluator::new(Field::scalar(x.expr().ln()));
        v.bind_symbols(&[x]).unwrap();
        assert!(matches!(
            v.evaluate(&[0.0]),
            Err(EvalError::NonFinite { .. })
        ));
    }

    #[test]
    fn vector_fields_evaluate_every_component() {
        let x = Symbol::coordinates(2);
        let mut v = PointEvaluator::new(Field::vector([x[0].expr(), x[0].expr() * x[1].expr()]));
        v.bind_symbols(&x).unwrap();
        assert_eq!(v.evaluate(&[2.0, 3.0]).unwrap(), vec![2.0, 6.0]);
        assert_eq!(v.shape(), Shape::Vector(2));
    }
}
