use std::fmt;

use famms_symbolic::{Field, FieldError, PointEvaluator, Symbol};

use crate::{Equation, Error, FunctorShape, Solution};

/// One of the three quantities derived for a manufactured solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Value,
    Gradient,
    Source,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Value => "analytical solution",
            Self::Gradient => "gradient of the analytical solution",
            Self::Source => "source term",
        })
    }
}

/// The analytical solution, its spatial gradient, and the source term, each
/// bound to the same ordered symbol list and ready for point evaluation.
#[derive(Debug, Clone)]
pub struct DerivedArtifacts {
    value: PointEvaluator,
    gradient: PointEvaluator,
    source: PointEvaluator,
    nsd: usize,
    time: bool,
}

impl DerivedArtifacts {
    pub fn value(&self) -> &PointEvaluator {
        &self.value
    }

    pub fn gradient(&self) -> &PointEvaluator {
        &self.gradient
    }

    pub fn source(&self) -> &PointEvaluator {
        &self.source
    }

    pub fn get(&self, which: Artifact) -> &PointEvaluator {
        match which {
            Artifact::Value => &self.value,
            Artifact::Gradient => &self.gradient,
            Artifact::Source => &self.source,
        }
    }

    /// Number of spatial coordinates a point must have.
    pub fn nsd(&self) -> usize {
        self.nsd
    }

    pub fn is_time_dependent(&self) -> bool {
        self.time
    }

    /// Shape of the value and source functors.
    pub fn shape(&self) -> FunctorShape {
        if self.value.shape().is_scalar() {
            FunctorShape::Scalar
        } else {
            FunctorShape::Vector
        }
    }

    /// Evaluates one artifact at `point` and `time`.
    ///
    /// The time is ignored when the artifacts are time independent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Evaluation`] naming the artifact if the point has the
    /// wrong length or the result is not finite.
    pub fn evaluate(&self, which: Artifact, point: &[f64], time: f64) -> Result<Vec<f64>, Error> {
        let mut args = Vec::with_capacity(point.len() + 1);
        args.extend_from_slice(point);
        if self.time {
            args.push(time);
        }
        self.get(which)
            .evaluate(&args)
            .map_err(|source| Error::Evaluation { which, source })
    }
}

/// Derives manufactured-solution artifacts over a fixed symbol space.
///
/// # Example
///
/// ```
/// use famms_core::{Artifact, Field, FieldError, ManufacturedSolution, Solution, Symbol};
///
/// let x = Symbol::coordinates(2);
/// let mms = ManufacturedSolution::new(x.clone(), None);
///
/// // Poisson: F(v) = -∇²v.
/// let laplace = |v: &[Field]| -> Result<Field, FieldError> {
///     Ok(v[0].laplacian(&Symbol::coordinates(2)).scale(-1.0))
/// };
/// let mut v = Solution::scalar(x[0].expr().powi(2) * x[1].expr());
///
/// let artifacts = mms.derive(&laplace, &mut v, None).unwrap();
/// let source = artifacts.evaluate(Artifact::Source, &[1.0, 3.0], 0.0).unwrap();
/// assert_eq!(source, vec![-6.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturedSolution {
    spatial: Vec<Symbol>,
    time: Option<Symbol>,
}

impl ManufacturedSolution {
    pub fn new(spatial: Vec<Symbol>, time: Option<Symbol>) -> Self {
        Self { spatial, time }
    }

    pub fn spatial_symbols(&self) -> &[Symbol] {
        &self.spatial
    }

    pub fn time_symbol(&self) -> Option<&Symbol> {
        self.time.as_ref()
    }

    /// The evaluation argument order: spatial symbols, then time if present.
    pub fn ordered_symbols(&self) -> Vec<Symbol> {
        self.spatial.iter().chain(&self.time).cloned().collect()
    }

    /// Derives the source term and gradient for `solution`.
    ///
    /// The equation is applied to `coupled` when given, and to `[solution]`
    /// otherwise. The resulting source is simplified, and all three artifacts
    /// are bound to [`ordered_symbols`](Self::ordered_symbols).
    ///
    /// # Errors
    ///
    /// Returns an error if the solution was set up with different spatial
    /// symbols, if the equation fails or yields a source whose shape differs
    /// from the solution's, or if any artifact depends on a symbol outside
    /// the ordered list.
    pub fn derive(
        &self,
        equation: &dyn Equation,
        solution: &mut Solution,
        coupled: Option<&[Field]>,
    ) -> Result<DerivedArtifacts, Error> {
        solution.set_spatial_symbols(&self.spatial)?;
        let field = solution.field();

        let source = match coupled {
            Some(fields) => equation.apply(fields)?,
            None => equation.apply(std::slice::from_ref(field))?,
        }
        .simplify();

        if source.is_scalar() != field.is_scalar() {
            return Err(FieldError::ShapeMismatch {
                expected: field.shape(),
                found: source.shape(),
            }
            .into());
        }

        let gradient = field.gradient(&self.spatial);
        log::debug!("derived source {source} and gradient {gradient} for solution {field}");

        let symbols = self.ordered_symbols();
        let bind = |field: Field| -> Result<PointEvaluator, Error> {
            let mut evaluator = PointEvaluator::new(field);
            evaluator.bind_symbols(&symbols)?;
            Ok(evaluator)
        };

        Ok(DerivedArtifacts {
            value: bind(field.clone())?,
            gradient: bind(gradient)?,
            source: bind(source)?,
            nsd: self.spatial.len(),
            time: self.time.is_some(),
        })
    }
}
