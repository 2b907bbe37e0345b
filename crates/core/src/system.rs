use famms_symbolic::{Field, Symbol};

use crate::{
    Assignment, CallbackBinder, ConfigError, DEFAULT_SOURCE_SETTER, DEFAULT_VALUE_SETTER,
    Equation, Error, Famms, FunctorKind, ManufacturedSolution, Simulator, Solution, SystemConfig,
    config::validate_setter_names,
};

/// Spatial dimension of each problem in a system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dimensions {
    /// Every problem uses the full symbol pool.
    #[default]
    Max,
    Uniform(usize),
    PerProblem(Vec<usize>),
}

impl Dimensions {
    /// Resolves to one dimension per problem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDimensionSpec`] if a per-problem list
    /// has the wrong length, or [`ConfigError::DimensionOutOfRange`] if a
    /// dimension is zero or larger than `max`.
    pub fn resolve(&self, nproblems: usize, max: usize) -> Result<Vec<usize>, ConfigError> {
        let dims = match self {
            Self::Max => vec![max; nproblems],
            Self::Uniform(dim) => vec![*dim; nproblems],
            Self::PerProblem(dims) if dims.len() == nproblems => dims.clone(),
            Self::PerProblem(dims) => {
                return Err(ConfigError::InvalidDimensionSpec {
                    expected: nproblems,
                    got: dims.len(),
                });
            }
        };

        if let Some((index, &dimension)) = dims
            .iter()
            .enumerate()
            .find(|&(_, &d)| d == 0 || d > max)
        {
            return Err(ConfigError::DimensionOutOfRange {
                index,
                dimension,
                max,
            });
        }
        Ok(dims)
    }
}

impl From<usize> for Dimensions {
    fn from(dim: usize) -> Self {
        Self::Uniform(dim)
    }
}

impl From<Vec<usize>> for Dimensions {
    fn from(dims: Vec<usize>) -> Self {
        Self::PerProblem(dims)
    }
}

impl From<&[usize]> for Dimensions {
    fn from(dims: &[usize]) -> Self {
        Self::PerProblem(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Dimensions {
    fn from(dims: [usize; N]) -> Self {
        Self::PerProblem(dims.to_vec())
    }
}

/// Setter names used for each problem's simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackNames {
    Uniform { value: String, source: String },
    PerProblem { value: Vec<String>, source: Vec<String> },
}

impl CallbackNames {
    /// Resolves to one `(value, source)` setter pair per problem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CallbackNamesLength`] if per-problem lists do
    /// not have one entry per problem.
    pub fn resolve(&self, nproblems: usize) -> Result<Vec<(&str, &str)>, ConfigError> {
        match self {
            Self::Uniform { value, source } => {
                Ok(vec![(value.as_str(), source.as_str()); nproblems])
            }
            Self::PerProblem { value, source }
                if value.len() == nproblems && source.len() == nproblems =>
            {
                Ok(value
                    .iter()
                    .map(String::as_str)
                    .zip(source.iter().map(String::as_str))
                    .collect())
            }
            Self::PerProblem { value, source } => Err(ConfigError::CallbackNamesLength {
                expected: nproblems,
                value_names: value.len(),
                source_names: source.len(),
            }),
        }
    }

    /// The value and source setter names for problem `index`.
    pub fn get(&self, index: usize) -> Option<(&str, &str)> {
        match self {
            Self::Uniform { value, source } => Some((value.as_str(), source.as_str())),
            Self::PerProblem { value, source } => {
                Some((value.get(index)?.as_str(), source.get(index)?.as_str()))
            }
        }
    }
}

impl Default for CallbackNames {
    fn default() -> Self {
        Self::Uniform {
            value: DEFAULT_VALUE_SETTER.to_owned(),
            source: DEFAULT_SOURCE_SETTER.to_owned(),
        }
    }
}

/// Manufactured solutions for a coupled system of problems.
///
/// All problems share one pool of spatial symbols `x_0, ..., x_{max-1}` and
/// an optional time symbol `t`. Problem `i` with dimension `k` uses the first
/// `k` symbols of the pool. Each problem's equation receives every solution
/// in the system, in order, so its source term may depend on its siblings.
///
/// The system is ready for [`assign`](SystemFamms::assign) once constructed
/// and becomes prepared after the first successful call; it cannot be
/// assigned again.
#[derive(Debug)]
pub struct SystemFamms {
    nproblems: usize,
    kind: FunctorKind,
    spatial: Vec<Symbol>,
    time: Option<Symbol>,
    names: CallbackNames,
    dimensions: Vec<usize>,
    problems: Vec<Famms>,
}

impl SystemFamms {
    /// Creates the shared symbol pool described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &SystemConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            nproblems: config.nproblems,
            kind: config.functor_kind,
            spatial: Symbol::coordinates(config.max_nsd),
            time: config.time.then(|| Symbol::new("t")),
            names: CallbackNames::default(),
            dimensions: Vec::new(),
            problems: Vec::new(),
        })
    }

    /// Replaces the shared symbol pool with one of size `max_nsd`.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_nsd` is zero or the system is prepared.
    pub fn set_max_dimension(&mut self, max_nsd: usize) -> Result<(), Error> {
        self.ensure_unprepared()?;
        if max_nsd == 0 {
            return Err(ConfigError::ZeroDimension.into());
        }
        self.spatial = Symbol::coordinates(max_nsd);
        Ok(())
    }

    /// Uses the same setter names for every problem.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or the system is prepared.
    pub fn set_callback_names(
        &mut self,
        value_setter: impl Into<String>,
        source_setter: impl Into<String>,
    ) -> Result<(), Error> {
        self.ensure_unprepared()?;
        let (value, source) = (value_setter.into(), source_setter.into());
        validate_setter_names(&value, &source)?;
        self.names = CallbackNames::Uniform { value, source };
        Ok(())
    }

    /// Sets per-problem setter names; entry `i` of each list is used for
    /// problem `i`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CallbackNamesLength`] unless both lists have
    /// one entry per problem, or an error if a name is empty or the system
    /// is prepared.
    pub fn assign_callback_names<V, S>(&mut self, value: V, source: S) -> Result<(), Error>
    where
        V: IntoIterator,
        V::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        self.ensure_unprepared()?;
        let value: Vec<String> = value.into_iter().map(Into::into).collect();
        let source: Vec<String> = source.into_iter().map(Into::into).collect();
        if value.len() != self.nproblems || source.len() != self.nproblems {
            return Err(ConfigError::CallbackNamesLength {
                expected: self.nproblems,
                value_names: value.len(),
                source_names: source.len(),
            }
            .into());
        }
        for (v, s) in value.iter().zip(&source) {
            validate_setter_names(v, s)?;
        }
        self.names = CallbackNames::PerProblem { value, source };
        Ok(())
    }

    /// Derives and attaches callbacks for every problem, in order.
    ///
    /// Entry `i` of each list belongs to problem `i`. Solutions are bound to
    /// their spatial-symbol prefixes before any equation is applied.
    ///
    /// A `None` simulator builds that problem's callbacks without attaching
    /// them; they remain available through [`problem`](SystemFamms::problem).
    ///
    /// Processing stops at the first failing problem. Callbacks already
    /// attached to earlier simulators stay attached, but the system is not
    /// marked prepared.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a list has the wrong length or the
    /// dimensions are invalid, [`Error::AlreadyPrepared`] after a successful
    /// call, and [`Error::Problem`] wrapping the first per-problem failure.
    pub fn assign(
        &mut self,
        simulators: &mut [Option<&mut dyn Simulator>],
        mut solutions: Vec<Solution>,
        equations: &[&dyn Equation],
        dimensions: impl Into<Dimensions>,
    ) -> Result<(), Error> {
        self.ensure_unprepared()?;
        for (what, got) in [
            ("simulators", simulators.len()),
            ("solutions", solutions.len()),
            ("equations", equations.len()),
        ] {
            if got != self.nproblems {
                return Err(ConfigError::ProblemCount {
                    what,
                    expected: self.nproblems,
                    got,
                }
                .into());
            }
        }
        let dims = dimensions
            .into()
            .resolve(self.nproblems, self.spatial.len())?;
        let names = self.names.resolve(self.nproblems)?;

        for (index, (solution, &dim)) in solutions.iter_mut().zip(&dims).enumerate() {
            solution
                .set_spatial_symbols(&self.spatial[..dim])
                .map_err(|e| problem(index, e.into()))?;
        }
        let coupled: Vec<Field> = solutions.iter().map(|s| s.field().clone()).collect();

        let mut problems = Vec::with_capacity(self.nproblems);
        let inputs = simulators
            .iter_mut()
            .zip(solutions)
            .zip(equations)
            .zip(dims.iter().zip(names));
        for (index, (((simulator, solution), &equation), (&dim, (value, source)))) in
            inputs.enumerate()
        {
            let binder = CallbackBinder::new(self.kind, value, source)?;
            let mms = ManufacturedSolution::new(self.spatial[..dim].to_vec(), self.time.clone());

            let mut assignment = Assignment::new()
                .equation(equation)
                .solution(solution)
                .coupled_with(&coupled);
            if let Some(simulator) = simulator {
                assignment = assignment.simulator(&mut **simulator);
            }

            let mut famms = Famms::from_parts(mms, binder);
            famms.assign(assignment).map_err(|e| problem(index, e))?;
            log::debug!(
                "prepared problem {index} over {dim} of {} spatial symbols",
                self.spatial.len()
            );
            problems.push(famms);
        }

        self.dimensions = dims;
        self.problems = problems;
        Ok(())
    }

    fn ensure_unprepared(&self) -> Result<(), Error> {
        if self.is_prepared() {
            return Err(Error::AlreadyPrepared);
        }
        Ok(())
    }

    pub fn is_prepared(&self) -> bool {
        !self.problems.is_empty()
    }

    /// The prepared problems, empty before assignment.
    pub fn problems(&self) -> &[Famms] {
        &self.problems
    }

    pub fn problem(&self, index: usize) -> Option<&Famms> {
        self.problems.get(index)
    }

    /// Per-problem dimensions, empty before assignment.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// The shared spatial symbol pool.
    pub fn spatial_symbols(&self) -> &[Symbol] {
        &self.spatial
    }

    pub fn time_symbol(&self) -> Option<&Symbol> {
        self.time.as_ref()
    }

    pub fn nproblems(&self) -> usize {
        self.nproblems
    }

    pub fn max_dimension(&self) -> usize {
        self.spatial.len()
    }

    pub fn functor_kind(&self) -> FunctorKind {
        self.kind
    }

    pub fn callback_names(&self) -> &CallbackNames {
        &self.names
    }
}

fn problem(index: usize, source: Error) -> Error {
    Error::Problem {
        index,
        source: Box::new(source),
    }
}
