use std::sync::Arc;

use famms_symbolic::{Field, Symbol};

use crate::{
    CallbackBinder, Callbacks, ConfigError, DEFAULT_SOURCE_SETTER, DEFAULT_VALUE_SETTER,
    DerivedArtifacts, Equation, Error, ExtraCallback, FammsConfig, Functor, FunctorKind,
    ManufacturedSolution, Simulator, Solution,
};

/// Inputs to [`Famms::assign`].
///
/// Both an equation and a solution are required. The simulator is optional;
/// without one the callbacks are still built and available through
/// [`Famms::callbacks`]. For a problem in a coupled system, `coupled_with`
/// supplies every solution in the system, in order.
#[derive(Default)]
pub struct Assignment<'a> {
    equation: Option<&'a dyn Equation>,
    solution: Option<Solution>,
    simulator: Option<&'a mut dyn Simulator>,
    coupled: Option<&'a [Field]>,
}

impl<'a> Assignment<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn equation(mut self, equation: &'a dyn Equation) -> Self {
        self.equation = Some(equation);
        self
    }

    #[must_use]
    pub fn solution(mut self, solution: impl Into<Solution>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    #[must_use]
    pub fn simulator(mut self, simulator: &'a mut dyn Simulator) -> Self {
        self.simulator = Some(simulator);
        self
    }

    #[must_use]
    pub fn coupled_with(mut self, solutions: &'a [Field]) -> Self {
        self.coupled = Some(solutions);
        self
    }
}

/// Manufactured solution for a single problem.
///
/// A `Famms` owns the problem's symbol space and callback configuration.
/// [`assign`](Famms::assign) derives the source term for a solution, wraps the
/// results in functors, and attaches them to a simulator. It may be called
/// successfully only once.
#[derive(Debug)]
pub struct Famms {
    mms: ManufacturedSolution,
    binder: CallbackBinder,
    extras: Vec<ExtraCallback>,
    prepared: Option<Prepared>,
}

#[derive(Debug)]
struct Prepared {
    artifacts: Arc<DerivedArtifacts>,
    callbacks: Callbacks,
    extras: Vec<Arc<dyn Functor>>,
}

impl Famms {
    /// Creates the symbol space described by `config`.
    ///
    /// Spatial symbols are `x_0, x_1, ...` unless named explicitly, and the
    /// time symbol is `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &FammsConfig) -> Result<Self, Error> {
        config.validate()?;
        let spatial = match &config.space_symbols {
            Some(names) => names.iter().map(Symbol::new).collect(),
            None => Symbol::coordinates(config.nsd),
        };
        let time = config.time.then(|| Symbol::new("t"));
        let binder = CallbackBinder::new(
            config.functor_kind,
            &*config.value_setter,
            &*config.source_setter,
        )?;
        Ok(Self::from_parts(ManufacturedSolution::new(spatial, time), binder))
    }

    /// Creates a problem over explicit symbols with the default setter names.
    ///
    /// # Errors
    ///
    /// Returns an error if `spatial` is empty.
    pub fn with_symbols(
        spatial: Vec<Symbol>,
        time: Option<Symbol>,
        kind: FunctorKind,
    ) -> Result<Self, Error> {
        if spatial.is_empty() {
            return Err(ConfigError::EmptySpaceSymbols.into());
        }
        let binder = CallbackBinder::new(kind, DEFAULT_VALUE_SETTER, DEFAULT_SOURCE_SETTER)?;
        Ok(Self::from_parts(ManufacturedSolution::new(spatial, time), binder))
    }

    pub(crate) fn from_parts(mms: ManufacturedSolution, binder: CallbackBinder) -> Self {
        Self {
            mms,
            binder,
            extras: Vec::new(),
            prepared: None,
        }
    }

    /// Overrides the names of the simulator's value and source setters.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or callbacks are already prepared.
    pub fn set_callback_names(
        &mut self,
        value_setter: impl Into<String>,
        source_setter: impl Into<String>,
    ) -> Result<(), Error> {
        self.ensure_unprepared()?;
        self.binder = CallbackBinder::new(self.binder.kind(), value_setter, source_setter)?;
        Ok(())
    }

    /// Adds a scalar callback attached through `set_<name>` on assignment.
    ///
    /// Name clashes are reported by [`assign`](Famms::assign) before anything
    /// is attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyPrepared`] after a successful assignment.
    pub fn add_extra_callback(&mut self, extra: ExtraCallback) -> Result<(), Error> {
        self.ensure_unprepared()?;
        self.extras.push(extra);
        Ok(())
    }

    /// Derives the manufactured solution and attaches its callbacks.
    ///
    /// Extra callbacks are attached only when a simulator is given. Every
    /// setter, primary and extra, is looked up before any is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyPrepared`] if called again after succeeding,
    /// [`Error::MissingDerivationInput`] without both an equation and a
    /// solution, and otherwise any derivation or attachment error. Nothing
    /// is recorded on failure.
    pub fn assign(&mut self, assignment: Assignment<'_>) -> Result<&Callbacks, Error> {
        self.ensure_unprepared()?;
        let Assignment {
            equation,
            solution,
            mut simulator,
            coupled,
        } = assignment;

        let equation = equation.ok_or(Error::MissingDerivationInput {
            missing: "equation",
        })?;
        let mut solution = solution.ok_or(Error::MissingDerivationInput {
            missing: "solution",
        })?;
        self.binder.validate_extras(&self.extras)?;
        if let Some(simulator) = simulator.as_deref() {
            self.binder.check_setters(&self.extras, simulator)?;
        }

        let artifacts = Arc::new(self.mms.derive(equation, &mut solution, coupled)?);
        let callbacks = self.binder.bind(&artifacts, simulator.as_deref_mut())?;
        let extras = match simulator {
            Some(simulator) => self.binder.bind_extras(&self.extras, simulator)?,
            None => Vec::new(),
        };

        let prepared = self.prepared.insert(Prepared {
            artifacts,
            callbacks,
            extras,
        });
        Ok(&prepared.callbacks)
    }

    fn ensure_unprepared(&self) -> Result<(), Error> {
        if self.prepared.is_some() {
            return Err(Error::AlreadyPrepared);
        }
        Ok(())
    }

    /// The value and source functors, once assigned.
    pub fn callbacks(&self) -> Option<&Callbacks> {
        self.prepared.as_ref().map(|p| &p.callbacks)
    }

    /// Functors built for extra callbacks, in registration order.
    pub fn extra_callbacks(&self) -> &[Arc<dyn Functor>] {
        self.prepared
            .as_ref()
            .map(|p| p.extras.as_slice())
            .unwrap_or_default()
    }

    pub fn artifacts(&self) -> Option<&DerivedArtifacts> {
        self.prepared.as_ref().map(|p| p.artifacts.as_ref())
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    pub fn spatial_symbols(&self) -> &[Symbol] {
        self.mms.spatial_symbols()
    }

    pub fn time_symbol(&self) -> Option<&Symbol> {
        self.mms.time_symbol()
    }

    /// Number of spatial dimensions.
    pub fn nsd(&self) -> usize {
        self.mms.spatial_symbols().len()
    }

    pub fn functor_kind(&self) -> FunctorKind {
        self.binder.kind()
    }

    pub fn value_setter(&self) -> &str {
        self.binder.value_setter()
    }

    pub fn source_setter(&self) -> &str {
        self.binder.source_setter()
    }
}
