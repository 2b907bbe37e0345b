use std::{collections::HashSet, fmt, sync::Arc};

use crate::{
    Artifact, ConfigError, DerivedArtifacts, Error, Functor, FunctorKind, FunctorShape,
    SetterError, Simulator,
    config::validate_setter_names,
    functor::{Evaluators, PointFn, point_fn},
};

/// The value and source functors built for one problem.
#[derive(Debug, Clone)]
pub struct Callbacks {
    /// Analytical solution, with its gradient attached.
    pub value: Arc<dyn Functor>,
    pub source: Arc<dyn Functor>,
}

/// A user-supplied scalar callback attached through `set_<name>`.
#[derive(Clone)]
pub struct ExtraCallback {
    name: String,
    func: Arc<dyn Fn(&[f64], f64) -> f64 + Send + Sync>,
}

impl ExtraCallback {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[f64], f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The simulator setter this callback is attached through.
    pub fn setter_name(&self) -> String {
        format!("set_{}", self.name)
    }

    fn evaluator(&self) -> PointFn {
        let func = Arc::clone(&self.func);
        point_fn(move |point, time| Ok(vec![func(point, time)]))
    }
}

impl fmt::Debug for ExtraCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtraCallback")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Wraps derived artifacts in functors and registers them with a simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackBinder {
    kind: FunctorKind,
    value_setter: String,
    source_setter: String,
}

impl CallbackBinder {
    /// Creates a binder using the given functor family and setter names.
    ///
    /// # Errors
    ///
    /// Returns an error if either setter name is empty.
    pub fn new(
        kind: FunctorKind,
        value_setter: impl Into<String>,
        source_setter: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let value_setter = value_setter.into();
        let source_setter = source_setter.into();
        validate_setter_names(&value_setter, &source_setter)?;
        Ok(Self {
            kind,
            value_setter,
            source_setter,
        })
    }

    pub fn kind(&self) -> FunctorKind {
        self.kind
    }

    pub fn value_setter(&self) -> &str {
        &self.value_setter
    }

    pub fn source_setter(&self) -> &str {
        &self.source_setter
    }

    /// Builds the value and source functors without attaching them.
    ///
    /// Both use the scalar or vector constructor matching the shape of the
    /// solution. Only the value functor carries a gradient.
    pub fn build(&self, artifacts: &Arc<DerivedArtifacts>) -> Callbacks {
        let (scalar, vector) = self.kind.constructors();
        let ctor = match artifacts.shape() {
            FunctorShape::Scalar => scalar,
            FunctorShape::Vector => vector,
        };

        let mut value = ctor();
        value.attach(
            Evaluators::new(evaluator(artifacts, Artifact::Value))
                .with_gradient(evaluator(artifacts, Artifact::Gradient)),
        );
        let mut source = ctor();
        source.attach(Evaluators::new(evaluator(artifacts, Artifact::Source)));

        Callbacks {
            value: Arc::from(value),
            source: Arc::from(source),
        }
    }

    /// Builds the functors and, if a simulator is given, hands them to its
    /// value and source setters.
    ///
    /// Both setters are checked before either is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CallbackAttachment`] if a setter is missing or
    /// rejects its functor.
    pub fn bind(
        &self,
        artifacts: &Arc<DerivedArtifacts>,
        simulator: Option<&mut (dyn Simulator + '_)>,
    ) -> Result<Callbacks, Error> {
        let callbacks = self.build(artifacts);
        let Some(simulator) = simulator else {
            return Ok(callbacks);
        };

        self.check_setters(&[], &*simulator)?;

        let attach = |source| self.attachment_error(source);
        simulator
            .set_callback(&self.value_setter, Arc::clone(&callbacks.value))
            .map_err(attach)?;
        simulator
            .set_callback(&self.source_setter, Arc::clone(&callbacks.source))
            .map_err(attach)?;
        log::debug!(
            "attached {} {} callbacks through `{}` and `{}`",
            self.kind.tag(),
            artifacts.shape(),
            self.value_setter,
            self.source_setter
        );

        Ok(callbacks)
    }

    /// Checks that `simulator` has the value and source setters and one
    /// `set_<name>` setter per extra callback, without calling any of them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CallbackAttachment`] for a missing primary setter, or
    /// [`Error::ExtraCallbackAttachment`] for the first missing extra setter.
    pub fn check_setters(
        &self,
        extras: &[ExtraCallback],
        simulator: &(dyn Simulator + '_),
    ) -> Result<(), Error> {
        for name in [&self.value_setter, &self.source_setter] {
            if !simulator.has_callback_setter(name) {
                return Err(self.attachment_error(SetterError::Missing { name: name.clone() }));
            }
        }
        check_extra_setters(extras, simulator)
    }

    fn attachment_error(&self, source: SetterError) -> Error {
        Error::CallbackAttachment {
            value_setter: self.value_setter.clone(),
            source_setter: self.source_setter.clone(),
            source,
        }
    }

    /// Checks extra callbacks against each other and the primary setters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateCallbackName`] if a name repeats, or
    /// [`ConfigError::ReservedCallbackName`] if its setter would be the value
    /// or source setter.
    pub fn validate_extras(&self, extras: &[ExtraCallback]) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(extras.len());
        for extra in extras {
            if !seen.insert(extra.name()) {
                return Err(ConfigError::DuplicateCallbackName {
                    name: extra.name.clone(),
                });
            }
            let setter = extra.setter_name();
            if setter == self.value_setter || setter == self.source_setter {
                return Err(ConfigError::ReservedCallbackName {
                    name: extra.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Wraps each extra callback in a scalar functor and attaches it through
    /// `set_<name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the extras collide, or
    /// [`Error::ExtraCallbackAttachment`] if a setter is missing or rejects
    /// its functor. Every setter is checked before any is called.
    pub fn bind_extras(
        &self,
        extras: &[ExtraCallback],
        simulator: &mut (dyn Simulator + '_),
    ) -> Result<Vec<Arc<dyn Functor>>, Error> {
        self.validate_extras(extras)?;
        check_extra_setters(extras, &*simulator)?;

        let (scalar, _) = self.kind.constructors();
        extras
            .iter()
            .map(|extra| -> Result<Arc<dyn Functor>, Error> {
                let setter = extra.setter_name();
                let mut functor = scalar();
                functor.attach(Evaluators::new(extra.evaluator()));
                let functor: Arc<dyn Functor> = Arc::from(functor);
                simulator
                    .set_callback(&setter, Arc::clone(&functor))
                    .map_err(|source| Error::ExtraCallbackAttachment { setter, source })?;
                log::debug!("attached extra callback `{}`", extra.name());
                Ok(functor)
            })
            .collect()
    }
}

fn check_extra_setters(
    extras: &[ExtraCallback],
    simulator: &(dyn Simulator + '_),
) -> Result<(), Error> {
    match extras
        .iter()
        .map(ExtraCallback::setter_name)
        .find(|setter| !simulator.has_callback_setter(setter))
    {
        Some(setter) => Err(Error::ExtraCallbackAttachment {
            source: SetterError::Missing {
                name: setter.clone(),
            },
            setter,
        }),
        None => Ok(()),
    }
}

fn evaluator(artifacts: &Arc<DerivedArtifacts>, which: Artifact) -> PointFn {
    let artifacts = Arc::clone(artifacts);
    point_fn(move |point, time| artifacts.evaluate(which, point, time))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use famms_symbolic::{Field, FieldError, Symbol};

    use super::*;
    use crate::{
        CallbackSetters, ManufacturedSolution, SetterTable, Solution,
        functor::{CallableFunctor, ExtensionFunctor, FieldFunctor, FieldsFunctor},
    };

    #[derive(Default)]
    struct Solver {
        calls: Vec<String>,
        value: Option<Arc<dyn Functor>>,
        source: Option<Arc<dyn Functor>>,
    }

    impl CallbackSetters for Solver {
        fn setter_table(&self) -> SetterTable<Self> {
            SetterTable::new()
                .with("set_v_func", |s: &mut Solver, f| {
                    s.calls.push("set_v_func".into());
                    s.value = Some(f);
                    Ok(())
                })
                .with("set_b_func", |s: &mut Solver, f| {
                    s.calls.push("set_b_func".into());
                    s.source = Some(f);
                    Ok(())
                })
                .with("set_flux", |s: &mut Solver, _| {
                    s.calls.push("set_flux".into());
                    Ok(())
                })
        }
    }

    fn identity(v: &[Field]) -> Result<Field, FieldError> {
        Ok(v[0].clone())
    }

    fn artifacts(solution: Solution) -> Arc<DerivedArtifacts> {
        let mut solution = solution;
        let x = Symbol::coordinates(2);
        let mms = ManufacturedSolution::new(x, None);
        Arc::new(mms.derive(&identity, &mut solution, None).unwrap())
    }

    fn scalar_artifacts() -> Arc<DerivedArtifacts> {
        let x = Symbol::coordinates(2);
        artifacts(Solution::scalar(x[0].expr() * x[1].expr()))
    }

    fn vector_artifacts() -> Arc<DerivedArtifacts> {
        let x = Symbol::coordinates(2);
        artifacts(Solution::vector([x[0].expr(), x[1].expr().powi(2)]))
    }

    fn binder(kind: FunctorKind) -> CallbackBinder {
        CallbackBinder::new(kind, "set_v_func", "set_b_func").unwrap()
    }

    #[test]
    fn generic_callable_follows_solution_shape() {
        let b = binder(FunctorKind::GenericCallable);

        let scalar = b.build(&scalar_artifacts());
        let value = scalar.value.as_any().downcast_ref::<CallableFunctor>().unwrap();
        assert_eq!(value.shape(), FunctorShape::Scalar);
        assert_eq!(scalar.source.shape(), FunctorShape::Scalar);

        let vector = b.build(&vector_artifacts());
        let value = vector.value.as_any().downcast_ref::<CallableFunctor>().unwrap();
        assert_eq!(value.shape(), FunctorShape::Vector);
        assert_eq!(
            value.eval_grad_pt(&[2.0, 3.0], 0.0).unwrap(),
            vec![1.0, 0.0, 0.0, 6.0]
        );
    }

    #[test]
    fn native_and_extension_kinds_use_their_own_types() {
        let native = binder(FunctorKind::NativeSimulator);
        let callbacks = native.build(&scalar_artifacts());
        let field = callbacks.value.as_any().downcast_ref::<FieldFunctor>().unwrap();
        assert_relative_eq!(field.value_pt(&[2.0, 3.0], 0.0).unwrap(), 6.0);
        assert_eq!(field.gradient_pt(&[2.0, 3.0], 0.0).unwrap(), vec![3.0, 2.0]);

        let callbacks = native.build(&vector_artifacts());
        let fields = callbacks.value.as_any().downcast_ref::<FieldsFunctor>().unwrap();
        assert_eq!(fields.component_pt(&[2.0, 3.0], 1, 0.0).unwrap(), Some(9.0));

        let extension = binder(FunctorKind::CompiledExtension);
        let callbacks = extension.build(&vector_artifacts());
        let functor = callbacks.source.as_any().downcast_ref::<ExtensionFunctor>().unwrap();
        let mut out = [0.0; 2];
        functor.call_into(&[2.0, 3.0], &mut out, 0.0).unwrap();
        assert_eq!(out, [2.0, 9.0]);
    }

    #[test]
    fn source_functor_has_no_gradient() {
        let callbacks = binder(FunctorKind::GenericCallable).build(&scalar_artifacts());
        assert!(matches!(
            callbacks.source.evaluate_gradient(&[1.0, 1.0], 0.0),
            Err(Error::GradientUnavailable)
        ));
    }

    #[test]
    fn binds_through_configured_setters() {
        let mut solver = Solver::default();
        let callbacks = binder(FunctorKind::GenericCallable)
            .bind(&scalar_artifacts(), Some(&mut solver))
            .unwrap();

        assert_eq!(solver.calls, ["set_v_func", "set_b_func"]);
        assert!(Arc::ptr_eq(solver.value.as_ref().unwrap(), &callbacks.value));
        assert!(Arc::ptr_eq(solver.source.as_ref().unwrap(), &callbacks.source));
    }

    #[test]
    fn missing_setter_attaches_nothing() {
        let mut solver = Solver::default();
        let b = CallbackBinder::new(FunctorKind::GenericCallable, "set_v_func", "set_rhs").unwrap();

        let err = b.bind(&scalar_artifacts(), Some(&mut solver)).unwrap_err();
        assert!(matches!(
            err,
            Error::CallbackAttachment {
                ref value_setter,
                ref source_setter,
                source: SetterError::Missing { ref name },
            } if value_setter == "set_v_func" && source_setter == "set_rhs" && name == "set_rhs"
        ));
        assert!(solver.calls.is_empty());
    }

    #[test]
    fn empty_setter_name_is_a_configuration_error() {
        assert_eq!(
            CallbackBinder::new(FunctorKind::GenericCallable, "", "set_b_func"),
            Err(ConfigError::EmptySetterName { which: "value" })
        );
    }

    #[test]
    fn extras_attach_through_prefixed_setters() {
        let mut solver = Solver::default();
        let flux = ExtraCallback::new("flux", |p, t| p[0] + t);

        let functors = binder(FunctorKind::GenericCallable)
            .bind_extras(&[flux], &mut solver)
            .unwrap();
        assert_eq!(solver.calls, ["set_flux"]);
        assert_eq!(functors[0].evaluate(&[1.0], 2.0).unwrap().as_scalar(), Some(3.0));
    }

    #[test]
    fn extras_may_not_shadow_primary_setters() {
        let b = binder(FunctorKind::GenericCallable);
        let clash = ExtraCallback::new("v_func", |_, _| 0.0);
        assert_eq!(
            b.validate_extras(&[clash]),
            Err(ConfigError::ReservedCallbackName {
                name: "v_func".into()
            })
        );

        let twice = [
            ExtraCallback::new("flux", |_, _| 0.0),
            ExtraCallback::new("flux", |_, _| 1.0),
        ];
        assert_eq!(
            b.validate_extras(&twice),
            Err(ConfigError::DuplicateCallbackName {
                name: "flux".into()
            })
        );
    }

    #[test]
    fn unknown_extra_setter_attaches_nothing() {
        let mut solver = Solver::default();
        let extras = [
            ExtraCallback::new("flux", |_, _| 0.0),
            ExtraCallback::new("pressure", |_, _| 0.0),
        ];
        assert!(matches!(
            binder(FunctorKind::GenericCallable).bind_extras(&extras, &mut solver),
            Err(Error::ExtraCallbackAttachment { setter, .. }) if setter == "set_pressure"
        ));
        assert!(solver.calls.is_empty());
    }
}
