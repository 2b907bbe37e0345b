//! Mock simulators and shared fixtures for the integration tests.

pub mod simulators {
    use std::sync::Arc;

    use famms_core::{
        CallbackSetters, Error, Functor, FunctorKind, SetterError, SetterTable, Simulator,
        functor::ExtensionFunctor,
    };

    /// A simulator accepting any callable through the default setters.
    #[derive(Debug, Default)]
    pub struct CallableSolver {
        pub boundary: Option<Arc<dyn Functor>>,
        pub forcing: Option<Arc<dyn Functor>>,
    }

    impl CallableSolver {
        /// Boundary value at `point`, as the solver would query it.
        pub fn boundary_value(&self, point: &[f64], time: f64) -> Option<Result<f64, Error>> {
            let value = self.boundary.as_ref()?.evaluate(point, time);
            Some(value.map(|v| v.as_scalar().unwrap_or(f64::NAN)))
        }

        pub fn forcing_value(&self, point: &[f64], time: f64) -> Option<Result<f64, Error>> {
            let value = self.forcing.as_ref()?.evaluate(point, time);
            Some(value.map(|v| v.as_scalar().unwrap_or(f64::NAN)))
        }
    }

    impl CallbackSetters for CallableSolver {
        fn setter_table(&self) -> SetterTable<Self> {
            SetterTable::new()
                .with("set_v_func", |s: &mut CallableSolver, f| {
                    s.boundary = Some(f);
                    Ok(())
                })
                .with("set_b_func", |s: &mut CallableSolver, f| {
                    s.forcing = Some(f);
                    Ok(())
                })
        }
    }

    /// A compiled-extension simulator that only takes extension functors.
    #[derive(Debug, Default)]
    pub struct ExtensionSolver {
        pub exact: Option<Arc<dyn Functor>>,
        pub rhs: Option<Arc<dyn Functor>>,
    }

    impl ExtensionSolver {
        /// Fills `out` with the right-hand side at `point`.
        pub fn fill_rhs(&self, point: &[f64], out: &mut [f64], time: f64) -> Option<usize> {
            let rhs = self.rhs.as_ref()?.as_any().downcast_ref::<ExtensionFunctor>()?;
            rhs.call_into(point, out, time).ok()
        }
    }

    fn require_extension(f: &Arc<dyn Functor>) -> Result<(), String> {
        match f.kind() {
            FunctorKind::CompiledExtension => Ok(()),
            other => Err(format!("expected an extension functor, got {other}")),
        }
    }

    impl CallbackSetters for ExtensionSolver {
        fn setter_table(&self) -> SetterTable<Self> {
            SetterTable::new()
                .with("setExact", |s: &mut ExtensionSolver, f| {
                    require_extension(&f)?;
                    s.exact = Some(f);
                    Ok(())
                })
                .with("setRhs", |s: &mut ExtensionSolver, f| {
                    require_extension(&f)?;
                    s.rhs = Some(f);
                    Ok(())
                })
        }
    }

    /// A simulator with a configurable set of setters that records each call.
    #[derive(Debug, Default)]
    pub struct Recorder {
        setters: Vec<String>,
        pub calls: Vec<(String, Arc<dyn Functor>)>,
    }

    impl Recorder {
        pub fn with_setters<I, S>(setters: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                setters: setters.into_iter().map(Into::into).collect(),
                calls: Vec::new(),
            }
        }

        pub fn called(&self) -> Vec<&str> {
            self.calls.iter().map(|(name, _)| name.as_str()).collect()
        }

        pub fn functor(&self, name: &str) -> Option<&Arc<dyn Functor>> {
            self.calls.iter().find(|(n, _)| n == name).map(|(_, f)| f)
        }
    }

    impl Simulator for Recorder {
        fn has_callback_setter(&self, name: &str) -> bool {
            self.setters.iter().any(|s| s == name)
        }

        fn set_callback(&mut self, name: &str, functor: Arc<dyn Functor>) -> Result<(), SetterError> {
            if !self.has_callback_setter(name) {
                return Err(SetterError::Missing {
                    name: name.to_owned(),
                });
            }
            self.calls.push((name.to_owned(), functor));
            Ok(())
        }
    }
}

pub mod cases {
    use famms_core::{FammsConfig, SystemConfig};
    use serde::Deserialize;

    /// A verification run described in a configuration file.
    #[derive(Debug, Deserialize)]
    pub struct VerificationCase {
        pub name: String,
        pub famms: FammsConfig,
        #[serde(default)]
        pub samples: Vec<Sample>,
    }

    /// A point and time at which callbacks are checked.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Sample {
        pub point: Vec<f64>,
        #[serde(default)]
        pub time: f64,
    }

    /// A coupled-system run described in a configuration file.
    #[derive(Debug, Deserialize)]
    pub struct SystemCase {
        pub system: SystemConfig,
        pub dimensions: Vec<usize>,
        pub value_setters: Vec<String>,
        pub source_setters: Vec<String>,
    }
}
