use std::{collections::BTreeMap, fmt, sync::Arc};

use thiserror::Error;

use crate::Functor;

/// A simulator that accepts callback functors through named setters.
///
/// Simulator families name their setters differently, so setters are looked
/// up by name when callbacks are attached. Most simulators implement
/// [`CallbackSetters`] instead and get this trait for free.
pub trait Simulator {
    /// Whether a setter with this name exists.
    fn has_callback_setter(&self, name: &str) -> bool;

    /// Hands `functor` to the setter called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SetterError::Missing`] if no such setter exists, or
    /// [`SetterError::Rejected`] if the setter refuses the functor.
    fn set_callback(&mut self, name: &str, functor: Arc<dyn Functor>) -> Result<(), SetterError>;
}

/// Why a simulator did not take a callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetterError {
    #[error("simulator has no setter named `{name}`")]
    Missing { name: String },

    #[error("setter `{name}` rejected the functor: {reason}")]
    Rejected { name: String, reason: String },
}

/// A setter method on simulator `S`.
///
/// Returning `Err(reason)` rejects the functor.
pub type Setter<S> = fn(&mut S, Arc<dyn Functor>) -> Result<(), String>;

/// Name-to-method table for a simulator's callback setters.
pub struct SetterTable<S> {
    setters: BTreeMap<String, Setter<S>>,
}

impl<S> SetterTable<S> {
    pub fn new() -> Self {
        Self {
            setters: BTreeMap::new(),
        }
    }

    /// Registers `setter` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, setter: Setter<S>) -> Self {
        self.setters.insert(name.into(), setter);
        self
    }

    pub fn get(&self, name: &str) -> Option<Setter<S>> {
        self.setters.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.setters.keys().map(String::as_str)
    }
}

impl<S> Default for SetterTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for SetterTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Declares a simulator's callback setters as a [`SetterTable`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use famms_core::{CallbackSetters, Functor, SetterTable, Simulator};
///
/// #[derive(Default)]
/// struct Solver {
///     boundary: Option<Arc<dyn Functor>>,
/// }
///
/// impl CallbackSetters for Solver {
///     fn setter_table(&self) -> SetterTable<Self> {
///         SetterTable::new().with("set_v_func", |s: &mut Solver, f| {
///             s.boundary = Some(f);
///             Ok(())
///         })
///     }
/// }
///
/// let solver = Solver::default();
/// assert!(solver.has_callback_setter("set_v_func"));
/// assert!(!solver.has_callback_setter("set_b_func"));
/// ```
pub trait CallbackSetters: Sized {
    fn setter_table(&self) -> SetterTable<Self>;
}

impl<S: CallbackSetters> Simulator for S {
    fn has_callback_setter(&self, name: &str) -> bool {
        self.setter_table().contains(name)
    }

    fn set_callback(&mut self, name: &str, functor: Arc<dyn Functor>) -> Result<(), SetterError> {
        let setter = self
            .setter_table()
            .get(name)
            .ok_or_else(|| SetterError::Missing {
                name: name.to_owned(),
            })?;
        log::trace!("calling setter `{name}` with {:?} functor", functor.shape());
        setter(self, functor).map_err(|reason| SetterError::Rejected {
            name: name.to_owned(),
            reason,
        })
    }
}
