//! Fully automated method of manufactured solutions.
//!
//! Given a governing equation operator and a chosen analytical solution, this
//! crate derives the source term that makes the solution exact, computes the
//! solution's spatial gradient, and hands all three to a simulator as
//! point-evaluation callbacks.
//!
//! - [`Famms`]: a single problem: derive, wrap, and attach callbacks
//! - [`SystemFamms`]: a coupled system of problems sharing one symbol space
//! - [`ManufacturedSolution`]: the derivation engine producing [`DerivedArtifacts`]
//! - [`CallbackBinder`]: wraps derived artifacts in [`Functor`]s and registers
//!   them through a [`Simulator`]'s named setters
//! - [`FunctorKind`]: selects the functor family matching a simulator's
//!   calling convention
//!
//! # Example
//!
//! ```
//! use famms_core::{Assignment, Famms, FammsConfig, Field, FieldError, Solution, Symbol};
//!
//! let config = FammsConfig {
//!     nsd: 1,
//!     time: true,
//!     ..FammsConfig::default()
//! };
//! let mut famms = Famms::new(&config).unwrap();
//!
//! let x = Symbol::new("x_0");
//! let t = Symbol::new("t");
//!
//! // Heat equation: F(v) = dv/dt - d²v/dx².
//! let heat = |v: &[Field]| -> Result<Field, FieldError> {
//!     let v = v[0].as_scalar()?;
//!     Ok(Field::scalar(v.diff(&t) - v.diff_n(&x, 2)))
//! };
//! let solution = Solution::scalar(x.expr().powi(2) + t.expr());
//!
//! famms
//!     .assign(Assignment::new().equation(&heat).solution(solution))
//!     .unwrap();
//!
//! let callbacks = famms.callbacks().unwrap();
//! let value = callbacks.value.evaluate(&[2.0], 0.5).unwrap();
//! assert_eq!(value.as_scalar(), Some(4.5));
//! ```

mod binder;
mod config;
mod engine;
mod equation;
mod error;
mod famms;
mod simulator;
mod solution;
mod system;

pub mod functor;

pub use binder::{CallbackBinder, Callbacks, ExtraCallback};
pub use config::{DEFAULT_SOURCE_SETTER, DEFAULT_VALUE_SETTER, FammsConfig, SystemConfig};
pub use engine::{Artifact, DerivedArtifacts, ManufacturedSolution};
pub use equation::Equation;
pub use error::{ConfigError, Error};
pub use famms::{Assignment, Famms};
pub use functor::{Functor, FunctorKind, FunctorShape, Value};
pub use simulator::{CallbackSetters, Setter, SetterError, SetterTable, Simulator};
pub use solution::Solution;
pub use system::{CallbackNames, Dimensions, SystemFamms};

pub use famms_symbolic::{Expr, Field, FieldError, Shape, Symbol};
