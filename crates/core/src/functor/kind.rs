use std::{fmt, str::FromStr};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::Error;

use super::{CallableFunctor, ExtensionFunctor, FieldFunctor, FieldsFunctor, Functor};

/// Constructs an unattached functor.
pub type FunctorCtor = fn() -> Box<dyn Functor>;

/// The simulator family a set of callbacks is built for.
///
/// The kind determines the callback's calling convention, never the math.
/// It parses from the short tags simulators are usually configured with:
///
/// | Tag                                | Kind                  |
/// |------------------------------------|-----------------------|
/// | `DP`, `native`                     | [`NativeSimulator`]   |
/// | `Cpp`, `extension`                 | [`CompiledExtension`] |
/// | `Python`, `Fortran`, `callable`    | [`GenericCallable`]   |
///
/// Tags are matched case-insensitively; anything else is
/// [`Error::UnsupportedFunctorKind`].
///
/// [`NativeSimulator`]: FunctorKind::NativeSimulator
/// [`CompiledExtension`]: FunctorKind::CompiledExtension
/// [`GenericCallable`]: FunctorKind::GenericCallable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-derive",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum FunctorKind {
    NativeSimulator,
    CompiledExtension,
    #[default]
    GenericCallable,
}

impl FunctorKind {
    /// Returns the canonical configuration tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::NativeSimulator => "DP",
            Self::CompiledExtension => "Cpp",
            Self::GenericCallable => "Python",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NativeSimulator => "native simulator with field functors",
            Self::CompiledExtension => "compiled extension using functors",
            Self::GenericCallable => "generic callable simulator",
        }
    }

    /// Returns the scalar and vector functor constructors for this kind.
    pub fn constructors(self) -> (FunctorCtor, FunctorCtor) {
        select(self)
    }
}

/// Returns the `(scalar, vector)` functor constructors for `kind`.
///
/// Unrecognized kinds cannot reach this point: they are rejected when the
/// tag is parsed.
pub fn select(kind: FunctorKind) -> (FunctorCtor, FunctorCtor) {
    match kind {
        FunctorKind::NativeSimulator => (native_scalar, native_vector),
        FunctorKind::CompiledExtension => (extension_scalar, extension_vector),
        FunctorKind::GenericCallable => (callable_scalar, callable_vector),
    }
}

fn native_scalar() -> Box<dyn Functor> {
    Box::new(FieldFunctor::new())
}

fn native_vector() -> Box<dyn Functor> {
    Box::new(FieldsFunctor::new())
}

fn extension_scalar() -> Box<dyn Functor> {
    Box::new(ExtensionFunctor::scalar())
}

fn extension_vector() -> Box<dyn Functor> {
    Box::new(ExtensionFunctor::vector())
}

fn callable_scalar() -> Box<dyn Functor> {
    Box::new(CallableFunctor::scalar())
}

fn callable_vector() -> Box<dyn Functor> {
    Box::new(CallableFunctor::vector())
}

impl FromStr for FunctorKind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "dp" | "native" | "nativesimulator" => Ok(Self::NativeSimulator),
            "cpp" | "extension" | "compiledextension" => Ok(Self::CompiledExtension),
            "python" | "fortran" | "callable" | "genericcallable" => Ok(Self::GenericCallable),
            _ => Err(Error::UnsupportedFunctorKind(tag.to_owned())),
        }
    }
}

impl TryFrom<String> for FunctorKind {
    type Error = Error;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<FunctorKind> for String {
    fn from(kind: FunctorKind) -> Self {
        kind.tag().to_owned()
    }
}

impl fmt::Display for FunctorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
