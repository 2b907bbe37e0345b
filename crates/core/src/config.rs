#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{ConfigError, FunctorKind};

/// Default simulator method receiving the analytical-solution functor.
pub const DEFAULT_VALUE_SETTER: &str = "set_v_func";

/// Default simulator method receiving the source-term functor.
pub const DEFAULT_SOURCE_SETTER: &str = "set_b_func";

/// Configuration for a single-problem [`Famms`](crate::Famms).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct FammsConfig {
    /// Number of space dimensions. Ignored when `space_symbols` is given.
    pub nsd: usize,

    /// Whether the problem is time dependent, adding the symbol `t`.
    pub time: bool,

    /// Explicit names for the spatial symbols, overriding `nsd`.
    pub space_symbols: Option<Vec<String>>,

    pub functor_kind: FunctorKind,

    pub value_setter: String,

    pub source_setter: String,
}

impl Default for FammsConfig {
    fn default() -> Self {
        Self {
            nsd: 2,
            time: false,
            space_symbols: None,
            functor_kind: FunctorKind::default(),
            value_setter: DEFAULT_VALUE_SETTER.to_owned(),
            source_setter: DEFAULT_SOURCE_SETTER.to_owned(),
        }
    }
}

impl FammsConfig {
    /// Returns the number of space dimensions this configuration describes.
    pub fn dimension(&self) -> usize {
        self.space_symbols.as_ref().map_or(self.nsd, Vec::len)
    }

    /// Validates dimension and setter names.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no spatial dimensions or a setter name
    /// is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.space_symbols {
            Some(symbols) if symbols.is_empty() => return Err(ConfigError::EmptySpaceSymbols),
            None if self.nsd == 0 => return Err(ConfigError::ZeroDimension),
            _ => {}
        }
        validate_setter_names(&self.value_setter, &self.source_setter)
    }
}

/// Configuration for a coupled [`SystemFamms`](crate::SystemFamms).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct SystemConfig {
    pub nproblems: usize,

    /// Size of the shared spatial-symbol pool.
    pub max_nsd: usize,

    pub time: bool,

    pub functor_kind: FunctorKind,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            nproblems: 1,
            max_nsd: 2,
            time: false,
            functor_kind: FunctorKind::default(),
        }
    }
}

impl SystemConfig {
    /// Validates problem count and dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if `nproblems` or `max_nsd` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nproblems == 0 {
            return Err(ConfigError::NoProblems);
        }
        if self.max_nsd == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        Ok(())
    }
}

pub(crate) fn validate_setter_names(value: &str, source: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptySetterName { which: "value" });
    }
    if source.is_empty() {
        return Err(ConfigError::EmptySetterName { which: "source" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_conventional_setters() {
        let config = FammsConfig::default();
        assert_eq!(config.nsd, 2);
        assert_eq!(config.value_setter, "set_v_func");
        assert_eq!(config.source_setter, "set_b_func");
        assert_eq!(config.functor_kind, FunctorKind::GenericCallable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_symbols_override_nsd() {
        let config = FammsConfig {
            nsd: 0,
            space_symbols: Some(vec!["x".into(), "y".into(), "z".into()]),
            ..FammsConfig::default()
        };
        assert_eq!(config.dimension(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_configs() {
        let zero = FammsConfig {
            nsd: 0,
            ..FammsConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroDimension));

        let empty = FammsConfig {
            space_symbols: Some(Vec::new()),
            ..FammsConfig::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptySpaceSymbols));

        let unnamed = FammsConfig {
            source_setter: String::new(),
            ..FammsConfig::default()
        };
        assert_eq!(
            unnamed.validate(),
            Err(ConfigError::EmptySetterName { which: "source" })
        );

        let system = SystemConfig {
            nproblems: 0,
            ..SystemConfig::default()
        };
        assert_eq!(system.validate(), Err(ConfigError::NoProblems));
    }
}
