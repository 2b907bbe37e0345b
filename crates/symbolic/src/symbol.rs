use std::{fmt, sync::Arc};

use crate::Expr;

/// A named symbolic placeholder.
///
/// Symbols compare by name, so two symbols created independently with the same
/// name are interchangeable. Cloning is cheap; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Creates a symbol with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Creates the ordered coordinate symbols `x_0 … x_{n-1}`.
    ///
    /// # Example
    ///
    /// ```
    /// use famms_symbolic::Symbol;
    ///
    /// let x = Symbol::coordinates(3);
    /// assert_eq!(x[2].name(), "x_2");
    /// ```
    pub fn coordinates(n: usize) -> Vec<Self> {
        (0..n).map(|i| Self::new(format!("x_{i}"))).collect()
    }

    /// Returns the symbol's name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns this symbol as an expression.
    pub fn expr(&self) -> Expr {
        Expr::Sym(self.clone())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
