mod diff;
mod ops;
mod simplify;

use std::{collections::BTreeSet, fmt};

use crate::{EvalError, Symbol};

/// A scalar symbolic expression.
///
/// Subtraction and division have no variants of their own: `a - b` is stored as
/// `a + (-1)·b` and `a / b` as `a·b^(-1)`. The arithmetic operators on [`Expr`]
/// build these forms directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Sym(Symbol),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Function, Box<Expr>),
}

/// Elementary functions of a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Exp,
    Ln,
    Sqrt,
}

impl Function {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Exp => x.exp(),
            Self::Ln => x.ln(),
            Self::Sqrt => x.sqrt(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
        }
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::zero()
    }
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Self::Const(value)
    }

    pub fn zero() -> Self {
        Self::Const(0.0)
    }

    pub fn one() -> Self {
        Self::Const(1.0)
    }

    /// Returns the constant value if this expression is a literal constant.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Self::Const(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_const() == Some(0.0)
    }

    pub fn is_one(&self) -> bool {
        self.as_const() == Some(1.0)
    }

    /// Raises this expression to the power `exponent`.
    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        Self::Pow(Box::new(self), Box::new(exponent.into()))
    }

    /// Raises this expression to an integer power.
    pub fn powi(self, exponent: i32) -> Self {
        self.pow(f64::from(exponent))
    }

    pub fn sin(self) -> Self {
        Self::Call(Function::Sin, Box::new(self))
    }

    pub fn cos(self) -> Self {
        Self::Call(Function::Cos, Box::new(self))
    }

    pub fn exp(self) -> Self {
        Self::Call(Function::Exp, Box::new(self))
    }

    pub fn ln(self) -> Self {
        Self::Call(Function::Ln, Box::new(self))
    }

    pub fn sqrt(self) -> Self {
        Self::Call(Function::Sqrt, Box::new(self))
    }

    /// Returns the set of symbols this expression depends on.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Self::Const(_) => {}
            Self::Sym(s) => {
                out.insert(s.clone());
            }
            Self::Add(a, b) | Self::Mul(a, b) | Self::Pow(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
            Self::Call(_, a) => a.collect_symbols(out),
        }
    }

    /// Replaces every occurrence of `symbol` with `value`.
    #[must_use]
    pub fn substitute(&self, symbol: &Symbol, value: &Expr) -> Self {
        match self {
            Self::Sym(s) if s == symbol => value.clone(),
            Self::Const(_) | Self::Sym(_) => self.clone(),
            Self::Add(a, b) => Self::Add(
                Box::new(a.substitute(symbol, value)),
                Box::new(b.substitute(symbol, value)),
            ),
            Self::Mul(a, b) => Self::Mul(
                Box::new(a.substitute(symbol, value)),
                Box::new(b.substitute(symbol, value)),
            ),
            Self::Pow(a, b) => Self::Pow(
                Box::new(a.substitute(symbol, value)),
                Box::new(b.substitute(symbol, value)),
            ),
            Self::Call(func, a) => Self::Call(*func, Box::new(a.substitute(symbol, value))),
        }
    }

    /// Evaluates the expression numerically, looking up symbol values with
    /// `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnboundSymbol`] if `lookup` has no value for a
    /// symbol the expression depends on. Non-finite intermediate values are not
    /// rejected here; callers decide whether the final value is acceptable.
    pub fn eval_with<F>(&self, lookup: &F) -> Result<f64, EvalError>
    where
        F: Fn(&Symbol) -> Option<f64>,
    {
        Ok(match self {
            Self::Const(c) => *c,
            Self::Sym(s) => lookup(s).ok_or_else(|| EvalError::UnboundSymbol {
                name: s.name().to_owned(),
            })?,
            Self::Add(a, b) => a.eval_with(lookup)? + b.eval_with(lookup)?,
            Self::Mul(a, b) => a.eval_with(lookup)? * b.eval_with(lookup)?,
            Self::Pow(a, b) => pow(a.eval_with(lookup)?, b.eval_with(lookup)?),
            Self::Call(func, a) => func.apply(a.eval_with(lookup)?),
        })
    }

    /// Splits a term into its constant coefficient and remaining factor.
    pub(crate) fn split_coefficient(&self) -> (f64, Option<&Expr>) {
        match self {
            Self::Const(c) => (*c, None),
            Self::Mul(a, b) => match (a.as_ref(), b.as_ref()) {
                (Self::Const(c), rest) | (rest, Self::Const(c)) => (*c, Some(rest)),
                _ => (1.0, Some(self)),
            },
            _ => (1.0, Some(self)),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Const(c) if *c < 0.0 => 1,
            Self::Add(..) => 1,
            Self::Mul(..) => 2,
            Self::Pow(..) => 3,
            Self::Const(_) | Self::Sym(_) | Self::Call(..) => 4,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        if self.precedence() < parent {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Raises `base` to `exponent`, using integer powers when exact so negative
/// bases stay real.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "{c}"),
            Self::Sym(s) => write!(f, "{s}"),
            Self::Add(a, b) => {
                a.fmt_child(f, 1)?;
                match b.split_coefficient() {
                    (c, Some(rest)) if c < 0.0 => {
                        f.write_str(" - ")?;
                        if c != -1.0 {
                            write!(f, "{}*", -c)?;
                        }
                        rest.fmt_child(f, 2)
                    }
                    (c, None) if c < 0.0 => write!(f, " - {}", -c),
                    _ => {
                        f.write_str(" + ")?;
                        b.fmt_child(f, 1)
                    }
                }
            }
            Self::Mul(a, b) => {
                if a.as_const() == Some(-1.0) {
                    f.write_str("-")?;
                    return b.fmt_child(f, 3);
                }
                a.fmt_child(f, 2)?;
                f.write_str("*")?;
                b.fmt_child(f, 3)
            }
            Self::Pow(a, b) => {
                a.fmt_child(f, 4)?;
                f.write_str("^")?;
                b.fmt_child(f, 4)
            }
            Self::Call(func, a) => write!(f, "{}({a})", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn lookup_x(value: f64) -> impl Fn(&Symbol) -> Option<f64> {
        move |s: &Symbol| (s.name() == "x").then_some(value)
    }

    #[test]
    fn evaluates_polynomial() {
        let x = Symbol::new("x").expr();
        let e = 3.0 * x.clone().powi(2) - x + 1.0;
        assert_relative_eq!(e.eval_with(&lookup_x(2.0)).unwrap(), 11.0);
    }

    #[test]
    fn negative_base_integer_power_stays_real() {
        let x = Symbol::new("x").expr();
        let e = x.powi(3);
        assert_relative_eq!(e.eval_with(&lookup_x(-2.0)).unwrap(), -8.0);
    }

    #[test]
    fn missing_symbol_is_reported() {
        let e = Symbol::new("y").expr() + 1.0;
        let err = e.eval_with(&lookup_x(1.0)).unwrap_err();
        assert_eq!(
            err,
            EvalError::UnboundSymbol {
                name: "y".to_owned()
            }
        );
    }

    #[test]
    fn free_symbols_are_collected() {
        let x = Symbol::new("x");
        let t = Symbol::new("t");
        let e = (x.expr() * t.expr()).sin() + 2.0;
        let symbols: Vec<_> = e.free_symbols().into_iter().collect();
        assert_eq!(symbols, [t, x]);
    }

    #[test]
    fn substitutes_symbol() {
        let x = Symbol::new("x");
        let e = x.expr().powi(2) + x.expr();
        let replaced = e.substitute(&x, &Expr::constant(3.0));
        assert!(replaced.free_symbols().is_empty());
        assert_relative_eq!(replaced.eval_with(&|_: &Symbol| None).unwrap(), 12.0);
    }

    #[test]
    fn displays_subtraction_and_powers() {
        let x = Symbol::new("x").expr();
        let t = Symbol::new("t").expr();
        assert_eq!((x.clone().powi(2) + t.clone()).to_string(), "x^2 + t");
        assert_eq!((t - x.clone()).to_string(), "t - x");
        assert_eq!((-x).sin().to_string(), "sin(-x)");
    }
}
