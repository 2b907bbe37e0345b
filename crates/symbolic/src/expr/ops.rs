use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::{Expr, Symbol};

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Const(value)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Self::Sym(symbol)
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Self::Sym(symbol.clone())
    }
}

impl<T: Into<Expr>> Add<T> for Expr {
    type Output = Expr;

    fn add(self, rhs: T) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs.into()))
    }
}

impl<T: Into<Expr>> Sub<T> for Expr {
    type Output = Expr;

    fn sub(self, rhs: T) -> Expr {
        self + (-rhs.into())
    }
}

impl<T: Into<Expr>> Mul<T> for Expr {
    type Output = Expr;

    fn mul(self, rhs: T) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs.into()))
    }
}

impl<T: Into<Expr>> Div<T> for Expr {
    type Output = Expr;

    fn div(self, rhs: T) -> Expr {
        self * rhs.into().powi(-1)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

/// Implements `f64 <op> Expr` so constants can lead an expression.
macro_rules! impl_scalar_lhs {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl $trait<Expr> for f64 {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    Expr::Const(self).$method(rhs)
                }
            }
        )*
    };
}

impl_scalar_lhs!(Add::add, Sub::sub, Mul::mul, Div::div);

/// Implements `&Expr <op> &Expr` by cloning both operands.
macro_rules! impl_ref_ops {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl $trait<&Expr> for &Expr {
                type Output = Expr;

                fn $method(self, rhs: &Expr) -> Expr {
                    self.clone().$method(rhs.clone())
                }
            }
        )*
    };
}

impl_ref_ops!(Add::add, Sub::sub, Mul::mul, Div::div);

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtraction_is_addition_of_negation() {
        let x = Symbol::new("x");
        let e = Expr::one() - &x;
        assert_eq!(
            e,
            Expr::Add(
                Box::new(Expr::Const(1.0)),
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Sym(x))
                )),
            )
        );
    }

    #[test]
    fn division_is_multiplication_by_inverse() {
        let x = Symbol::new("x").expr();
        let e = 1.0 / x.clone();
        assert_eq!(
            e,
            Expr::Mul(
                Box::new(Expr::Const(1.0)),
                Box::new(Expr::Pow(Box::new(x), Box::new(Expr::Const(-1.0)))),
            )
        );
    }
}
