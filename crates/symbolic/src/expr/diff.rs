use crate::{Expr, Function, Symbol};

impl Expr {
    /// Returns the simplified partial derivative with respect to `symbol`.
    ///
    /// # Example
    ///
    /// ```
    /// use famms_symbolic::{Expr, Symbol};
    ///
    /// let x = Symbol::new("x");
    /// let d = (x.expr().powi(2) + 1.0).diff(&x);
    /// assert_eq!(d, 2.0 * x.expr());
    /// ```
    #[must_use]
    pub fn diff(&self, symbol: &Symbol) -> Expr {
        self.derivative(symbol).simplify()
    }

    /// Returns the `order`-th partial derivative with respect to `symbol`.
    #[must_use]
    pub fn diff_n(&self, symbol: &Symbol, order: usize) -> Expr {
        (0..order).fold(self.clone(), |acc, _| acc.diff(symbol))
    }

    fn derivative(&self, symbol: &Symbol) -> Expr {
        match self {
            Self::Const(_) => Expr::zero(),
            Self::Sym(s) => Expr::Const(if s == symbol { 1.0 } else { 0.0 }),
            Self::Add(a, b) => a.derivative(symbol) + b.derivative(symbol),
            Self::Mul(a, b) => {
                a.derivative(symbol) * b.as_ref().clone() + a.as_ref().clone() * b.derivative(symbol)
            }
            Self::Pow(base, exponent) => {
                if exponent.free_symbols().contains(symbol) {
                    // d(u^v) = u^v * (v' ln u + v u'/u)
                    let u = base.as_ref().clone();
                    let v = exponent.as_ref().clone();
                    self.clone()
                        * (exponent.derivative(symbol) * u.clone().ln()
                            + v * base.derivative(symbol) / u)
                } else {
                    let n = exponent.as_ref().clone();
                    n.clone() * base.as_ref().clone().pow(n - 1.0) * base.derivative(symbol)
                }
            }
            Self::Call(func, arg) => {
                let u = arg.as_ref().clone();
                let du = arg.derivative(symbol);
                let outer = match func {
                    Function::Sin => u.cos(),
                    Function::Cos => -u.sin(),
                    Function::Exp => u.exp(),
                    Function::Ln => u.powi(-1),
                    Function::Sqrt => 0.5 * u.sqrt().powi(-1),
                };
                outer * du
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn at(e: &Expr, x: &Symbol, value: f64) -> f64 {
        e.eval_with(&|s: &Symbol| (s == x).then_some(value)).unwrap()
    }

    #[test]
    fn constant_and_other_symbols_vanish() {
        let x = Symbol::new("x");
        let t = Symbol::new("t");
        assert!(Expr::constant(5.0).diff(&x).is_zero());
        assert!(t.expr().diff(&x).is_zero());
        assert!(x.expr().diff(&x).is_one());
    }

    #[test]
    fn second_derivative_of_square_is_two() {
        let x = Symbol::new("x");
        let d2 = (x.expr().powi(2) + Symbol::new("t").expr()).diff_n(&x, 2);
        assert_eq!(d2, Expr::constant(2.0));
    }

    #[test]
    fn product_and_chain_rules() {
        let x = Symbol::new("x");
        // d/dx [x sin(x^2)] = sin(x^2) + 2x^2 cos(x^2)
        let e = x.expr() * x.expr().powi(2).sin();
        let d = e.diff(&x);
        let v = 1.3_f64;
        let expected = (v * v).sin() + 2.0 * v * v * (v * v).cos();
        assert_relative_eq!(at(&d, &x, v), expected, epsilon = 1e-12);
    }

    #[test]
    fn elementary_functions() {
        let x = Symbol::new("x");
        let v = 0.7_f64;
        assert_relative_eq!(at(&x.expr().exp().diff(&x), &x, v), v.exp());
        assert_relative_eq!(at(&x.expr().ln().diff(&x), &x, v), 1.0 / v);
        assert_relative_eq!(at(&x.expr().cos().diff(&x), &x, v), -v.sin());
        assert_relative_eq!(
            at(&x.expr().sqrt().diff(&x), &x, v),
            0.5 / v.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn symbolic_exponent() {
        let x = Symbol::new("x");
        // d/dx 2^x = 2^x ln 2
        let e = Expr::constant(2.0).pow(x.expr());
        let v = 1.5_f64;
        assert_relative_eq!(
            at(&e.diff(&x), &x, v),
            2.0_f64.powf(v) * 2.0_f64.ln(),
            epsilon = 1e-12
        );
    }
}
