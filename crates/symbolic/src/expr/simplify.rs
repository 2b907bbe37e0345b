use crate::Expr;

use super::pow;

impl Expr {
    /// Returns an algebraically simplified copy of this expression.
    ///
    /// Simplification folds constants, flattens nested sums and products,
    /// collects like terms and repeated factors, orders the factors of each
    /// product, distributes constant
    /// coefficients over sums, and removes identities (`x + 0`, `x·1`, `x^1`,
    /// `x^0`, `0·x`). Results are canonical enough for cancellations such as
    /// `2x - 2x` to vanish, but no factoring or trigonometric identities are
    /// attempted.
    #[must_use]
    pub fn simplify(&self) -> Expr {
        match self {
            Self::Const(_) | Self::Sym(_) => self.clone(),
            Self::Add(..) => simplify_sum(self),
            Self::Mul(..) => simplify_product(self),
            Self::Pow(base, exponent) => simplify_power(base.simplify(), exponent.simplify()),
            Self::Call(func, arg) => {
                let arg = arg.simplify();
                match arg.as_const().map(|c| func.apply(c)) {
                    Some(value) if value.is_finite() => Expr::Const(value),
                    _ => Expr::Call(*func, Box::new(arg)),
                }
            }
        }
    }
}

fn collect_terms(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Add(a, b) => {
            collect_terms(a, out);
            collect_terms(b, out);
        }
        other => out.push(other.clone()),
    }
}

fn collect_factors(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(a, b) => {
            collect_factors(a, out);
            collect_factors(b, out);
        }
        other => out.push(other.clone()),
    }
}

fn simplify_sum(expr: &Expr) -> Expr {
    let mut raw = Vec::new();
    collect_terms(expr, &mut raw);

    let mut terms = Vec::new();
    for term in raw {
        collect_terms(&term.simplify(), &mut terms);
    }

    let mut constant = 0.0;
    let mut like: Vec<(f64, Expr)> = Vec::new();
    for term in &terms {
        match term.split_coefficient() {
            (c, None) => constant += c,
            (c, Some(rest)) => match like.iter_mut().find(|(_, r)| r == rest) {
                Some((coef, _)) => *coef += c,
                None => like.push((c, rest.clone())),
            },
        }
    }

    let mut parts: Vec<Expr> = like
        .into_iter()
        .filter(|(coef, _)| *coef != 0.0)
        .map(|(coef, rest)| scale(coef, rest))
        .collect();
    if constant != 0.0 || parts.is_empty() {
        parts.push(Expr::Const(constant));
    }

    fold(parts, |a, b| Expr::Add(Box::new(a), Box::new(b)))
}

fn simplify_product(expr: &Expr) -> Expr {
    let mut raw = Vec::new();
    collect_factors(expr, &mut raw);

    let mut factors = Vec::new();
    for factor in raw {
        collect_factors(&factor.simplify(), &mut factors);
    }

    let mut constant = 1.0;
    let mut powers: Vec<(Expr, Expr)> = Vec::new();
    for factor in factors {
        let (base, exponent) = match factor {
            Expr::Const(c) => {
                constant *= c;
                continue;
            }
            Expr::Pow(base, exponent) => (*base, *exponent),
            other => (other, Expr::one()),
        };
        match powers.iter_mut().find(|(b, _)| *b == base) {
            Some((_, e)) => *e = (e.clone() + exponent).simplify(),
            None => powers.push((base, exponent)),
        }
    }

    if constant == 0.0 {
        return Expr::zero();
    }

    let mut rest: Vec<Expr> = powers
        .into_iter()
        .map(|(base, exponent)| simplify_power(base, exponent))
        .filter(|f| !f.is_one())
        .collect();
    // Factor order must not depend on how the product was written.
    rest.sort_by_cached_key(ToString::to_string);

    match rest.as_slice() {
        [] => Expr::Const(constant),
        [Expr::Add(..)] if constant != 1.0 => {
            let mut terms = Vec::new();
            collect_terms(&rest[0], &mut terms);
            let distributed = terms.into_iter().map(|t| Expr::Const(constant) * t);
            simplify_sum(&fold(distributed.collect(), |a, b| a + b))
        }
        _ => scale(constant, fold(rest, |a, b| Expr::Mul(Box::new(a), Box::new(b)))),
    }
}

fn simplify_power(base: Expr, exponent: Expr) -> Expr {
    if exponent.is_zero() || base.is_one() {
        return Expr::one();
    }
    if exponent.is_one() {
        return base;
    }
    match (&base, exponent.as_const()) {
        (Expr::Const(b), Some(e)) => {
            let value = pow(*b, e);
            if value.is_finite() {
                return Expr::Const(value);
            }
        }
        (Expr::Pow(inner, e1), Some(e2)) if e2.fract() == 0.0 => {
            let combined = (e1.as_ref().clone() * e2).simplify();
            return simplify_power(inner.as_ref().clone(), combined);
        }
        _ => {}
    }
    Expr::Pow(Box::new(base), Box::new(exponent))
}

fn scale(coef: f64, expr: Expr) -> Expr {
    if coef == 1.0 {
        expr
    } else {
        Expr::Mul(Box::new(Expr::Const(coef)), Box::new(expr))
    }
}

/// Left-folds a non-empty list of expressions with `combine`.
fn fold(parts: Vec<Expr>, combine: impl Fn(Expr, Expr) -> Expr) -> Expr {
    let mut iter = parts.into_iter();
    let first = iter.next().unwrap_or_default();
    iter.fold(first, combine)
}
