//! Univariate polynomial view of an expression.
//!
//! Coefficients are arbitrary expressions free of the variable, so `a*x^2 + b`
//! is a polynomial in `x` with coefficients `a` and `b`.

use std::collections::BTreeMap;

use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::expr::Expr;
use crate::numeric::Rational;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    coeffs: BTreeMap<u32, Expr>,
}

impl Poly {
    /// Reads an already expanded expression as a polynomial in `var`.
    ///
    /// Returns `None` when some term is not of the form `c*var^k` with `c` free of
    /// `var` and `k` a non-negative integer.
    pub fn from_expanded(expr: &Expr, var: &str) -> Option<Self> {
        let mut grouped: BTreeMap<u32, Vec<Expr>> = BTreeMap::new();
        for term in expr.terms() {
            let mut degree = 0u32;
            let mut coeff = Vec::new();
            for factor in term.factors() {
                match monomial_degree(&factor, var) {
                    Some(k) => degree = degree.checked_add(k)?,
                    None if factor.contains_symbol(var) => return None,
                    None => coeff.push(factor),
                }
            }
            grouped.entry(degree).or_default().push(Expr::product(coeff));
        }

        let coeffs = grouped
            .into_iter()
            .map(|(k, parts)| (k, Expr::sum(parts)))
            .filter(|(_, c)| !c.is_zero())
            .collect();
        Some(Self { coeffs })
    }

    /// Builds a polynomial from dense rational coefficients, lowest degree first.
    pub fn from_rationals(coeffs: &[Rational]) -> Self {
        let coeffs = coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .filter_map(|(k, c)| Some((u32::try_from(k).ok()?, Expr::Number(c.clone()))))
            .collect();
        Self { coeffs }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.coeffs.keys().next_back().copied().unwrap_or(0)
    }

    /// Number of nonzero coefficients.
    pub fn term_count(&self) -> usize {
        self.coeffs.len()
    }

    pub fn lowest_degree(&self) -> u32 {
        self.coeffs.keys().next().copied().unwrap_or(0)
    }

    pub fn coeff(&self, k: u32) -> Expr {
        self.coeffs.get(&k).cloned().unwrap_or_else(Expr::zero)
    }

    /// Divides by `var^k`; every exponent must be at least `k`.
    #[must_use]
    pub fn shift_down(&self, k: u32) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .map(|(degree, c)| (degree.saturating_sub(k), c.clone()))
            .collect();
        Self { coeffs }
    }

    /// Dense rational coefficients, lowest degree first, when every coefficient is
    /// a plain number.
    pub fn rational_coeffs(&self) -> Option<Vec<Rational>> {
        let len = usize::try_from(self.degree()).ok()? + 1;
        let mut dense = vec![Rational::zero(); len];
        for (k, c) in &self.coeffs {
            dense[usize::try_from(*k).ok()?] = c.as_number()?.clone();
        }
        Some(dense)
    }

    /// Greatest common divisor of all exponents; `x^4 - 5x^2 + 6` gives 2.
    pub fn exponent_gcd(&self) -> u32 {
        self.coeffs.keys().fold(0, |acc, k| acc.gcd(k))
    }

    /// Substitutes `var^k` by a new variable; `k` must divide every exponent.
    #[must_use]
    pub fn compress(&self, k: u32) -> Self {
        if k <= 1 {
            return self.clone();
        }
        let coeffs = self
            .coeffs
            .iter()
            .map(|(degree, c)| (Integer::div_floor(degree, &k), c.clone()))
            .collect();
        Self { coeffs }
    }
}

fn monomial_degree(factor: &Expr, var: &str) -> Option<u32> {
    match factor {
        Expr::Symbol(name) if name == var => Some(1),
        Expr::Pow(base, exp) if matches!(&**base, Expr::Symbol(name) if name == var) => {
            let e = exp.as_number()?;
            if e.is_integer() {
                e.to_integer().to_u32()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Writes `expr` as `numerator / denominator`, both polynomial-friendly, when
/// `expr` is a rational function of `var`.
pub fn as_fraction(expr: &Expr, var: &str) -> Option<(Expr, Expr)> {
    if !expr.contains_symbol(var) {
        return Some((expr.clone(), Expr::one()));
    }
    match expr {
        Expr::Symbol(_) => Some((expr.clone(), Expr::one())),
        Expr::Add(terms) => {
            let mut numer = Expr::zero();
            let mut denom = Expr::one();
            for term in terms {
                let (n, d) = as_fraction(term, var)?;
                if d == denom {
                    numer = numer + n;
                } else {
                    numer = numer * d.clone() + n * denom.clone();
                    denom = denom * d;
                }
            }
            Some((numer, denom))
        }
        Expr::Mul(factors) => {
            let mut numer = Expr::one();
            let mut denom = Expr::one();
            for factor in factors {
                let (n, d) = as_fraction(factor, var)?;
                numer = numer * n;
                denom = denom * d;
            }
            Some((numer, denom))
        }
        Expr::Pow(base, exp) => {
            let e = exp.as_number()?;
            if !e.is_integer() {
                return None;
            }
            let (n, d) = as_fraction(base, var)?;
            if e.is_negative() {
                let positive = Expr::Number(-e.clone());
                Some((d.pow(positive.clone()), n.pow(positive)))
            } else {
                Some((n.pow(exp.as_ref().clone()), d.pow(exp.as_ref().clone())))
            }
        }
        Expr::Number(_) | Expr::Constant(_) | Expr::Function(..) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn poly(source: &str) -> Poly {
        Poly::from_expanded(&parse(source).unwrap().expand(), "x").unwrap()
    }

    #[test]
    fn test_reads_coefficients() {
        let p = poly("3x^2 - 2x + 7");
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coeff(2), Expr::integer(3));
        assert_eq!(p.coeff(1), Expr::integer(-2));
        assert_eq!(p.coeff(0), Expr::integer(7));
    }

    #[test]
    fn test_symbolic_coefficients() {
        let p = poly("a*x^2 + b*x + a*b");
        assert_eq!(p.coeff(2), Expr::symbol("a"));
        assert!(p.rational_coeffs().is_none());
    }

    #[test]
    fn test_rejects_non_polynomials() {
        let expr = parse("sin(x) + 1").unwrap();
        assert!(Poly::from_expanded(&expr, "x").is_none());
        let expr = parse("sqrt(x) + 1").unwrap();
        assert!(Poly::from_expanded(&expr, "x").is_none());
    }

    #[test]
    fn test_even_polynomials_compress() {
        let p = poly("x^4 - 5x^2 + 6");
        assert_eq!(p.exponent_gcd(), 2);
        assert_eq!(p.compress(2).degree(), 2);
    }

    #[test]
    fn test_fractions_over_common_denominator() {
        let expr = parse("1/x + 1/(x - 1)").unwrap();
        let (numer, denom) = as_fraction(&expr, "x").unwrap();
        assert_eq!(poly_of(&numer).degree(), 1);
        assert_eq!(poly_of(&denom).degree(), 2);
    }

    fn poly_of(expr: &Expr) -> Poly {
        Poly::from_expanded(&expr.expand(), "x").unwrap()
    }
}
