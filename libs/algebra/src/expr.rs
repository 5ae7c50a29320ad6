//! Expression tree definitions and structural queries.
//!
//! Values are only ever built through the smart constructors in
//! [`canonical`](crate::canonical), so two mathematically identical inputs that the
//! simplifier can see through compare equal with `==`.

use std::collections::BTreeSet;

use num_traits::{One, Signed, Zero};

use crate::numeric::{self, Rational};

/// Named constants that are never free variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constant {
    Pi,
    E,
    I,
    /// Unsigned infinity, the value of `c/0` for `c != 0`.
    ComplexInfinity,
    /// Undefined result such as `0/0` or `zoo - zoo`.
    NaN,
}

impl Constant {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::I => "I",
            Constant::ComplexInfinity => "zoo",
            Constant::NaN => "nan",
        }
    }
}

/// Elementary functions of one argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Abs,
}

impl Func {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Abs => "Abs",
        }
    }

    pub(crate) fn eval_f64(self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Asin => x.asin(),
            Func::Acos => x.acos(),
            Func::Atan => x.atan(),
            Func::Sinh => x.sinh(),
            Func::Cosh => x.cosh(),
            Func::Tanh => x.tanh(),
            Func::Exp => x.exp(),
            Func::Log => x.ln(),
            Func::Abs => x.abs(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    Number(Rational),
    Symbol(String),
    Constant(Constant),
    /// Flattened sum; at most one numeric term, which comes first.
    Add(Vec<Expr>),
    /// Flattened product; at most one numeric coefficient, which comes first.
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Function(Func, Box<Expr>),
}

impl Expr {
    #[must_use]
    pub fn zero() -> Self {
        Expr::Number(Rational::zero())
    }

    #[must_use]
    pub fn one() -> Self {
        Expr::Number(Rational::one())
    }

    #[must_use]
    pub fn integer(value: i64) -> Self {
        Expr::Number(numeric::integer(value))
    }

    #[must_use]
    pub fn rational(numer: i64, denom: i64) -> Self {
        Expr::Number(numeric::rational(numer, denom))
    }

    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    #[must_use]
    pub fn pi() -> Self {
        Expr::Constant(Constant::Pi)
    }

    #[must_use]
    pub fn imaginary_unit() -> Self {
        Expr::Constant(Constant::I)
    }

    #[must_use]
    pub fn complex_infinity() -> Self {
        Expr::Constant(Constant::ComplexInfinity)
    }

    #[must_use]
    pub fn nan() -> Self {
        Expr::Constant(Constant::NaN)
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(n) if n.is_zero())
    }

    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(n) if n.is_one())
    }

    /// Names of every symbol in the tree, in lexicographic order.
    #[must_use]
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_symbols(&mut names);
        names
    }

    fn collect_symbols(&self, names: &mut BTreeSet<String>) {
        match self {
            Expr::Symbol(name) => {
                names.insert(name.clone());
            }
            Expr::Add(items) | Expr::Mul(items) => {
                for item in items {
                    item.collect_symbols(names);
                }
            }
            Expr::Pow(base, exp) => {
                base.collect_symbols(names);
                exp.collect_symbols(names);
            }
            Expr::Function(_, arg) => arg.collect_symbols(names),
            Expr::Number(_) | Expr::Constant(_) => {}
        }
    }

    #[must_use]
    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Expr::Symbol(s) => s == name,
            Expr::Add(items) | Expr::Mul(items) => items.iter().any(|i| i.contains_symbol(name)),
            Expr::Pow(base, exp) => base.contains_symbol(name) || exp.contains_symbol(name),
            Expr::Function(_, arg) => arg.contains_symbol(name),
            Expr::Number(_) | Expr::Constant(_) => false,
        }
    }

    /// True when the tree has no symbols at all.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(_) => true,
            Expr::Symbol(_) => false,
            Expr::Add(items) | Expr::Mul(items) => items.iter().all(Expr::is_numeric),
            Expr::Pow(base, exp) => base.is_numeric() && exp.is_numeric(),
            Expr::Function(_, arg) => arg.is_numeric(),
        }
    }

    /// True when no `zoo` or `nan` occurs anywhere in the tree.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Expr::Constant(c) => !matches!(c, Constant::ComplexInfinity | Constant::NaN),
            Expr::Add(items) | Expr::Mul(items) => items.iter().all(Expr::is_finite),
            Expr::Pow(base, exp) => base.is_finite() && exp.is_finite(),
            Expr::Function(_, arg) => arg.is_finite(),
            Expr::Number(_) | Expr::Symbol(_) => true,
        }
    }

    #[must_use]
    pub fn contains_imaginary(&self) -> bool {
        match self {
            Expr::Constant(Constant::I) => true,
            Expr::Add(items) | Expr::Mul(items) => items.iter().any(Expr::contains_imaginary),
            Expr::Pow(base, exp) => base.contains_imaginary() || exp.contains_imaginary(),
            Expr::Function(_, arg) => arg.contains_imaginary(),
            Expr::Number(_) | Expr::Symbol(_) | Expr::Constant(_) => false,
        }
    }

    /// Positive real value known without any assumption on symbols.
    #[must_use]
    pub fn is_positive_real(&self) -> bool {
        match self {
            Expr::Number(n) => n.is_positive(),
            Expr::Constant(c) => matches!(c, Constant::Pi | Constant::E),
            Expr::Mul(factors) => factors.iter().all(Expr::is_positive_real),
            Expr::Pow(base, exp) => base.is_positive_real() && exp.as_number().is_some(),
            Expr::Function(Func::Exp, arg) => arg.is_numeric() && !arg.contains_imaginary(),
            Expr::Add(_) | Expr::Symbol(_) | Expr::Function(..) => false,
        }
    }

    /// Approximate real value of a numeric tree; `None` for symbols, complex values
    /// and non-finite results.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Expr::Number(n) => numeric::to_f64(n)?,
            Expr::Constant(Constant::Pi) => std::f64::consts::PI,
            Expr::Constant(Constant::E) => std::f64::consts::E,
            Expr::Constant(Constant::I | Constant::ComplexInfinity | Constant::NaN)
            | Expr::Symbol(_) => return None,
            Expr::Add(items) => items
                .iter()
                .map(Expr::to_f64)
                .sum::<Option<f64>>()?,
            Expr::Mul(items) => items
                .iter()
                .map(Expr::to_f64)
                .product::<Option<f64>>()?,
            Expr::Pow(base, exp) => base.to_f64()?.powf(exp.to_f64()?),
            Expr::Function(func, arg) => func.eval_f64(arg.to_f64()?),
        };
        value.is_finite().then_some(value)
    }

    /// Splits off the numeric coefficient: `3*x*y` gives `(3, x*y)`.
    #[must_use]
    pub fn as_coeff_term(&self) -> (Rational, Expr) {
        match self {
            Expr::Number(n) => (n.clone(), Expr::one()),
            Expr::Mul(factors) => match factors.split_first() {
                Some((Expr::Number(c), rest)) => (c.clone(), Expr::from_sorted_factors(rest.to_vec())),
                _ => (Rational::one(), self.clone()),
            },
            other => (Rational::one(), other.clone()),
        }
    }

    #[must_use]
    pub fn as_base_exp(&self) -> (Expr, Expr) {
        match self {
            Expr::Pow(base, exp) => ((**base).clone(), (**exp).clone()),
            other => (other.clone(), Expr::one()),
        }
    }

    /// Terms of a sum, or the expression itself.
    #[must_use]
    pub fn terms(&self) -> Vec<Expr> {
        match self {
            Expr::Add(terms) => terms.clone(),
            other => vec![other.clone()],
        }
    }

    /// Factors of a product, or the expression itself.
    #[must_use]
    pub fn factors(&self) -> Vec<Expr> {
        match self {
            Expr::Mul(factors) => factors.clone(),
            other => vec![other.clone()],
        }
    }

    /// Multiple of `pi` this expression denotes, when it is one.
    pub(crate) fn as_pi_multiple(&self) -> Option<Rational> {
        match self {
            Expr::Number(n) if n.is_zero() => Some(Rational::zero()),
            Expr::Constant(Constant::Pi) => Some(Rational::one()),
            Expr::Mul(factors) => match factors.as_slice() {
                [Expr::Number(c), Expr::Constant(Constant::Pi)] => Some(c.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    pub(crate) fn from_sorted_factors(mut factors: Vec<Expr>) -> Expr {
        match factors.len() {
            0 => Expr::one(),
            1 => factors.pop().unwrap_or_else(Expr::one),
            _ => Expr::Mul(factors),
        }
    }

    /// Replaces every occurrence of `name` with `value`, re-simplifying on the way up.
    #[must_use]
    pub fn substitute(&self, name: &str, value: &Expr) -> Expr {
        match self {
            Expr::Symbol(s) if s == name => value.clone(),
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.substitute(name, value))),
            Expr::Mul(factors) => {
                Expr::product(factors.iter().map(|f| f.substitute(name, value)))
            }
            Expr::Pow(base, exp) => {
                Expr::power(base.substitute(name, value), exp.substitute(name, value))
            }
            Expr::Function(func, arg) => Expr::apply(*func, arg.substitute(name, value)),
            other => other.clone(),
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

impl From<Rational> for Expr {
    fn from(value: Rational) -> Self {
        Expr::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_symbols_are_sorted_and_skip_constants() {
        let expr = Expr::sum([
            Expr::symbol("y"),
            Expr::product([Expr::pi(), Expr::symbol("x")]),
            Expr::imaginary_unit(),
        ]);
        let names: Vec<String> = expr.free_symbols().into_iter().collect();
        assert_eq!(names, vec!["x".to_owned(), "y".to_owned()]);
    }

    #[test]
    fn test_coefficient_split() {
        let expr = Expr::product([Expr::integer(3), Expr::symbol("x")]);
        let (coeff, term) = expr.as_coeff_term();
        assert_eq!(coeff, numeric::integer(3));
        assert_eq!(term, Expr::symbol("x"));
    }

    #[test]
    fn test_numeric_evaluation() {
        let expr = Expr::power(Expr::integer(2), Expr::rational(1, 2));
        let value = expr.to_f64().unwrap();
        assert!((value - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert_eq!(Expr::imaginary_unit().to_f64(), None);
        assert_eq!(Expr::complex_infinity().to_f64(), None);
    }

    #[test]
    fn test_finiteness_looks_through_the_tree() {
        let x = Expr::symbol("x");
        assert!(Expr::product([Expr::integer(2), x.clone()]).is_finite());
        assert!(!Expr::Mul(vec![x, Expr::complex_infinity()]).is_finite());
        assert!(!Expr::Function(Func::Sin, Box::new(Expr::nan())).is_finite());
    }
}
