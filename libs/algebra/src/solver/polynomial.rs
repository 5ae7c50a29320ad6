use std::collections::BTreeSet;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::SolveError;
use crate::expr::{Expr, Func};
use crate::numeric::{self, Rational};
use crate::poly::Poly;

/// Upper bound on rational root candidates tried before giving up on the search.
const MAX_CANDIDATES: usize = 20_000;
/// Highest `n` for which the `n` roots of `u^n = c` are all written out.
pub(super) const MAX_ROOT_COUNT: u32 = 32;

/// Roots of a polynomial, zero roots and rational roots first.
pub(super) fn roots(poly: &Poly, var: &str) -> Result<Vec<Expr>, SolveError> {
    if poly.is_zero() || poly.degree() == 0 {
        return Ok(Vec::new());
    }

    let mut roots = Vec::new();
    let mut rest = poly.clone();
    let lowest = rest.lowest_degree();
    if lowest > 0 {
        roots.push(Expr::zero());
        rest = rest.shift_down(lowest);
    }

    if let Some(value) = binomial_value(&rest) {
        roots.extend(nth_roots(&value, rest.degree()));
        return Ok(roots);
    }

    if let Some(coeffs) = rest.rational_coeffs() {
        let (found, remaining) = rational_roots(coeffs);
        roots.extend(found.into_iter().map(Expr::Number));
        rest = Poly::from_rationals(&remaining);
    }

    roots.extend(closed_form(&rest, var)?);
    Ok(roots)
}

/// `-b/a` when `poly` is `a*x^n + b` with `n >= 2`.
fn binomial_value(poly: &Poly) -> Option<Expr> {
    let n = poly.degree();
    if !(2..=MAX_ROOT_COUNT).contains(&n) || poly.term_count() != 2 || poly.lowest_degree() != 0 {
        return None;
    }
    Some((-poly.coeff(0) / poly.coeff(n)).expand())
}

fn closed_form(poly: &Poly, var: &str) -> Result<Vec<Expr>, SolveError> {
    let degree = poly.degree();
    let k = poly.exponent_gcd();
    if degree > 2 && k >= 2 {
        let reduced = closed_form(&poly.compress(k), var)?;
        return Ok(reduced.iter().flat_map(|y| nth_roots(y, k)).collect());
    }
    match degree {
        0 => Ok(Vec::new()),
        1 => Ok(vec![linear(poly)]),
        2 => Ok(quadratic_roots(poly.coeff(2), poly.coeff(1), poly.coeff(0))),
        3 => Ok(cubic(poly)),
        4 => quartic(poly, var),
        _ => Err(SolveError::unsupported(
            var,
            format!("no closed form for a polynomial of degree {degree}"),
        )),
    }
}

fn linear(poly: &Poly) -> Expr {
    -poly.coeff(0) / poly.coeff(1)
}

fn quadratic_roots(a: Expr, b: Expr, c: Expr) -> Vec<Expr> {
    let disc = (b.clone() * b.clone() - Expr::integer(4) * a.clone() * c).expand();
    let two_a = Expr::integer(2) * a;
    if disc.is_zero() {
        return vec![-b / two_a];
    }
    let root = square_root(&disc);
    vec![
        (-b.clone() - root.clone()) / two_a.clone(),
        (-b + root) / two_a,
    ]
}

/// Cardano's formula on the depressed cubic `t^3 + p*t + q`, `x = t - b/(3a)`.
fn cubic(poly: &Poly) -> Vec<Expr> {
    let leading = poly.coeff(3);
    let quadratic = poly.coeff(2);
    let linear = poly.coeff(1);
    let constant = poly.coeff(0);
    let square = |value: &Expr| value.clone().pow(Expr::integer(2));
    let cube = |value: &Expr| value.clone().pow(Expr::integer(3));

    let shift = -quadratic.clone() / (Expr::integer(3) * leading.clone());
    let p = ((Expr::integer(3) * leading.clone() * linear.clone() - square(&quadratic))
        / (Expr::integer(3) * square(&leading)))
    .expand();
    let q = ((Expr::integer(2) * cube(&quadratic)
        - Expr::integer(9) * leading.clone() * quadratic * linear
        + Expr::integer(27) * square(&leading) * constant)
        / (Expr::integer(27) * cube(&leading)))
    .expand();

    depressed_cubic_roots(&p, &q)
        .into_iter()
        .map(|root| (root + shift.clone()).expand())
        .collect()
}

fn depressed_cubic_roots(p: &Expr, q: &Expr) -> Vec<Expr> {
    if p.is_zero() {
        return nth_roots(&-q.clone(), 3);
    }
    let half_q = q.clone() / Expr::integer(2);
    let disc = (half_q.clone().pow(Expr::integer(2))
        + p.clone().pow(Expr::integer(3)) / Expr::integer(27))
    .expand();
    let u = cube_root(&(-half_q + square_root(&disc)));

    let omega = unit_at(numeric::rational(2, 3));
    let omega_bar = unit_at(numeric::rational(4, 3));
    [
        (Expr::one(), Expr::one()),
        (omega.clone(), omega_bar.clone()),
        (omega_bar, omega),
    ]
    .into_iter()
    .map(|(w, w_bar)| {
        (w * u.clone() - p.clone() * w_bar / (Expr::integer(3) * u.clone())).expand()
    })
    .collect()
}

/// Ferrari's method on the depressed quartic `y^4 + p*y^2 + q*y + r`,
/// `x = y - b/(4a)`. Only rational coefficients are handled.
fn quartic(poly: &Poly, var: &str) -> Result<Vec<Expr>, SolveError> {
    let Some(coeffs) = poly.rational_coeffs() else {
        return Err(SolveError::unsupported(
            var,
            "no closed form for a quartic with symbolic coefficients",
        ));
    };
    let [constant, linear, quadratic, cubic, leading] = coeffs.as_slice() else {
        return Err(SolveError::unsupported(var, "malformed quartic"));
    };
    let cubic = cubic / leading;
    let quadratic = quadratic / leading;
    let linear = linear / leading;
    let constant = constant / leading;
    let cubic_sq = &cubic * &cubic;

    let p = &quadratic - numeric::rational(3, 8) * &cubic_sq;
    let q = &linear - &cubic * &quadratic / numeric::integer(2)
        + &cubic_sq * &cubic / numeric::integer(8);
    let r = &constant - &cubic * &linear / numeric::integer(4)
        + &cubic_sq * &quadratic / numeric::integer(16)
        - numeric::rational(3, 256) * &cubic_sq * &cubic_sq;
    let shift = Expr::Number(-cubic / numeric::integer(4));

    let ys = if q.is_zero() {
        quadratic_roots(Expr::one(), Expr::Number(p), Expr::Number(r))
            .iter()
            .flat_map(|z| nth_roots(z, 2))
            .collect()
    } else {
        ferrari(&p, &q, &r)
    };
    Ok(ys
        .into_iter()
        .map(|root| (root + shift.clone()).expand())
        .collect())
}

/// Roots of `y^4 + p*y^2 + q*y + r` for `q != 0`, through a root `m` of the
/// resolvent `8m^3 + 8p*m^2 + (2p^2 - 8r)*m - q^2`.
fn ferrari(p: &Rational, q: &Rational, r: &Rational) -> Vec<Expr> {
    let resolvent = vec![
        -(q * q),
        numeric::integer(2) * p * p - numeric::integer(8) * r,
        numeric::integer(8) * p,
        numeric::integer(8),
    ];
    let (found, _) = rational_roots(resolvent.clone());
    let m = match found.into_iter().find(Signed::is_positive) {
        Some(m) => Expr::Number(m),
        None => cubic(&Poly::from_rationals(&resolvent))
            .into_iter()
            .next()
            .unwrap_or_else(Expr::one),
    };

    let root_2m = square_root(&(Expr::integer(2) * m.clone()).expand());
    let (p, q) = (Expr::Number(p.clone()), Expr::Number(q.clone()));
    let mut roots = Vec::with_capacity(4);
    for sign in [Expr::one(), Expr::integer(-1)] {
        let middle = -(sign.clone() * root_2m.clone());
        let constant = (p.clone() / Expr::integer(2)
            + m.clone()
            + sign * q.clone() / (Expr::integer(2) * root_2m.clone()))
        .expand();
        roots.extend(quadratic_roots(Expr::one(), middle, constant));
    }
    roots
}

/// The `n` roots of `u^n = value`, principal (or real) root first.
pub(super) fn nth_roots(value: &Expr, n: u32) -> Vec<Expr> {
    let (radicand, half_turns) = if is_negative_real(value) {
        (-value.clone(), 1)
    } else {
        (value.clone(), 0)
    };
    let root = radicand.pow(Expr::rational(1, i64::from(n)));
    (0..n)
        .map(|j| {
            let turn = Rational::new(BigInt::from(half_turns + 2 * j), BigInt::from(n));
            (root.clone() * unit_at(turn)).expand()
        })
        .collect()
}

/// `cos(t*pi) + I*sin(t*pi)`.
fn unit_at(half_turns: Rational) -> Expr {
    let angle = Expr::Number(half_turns) * Expr::pi();
    Expr::apply(Func::Cos, angle.clone())
        + Expr::imaginary_unit() * Expr::apply(Func::Sin, angle)
}

fn is_negative_real(value: &Expr) -> bool {
    match value.as_number() {
        Some(n) => n.is_negative(),
        None => {
            value.is_numeric()
                && !value.contains_imaginary()
                && value.to_f64().is_some_and(|v| v < 0.0)
        }
    }
}

/// Real cube root for negative real values, principal root otherwise.
fn cube_root(value: &Expr) -> Expr {
    let third = Expr::rational(1, 3);
    if is_negative_real(value) {
        -(-value.clone()).pow(third)
    } else {
        value.clone().pow(third)
    }
}

/// `sqrt(value)` with the square part of a sum's numeric content pulled out,
/// so `sqrt(4 - 4*y)` is `2*sqrt(1 - y)`.
fn square_root(value: &Expr) -> Expr {
    let Expr::Add(terms) = value else {
        return value.clone().sqrt();
    };
    let coeffs: Vec<Rational> = terms.iter().map(|t| t.as_coeff_term().0).collect();
    let numer_gcd = coeffs
        .iter()
        .fold(BigInt::zero(), |acc, c| acc.gcd(c.numer()));
    let denom_lcm = coeffs
        .iter()
        .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    if numer_gcd.is_zero() {
        return value.clone().sqrt();
    }
    let (outside, _) = numeric::extract_power(&numer_gcd, 2);
    let below = numeric::exact_root(&denom_lcm, 2).unwrap_or_else(BigInt::one);
    let factor = Rational::new(outside, below);
    if factor.is_one() {
        return value.clone().sqrt();
    }
    let inner = (value.clone() / Expr::Number(&factor * &factor)).expand();
    Expr::Number(factor) * inner.sqrt()
}

/// Rational roots found by the rational root theorem, and the deflated
/// remainder with lowest degree first.
fn rational_roots(coeffs: Vec<Rational>) -> (Vec<Rational>, Vec<Rational>) {
    let mut current = coeffs;
    let mut found = Vec::new();

    'search: while current.len() > 1 {
        let Some(candidates) = candidates(&current) else {
            break;
        };
        for candidate in candidates {
            if evaluate(&current, &candidate).is_zero() {
                current = deflate(&current, &candidate);
                found.push(candidate);
                continue 'search;
            }
        }
        break;
    }
    (found, current)
}

/// `±p/q` for `p` dividing the constant term and `q` the leading coefficient,
/// after clearing denominators.
fn candidates(coeffs: &[Rational]) -> Option<BTreeSet<Rational>> {
    let common = coeffs
        .iter()
        .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    let scaled: Vec<BigInt> = coeffs
        .iter()
        .map(|c| (c * Rational::from_integer(common.clone())).to_integer())
        .collect();
    let constant_divisors = numeric::divisors(scaled.first()?)?;
    let leading_divisors = numeric::divisors(scaled.last()?)?;
    if constant_divisors.len() * leading_divisors.len() > MAX_CANDIDATES {
        return None;
    }

    let mut out = BTreeSet::new();
    for p in &constant_divisors {
        for q in &leading_divisors {
            let candidate = Rational::new(p.clone(), q.clone());
            out.insert(-candidate.clone());
            out.insert(candidate);
        }
    }
    Some(out)
}

/// Horner evaluation; coefficients lowest degree first.
fn evaluate(coeffs: &[Rational], x: &Rational) -> Rational {
    coeffs
        .iter()
        .rev()
        .fold(Rational::zero(), |acc, c| acc * x + c)
}

/// Synthetic division by `(x - root)`, dropping the zero remainder.
fn deflate(coeffs: &[Rational], root: &Rational) -> Vec<Rational> {
    let mut quotient = Vec::with_capacity(coeffs.len().saturating_sub(1));
    let mut carry = Rational::zero();
    for c in coeffs.iter().rev().take(coeffs.len().saturating_sub(1)) {
        carry = carry * root + c;
        quotient.push(carry.clone());
    }
    quotient.reverse();
    quotient
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Constant;
    use crate::parser::parse;

    fn roots_of(source: &str) -> Vec<String> {
        let expr = parse(source).unwrap().expand();
        let poly = Poly::from_expanded(&expr, "x").unwrap();
        let mut out: Vec<String> = roots(&poly, "x")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_finds_rational_roots() {
        assert_eq!(roots_of("x^3 - 6x^2 + 11x - 6"), vec!["1", "2", "3"]);
        assert_eq!(roots_of("2x^2 - 3x + 1"), vec!["1", "1/2"]);
    }

    #[test]
    fn test_zero_root_is_factored_out() {
        assert_eq!(roots_of("x^3 - x"), vec!["-1", "0", "1"]);
    }

    #[test]
    fn test_irrational_and_complex_quadratics() {
        assert_eq!(roots_of("x^2 - 2"), vec!["-sqrt(2)", "sqrt(2)"]);
        assert_eq!(roots_of("x^2 + 1"), vec!["-I", "I"]);
        assert_eq!(
            roots_of("x^2 + x + 1"),
            vec!["-1/2 + sqrt(3)*I/2", "-1/2 - sqrt(3)*I/2"]
        );
    }

    #[test]
    fn test_biquadratic_substitution() {
        assert_eq!(
            roots_of("x^4 - 5x^2 + 6"),
            vec!["-sqrt(2)", "-sqrt(3)", "sqrt(2)", "sqrt(3)"]
        );
    }

    #[test]
    fn test_cubic_binomial() {
        let found = roots_of("x^3 - 2");
        assert_eq!(found.len(), 3);
        assert!(found.contains(&"2^(1/3)".to_owned()));
    }

    #[test]
    fn test_symbolic_coefficients() {
        assert_eq!(roots_of("a*x + b"), vec!["-b/a"]);
    }

    #[test]
    fn test_binomials_give_every_root_of_unity() {
        let found = roots_of("x^8 - 1");
        assert_eq!(found.len(), 8);
        assert!(max_residual("x^8 - 1") < 1e-9);
        for expected in ["-1", "1", "-I", "I"] {
            assert!(found.contains(&expected.to_owned()), "{expected} in {found:?}");
        }
    }

    #[test]
    fn test_sixth_roots_avoid_nested_radicals() {
        let found = roots_of("x^6 - 1");
        assert_eq!(found.len(), 6);
        assert!(found.contains(&"1/2 + sqrt(3)*I/2".to_owned()), "{found:?}");
        assert!(found.iter().all(|r| !r.contains("sqrt(-")), "{found:?}");
    }

    #[test]
    fn test_binomial_with_symbolic_constant() {
        let expr = parse("x^2 + y^2 - 1").unwrap().expand();
        let poly = Poly::from_expanded(&expr, "x").unwrap();
        let found: Vec<String> = roots(&poly, "x")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, vec!["sqrt(1 - y^2)", "-sqrt(1 - y^2)"]);
    }

    type Complex = (f64, f64);

    fn mul(a: Complex, b: Complex) -> Complex {
        (a.0 * b.0 - a.1 * b.1, a.0 * b.1 + a.1 * b.0)
    }

    fn complex_value(expr: &Expr) -> Complex {
        match expr {
            Expr::Number(n) => (numeric::to_f64(n).unwrap(), 0.0),
            Expr::Constant(Constant::Pi) => (std::f64::consts::PI, 0.0),
            Expr::Constant(Constant::E) => (std::f64::consts::E, 0.0),
            Expr::Constant(Constant::I) => (0.0, 1.0),
            Expr::Add(terms) => terms.iter().map(complex_value).fold((0.0, 0.0), |acc, t| {
                (acc.0 + t.0, acc.1 + t.1)
            }),
            Expr::Mul(factors) => factors.iter().map(complex_value).fold((1.0, 0.0), mul),
            Expr::Pow(base, exp) => {
                let (re, im) = complex_value(base);
                let w = complex_value(exp);
                let log = (re.hypot(im).ln(), im.atan2(re));
                let z = mul(w, log);
                (z.0.exp() * z.1.cos(), z.0.exp() * z.1.sin())
            }
            Expr::Function(func, arg) => {
                let (re, im) = complex_value(arg);
                assert!(im.abs() < 1e-12, "complex argument in {expr}");
                (func.eval_f64(re), 0.0)
            }
            other => panic!("cannot evaluate {other}"),
        }
    }

    /// Largest `|p(root)|` over the roots found for `source`.
    fn max_residual(source: &str) -> f64 {
        let expr = parse(source).unwrap().expand();
        let poly = Poly::from_expanded(&expr, "x").unwrap();
        let coeffs = poly.rational_coeffs().unwrap();
        roots(&poly, "x")
            .unwrap()
            .iter()
            .map(|root| {
                let z = complex_value(root);
                let value = coeffs.iter().rev().fold((0.0, 0.0), |acc, c| {
                    let scaled = mul(acc, z);
                    (scaled.0 + numeric::to_f64(c).unwrap(), scaled.1)
                });
                value.0.hypot(value.1)
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_general_cubic_by_cardano() {
        assert_eq!(roots_of("x^3 + x + 1").len(), 3);
        assert!(max_residual("x^3 + x + 1") < 1e-9);
        assert!(max_residual("2x^3 - 3x^2 + 5x + 7") < 1e-9);
    }

    #[test]
    fn test_general_quartic_by_ferrari() {
        assert_eq!(roots_of("x^4 + x + 1").len(), 4);
        assert!(max_residual("x^4 + x + 1") < 1e-9);
        assert!(max_residual("x^4 + 2x^3 - x + 3") < 1e-9);
    }

    #[test]
    fn test_square_content_leaves_the_radical() {
        let value = parse("4 - 4*y").unwrap();
        assert_eq!(square_root(&value).to_string(), "2*sqrt(1 - y)");
        let value = parse("8 + 8*y").unwrap();
        assert_eq!(square_root(&value).to_string(), "2*sqrt(2*y + 2)");
    }

    #[test]
    fn test_general_quintic_is_unsupported() {
        let expr = parse("x^5 - x + 1").unwrap();
        let poly = Poly::from_expanded(&expr, "x").unwrap();
        assert!(roots(&poly, "x").is_err());
    }

    #[test]
    fn test_synthetic_division() {
        let coeffs = vec![numeric::integer(-1), numeric::integer(0), numeric::integer(1)];
        let quotient = deflate(&coeffs, &numeric::integer(1));
        assert_eq!(quotient, vec![numeric::integer(1), numeric::integer(1)]);
    }
}
