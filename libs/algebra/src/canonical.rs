//! Smart constructors that keep [`Expr`] trees in canonical form.
//!
//! Every tree the crate hands out is built here. The rules mirror what a computer
//! algebra system does on construction: flatten, fold numbers, merge like terms and
//! equal bases, and evaluate functions at well-known points. Products of sums are
//! left alone; see [`Expr::expand`] for that.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::expr::{Constant, Expr, Func};
use crate::numeric::{self, Rational};

/// Largest root index folded exactly; `x^(1/q)` with a bigger `q` stays symbolic.
const MAX_ROOT_INDEX: u32 = 64;

impl Expr {
    /// Canonical sum of `terms`.
    #[must_use]
    pub fn sum<I: IntoIterator<Item = Expr>>(terms: I) -> Expr {
        let mut constant = Rational::zero();
        let mut like: BTreeMap<Expr, Rational> = BTreeMap::new();
        let mut infinities = 0usize;
        let mut pending: Vec<Expr> = terms.into_iter().collect();

        while let Some(term) = pending.pop() {
            match term {
                Expr::Number(n) => constant += n,
                Expr::Add(inner) => pending.extend(inner),
                Expr::Constant(Constant::NaN) => return Expr::nan(),
                other => {
                    let (coeff, rest) = other.as_coeff_term();
                    if rest == Expr::complex_infinity() {
                        infinities += 1;
                    }
                    *like.entry(rest).or_insert_with(Rational::zero) += coeff;
                }
            }
        }

        // zoo absorbs finite numbers; zoo + zoo is undefined
        match infinities {
            0 => {}
            1 => constant = Rational::zero(),
            _ => return Expr::nan(),
        }

        let mut out = Vec::with_capacity(like.len() + 1);
        if !constant.is_zero() {
            out.push(Expr::Number(constant));
        }
        out.extend(
            like.into_iter()
                .filter(|(_, coeff)| !coeff.is_zero())
                .map(|(term, coeff)| scale(coeff, term)),
        );

        match out.len() {
            0 => Expr::zero(),
            1 => out.pop().unwrap_or_else(Expr::zero),
            _ => Expr::Add(out),
        }
    }

    /// Canonical product of `factors`.
    #[must_use]
    pub fn product<I: IntoIterator<Item = Expr>>(factors: I) -> Expr {
        product_with_passes(factors.into_iter().collect(), 1)
    }

    /// Canonical `base^exp`.
    #[must_use]
    pub fn power(base: Expr, exp: Expr) -> Expr {
        let nan = Expr::nan();
        if base == nan || exp == nan || exp == Expr::complex_infinity() {
            return nan;
        }
        if exp.is_zero() || base.is_one() {
            return Expr::one();
        }
        if exp.is_one() {
            return base;
        }
        match (base, exp) {
            (Expr::Constant(Constant::ComplexInfinity), Expr::Number(e)) => {
                if e.is_positive() {
                    Expr::complex_infinity()
                } else {
                    Expr::zero()
                }
            }
            (Expr::Number(b), Expr::Number(e)) => numeric_power(&b, &e),
            (Expr::Constant(Constant::E), exp) => Expr::apply(Func::Exp, exp),
            (Expr::Constant(Constant::I), Expr::Number(e)) if e.is_integer() => {
                imaginary_power(e.numer())
            }
            (Expr::Function(Func::Exp, arg), Expr::Number(e)) if e.is_integer() => {
                Expr::apply(Func::Exp, Expr::product([Expr::Number(e), *arg]))
            }
            (Expr::Pow(inner_base, inner_exp), exp) if powers_combine(&inner_base, &exp) => {
                Expr::power(*inner_base, Expr::product([*inner_exp, exp]))
            }
            (Expr::Mul(factors), Expr::Number(e)) => distribute_power(factors, e),
            (base, exp) => Expr::Pow(Box::new(base), Box::new(exp)),
        }
    }

    /// Canonical `func(arg)`, evaluated when `arg` is a well-known point.
    #[must_use]
    pub fn apply(func: Func, arg: Expr) -> Expr {
        if let Some(value) = special_value(func, &arg) {
            return value;
        }

        let (coeff, _) = arg.as_coeff_term();
        if coeff.is_negative() {
            let flipped = Expr::product([Expr::integer(-1), arg.clone()]);
            match func {
                Func::Sin | Func::Tan | Func::Asin | Func::Atan | Func::Sinh | Func::Tanh => {
                    return Expr::product([Expr::integer(-1), Expr::apply(func, flipped)]);
                }
                Func::Cos | Func::Cosh | Func::Abs => return Expr::apply(func, flipped),
                Func::Acos | Func::Exp | Func::Log => {}
            }
        }

        Expr::Function(func, Box::new(arg))
    }
}

/// `coeff * term` for a term that carries no numeric coefficient.
fn scale(coeff: Rational, term: Expr) -> Expr {
    if coeff.is_one() || term.factors().contains(&Expr::complex_infinity()) {
        return term;
    }
    match term {
        Expr::Mul(factors) => {
            let mut out = Vec::with_capacity(factors.len() + 1);
            out.push(Expr::Number(coeff));
            out.extend(factors);
            Expr::Mul(out)
        }
        other => Expr::Mul(vec![Expr::Number(coeff), other]),
    }
}

fn product_with_passes(factors: Vec<Expr>, passes: u8) -> Expr {
    let mut coeff = Rational::one();
    let mut bases: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
    let mut pending = factors;

    while let Some(factor) = pending.pop() {
        match factor {
            Expr::Number(n) => coeff *= n,
            Expr::Mul(inner) => pending.extend(inner),
            other => {
                let (base, exp) = other.as_base_exp();
                bases.entry(base).or_default().push(exp);
            }
        }
    }
    let infinite = Expr::complex_infinity();
    if bases.contains_key(&Expr::nan()) || (coeff.is_zero() && bases.contains_key(&infinite)) {
        return Expr::nan();
    }
    if coeff.is_zero() {
        return Expr::zero();
    }

    let mut rest = Vec::with_capacity(bases.len());
    let mut regroup = false;
    for (base, mut exps) in bases {
        let exp = if exps.len() == 1 {
            exps.pop().unwrap_or_else(Expr::one)
        } else {
            Expr::sum(exps)
        };
        match Expr::power(base, exp) {
            Expr::Number(n) => coeff *= n,
            Expr::Mul(inner) => {
                regroup = true;
                rest.extend(inner);
            }
            other => rest.push(other),
        }
    }

    if regroup && passes > 0 {
        rest.push(Expr::Number(coeff));
        return product_with_passes(rest, passes - 1);
    }

    let mut factors = Vec::with_capacity(rest.len());
    for factor in rest {
        match factor {
            Expr::Number(n) => coeff *= n,
            other => factors.push(other),
        }
    }
    if factors.contains(&infinite) {
        // zoo has no sign or magnitude to scale
        if coeff.is_zero() {
            return Expr::nan();
        }
        coeff = Rational::one();
    }
    if coeff.is_zero() {
        return Expr::zero();
    }
    factors.sort_unstable();

    if !coeff.is_one()
        && let [Expr::Add(terms)] = factors.as_slice()
    {
        return Expr::sum(
            terms
                .iter()
                .map(|t| Expr::product([Expr::Number(coeff.clone()), t.clone()])),
        );
    }

    assemble(coeff, factors)
}

/// Builds a product from an already folded coefficient and sorted factors.
fn assemble(coeff: Rational, mut factors: Vec<Expr>) -> Expr {
    if factors.is_empty() {
        return Expr::Number(coeff);
    }
    if coeff.is_one() {
        return Expr::from_sorted_factors(factors);
    }
    factors.insert(0, Expr::Number(coeff));
    Expr::Mul(factors)
}

fn powers_combine(inner_base: &Expr, outer_exp: &Expr) -> bool {
    match outer_exp {
        Expr::Number(e) => e.is_integer() || inner_base.is_positive_real(),
        _ => false,
    }
}

/// `I^n` reduced modulo 4.
fn imaginary_power(n: &BigInt) -> Expr {
    match n.mod_floor(&BigInt::from(4)).to_u8() {
        Some(0) => Expr::one(),
        Some(1) => Expr::imaginary_unit(),
        Some(2) => Expr::integer(-1),
        _ => Expr::Mul(vec![Expr::integer(-1), Expr::imaginary_unit()]),
    }
}

/// `(f1*f2*...)^e`: integer exponents distribute, rational ones only pull out the
/// factors known to be positive.
fn distribute_power(factors: Vec<Expr>, exp: Rational) -> Expr {
    if exp.is_integer() {
        return Expr::product(
            factors
                .into_iter()
                .map(|f| Expr::power(f, Expr::Number(exp.clone()))),
        );
    }

    let mut outside = Vec::new();
    let mut inside = Vec::new();
    for factor in &factors {
        match factor {
            Expr::Number(c) if c.is_negative() => {
                let magnitude = -c.clone();
                if !magnitude.is_one() {
                    outside.push(Expr::Number(magnitude));
                }
                inside.push(Expr::integer(-1));
            }
            f if f.is_positive_real() => outside.push(f.clone()),
            f => inside.push(f.clone()),
        }
    }
    if outside.is_empty() {
        return Expr::Pow(Box::new(Expr::Mul(factors)), Box::new(Expr::Number(exp)));
    }

    let radical = Expr::power(Expr::product(inside), Expr::Number(exp.clone()));
    let mut parts: Vec<Expr> = outside
        .into_iter()
        .map(|f| Expr::power(f, Expr::Number(exp.clone())))
        .collect();
    parts.push(radical);
    Expr::product(parts)
}

/// Exact `base^exp` for rationals, pulling perfect powers out of radicals:
/// `8^(1/2) = 2*sqrt(2)`, `2^(-1/2) = sqrt(2)/2`, `(-4)^(1/2) = 2*I`.
fn numeric_power(base: &Rational, exp: &Rational) -> Expr {
    let raw = || {
        Expr::Pow(
            Box::new(Expr::Number(base.clone())),
            Box::new(Expr::Number(exp.clone())),
        )
    };

    if base.is_zero() {
        return if exp.is_negative() {
            Expr::complex_infinity()
        } else {
            Expr::zero()
        };
    }
    if exp.is_integer() {
        return numeric::checked_pow(base, exp.numer()).map_or_else(raw, Expr::Number);
    }
    let Some(q) = exp.denom().to_u32().filter(|q| *q <= MAX_ROOT_INDEX) else {
        return raw();
    };

    let mut coeff = Rational::one();
    let mut factors = Vec::new();

    if base.is_negative() {
        if q == 2 {
            match imaginary_power(exp.numer()) {
                Expr::Number(n) => coeff *= n,
                Expr::Constant(Constant::I) => factors.push(Expr::imaginary_unit()),
                _ => {
                    coeff = -coeff;
                    factors.push(Expr::imaginary_unit());
                }
            }
        } else {
            factors.push(Expr::Pow(
                Box::new(Expr::integer(-1)),
                Box::new(Expr::Number(exp.clone())),
            ));
        }
    }

    let magnitude = base.abs();
    if !magnitude.is_one() {
        let whole = numeric::floor(exp);
        let fraction = exp - Rational::from_integer(whole.clone());
        let Some(p) = fraction.numer().to_u32() else {
            return raw();
        };
        let Some(whole_part) = numeric::checked_pow(&magnitude, &whole) else {
            return raw();
        };
        coeff *= whole_part;

        let (out_numer, in_numer) = numeric::extract_power(magnitude.numer(), q);
        let Some(pulled) = numeric::checked_pow(&Rational::from_integer(out_numer), &BigInt::from(p))
        else {
            return raw();
        };
        coeff *= pulled;
        if !in_numer.is_one() {
            factors.push(Expr::Pow(
                Box::new(Expr::Number(Rational::from_integer(in_numer))),
                Box::new(Expr::Number(Rational::new(p.into(), q.into()))),
            ));
        }

        if !magnitude.denom().is_one() {
            // d^(-p/q) = d^(-1) * d^((q-p)/q)
            let (out_denom, in_denom) = numeric::extract_power(magnitude.denom(), q);
            let Some(pulled) =
                numeric::checked_pow(&Rational::from_integer(out_denom), &BigInt::from(q - p))
            else {
                return raw();
            };
            coeff = coeff * pulled / Rational::from_integer(magnitude.denom().clone());
            if !in_denom.is_one() {
                factors.push(Expr::Pow(
                    Box::new(Expr::Number(Rational::from_integer(in_denom))),
                    Box::new(Expr::Number(Rational::new((q - p).into(), q.into()))),
                ));
            }
        }
    }

    factors.sort_unstable();
    assemble(coeff, factors)
}

fn pi_times(multiple: Rational) -> Expr {
    Expr::product([Expr::Number(multiple), Expr::pi()])
}

/// `sqrt(n) / d`
fn root_over(n: i64, d: i64) -> Expr {
    Expr::product([
        Expr::rational(1, d),
        Expr::power(Expr::integer(n), Expr::rational(1, 2)),
    ])
}

/// `sin(r*pi)` for multiples of `pi/6` and `pi/4`.
fn sine_at(multiple: &Rational) -> Option<Expr> {
    let two = numeric::integer(2);
    let reduced = multiple - &two * Rational::from_integer(numeric::floor(&(multiple / &two)));
    let twelfths = reduced * numeric::integer(12);
    if !twelfths.is_integer() {
        return None;
    }
    let n = twelfths.to_integer().to_i64()?;
    let (quadrant_n, sign) = match n {
        0..=6 => (n, 1),
        7..=12 => (12 - n, 1),
        13..=18 => (n - 12, -1),
        _ => (24 - n, -1),
    };
    let magnitude = match quadrant_n {
        0 => Expr::zero(),
        2 => Expr::rational(1, 2),
        3 => root_over(2, 2),
        4 => root_over(3, 2),
        6 => Expr::one(),
        _ => return None,
    };
    Some(Expr::product([Expr::integer(sign), magnitude]))
}

/// `tan(r*pi)`; `None` at the poles and at points without a closed form.
fn tangent_at(multiple: &Rational) -> Option<Expr> {
    let reduced = multiple - Rational::from_integer(numeric::floor(multiple));
    let twelfths = reduced * numeric::integer(12);
    if !twelfths.is_integer() {
        return None;
    }
    let value = match twelfths.to_integer().to_i64()? {
        0 => Expr::zero(),
        2 => root_over(3, 3),
        3 => Expr::one(),
        4 => Expr::power(Expr::integer(3), Expr::rational(1, 2)),
        8 => Expr::product([Expr::integer(-1), Expr::power(Expr::integer(3), Expr::rational(1, 2))]),
        9 => Expr::integer(-1),
        10 => Expr::product([Expr::integer(-1), root_over(3, 3)]),
        _ => return None,
    };
    Some(value)
}

/// `asin(arg)` as a multiple of `pi`, when it is one of the table values.
fn arcsine_multiple(arg: &Expr) -> Option<Rational> {
    let (coeff, _) = arg.as_coeff_term();
    if coeff.is_negative() {
        let flipped = Expr::product([Expr::integer(-1), arg.clone()]);
        return arcsine_multiple(&flipped).map(|m| -m);
    }
    let table = [
        (Expr::zero(), numeric::integer(0)),
        (Expr::rational(1, 2), numeric::rational(1, 6)),
        (root_over(2, 2), numeric::rational(1, 4)),
        (root_over(3, 2), numeric::rational(1, 3)),
        (Expr::one(), numeric::rational(1, 2)),
    ];
    table
        .into_iter()
        .find_map(|(value, multiple)| (&value == arg).then_some(multiple))
}

fn arctangent_multiple(arg: &Expr) -> Option<Rational> {
    let (coeff, _) = arg.as_coeff_term();
    if coeff.is_negative() {
        let flipped = Expr::product([Expr::integer(-1), arg.clone()]);
        return arctangent_multiple(&flipped).map(|m| -m);
    }
    let table = [
        (Expr::zero(), numeric::integer(0)),
        (root_over(3, 3), numeric::rational(1, 6)),
        (Expr::one(), numeric::rational(1, 4)),
        (
            Expr::power(Expr::integer(3), Expr::rational(1, 2)),
            numeric::rational(1, 3),
        ),
    ];
    table
        .into_iter()
        .find_map(|(value, multiple)| (&value == arg).then_some(multiple))
}

fn inverse_of(func: Func) -> Option<Func> {
    match func {
        Func::Sin => Some(Func::Asin),
        Func::Cos => Some(Func::Acos),
        Func::Tan => Some(Func::Atan),
        Func::Exp => Some(Func::Log),
        _ => None,
    }
}

fn special_value(func: Func, arg: &Expr) -> Option<Expr> {
    match arg {
        Expr::Constant(Constant::NaN) => return Some(Expr::nan()),
        Expr::Constant(Constant::ComplexInfinity) => {
            return Some(match func {
                Func::Log | Func::Abs => Expr::complex_infinity(),
                _ => Expr::nan(),
            });
        }
        _ => {}
    }
    if let Expr::Function(inner_func, inner) = arg
        && inverse_of(func) == Some(*inner_func)
    {
        return Some((**inner).clone());
    }

    match func {
        Func::Sin => sine_at(&arg.as_pi_multiple()?),
        Func::Cos => sine_at(&(arg.as_pi_multiple()? + numeric::rational(1, 2))),
        Func::Tan => tangent_at(&arg.as_pi_multiple()?),
        Func::Asin => arcsine_multiple(arg).map(pi_times),
        Func::Acos => arcsine_multiple(arg).map(|m| pi_times(numeric::rational(1, 2) - m)),
        Func::Atan => arctangent_multiple(arg).map(pi_times),
        Func::Sinh | Func::Tanh => arg.is_zero().then(Expr::zero),
        Func::Cosh => arg.is_zero().then(Expr::one),
        Func::Exp => {
            if arg.is_zero() {
                Some(Expr::one())
            } else if arg.is_one() {
                Some(Expr::Constant(Constant::E))
            } else {
                None
            }
        }
        Func::Log => match arg {
            Expr::Number(n) if n.is_one() => Some(Expr::zero()),
            Expr::Constant(Constant::E) => Some(Expr::one()),
            Expr::Function(Func::Exp, inner)
                if inner.is_numeric() && !inner.contains_imaginary() =>
            {
                Some((**inner).clone())
            }
            _ => None,
        },
        Func::Abs => match arg {
            Expr::Number(n) => Some(Expr::Number(n.abs())),
            other if other.is_positive_real() => Some(other.clone()),
            _ => None,
        },
    }
}
