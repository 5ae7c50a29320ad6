//! Text rendering of expressions with `^` for powers.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use num_traits::{One, Signed, Zero};

use crate::expr::{Constant, Expr};
use crate::numeric::Rational;

const PREC_ADD: u8 = 40;
const PREC_MUL: u8 = 50;
const PREC_POW: u8 = 60;
const PREC_ATOM: u8 = 100;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write_rational(f, n),
            Expr::Symbol(name) => f.write_str(name),
            Expr::Constant(c) => f.write_str(c.name()),
            Expr::Add(terms) => write_sum(f, terms),
            Expr::Mul(_) => write_product(f, self, false),
            Expr::Pow(base, exp) => write_power(f, base, exp),
            Expr::Function(func, arg) => write!(f, "{}({arg})", func.name()),
        }
    }
}

fn write_rational(f: &mut fmt::Formatter<'_>, n: &Rational) -> fmt::Result {
    if n.is_integer() {
        write!(f, "{}", n.numer())
    } else {
        write!(f, "{}/{}", n.numer(), n.denom())
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(n) if n.is_negative() => PREC_ADD,
        Expr::Number(n) if !n.is_integer() => PREC_MUL,
        Expr::Add(_) => PREC_ADD,
        Expr::Mul(_) => {
            if expr.as_coeff_term().0.is_negative() {
                PREC_ADD
            } else {
                PREC_MUL
            }
        }
        Expr::Pow(_, exp) => match exp.as_number() {
            Some(e) if *e == Rational::new(1.into(), 2.into()) => PREC_ATOM,
            Some(e) if e.is_negative() => PREC_MUL,
            _ => PREC_POW,
        },
        Expr::Number(_) | Expr::Symbol(_) | Expr::Constant(_) | Expr::Function(..) => PREC_ATOM,
    }
}

/// Writes `expr`, wrapped in parentheses when it binds looser than `level`.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, level: u8) -> fmt::Result {
    if precedence(expr) < level {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_power(f: &mut fmt::Formatter<'_>, base: &Expr, exp: &Expr) -> fmt::Result {
    if let Some(e) = exp.as_number() {
        let half = Rational::new(1.into(), 2.into());
        if *e == half {
            return write!(f, "sqrt({base})");
        }
        if *e == -half {
            return write!(f, "1/sqrt({base})");
        }
        if *e == -Rational::one() {
            f.write_str("1/")?;
            return write_operand(f, base, PREC_ATOM);
        }
    }
    write_operand(f, base, PREC_ATOM)?;
    f.write_str("^")?;
    let bare_exponent = match exp {
        Expr::Number(n) => n.is_integer() && !n.is_negative(),
        Expr::Symbol(_) | Expr::Constant(_) | Expr::Function(..) => true,
        _ => false,
    };
    if bare_exponent {
        write!(f, "{exp}")
    } else {
        write!(f, "({exp})")
    }
}

/// Ordering rank of a product factor: numbers and `pi` first, then symbols,
/// functions, sums, and the imaginary unit last.
fn factor_rank(factor: &Expr) -> u8 {
    let (base, _) = factor.as_base_exp();
    match base {
        Expr::Constant(Constant::I) => 4,
        Expr::Add(_) => 3,
        Expr::Function(..) => 2,
        b if b.is_numeric() => 0,
        _ => 1,
    }
}

fn compare_factors(a: &Expr, b: &Expr) -> Ordering {
    factor_rank(a)
        .cmp(&factor_rank(b))
        .then_with(|| a.as_base_exp().0.cmp(&b.as_base_exp().0))
        .then_with(|| a.cmp(b))
}

/// `b` for `b^-1`, `b^k` for `b^-k`; `None` for factors with a non-negative exponent.
fn reciprocal(factor: &Expr) -> Option<Expr> {
    let Expr::Pow(base, exp) = factor else {
        return None;
    };
    let positive = -exp.as_number().filter(|e| e.is_negative())?.clone();
    if positive.is_one() {
        Some((**base).clone())
    } else {
        Some(Expr::Pow(base.clone(), Box::new(Expr::Number(positive))))
    }
}

/// Writes a product as `[-]numerator[/denominator]`. With `unsigned` set the
/// leading sign is dropped, for use after a ` - ` separator.
fn write_product(f: &mut fmt::Formatter<'_>, expr: &Expr, unsigned: bool) -> fmt::Result {
    let (coeff, term) = expr.as_coeff_term();
    let mut factors = term.factors();
    factors.retain(|factor| !factor.is_one());
    factors.sort_by(compare_factors);

    let mut numer: Vec<Expr> = Vec::new();
    let mut denom: Vec<Expr> = Vec::new();
    if !coeff.numer().abs().is_one() {
        numer.push(Expr::Number(Rational::from_integer(coeff.numer().abs())));
    }
    if !coeff.denom().is_one() {
        denom.push(Expr::Number(Rational::from_integer(coeff.denom().clone())));
    }
    for factor in factors {
        match reciprocal(&factor) {
            Some(inverted) => denom.push(inverted),
            None => numer.push(factor),
        }
    }

    if coeff.is_negative() && !unsigned {
        f.write_str("-")?;
    }
    if numer.is_empty() {
        f.write_str("1")?;
    }
    for (i, factor) in numer.iter().enumerate() {
        if i > 0 {
            f.write_str("*")?;
        }
        write_operand(f, factor, PREC_MUL)?;
    }

    match denom.as_slice() {
        [] => Ok(()),
        [single] => {
            f.write_str("/")?;
            write_operand(f, single, PREC_MUL + 1)
        }
        many => {
            f.write_str("/(")?;
            for (i, factor) in many.iter().enumerate() {
                if i > 0 {
                    f.write_str("*")?;
                }
                write_operand(f, factor, PREC_MUL)?;
            }
            f.write_str(")")
        }
    }
}

/// Degree of `term` in each generator, in generator order.
fn monomial(term: &Expr, generators: &BTreeSet<String>) -> Vec<Rational> {
    let mut degrees = vec![Rational::zero(); generators.len()];
    for factor in term.factors() {
        let (base, exp) = factor.as_base_exp();
        if let (Expr::Symbol(name), Some(e)) = (&base, exp.as_number())
            && let Some(index) = generators.iter().position(|g| g == name)
        {
            degrees[index] += e;
        }
    }
    degrees
}

/// Group of a term without any generator: plain numbers, other numeric terms,
/// then imaginary terms.
fn constant_group(term: &Expr) -> u8 {
    match term {
        Expr::Number(_) => 0,
        t if t.contains_imaginary() => 2,
        _ => 1,
    }
}

fn write_sum(f: &mut fmt::Formatter<'_>, terms: &[Expr]) -> fmt::Result {
    let generators: BTreeSet<String> = terms.iter().flat_map(Expr::free_symbols).collect();
    let mut keyed: Vec<(Vec<Rational>, &Expr)> = terms
        .iter()
        .map(|t| (monomial(t, &generators), t))
        .collect();
    keyed.sort_by(|(da, a), (db, b)| {
        let a_const = a.free_symbols().is_empty();
        let b_const = b.free_symbols().is_empty();
        db.cmp(da)
            .then_with(|| a_const.cmp(&b_const))
            .then_with(|| constant_group(a).cmp(&constant_group(b)))
            .then_with(|| a.to_string().cmp(&b.to_string()))
    });
    let constant_first = matches!(
        keyed.as_slice(),
        [(_, negated), (_, constant)] if is_negated_factor(negated) && is_positive_constant(constant)
    );
    if constant_first {
        keyed.swap(0, 1);
    }

    for (i, (_, term)) in keyed.iter().enumerate() {
        let negative = term.as_coeff_term().0.is_negative();
        match (i, negative) {
            (0, _) => write!(f, "{term}")?,
            (_, true) => {
                f.write_str(" - ")?;
                write_unsigned(f, term)?;
            }
            (_, false) => write!(f, " + {term}")?,
        }
    }
    Ok(())
}

/// `-c*u` with a single factor `u`, the shape written after a constant as `1 - x^2`.
fn is_negated_factor(term: &Expr) -> bool {
    matches!(term, Expr::Mul(factors) if factors.len() == 2 && factors[0].as_number().is_some_and(Signed::is_negative))
}

fn is_positive_constant(term: &Expr) -> bool {
    match term {
        Expr::Number(n) => n.is_positive(),
        Expr::Constant(c) => matches!(c, Constant::Pi | Constant::E),
        _ => false,
    }
}

fn write_unsigned(f: &mut fmt::Formatter<'_>, term: &Expr) -> fmt::Result {
    match term {
        Expr::Number(n) => write_rational(f, &n.abs()),
        Expr::Mul(_) => write_product(f, term, true),
        other => write!(f, "{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_renders_numbers() {
        assert_eq!(Expr::rational(-3, 2).to_string(), "-3/2");
        assert_eq!(Expr::integer(42).to_string(), "42");
    }

    #[test]
    fn test_renders_polynomial_descending() {
        let expr = Expr::sum([
            Expr::integer(-4),
            Expr::power(x(), Expr::integer(2)),
        ]);
        assert_eq!(expr.to_string(), "x^2 - 4");
    }

    #[test]
    fn test_renders_fractions_in_products() {
        let expr = Expr::product([Expr::rational(3, 2), x()]);
        assert_eq!(expr.to_string(), "3*x/2");
        let expr = Expr::product([
            x(),
            Expr::power(Expr::product([Expr::integer(2), Expr::symbol("y")]), Expr::integer(-1)),
        ]);
        assert_eq!(expr.to_string(), "x/(2*y)");
    }

    #[test]
    fn test_renders_reciprocals_and_roots() {
        assert_eq!(Expr::power(x(), Expr::integer(-1)).to_string(), "1/x");
        assert_eq!(Expr::power(x(), Expr::integer(-2)).to_string(), "x^(-2)");
        assert_eq!(Expr::power(x(), Expr::rational(1, 2)).to_string(), "sqrt(x)");
        assert_eq!(Expr::power(x(), Expr::rational(1, 3)).to_string(), "x^(1/3)");
    }

    #[test]
    fn test_renders_complex_roots() {
        let sqrt3 = Expr::power(Expr::integer(3), Expr::rational(1, 2));
        let root = Expr::sum([
            Expr::rational(-1, 2),
            Expr::product([Expr::rational(-1, 2), sqrt3, Expr::imaginary_unit()]),
        ]);
        assert_eq!(root.to_string(), "-1/2 - sqrt(3)*I/2");
    }

    #[test]
    fn test_positive_constant_leads_a_single_negated_term() {
        let one_minus_square = Expr::sum([
            Expr::integer(1),
            Expr::product([Expr::integer(-1), Expr::power(x(), Expr::integer(2))]),
        ]);
        assert_eq!(one_minus_square.to_string(), "1 - x^2");
        let three_minus = Expr::sum([Expr::integer(3), Expr::product([Expr::integer(-2), x()])]);
        assert_eq!(three_minus.to_string(), "3 - 2*x");
        let pi_minus = Expr::sum([Expr::pi(), Expr::product([Expr::integer(-1), x()])]);
        assert_eq!(pi_minus.to_string(), "pi - x");
    }

    #[test]
    fn test_other_sums_keep_degree_order() {
        let y = Expr::symbol("y");
        let two_terms = Expr::sum([y.clone(), Expr::product([Expr::integer(-2), x()])]);
        assert_eq!(two_terms.to_string(), "-2*x + y");
        let product_term = Expr::sum([
            Expr::integer(1),
            Expr::product([Expr::integer(-2), x(), y]),
        ]);
        assert_eq!(product_term.to_string(), "-2*x*y + 1");
        let negative_constant = Expr::sum([Expr::integer(-1), Expr::product([Expr::integer(-1), x()])]);
        assert_eq!(negative_constant.to_string(), "-x - 1");
    }

    #[test]
    fn test_renders_complex_infinity() {
        let expr = Expr::sum([
            Expr::integer(-1),
            Expr::product([x(), Expr::complex_infinity()]),
        ]);
        assert_eq!(expr.to_string(), "zoo*x - 1");
    }

    #[test]
    fn test_parenthesizes_sum_bases() {
        let square = Expr::power(Expr::sum([x(), Expr::integer(1)]), Expr::integer(2));
        assert_eq!(square.to_string(), "(x + 1)^2");
    }
}
