//! Root finding for `expr = 0` in one variable.
//!
//! Products split into their factors, rational functions go through
//! [`polynomial`], and anything with a single variable-bearing term is peeled
//! apart by [`invert`]. Every other shape is reported as unsupported.

mod invert;
mod polynomial;

use std::cmp::Ordering;

use num_traits::Signed;

use crate::error::SolveError;
use crate::expr::Expr;
use crate::poly::{Poly, as_fraction};

/// Nesting limit for the recursive strategies.
const MAX_DEPTH: usize = 8;

/// Every root of `expr = 0` for `var`, other symbols treated as parameters.
///
/// Roots are de-duplicated and ordered: real numeric roots ascending, then the
/// rest by their rendered text. A variable that does not occur yields no roots,
/// and neither does an equation holding `zoo` or `nan`.
///
/// # Errors
/// Returns [`SolveError::Unsupported`] when the equation is outside the classes
/// the solver handles, such as general quintics or mixed transcendental terms.
pub fn solve(expr: &Expr, var: &str) -> Result<Vec<Expr>, SolveError> {
    let roots = solve_in(expr, var, 0)?;
    Ok(order_roots(roots))
}

pub(crate) fn solve_in(expr: &Expr, var: &str, depth: usize) -> Result<Vec<Expr>, SolveError> {
    if !expr.contains_symbol(var) || !expr.is_finite() {
        return Ok(Vec::new());
    }
    if depth > MAX_DEPTH {
        return Err(SolveError::unsupported(var, "equation nests too deeply"));
    }

    match expr {
        Expr::Mul(_) | Expr::Pow(..) => solve_factors(expr, var, depth),
        _ => match as_fraction(expr, var) {
            Some((numer, denom)) => solve_fraction(&numer, &denom, var),
            None => invert::solve_inverted(expr, var, depth),
        },
    }
}

/// A product is zero when one of its numerator factors is, provided no
/// denominator factor vanishes there.
fn solve_factors(expr: &Expr, var: &str, depth: usize) -> Result<Vec<Expr>, SolveError> {
    let mut roots = Vec::new();
    let mut denominators = Vec::new();

    for factor in expr.factors() {
        if !factor.contains_symbol(var) {
            continue;
        }
        match &factor {
            Expr::Pow(_, exp) if exp.contains_symbol(var) => {
                roots.extend(invert::solve_inverted(&factor, var, depth + 1)?);
            }
            Expr::Pow(base, exp) => {
                if exp.as_number().is_some_and(Signed::is_negative) {
                    denominators.push((**base).clone());
                } else {
                    roots.extend(solve_in(base, var, depth + 1)?);
                }
            }
            _ => roots.extend(solve_in(&factor, var, depth + 1)?),
        }
    }

    roots.retain(|root| {
        denominators
            .iter()
            .all(|d| !vanishes_at(d, var, root))
    });
    Ok(roots)
}

fn solve_fraction(numer: &Expr, denom: &Expr, var: &str) -> Result<Vec<Expr>, SolveError> {
    let Some(poly) = Poly::from_expanded(&numer.expand(), var) else {
        return Err(SolveError::unsupported(var, "numerator is not polynomial"));
    };
    let mut roots = polynomial::roots(&poly, var)?;
    if denom.contains_symbol(var) {
        roots.retain(|root| !vanishes_at(denom, var, root));
    }
    Ok(roots)
}

/// True when `expr` is exactly zero at `var = value`.
pub(crate) fn vanishes_at(expr: &Expr, var: &str, value: &Expr) -> bool {
    expr.substitute(var, value).expand().is_zero()
}

/// Real numeric value used for ordering, when the root has one.
fn real_value(root: &Expr) -> Option<f64> {
    if root.contains_imaginary() || !root.is_numeric() {
        return None;
    }
    root.to_f64()
}

fn order_roots(roots: Vec<Expr>) -> Vec<Expr> {
    let mut keyed: Vec<(Option<f64>, String, Expr)> = Vec::with_capacity(roots.len());
    for root in roots.into_iter().filter(Expr::is_finite) {
        let text = root.to_string();
        if keyed.iter().any(|(_, seen, _)| *seen == text) {
            continue;
        }
        keyed.push((real_value(&root), text, root));
    }
    keyed.sort_by(|(va, ta, _), (vb, tb, _)| match (va, vb) {
        (Some(a), Some(b)) => a.total_cmp(b).then_with(|| ta.cmp(tb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => ta.cmp(tb),
    });
    keyed.into_iter().map(|(_, _, root)| root).collect()
}
