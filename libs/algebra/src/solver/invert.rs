use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use super::polynomial::{MAX_ROOT_COUNT, nth_roots};
use super::solve_in;
use crate::error::SolveError;
use crate::expr::{Expr, Func};
use crate::numeric::{self, Rational};

/// Range of integer exponents tried when `b^u = c` might have an exact answer.
const EXACT_LOG_RANGE: i64 = 64;
/// Residual below which a numeric candidate counts as a root.
const TOLERANCE: f64 = 1e-9;

/// Solves equations with exactly one term depending on `var` by undoing the
/// outermost operation of that term: `sin(u) = c` becomes `u = asin(c)` and
/// `u = pi - asin(c)`, and so on.
pub(super) fn solve_inverted(expr: &Expr, var: &str, depth: usize) -> Result<Vec<Expr>, SolveError> {
    let (dependent, independent): (Vec<Expr>, Vec<Expr>) =
        expr.terms().into_iter().partition(|t| t.contains_symbol(var));
    let [term] = dependent.as_slice() else {
        return Err(SolveError::unsupported(
            var,
            "several transcendental terms depend on the variable",
        ));
    };

    let (inner, scale): (Vec<Expr>, Vec<Expr>) = term
        .factors()
        .into_iter()
        .partition(|f| f.contains_symbol(var));
    let [inner] = inner.as_slice() else {
        return Err(SolveError::unsupported(
            var,
            "product of transcendental factors",
        ));
    };

    let target = -Expr::sum(independent) / Expr::product(scale);
    let mut roots = Vec::new();
    for (arg, value) in undo(inner, &target, var)? {
        roots.extend(solve_in(&(arg - value), var, depth + 1)?);
    }
    roots.retain(|root| satisfies(expr, var, root));
    Ok(roots)
}

/// Pairs `(u, v)` such that `inner = target` holds exactly when one of `u = v` does.
fn undo(inner: &Expr, target: &Expr, var: &str) -> Result<Vec<(Expr, Expr)>, SolveError> {
    let pairs = match inner {
        Expr::Pow(base, exp) if !exp.contains_symbol(var) => power_branches(target, exp)
            .into_iter()
            .map(|value| ((**base).clone(), value))
            .collect(),
        Expr::Pow(base, exp) if !base.contains_symbol(var) => {
            if target.is_zero() {
                return Ok(Vec::new());
            }
            vec![((**exp).clone(), logarithm(target, base))]
        }
        Expr::Function(func, arg) => {
            let arg = (**arg).clone();
            let t = target.clone();
            match func {
                Func::Exp => {
                    if t.is_zero() {
                        return Ok(Vec::new());
                    }
                    vec![(arg, Expr::apply(Func::Log, t))]
                }
                Func::Log => vec![(arg, Expr::apply(Func::Exp, t))],
                Func::Sin => {
                    let principal = Expr::apply(Func::Asin, t);
                    vec![
                        (arg.clone(), principal.clone()),
                        (arg, Expr::pi() - principal),
                    ]
                }
                Func::Cos => {
                    let principal = Expr::apply(Func::Acos, t);
                    vec![
                        (arg.clone(), principal.clone()),
                        (arg, Expr::integer(2) * Expr::pi() - principal),
                    ]
                }
                Func::Tan => vec![(arg, Expr::apply(Func::Atan, t))],
                Func::Asin => vec![(arg, Expr::apply(Func::Sin, t))],
                Func::Acos => vec![(arg, Expr::apply(Func::Cos, t))],
                Func::Atan => vec![(arg, Expr::apply(Func::Tan, t))],
                Func::Sinh | Func::Cosh | Func::Tanh | Func::Abs => {
                    return Err(SolveError::unsupported(
                        var,
                        format!("cannot invert {}", func.name()),
                    ));
                }
            }
        }
        Expr::Symbol(_) | Expr::Add(_) => vec![(inner.clone(), target.clone())],
        _ => {
            return Err(SolveError::unsupported(
                var,
                "variable appears in both base and exponent",
            ));
        }
    };
    Ok(pairs)
}

/// Candidates for `u` in `u^exp = target`.
///
/// For a rational `p/q` every `p`-th root `w` of the target gives `u = w^q`;
/// principal-root mismatches are dropped later by [`satisfies`].
fn power_branches(target: &Expr, exp: &Expr) -> Vec<Expr> {
    if let Some(exp) = exp.as_number()
        && let Some(p) = exp.numer().abs().to_u32()
        && (1..=MAX_ROOT_COUNT).contains(&p)
    {
        let value = if exp.is_negative() {
            if target.is_zero() {
                return Vec::new();
            }
            Expr::one() / target.clone()
        } else {
            target.clone()
        };
        let q = Expr::Number(Rational::from_integer(exp.denom().clone()));
        return nth_roots(&value, p)
            .into_iter()
            .map(|w| w.pow(q.clone()))
            .collect();
    }
    vec![target.clone().pow(Expr::one() / exp.clone())]
}

/// `log(value) / log(base)`, or the exact integer exponent when there is one.
fn logarithm(value: &Expr, base: &Expr) -> Expr {
    if let (Some(b), Some(v)) = (base.as_number(), value.as_number())
        && b.is_positive()
        && v.is_positive()
        && let Some(k) = (-EXACT_LOG_RANGE..=EXACT_LOG_RANGE)
            .find(|k| numeric::checked_pow(b, &BigInt::from(*k)).as_ref() == Some(v))
    {
        return Expr::integer(k);
    }
    Expr::apply(Func::Log, value.clone()) / Expr::apply(Func::Log, base.clone())
}

/// Rejects candidates that numerically miss, like `x = 1` for `sqrt(x) + 1 = 0`.
/// Candidates whose residual cannot be evaluated are kept, unless it is
/// `zoo` or `nan`.
fn satisfies(expr: &Expr, var: &str, root: &Expr) -> bool {
    let residual = expr.substitute(var, root);
    if !residual.is_finite() {
        return false;
    }
    if residual.expand().is_zero() {
        return true;
    }
    match residual.to_f64() {
        Some(residual) => residual.abs() < TOLERANCE,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::solver::solve;

    fn roots_of(source: &str) -> Vec<String> {
        let expr = parse(source).unwrap();
        solve(&expr, "x")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_trigonometric() {
        assert_eq!(roots_of("sin(x)"), vec!["0", "pi"]);
        assert_eq!(roots_of("cos(x)"), vec!["pi/2", "3*pi/2"]);
        assert_eq!(roots_of("2sin(x) - 1"), vec!["pi/6", "5*pi/6"]);
    }

    #[test]
    fn test_exponential_and_logarithm() {
        assert_eq!(roots_of("2^x - 8"), vec!["3"]);
        assert_eq!(roots_of("exp(x) - 1"), vec!["0"]);
        assert_eq!(roots_of("log(x) - 1"), vec!["E"]);
        assert!(roots_of("exp(x)").is_empty());
    }

    #[test]
    fn test_even_powers_keep_both_signs() {
        assert_eq!(roots_of("log(x)^2 - 1"), vec!["exp(-1)", "E"]);
        assert_eq!(roots_of("cos(x)^2 - 1"), vec!["0", "pi", "2*pi"]);
        assert_eq!(
            roots_of("sin(x)^2 - 1/4"),
            vec!["-pi/6", "pi/6", "5*pi/6", "7*pi/6"]
        );
    }

    #[test]
    fn test_negative_power_of_a_transcendental_term() {
        assert_eq!(roots_of("log(x)^(-2) - 1"), vec!["exp(-1)", "E"]);
    }

    #[test]
    fn test_radicals_are_checked() {
        assert_eq!(roots_of("sqrt(x) - 3"), vec!["9"]);
        assert!(roots_of("sqrt(x) + 1").is_empty());
    }

    #[test]
    fn test_mixed_terms_are_unsupported() {
        let expr = parse("x + sin(x)").unwrap();
        assert!(crate::solver::solve(&expr, "x").is_err());
    }
}
