//! Distribution of products over sums.

use num_traits::ToPrimitive;

use crate::expr::Expr;

/// Positive integer powers of sums above this stay unexpanded.
const MAX_EXPANDED_POWER: u32 = 32;

impl Expr {
    /// Multiplies out every product of sums and every small positive integer power
    /// of a sum, recursively.
    #[must_use]
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Add(terms) => Expr::sum(terms.iter().map(Expr::expand)),
            Expr::Mul(factors) => factors
                .iter()
                .map(Expr::expand)
                .fold(Expr::one(), |acc, factor| multiply_out(&acc, &factor)),
            Expr::Pow(base, exp) => {
                let base = base.expand();
                let exp = exp.expand();
                match (&base, small_power(&exp)) {
                    (Expr::Add(_), Some(n)) => {
                        let mut acc = base.clone();
                        for _ in 1..n {
                            acc = multiply_out(&acc, &base);
                        }
                        acc
                    }
                    _ => Expr::power(base, exp),
                }
            }
            Expr::Function(func, arg) => Expr::apply(*func, arg.expand()),
            Expr::Number(_) | Expr::Symbol(_) | Expr::Constant(_) => self.clone(),
        }
    }
}

fn small_power(exp: &Expr) -> Option<u32> {
    let n = exp.as_number()?;
    if !n.is_integer() {
        return None;
    }
    n.to_integer()
        .to_u32()
        .filter(|n| (2..=MAX_EXPANDED_POWER).contains(n))
}

/// Product of two already expanded expressions, distributed term by term.
fn multiply_out(lhs: &Expr, rhs: &Expr) -> Expr {
    let left = lhs.terms();
    let right = rhs.terms();
    if left.len() == 1 && right.len() == 1 {
        return Expr::product([lhs.clone(), rhs.clone()]);
    }
    let mut products = Vec::with_capacity(left.len() * right.len());
    for l in &left {
        for r in &right {
            // a term times a term may still yield a sum, e.g. 2*(x + 1)
            products.push(Expr::product([l.clone(), r.clone()]).expand_shallow());
        }
    }
    Expr::sum(products)
}

impl Expr {
    fn expand_shallow(self) -> Expr {
        match &self {
            Expr::Mul(factors) if factors.iter().any(|f| matches!(f, Expr::Add(_))) => {
                self.expand()
            }
            _ => self,
        }
    }
}
