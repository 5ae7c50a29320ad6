//! Arithmetic operators on [`Expr`], all routed through the canonical constructors.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::expr::Expr;

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum([self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs])
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::product([self, Expr::power(rhs, Expr::integer(-1))])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::product([Expr::integer(-1), self])
    }
}

impl Expr {
    #[must_use]
    pub fn pow(self, exp: Expr) -> Expr {
        Expr::power(self, exp)
    }

    #[must_use]
    pub fn sqrt(self) -> Expr {
        Expr::power(self, Expr::rational(1, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_canonicalize() {
        let x = Expr::symbol("x");
        assert_eq!(x.clone() - x.clone(), Expr::zero());
        assert_eq!(x.clone() / x.clone(), Expr::one());
        assert_eq!(-(-x.clone()), x);
        assert_eq!(Expr::integer(6) / Expr::integer(4), Expr::rational(3, 2));
    }
}
