//! Exact arithmetic helpers on big integers and rationals.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

pub type Rational = BigRational;

/// Largest exponent folded into an exact rational; bigger powers stay symbolic.
const MAX_FOLDED_EXPONENT: u64 = 512;
/// Bit budget for a folded power result.
const MAX_FOLDED_BITS: u64 = 16_384;
/// Trial-division bound used when pulling perfect powers out of radicands.
const TRIAL_DIVISION_LIMIT: u32 = 10_000;

pub fn rational(numer: i64, denom: i64) -> Rational {
    Rational::new(numer.into(), denom.into())
}

pub fn integer(value: i64) -> Rational {
    Rational::from_integer(value.into())
}

/// `base^exp` for an integer exponent, or `None` when the result is undefined
/// (`0^-n`) or would be unreasonably large.
pub fn checked_pow(base: &Rational, exp: &BigInt) -> Option<Rational> {
    let magnitude = exp.abs().to_u64()?;
    if magnitude > MAX_FOLDED_EXPONENT {
        return None;
    }
    let bits = base.numer().bits().max(base.denom().bits());
    if bits.saturating_mul(magnitude) > MAX_FOLDED_BITS {
        return None;
    }
    if base.is_zero() {
        return if exp.is_negative() {
            None
        } else {
            Some(Rational::zero())
        };
    }
    let count = usize::try_from(magnitude).ok()?;
    let raised = num_traits::pow(base.clone(), count);
    if exp.is_negative() {
        Some(raised.recip())
    } else {
        Some(raised)
    }
}

/// Exact `n`-th root of a non-negative integer, if it exists.
pub fn exact_root(value: &BigInt, n: u32) -> Option<BigInt> {
    if value.is_negative() {
        return None;
    }
    let root = value.nth_root(n);
    let count = usize::try_from(n).ok()?;
    (num_traits::pow(root.clone(), count) == *value).then_some(root)
}

/// Splits a positive integer into `(outside, inside)` with `value = outside^q * inside`,
/// pulling out every `q`-th power found by bounded trial division.
pub fn extract_power(value: &BigInt, q: u32) -> (BigInt, BigInt) {
    if let Some(root) = exact_root(value, q) {
        return (root, BigInt::one());
    }
    let Ok(exponent) = usize::try_from(q) else {
        return (BigInt::one(), value.clone());
    };

    let mut outside = BigInt::one();
    let mut rest = value.clone();
    let mut p: u32 = 2;
    while p <= TRIAL_DIVISION_LIMIT {
        let prime = BigInt::from(p);
        let prime_power = num_traits::pow(prime.clone(), exponent);
        if prime_power > rest {
            break;
        }
        while (&rest % &prime_power).is_zero() {
            rest /= &prime_power;
            outside *= &prime;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if let Some(root) = exact_root(&rest, q) {
        outside *= root;
        rest = BigInt::one();
    }
    (outside, rest)
}

/// Floor of a rational as a big integer.
pub fn floor(value: &Rational) -> BigInt {
    value.floor().to_integer()
}

/// Lossy conversion used for ordering and numeric checks only.
pub fn to_f64(value: &Rational) -> Option<f64> {
    let numer = value.numer().to_f64()?;
    let denom = value.denom().to_f64()?;
    let result = numer / denom;
    result.is_finite().then_some(result)
}

/// All positive divisors of `n`, or `None` when `n` is too large to enumerate.
pub fn divisors(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.abs().to_u64()?;
    if n == 0 || n > 1_000_000_000_000 {
        return None;
    }
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d: u64 = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(BigInt::from(d));
            if d * d != n {
                large.push(BigInt::from(Integer::div_floor(&n, &d)));
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}
