//! Exact rational helpers on top of `num-rational`.

use std::collections::BTreeMap;

use lti_core::{Bindings, LtiError, Symbol};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{AlgebraError, AlgebraResult};

/// Exact rational number.
pub type Rational = BigRational;

/// Exact values for free parameters.
pub type ExactBindings = BTreeMap<Symbol, Rational>;

/// Integer as a rational.
pub fn rat(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

/// `n / d` as a rational. `d` must be non-zero.
pub fn ratio(n: i64, d: i64) -> Rational {
    Rational::new(BigInt::from(n), BigInt::from(d))
}

/// Exact binary value of a finite float.
pub fn from_f64(value: f64, what: &'static str) -> AlgebraResult<Rational> {
    Rational::from_float(value).ok_or(AlgebraError::Core(LtiError::NonFinite { what, value }))
}

/// Nearest float to a rational, scaling huge numerators/denominators so the
/// division does not overflow.
pub fn to_f64(q: &Rational) -> f64 {
    let n = q.numer();
    let d = q.denom();
    if let (Some(nf), Some(df)) = (n.to_f64(), d.to_f64()) {
        if nf.is_finite() && df.is_finite() {
            return nf / df;
        }
    }
    let shift = n.bits().max(d.bits()).saturating_sub(1000);
    let nf = (n >> shift).to_f64().unwrap_or(f64::NAN);
    let df = (d >> shift).to_f64().unwrap_or(f64::NAN);
    nf / df
}

/// Converts float bindings to exact ones (every value is taken at its exact
/// binary value).
pub fn exact_bindings(bindings: &Bindings) -> AlgebraResult<ExactBindings> {
    bindings
        .iter()
        .map(|(sym, value)| Ok((sym.clone(), from_f64(value, "parameter binding")?)))
        .collect()
}

pub(crate) fn big_gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Greatest common divisor of two rationals: the largest `g` such that both
/// `a / g` and `b / g` are integers. Always non-negative.
pub fn rational_gcd(a: &Rational, b: &Rational) -> Rational {
    if a.is_zero() {
        return b.abs();
    }
    if b.is_zero() {
        return a.abs();
    }
    let num = big_gcd(a.numer(), b.numer());
    let den_gcd = big_gcd(a.denom(), b.denom());
    let den = a.denom() / &den_gcd * b.denom();
    Rational::new(num, den)
}

/// Exact square root of a non-negative rational, if it is a perfect square.
pub fn rational_sqrt(q: &Rational) -> Option<Rational> {
    if q.is_negative() {
        return None;
    }
    let n = q.numer().sqrt();
    let d = q.denom().sqrt();
    if &(&n * &n) == q.numer() && &(&d * &d) == q.denom() {
        Some(Rational::new(n, d))
    } else {
        None
    }
}

/// Writes `√q` as `c·√r` with `r` an integer free of small square factors.
///
/// The sign of `q` is kept in `r`, so a negative `q` gives a negative radicand.
pub fn split_radicand(q: &Rational) -> (Rational, BigInt) {
    if q.is_zero() {
        return (Rational::zero(), BigInt::zero());
    }
    // √(p/d) = √(p·d) / d
    let negative = q.is_negative();
    let mut rest = (q.numer() * q.denom()).abs();
    let mut outside = BigInt::one();
    let mut f = BigInt::from(2);
    let limit = BigInt::from(100_000);
    while &f * &f <= rest && f <= limit {
        let square = &f * &f;
        while (&rest % &square).is_zero() {
            rest /= &square;
            outside *= &f;
        }
        f += 1;
    }
    let coeff = Rational::new(outside, q.denom().clone());
    if negative { (coeff, -rest) } else { (coeff, rest) }
}

/// Best rational approximation of `x` by continued fractions with the
/// denominator bounded by `max_den`.
///
/// Returns `None` for non-finite input or when no convergent is within
/// `rel_tol` of `x`.
pub fn approximate(x: f64, max_den: i128, rel_tol: f64) -> Option<Rational> {
    if !x.is_finite() {
        return None;
    }
    let scale = x.abs().max(1.0);
    let (mut p0, mut q0, mut p1, mut q1) = (0_i128, 1_i128, 1_i128, 0_i128);
    let mut rem = x;
    let mut best = None;
    for _ in 0..64 {
        let a = rem.floor();
        if a.abs() > 1e18 {
            break;
        }
        let ai = a as i128;
        let p2 = ai.checked_mul(p1)?.checked_add(p0)?;
        let q2 = ai.checked_mul(q1)?.checked_add(q0)?;
        if q2 > max_den {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p2, q2);
        let value = p1 as f64 / q1 as f64;
        if (value - x).abs() <= rel_tol * scale {
            best = Some(Rational::new(BigInt::from(p1), BigInt::from(q1)));
            break;
        }
        let frac = rem - a;
        if frac.abs() < 1e-300 {
            break;
        }
        rem = 1.0 / frac;
    }
    best
}
