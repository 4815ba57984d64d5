//! Quadratic surds `a + b·√d` with rational `a`, `b` and integer radicand `d`.
//!
//! These hold the exact roots of rational quadratics, so eigenvalues and
//! eigenvectors of rational matrices with factors of degree at most two stay
//! exact. A negative radicand gives complex values.

use core::cmp::Ordering;
use core::fmt;

use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::poly::{Coefficient, FieldCoefficient};
use crate::rational::{Rational, rat, split_radicand, to_f64};

/// Element of `Q(√d)`.
///
/// Values with `b = 0` are stored with `d = 0`, so rationals compare equal
/// whatever radicand they came from. Arithmetic between two irrational
/// values assumes they share the same radicand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Surd {
    a: Rational,
    b: Rational,
    d: BigInt,
}

impl Surd {
    pub fn new(a: Rational, b: Rational, d: BigInt) -> Self {
        if b.is_zero() || d.is_zero() {
            return Self::rational(a);
        }
        if d.is_one() {
            return Self::rational(a + b);
        }
        Self { a, b, d }
    }

    pub fn rational(a: Rational) -> Self {
        Self {
            a,
            b: Rational::zero(),
            d: BigInt::zero(),
        }
    }

    /// `√q` with the radicand reduced.
    pub fn sqrt(q: &Rational) -> Self {
        let (coeff, radicand) = split_radicand(q);
        Self::new(Rational::zero(), coeff, radicand)
    }

    /// Roots of the monic quadratic `s² + beta·s + gamma`, `+√` first.
    pub fn quadratic_roots(beta: &Rational, gamma: &Rational) -> [Surd; 2] {
        let center = -beta / rat(2);
        let disc = &center * &center - gamma;
        let root = Surd::sqrt(&disc);
        let c = Surd::rational(center);
        [&c + &root, &c - &root]
    }

    pub fn a(&self) -> &Rational {
        &self.a
    }

    pub fn b(&self) -> &Rational {
        &self.b
    }

    pub fn radicand(&self) -> &BigInt {
        &self.d
    }

    pub fn as_rational(&self) -> Option<&Rational> {
        self.b.is_zero().then_some(&self.a)
    }

    pub fn is_real(&self) -> bool {
        self.b.is_zero() || self.d.is_positive()
    }

    /// The other root of the minimal polynomial, `a − b·√d`.
    pub fn galois_conj(&self) -> Surd {
        Self {
            a: self.a.clone(),
            b: -&self.b,
            d: self.d.clone(),
        }
    }

    /// Complex conjugate.
    pub fn conj(&self) -> Surd {
        if self.is_real() {
            self.clone()
        } else {
            self.galois_conj()
        }
    }

    /// Exact sign of the real part.
    pub fn real_sign(&self) -> Ordering {
        if !self.is_real() {
            return self.a.cmp(&Rational::zero());
        }
        let sa = self.a.cmp(&Rational::zero());
        let sb = self.b.cmp(&Rational::zero());
        if sb == Ordering::Equal || sa == sb {
            return sa;
        }
        // opposite signs: compare a² with b²·d
        let lhs = &self.a * &self.a;
        let rhs = &self.b * &self.b * Rational::from_integer(self.d.clone());
        match lhs.cmp(&rhs) {
            Ordering::Greater => sa,
            Ordering::Less => sb,
            Ordering::Equal => Ordering::Equal,
        }
    }

    pub fn to_complex(&self) -> Complex64 {
        let a = to_f64(&self.a);
        if self.b.is_zero() {
            return Complex64::new(a, 0.0);
        }
        let root = self.d.abs().to_f64().unwrap_or(f64::NAN).sqrt();
        let b = to_f64(&self.b) * root;
        if self.d.is_negative() {
            Complex64::new(a, b)
        } else {
            Complex64::new(a + b, 0.0)
        }
    }

    /// `a² − b²d`, the field norm.
    fn norm(&self) -> Rational {
        &self.a * &self.a - &self.b * &self.b * Rational::from_integer(self.d.clone())
    }

    fn join_radicand(&self, other: &Surd) -> BigInt {
        debug_assert!(
            self.b.is_zero() || other.b.is_zero() || self.d == other.d,
            "mixed radicands {} and {}",
            self.d,
            other.d
        );
        if self.b.is_zero() {
            other.d.clone()
        } else {
            self.d.clone()
        }
    }
}

impl From<Rational> for Surd {
    fn from(q: Rational) -> Self {
        Self::rational(q)
    }
}

impl From<&Rational> for Surd {
    fn from(q: &Rational) -> Self {
        Self::rational(q.clone())
    }
}

impl<'a, 'b> core::ops::Add<&'b Surd> for &'a Surd {
    type Output = Surd;
    fn add(self, rhs: &'b Surd) -> Surd {
        let d = self.join_radicand(rhs);
        Surd::new(&self.a + &rhs.a, &self.b + &rhs.b, d)
    }
}

impl<'a, 'b> core::ops::Sub<&'b Surd> for &'a Surd {
    type Output = Surd;
    fn sub(self, rhs: &'b Surd) -> Surd {
        let d = self.join_radicand(rhs);
        Surd::new(&self.a - &rhs.a, &self.b - &rhs.b, d)
    }
}

impl<'a, 'b> core::ops::Mul<&'b Surd> for &'a Surd {
    type Output = Surd;
    fn mul(self, rhs: &'b Surd) -> Surd {
        let d = self.join_radicand(rhs);
        let dq = Rational::from_integer(d.clone());
        let a = &self.a * &rhs.a + &self.b * &rhs.b * dq;
        let b = &self.a * &rhs.b + &self.b * &rhs.a;
        Surd::new(a, b, d)
    }
}

forward_binop!(impl Add, add for Surd);
forward_binop!(impl Sub, sub for Surd);
forward_binop!(impl Mul, mul for Surd);

impl core::ops::Neg for &Surd {
    type Output = Surd;
    fn neg(self) -> Surd {
        Surd::new(-&self.a, -&self.b, self.d.clone())
    }
}

impl core::ops::Neg for Surd {
    type Output = Surd;
    fn neg(self) -> Surd {
        -&self
    }
}

impl Zero for Surd {
    fn zero() -> Self {
        Self::rational(Rational::zero())
    }

    fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }
}

impl One for Surd {
    fn one() -> Self {
        Self::rational(Rational::one())
    }
}

impl Coefficient for Surd {
    fn from_i64(v: i64) -> Self {
        Self::rational(rat(v))
    }
}

impl FieldCoefficient for Surd {
    fn try_inv(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let n = self.norm();
        if n.is_zero() {
            return None;
        }
        Some(Surd::new(&self.a / &n, -&self.b / &n, self.d.clone()))
    }
}

fn fmt_rational(q: &Rational) -> String {
    if q.denom().is_one() {
        q.numer().to_string()
    } else {
        format!("{}/{}", q.numer(), q.denom())
    }
}

impl fmt::Display for Surd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.b.is_zero() {
            return f.write_str(&fmt_rational(&self.a));
        }
        let imaginary = self.d.is_negative();
        let d = self.d.abs();
        let mag = self.b.abs();
        let mut irr = if d.is_one() {
            fmt_rational(&mag)
        } else if mag.is_one() {
            format!("sqrt({d})")
        } else {
            format!("{}*sqrt({d})", fmt_rational(&mag))
        };
        if imaginary {
            irr.push('j');
        }
        let sign = if self.b.is_negative() { '-' } else { '+' };
        if self.a.is_zero() {
            if sign == '-' {
                write!(f, "-{irr}")
            } else {
                f.write_str(&irr)
            }
        } else {
            write!(f, "{} {sign} {irr}", fmt_rational(&self.a))
        }
    }
}
