//! Quadratic surds over the parameter field, `a + b·√d` with `a`, `b` and
//! `d` rational functions of the model parameters.
//!
//! These are the roots of parametric quadratics such as `m s² + c s + k`,
//! so poles and eigenvalues keep their symbolic form until the parameters
//! are bound.

use core::fmt;
use std::collections::BTreeSet;

use lti_core::{Bindings, LtiResult, Symbol};
use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::poly::{Coefficient, FieldCoefficient};
use crate::ratfunc::RatFunc;
use crate::rational::{ExactBindings, Rational};
use crate::surd::Surd;

/// Element of `Q(params)(√d)`.
///
/// As with [`Surd`], arithmetic between two irrational values assumes they
/// share the same radicand; values with `b = 0` carry no radicand.
#[derive(Clone, Debug)]
pub struct ParamSurd {
    a: RatFunc,
    b: RatFunc,
    d: RatFunc,
}

impl ParamSurd {
    pub fn new(a: RatFunc, b: RatFunc, d: RatFunc) -> Self {
        if b.is_zero() || d.is_zero() {
            return Self::rational(a);
        }
        Self { a, b, d }
    }

    pub fn rational(a: RatFunc) -> Self {
        Self {
            a,
            b: RatFunc::zero(),
            d: RatFunc::zero(),
        }
    }

    /// `√d`, rational when numerator and denominator are perfect squares.
    pub fn sqrt(d: &RatFunc) -> Self {
        if let (Some(n), Some(m)) = (d.numer().sqrt_exact(), d.denom().sqrt_exact()) {
            if let Ok(root) = RatFunc::new(n, m) {
                return Self::rational(root);
            }
        }
        Self::new(RatFunc::zero(), RatFunc::one(), d.clone())
    }

    /// Roots of `a2 s² + a1 s + a0`, `+√` first.
    pub fn quadratic_roots(a2: &RatFunc, a1: &RatFunc, a0: &RatFunc) -> LtiResult<[ParamSurd; 2]> {
        let two_a = a2 * &RatFunc::from(2);
        let center = (-a1).checked_div(&two_a)?;
        let disc = &(a1 * a1) - &(&(a2 * a0) * &RatFunc::from(4));
        let root = ParamSurd::sqrt(&disc.checked_div(&(&two_a * &two_a))?);
        let c = ParamSurd::rational(center);
        Ok([&c + &root, &c - &root])
    }

    pub fn a(&self) -> &RatFunc {
        &self.a
    }

    pub fn b(&self) -> &RatFunc {
        &self.b
    }

    pub fn radicand(&self) -> &RatFunc {
        &self.d
    }

    pub fn as_rational(&self) -> Option<&RatFunc> {
        self.b.is_zero().then_some(&self.a)
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        let mut out = self.a.symbols();
        if !self.b.is_zero() {
            out.extend(self.b.symbols());
            out.extend(self.d.symbols());
        }
        out
    }

    /// The exact value once no parameter is left.
    pub fn to_surd(&self) -> Option<Surd> {
        let a = Surd::rational(self.a.as_constant()?);
        if self.b.is_zero() {
            return Some(a);
        }
        let b = Surd::rational(self.b.as_constant()?);
        let root = Surd::sqrt(&self.d.as_constant()?);
        Some(&a + &(&b * &root))
    }

    /// Exact substitution; parameters without a value stay symbolic.
    pub fn subs(&self, bindings: &ExactBindings) -> LtiResult<ParamSurd> {
        if self.b.is_zero() {
            return Ok(Self::rational(self.a.subs(bindings)?));
        }
        Ok(Self::new(
            self.a.subs(bindings)?,
            self.b.subs(bindings)?,
            self.d.subs(bindings)?,
        ))
    }

    pub fn eval(&self, bindings: &Bindings) -> LtiResult<Complex64> {
        let a = Complex64::new(self.a.eval(bindings)?, 0.0);
        if self.b.is_zero() {
            return Ok(a);
        }
        let b = self.b.eval(bindings)?;
        let d = self.d.eval(bindings)?;
        let root = if d >= 0.0 {
            Complex64::new(d.sqrt(), 0.0)
        } else {
            Complex64::new(0.0, (-d).sqrt())
        };
        Ok(a + root * b)
    }

    fn norm(&self) -> RatFunc {
        &(&self.a * &self.a) - &(&(&self.b * &self.b) * &self.d)
    }

    fn join_radicand(&self, other: &ParamSurd) -> RatFunc {
        if self.b.is_zero() {
            other.d.clone()
        } else {
            self.d.clone()
        }
    }
}

impl PartialEq for ParamSurd {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b && (self.b.is_zero() || self.d == other.d)
    }
}

impl From<RatFunc> for ParamSurd {
    fn from(a: RatFunc) -> Self {
        Self::rational(a)
    }
}

impl From<&Surd> for ParamSurd {
    fn from(s: &Surd) -> Self {
        let d = Rational::from_integer(s.radicand().clone());
        Self::new(
            RatFunc::constant(s.a().clone()),
            RatFunc::constant(s.b().clone()),
            RatFunc::constant(d),
        )
    }
}

impl<'a, 'b> core::ops::Add<&'b ParamSurd> for &'a ParamSurd {
    type Output = ParamSurd;
    fn add(self, rhs: &'b ParamSurd) -> ParamSurd {
        let d = self.join_radicand(rhs);
        ParamSurd::new(&self.a + &rhs.a, &self.b + &rhs.b, d)
    }
}

impl<'a, 'b> core::ops::Sub<&'b ParamSurd> for &'a ParamSurd {
    type Output = ParamSurd;
    fn sub(self, rhs: &'b ParamSurd) -> ParamSurd {
        let d = self.join_radicand(rhs);
        ParamSurd::new(&self.a - &rhs.a, &self.b - &rhs.b, d)
    }
}

impl<'a, 'b> core::ops::Mul<&'b ParamSurd> for &'a ParamSurd {
    type Output = ParamSurd;
    fn mul(self, rhs: &'b ParamSurd) -> ParamSurd {
        let d = self.join_radicand(rhs);
        let a = &(&self.a * &rhs.a) + &(&(&self.b * &rhs.b) * &d);
        let b = &(&self.a * &rhs.b) + &(&self.b * &rhs.a);
        ParamSurd::new(a, b, d)
    }
}

forward_binop!(impl Add, add for ParamSurd);
forward_binop!(impl Sub, sub for ParamSurd);
forward_binop!(impl Mul, mul for ParamSurd);

impl core::ops::Neg for &ParamSurd {
    type Output = ParamSurd;
    fn neg(self) -> ParamSurd {
        ParamSurd::new(-&self.a, -&self.b, self.d.clone())
    }
}

impl core::ops::Neg for ParamSurd {
    type Output = ParamSurd;
    fn neg(self) -> ParamSurd {
        -&self
    }
}

impl Zero for ParamSurd {
    fn zero() -> Self {
        Self::rational(RatFunc::zero())
    }

    fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }
}

impl One for ParamSurd {
    fn one() -> Self {
        Self::rational(RatFunc::one())
    }
}

impl Coefficient for ParamSurd {
    fn from_i64(v: i64) -> Self {
        Self::rational(RatFunc::from(v))
    }
}

impl FieldCoefficient for ParamSurd {
    fn try_inv(&self) -> Option<Self> {
        let n = self.norm();
        if n.is_zero() {
            return None;
        }
        let a = self.a.checked_div(&n).ok()?;
        let b = (-&self.b).checked_div(&n).ok()?;
        Some(ParamSurd::new(a, b, self.d.clone()))
    }
}

fn paren(x: &RatFunc) -> String {
    let text = x.to_string();
    if x.as_poly().is_some_and(|p| p.num_terms() <= 1) && !text.contains('/') {
        text
    } else {
        format!("({text})")
    }
}

impl fmt::Display for ParamSurd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.b.is_zero() {
            return write!(f, "{}", self.a);
        }
        let root = format!("sqrt({})", self.d);
        let irr = if self.b.is_one() {
            root
        } else if (-&self.b).is_one() {
            format!("-{root}")
        } else {
            format!("{}*{root}", paren(&self.b))
        };
        if self.a.is_zero() {
            f.write_str(&irr)
        } else {
            write!(f, "{} + {irr}", self.a)
        }
    }
}
