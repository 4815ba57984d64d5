//! Rational functions of the model parameters: the coefficient field of
//! symbolic factorizations (`tau = b/c`, `wn^2 = c/a`, ...).

use core::fmt;
use std::collections::BTreeSet;

use lti_core::{Bindings, LtiError, LtiResult, Symbol};
use num_traits::{One, Zero};

use crate::mpoly::MPoly;
use crate::poly::{Coefficient, FieldCoefficient};
use crate::rational::{ExactBindings, Rational};

/// `num / den` with `den` never identically zero.
///
/// The representation is lightly normalised (constant denominators folded,
/// common monomials and numeric content cancelled, exact divisions
/// performed) but not canonical; equality is decided by cross
/// multiplication.
#[derive(Clone, Debug)]
pub struct RatFunc {
    num: MPoly,
    den: MPoly,
}

impl RatFunc {
    pub fn new(num: MPoly, den: MPoly) -> LtiResult<Self> {
        if den.is_zero() {
            return Err(LtiError::DivisionByZero {
                what: "rational function",
            });
        }
        Ok(Self::normalized(num, den))
    }

    pub fn from_poly(num: MPoly) -> Self {
        Self {
            num,
            den: MPoly::one(),
        }
    }

    pub fn constant(c: Rational) -> Self {
        Self::from_poly(MPoly::constant(c))
    }

    pub fn symbol(name: &str) -> Self {
        Self::from_poly(MPoly::symbol(name))
    }

    pub fn numer(&self) -> &MPoly {
        &self.num
    }

    pub fn denom(&self) -> &MPoly {
        &self.den
    }

    pub fn as_constant(&self) -> Option<Rational> {
        let n = self.num.as_constant()?;
        let d = self.den.as_constant()?;
        Some(n / d)
    }

    /// The numerator when the denominator is one.
    pub fn as_poly(&self) -> Option<&MPoly> {
        self.den.is_one_poly().then_some(&self.num)
    }

    fn normalized(num: MPoly, den: MPoly) -> Self {
        if num.is_zero() {
            return Self::zero();
        }
        if let Some(c) = den.as_constant() {
            return Self::from_poly(num.scale(&c.recip()));
        }
        if let Some(q) = num.div_exact(&den) {
            return Self::from_poly(q);
        }
        // cancel common monomials and numeric content
        let mono = num.monomial_content().gcd(&den.monomial_content());
        let (mut num, mut den) = if mono.is_one() {
            (num, den)
        } else {
            (
                num.div_exact(&MPoly::term(Rational::one(), mono.clone()))
                    .unwrap_or(num),
                den.div_exact(&MPoly::term(Rational::one(), mono))
                    .unwrap_or(den),
            )
        };
        let mut scale = den.numeric_content();
        if den.leading_is_negative() {
            scale = -scale;
        }
        if !scale.is_zero() {
            let inv = scale.recip();
            num = num.scale(&inv);
            den = den.scale(&inv);
        }
        if let Some(q) = den.div_exact(&num) {
            if !num.is_constant() {
                return Self {
                    num: MPoly::one(),
                    den: q,
                };
            }
        }
        Self { num, den }
    }

    pub fn checked_div(&self, rhs: &RatFunc) -> LtiResult<RatFunc> {
        RatFunc::new(&self.num * &rhs.den, &self.den * &rhs.num)
    }

    pub fn inv(&self) -> LtiResult<RatFunc> {
        RatFunc::new(self.den.clone(), self.num.clone())
    }

    pub fn pow(&self, k: u32) -> RatFunc {
        Self::normalized(self.num.pow(k), self.den.pow(k))
    }

    pub fn eval(&self, bindings: &Bindings) -> LtiResult<f64> {
        let d = self.den.eval(bindings)?;
        if d == 0.0 {
            return Err(LtiError::DivisionByZero {
                what: "rational function evaluation",
            });
        }
        Ok(self.num.eval(bindings)? / d)
    }

    pub fn subs(&self, bindings: &ExactBindings) -> LtiResult<RatFunc> {
        RatFunc::new(self.num.subs(bindings), self.den.subs(bindings))
    }

    pub fn is_free_of_symbols(&self) -> bool {
        self.as_constant().is_some()
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        let mut out = self.num.symbols();
        out.extend(self.den.symbols());
        out
    }

    /// The value of a parameter-free function, or `UnboundSymbol` naming a
    /// parameter that is still present.
    pub fn require_constant(&self) -> LtiResult<Rational> {
        self.as_constant().ok_or_else(|| LtiError::UnboundSymbol {
            name: self
                .symbols()
                .into_iter()
                .next()
                .map_or_else(String::new, |s| s.name().to_string()),
        })
    }
}

trait IsOnePoly {
    fn is_one_poly(&self) -> bool;
}

impl IsOnePoly for MPoly {
    fn is_one_poly(&self) -> bool {
        self.as_constant().is_some_and(|c| c.is_one())
    }
}

impl PartialEq for RatFunc {
    fn eq(&self, other: &Self) -> bool {
        (&(&self.num * &other.den) - &(&other.num * &self.den)).is_zero()
    }
}

impl Zero for RatFunc {
    fn zero() -> Self {
        Self::from_poly(MPoly::zero())
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl One for RatFunc {
    fn one() -> Self {
        Self::from_poly(MPoly::one())
    }
}

impl Coefficient for RatFunc {
    fn from_i64(v: i64) -> Self {
        Self::from_poly(MPoly::from_int(v))
    }
}

impl FieldCoefficient for RatFunc {
    fn try_inv(&self) -> Option<Self> {
        self.inv().ok()
    }
}

impl From<MPoly> for RatFunc {
    fn from(p: MPoly) -> Self {
        Self::from_poly(p)
    }
}

impl From<Rational> for RatFunc {
    fn from(c: Rational) -> Self {
        Self::constant(c)
    }
}

impl From<i64> for RatFunc {
    fn from(c: i64) -> Self {
        Self::from_poly(MPoly::from_int(c))
    }
}

impl<'a, 'b> core::ops::Add<&'b RatFunc> for &'a RatFunc {
    type Output = RatFunc;
    fn add(self, rhs: &'b RatFunc) -> RatFunc {
        if self.den == rhs.den {
            return RatFunc::normalized(&self.num + &rhs.num, self.den.clone());
        }
        RatFunc::normalized(
            &(&self.num * &rhs.den) + &(&rhs.num * &self.den),
            &self.den * &rhs.den,
        )
    }
}

impl<'a, 'b> core::ops::Sub<&'b RatFunc> for &'a RatFunc {
    type Output = RatFunc;
    fn sub(self, rhs: &'b RatFunc) -> RatFunc {
        self + &(-rhs)
    }
}

impl<'a, 'b> core::ops::Mul<&'b RatFunc> for &'a RatFunc {
    type Output = RatFunc;
    fn mul(self, rhs: &'b RatFunc) -> RatFunc {
        RatFunc::normalized(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

forward_binop!(impl Add, add for RatFunc);
forward_binop!(impl Sub, sub for RatFunc);
forward_binop!(impl Mul, mul for RatFunc);

impl core::ops::Neg for &RatFunc {
    type Output = RatFunc;
    fn neg(self) -> RatFunc {
        RatFunc {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl core::ops::Neg for RatFunc {
    type Output = RatFunc;
    fn neg(self) -> RatFunc {
        -&self
    }
}

fn wrap(p: &MPoly) -> String {
    if p.num_terms() > 1 {
        format!("({p})")
    } else {
        p.to_string()
    }
}

impl fmt::Display for RatFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one_poly() {
            return write!(f, "{}", self.num);
        }
        // a single-term denominator with a numeric factor reads better as
        // `2/(3*c)` than `2/3*c`
        let den = match self.den.terms().next() {
            Some((m, c)) if self.den.num_terms() == 1 && !m.is_one() && !c.is_one() => {
                format!("({})", self.den)
            }
            _ => wrap(&self.den),
        };
        write!(f, "{}/{}", wrap(&self.num), den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::{rat, ratio};

    fn s(name: &str) -> RatFunc {
        RatFunc::symbol(name)
    }

    #[test]
    fn constants_fold_into_numerator() {
        let r = RatFunc::new(MPoly::symbol("a"), MPoly::from_int(2)).unwrap();
        assert_eq!(r.as_poly(), Some(&MPoly::symbol("a").scale(&ratio(1, 2))));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert!(RatFunc::new(MPoly::one(), MPoly::zero()).is_err());
        assert!(s("a").checked_div(&RatFunc::zero()).is_err());
    }

    #[test]
    fn equality_is_by_cross_multiplication() {
        let lhs = s("a").checked_div(&s("b")).unwrap();
        let rhs = RatFunc::new(
            MPoly::symbol("a").scale(&rat(2)),
            MPoly::symbol("b").scale(&rat(2)),
        )
        .unwrap();
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, s("b").checked_div(&s("a")).unwrap());
    }

    #[test]
    fn field_arithmetic() {
        // a/b + c/b = (a + c)/b
        let b = s("b");
        let x = &s("a").checked_div(&b).unwrap() + &s("c").checked_div(&b).unwrap();
        let expected = (&s("a") + &s("c")).checked_div(&b).unwrap();
        assert_eq!(x, expected);
        let y = &x * &b;
        assert_eq!(y.as_poly(), Some(&(&MPoly::symbol("a") + &MPoly::symbol("c"))));
    }

    #[test]
    fn common_factors_cancel() {
        // (a*b)/(a*c) = b/c
        let r = RatFunc::new(
            &MPoly::symbol("a") * &MPoly::symbol("b"),
            &MPoly::symbol("a") * &MPoly::symbol("c"),
        )
        .unwrap();
        assert_eq!(r.numer(), &MPoly::symbol("b"));
        assert_eq!(r.denom(), &MPoly::symbol("c"));
        assert_eq!(r.to_string(), "b/c");
    }

    #[test]
    fn constant_value_or_the_missing_symbol() {
        assert_eq!(RatFunc::from(3).require_constant().unwrap(), rat(3));
        let err = s("k").checked_div(&RatFunc::from(2)).unwrap().require_constant();
        assert_eq!(
            err.unwrap_err(),
            LtiError::UnboundSymbol {
                name: "k".to_string()
            }
        );
    }

    #[test]
    fn display_fraction() {
        let r = RatFunc::new(MPoly::from_int(2), MPoly::symbol("c")).unwrap();
        assert_eq!(r.to_string(), "2/c");
        let env = Bindings::new().with("c", 4.0);
        assert_eq!(r.eval(&env).unwrap(), 0.5);
    }
}
