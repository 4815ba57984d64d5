//! Dense univariate polynomials in the Laplace variable.
//!
//! Coefficients are stored in increasing powers (`coeffs[k]` multiplies
//! `s^k`). The public constructors and `to_descending` use the control
//! convention of highest degree first.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use lti_core::Symbol;
use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::rational::{Rational, rat};

/// Ring the polynomial coefficients live in.
pub trait Coefficient:
    Clone
    + PartialEq
    + fmt::Debug
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    fn from_i64(v: i64) -> Self;
}

/// Coefficients with division, needed for monic normalisation, Euclidean
/// division and gcds.
pub trait FieldCoefficient: Coefficient {
    /// Multiplicative inverse, `None` for zero.
    fn try_inv(&self) -> Option<Self>;
}

impl Coefficient for f64 {
    fn from_i64(v: i64) -> Self {
        v as f64
    }
}

impl FieldCoefficient for f64 {
    fn try_inv(&self) -> Option<Self> {
        (*self != 0.0).then(|| 1.0 / self)
    }
}

impl Coefficient for Complex64 {
    fn from_i64(v: i64) -> Self {
        Complex64::new(v as f64, 0.0)
    }
}

impl FieldCoefficient for Complex64 {
    fn try_inv(&self) -> Option<Self> {
        (!self.is_zero()).then(|| self.inv())
    }
}

impl Coefficient for Rational {
    fn from_i64(v: i64) -> Self {
        rat(v)
    }
}

impl FieldCoefficient for Rational {
    fn try_inv(&self) -> Option<Self> {
        (!self.is_zero()).then(|| self.recip())
    }
}

/// Polynomial with coefficients in `T`, trimmed so the highest stored
/// coefficient is non-zero. The zero polynomial has no coefficients.
#[derive(Clone, PartialEq, Debug)]
pub struct Poly<T> {
    coeffs: Vec<T>,
}

impl<T: Coefficient> Poly<T> {
    /// From coefficients in increasing powers.
    pub fn new(mut coeffs: Vec<T>) -> Self {
        while coeffs.last().is_some_and(|c| c.is_zero()) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// From coefficients highest degree first.
    pub fn from_descending(coeffs: &[T]) -> Self {
        Self::new(coeffs.iter().rev().cloned().collect())
    }

    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn one() -> Self {
        Self::constant(T::one())
    }

    pub fn constant(c: T) -> Self {
        Self::new(vec![c])
    }

    /// The variable itself, `s`.
    pub fn x() -> Self {
        Self::monomial(T::one(), 1)
    }

    /// `c * s^k`
    pub fn monomial(c: T, k: usize) -> Self {
        let mut coeffs = vec![T::zero(); k];
        coeffs.push(c);
        Self::new(coeffs)
    }

    /// Monic linear factor `s - root`.
    pub fn linear(root: T) -> Self {
        Self::new(vec![-root, T::one()])
    }

    /// `lead * Π (s - r)` over the given roots.
    pub fn from_roots(lead: T, roots: &[T]) -> Self {
        roots
            .iter()
            .fold(Self::constant(lead), |acc, r| &acc * &Self::linear(r.clone()))
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn leading(&self) -> Option<&T> {
        self.coeffs.last()
    }

    /// Coefficient of `s^k` (zero past the degree).
    pub fn coeff(&self, k: usize) -> T {
        self.coeffs.get(k).cloned().unwrap_or_else(T::zero)
    }

    /// Coefficients in increasing powers.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Coefficients highest degree first; `[0]` for the zero polynomial.
    pub fn to_descending(&self) -> Vec<T> {
        if self.coeffs.is_empty() {
            return vec![T::zero()];
        }
        self.coeffs.iter().rev().cloned().collect()
    }

    /// Number of lowest-order coefficients that are zero (roots at the origin).
    pub fn low_order_zeros(&self) -> usize {
        self.coeffs.iter().take_while(|c| c.is_zero()).count()
    }

    /// Divides by `s^k`; the caller guarantees the low coefficients are zero.
    pub fn shift_down(&self, k: usize) -> Self {
        Self::new(self.coeffs.iter().skip(k).cloned().collect())
    }

    pub fn eval(&self, x: &T) -> T {
        self.coeffs
            .iter()
            .rev()
            .fold(T::zero(), |acc, c| acc * x.clone() + c.clone())
    }

    /// Horner evaluation in another ring through a coefficient embedding.
    pub fn eval_with<U>(&self, x: &U, embed: impl Fn(&T) -> U) -> U
    where
        U: Clone + Zero + Add<Output = U> + Mul<Output = U>,
    {
        self.coeffs
            .iter()
            .rev()
            .fold(U::zero(), |acc, c| acc * x.clone() + embed(c))
    }

    pub fn map<U: Coefficient>(&self, f: impl Fn(&T) -> U) -> Poly<U> {
        Poly::new(self.coeffs.iter().map(f).collect())
    }

    pub fn try_map<U: Coefficient, E>(
        &self,
        f: impl Fn(&T) -> Result<U, E>,
    ) -> Result<Poly<U>, E> {
        Ok(Poly::new(
            self.coeffs.iter().map(f).collect::<Result<Vec<_>, E>>()?,
        ))
    }

    pub fn scale(&self, c: &T) -> Self {
        Self::new(self.coeffs.iter().map(|k| k.clone() * c.clone()).collect())
    }

    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, c)| c.clone() * T::from_i64(k as i64))
                .collect(),
        )
    }

    pub fn pow(&self, k: usize) -> Self {
        (0..k).fold(Self::one(), |acc, _| &acc * self)
    }

    /// `p(s)` → `p(-s)`
    pub fn reflect(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(k, c)| if k % 2 == 1 { -c.clone() } else { c.clone() })
                .collect(),
        )
    }

    pub fn display_with<'a>(&'a self, var: &'a Symbol) -> PolyDisplay<'a, T> {
        PolyDisplay { poly: self, var }
    }
}

impl<T: FieldCoefficient> Poly<T> {
    /// Scaled so the leading coefficient is one; `None` for the zero polynomial.
    pub fn monic(&self) -> Option<Self> {
        let inv = self.leading()?.try_inv()?;
        Some(self.scale(&inv))
    }

    /// Euclidean division `(quotient, remainder)`; `None` when dividing by zero.
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let dd = divisor.degree()?;
        let inv_lead = divisor.leading()?.try_inv()?;
        let mut rem = self.coeffs.clone();
        if rem.len() <= dd {
            return Some((Self::zero(), self.clone()));
        }
        let mut quot = vec![T::zero(); rem.len() - dd];
        for k in (0..quot.len()).rev() {
            let q = rem[k + dd].clone() * inv_lead.clone();
            if q.is_zero() {
                continue;
            }
            for (j, d) in divisor.coeffs.iter().enumerate() {
                rem[k + j] = rem[k + j].clone() - q.clone() * d.clone();
            }
            // exact zero even when the field rounds
            rem[k + dd] = T::zero();
            quot[k] = q;
        }
        rem.truncate(dd);
        Some((Self::new(quot), Self::new(rem)))
    }

    /// Quotient when `divisor` divides `self` exactly.
    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let (q, r) = self.div_rem(divisor)?;
        r.is_zero().then_some(q)
    }

    /// Monic greatest common divisor (zero only if both inputs are zero).
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = match a.div_rem(&b) {
                Some((_, r)) => r,
                None => break,
            };
            a = b;
            b = r;
        }
        a.monic().unwrap_or(a)
    }

    /// Square-free decomposition (Yun): monic `f = Π a_i^i` as `(a_i, i)`
    /// pairs with non-constant `a_i`. Exact only over an exact field.
    pub fn square_free(&self) -> Vec<(Self, usize)> {
        let Some(f) = self.monic() else {
            return Vec::new();
        };
        if f.degree() == Some(0) {
            return Vec::new();
        }
        let df = f.derivative();
        let b = f.gcd(&df);
        let mut c = f.div_exact(&b).unwrap_or_else(|| f.clone());
        let mut d = &df.div_exact(&b).unwrap_or_else(|| df.clone()) - &c.derivative();
        let mut out = Vec::new();
        let mut i = 1;
        while c.degree().is_some_and(|deg| deg > 0) {
            let a = c.gcd(&d);
            if a.degree().is_some_and(|deg| deg > 0) {
                out.push((a.clone(), i));
            }
            c = c.div_exact(&a).unwrap_or_else(|| c.clone());
            d = &d.div_exact(&a).unwrap_or_else(|| d.clone()) - &c.derivative();
            i += 1;
        }
        out
    }
}

impl<'a, 'b, T: Coefficient> Add<&'b Poly<T>> for &'a Poly<T> {
    type Output = Poly<T>;
    fn add(self, rhs: &'b Poly<T>) -> Poly<T> {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Poly::new((0..n).map(|k| self.coeff(k) + rhs.coeff(k)).collect())
    }
}

impl<'a, 'b, T: Coefficient> Sub<&'b Poly<T>> for &'a Poly<T> {
    type Output = Poly<T>;
    fn sub(self, rhs: &'b Poly<T>) -> Poly<T> {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Poly::new((0..n).map(|k| self.coeff(k) - rhs.coeff(k)).collect())
    }
}

impl<'a, 'b, T: Coefficient> Mul<&'b Poly<T>> for &'a Poly<T> {
    type Output = Poly<T>;
    fn mul(self, rhs: &'b Poly<T>) -> Poly<T> {
        if self.is_zero() || rhs.is_zero() {
            return Poly::zero();
        }
        let mut out = vec![T::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                out[i + j] = out[i + j].clone() + a.clone() * b.clone();
            }
        }
        Poly::new(out)
    }
}

impl<T: Coefficient> Neg for &Poly<T> {
    type Output = Poly<T>;
    fn neg(self) -> Poly<T> {
        Poly::new(self.coeffs.iter().map(|c| -c.clone()).collect())
    }
}

/// `Display` adapter naming the polynomial variable.
pub struct PolyDisplay<'a, T> {
    poly: &'a Poly<T>,
    var: &'a Symbol,
}

impl<T: Coefficient + fmt::Display> fmt::Display for PolyDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coeffs = &self.poly.coeffs;
        if coeffs.is_empty() {
            return f.write_str("0");
        }
        let mut first = true;
        for (k, c) in coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let text = c.to_string();
            let compound = text[1..].contains(" + ") || text[1..].contains(" - ");
            let (negative, body) = match text.strip_prefix('-') {
                Some(rest) if !compound => (true, rest.to_string()),
                _ => (false, text.clone()),
            };
            let body = if compound && k > 0 {
                format!("({body})")
            } else {
                body
            };
            let term = match (k, body.as_str()) {
                (0, _) => body.clone(),
                (1, "1") => self.var.to_string(),
                (_, "1") => format!("{}^{k}", self.var),
                (1, _) => format!("{body}*{}", self.var),
                _ => format!("{body}*{}^{k}", self.var),
            };
            match (first, negative) {
                (true, true) => write!(f, "-{term}")?,
                (true, false) => write!(f, "{term}")?,
                (false, true) => write!(f, " - {term}")?,
                (false, false) => write!(f, " + {term}")?,
            }
            first = false;
        }
        Ok(())
    }
}
