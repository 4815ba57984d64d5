//! Multivariate polynomials over the rationals in named parameters.
//!
//! These are the coefficients of symbolic transfer functions and state-space
//! entries: `a`, `b*c - 2`, `1/3*k^2`. Terms are kept in graded
//! lexicographic order so the leading term is well defined and exact
//! division works term by term.

use core::cmp::Ordering;
use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use lti_core::{Bindings, LtiResult, Symbol};
use num_traits::{One, Signed, Zero};

use crate::poly::{Coefficient, Poly};
use crate::rational::{ExactBindings, Rational, rat, rational_gcd, rational_sqrt, to_f64};

/// Power product of symbols, e.g. `a^2*b`.
///
/// Stored as `(symbol, exponent)` pairs sorted by symbol with no zero
/// exponents; the empty monomial is `1`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Monomial {
    powers: Vec<(Symbol, u32)>,
}

impl Monomial {
    pub fn one() -> Self {
        Self::default()
    }

    pub fn var(symbol: Symbol) -> Self {
        Self {
            powers: vec![(symbol, 1)],
        }
    }

    pub fn is_one(&self) -> bool {
        self.powers.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.powers.iter().map(|(_, e)| e).sum()
    }

    pub fn exponent(&self, symbol: &Symbol) -> u32 {
        self.powers
            .iter()
            .find(|(s, _)| s == symbol)
            .map_or(0, |(_, e)| *e)
    }

    pub fn powers(&self) -> &[(Symbol, u32)] {
        &self.powers
    }

    fn from_map(map: BTreeMap<Symbol, u32>) -> Self {
        Self {
            powers: map.into_iter().filter(|(_, e)| *e > 0).collect(),
        }
    }

    fn to_map(&self) -> BTreeMap<Symbol, u32> {
        self.powers.iter().cloned().collect()
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut map = self.to_map();
        for (s, e) in &other.powers {
            *map.entry(s.clone()).or_insert(0) += e;
        }
        Self::from_map(map)
    }

    /// `self / other` if every exponent stays non-negative.
    pub fn div(&self, other: &Monomial) -> Option<Monomial> {
        let mut map = self.to_map();
        for (s, e) in &other.powers {
            let have = map.get_mut(s)?;
            if *have < *e {
                return None;
            }
            *have -= e;
        }
        Some(Self::from_map(map))
    }

    /// Component-wise minimum of exponents.
    pub fn gcd(&self, other: &Monomial) -> Monomial {
        let map = self
            .powers
            .iter()
            .filter_map(|(s, e)| {
                let f = other.exponent(s);
                (f > 0).then(|| (s.clone(), (*e).min(f)))
            })
            .collect();
        Self::from_map(map)
    }

    /// Square root if every exponent is even.
    fn sqrt(&self) -> Option<Monomial> {
        if self.powers.iter().any(|(_, e)| e % 2 != 0) {
            return None;
        }
        Some(Self {
            powers: self.powers.iter().map(|(s, e)| (s.clone(), e / 2)).collect(),
        })
    }

    fn eval(&self, bindings: &Bindings) -> LtiResult<f64> {
        let mut v = 1.0;
        for (s, e) in &self.powers {
            v *= bindings.require(s)?.powi(*e as i32);
        }
        Ok(v)
    }
}

impl Ord for Monomial {
    /// Graded lexicographic order.
    fn cmp(&self, other: &Self) -> Ordering {
        match self.degree().cmp(&other.degree()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        let mut a = self.powers.iter();
        let mut b = other.powers.iter();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some((sa, ea)), Some((sb, eb))) => {
                    if sa == sb {
                        match ea.cmp(eb) {
                            Ordering::Equal => continue,
                            ord => return ord,
                        }
                    }
                    // the monomial carrying the earlier symbol ranks higher
                    return if sa < sb {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    };
                }
            }
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.powers.is_empty() {
            return f.write_str("1");
        }
        for (i, (s, e)) in self.powers.iter().enumerate() {
            if i > 0 {
                f.write_str("*")?;
            }
            if *e == 1 {
                write!(f, "{s}")?;
            } else {
                write!(f, "{s}^{e}")?;
            }
        }
        Ok(())
    }
}

/// Polynomial in named parameters with rational coefficients.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MPoly {
    terms: BTreeMap<Monomial, Rational>,
}

impl MPoly {
    pub fn constant(c: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !c.is_zero() {
            terms.insert(Monomial::one(), c);
        }
        Self { terms }
    }

    pub fn from_int(c: i64) -> Self {
        Self::constant(rat(c))
    }

    /// The parameter `name` as a polynomial.
    pub fn symbol(name: &str) -> Self {
        Self::var(Symbol::new(name))
    }

    pub fn var(symbol: Symbol) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(Monomial::var(symbol), Rational::one());
        Self { terms }
    }

    pub fn term(coeff: Rational, monomial: Monomial) -> Self {
        let mut terms = BTreeMap::new();
        if !coeff.is_zero() {
            terms.insert(monomial, coeff);
        }
        Self { terms }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> {
        self.terms.iter()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The value if the polynomial has no symbols.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::zero()),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.as_constant().is_some()
    }

    /// Leading term in graded lexicographic order.
    pub fn leading(&self) -> Option<(&Monomial, &Rational)> {
        self.terms.last_key_value()
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.terms
            .keys()
            .flat_map(|m| m.powers.iter().map(|(s, _)| s.clone()))
            .collect()
    }

    pub fn scale(&self, c: &Rational) -> MPoly {
        if c.is_zero() {
            return MPoly::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, k)| (m.clone(), k * c))
                .collect(),
        }
    }

    pub fn mul_monomial(&self, monomial: &Monomial) -> MPoly {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, k)| (m.mul(monomial), k.clone()))
                .collect(),
        }
    }

    pub fn pow(&self, k: u32) -> MPoly {
        let mut out = MPoly::one();
        for _ in 0..k {
            out = &out * self;
        }
        out
    }

    fn add_term(&mut self, monomial: Monomial, coeff: Rational) {
        if coeff.is_zero() {
            return;
        }
        let entry = self.terms.entry(monomial).or_insert_with(Rational::zero);
        *entry += coeff;
        if entry.is_zero() {
            self.terms.retain(|_, c| !c.is_zero());
        }
    }

    /// Positive rational `g` such that `self / g` has coprime integer
    /// coefficients. Zero for the zero polynomial.
    pub fn numeric_content(&self) -> Rational {
        self.terms
            .values()
            .fold(Rational::zero(), |g, c| rational_gcd(&g, c))
    }

    /// Largest monomial dividing every term.
    pub fn monomial_content(&self) -> Monomial {
        let mut iter = self.terms.keys();
        let Some(first) = iter.next() else {
            return Monomial::one();
        };
        iter.fold(first.clone(), |g, m| g.gcd(m))
    }

    /// Sign of the leading coefficient.
    pub fn leading_is_negative(&self) -> bool {
        self.leading().is_some_and(|(_, c)| c.is_negative())
    }

    /// Exact quotient `self / divisor`, or `None` when the division leaves a
    /// remainder.
    pub fn div_exact(&self, divisor: &MPoly) -> Option<MPoly> {
        let (lead_m, lead_c) = divisor.leading()?;
        if let Some(c) = divisor.as_constant() {
            return Some(self.scale(&c.recip()));
        }
        let mut rem = self.clone();
        let mut quot = MPoly::zero();
        // every step removes the current leading term, so this terminates
        while let Some((m, c)) = rem.leading().map(|(m, c)| (m.clone(), c.clone())) {
            let qm = m.div(lead_m)?;
            let qc = c / lead_c;
            let step = MPoly::term(qc, qm);
            rem = &rem - &(&step * divisor);
            quot = &quot + &step;
        }
        Some(quot)
    }

    /// Exact square root when the polynomial is a perfect square.
    pub fn sqrt_exact(&self) -> Option<MPoly> {
        if self.is_zero() {
            return Some(MPoly::zero());
        }
        if let Some(c) = self.as_constant() {
            return rational_sqrt(&c).map(MPoly::constant);
        }
        let (lm, lc) = self.leading()?;
        let root_lead = MPoly::term(rational_sqrt(lc)?, lm.sqrt()?);
        let mut root = root_lead.clone();
        let two_lead = root_lead.scale(&rat(2));
        // Each pass fixes the next term of the root; a square of t terms
        // needs at most t passes.
        for _ in 0..=self.num_terms() {
            let rem = self - &(&root * &root);
            let Some((m, c)) = rem.leading() else {
                return Some(root);
            };
            let (tm, tc) = two_lead.leading()?;
            let next = MPoly::term(c / tc, m.div(tm)?);
            root = &root + &next;
        }
        None
    }

    /// Coefficients in powers of `x`, `self = Σ c_k x^k` with every `c_k`
    /// free of `x`.
    pub fn coefficients_in(&self, x: &Symbol) -> Poly<MPoly> {
        let mut coeffs: Vec<MPoly> = Vec::new();
        for (m, c) in &self.terms {
            let k = m.exponent(x) as usize;
            let mut rest = m.to_map();
            rest.remove(x);
            if coeffs.len() <= k {
                coeffs.resize(k + 1, MPoly::zero());
            }
            coeffs[k].add_term(Monomial::from_map(rest), c.clone());
        }
        Poly::new(coeffs)
    }

    /// Inverse of [`MPoly::coefficients_in`].
    pub fn from_coefficients_in(p: &Poly<MPoly>, x: &Symbol) -> MPoly {
        let xv = MPoly::var(x.clone());
        p.coeffs()
            .iter()
            .rev()
            .fold(MPoly::zero(), |acc, c| &(&acc * &xv) + c)
    }

    pub fn eval(&self, bindings: &Bindings) -> LtiResult<f64> {
        let mut sum = 0.0;
        for (m, c) in &self.terms {
            sum += to_f64(c) * m.eval(bindings)?;
        }
        Ok(sum)
    }

    /// Substitutes exact values for the bound symbols; unbound symbols stay.
    pub fn subs(&self, bindings: &ExactBindings) -> MPoly {
        let mut out = MPoly::zero();
        for (m, c) in &self.terms {
            let mut coeff = c.clone();
            let mut rest = BTreeMap::new();
            for (s, e) in &m.powers {
                match bindings.get(s) {
                    Some(v) => coeff *= num_traits::pow(v.clone(), *e as usize),
                    None => {
                        rest.insert(s.clone(), *e);
                    }
                }
            }
            out.add_term(Monomial::from_map(rest), coeff);
        }
        out
    }

    /// Integer coefficients are rendered without a denominator.
    fn fmt_coeff(c: &Rational) -> String {
        if c.is_integer() {
            c.numer().to_string()
        } else {
            format!("{}/{}", c.numer(), c.denom())
        }
    }
}

impl Zero for MPoly {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl One for MPoly {
    fn one() -> Self {
        Self::constant(Rational::one())
    }
}

impl Coefficient for MPoly {
    fn from_i64(v: i64) -> Self {
        Self::from_int(v)
    }
}

impl From<Rational> for MPoly {
    fn from(c: Rational) -> Self {
        Self::constant(c)
    }
}

impl From<i64> for MPoly {
    fn from(c: i64) -> Self {
        Self::from_int(c)
    }
}

impl<'a, 'b> core::ops::Add<&'b MPoly> for &'a MPoly {
    type Output = MPoly;
    fn add(self, rhs: &'b MPoly) -> MPoly {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), c.clone());
        }
        out
    }
}

impl<'a, 'b> core::ops::Sub<&'b MPoly> for &'a MPoly {
    type Output = MPoly;
    fn sub(self, rhs: &'b MPoly) -> MPoly {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), -c.clone());
        }
        out
    }
}

impl<'a, 'b> core::ops::Mul<&'b MPoly> for &'a MPoly {
    type Output = MPoly;
    fn mul(self, rhs: &'b MPoly) -> MPoly {
        let mut out = MPoly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                out.add_term(ma.mul(mb), ca * cb);
            }
        }
        out
    }
}

forward_binop!(impl Add, add for MPoly);
forward_binop!(impl Sub, sub for MPoly);
forward_binop!(impl Mul, mul for MPoly);

impl core::ops::Neg for MPoly {
    type Output = MPoly;
    fn neg(self) -> MPoly {
        -&self
    }
}

impl core::ops::Neg for &MPoly {
    type Output = MPoly;
    fn neg(self) -> MPoly {
        MPoly {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), -c.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for MPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (i, (m, c)) in self.terms.iter().rev().enumerate() {
            let negative = c.is_negative();
            let abs = c.abs();
            if i == 0 {
                if negative {
                    f.write_str("-")?;
                }
            } else if negative {
                f.write_str(" - ")?;
            } else {
                f.write_str(" + ")?;
            }
            if m.is_one() {
                f.write_str(&Self::fmt_coeff(&abs))?;
            } else if abs.is_one() {
                write!(f, "{m}")?;
            } else {
                write!(f, "{}*{m}", Self::fmt_coeff(&abs))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::ratio;

    fn a() -> MPoly {
        MPoly::symbol("a")
    }
    fn b() -> MPoly {
        MPoly::symbol("b")
    }

    #[test]
    fn arithmetic_cancels_terms() {
        let p = &a() + &b();
        let q = &a() - &b();
        let prod = &p * &q; // a^2 - b^2
        assert_eq!(prod.num_terms(), 2);
        assert!((&prod - &(&(&a() * &a()) - &(&b() * &b()))).is_zero());
    }

    #[test]
    fn grlex_orders_by_degree_first() {
        let a2 = Monomial::var(Symbol::new("a")).mul(&Monomial::var(Symbol::new("a")));
        let ab = Monomial::var(Symbol::new("a")).mul(&Monomial::var(Symbol::new("b")));
        let b = Monomial::var(Symbol::new("b"));
        assert!(a2 > ab);
        assert!(ab > b);
        assert!(b > Monomial::one());
    }

    #[test]
    fn exact_division() {
        let p = &(&a() + &b()) * &(&a() - &MPoly::from_int(2));
        let q = p.div_exact(&(&a() + &b())).unwrap();
        assert_eq!(q, &a() - &MPoly::from_int(2));
        assert!(p.div_exact(&(&a() + &MPoly::from_int(1))).is_none());
    }

    #[test]
    fn perfect_square_roots() {
        let d = &a() - &b();
        let sq = &d * &d;
        let r = sq.sqrt_exact().unwrap();
        assert!(r == d || r == -&d);
        assert!((&a() + &b()).sqrt_exact().is_none());
        assert_eq!(MPoly::from_int(4).sqrt_exact(), Some(MPoly::from_int(2)));
    }

    #[test]
    fn coefficients_in_one_symbol() {
        // a^2 b + 2 a + b = (b) a^2 + (2) a + b
        let p = &(&(&a() * &a()) * &b()) + &(&a().scale(&rat(2)) + &b());
        let x = Symbol::new("a");
        let coeffs = p.coefficients_in(&x);
        assert_eq!(coeffs.coeffs(), &[b(), MPoly::from_int(2), b()]);
        assert_eq!(MPoly::from_coefficients_in(&coeffs, &x), p);
    }

    #[test]
    fn content_and_substitution() {
        let p = &a().scale(&ratio(2, 3)) + &b().scale(&ratio(4, 9));
        assert_eq!(p.numeric_content(), ratio(2, 9));

        let mut env = ExactBindings::new();
        env.insert(Symbol::new("a"), rat(3));
        let q = p.subs(&env);
        assert_eq!(q, &MPoly::from_int(2) + &b().scale(&ratio(4, 9)));
    }

    #[test]
    fn display_is_readable() {
        let p = &(&a() * &a()).scale(&rat(2)) - &b() + &MPoly::from_int(1);
        assert_eq!(p.to_string(), "2*a^2 - b + 1");
    }

    #[test]
    fn numeric_eval_requires_bindings() {
        let p = &a() * &b();
        let env = Bindings::new().with("a", 2.0).with("b", 3.0);
        assert_eq!(p.eval(&env).unwrap(), 6.0);
        assert!(p.eval(&Bindings::new().with("a", 1.0)).is_err());
    }
}
