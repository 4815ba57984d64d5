//! Exact input signals: sums of `c·t^k·e^{at}` optionally modulated by
//! `cos ωt` or `sin ωt`, plus an impulse at the origin.
//!
//! Every signal has an exact rational Laplace transform, so the same input
//! can drive a time-domain convolution or a Laplace-domain product.

use core::fmt;

use lti_core::Symbol;
use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::exppoly::{ExpPoly, ExpTerm};
use crate::poly::Poly;
use crate::rational::{Rational, rat, to_f64};

#[derive(Clone, Debug, PartialEq)]
pub enum Oscillation {
    None,
    Cos(Rational),
    Sin(Rational),
}

/// `coeff · t^power · e^{rate·t} · oscillation(t)`
#[derive(Clone, Debug, PartialEq)]
pub struct SignalTerm {
    pub coeff: Rational,
    pub power: u32,
    pub rate: Rational,
    pub oscillation: Oscillation,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signal {
    impulse: Rational,
    terms: Vec<SignalTerm>,
}

impl Signal {
    pub fn zero() -> Self {
        Self::default()
    }

    /// `amplitude · δ(t)`
    pub fn impulse(amplitude: Rational) -> Self {
        Self {
            impulse: amplitude,
            terms: Vec::new(),
        }
    }

    /// `amplitude` for `t ≥ 0`.
    pub fn step(amplitude: Rational) -> Self {
        Self::term(amplitude, 0, Rational::zero(), Oscillation::None)
    }

    /// `slope · t`
    pub fn ramp(slope: Rational) -> Self {
        Self::term(slope, 1, Rational::zero(), Oscillation::None)
    }

    /// `amplitude · e^{rate·t}`
    pub fn exponential(amplitude: Rational, rate: Rational) -> Self {
        Self::term(amplitude, 0, rate, Oscillation::None)
    }

    pub fn cosine(amplitude: Rational, omega: Rational) -> Self {
        Self::term(amplitude, 0, Rational::zero(), Oscillation::Cos(omega))
    }

    pub fn sine(amplitude: Rational, omega: Rational) -> Self {
        Self::term(amplitude, 0, Rational::zero(), Oscillation::Sin(omega))
    }

    pub fn term(coeff: Rational, power: u32, rate: Rational, oscillation: Oscillation) -> Self {
        let mut s = Self::zero();
        if !coeff.is_zero() {
            s.terms.push(SignalTerm {
                coeff,
                power,
                rate,
                oscillation,
            });
        }
        s
    }

    pub fn plus(mut self, other: Signal) -> Self {
        self.impulse += other.impulse;
        self.terms.extend(other.terms);
        self
    }

    pub fn scaled(&self, c: &Rational) -> Self {
        Self {
            impulse: &self.impulse * c,
            terms: self
                .terms
                .iter()
                .filter(|_| !c.is_zero())
                .map(|t| SignalTerm {
                    coeff: &t.coeff * c,
                    ..t.clone()
                })
                .collect(),
        }
    }

    pub fn impulse_weight(&self) -> &Rational {
        &self.impulse
    }

    pub fn terms(&self) -> &[SignalTerm] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.impulse.is_zero() && self.terms.is_empty()
    }

    /// Exact transform `num(s) / den(s)`.
    pub fn laplace(&self) -> (Poly<Rational>, Poly<Rational>) {
        let mut num = Poly::zero();
        let mut den = Poly::one();
        for t in &self.terms {
            let (n, d) = term_laplace(t);
            let g = den.gcd(&d);
            let left = d.div_exact(&g).unwrap_or_else(|| d.clone());
            let right = den.div_exact(&g).unwrap_or_else(|| den.clone());
            num = &(&num * &left) + &(&n * &right);
            den = &den * &left;
        }
        if !self.impulse.is_zero() {
            num = &num + &den.scale(&self.impulse);
        }
        (num, den)
    }

    /// Smooth part as an exponential polynomial (the impulse is not
    /// representable and is reported by [`Signal::impulse_weight`]).
    pub fn to_exp_poly(&self, var: Symbol) -> ExpPoly {
        let mut terms = Vec::new();
        for t in &self.terms {
            let c = to_f64(&t.coeff);
            let a = to_f64(&t.rate);
            match &t.oscillation {
                Oscillation::None => {
                    terms.push(ExpTerm::new(Complex64::new(c, 0.0), t.power, Complex64::new(a, 0.0)));
                }
                Oscillation::Cos(w) | Oscillation::Sin(w) => {
                    let w = to_f64(w);
                    // cos = (e^{jw} + e^{-jw}) / 2, sin = (e^{jw} - e^{-jw}) / 2j
                    let (plus, minus) = match t.oscillation {
                        Oscillation::Cos(_) => (Complex64::new(c / 2.0, 0.0), Complex64::new(c / 2.0, 0.0)),
                        _ => (Complex64::new(0.0, -c / 2.0), Complex64::new(0.0, c / 2.0)),
                    };
                    terms.push(ExpTerm::new(plus, t.power, Complex64::new(a, w)));
                    terms.push(ExpTerm::new(minus, t.power, Complex64::new(a, -w)));
                }
            }
        }
        ExpPoly::from_terms(var, terms)
    }
}

fn factorial(k: u32) -> Rational {
    (1..=k).fold(Rational::one(), |acc, i| acc * rat(i64::from(i)))
}

fn binomial(n: u32, k: u32) -> Rational {
    factorial(n) / (factorial(k) * factorial(n - k))
}

/// `L{c t^k e^{at} osc(ωt)}`.
///
/// With `x = s − a`: `k!/x^{k+1}` for the plain term, and the real or
/// imaginary part of `k!·(x + jω)^{k+1} / (x² + ω²)^{k+1}` for cosine and
/// sine.
fn term_laplace(t: &SignalTerm) -> (Poly<Rational>, Poly<Rational>) {
    let x = Poly::new(vec![-t.rate.clone(), Rational::one()]);
    let k = t.power;
    let scale = &t.coeff * factorial(k);
    match &t.oscillation {
        Oscillation::None => (Poly::constant(scale), x.pow(k as usize + 1)),
        Oscillation::Cos(w) | Oscillation::Sin(w) => {
            let want_real = matches!(t.oscillation, Oscillation::Cos(_));
            let n = k + 1;
            let mut num = Poly::zero();
            for i in 0..=n {
                // (jω)^i is real for even i, imaginary for odd i
                if (i % 2 == 0) != want_real {
                    continue;
                }
                let sign = if (i / 2) % 2 == 0 { rat(1) } else { rat(-1) };
                let w_pow = (0..i).fold(Rational::one(), |acc, _| acc * w);
                let c = binomial(n, i) * sign * w_pow;
                num = &num + &x.pow((n - i) as usize).scale(&c);
            }
            let quad = &(&x * &x) + &Poly::constant(w * w);
            (num.scale(&scale), quad.pow(n as usize))
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = Symbol::new("t");
        let smooth = self.to_exp_poly(t);
        match (self.impulse.is_zero(), smooth.is_zero()) {
            (true, _) => write!(f, "{smooth}"),
            (false, true) => write!(f, "{}*delta(t)", self.impulse),
            (false, false) => write!(f, "{}*delta(t) + {smooth}", self.impulse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::ratio;

    fn q(coeffs: &[i64]) -> Poly<Rational> {
        Poly::from_descending(&coeffs.iter().map(|&c| rat(c)).collect::<Vec<_>>())
    }

    #[test]
    fn step_and_ramp_transforms() {
        assert_eq!(Signal::step(rat(3)).laplace(), (q(&[3]), q(&[1, 0])));
        assert_eq!(Signal::ramp(rat(1)).laplace(), (q(&[1]), q(&[1, 0, 0])));
        assert_eq!(Signal::impulse(rat(2)).laplace(), (q(&[2]), q(&[1])));
    }

    #[test]
    fn oscillating_transforms() {
        // L{cos 2t} = s / (s^2 + 4), L{sin 2t} = 2 / (s^2 + 4)
        assert_eq!(Signal::cosine(rat(1), rat(2)).laplace(), (q(&[1, 0]), q(&[1, 0, 4])));
        assert_eq!(Signal::sine(rat(1), rat(2)).laplace(), (q(&[2]), q(&[1, 0, 4])));
        // L{e^{-t} sin t} = 1 / ((s+1)^2 + 1)
        let damped = Signal::term(rat(1), 0, rat(-1), Oscillation::Sin(rat(1)));
        assert_eq!(damped.laplace(), (q(&[1]), q(&[1, 2, 2])));
    }

    #[test]
    fn sums_share_denominators() {
        // 1/s + 1/s^2 = (s + 1)/s^2
        let u = Signal::step(rat(1)).plus(Signal::ramp(rat(1)));
        assert_eq!(u.laplace(), (q(&[1, 1]), q(&[1, 0, 0])));
    }

    #[test]
    fn time_form_matches_definition() {
        let u = Signal::sine(ratio(1, 2), rat(3)).plus(Signal::exponential(rat(2), rat(-1)));
        let f = u.to_exp_poly(Symbol::new("t"));
        for x in [0.0_f64, 0.4, 1.3] {
            let expected = 0.5 * (3.0 * x).sin() + 2.0 * (-x).exp();
            assert!((f.eval_real(x) - expected).abs() < 1e-14);
        }
    }
}
