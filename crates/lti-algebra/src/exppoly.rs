//! Exponential polynomials `Σ c·t^k·e^{λt}` in one named time variable.
//!
//! This is the closed form of every response of an LTI system to an input of
//! the same shape. Coefficients and rates are complex; real signals carry
//! their terms in conjugate pairs and read back as `e^{σt}(a·cos ωt + b·sin ωt)`.

use core::fmt;

use lti_core::Symbol;
use num_complex::Complex64;

/// Relative size below which a coefficient is dropped by [`ExpPoly::simplify`].
const DROP_REL: f64 = 1e-12;

/// Rates closer than this (relative) are merged.
const RATE_REL: f64 = 1e-10;

/// `coeff · t^power · e^{rate·t}`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpTerm {
    pub coeff: Complex64,
    pub power: u32,
    pub rate: Complex64,
}

impl ExpTerm {
    pub fn new(coeff: Complex64, power: u32, rate: Complex64) -> Self {
        Self { coeff, power, rate }
    }

    fn eval(&self, t: f64) -> Complex64 {
        self.coeff * t.powi(self.power as i32) * (self.rate * t).exp()
    }

    fn same_shape(&self, other: &ExpTerm) -> bool {
        self.power == other.power
            && (self.rate - other.rate).norm() <= RATE_REL * self.rate.norm().max(1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpPoly {
    var: Symbol,
    terms: Vec<ExpTerm>,
}

impl ExpPoly {
    pub fn zero(var: Symbol) -> Self {
        Self {
            var,
            terms: Vec::new(),
        }
    }

    pub fn constant(var: Symbol, c: f64) -> Self {
        Self::from_terms(var, vec![ExpTerm::new(Complex64::new(c, 0.0), 0, Complex64::new(0.0, 0.0))])
    }

    pub fn term(var: Symbol, coeff: Complex64, power: u32, rate: Complex64) -> Self {
        Self::from_terms(var, vec![ExpTerm::new(coeff, power, rate)])
    }

    pub fn from_terms(var: Symbol, terms: Vec<ExpTerm>) -> Self {
        Self { var, terms }.simplify()
    }

    pub fn var(&self) -> &Symbol {
        &self.var
    }

    pub fn terms(&self) -> &[ExpTerm] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Merges terms of equal shape and drops negligible ones.
    pub fn simplify(self) -> Self {
        let mut merged: Vec<ExpTerm> = Vec::with_capacity(self.terms.len());
        for t in self.terms {
            if !t.coeff.re.is_finite() || !t.coeff.im.is_finite() {
                merged.push(t);
                continue;
            }
            match merged.iter_mut().find(|m| m.same_shape(&t)) {
                Some(m) => m.coeff += t.coeff,
                None => merged.push(t),
            }
        }
        let scale = merged.iter().map(|t| t.coeff.norm()).fold(0.0_f64, f64::max);
        merged.retain(|t| t.coeff.norm() > DROP_REL * scale && t.coeff.norm() > 0.0);
        for t in &mut merged {
            if t.rate.re.abs() <= RATE_REL * t.rate.norm() {
                t.rate.re = 0.0;
            }
            if t.rate.im.abs() <= RATE_REL * t.rate.norm() {
                t.rate.im = 0.0;
            }
        }
        merged.sort_by(|a, b| {
            b.rate
                .re
                .total_cmp(&a.rate.re)
                .then(b.rate.im.total_cmp(&a.rate.im))
                .then(a.power.cmp(&b.power))
        });
        Self {
            var: self.var,
            terms: merged,
        }
    }

    pub fn scale(&self, c: Complex64) -> Self {
        Self::from_terms(
            self.var.clone(),
            self.terms
                .iter()
                .map(|t| ExpTerm::new(t.coeff * c, t.power, t.rate))
                .collect(),
        )
    }

    pub fn scale_real(&self, c: f64) -> Self {
        self.scale(Complex64::new(c, 0.0))
    }

    /// `f(t)` → `f(−t)`
    pub fn reflect(&self) -> Self {
        Self::from_terms(
            self.var.clone(),
            self.terms
                .iter()
                .map(|t| {
                    let sign = if t.power % 2 == 1 { -1.0 } else { 1.0 };
                    ExpTerm::new(t.coeff * sign, t.power, -t.rate)
                })
                .collect(),
        )
    }

    /// Same function of a renamed variable.
    pub fn with_variable(&self, var: Symbol) -> Self {
        Self {
            var,
            terms: self.terms.clone(),
        }
    }

    /// `∫₀^upper f(v) dv` as a function of `upper`.
    pub fn integrate_from_zero(&self, upper: Symbol) -> Self {
        let mut out = Vec::new();
        for t in &self.terms {
            let k = t.power;
            if t.rate.norm() == 0.0 {
                out.push(ExpTerm::new(t.coeff / f64::from(k + 1), k + 1, t.rate));
                continue;
            }
            // ∫₀^T v^k e^{rv} dv = e^{rT} Σ_j (−1)^j k!/(k−j)! T^{k−j} / r^{j+1} − (−1)^k k!/r^{k+1}
            let r = t.rate;
            let mut falling = 1.0;
            let mut r_pow = r;
            for j in 0..=k {
                let sign = if j % 2 == 1 { -1.0 } else { 1.0 };
                out.push(ExpTerm::new(t.coeff * sign * falling / r_pow, k - j, r));
                falling *= f64::from(k - j);
                r_pow *= r;
            }
            let k_fact: f64 = (1..=k).map(f64::from).product();
            let sign = if k % 2 == 1 { -1.0 } else { 1.0 };
            let tail = t.coeff * sign * k_fact / r.powu(k + 1);
            out.push(ExpTerm::new(-tail, 0, Complex64::new(0.0, 0.0)));
        }
        Self::from_terms(upper, out)
    }

    pub fn derivative(&self) -> Self {
        let mut out = Vec::new();
        for t in &self.terms {
            out.push(ExpTerm::new(t.coeff * t.rate, t.power, t.rate));
            if t.power > 0 {
                out.push(ExpTerm::new(t.coeff * f64::from(t.power), t.power - 1, t.rate));
            }
        }
        Self::from_terms(self.var.clone(), out)
    }

    pub fn eval(&self, t: f64) -> Complex64 {
        self.terms.iter().map(|term| term.eval(t)).sum()
    }

    /// Real part of the value; the imaginary part of a real signal is
    /// rounding noise.
    pub fn eval_real(&self, t: f64) -> f64 {
        self.eval(t).re
    }

    /// Whether `self − other` has no coefficient larger than `tol` relative to
    /// the larger operand.
    pub fn approx_eq(&self, other: &ExpPoly, tol: f64) -> bool {
        let diff = self - other;
        let scale = self
            .terms
            .iter()
            .chain(other.terms.iter())
            .map(|t| t.coeff.norm())
            .fold(1.0_f64, f64::max);
        diff.terms.iter().all(|t| t.coeff.norm() <= tol * scale)
    }

    /// Terms regrouped into real form, conjugate pairs combined.
    pub fn real_terms(&self) -> Vec<RealTerm> {
        let mut out = Vec::new();
        let mut used = vec![false; self.terms.len()];
        for (i, t) in self.terms.iter().enumerate() {
            if used[i] {
                continue;
            }
            used[i] = true;
            if t.rate.im == 0.0 {
                out.push(RealTerm {
                    power: t.power,
                    decay: t.rate.re,
                    kind: RealTermKind::Plain(t.coeff.re),
                });
                continue;
            }
            let partner = self.terms.iter().enumerate().position(|(j, u)| {
                !used[j] && u.power == t.power && u.same_shape(&ExpTerm::new(u.coeff, t.power, t.rate.conj()))
            });
            // c e^{(σ+jω)t} + c̄ e^{(σ−jω)t} = e^{σt} (2Re c cos ωt − 2Im c sin ωt)
            let (omega, c) = if t.rate.im > 0.0 {
                (t.rate.im, t.coeff)
            } else {
                (-t.rate.im, t.coeff.conj())
            };
            let (cos, sin) = match partner {
                Some(j) => {
                    used[j] = true;
                    (2.0 * c.re, -2.0 * c.im)
                }
                // an unpaired complex term keeps only its real part
                None => (c.re, -c.im),
            };
            out.push(RealTerm {
                power: t.power,
                decay: t.rate.re,
                kind: RealTermKind::Oscillatory { omega, cos, sin },
            });
        }
        out
    }
}

impl<'a, 'b> core::ops::Add<&'b ExpPoly> for &'a ExpPoly {
    type Output = ExpPoly;
    fn add(self, rhs: &'b ExpPoly) -> ExpPoly {
        debug_assert!(
            self.is_zero() || rhs.is_zero() || self.var == rhs.var,
            "adding functions of {} and {}",
            self.var,
            rhs.var
        );
        let var = if self.is_zero() { rhs.var.clone() } else { self.var.clone() };
        let terms = self.terms.iter().chain(rhs.terms.iter()).copied().collect();
        ExpPoly::from_terms(var, terms)
    }
}

impl<'a, 'b> core::ops::Sub<&'b ExpPoly> for &'a ExpPoly {
    type Output = ExpPoly;
    fn sub(self, rhs: &'b ExpPoly) -> ExpPoly {
        self + &(-rhs)
    }
}

impl<'a, 'b> core::ops::Mul<&'b ExpPoly> for &'a ExpPoly {
    type Output = ExpPoly;
    fn mul(self, rhs: &'b ExpPoly) -> ExpPoly {
        let mut terms = Vec::with_capacity(self.terms.len() * rhs.terms.len());
        for a in &self.terms {
            for b in &rhs.terms {
                terms.push(ExpTerm::new(a.coeff * b.coeff, a.power + b.power, a.rate + b.rate));
            }
        }
        ExpPoly::from_terms(self.var.clone(), terms)
    }
}

forward_binop!(impl Add, add for ExpPoly);
forward_binop!(impl Sub, sub for ExpPoly);
forward_binop!(impl Mul, mul for ExpPoly);

impl core::ops::Neg for &ExpPoly {
    type Output = ExpPoly;
    fn neg(self) -> ExpPoly {
        self.scale_real(-1.0)
    }
}

impl core::ops::Neg for ExpPoly {
    type Output = ExpPoly;
    fn neg(self) -> ExpPoly {
        -&self
    }
}

/// One real-valued term `t^power · e^{decay·t} · (...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct RealTerm {
    pub power: u32,
    pub decay: f64,
    pub kind: RealTermKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RealTermKind {
    Plain(f64),
    Oscillatory { omega: f64, cos: f64, sin: f64 },
}

fn fmt_num(x: f64) -> String {
    let rounded = (x * 1e9).round() / 1e9;
    if rounded == rounded.trunc() && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

impl RealTerm {
    fn factor_text(&self, var: &Symbol) -> String {
        let mut parts = Vec::new();
        match self.power {
            0 => {}
            1 => parts.push(var.to_string()),
            k => parts.push(format!("{var}^{k}")),
        }
        if self.decay != 0.0 {
            parts.push(format!("exp({}*{var})", fmt_num(self.decay)));
        }
        parts.join("*")
    }
}

/// Moves the coefficient of a single trigonometric part out so the sign and
/// a unit magnitude print like plain terms.
fn scaled_part(c: f64, body: String, coeff_out: &mut f64) -> String {
    if c.abs() == 1.0 {
        *coeff_out = c;
        body
    } else {
        *coeff_out = c.signum();
        format!("{}*{body}", fmt_num(c.abs()))
    }
}

impl fmt::Display for ExpPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self.real_terms();
        if terms.is_empty() {
            return f.write_str("0");
        }
        let mut first = true;
        for term in &terms {
            let factor = term.factor_text(&self.var);
            let (coeff, body) = match &term.kind {
                RealTermKind::Plain(c) => (*c, String::new()),
                RealTermKind::Oscillatory { omega, cos, sin } => {
                    let mut coeff_out = 1.0;
                    let w = fmt_num(*omega);
                    let inner = match (cos.abs() > 0.0, sin.abs() > 0.0) {
                        (true, true) => format!(
                            "({}*cos({w}*{v}) {} {}*sin({w}*{v}))",
                            fmt_num(*cos),
                            if *sin < 0.0 { '-' } else { '+' },
                            fmt_num(sin.abs()),
                            v = self.var
                        ),
                        (true, false) => {
                            scaled_part(*cos, format!("cos({w}*{})", self.var), &mut coeff_out)
                        }
                        _ => scaled_part(*sin, format!("sin({w}*{})", self.var), &mut coeff_out),
                    };
                    (coeff_out, inner)
                }
            };
            let negative = coeff < 0.0;
            let mag = coeff.abs();
            let text = match (factor.is_empty(), body.is_empty()) {
                (true, true) => fmt_num(mag),
                (false, true) if mag == 1.0 => factor,
                (false, true) => format!("{}*{factor}", fmt_num(mag)),
                (true, false) => body,
                (false, false) => format!("{factor}*{body}"),
            };
            match (first, negative) {
                (true, true) => write!(f, "-{text}")?,
                (true, false) => write!(f, "{text}")?,
                (false, true) => write!(f, " - {text}")?,
                (false, false) => write!(f, " + {text}")?,
            }
            first = false;
        }
        Ok(())
    }
}
