//! Inverse Laplace transforms of strictly proper rational functions by exact
//! partial fractions.
//!
//! The denominator is factored exactly; every pole is a root of a factor of
//! degree one or two and its residues are computed exactly from a Taylor
//! expansion of the cofactor around the pole. Over Q the poles live in
//! `Q(√d)` and only the final coefficients are rounded to floating point.
//! With free parameters the poles live in `Q(params)(√d)` and the result
//! stays symbolic until the parameters are bound.

use lti_core::Symbol;
use num_complex::Complex64;
use num_traits::{One, Zero};
use tracing::debug;

use crate::error::{AlgebraError, AlgebraResult};
use crate::exppoly::{ExpPoly, ExpTerm};
use crate::factor::{clear_denominators, factor_parametric, factor_rational};
use crate::param_exp::{ParamExpPoly, ParamExpTerm};
use crate::param_surd::ParamSurd;
use crate::poly::{FieldCoefficient, Poly};
use crate::ratfunc::RatFunc;
use crate::rational::{Rational, rat};
use crate::surd::Surd;

/// A pole with its multiplicity and the remaining denominator
/// `Q(s) = den(s) / (s − pole)^m`.
#[derive(Clone, Debug)]
struct Pole<T> {
    value: T,
    multiplicity: usize,
    cofactor: Poly<T>,
}

/// One factor `lead · Π (s − root)` of the denominator, raised to
/// `multiplicity`.
struct RootGroup<T> {
    lead: T,
    roots: Vec<T>,
    factor: Poly<T>,
    multiplicity: usize,
}

/// Poles of `unit · Π factor^m`. The cofactor of a root only multiplies the
/// other root of its own factor with the remaining factors kept whole, so a
/// surd never meets one with a different radicand.
fn poles_of<T: FieldCoefficient>(unit: &T, groups: &[RootGroup<T>]) -> Vec<Pole<T>> {
    let mut poles = Vec::new();
    for (j, group) in groups.iter().enumerate() {
        let m = group.multiplicity;
        let others = groups
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != j)
            .fold(Poly::constant(unit.clone()), |acc, (_, g)| {
                &acc * &g.factor.pow(g.multiplicity)
            });
        let own = &others * &Poly::constant(group.lead.clone()).pow(m);
        for (i, value) in group.roots.iter().enumerate() {
            let cofactor = group
                .roots
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != i)
                .fold(own.clone(), |acc, (_, r)| &acc * &Poly::linear(r.clone()).pow(m));
            poles.push(Pole {
                value: value.clone(),
                multiplicity: m,
                cofactor,
            });
        }
    }
    poles
}

/// Coefficients `q_0 .. q_{m-1}` of the principal part at each pole:
/// `q_k` multiplies `1/(s − p)^{m−k}`.
fn principal_parts<'p, T: FieldCoefficient>(
    num: &Poly<T>,
    poles: &'p [Pole<T>],
) -> AlgebraResult<Vec<(&'p Pole<T>, Vec<T>)>> {
    poles
        .iter()
        .map(|pole| {
            let a = taylor_shift(num, &pole.value);
            let b = taylor_shift(&pole.cofactor, &pole.value);
            Ok((pole, series_div(&a, &b, pole.multiplicity)?))
        })
        .collect()
}

fn check_proper(num: Option<usize>, den: Option<usize>) -> AlgebraResult<bool> {
    let den_degree = den.unwrap_or(0);
    match num {
        Some(n) if n >= den_degree => Err(AlgebraError::ImproperRational {
            num: n,
            den: den_degree,
        }),
        Some(_) => Ok(true),
        None => Ok(false),
    }
}

/// Poles of a fixed denominator, reusable for many numerators.
#[derive(Clone, Debug)]
pub struct PartialFractions {
    den: Poly<Rational>,
    poles: Vec<Pole<Surd>>,
}

impl PartialFractions {
    pub fn new(den: &Poly<Rational>) -> AlgebraResult<Self> {
        let factorization = factor_rational(den)?;
        let lift = |f: &Poly<Rational>| f.map(|c| Surd::rational(c.clone()));
        let mut groups = Vec::with_capacity(factorization.factors.len());
        for (f, m) in &factorization.factors {
            let roots = match f.degree() {
                Some(1) => vec![Surd::rational(-f.coeff(0))],
                Some(2) => Surd::quadratic_roots(&f.coeff(1), &f.coeff(0)).to_vec(),
                Some(d) => return Err(AlgebraError::UnsupportedFactorDegree { degree: d }),
                None => continue,
            };
            groups.push(RootGroup {
                lead: Surd::one(),
                roots,
                factor: lift(f),
                multiplicity: *m,
            });
        }
        let poles = poles_of(&Surd::rational(factorization.unit.clone()), &groups);
        debug!(
            degree = ?den.degree(),
            poles = poles.len(),
            "partial fraction poles"
        );
        Ok(Self {
            den: den.clone(),
            poles,
        })
    }

    pub fn denominator(&self) -> &Poly<Rational> {
        &self.den
    }

    /// Distinct poles with multiplicity.
    pub fn poles(&self) -> impl Iterator<Item = (&Surd, usize)> {
        self.poles.iter().map(|p| (&p.value, p.multiplicity))
    }

    /// `L⁻¹{num / den}` as a function of `var`.
    pub fn invert(&self, num: &Poly<Rational>, var: Symbol) -> AlgebraResult<ExpPoly> {
        if !check_proper(num.degree(), self.den.degree())? {
            return Ok(ExpPoly::zero(var));
        }
        let num = num.map(|c| Surd::rational(c.clone()));
        let mut terms = Vec::new();
        for (pole, q) in principal_parts(&num, &self.poles)? {
            let m = pole.multiplicity;
            let rate = pole.value.to_complex();
            // q_k multiplies 1/(s−p)^{m−k}, whose transform is t^{m−k−1}/(m−k−1)! e^{pt}
            let mut fact = 1.0;
            let mut by_power = vec![Complex64::new(0.0, 0.0); m];
            for power in 0..m {
                if power > 0 {
                    fact *= power as f64;
                }
                by_power[power] = q[m - 1 - power].to_complex() / fact;
            }
            for (power, coeff) in by_power.into_iter().enumerate() {
                terms.push(ExpTerm::new(coeff, power as u32, rate));
            }
        }
        Ok(ExpPoly::from_terms(var, terms))
    }
}

/// `L⁻¹{num / den}` for a one-off pair.
pub fn inverse_laplace(
    num: &Poly<Rational>,
    den: &Poly<Rational>,
    var: Symbol,
) -> AlgebraResult<ExpPoly> {
    PartialFractions::new(den)?.invert(num, var)
}

/// Partial fractions over `Q(params)`.
///
/// Poles are the roots of the parametric factors, kept as exact
/// [`ParamSurd`] values. The residues are valid for generic parameter
/// values; where two poles merge (a radicand vanishes) the bound result
/// reports a division by zero instead of the confluent form.
#[derive(Clone, Debug)]
pub struct ParamPartialFractions {
    den: Poly<RatFunc>,
    poles: Vec<Pole<ParamSurd>>,
}

impl ParamPartialFractions {
    pub fn new(den: &Poly<RatFunc>) -> AlgebraResult<Self> {
        let cleared = clear_denominators(den)?;
        let factorization = factor_parametric(&cleared)?;
        let lead = |c: Option<&RatFunc>| c.cloned().unwrap_or_else(RatFunc::zero);
        let scale = lead(den.leading()).checked_div(&RatFunc::from_poly(
            cleared.leading().cloned().unwrap_or_default(),
        ))?;
        let unit = ParamSurd::rational(&scale * &factorization.unit);

        let mut groups = Vec::with_capacity(factorization.factors.len());
        for (f, m) in &factorization.factors {
            let f = f.map(|c| RatFunc::from_poly(c.clone()));
            let (lead, roots) = match f.degree() {
                Some(1) => {
                    let root = (-f.coeff(0)).checked_div(&f.coeff(1))?;
                    (f.coeff(1), vec![ParamSurd::rational(root)])
                }
                Some(2) => {
                    let roots = ParamSurd::quadratic_roots(&f.coeff(2), &f.coeff(1), &f.coeff(0))?;
                    (f.coeff(2), roots.to_vec())
                }
                Some(d) => return Err(AlgebraError::UnsupportedFactorDegree { degree: d }),
                None => continue,
            };
            groups.push(RootGroup {
                lead: ParamSurd::rational(lead),
                roots,
                factor: f.map(|c| ParamSurd::rational(c.clone())),
                multiplicity: *m,
            });
        }
        let poles = poles_of(&unit, &groups);
        debug!(
            degree = ?den.degree(),
            poles = poles.len(),
            "parametric partial fraction poles"
        );
        Ok(Self {
            den: den.clone(),
            poles,
        })
    }

    pub fn denominator(&self) -> &Poly<RatFunc> {
        &self.den
    }

    /// Distinct poles with multiplicity.
    pub fn poles(&self) -> impl Iterator<Item = (&ParamSurd, usize)> {
        self.poles.iter().map(|p| (&p.value, p.multiplicity))
    }

    /// `L⁻¹{num / den}` as a function of `var`.
    pub fn invert(&self, num: &Poly<RatFunc>, var: Symbol) -> AlgebraResult<ParamExpPoly> {
        if !check_proper(num.degree(), self.den.degree())? {
            return Ok(ParamExpPoly::zero(var));
        }
        let num = num.map(|c| ParamSurd::rational(c.clone()));
        let mut terms = Vec::new();
        for (pole, q) in principal_parts(&num, &self.poles)? {
            let m = pole.multiplicity;
            let mut fact = rat(1);
            for power in 0..m {
                if power > 0 {
                    fact = &fact * &rat(power as i64);
                }
                let scale = ParamSurd::rational(RatFunc::constant(fact.recip()));
                terms.push(ParamExpTerm::new(
                    &q[m - 1 - power] * &scale,
                    power as u32,
                    pole.value.clone(),
                ));
            }
        }
        Ok(ParamExpPoly::from_terms(var, terms))
    }
}

/// Coefficients of `p(x + h)` as a polynomial in `h`.
fn taylor_shift<T: FieldCoefficient>(p: &Poly<T>, x: &T) -> Vec<T> {
    let shift = Poly::new(vec![x.clone(), T::one()]);
    let shifted = p
        .coeffs()
        .iter()
        .rev()
        .fold(Poly::<T>::zero(), |acc, c| &(&acc * &shift) + &Poly::constant(c.clone()));
    shifted.coeffs().to_vec()
}

/// First `n` coefficients of the power series `a(h) / b(h)`, `b(0) ≠ 0`.
fn series_div<T: FieldCoefficient>(a: &[T], b: &[T], n: usize) -> AlgebraResult<Vec<T>> {
    let b0_inv = b
        .first()
        .and_then(|b0| b0.try_inv())
        .ok_or(AlgebraError::DivisionByZero {
            what: "partial fraction residue",
        })?;
    let coeff = |v: &[T], k: usize| v.get(k).cloned().unwrap_or_else(T::zero);
    let mut q: Vec<T> = Vec::with_capacity(n);
    for k in 0..n {
        let mut acc = coeff(a, k);
        for i in 1..=k {
            acc = acc - coeff(b, i) * q[k - i].clone();
        }
        q.push(acc * b0_inv.clone());
    }
    Ok(q)
}
