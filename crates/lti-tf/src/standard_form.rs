//! Exact standard-form factorization of polynomials with parametric
//! coefficients: `gain · Π (τs + 1) · Π (s²/ωn² + 2ζs/ωn + 1) · Π s`.

use core::fmt;

use lti_algebra::{MPoly, Poly, RatFunc, factor_parametric};
use lti_core::Symbol;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TransferError, TransferResult};

/// Side of the transfer function a term belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Zero,
    Pole,
}

/// A unit-DC term (or the pure `s` term for a root at the origin).
#[derive(Clone, Debug, PartialEq)]
pub enum StandardTerm {
    /// `τ s + 1`
    FirstOrder { tau: RatFunc },
    /// `a2 s² + a1 s + 1` with `a2 = 1/ωn²`, `a1 = 2ζ/ωn`
    SecondOrder { a2: RatFunc, a1: RatFunc },
    /// `s`
    Origin,
}

impl StandardTerm {
    /// The term as a polynomial in `s`.
    pub fn to_poly(&self) -> Poly<RatFunc> {
        match self {
            StandardTerm::FirstOrder { tau } => Poly::new(vec![RatFunc::one(), tau.clone()]),
            StandardTerm::SecondOrder { a2, a1 } => {
                Poly::new(vec![RatFunc::one(), a1.clone(), a2.clone()])
            }
            StandardTerm::Origin => Poly::x(),
        }
    }

    /// `ωn²` of a second order term.
    pub fn natural_frequency_squared(&self) -> Option<RatFunc> {
        match self {
            StandardTerm::SecondOrder { a2, .. } => a2.inv().ok(),
            _ => None,
        }
    }

    /// `ζ²` of a second order term, `a1² / (4·a2)`.
    pub fn damping_ratio_squared(&self) -> Option<RatFunc> {
        match self {
            StandardTerm::SecondOrder { a2, a1 } => {
                let four_a2 = a2 * &RatFunc::from(4);
                a1.pow(2).checked_div(&four_a2).ok()
            }
            _ => None,
        }
    }

    pub fn display_with<'a>(&'a self, var: &'a Symbol) -> StandardTermDisplay<'a> {
        StandardTermDisplay { term: self, var }
    }
}

fn wrap(r: &RatFunc) -> String {
    let text = r.to_string();
    if text.contains(' ') || text.contains('/') {
        format!("({text})")
    } else {
        text
    }
}

pub struct StandardTermDisplay<'a> {
    term: &'a StandardTerm,
    var: &'a Symbol,
}

impl fmt::Display for StandardTermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.var;
        match self.term {
            StandardTerm::FirstOrder { tau } => write!(f, "({}*{s} + 1)", wrap(tau)),
            StandardTerm::SecondOrder { a2, a1 } => {
                write!(f, "({}*{s}^2 + {}*{s} + 1)", wrap(a2), wrap(a1))
            }
            StandardTerm::Origin => write!(f, "{s}"),
        }
    }
}

/// A standard-form term and the side it sits on.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedTerm {
    pub term: StandardTerm,
    pub placement: Placement,
}

/// `H = gain · Π zero terms / Π pole terms`, exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicFactorization {
    pub gain: RatFunc,
    pub terms: Vec<PlacedTerm>,
}

impl SymbolicFactorization {
    pub fn zeros(&self) -> impl Iterator<Item = &StandardTerm> {
        self.placed(Placement::Zero)
    }

    pub fn poles(&self) -> impl Iterator<Item = &StandardTerm> {
        self.placed(Placement::Pole)
    }

    fn placed(&self, placement: Placement) -> impl Iterator<Item = &StandardTerm> {
        self.terms
            .iter()
            .filter(move |t| t.placement == placement)
            .map(|t| &t.term)
    }

    /// Numerator and denominator of the product, the gain in the numerator.
    pub fn expand(&self) -> (Poly<RatFunc>, Poly<RatFunc>) {
        let num = self
            .zeros()
            .fold(Poly::constant(self.gain.clone()), |acc, t| &acc * &t.to_poly());
        let den = self.poles().fold(Poly::one(), |acc, t| &acc * &t.to_poly());
        (num, den)
    }

    pub fn display_with<'a>(&'a self, var: &'a Symbol) -> FactorizationDisplay<'a> {
        FactorizationDisplay { fact: self, var }
    }
}

pub struct FactorizationDisplay<'a> {
    fact: &'a SymbolicFactorization,
    var: &'a Symbol,
}

impl fmt::Display for FactorizationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", wrap(&self.fact.gain))?;
        for t in self.fact.zeros() {
            write!(f, "*{}", t.display_with(self.var))?;
        }
        let poles: Vec<String> = self
            .fact
            .poles()
            .map(|t| t.display_with(self.var).to_string())
            .collect();
        match poles.len() {
            0 => Ok(()),
            1 => write!(f, "/{}", poles[0]),
            _ => write!(f, "/({})", poles.join("*")),
        }
    }
}

/// Factors `p` into a gain and standard-form terms, one term per unit of
/// multiplicity.
///
/// For [`Placement::Zero`] the result satisfies `p = gain · Π terms`; for
/// [`Placement::Pole`] it satisfies `1/p = gain / Π terms`.
pub fn factor_polynomial(
    p: &Poly<MPoly>,
    placement: Placement,
) -> TransferResult<(RatFunc, Vec<StandardTerm>)> {
    let factorization = factor_parametric(p)?;
    let mut gain = factorization.unit.clone();
    let mut terms = Vec::new();
    for (f, multiplicity) in &factorization.factors {
        let c = |k: usize| RatFunc::from_poly(f.coeff(k));
        let (k, term) = match f.degree() {
            Some(0) => (c(0), None),
            Some(1) if f.coeff(0).is_zero() => (c(1), Some(StandardTerm::Origin)),
            Some(1) => {
                let c0 = c(0);
                let tau = c(1).checked_div(&c0)?;
                (c0, Some(StandardTerm::FirstOrder { tau }))
            }
            Some(2) => {
                let c0 = c(0);
                if c0.is_zero() {
                    return Err(TransferError::Invariant {
                        what: "quadratic factor with a root at the origin",
                    });
                }
                let a2 = c(2).checked_div(&c0)?;
                let a1 = c(1).checked_div(&c0)?;
                (c0, Some(StandardTerm::SecondOrder { a2, a1 }))
            }
            Some(d) => {
                return Err(lti_algebra::AlgebraError::UnsupportedFactorDegree { degree: d }.into());
            }
            None => {
                return Err(TransferError::InvalidArg {
                    what: "cannot factor the zero polynomial",
                });
            }
        };
        for _ in 0..*multiplicity {
            gain = &gain * &k;
            if let Some(term) = &term {
                terms.push(term.clone());
            }
        }
    }
    if placement == Placement::Pole {
        gain = gain.inv()?;
    }
    debug!(
        degree = ?p.degree(),
        terms = terms.len(),
        ?placement,
        "standard form factorization"
    );
    Ok((gain, terms))
}

/// Factors `num / den` into standard form, cancelling terms that appear on
/// both sides.
pub fn factor_rational_function(
    num: &Poly<MPoly>,
    den: &Poly<MPoly>,
) -> TransferResult<SymbolicFactorization> {
    if num.is_zero() {
        return Ok(SymbolicFactorization {
            gain: RatFunc::zero(),
            terms: Vec::new(),
        });
    }
    let (kz, zeros) = factor_polynomial(num, Placement::Zero)?;
    let (kp, mut poles) = factor_polynomial(den, Placement::Pole)?;
    let mut terms = Vec::with_capacity(zeros.len() + poles.len());
    for z in zeros {
        match poles.iter().position(|p| *p == z) {
            Some(i) => {
                poles.remove(i);
            }
            None => terms.push(PlacedTerm {
                term: z,
                placement: Placement::Zero,
            }),
        }
    }
    terms.extend(poles.into_iter().map(|term| PlacedTerm {
        term,
        placement: Placement::Pole,
    }));
    Ok(SymbolicFactorization {
        gain: &kz * &kp,
        terms,
    })
}
