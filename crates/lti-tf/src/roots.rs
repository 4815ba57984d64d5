//! Closed-form roots of parametric polynomials.

use core::fmt;

use lti_algebra::{MPoly, Poly, RatFunc, factor_parametric};
use lti_core::Bindings;
use num_complex::Complex64;
use num_traits::Zero;

use crate::error::{TransferError, TransferResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Plus,
    Minus,
}

/// `center ± sqrt(radicand)`; `radicand` is zero for roots of linear factors.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicRoot {
    pub center: RatFunc,
    pub radicand: RatFunc,
    pub branch: Branch,
}

impl SymbolicRoot {
    pub fn simple(center: RatFunc) -> Self {
        Self {
            center,
            radicand: RatFunc::zero(),
            branch: Branch::Plus,
        }
    }

    pub fn is_simple(&self) -> bool {
        self.radicand.is_zero()
    }

    /// The root with every parameter bound to a number.
    pub fn eval(&self, bindings: &Bindings) -> TransferResult<Complex64> {
        let center = self.center.eval(bindings)?;
        let radicand = self.radicand.eval(bindings)?;
        let sqrt = Complex64::new(radicand, 0.0).sqrt();
        Ok(match self.branch {
            Branch::Plus => Complex64::new(center, 0.0) + sqrt,
            Branch::Minus => Complex64::new(center, 0.0) - sqrt,
        })
    }
}

impl fmt::Display for SymbolicRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_simple() {
            return write!(f, "{}", self.center);
        }
        let sign = match self.branch {
            Branch::Plus => '+',
            Branch::Minus => '-',
        };
        if self.center.is_zero() {
            let lead = if sign == '-' { "-" } else { "" };
            write!(f, "{lead}sqrt({})", self.radicand)
        } else {
            write!(f, "{} {sign} sqrt({})", self.center, self.radicand)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RootMultiplicity {
    pub root: SymbolicRoot,
    pub multiplicity: usize,
}

/// Roots of `p` in factor order, each with its multiplicity.
pub fn symbolic_roots(p: &Poly<MPoly>) -> TransferResult<Vec<RootMultiplicity>> {
    if p.degree().is_none_or(|d| d == 0) {
        return Ok(Vec::new());
    }
    let factorization = factor_parametric(p)?;
    let mut out = Vec::new();
    for (f, multiplicity) in &factorization.factors {
        let c = |k: usize| RatFunc::from_poly(f.coeff(k));
        match f.degree() {
            Some(0) | None => {}
            Some(1) => {
                let center = (-c(0)).checked_div(&c(1))?;
                out.push(RootMultiplicity {
                    root: SymbolicRoot::simple(center),
                    multiplicity: *multiplicity,
                });
            }
            Some(2) => {
                // a s² + b s + c: -b/(2a) ± sqrt((b² - 4ac)/(4a²))
                let (a, b, c0) = (c(2), c(1), c(0));
                let two_a = &a * &RatFunc::from(2);
                let center = (-&b).checked_div(&two_a)?;
                let disc = &b.pow(2) - &(&(&a * &c0) * &RatFunc::from(4));
                let radicand = disc.checked_div(&two_a.pow(2))?;
                for branch in [Branch::Plus, Branch::Minus] {
                    out.push(RootMultiplicity {
                        root: SymbolicRoot {
                            center: center.clone(),
                            radicand: radicand.clone(),
                            branch,
                        },
                        multiplicity: *multiplicity,
                    });
                }
            }
            Some(d) => {
                return Err(TransferError::Algebra(
                    lti_algebra::AlgebraError::UnsupportedFactorDegree { degree: d },
                ));
            }
        }
    }
    Ok(out)
}
