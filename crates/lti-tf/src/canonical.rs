//! Canonical factorization of numeric polynomials and transfer functions
//! into a gain and unit-DC first/second order terms (Bode sketching form).

use lti_algebra::rational::{from_f64, to_f64};
use lti_algebra::roots::polynomial_roots;
use lti_algebra::{Poly, Rational};
use lti_core::{Tolerances, all_nearly_equal, imag_negligible};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conjugate::pop_conjugate;
use crate::error::{TransferError, TransferResult};
use crate::transfer::TransferFunction;

/// Tolerance contract of the numeric factorization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorOptions {
    /// A root is complex when `|Im r| > imag_tolerance · max(1, |r|)`.
    pub imag_tolerance: f64,
    /// Newton steps applied to each companion-matrix root.
    pub polish_iterations: usize,
}

impl Default for FactorOptions {
    fn default() -> Self {
        Self {
            imag_tolerance: 1e-9,
            polish_iterations: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorKind {
    /// `[1]`, the overall gain
    Gain,
    /// `[τ, 1]`
    FirstOrder,
    /// `[1, 2ζωn, ωn²]` with gain `1/ωn²`
    SecondOrder,
    /// `[1, 0]`, a root at the origin
    Origin,
}

/// `gain · coeffs` is one factor of the polynomial; coefficients are highest
/// degree first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFactor {
    pub gain: f64,
    pub coeffs: Vec<f64>,
}

impl CanonicalFactor {
    pub fn kind(&self) -> FactorKind {
        match self.coeffs.as_slice() {
            [_] => FactorKind::Gain,
            [a, b] if *a == 1.0 && *b == 0.0 => FactorKind::Origin,
            [_, _] => FactorKind::FirstOrder,
            _ => FactorKind::SecondOrder,
        }
    }

    /// `gain · coeffs` as a polynomial.
    pub fn scaled_poly(&self) -> Poly<f64> {
        Poly::from_descending(&self.coeffs).scale(&self.gain)
    }

    /// Natural frequency of a second order factor.
    pub fn natural_frequency(&self) -> Option<f64> {
        match self.kind() {
            FactorKind::SecondOrder => Some(self.coeffs[2].sqrt()),
            _ => None,
        }
    }

    /// Damping ratio of a second order factor.
    pub fn damping_ratio(&self) -> Option<f64> {
        let wn = self.natural_frequency()?;
        Some(self.coeffs[1] / (2.0 * wn))
    }

    /// Time constant of a first order factor.
    pub fn time_constant(&self) -> Option<f64> {
        match self.kind() {
            FactorKind::FirstOrder => Some(self.coeffs[0]),
            _ => None,
        }
    }
}

/// Factors a polynomial (highest degree first) into
/// `[(K, [1]), (gain_1, coeffs_1), ...]` with `P = K · Π gain_i · coeffs_i`.
///
/// Repeated roots are split off first: the coefficients are taken exactly as
/// binary rationals and reduced to square-free parts, whose roots are found
/// separately and repeated by multiplicity. A triple real root therefore
/// gives three first order factors instead of a nearly real pair.
///
/// Roots are consumed from the end of the root list. A complex root is paired
/// with its nearest conjugate and gives the raw monic quadratic with gain
/// `1/ωn²`; a real root `r` gives `[τ, 1]` with `τ = −1/r`; a root at the
/// origin gives `[1, 0]`. `K` starts at the leading coefficient and absorbs
/// the constant term of every factor.
pub fn poly_factors_canonical(
    p: &[f64],
    options: &FactorOptions,
) -> TransferResult<Vec<CanonicalFactor>> {
    let poly = Poly::from_descending(p);
    let mut k = *poly.leading().ok_or(TransferError::InvalidArg {
        what: "cannot factor the zero polynomial",
    })?;
    let mut roots = repeated_roots(&poly, options.polish_iterations)?;
    let mut factors = Vec::with_capacity(roots.len() + 1);

    while let Some(root) = roots.pop() {
        if root.re == 0.0 && root.im == 0.0 {
            factors.push(CanonicalFactor {
                gain: 1.0,
                coeffs: vec![1.0, 0.0],
            });
        } else if !imag_negligible(root.re, root.im, options.imag_tolerance) {
            let partner = pop_conjugate(root, &mut roots).ok_or(TransferError::Invariant {
                what: "complex root without a conjugate partner",
            })?;
            // (s - r)(s - r̄) with the rounding imaginary parts dropped
            let b = -(root + partner).re;
            let c = (root * partner).re;
            factors.push(CanonicalFactor {
                gain: 1.0 / c,
                coeffs: vec![1.0, b, c],
            });
            k *= c;
        } else {
            if root.im != 0.0 {
                warn!(
                    re = root.re,
                    im = root.im,
                    "treating root with small imaginary part as real"
                );
            }
            let r = root.re;
            k *= -r;
            factors.push(CanonicalFactor {
                gain: 1.0,
                coeffs: vec![-1.0 / r, 1.0],
            });
        }
    }
    factors.insert(
        0,
        CanonicalFactor {
            gain: k,
            coeffs: vec![1.0],
        },
    );
    debug!(
        degree = ?poly.degree(),
        factors = factors.len(),
        gain = k,
        "canonical factorization"
    );
    Ok(factors)
}

/// Numeric roots of each square-free part, each listed `multiplicity` times.
fn repeated_roots(poly: &Poly<f64>, polish_iterations: usize) -> TransferResult<Vec<Complex64>> {
    let exact: Poly<Rational> = poly.try_map(|&c| from_f64(c, "polynomial coefficient"))?;
    let parts = exact.square_free();
    let mut roots = Vec::new();
    for (part, multiplicity) in &parts {
        let part = part.map(to_f64);
        for root in polynomial_roots(&part, polish_iterations)? {
            roots.extend(std::iter::repeat_n(root, *multiplicity));
        }
    }
    if parts.iter().any(|(_, m)| *m > 1) {
        debug!(parts = parts.len(), "split repeated roots before classification");
    }
    Ok(roots)
}

/// Product of `gain · coeffs` over all factors, highest degree first.
pub fn expand_factors(factors: &[CanonicalFactor]) -> Vec<f64> {
    factors
        .iter()
        .fold(Poly::one(), |acc, f| &acc * &f.scaled_poly())
        .to_descending()
}

impl TransferFunction {
    /// Splits a SISO transfer function into transfer functions whose product
    /// is `self`: the overall gain first, then one per zero factor
    /// (`coeffs / (1/k)`), then one per pole factor (`(1/k) / coeffs`).
    pub fn factor_canonical(&self, options: &FactorOptions) -> TransferResult<Vec<TransferFunction>> {
        self.require_siso("factor_canonical")?;
        let mut zeros = poly_factors_canonical(self.num()?, options)?;
        let mut poles = poly_factors_canonical(self.den()?, options)?;
        let kz = zeros.remove(0).gain;
        let kp = poles.remove(0).gain;
        let mut out = Vec::with_capacity(zeros.len() + poles.len() + 1);
        out.push(TransferFunction::gain(kz / kp)?);
        for z in zeros {
            out.push(TransferFunction::siso(z.coeffs, vec![1.0 / z.gain])?);
        }
        for p in poles {
            out.push(TransferFunction::siso(vec![1.0 / p.gain], p.coeffs)?);
        }
        Ok(out)
    }
}

/// Checks that the product of `factors` equals `system`.
///
/// Each side is divided by its own leading denominator coefficient, so an
/// overall scale shared by numerator and denominator does not matter. The
/// two rational functions are then compared by cross-multiplication,
/// `num_p · den_s ≈ num_s · den_p`. No pole/zero cancellation (minreal) is
/// run on the product; a product that keeps a common factor the system
/// lacks, or the other way round, still verifies.
pub fn verify_factorization(
    system: &TransferFunction,
    factors: &[TransferFunction],
    tolerance: Tolerances,
) -> TransferResult<()> {
    system.require_siso("verify_factorization")?;
    let product = factors
        .iter()
        .try_fold(TransferFunction::gain(1.0)?, |acc, f| acc.series(f))?
        .normalized()?;
    let expected = system.normalized()?;
    let lhs = (&product.num_poly()? * &expected.den_poly()?).to_descending();
    let rhs = (&expected.num_poly()? * &product.den_poly()?).to_descending();
    if all_nearly_equal(&lhs, &rhs, tolerance) {
        Ok(())
    } else {
        Err(TransferError::VerificationFailed {
            what: format!(
                "product {:?}/{:?} differs from {:?}/{:?}",
                product.num()?,
                product.den()?,
                expected.num()?,
                expected.den()?
            ),
        })
    }
}
