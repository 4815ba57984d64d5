//! Numeric transfer functions.

use lti_algebra::Poly;
use lti_algebra::roots::polynomial_roots;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{TransferError, TransferResult};

/// Rational transfer function with real coefficients.
///
/// `num[o][i]` and `den[o][i]` hold the polynomial from input `i` to output
/// `o`, highest degree first. SISO systems are the 1x1 case. Properness is
/// not required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    num: Vec<Vec<Vec<f64>>>,
    den: Vec<Vec<Vec<f64>>>,
}

fn check_poly(coeffs: &[f64], what: &'static str) -> TransferResult<()> {
    if coeffs.is_empty() {
        return Err(TransferError::InvalidArg { what });
    }
    for &c in coeffs {
        lti_core::ensure_finite(c, what)?;
    }
    Ok(())
}

impl TransferFunction {
    /// Single-input single-output transfer function `num(s) / den(s)`.
    pub fn siso(num: Vec<f64>, den: Vec<f64>) -> TransferResult<Self> {
        Self::mimo(vec![vec![num]], vec![vec![den]])
    }

    pub fn mimo(num: Vec<Vec<Vec<f64>>>, den: Vec<Vec<Vec<f64>>>) -> TransferResult<Self> {
        let outputs = num.len();
        let inputs = num.first().map_or(0, Vec::len);
        if outputs == 0 || inputs == 0 {
            return Err(TransferError::InvalidArg {
                what: "transfer function needs at least one input and output",
            });
        }
        if den.len() != outputs
            || num.iter().any(|row| row.len() != inputs)
            || den.iter().any(|row| row.len() != inputs)
        {
            return Err(TransferError::DimensionMismatch {
                what: format!("numerator is {outputs}x{inputs}, denominator shape differs"),
            });
        }
        for (n, d) in num.iter().flatten().zip(den.iter().flatten()) {
            check_poly(n, "numerator coefficients")?;
            check_poly(d, "denominator coefficients")?;
            if d.iter().all(|&c| c == 0.0) {
                return Err(TransferError::InvalidArg {
                    what: "denominator is identically zero",
                });
            }
        }
        Ok(Self { num, den })
    }

    /// Pure gain `k / 1`.
    pub fn gain(k: f64) -> TransferResult<Self> {
        Self::siso(vec![k], vec![1.0])
    }

    pub fn outputs(&self) -> usize {
        self.num.len()
    }

    pub fn inputs(&self) -> usize {
        self.num.first().map_or(0, Vec::len)
    }

    pub fn is_siso(&self) -> bool {
        self.outputs() == 1 && self.inputs() == 1
    }

    /// Fails with `MimoUnsupported` unless the system is SISO.
    pub fn require_siso(&self, what: &'static str) -> TransferResult<()> {
        if self.is_siso() {
            Ok(())
        } else {
            Err(TransferError::MimoUnsupported {
                what,
                outputs: self.outputs(),
                inputs: self.inputs(),
            })
        }
    }

    /// Numerator of the SISO path, highest degree first.
    pub fn num(&self) -> TransferResult<&[f64]> {
        self.require_siso("num")?;
        Ok(&self.num[0][0])
    }

    pub fn den(&self) -> TransferResult<&[f64]> {
        self.require_siso("den")?;
        Ok(&self.den[0][0])
    }

    /// Numerator and denominator of one input/output path.
    pub fn path(&self, output: usize, input: usize) -> Option<(&[f64], &[f64])> {
        let n = self.num.get(output)?.get(input)?;
        let d = self.den.get(output)?.get(input)?;
        Some((n, d))
    }

    pub fn num_poly(&self) -> TransferResult<Poly<f64>> {
        Ok(Poly::from_descending(self.num()?))
    }

    pub fn den_poly(&self) -> TransferResult<Poly<f64>> {
        Ok(Poly::from_descending(self.den()?))
    }

    /// `H(s)` at a complex point.
    pub fn eval(&self, s: Complex64) -> TransferResult<Complex64> {
        let n = self.num_poly()?.eval_with(&s, |c| Complex64::new(*c, 0.0));
        let d = self.den_poly()?.eval_with(&s, |c| Complex64::new(*c, 0.0));
        if d.norm() == 0.0 {
            return Err(TransferError::Core(lti_core::LtiError::DivisionByZero {
                what: "transfer function evaluation",
            }));
        }
        Ok(n / d)
    }

    pub fn dc_gain(&self) -> TransferResult<f64> {
        Ok(self.eval(Complex64::new(0.0, 0.0))?.re)
    }

    pub fn poles(&self) -> TransferResult<Vec<Complex64>> {
        Ok(polynomial_roots(&self.den_poly()?, 3)?)
    }

    pub fn zeros(&self) -> TransferResult<Vec<Complex64>> {
        let num = self.num_poly()?;
        if num.is_zero() {
            return Ok(Vec::new());
        }
        Ok(polynomial_roots(&num, 3)?)
    }

    /// Series connection `self · other` (no cancellation).
    pub fn series(&self, other: &TransferFunction) -> TransferResult<TransferFunction> {
        self.require_siso("series")?;
        other.require_siso("series")?;
        let num = &self.num_poly()? * &other.num_poly()?;
        let den = &self.den_poly()? * &other.den_poly()?;
        Self::siso(num.to_descending(), den.to_descending())
    }

    /// Both polynomials divided by the leading denominator coefficient.
    pub fn normalized(&self) -> TransferResult<TransferFunction> {
        let den = self.den_poly()?;
        let lead = den.leading().copied().ok_or(TransferError::InvalidArg {
            what: "denominator is identically zero",
        })?;
        let num = self.num_poly()?.scale(&lead.recip());
        Self::siso(num.to_descending(), den.scale(&lead.recip()).to_descending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siso_accessors() {
        let h = TransferFunction::siso(vec![1.0, 2.0], vec![1.0, 3.0, 2.0]).unwrap();
        assert!(h.is_siso());
        assert_eq!(h.num().unwrap(), &[1.0, 2.0]);
        assert!((h.dc_gain().unwrap() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn mimo_is_reported_with_shape() {
        let h = TransferFunction::mimo(
            vec![vec![vec![1.0], vec![2.0]]],
            vec![vec![vec![1.0, 1.0], vec![1.0, 2.0]]],
        )
        .unwrap();
        assert_eq!((h.outputs(), h.inputs()), (1, 2));
        let err = h.num().unwrap_err();
        assert!(matches!(
            err,
            TransferError::MimoUnsupported {
                outputs: 1,
                inputs: 2,
                ..
            }
        ));
        assert_eq!(h.path(0, 1), Some((&[2.0][..], &[1.0, 2.0][..])));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(TransferFunction::siso(vec![1.0], vec![0.0, 0.0]).is_err());
        assert!(TransferFunction::siso(vec![f64::NAN], vec![1.0]).is_err());
        assert!(TransferFunction::siso(vec![], vec![1.0]).is_err());
    }

    #[test]
    fn series_multiplies_polynomials() {
        let a = TransferFunction::siso(vec![1.0], vec![1.0, 1.0]).unwrap();
        let b = TransferFunction::siso(vec![2.0], vec![1.0, 2.0]).unwrap();
        let ab = a.series(&b).unwrap();
        assert_eq!(ab.den().unwrap(), &[1.0, 3.0, 2.0]);
        assert_eq!(ab.num().unwrap(), &[2.0]);
    }

    #[test]
    fn serde_round_trip() {
        let h = TransferFunction::siso(vec![3.0], vec![2.0, 1.0]).unwrap();
        let json = serde_json::to_string(&h).unwrap();
        let back: TransferFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
