//! Frequency response `H(jω)` split into real polynomials in `ω`.

use core::fmt;

use lti_algebra::{MPoly, Poly};
use lti_core::{Bindings, LtiError, Symbol};
use num_complex::Complex64;

use crate::error::{TransferError, TransferResult};
use crate::symbolic::SymbolicTf;

/// `H(jω) = (num_re + j·num_im) / (den_re + j·den_im)`, each part a
/// polynomial in `omega` with parametric coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyResponse {
    pub omega: Symbol,
    pub num_re: Poly<MPoly>,
    pub num_im: Poly<MPoly>,
    pub den_re: Poly<MPoly>,
    pub den_im: Poly<MPoly>,
}

/// Real and imaginary parts of `p(jω)`: `j^k` cycles through `1, j, -1, -j`.
fn split_at_imaginary_axis(p: &Poly<MPoly>) -> (Poly<MPoly>, Poly<MPoly>) {
    let n = p.coeffs().len();
    let mut re = vec![MPoly::default(); n];
    let mut im = vec![MPoly::default(); n];
    for (k, c) in p.coeffs().iter().enumerate() {
        match k % 4 {
            0 => re[k] = c.clone(),
            1 => im[k] = c.clone(),
            2 => re[k] = -c,
            _ => im[k] = -c,
        }
    }
    (Poly::new(re), Poly::new(im))
}

fn eval_real(p: &Poly<MPoly>, w: f64, bindings: &Bindings) -> TransferResult<f64> {
    let mut acc = 0.0;
    for c in p.coeffs().iter().rev() {
        acc = acc * w + c.eval(bindings)?;
    }
    Ok(acc)
}

impl FrequencyResponse {
    /// `H(jω)` at a numeric frequency.
    pub fn eval(&self, w: f64, bindings: &Bindings) -> TransferResult<Complex64> {
        let num = Complex64::new(
            eval_real(&self.num_re, w, bindings)?,
            eval_real(&self.num_im, w, bindings)?,
        );
        let den = Complex64::new(
            eval_real(&self.den_re, w, bindings)?,
            eval_real(&self.den_im, w, bindings)?,
        );
        if den.norm() == 0.0 {
            return Err(TransferError::Core(LtiError::DivisionByZero {
                what: "frequency response on a pole",
            }));
        }
        Ok(num / den)
    }

    /// `|H(jω)|²` numerator and denominator: `|N|²` and `|D|²`.
    pub fn magnitude_squared(&self) -> (Poly<MPoly>, Poly<MPoly>) {
        let sq = |re: &Poly<MPoly>, im: &Poly<MPoly>| &(re * re) + &(im * im);
        (sq(&self.num_re, &self.num_im), sq(&self.den_re, &self.den_im))
    }
}

impl fmt::Display for FrequencyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = &self.omega;
        write!(
            f,
            "({} + j*({}))/({} + j*({}))",
            self.num_re.display_with(w),
            self.num_im.display_with(w),
            self.den_re.display_with(w),
            self.den_im.display_with(w)
        )
    }
}

impl SymbolicTf {
    /// `H(jω)` as polynomials in `omega`.
    pub fn frequency_response(&self, omega: Symbol) -> FrequencyResponse {
        let (num_re, num_im) = split_at_imaginary_axis(self.num());
        let (den_re, den_im) = split_at_imaginary_axis(self.den());
        FrequencyResponse {
            omega,
            num_re,
            num_im,
            den_re,
            den_im,
        }
    }
}
