//! Numeric polynomial roots.
//!
//! Roots are the eigenvalues of the companion matrix (nalgebra's real Schur
//! decomposition), refined with a few Newton steps on the input
//! polynomial.

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::trace;

use crate::error::{AlgebraError, AlgebraResult};
use crate::poly::Poly;

/// All complex roots of a real polynomial, counted with multiplicity.
///
/// Roots at the origin are split off exactly before the companion matrix is
/// built and are returned last.
pub fn polynomial_roots(p: &Poly<f64>, polish_iterations: usize) -> AlgebraResult<Vec<Complex64>> {
    if p.is_zero() {
        return Err(AlgebraError::ZeroPolynomial {
            what: "polynomial_roots",
        });
    }
    if let Some(bad) = p.coeffs().iter().find(|c| !c.is_finite()) {
        return Err(AlgebraError::Numeric {
            what: format!("non-finite polynomial coefficient {bad}"),
        });
    }
    let zeros = p.low_order_zeros();
    let reduced = p.shift_down(zeros);
    let n = reduced.degree().unwrap_or(0);

    let mut roots = Vec::with_capacity(n + zeros);
    if n > 0 {
        let c = reduced.coeffs();
        let lead = c[n];
        // first row holds -a_{n-1}/a_n ... -a_0/a_n, ones on the subdiagonal
        let companion = DMatrix::from_fn(n, n, |i, j| {
            if i == 0 {
                -c[n - 1 - j] / lead
            } else if i == j + 1 {
                1.0
            } else {
                0.0
            }
        });
        for z in companion.complex_eigenvalues().iter() {
            roots.push(polish(&reduced, *z, polish_iterations));
        }
    }
    roots.extend(std::iter::repeat_n(Complex64::new(0.0, 0.0), zeros));
    trace!(degree = ?p.degree(), roots = roots.len(), "polynomial roots");
    Ok(roots)
}

/// Value and derivative of a real polynomial at a complex point.
pub fn eval_with_derivative(p: &Poly<f64>, z: Complex64) -> (Complex64, Complex64) {
    let mut value = Complex64::new(0.0, 0.0);
    let mut deriv = Complex64::new(0.0, 0.0);
    for &c in p.coeffs().iter().rev() {
        deriv = deriv * z + value;
        value = value * z + c;
    }
    (value, deriv)
}

/// Newton refinement, keeping a step only when it reduces `|p(z)|`.
fn polish(p: &Poly<f64>, mut z: Complex64, iterations: usize) -> Complex64 {
    for _ in 0..iterations {
        let (value, deriv) = eval_with_derivative(p, z);
        if value.norm() == 0.0 || deriv.norm() == 0.0 {
            break;
        }
        let candidate = z - value / deriv;
        if !candidate.re.is_finite() || !candidate.im.is_finite() {
            break;
        }
        if eval_with_derivative(p, candidate).0.norm() < value.norm() {
            z = candidate;
        } else {
            break;
        }
    }
    z
}
