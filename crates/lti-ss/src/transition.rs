//! State transition matrix `Φ(t) = e^{At}`.

use lti_algebra::linalg::charpoly_adjugate;
use lti_algebra::{ExpMatrix, PartialFractions, Rational};
use lti_core::Symbol;
use nalgebra::DMatrix;
use tracing::debug;

use crate::error::StateSpaceResult;

/// `e^{At}` in closed form.
///
/// Each entry is the inverse transform of `adj(sI − A)_{ij} / det(sI − A)`;
/// the poles are shared, so the partial-fraction expansion of the
/// characteristic polynomial is done once.
pub fn transition_matrix(a: &DMatrix<Rational>, t: Symbol) -> StateSpaceResult<ExpMatrix> {
    let n = a.nrows();
    let cp = charpoly_adjugate(a)?;
    let fractions = PartialFractions::new(&cp.charpoly)?;
    let mut entries = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            entries.push(fractions.invert(&cp.adjugate_entry(i, j), t.clone())?);
        }
    }
    debug!(n, poles = fractions.poles().count(), "transition matrix");
    Ok(ExpMatrix::from_fn(t, n, n, |i, j| entries[i * n + j].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lti_algebra::rational::rat;

    fn q(n: usize, values: &[i64]) -> DMatrix<Rational> {
        DMatrix::from_row_iterator(n, n, values.iter().map(|&v| rat(v)))
    }

    #[test]
    fn identity_at_zero() {
        let phi = transition_matrix(&q(3, &[-4, -3, 0, 0, -8, 4, 0, 0, -1]), Symbol::new("t")).unwrap();
        let at_zero = phi.eval_real(0.0);
        assert!((at_zero - DMatrix::<f64>::identity(3, 3)).norm() < 1e-12);
    }

    #[test]
    fn jordan_block_has_a_polynomial_term() {
        // e^{At} = e^{-t} [[1, t], [0, 1]]
        let phi = transition_matrix(&q(2, &[-1, 1, 0, -1]), Symbol::new("t")).unwrap();
        for time in [0.3_f64, 1.0, 2.5] {
            let m = phi.eval_real(time);
            let e = (-time).exp();
            assert!((m[(0, 0)] - e).abs() < 1e-12);
            assert!((m[(0, 1)] - time * e).abs() < 1e-12);
            assert!(m[(1, 0)].abs() < 1e-12);
            assert!((m[(1, 1)] - e).abs() < 1e-12);
        }
    }

    #[test]
    fn rotation() {
        // e^{At} = [[cos t, sin t], [-sin t, cos t]]
        let phi = transition_matrix(&q(2, &[0, 1, -1, 0]), Symbol::new("t")).unwrap();
        let m = phi.eval_real(0.7);
        assert!((m[(0, 0)] - 0.7_f64.cos()).abs() < 1e-12);
        assert!((m[(0, 1)] - 0.7_f64.sin()).abs() < 1e-12);
        assert!((m[(1, 0)] + 0.7_f64.sin()).abs() < 1e-12);
    }

    #[test]
    fn semigroup_property() {
        let a = q(2, &[-3, 1, 2, -2]);
        let phi = transition_matrix(&a, Symbol::new("t")).unwrap();
        let (s, u) = (0.4, 1.1);
        let lhs = phi.eval_real(s + u);
        let rhs = phi.eval_real(s) * phi.eval_real(u);
        assert!((lhs - rhs).norm() < 1e-10);
    }
}
