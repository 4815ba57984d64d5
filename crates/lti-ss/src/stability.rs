//! Stability classification from eigenvalues.

use core::cmp::Ordering;
use core::fmt;

use lti_algebra::Surd;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::eigen::Eigenstructure;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stability {
    /// Every eigenvalue has a negative real part.
    Stable,
    /// No eigenvalue in the right half plane, at least one on the imaginary
    /// axis, each with a complete set of eigenvectors.
    MarginallyStable,
    Unstable,
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stability::Stable => "stable",
            Stability::MarginallyStable => "marginally stable",
            Stability::Unstable => "unstable",
        })
    }
}

/// Classification of numeric eigenvalues; a real part within `tol` of zero
/// counts as on the imaginary axis.
pub fn stability_from_eigenvalues(values: &[Complex64], tol: f64) -> Stability {
    let mut on_axis = false;
    for v in values {
        if v.re > tol {
            return Stability::Unstable;
        }
        if v.re.abs() <= tol {
            on_axis = true;
        }
    }
    if on_axis {
        Stability::MarginallyStable
    } else {
        Stability::Stable
    }
}

/// Exact classification of an eigenstructure.
///
/// Repeated eigenvalues on the imaginary axis without a full set of
/// eigenvectors grow polynomially and count as unstable.
pub fn stability_of(eig: &Eigenstructure) -> Stability {
    let values = eig.values();
    if values.iter().any(|v| v.real_sign() == Ordering::Greater) {
        return Stability::Unstable;
    }
    let on_axis: Vec<&Surd> = values
        .iter()
        .filter(|v| v.real_sign() == Ordering::Equal)
        .collect();
    if on_axis.is_empty() {
        return Stability::Stable;
    }
    if let Eigenstructure::Defective { vectors, .. } = eig {
        // a zero column marks a missing eigenvector of the value in that slot
        let defective_on_axis = values.iter().enumerate().any(|(k, v)| {
            v.real_sign() == Ordering::Equal
                && vectors.column(k).iter().all(num_traits::Zero::is_zero)
        });
        if defective_on_axis {
            return Stability::Unstable;
        }
    }
    Stability::MarginallyStable
}

/// Exact classification from eigenvalues repeated by algebraic multiplicity.
///
/// `geometric` counts the independent eigenvectors of a value; it is only
/// asked about repeated values on the imaginary axis.
pub fn stability_from_exact<E>(
    values: &[Surd],
    geometric: impl Fn(&Surd) -> Result<usize, E>,
) -> Result<Stability, E> {
    if values.iter().any(|v| v.real_sign() == Ordering::Greater) {
        return Ok(Stability::Unstable);
    }
    let on_axis: Vec<&Surd> = values
        .iter()
        .filter(|v| v.real_sign() == Ordering::Equal)
        .collect();
    if on_axis.is_empty() {
        return Ok(Stability::Stable);
    }
    for (k, v) in on_axis.iter().enumerate() {
        if on_axis[..k].contains(v) {
            continue;
        }
        let algebraic = on_axis.iter().filter(|w| **w == *v).count();
        if algebraic > 1 && geometric(v)? < algebraic {
            return Ok(Stability::Unstable);
        }
    }
    Ok(Stability::MarginallyStable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eigen::eigenstructure;
    use lti_algebra::rational::rat;
    use nalgebra::DMatrix;

    fn q(n: usize, values: &[i64]) -> DMatrix<lti_algebra::Rational> {
        DMatrix::from_row_iterator(n, n, values.iter().map(|&v| rat(v)))
    }

    #[test]
    fn numeric_classification() {
        let c = Complex64::new;
        assert_eq!(
            stability_from_eigenvalues(&[c(-1.0, 0.0), c(-2.0, 3.0)], 0.0),
            Stability::Stable
        );
        assert_eq!(
            stability_from_eigenvalues(&[c(-1.0, 0.0), c(1e-14, 3.0)], 1e-12),
            Stability::MarginallyStable
        );
        assert_eq!(
            stability_from_eigenvalues(&[c(0.0, 0.0), c(0.5, 0.0)], 1e-12),
            Stability::Unstable
        );
        assert_eq!(Stability::MarginallyStable.to_string(), "marginally stable");
    }

    #[test]
    fn exact_classification() {
        let stable = eigenstructure(&q(3, &[-4, -3, 0, 0, -8, 4, 0, 0, -1])).unwrap();
        assert_eq!(stability_of(&stable), Stability::Stable);

        let oscillator = eigenstructure(&q(2, &[0, 1, -4, 0])).unwrap();
        assert_eq!(stability_of(&oscillator), Stability::MarginallyStable);

        // double integrator: a Jordan block at the origin
        let double_integrator = eigenstructure(&q(2, &[0, 1, 0, 0])).unwrap();
        assert_eq!(stability_of(&double_integrator), Stability::Unstable);

        // 1 - sqrt(2) < 0 but 1 + sqrt(2) > 0
        let saddle = eigenstructure(&q(2, &[1, 1, 1, 1])).unwrap();
        assert_eq!(stability_of(&saddle), Stability::Unstable);
    }

    #[test]
    fn repeated_axis_values_need_eigenvectors() {
        let zero = Surd::rational(rat(0));
        let values = [zero.clone(), zero.clone(), Surd::rational(rat(-3))];
        let complete = stability_from_exact(&values, |_| Ok::<_, ()>(2));
        assert_eq!(complete, Ok(Stability::MarginallyStable));
        let defective = stability_from_exact(&values, |_| Ok::<_, ()>(1));
        assert_eq!(defective, Ok(Stability::Unstable));

        // simple values never need the count
        let simple = [zero, Surd::rational(rat(-1))];
        let asked = stability_from_exact(&simple, |_| Err("asked"));
        assert_eq!(asked, Ok(Stability::MarginallyStable));
        let unstable = [Surd::rational(rat(2))];
        assert_eq!(stability_from_exact(&unstable, |_| Err("asked")), Ok(Stability::Unstable));
    }
}
