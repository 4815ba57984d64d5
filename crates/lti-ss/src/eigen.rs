//! Exact eigenstructure of rational matrices.
//!
//! Eigenvalues come from the exact factorization of the characteristic
//! polynomial, so they are rationals or quadratic surds; eigenvectors are
//! null spaces of `A − λI` over `Q(√d)`.

use lti_algebra::linalg::{charpoly_adjugate, mat_mul, nullspace, rank};
use lti_algebra::{AlgebraError, Rational, Surd, factor_rational};
use nalgebra::{DMatrix, DVector};
use num_traits::{One, Zero};
use tracing::{debug, warn};

use crate::error::{StateSpaceError, StateSpaceResult};

/// Eigenvalues repeated by algebraic multiplicity, and the matching
/// eigenvector columns.
#[derive(Clone, Debug, PartialEq)]
pub enum Eigenstructure {
    /// One independent eigenvector per eigenvalue.
    Complete {
        values: Vec<Surd>,
        vectors: DMatrix<Surd>,
    },
    /// Some eigenvalues have fewer eigenvectors than their multiplicity; the
    /// `missing` columns are left zero.
    Defective {
        values: Vec<Surd>,
        vectors: DMatrix<Surd>,
        missing: usize,
    },
}

impl Eigenstructure {
    pub fn values(&self) -> &[Surd] {
        match self {
            Eigenstructure::Complete { values, .. } | Eigenstructure::Defective { values, .. } => {
                values
            }
        }
    }

    pub fn vectors(&self) -> &DMatrix<Surd> {
        match self {
            Eigenstructure::Complete { vectors, .. }
            | Eigenstructure::Defective { vectors, .. } => vectors,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Eigenstructure::Complete { .. })
    }

    /// Diagonal eigenvalue matrix.
    pub fn value_matrix(&self) -> DMatrix<Surd> {
        let values = self.values();
        DMatrix::from_fn(values.len(), values.len(), |i, j| {
            if i == j { values[i].clone() } else { Surd::zero() }
        })
    }
}

/// Distinct eigenvalues with their algebraic multiplicity, in factor order.
pub fn eigenvalues_with_multiplicity(a: &DMatrix<Rational>) -> StateSpaceResult<Vec<(Surd, usize)>> {
    let cp = charpoly_adjugate(a)?;
    let factorization = factor_rational(&cp.charpoly)?;
    let mut out = Vec::new();
    for (f, m) in &factorization.factors {
        match f.degree() {
            Some(1) => out.push((Surd::rational(-f.coeff(0)), *m)),
            Some(2) => {
                for root in Surd::quadratic_roots(&f.coeff(1), &f.coeff(0)) {
                    out.push((root, *m));
                }
            }
            Some(d) => return Err(AlgebraError::UnsupportedFactorDegree { degree: d }.into()),
            None => {}
        }
    }
    Ok(out)
}

fn as_surd(a: &DMatrix<Rational>) -> DMatrix<Surd> {
    a.map(Surd::rational)
}

/// `A − λI` over `Q(√d)`.
fn shifted(a: &DMatrix<Surd>, lambda: &Surd) -> DMatrix<Surd> {
    lti_algebra::linalg::shift_diagonal(a, lambda)
}

/// Eigenvalues, eigenvectors and their completeness.
pub fn eigenstructure(a: &DMatrix<Rational>) -> StateSpaceResult<Eigenstructure> {
    let n = a.nrows();
    let a_s = as_surd(a);
    let mut values = Vec::with_capacity(n);
    let mut vectors = DMatrix::from_element(n, n, Surd::zero());
    let mut missing = 0;
    let mut col = 0;
    for (lambda, multiplicity) in eigenvalues_with_multiplicity(a)? {
        let basis = nullspace(&shifted(&a_s, &lambda));
        let found = basis.len().min(multiplicity);
        for (k, v) in basis.into_iter().take(multiplicity).enumerate() {
            vectors.set_column(col + k, &v);
        }
        if found < multiplicity {
            warn!(
                eigenvalue = %lambda,
                algebraic = multiplicity,
                geometric = found,
                "defective eigenvalue"
            );
            missing += multiplicity - found;
        }
        values.extend(std::iter::repeat_n(lambda, multiplicity));
        col += multiplicity;
    }
    if values.len() != n {
        return Err(StateSpaceError::Invariant {
            what: "eigenvalue count differs from the matrix order",
        });
    }
    debug!(n, missing, "eigenstructure");
    Ok(if missing == 0 {
        Eigenstructure::Complete { values, vectors }
    } else {
        Eigenstructure::Defective {
            values,
            vectors,
            missing,
        }
    })
}

/// Whether `A` has a full set of eigenvectors; with `reals_only`, also that
/// every eigenvalue is real.
pub fn is_diagonalizable(a: &DMatrix<Rational>, reals_only: bool) -> StateSpaceResult<bool> {
    let eig = eigenstructure(a)?;
    Ok(eig.is_complete() && (!reals_only || eig.values().iter().all(Surd::is_real)))
}

/// `(P, D)` with `D = P⁻¹ A P` diagonal.
///
/// With `sort`, eigenvalues are ordered by real part and then imaginary part.
pub fn diagonalize(
    a: &DMatrix<Rational>,
    reals_only: bool,
    sort: bool,
) -> StateSpaceResult<(DMatrix<Surd>, DMatrix<Surd>)> {
    let eig = eigenstructure(a)?;
    let Eigenstructure::Complete { values, vectors } = eig else {
        return Err(StateSpaceError::NotDiagonalizable {
            what: "eigenvectors do not span the state space",
        });
    };
    if reals_only && !values.iter().all(Surd::is_real) {
        return Err(StateSpaceError::NotDiagonalizable {
            what: "complex eigenvalues with reals_only",
        });
    }
    let mut order: Vec<usize> = (0..values.len()).collect();
    if sort {
        order.sort_by(|&i, &j| {
            let (x, y) = (values[i].to_complex(), values[j].to_complex());
            x.re.total_cmp(&y.re).then(x.im.total_cmp(&y.im))
        });
    }
    let n = values.len();
    let p = DMatrix::from_fn(n, n, |i, j| vectors[(i, order[j])].clone());
    let d = DMatrix::from_fn(n, n, |i, j| {
        if i == j { values[order[i]].clone() } else { Surd::zero() }
    });
    Ok((p, d))
}

/// A basis of generalized eigenvectors: for each eigenvalue of multiplicity
/// `m`, its eigenvectors completed from `ker (A − λI)^m`.
pub fn generalized_eigenbasis(a: &DMatrix<Rational>) -> StateSpaceResult<DMatrix<Surd>> {
    let n = a.nrows();
    let a_s = as_surd(a);
    let mut columns: Vec<DVector<Surd>> = Vec::with_capacity(n);
    for (lambda, multiplicity) in eigenvalues_with_multiplicity(a)? {
        let shift = shifted(&a_s, &lambda);
        let mut block: Vec<DVector<Surd>> = nullspace(&shift);
        if block.len() < multiplicity {
            let mut power = shift.clone();
            for _ in 1..multiplicity {
                power = mat_mul(&power, &shift)?;
            }
            for v in nullspace(&power) {
                if block.len() == multiplicity {
                    break;
                }
                let mut candidate = block.clone();
                candidate.push(v);
                if rank(&DMatrix::from_columns(&candidate)) == candidate.len() {
                    block = candidate;
                }
            }
        }
        if block.len() != multiplicity {
            return Err(StateSpaceError::Invariant {
                what: "generalized eigenspace has the wrong dimension",
            });
        }
        columns.extend(block);
    }
    if columns.len() != n {
        return Err(StateSpaceError::Invariant {
            what: "generalized eigenbasis is incomplete",
        });
    }
    Ok(DMatrix::from_columns(&columns))
}

/// `true` when `v` is a non-zero vector with `A v = λ v`.
pub fn is_eigenpair(a: &DMatrix<Rational>, lambda: &Surd, v: &DVector<Surd>) -> bool {
    let a_s = as_surd(a);
    let shift = shifted(&a_s, lambda);
    let column = DMatrix::from_columns(&[v.clone()]);
    !v.iter().all(Zero::is_zero)
        && mat_mul(&shift, &column).is_ok_and(|r| r.iter().all(Zero::is_zero))
}

/// Exact `1` of `Q(√d)`; used to build identity matrices of surds.
pub fn surd_identity(n: usize) -> DMatrix<Surd> {
    DMatrix::from_fn(n, n, |i, j| if i == j { Surd::one() } else { Surd::zero() })
}
