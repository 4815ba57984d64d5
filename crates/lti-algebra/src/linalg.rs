//! Exact linear algebra over a coefficient field on nalgebra's dense
//! matrices.
//!
//! nalgebra's own decompositions need floating point scalars, so elimination,
//! null spaces and the characteristic polynomial are written out here for
//! any [`FieldCoefficient`].

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::error::{AlgebraError, AlgebraResult};
use crate::poly::{Coefficient, FieldCoefficient, Poly};

pub fn identity<T: Coefficient + 'static>(n: usize) -> DMatrix<T> {
    DMatrix::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
}

pub fn zeros<T: Coefficient + 'static>(rows: usize, cols: usize) -> DMatrix<T> {
    DMatrix::from_fn(rows, cols, |_, _| T::zero())
}

pub fn mat_mul<T: Coefficient + 'static>(
    a: &DMatrix<T>,
    b: &DMatrix<T>,
) -> AlgebraResult<DMatrix<T>> {
    if a.ncols() != b.nrows() {
        return Err(AlgebraError::Numeric {
            what: format!(
                "cannot multiply {}x{} by {}x{}",
                a.nrows(),
                a.ncols(),
                b.nrows(),
                b.ncols()
            ),
        });
    }
    Ok(DMatrix::from_fn(a.nrows(), b.ncols(), |i, j| {
        (0..a.ncols()).fold(T::zero(), |acc, k| {
            acc + a[(i, k)].clone() * b[(k, j)].clone()
        })
    }))
}

pub fn mat_add<T: Coefficient + 'static>(a: &DMatrix<T>, b: &DMatrix<T>) -> DMatrix<T> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| {
        a[(i, j)].clone() + b[(i, j)].clone()
    })
}

/// `a − λ·I`
pub fn shift_diagonal<T: Coefficient + 'static>(a: &DMatrix<T>, lambda: &T) -> DMatrix<T> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| {
        if i == j {
            a[(i, j)].clone() - lambda.clone()
        } else {
            a[(i, j)].clone()
        }
    })
}

pub fn trace_of<T: Coefficient + 'static>(a: &DMatrix<T>) -> T {
    (0..a.nrows().min(a.ncols())).fold(T::zero(), |acc, i| acc + a[(i, i)].clone())
}

/// Reduced row echelon form and the pivot columns.
pub fn rref<T: FieldCoefficient + 'static>(m: &DMatrix<T>) -> (DMatrix<T>, Vec<usize>) {
    let mut r = m.clone();
    let (rows, cols) = r.shape();
    let mut pivots = Vec::new();
    let mut row = 0;
    for col in 0..cols {
        if row == rows {
            break;
        }
        let Some(p) = (row..rows).find(|&i| !r[(i, col)].is_zero()) else {
            continue;
        };
        r.swap_rows(row, p);
        let Some(inv) = r[(row, col)].try_inv() else {
            continue;
        };
        for j in col..cols {
            r[(row, j)] = r[(row, j)].clone() * inv.clone();
        }
        for i in 0..rows {
            if i == row || r[(i, col)].is_zero() {
                continue;
            }
            let factor = r[(i, col)].clone();
            for j in col..cols {
                r[(i, j)] = r[(i, j)].clone() - factor.clone() * r[(row, j)].clone();
            }
        }
        pivots.push(col);
        row += 1;
    }
    (r, pivots)
}

pub fn rank<T: FieldCoefficient + 'static>(m: &DMatrix<T>) -> usize {
    rref(m).1.len()
}

/// Basis of the right null space, one vector per free column, with a one in
/// that free position.
pub fn nullspace<T: FieldCoefficient + 'static>(m: &DMatrix<T>) -> Vec<DVector<T>> {
    let (r, pivots) = rref(m);
    let cols = m.ncols();
    let free = (0..cols).filter(|c| !pivots.contains(c));
    free.map(|f| {
        let mut v = DVector::from_fn(cols, |_, _| T::zero());
        v[f] = T::one();
        for (row, &p) in pivots.iter().enumerate() {
            v[p] = -r[(row, f)].clone();
        }
        v
    })
    .collect()
}

pub fn inverse<T: FieldCoefficient + 'static>(m: &DMatrix<T>) -> Option<DMatrix<T>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }
    let aug = DMatrix::from_fn(n, 2 * n, |i, j| {
        if j < n {
            m[(i, j)].clone()
        } else if j - n == i {
            T::one()
        } else {
            T::zero()
        }
    });
    let (r, pivots) = rref(&aug);
    if pivots.len() < n || pivots[n - 1] >= n {
        return None;
    }
    Some(DMatrix::from_fn(n, n, |i, j| r[(i, n + j)].clone()))
}

/// Characteristic polynomial `det(sI − A)` and the coefficient matrices of
/// the adjugate `adj(sI − A) = Σ_k adj[k]·s^k`, by Faddeev–LeVerrier.
#[derive(Clone, Debug, PartialEq)]
pub struct CharPoly<T: FieldCoefficient + 'static> {
    pub charpoly: Poly<T>,
    pub adjugate: Vec<DMatrix<T>>,
}

impl<T: FieldCoefficient + 'static> CharPoly<T> {
    /// Entry `(i, j)` of the adjugate as a polynomial in `s`.
    pub fn adjugate_entry(&self, i: usize, j: usize) -> Poly<T> {
        Poly::new(self.adjugate.iter().map(|m| m[(i, j)].clone()).collect())
    }
}

pub fn charpoly_adjugate<T: FieldCoefficient + 'static>(
    a: &DMatrix<T>,
) -> AlgebraResult<CharPoly<T>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(AlgebraError::Numeric {
            what: format!("characteristic polynomial of a {}x{} matrix", n, a.ncols()),
        });
    }
    // M_1 = I, c_{n-1} = -tr(A); M_k = A M_{k-1} + c_{n-k+1} I
    let mut coeffs = vec![T::zero(); n + 1];
    coeffs[n] = T::one();
    let mut adjugate = vec![zeros::<T>(n, n); n];
    let mut m = zeros::<T>(n, n);
    for k in 1..=n {
        let shift = DMatrix::from_fn(n, n, |i, j| {
            if i == j { coeffs[n - k + 1].clone() } else { T::zero() }
        });
        m = mat_add(&mat_mul(a, &m)?, &shift);
        adjugate[n - k] = m.clone();
        let am = mat_mul(a, &m)?;
        let k_inv = T::from_i64(k as i64)
            .try_inv()
            .ok_or(AlgebraError::DivisionByZero {
                what: "Faddeev-LeVerrier step",
            })?;
        coeffs[n - k] = -(trace_of(&am) * k_inv);
    }
    trace!(n, "characteristic polynomial");
    Ok(CharPoly {
        charpoly: Poly::new(coeffs),
        adjugate,
    })
}
