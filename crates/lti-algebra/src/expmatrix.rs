//! Matrices of exponential polynomials: state transition matrices and
//! vector-valued responses.

use lti_core::Symbol;
use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::error::{AlgebraError, AlgebraResult};
use crate::exppoly::ExpPoly;

#[derive(Clone, Debug, PartialEq)]
pub struct ExpMatrix {
    var: Symbol,
    data: DMatrix<ExpPoly>,
}

impl ExpMatrix {
    pub fn zeros(var: Symbol, rows: usize, cols: usize) -> Self {
        let data = DMatrix::from_fn(rows, cols, |_, _| ExpPoly::zero(var.clone()));
        Self { var, data }
    }

    pub fn from_fn(
        var: Symbol,
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> ExpPoly,
    ) -> Self {
        let data = DMatrix::from_fn(rows, cols, |i, j| f(i, j).with_variable(var.clone()));
        Self { var, data }
    }

    /// Constant matrix.
    pub fn from_real(var: Symbol, m: &DMatrix<f64>) -> Self {
        Self::from_fn(var.clone(), m.nrows(), m.ncols(), |i, j| {
            ExpPoly::constant(var.clone(), m[(i, j)])
        })
    }

    pub fn var(&self) -> &Symbol {
        &self.var
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&ExpPoly> {
        self.data.get((i, j))
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(ExpPoly::is_zero)
    }

    pub fn map(&self, f: impl Fn(&ExpPoly) -> ExpPoly) -> Self {
        let data = self.data.map(|e| f(&e));
        let var = data
            .iter()
            .find(|e| !e.is_zero())
            .map_or_else(|| self.var.clone(), |e| e.var().clone());
        Self { var, data }
    }

    pub fn reflect(&self) -> Self {
        self.map(ExpPoly::reflect)
    }

    pub fn with_variable(&self, var: Symbol) -> Self {
        Self {
            data: self.data.map(|e| e.with_variable(var.clone())),
            var,
        }
    }

    pub fn integrate_from_zero(&self, upper: Symbol) -> Self {
        Self {
            data: self.data.map(|e| e.integrate_from_zero(upper.clone())),
            var: upper,
        }
    }

    fn check_dims(&self, rows: usize, what: &str) -> AlgebraResult<()> {
        if self.ncols() != rows {
            return Err(AlgebraError::Numeric {
                what: format!(
                    "{what}: {}x{} times {} rows",
                    self.nrows(),
                    self.ncols(),
                    rows
                ),
            });
        }
        Ok(())
    }

    pub fn mul(&self, rhs: &ExpMatrix) -> AlgebraResult<ExpMatrix> {
        self.check_dims(rhs.nrows(), "exp matrix product")?;
        Ok(Self::from_fn(self.var.clone(), self.nrows(), rhs.ncols(), |i, j| {
            (0..self.ncols()).fold(ExpPoly::zero(self.var.clone()), |acc, k| {
                &acc + &(&self.data[(i, k)] * &rhs.data[(k, j)])
            })
        }))
    }

    /// `self · m` for a constant matrix `m`.
    pub fn mul_real(&self, m: &DMatrix<f64>) -> AlgebraResult<ExpMatrix> {
        self.check_dims(m.nrows(), "exp matrix times constant")?;
        Ok(Self::from_fn(self.var.clone(), self.nrows(), m.ncols(), |i, j| {
            (0..self.ncols()).fold(ExpPoly::zero(self.var.clone()), |acc, k| {
                &acc + &self.data[(i, k)].scale_real(m[(k, j)])
            })
        }))
    }

    /// `m · self` for a constant matrix `m`.
    pub fn left_mul_real(&self, m: &DMatrix<f64>) -> AlgebraResult<ExpMatrix> {
        if m.ncols() != self.nrows() {
            return Err(AlgebraError::Numeric {
                what: format!(
                    "constant times exp matrix: {}x{} times {} rows",
                    m.nrows(),
                    m.ncols(),
                    self.nrows()
                ),
            });
        }
        Ok(Self::from_fn(self.var.clone(), m.nrows(), self.ncols(), |i, j| {
            (0..m.ncols()).fold(ExpPoly::zero(self.var.clone()), |acc, k| {
                &acc + &self.data[(k, j)].scale_real(m[(i, k)])
            })
        }))
    }

    pub fn add(&self, rhs: &ExpMatrix) -> AlgebraResult<ExpMatrix> {
        if self.data.shape() != rhs.data.shape() {
            return Err(AlgebraError::Numeric {
                what: format!(
                    "adding {:?} and {:?} exp matrices",
                    self.data.shape(),
                    rhs.data.shape()
                ),
            });
        }
        Ok(Self::from_fn(self.var.clone(), self.nrows(), self.ncols(), |i, j| {
            &self.data[(i, j)] + &rhs.data[(i, j)]
        }))
    }

    pub fn eval(&self, t: f64) -> DMatrix<Complex64> {
        self.data.map(|e| e.eval(t))
    }

    /// Real parts of the values at `t`.
    pub fn eval_real(&self, t: f64) -> DMatrix<f64> {
        self.data.map(|e| e.eval_real(t))
    }

    pub fn approx_eq(&self, other: &ExpMatrix, tol: f64) -> bool {
        self.data.shape() == other.data.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.approx_eq(b, tol))
    }
}

impl core::ops::Index<(usize, usize)> for ExpMatrix {
    type Output = ExpPoly;
    fn index(&self, index: (usize, usize)) -> &ExpPoly {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> Symbol {
        Symbol::new("t")
    }

    fn exp(rate: f64) -> ExpPoly {
        ExpPoly::term(t(), Complex64::new(1.0, 0.0), 0, Complex64::new(rate, 0.0))
    }

    #[test]
    fn diagonal_exponentials_compose() {
        let phi = ExpMatrix::from_fn(t(), 2, 2, |i, j| {
            if i == j { exp(-(i as f64) - 1.0) } else { ExpPoly::zero(t()) }
        });
        let back = phi.reflect();
        let product = phi.mul(&back).unwrap();
        let identity = ExpMatrix::from_real(t(), &DMatrix::identity(2, 2));
        assert!(product.approx_eq(&identity, 1e-14));
    }

    #[test]
    fn constant_products_and_dimension_checks() {
        let phi = ExpMatrix::from_fn(t(), 2, 2, |i, _| exp(-(i as f64)));
        let x0 = DMatrix::from_column_slice(2, 1, &[1.0, 2.0]);
        let x = phi.mul_real(&x0).unwrap();
        assert_eq!((x.nrows(), x.ncols()), (2, 1));
        assert!((x.eval_real(0.0)[(1, 0)] - 3.0).abs() < 1e-15);
        assert!(phi.mul_real(&DMatrix::zeros(3, 1)).is_err());
        let c = DMatrix::from_row_slice(1, 2, &[0.0, 1.0]);
        let y = x.left_mul_real(&c).unwrap();
        assert!((y.eval_real(1.0)[(0, 0)] - 3.0 * (-1.0_f64).exp()).abs() < 1e-15);
    }
}
