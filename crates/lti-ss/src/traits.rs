//! Capability trait for models with a state matrix.

use lti_algebra::rational::from_f64;
use lti_algebra::{RatFunc, Rational, Surd};
use nalgebra::DMatrix;

use crate::eigen::{self, Eigenstructure};
use crate::error::StateSpaceResult;
use crate::model::{NumericStateSpace, StateSpace};
use crate::stability::{Stability, stability_of};
use crate::symbolic::parametric_stability;

/// Anything whose dynamics reduce to a parameter-free rational `A`.
///
/// Only [`EigenDecomposable::state_matrix`] is required; the eigen queries
/// are derived from it and recomputed on every call.
pub trait EigenDecomposable {
    fn state_matrix(&self) -> StateSpaceResult<DMatrix<Rational>>;

    fn eigenstructure(&self) -> StateSpaceResult<Eigenstructure> {
        eigen::eigenstructure(&self.state_matrix()?)
    }

    /// Eigenvalues repeated by algebraic multiplicity.
    fn eigenvalues(&self) -> StateSpaceResult<Vec<Surd>> {
        Ok(self.eigenstructure()?.values().to_vec())
    }

    fn is_diagonalizable(&self, reals_only: bool) -> StateSpaceResult<bool> {
        eigen::is_diagonalizable(&self.state_matrix()?, reals_only)
    }

    fn diagonalize(
        &self,
        reals_only: bool,
        sort: bool,
    ) -> StateSpaceResult<(DMatrix<Surd>, DMatrix<Surd>)> {
        eigen::diagonalize(&self.state_matrix()?, reals_only, sort)
    }

    fn stability(&self) -> StateSpaceResult<Stability> {
        Ok(stability_of(&self.eigenstructure()?))
    }
}

impl EigenDecomposable for DMatrix<Rational> {
    fn state_matrix(&self) -> StateSpaceResult<DMatrix<Rational>> {
        Ok(self.clone())
    }
}

/// Eigen queries need the parameters bound (see [`StateSpace::bind`]);
/// stability is also decided while parameters remain, as long as the
/// eigenvalues do not depend on them.
impl EigenDecomposable for StateSpace {
    fn state_matrix(&self) -> StateSpaceResult<DMatrix<Rational>> {
        self.exact_a()
    }

    fn stability(&self) -> StateSpaceResult<Stability> {
        if self.a().iter().all(RatFunc::is_free_of_symbols) {
            return Ok(stability_of(&self.eigenstructure()?));
        }
        parametric_stability(self.a())
    }
}

impl EigenDecomposable for NumericStateSpace {
    fn state_matrix(&self) -> StateSpaceResult<DMatrix<Rational>> {
        let values = self
            .a
            .iter()
            .map(|&v| from_f64(v, "state matrix entry"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DMatrix::from_vec(self.a.nrows(), self.a.ncols(), values))
    }
}
