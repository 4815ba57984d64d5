//! Free and forced responses of a state-space model.
//!
//! The transition matrix is computed once per engine; every response is an
//! [`ExpMatrix`] column in the engine's time variable.

use lti_algebra::{ExpMatrix, ExpPoly, Signal};
use lti_core::{Bindings, Symbol};
use nalgebra::{DMatrix, DVector};
use num_traits::Zero;
use tracing::debug;

use crate::error::{StateSpaceError, StateSpaceResult};
use crate::model::StateSpace;
use crate::transition::transition_matrix;

/// Closed-form responses of one bound model.
#[derive(Clone, Debug)]
pub struct ResponseEngine {
    t: Symbol,
    phi: ExpMatrix,
    b: DMatrix<f64>,
    c: DMatrix<f64>,
    d: DMatrix<f64>,
}

impl ResponseEngine {
    /// Binds every parameter of `model` and builds `Φ(t)`.
    pub fn new(model: &StateSpace, t: Symbol, bindings: &Bindings) -> StateSpaceResult<Self> {
        let parts = model.exact_parts(bindings)?;
        let phi = transition_matrix(&parts.a, t.clone())?;
        let numeric = parts.to_f64();
        Ok(Self {
            t,
            phi,
            b: numeric.b,
            c: numeric.c,
            d: numeric.d,
        })
    }

    pub fn time(&self) -> &Symbol {
        &self.t
    }

    /// `Φ(t) = e^{At}`.
    pub fn transition(&self) -> &ExpMatrix {
        &self.phi
    }

    fn states(&self) -> usize {
        self.phi.nrows()
    }

    fn column(&self, x0: &DVector<f64>) -> StateSpaceResult<DMatrix<f64>> {
        if x0.len() != self.states() {
            return Err(StateSpaceError::DimensionMismatch {
                what: format!(
                    "initial state has {} entries, expected {}",
                    x0.len(),
                    self.states()
                ),
            });
        }
        Ok(DMatrix::from_column_slice(x0.len(), 1, x0.as_slice()))
    }

    /// Inputs as functions of `var`, one per input channel.
    fn inputs_in(&self, u: &[Signal], var: &Symbol) -> StateSpaceResult<Vec<ExpPoly>> {
        if u.len() != self.b.ncols() {
            return Err(StateSpaceError::DimensionMismatch {
                what: format!("{} input signals, expected {}", u.len(), self.b.ncols()),
            });
        }
        if u.iter().any(|s| !s.impulse_weight().is_zero()) {
            return Err(StateSpaceError::InvalidArg {
                what: "impulse inputs have no closed-form convolution; use an initial state",
            });
        }
        Ok(u.iter().map(|s| s.to_exp_poly(var.clone())).collect())
    }

    /// `M·u` as a column, for a constant `M` with one column per input.
    fn weighted(var: &Symbol, m: &DMatrix<f64>, u: &[ExpPoly]) -> ExpMatrix {
        ExpMatrix::from_fn(var.clone(), m.nrows(), 1, |i, _| {
            u.iter()
                .enumerate()
                .fold(ExpPoly::zero(var.clone()), |acc, (j, uj)| {
                    &acc + &uj.scale_real(m[(i, j)])
                })
        })
    }

    /// Integration variable distinct from the time variable.
    fn integration_variable(&self) -> Symbol {
        if self.t.name() == "tau" {
            Symbol::new("tau1")
        } else {
            Symbol::new("tau")
        }
    }

    /// `Φ(t)·x₀`
    pub fn state_free_response(&self, x0: &DVector<f64>) -> StateSpaceResult<ExpMatrix> {
        Ok(self.phi.mul_real(&self.column(x0)?)?)
    }

    /// `C·Φ(t)·x₀`
    pub fn output_free_response(&self, x0: &DVector<f64>) -> StateSpaceResult<ExpMatrix> {
        Ok(self.state_free_response(x0)?.left_mul_real(&self.c)?)
    }

    /// `Φ(t)·∫₀ᵗ Φ(−τ)·B·u(τ) dτ`
    pub fn state_forced_response(&self, u: &[Signal]) -> StateSpaceResult<ExpMatrix> {
        let tau = self.integration_variable();
        let u_tau = self.inputs_in(u, &tau)?;
        let bu = Self::weighted(&tau, &self.b, &u_tau);
        let phi_back = self.phi.reflect().with_variable(tau.clone());
        let integral = phi_back.mul(&bu)?.integrate_from_zero(self.t.clone());
        let x = self.phi.mul(&integral)?;
        debug!(
            states = self.states(),
            inputs = u.len(),
            integration = %tau,
            "forced state response"
        );
        Ok(x)
    }

    /// `C·x_forced(t) + D·u(t)`
    pub fn output_forced_response(&self, u: &[Signal]) -> StateSpaceResult<ExpMatrix> {
        let x = self.state_forced_response(u)?;
        let u_t = self.inputs_in(u, &self.t)?;
        let feedthrough = Self::weighted(&self.t, &self.d, &u_t);
        Ok(x.left_mul_real(&self.c)?.add(&feedthrough)?)
    }

    /// Total state response; zero when neither an initial state nor an input
    /// is given.
    pub fn state_response(
        &self,
        x0: Option<&DVector<f64>>,
        u: Option<&[Signal]>,
    ) -> StateSpaceResult<ExpMatrix> {
        match (x0, u) {
            (None, None) => Ok(ExpMatrix::zeros(self.t.clone(), self.states(), 1)),
            (Some(x0), None) => self.state_free_response(x0),
            (None, Some(u)) => self.state_forced_response(u),
            (Some(x0), Some(u)) => Ok(self
                .state_free_response(x0)?
                .add(&self.state_forced_response(u)?)?),
        }
    }

    pub fn output_response(
        &self,
        x0: Option<&DVector<f64>>,
        u: Option<&[Signal]>,
    ) -> StateSpaceResult<ExpMatrix> {
        match (x0, u) {
            (None, None) => Ok(ExpMatrix::zeros(self.t.clone(), self.c.nrows(), 1)),
            (Some(x0), None) => self.output_free_response(x0),
            (None, Some(u)) => self.output_forced_response(u),
            (Some(x0), Some(u)) => Ok(self
                .output_free_response(x0)?
                .add(&self.output_forced_response(u)?)?),
        }
    }
}
