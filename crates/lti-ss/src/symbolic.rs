//! Analysis of models whose state matrix still depends on free parameters.
//!
//! The characteristic polynomial is factored over `Q(params)`; eigenvalues
//! are the roots of its linear and quadratic factors, kept as [`ParamSurd`]
//! values, and `e^{At}` and the responses are parametric exponential
//! polynomials. The results hold for generic parameter values: a binding
//! that merges two poles shows up as a division by zero when the result is
//! evaluated there.

use lti_algebra::linalg::{CharPoly, charpoly_adjugate, rank, shift_diagonal};
use lti_algebra::rational::exact_bindings;
use lti_algebra::{
    ParamExpMatrix, ParamExpPoly, ParamPartialFractions, ParamSurd, Poly, RatFunc, Rational,
    Signal, Surd,
};
use lti_core::{Bindings, LtiError, Symbol};
use nalgebra::DMatrix;
use num_traits::Zero;
use tracing::debug;

use crate::error::{StateSpaceError, StateSpaceResult};
use crate::model::StateSpace;
use crate::stability::{Stability, stability_from_exact};
use crate::traits::EigenDecomposable;

/// Eigenvalues of a parametric `A`, repeated by algebraic multiplicity.
pub fn symbolic_eigenvalues(a: &DMatrix<RatFunc>) -> StateSpaceResult<Vec<ParamSurd>> {
    let cp = charpoly_adjugate(a)?;
    let fractions = ParamPartialFractions::new(&cp.charpoly)?;
    Ok(fractions
        .poles()
        .flat_map(|(value, m)| std::iter::repeat_n(value.clone(), m))
        .collect())
}

/// `e^{At}` for a parametric `A`.
pub fn symbolic_transition_matrix(
    a: &DMatrix<RatFunc>,
    t: Symbol,
) -> StateSpaceResult<ParamExpMatrix> {
    let n = a.nrows();
    let cp = charpoly_adjugate(a)?;
    let fractions = ParamPartialFractions::new(&cp.charpoly)?;
    let mut entries = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            entries.push(fractions.invert(&cp.adjugate_entry(i, j), t.clone())?);
        }
    }
    debug!(n, poles = fractions.poles().count(), "symbolic transition matrix");
    Ok(ParamExpMatrix::from_fn(t, n, n, |i, j| {
        entries[i * n + j].clone()
    }))
}

/// Stability of a parametric `A` whose eigenvalues do not depend on the
/// parameters; otherwise `UnboundSymbol` names a parameter they depend on.
///
/// Eigenvector counts of repeated values on the imaginary axis are ranks
/// over `Q(params)`, so they hold for generic parameter values.
pub fn parametric_stability(a: &DMatrix<RatFunc>) -> StateSpaceResult<Stability> {
    let values = symbolic_eigenvalues(a)?;
    let exact = values
        .iter()
        .map(|v| {
            v.to_surd().ok_or_else(|| LtiError::UnboundSymbol {
                name: v
                    .symbols()
                    .into_iter()
                    .next()
                    .map_or_else(String::new, |s| s.name().to_string()),
            })
        })
        .collect::<Result<Vec<Surd>, _>>()?;
    let lifted = a.map(ParamSurd::from);
    stability_from_exact(&exact, |lambda| {
        let shifted = shift_diagonal(&lifted, &ParamSurd::from(lambda));
        Ok::<_, StateSpaceError>(a.nrows() - rank(&shifted))
    })
}

fn lift(p: &Poly<Rational>) -> Poly<RatFunc> {
    p.map(|c| RatFunc::constant(c.clone()))
}

impl StateSpace {
    /// Eigenvalues of `A` with the parameters left symbolic.
    pub fn symbolic_eigenvalues(&self) -> StateSpaceResult<Vec<ParamSurd>> {
        symbolic_eigenvalues(self.a())
    }

    /// `e^{At}` with the parameters left symbolic.
    pub fn symbolic_transition_matrix(&self, t: Symbol) -> StateSpaceResult<ParamExpMatrix> {
        symbolic_transition_matrix(self.a(), t)
    }

    /// Stability once the given parameters are bound exactly; parameters
    /// left out stay symbolic.
    pub fn stability_at(&self, bindings: &Bindings) -> StateSpaceResult<Stability> {
        self.bind(&exact_bindings(bindings)?)?.stability()
    }

    /// `Φ(t)·x₀` for a symbolic initial state.
    pub fn symbolic_state_free_response(
        &self,
        x0: &[RatFunc],
        t: Symbol,
    ) -> StateSpaceResult<ParamExpMatrix> {
        if x0.len() != self.states() {
            return Err(StateSpaceError::DimensionMismatch {
                what: format!(
                    "initial state has {} entries, expected {}",
                    x0.len(),
                    self.states()
                ),
            });
        }
        let column = DMatrix::from_column_slice(x0.len(), 1, x0);
        Ok(self.symbolic_transition_matrix(t)?.mul_ratfunc(&column)?)
    }

    /// `C·Φ(t)·x₀` for a symbolic initial state.
    pub fn symbolic_output_free_response(
        &self,
        x0: &[RatFunc],
        t: Symbol,
    ) -> StateSpaceResult<ParamExpMatrix> {
        Ok(self
            .symbolic_state_free_response(x0, t)?
            .left_mul_ratfunc(self.c())?)
    }

    /// Zero-state response of the states, from `X(s) = adj(sI − A)·B·U(s) / det(sI − A)`.
    pub fn symbolic_state_forced_response(
        &self,
        u: &[Signal],
        t: Symbol,
    ) -> StateSpaceResult<ParamExpMatrix> {
        let cp = charpoly_adjugate(self.a())?;
        let numerators = self.adjugate_times_b(&cp);
        self.laplace_response(&numerators, &cp.charpoly, u, t)
    }

    /// Zero-state output response, from `Y(s) = (C·adj(sI − A)·B + D·det(sI − A))·U(s) / det(sI − A)`.
    pub fn symbolic_output_forced_response(
        &self,
        u: &[Signal],
        t: Symbol,
    ) -> StateSpaceResult<ParamExpMatrix> {
        let cp = charpoly_adjugate(self.a())?;
        let adj_b = self.adjugate_times_b(&cp);
        let (c, d) = (self.c(), self.d());
        let numerators = DMatrix::from_fn(self.outputs(), self.inputs(), |i, j| {
            (0..self.states()).fold(
                &Poly::constant(d[(i, j)].clone()) * &cp.charpoly,
                |acc, k| &acc + &(&Poly::constant(c[(i, k)].clone()) * &adj_b[(k, j)]),
            )
        });
        self.laplace_response(&numerators, &cp.charpoly, u, t)
    }

    /// `adj(sI − A)·B` as polynomials in `s`.
    fn adjugate_times_b(&self, cp: &CharPoly<RatFunc>) -> DMatrix<Poly<RatFunc>> {
        let b = self.b();
        DMatrix::from_fn(self.states(), self.inputs(), |i, j| {
            (0..self.states()).fold(Poly::zero(), |acc, k| {
                &acc + &(&cp.adjugate_entry(i, k) * &Poly::constant(b[(k, j)].clone()))
            })
        })
    }

    /// Inverse transform of `Σ_j numerators[:, j]·U_j(s) / charpoly`.
    fn laplace_response(
        &self,
        numerators: &DMatrix<Poly<RatFunc>>,
        charpoly: &Poly<RatFunc>,
        u: &[Signal],
        t: Symbol,
    ) -> StateSpaceResult<ParamExpMatrix> {
        if u.len() != self.inputs() {
            return Err(StateSpaceError::DimensionMismatch {
                what: format!("{} input signals, expected {}", u.len(), self.inputs()),
            });
        }
        if u.iter().any(|s| !s.impulse_weight().is_zero()) {
            return Err(StateSpaceError::InvalidArg {
                what: "impulse inputs have no closed-form convolution; use an initial state",
            });
        }
        let rows = numerators.nrows();
        let mut out = vec![ParamExpPoly::zero(t.clone()); rows];
        for (j, signal) in u.iter().enumerate() {
            if signal.is_zero() {
                continue;
            }
            let (u_num, u_den) = signal.laplace();
            let fractions = ParamPartialFractions::new(&(charpoly * &lift(&u_den)))?;
            let u_num = lift(&u_num);
            for (i, acc) in out.iter_mut().enumerate() {
                let y = fractions.invert(&(&numerators[(i, j)] * &u_num), t.clone())?;
                *acc = &*acc + &y;
            }
        }
        debug!(
            rows,
            inputs = u.len(),
            parameters = self.symbols().len(),
            "symbolic forced response"
        );
        Ok(ParamExpMatrix::from_fn(t, rows, 1, |i, _| out[i].clone()))
    }
}
