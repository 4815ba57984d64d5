//! State-space analysis for continuous LTI systems.
//!
//! Models are `x' = A x + B u`, `y = C x + D u` with entries that may depend
//! on named parameters. The state matrix is analysed exactly, either once
//! bound or with the parameters left symbolic.
//!
//! # Architecture
//!
//! - [`StateSpace`] stores rational-function matrices and converts to
//!   [`NumericStateSpace`] or exact rational parts on demand
//! - [`eigenstructure`] returns a tagged [`Eigenstructure`]; defective
//!   matrices are reported, never padded silently
//! - [`transition_matrix`] gives `e^{At}` as exponential polynomials, and
//!   [`ResponseEngine`] builds free and forced responses from it
//! - [`symbolic`] keeps the parameters free: eigenvalues are parametric
//!   surds, and `e^{At}` and the responses are parametric exponential
//!   polynomials to be bound later
//!
//! # Design Principles
//!
//! - **Exact eigenvalues**: rationals and quadratic surds, so stability is
//!   decided by sign, not by tolerance
//! - **Derived data**: eigenstructures are recomputed per call, never cached

pub mod eigen;
pub mod error;
pub mod model;
pub mod response;
pub mod stability;
pub mod symbolic;
pub mod traits;
pub mod transition;

pub use eigen::{
    Eigenstructure, diagonalize, eigenstructure, eigenvalues_with_multiplicity,
    generalized_eigenbasis, is_diagonalizable, is_eigenpair, surd_identity,
};
pub use error::{StateSpaceError, StateSpaceResult};
pub use model::{ExactParts, NumericStateSpace, StateSpace};
pub use response::ResponseEngine;
pub use stability::{Stability, stability_from_eigenvalues, stability_from_exact, stability_of};
pub use symbolic::{parametric_stability, symbolic_eigenvalues, symbolic_transition_matrix};
pub use traits::EigenDecomposable;
pub use transition::transition_matrix;
