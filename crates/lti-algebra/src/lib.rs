//! Exact and closed-form algebra used by the LTI analysis crates.
//!
//! This crate provides the algebraic primitives the transfer-function and
//! state-space crates build on:
//! - exact rationals and multivariate polynomials over named parameters
//! - dense univariate polynomials generic over their coefficient field
//! - numeric polynomial roots (companion-matrix eigenvalues)
//! - exact factorization into irreducible factors of degree at most two
//! - quadratic surds `a + b·√d` for exact eigenvalues and eigenvectors
//! - exponential polynomials in time and Laplace transform pairs
//! - the same surds and exponential polynomials over the parameter field, so
//!   poles and responses of parametric models stay symbolic until bound
//!
//! # Design Principles
//!
//! - **Exact where it matters**: factorization, characteristic polynomials and
//!   eigenvectors use rational arithmetic; only root locations and closed-form
//!   time responses are floating point.
//! - **Explicit symbols**: every expression names its free variable; nothing
//!   relies on a process-wide default symbol.
//! - **Narrow scope**: only what LTI analysis needs, not a general CAS.

/// Forwards owned/borrowed operator combinations to the `&T op &T` impl.
macro_rules! forward_binop {
    (impl $imp:ident, $method:ident for $t:ty) => {
        impl ::core::ops::$imp<$t> for $t {
            type Output = $t;
            fn $method(self, rhs: $t) -> $t {
                ::core::ops::$imp::$method(&self, &rhs)
            }
        }
        impl<'a> ::core::ops::$imp<&'a $t> for $t {
            type Output = $t;
            fn $method(self, rhs: &'a $t) -> $t {
                ::core::ops::$imp::$method(&self, rhs)
            }
        }
        impl<'a> ::core::ops::$imp<$t> for &'a $t {
            type Output = $t;
            fn $method(self, rhs: $t) -> $t {
                ::core::ops::$imp::$method(self, &rhs)
            }
        }
    };
}

pub mod error;
pub mod expmatrix;
pub mod exppoly;
pub mod factor;
pub mod laplace;
pub mod linalg;
pub mod mpoly;
pub mod param_exp;
pub mod param_surd;
pub mod poly;
pub mod ratfunc;
pub mod rational;
pub mod roots;
pub mod signal;
pub mod surd;

pub use error::{AlgebraError, AlgebraResult};
pub use expmatrix::ExpMatrix;
pub use exppoly::{ExpPoly, ExpTerm, RealTerm, RealTermKind};
pub use factor::{Factorization, ParametricFactorization, factor_parametric, factor_rational};
pub use laplace::{ParamPartialFractions, PartialFractions, inverse_laplace};
pub use mpoly::{Monomial, MPoly};
pub use param_exp::{ParamExpMatrix, ParamExpPoly, ParamExpTerm};
pub use param_surd::ParamSurd;
pub use poly::{Coefficient, FieldCoefficient, Poly};
pub use ratfunc::RatFunc;
pub use rational::{ExactBindings, Rational};
pub use signal::{Oscillation, Signal, SignalTerm};
pub use surd::Surd;
