//! Transfer-function analysis for continuous LTI systems.
//!
//! This crate covers the transfer-function side of the toolkit: numeric
//! transfer functions and their canonical (Bode sketching) factorization,
//! and transfer functions with parametric coefficients analysed exactly.
//!
//! # Architecture
//!
//! - [`TransferFunction`] holds `f64` coefficient arrays; factorization goes
//!   through floating roots with an explicit imaginary tolerance
//!   ([`FactorOptions`]) and can be checked with [`verify_factorization`].
//! - [`SymbolicTf`] holds polynomials over named parameters; poles, zeros,
//!   DC gain and standard-form factors are exact, and forced responses are
//!   closed-form expressions in time, symbolic in any parameter left unbound.
//!
//! # Design Principles
//!
//! - **SISO first**: MIMO arrays are representable but every analysis checks
//!   for a single path before doing any work
//! - **Explicit variables**: the Laplace, frequency and time variables are
//!   passed in, never assumed
//! - **Opt-in verification**: reconstruction checks are a separate call

pub mod canonical;
pub mod conjugate;
pub mod error;
pub mod frequency;
pub mod response;
pub mod roots;
pub mod standard_form;
pub mod symbolic;
pub mod traits;
pub mod transfer;

pub use canonical::{
    CanonicalFactor, FactorKind, FactorOptions, expand_factors, poly_factors_canonical,
    verify_factorization,
};
pub use conjugate::pop_conjugate;
pub use error::{TransferError, TransferResult};
pub use frequency::FrequencyResponse;
pub use response::{ForcedResponse, ResponseDomain, ResponseOptions};
pub use roots::{Branch, RootMultiplicity, SymbolicRoot};
pub use standard_form::{
    PlacedTerm, Placement, StandardTerm, SymbolicFactorization, factor_polynomial,
    factor_rational_function,
};
pub use symbolic::SymbolicTf;
pub use traits::Factorable;
pub use transfer::TransferFunction;
