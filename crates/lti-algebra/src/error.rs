//! Error types for algebraic operations.

use lti_core::LtiError;
use thiserror::Error;

/// Result type for algebraic operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;

/// Errors raised by the algebra primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgebraError {
    /// An irreducible factor of unsupported degree was found.
    ///
    /// Real-coefficient polynomials only have irreducible real factors of
    /// degree one or two; anything larger means the factor could not be split
    /// over the supported fields.
    #[error("Polynomial factor should not be degree {degree}")]
    UnsupportedFactorDegree { degree: usize },

    /// Operation needs a non-zero polynomial.
    #[error("Zero polynomial passed to {what}")]
    ZeroPolynomial { what: &'static str },

    /// Division by an expression that is identically zero.
    #[error("Division by zero in {what}")]
    DivisionByZero { what: &'static str },

    /// Inverse Laplace transform of a rational function that is not strictly proper.
    #[error("Rational function is not strictly proper (numerator degree {num} >= denominator degree {den})")]
    ImproperRational { num: usize, den: usize },

    /// Numeric evaluation produced a non-finite value.
    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Core error: {0}")]
    Core(#[from] LtiError),
}
