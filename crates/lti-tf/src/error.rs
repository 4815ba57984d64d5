//! Error types for transfer-function operations.

use lti_algebra::AlgebraError;
use lti_core::LtiError;
use thiserror::Error;

/// Result type for transfer-function operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// Errors that can occur in transfer-function analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    /// Operation only defined for single-input single-output systems.
    #[error("{what} is only implemented for SISO systems (got {outputs} outputs x {inputs} inputs)")]
    MimoUnsupported {
        what: &'static str,
        outputs: usize,
        inputs: usize,
    },

    /// Forced response needs exactly one of a time-domain or Laplace-domain input.
    #[error("Input specification error: {what}")]
    InputSpecification { what: &'static str },

    /// Numerator/denominator arrays do not describe a consistent system.
    #[error("Dimension mismatch: {what}")]
    DimensionMismatch { what: String },

    /// Product of the canonical factors does not reproduce the system.
    #[error("Factorization check failed: {what}")]
    VerificationFailed { what: String },

    /// Invalid argument provided to a transfer-function operation.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Internal bookkeeping assumption violated.
    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error("Algebra error: {0}")]
    Algebra(#[from] AlgebraError),

    #[error("Core error: {0}")]
    Core(#[from] LtiError),
}

impl From<TransferError> for LtiError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::MimoUnsupported { .. } => LtiError::InvalidArg {
                what: "MIMO transfer function",
            },
            TransferError::InputSpecification { what } => LtiError::InvalidArg { what },
            TransferError::DimensionMismatch { what: _ } => LtiError::InvalidArg {
                what: "dimension mismatch",
            },
            TransferError::VerificationFailed { what: _ } => LtiError::Invariant {
                what: "factorization check",
            },
            TransferError::InvalidArg { what } => LtiError::InvalidArg { what },
            TransferError::Invariant { what } => LtiError::Invariant { what },
            TransferError::Algebra(AlgebraError::Core(e)) | TransferError::Core(e) => e,
            TransferError::Algebra(_) => LtiError::InvalidArg { what: "algebra" },
        }
    }
}
