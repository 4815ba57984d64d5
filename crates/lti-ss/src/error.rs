//! Error types for state-space operations.

use lti_algebra::AlgebraError;
use lti_core::LtiError;
use thiserror::Error;

/// Errors that can occur in state-space analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateSpaceError {
    /// Models with the extra `E`/`F` input-derivative matrices are not handled.
    #[error("Descriptor matrices E and F are not supported")]
    DescriptorUnsupported,

    #[error("Dimension mismatch: {what}")]
    DimensionMismatch { what: String },

    #[error("Matrix is not diagonalizable: {what}")]
    NotDiagonalizable { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error("Algebra error: {0}")]
    Algebra(#[from] AlgebraError),

    #[error("Core error: {0}")]
    Core(#[from] LtiError),
}

pub type StateSpaceResult<T> = Result<T, StateSpaceError>;

impl From<StateSpaceError> for LtiError {
    fn from(e: StateSpaceError) -> Self {
        match e {
            StateSpaceError::DescriptorUnsupported => LtiError::InvalidArg {
                what: "descriptor matrices",
            },
            StateSpaceError::DimensionMismatch { what: _ } => LtiError::InvalidArg {
                what: "dimension mismatch",
            },
            StateSpaceError::NotDiagonalizable { what } => LtiError::InvalidArg { what },
            StateSpaceError::InvalidArg { what } => LtiError::InvalidArg { what },
            StateSpaceError::Invariant { what } => LtiError::Invariant { what },
            StateSpaceError::Algebra(AlgebraError::Core(e)) | StateSpaceError::Core(e) => e,
            StateSpaceError::Algebra(_) => LtiError::InvalidArg { what: "algebra" },
        }
    }
}
