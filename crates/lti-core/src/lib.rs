//! lti-core: shared foundation for the LTI analysis crates.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - symbol (named free variables and parameter bindings)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod symbol;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LtiError, LtiResult};
pub use numeric::*;
pub use symbol::*;
