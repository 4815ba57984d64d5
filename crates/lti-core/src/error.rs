use thiserror::Error;

pub type LtiResult<T> = Result<T, LtiError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LtiError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Symbol '{name}' has no bound value")]
    UnboundSymbol { name: String },

    #[error("Division by zero in {what}")]
    DivisionByZero { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
