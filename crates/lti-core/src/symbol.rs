use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{LtiError, LtiResult, Real};

/// Named free variable: the Laplace variable, time, or a model parameter.
///
/// Symbols compare by name. Cloning is cheap (shared string).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Numeric values for free parameters, used when a symbolic model is
/// converted to floating point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<Symbol, Real>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, symbol: impl Into<Symbol>, value: Real) -> Self {
        self.values.insert(symbol.into(), value);
        self
    }

    pub fn insert(&mut self, symbol: impl Into<Symbol>, value: Real) {
        self.values.insert(symbol.into(), value);
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Real> {
        self.values.get(symbol).copied()
    }

    /// Value for `symbol`, or `UnboundSymbol`.
    pub fn require(&self, symbol: &Symbol) -> LtiResult<Real> {
        self.get(symbol).ok_or_else(|| LtiError::UnboundSymbol {
            name: symbol.name().to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, Real)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }
}
