//! Capability traits for transfer-function representations.

use crate::canonical::FactorOptions;
use crate::error::TransferResult;
use crate::standard_form::SymbolicFactorization;
use crate::symbolic::SymbolicTf;
use crate::transfer::TransferFunction;

/// Representations that can be split into a gain and standard-form terms.
///
/// The product of the returned factors reproduces the factored system:
/// exactly for symbolic representations, up to root-finding error for
/// numeric ones.
pub trait Factorable {
    type Output;

    /// Factor with default settings.
    fn factor_default(&self) -> TransferResult<Self::Output>;

    /// Number of poles, counted with multiplicity.
    fn order(&self) -> TransferResult<usize>;
}

impl Factorable for TransferFunction {
    type Output = Vec<TransferFunction>;

    fn factor_default(&self) -> TransferResult<Self::Output> {
        self.factor_canonical(&FactorOptions::default())
    }

    fn order(&self) -> TransferResult<usize> {
        Ok(self.den_poly()?.degree().unwrap_or(0))
    }
}

impl Factorable for SymbolicTf {
    type Output = SymbolicFactorization;

    fn factor_default(&self) -> TransferResult<Self::Output> {
        self.factor()
    }

    fn order(&self) -> TransferResult<usize> {
        Ok(self.den().degree().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lti_algebra::MPoly;
    use lti_core::Symbol;

    fn order_of<F: Factorable>(f: &F) -> usize {
        f.order().unwrap()
    }

    #[test]
    fn both_representations_report_their_order() {
        let numeric = TransferFunction::siso(vec![1.0], vec![1.0, 3.0, 2.0]).unwrap();
        let symbolic = SymbolicTf::from_descending(
            &[MPoly::from_int(1)],
            &[MPoly::symbol("a"), MPoly::from_int(1)],
            Symbol::new("s"),
        )
        .unwrap();
        assert_eq!(order_of(&numeric), 2);
        assert_eq!(order_of(&symbolic), 1);
        assert_eq!(numeric.factor_default().unwrap().len(), 3);
        assert_eq!(symbolic.factor_default().unwrap().poles().count(), 1);
    }
}
