//! Forced response of a symbolic transfer function.

use lti_algebra::factor::as_rational_poly;
use lti_algebra::rational::exact_bindings;
use lti_algebra::{
    ExpPoly, MPoly, ParamExpPoly, ParamPartialFractions, Poly, RatFunc, Signal, inverse_laplace,
};
use lti_core::{Bindings, Symbol};
use tracing::debug;

use crate::error::{TransferError, TransferResult};
use crate::symbolic::SymbolicTf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseDomain {
    /// `Y(s) = H(s)·U(s)`, kept symbolic.
    Laplace,
    /// `y(t)`, the inverse transform of `Y(s)`.
    #[default]
    Time,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseOptions {
    pub domain: ResponseDomain,
    /// Parameter values substituted before a time response is built;
    /// parameters left out stay symbolic.
    pub bindings: Bindings,
}

impl ResponseOptions {
    pub fn laplace() -> Self {
        Self {
            domain: ResponseDomain::Laplace,
            bindings: Bindings::new(),
        }
    }

    pub fn time(bindings: Bindings) -> Self {
        Self {
            domain: ResponseDomain::Time,
            bindings,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ForcedResponse {
    Laplace(SymbolicTf),
    Time(ExpPoly),
    /// `y(t)` with parameters that had no binding; its residues hold for
    /// generic parameter values.
    SymbolicTime(ParamExpPoly),
}

impl ForcedResponse {
    pub fn as_time(&self) -> Option<&ExpPoly> {
        match self {
            ForcedResponse::Time(y) => Some(y),
            _ => None,
        }
    }

    pub fn as_symbolic_time(&self) -> Option<&ParamExpPoly> {
        match self {
            ForcedResponse::SymbolicTime(y) => Some(y),
            _ => None,
        }
    }

    pub fn as_laplace(&self) -> Option<&SymbolicTf> {
        match self {
            ForcedResponse::Laplace(y) => Some(y),
            _ => None,
        }
    }
}

fn lift(p: &Poly<MPoly>) -> Poly<RatFunc> {
    p.map(|c| RatFunc::from_poly(c.clone()))
}

impl SymbolicTf {
    /// Response to exactly one of a time-domain input `u(t)` or its
    /// transform `U(s)`, as `Y(s)` or as `y(t)` in the time variable `t`.
    ///
    /// Time responses need a strictly proper `Y(s)` (no impulses in the
    /// output). Parameters bound in `options` are substituted exactly; when
    /// some are left the result is [`ForcedResponse::SymbolicTime`].
    pub fn forced_response(
        &self,
        t: &Symbol,
        time_input: Option<&Signal>,
        laplace_input: Option<&SymbolicTf>,
        options: &ResponseOptions,
    ) -> TransferResult<ForcedResponse> {
        let input = match (time_input, laplace_input) {
            (Some(u), None) => SymbolicTf::from_signal(u, self.var().clone())?,
            (None, Some(u)) => u.clone(),
            (Some(_), Some(_)) => {
                return Err(TransferError::InputSpecification {
                    what: "both a time-domain and a Laplace-domain input were given",
                });
            }
            (None, None) => {
                return Err(TransferError::InputSpecification {
                    what: "one of a time-domain or a Laplace-domain input is required",
                });
            }
        };
        let y = self.series(&input)?;
        debug!(
            domain = ?options.domain,
            num_degree = ?y.num().degree(),
            den_degree = ?y.den().degree(),
            "forced response"
        );
        match options.domain {
            ResponseDomain::Laplace => Ok(ForcedResponse::Laplace(y)),
            ResponseDomain::Time => {
                let exact = exact_bindings(&options.bindings)?;
                let num = y.num().map(|c| c.subs(&exact));
                let den = y.den().map(|c| c.subs(&exact));
                if let (Some(num), Some(den)) = (as_rational_poly(&num), as_rational_poly(&den)) {
                    return Ok(ForcedResponse::Time(inverse_laplace(&num, &den, t.clone())?));
                }
                let fractions = ParamPartialFractions::new(&lift(&den))?;
                let y = fractions.invert(&lift(&num), t.clone())?;
                debug!(
                    parameters = y.symbols().len(),
                    poles = fractions.poles().count(),
                    "time response left symbolic"
                );
                Ok(ForcedResponse::SymbolicTime(y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lti_algebra::AlgebraError;
    use lti_algebra::rational::rat;

    fn n(v: i64) -> MPoly {
        MPoly::from_int(v)
    }

    fn s() -> Symbol {
        Symbol::new("s")
    }

    fn t() -> Symbol {
        Symbol::new("t")
    }

    fn lag() -> SymbolicTf {
        // 8/(s + 8)
        SymbolicTf::from_descending(&[n(8)], &[n(1), n(8)], s()).unwrap()
    }

    #[test]
    fn input_must_be_given_exactly_once() {
        let h = lag();
        let u = Signal::step(rat(1));
        let us = SymbolicTf::from_signal(&u, s()).unwrap();
        let opts = ResponseOptions::default();
        for (ti, li) in [(Some(&u), Some(&us)), (None, None)] {
            let err = h.forced_response(&t(), ti, li, &opts).unwrap_err();
            assert!(matches!(err, TransferError::InputSpecification { .. }));
        }
    }

    #[test]
    fn step_response_of_a_lag() {
        let y = lag()
            .forced_response(&t(), Some(&Signal::step(rat(1))), None, &ResponseOptions::default())
            .unwrap();
        let y = y.as_time().unwrap();
        for time in [0.0_f64, 0.1, 1.0] {
            let expected = 1.0 - (-8.0 * time).exp();
            assert!((y.eval_real(time) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn laplace_domain_keeps_parameters() {
        // k/(s + 1) with U(s) = 1/s
        let h = SymbolicTf::from_descending(&[MPoly::symbol("k")], &[n(1), n(1)], s()).unwrap();
        let u = SymbolicTf::from_descending(&[n(1)], &[n(1), n(0)], s()).unwrap();
        let y = h
            .forced_response(&t(), None, Some(&u), &ResponseOptions::laplace())
            .unwrap();
        let y = y.as_laplace().unwrap();
        assert_eq!(y.den().degree(), Some(2));
        assert_eq!(y.to_string(), "k/(s^2 + s)");
    }

    #[test]
    fn unbound_parameters_stay_symbolic_in_time() {
        let h = SymbolicTf::from_descending(&[MPoly::symbol("k")], &[n(1), n(1)], s()).unwrap();
        let u = Signal::step(rat(1));
        let y = h
            .forced_response(&t(), Some(&u), None, &ResponseOptions::default())
            .unwrap();
        let y = y.as_symbolic_time().unwrap();
        let names: Vec<String> = y.symbols().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["k"]);

        let env = Bindings::new().with("k", 2.0);
        let bound = h
            .forced_response(&t(), Some(&u), None, &ResponseOptions::time(env.clone()))
            .unwrap();
        let bound = bound.as_time().unwrap();
        for time in [0.0_f64, 1.0, 3.0] {
            let expected = 2.0 * (1.0 - (-time).exp());
            assert!((bound.eval_real(time) - expected).abs() < 1e-12);
            assert!((y.eval_real(time, &env).unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn parametric_pole_in_the_time_response() {
        // 1/(s + a) driven by a unit step: (1 - e^{-a t})/a
        let h = SymbolicTf::from_descending(&[n(1)], &[n(1), MPoly::symbol("a")], s()).unwrap();
        let y = h
            .forced_response(&t(), Some(&Signal::step(rat(1))), None, &ResponseOptions::default())
            .unwrap();
        let y = y.as_symbolic_time().unwrap();
        assert_eq!(y.terms().len(), 2);
        let env = Bindings::new().with("a", 4.0);
        let numeric = y.bind(&env).unwrap();
        for time in [0.0_f64, 0.25, 2.0] {
            let expected = (1.0 - (-4.0 * time).exp()) / 4.0;
            assert!((numeric.eval_real(time) - expected).abs() < 1e-12);
        }
        assert!(y.eval_real(1.0, &Bindings::new()).is_err());
    }

    #[test]
    fn impulse_through_a_biproper_system_is_improper() {
        // (s + 1)/(s + 2) driven by δ(t)
        let h = SymbolicTf::from_descending(&[n(1), n(1)], &[n(1), n(2)], s()).unwrap();
        let err = h
            .forced_response(&t(), Some(&Signal::impulse(rat(1))), None, &ResponseOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::Algebra(AlgebraError::ImproperRational { num: 1, den: 1 })
        ));
    }
}
