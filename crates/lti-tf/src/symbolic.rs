//! Transfer functions whose coefficients are polynomials in named parameters.

use core::fmt;

use lti_algebra::factor::as_rational_poly;
use lti_algebra::{MPoly, Poly, RatFunc, Rational, Signal};
use lti_core::{Bindings, LtiError, Symbol};
use num_complex::Complex64;
use num_traits::{One, Zero};
use tracing::debug;

use crate::error::{TransferError, TransferResult};
use crate::roots::{RootMultiplicity, symbolic_roots};
use crate::standard_form::{SymbolicFactorization, factor_rational_function};
use crate::transfer::TransferFunction;

/// `num(s) / den(s)` in the Laplace variable `var`.
///
/// Coefficients are ascending in `s`. The denominator is never the zero
/// polynomial; no cancellation happens unless [`SymbolicTf::cancel`] is
/// called.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicTf {
    num: Poly<MPoly>,
    den: Poly<MPoly>,
    var: Symbol,
}

impl SymbolicTf {
    pub fn new(num: Poly<MPoly>, den: Poly<MPoly>, var: Symbol) -> TransferResult<Self> {
        if den.is_zero() {
            return Err(TransferError::Core(LtiError::DivisionByZero {
                what: "transfer function denominator",
            }));
        }
        Ok(Self { num, den, var })
    }

    /// Coefficients highest degree first, the way numeric transfer functions
    /// are written.
    pub fn from_descending(num: &[MPoly], den: &[MPoly], var: Symbol) -> TransferResult<Self> {
        Self::new(Poly::from_descending(num), Poly::from_descending(den), var)
    }

    /// Exact transform of a time-domain input.
    pub fn from_signal(signal: &Signal, var: Symbol) -> TransferResult<Self> {
        let (num, den) = signal.laplace();
        let lift = |p: &Poly<Rational>| p.map(|c| MPoly::constant(c.clone()));
        Self::new(lift(&num), lift(&den), var)
    }

    pub fn num(&self) -> &Poly<MPoly> {
        &self.num
    }

    pub fn den(&self) -> &Poly<MPoly> {
        &self.den
    }

    pub fn var(&self) -> &Symbol {
        &self.var
    }

    /// True when no parameter appears in any coefficient.
    pub fn is_numeric(&self) -> bool {
        as_rational_poly(&self.num).is_some() && as_rational_poly(&self.den).is_some()
    }

    /// `H(s)` with every parameter bound to a number.
    pub fn eval(&self, s: Complex64, bindings: &Bindings) -> TransferResult<Complex64> {
        let n = eval_complex(&self.num, s, bindings)?;
        let d = eval_complex(&self.den, s, bindings)?;
        if d.norm() == 0.0 {
            return Err(TransferError::Core(LtiError::DivisionByZero {
                what: "transfer function evaluation",
            }));
        }
        Ok(n / d)
    }

    /// `H(q)` for a rational `q`, keeping the parameters symbolic.
    pub fn eval_exact(&self, q: &Rational) -> TransferResult<RatFunc> {
        let at = MPoly::constant(q.clone());
        Ok(RatFunc::new(self.num.eval(&at), self.den.eval(&at))?)
    }

    /// `H(0)`.
    pub fn dc_gain(&self) -> TransferResult<RatFunc> {
        self.eval_exact(&Rational::zero())
    }

    pub fn poles(&self) -> TransferResult<Vec<RootMultiplicity>> {
        symbolic_roots(&self.den)
    }

    pub fn zeros(&self) -> TransferResult<Vec<RootMultiplicity>> {
        symbolic_roots(&self.num)
    }

    /// Gain and standard-form terms with `gain · Π terms == H`.
    pub fn factor(&self) -> TransferResult<SymbolicFactorization> {
        factor_rational_function(&self.num, &self.den)
    }

    /// Series connection; both operands must use the same Laplace variable.
    pub fn series(&self, other: &SymbolicTf) -> TransferResult<SymbolicTf> {
        if self.var != other.var {
            return Err(TransferError::DimensionMismatch {
                what: format!("series of functions of {} and {}", self.var, other.var),
            });
        }
        Ok(self * other)
    }

    /// Removes the common factor of numerator and denominator.
    ///
    /// Only parameter-free functions are reduced; a function with parameters
    /// is returned unchanged.
    pub fn cancel(&self) -> TransferResult<SymbolicTf> {
        let (Some(num), Some(den)) = (as_rational_poly(&self.num), as_rational_poly(&self.den))
        else {
            debug!(var = %self.var, "parametric function left uncancelled");
            return Ok(self.clone());
        };
        if num.is_zero() {
            return Self::new(Poly::zero(), Poly::one(), self.var.clone());
        }
        let g = num.gcd(&den);
        let divide = |p: &Poly<Rational>| {
            p.div_exact(&g).ok_or(TransferError::Invariant {
                what: "gcd does not divide its argument",
            })
        };
        let (num, den) = (divide(&num)?, divide(&den)?);
        // keep the denominator monic
        let lead = den.leading().cloned().ok_or(TransferError::Invariant {
            what: "cancelled denominator vanished",
        })?;
        let lift = |p: &Poly<Rational>| p.map(|c| MPoly::constant(c / &lead));
        Self::new(lift(&num), lift(&den), self.var.clone())
    }

    /// Numeric transfer function with every parameter bound.
    pub fn to_numeric(&self, bindings: &Bindings) -> TransferResult<TransferFunction> {
        let num = self.num.try_map(|c| c.eval(bindings))?;
        let den = self.den.try_map(|c| c.eval(bindings))?;
        let num = if num.is_zero() { vec![0.0] } else { num.to_descending() };
        TransferFunction::siso(num, den.to_descending())
    }
}

fn eval_complex(p: &Poly<MPoly>, s: Complex64, bindings: &Bindings) -> TransferResult<Complex64> {
    let mut acc = Complex64::new(0.0, 0.0);
    for c in p.coeffs().iter().rev() {
        acc = acc * s + c.eval(bindings)?;
    }
    Ok(acc)
}

impl<'a, 'b> core::ops::Mul<&'b SymbolicTf> for &'a SymbolicTf {
    type Output = SymbolicTf;

    /// Series connection in the left operand's variable.
    fn mul(self, rhs: &'b SymbolicTf) -> SymbolicTf {
        SymbolicTf {
            num: &self.num * &rhs.num,
            den: &self.den * &rhs.den,
            var: self.var.clone(),
        }
    }
}

impl core::ops::Mul for SymbolicTf {
    type Output = SymbolicTf;

    fn mul(self, rhs: SymbolicTf) -> SymbolicTf {
        &self * &rhs
    }
}

impl fmt::Display for SymbolicTf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paren = |p: &Poly<MPoly>| {
            let text = p.display_with(&self.var).to_string();
            let single = p.coeffs().iter().filter(|c| !c.is_zero()).count() <= 1
                && p.coeffs().iter().all(|c| c.num_terms() <= 1);
            if single { text } else { format!("({text})") }
        };
        if is_one(&self.den) {
            return write!(f, "{}", self.num.display_with(&self.var));
        }
        write!(f, "{}/{}", paren(&self.num), paren(&self.den))
    }
}

fn is_one(p: &Poly<MPoly>) -> bool {
    p.degree() == Some(0) && p.coeff(0).as_constant().is_some_and(|c| c.is_one())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lti_algebra::rational::{rat, ratio};

    fn m(name: &str) -> MPoly {
        MPoly::symbol(name)
    }

    fn n(v: i64) -> MPoly {
        MPoly::from_int(v)
    }

    fn plant() -> SymbolicTf {
        // (s + 2) / (a s^2 + b s + c)
        SymbolicTf::from_descending(&[n(1), n(2)], &[m("a"), m("b"), m("c")], Symbol::new("s"))
            .unwrap()
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let err = SymbolicTf::new(Poly::one(), Poly::zero(), Symbol::new("s")).unwrap_err();
        assert!(matches!(err, TransferError::Core(LtiError::DivisionByZero { .. })));
    }

    #[test]
    fn dc_gain_is_exact() {
        let k = plant().dc_gain().unwrap();
        assert_eq!(k, RatFunc::new(n(2), m("c")).unwrap());
        assert_eq!(k.to_string(), "2/c");
    }

    #[test]
    fn numeric_evaluation_needs_every_parameter() {
        let h = plant();
        let env = Bindings::new().with("a", 1.0).with("b", 3.0).with("c", 2.0);
        // (s + 2)/((s + 1)(s + 2)) at s = 1
        let v = h.eval(Complex64::new(1.0, 0.0), &env).unwrap();
        assert!((v.re - 0.5).abs() < 1e-15 && v.im == 0.0);
        let err = h.eval(Complex64::new(1.0, 0.0), &Bindings::new()).unwrap_err();
        assert!(matches!(err, TransferError::Core(LtiError::UnboundSymbol { .. })));
    }

    #[test]
    fn exact_evaluation_at_a_pole_fails() {
        // 1/(s - 1/2)
        let h = SymbolicTf::new(
            Poly::one(),
            Poly::linear(MPoly::constant(ratio(1, 2))),
            Symbol::new("s"),
        )
        .unwrap();
        assert!(h.eval_exact(&ratio(1, 2)).is_err());
        assert_eq!(h.eval_exact(&rat(1)).unwrap(), RatFunc::from(2));
    }

    #[test]
    fn cancel_removes_common_factors() {
        // (s + 1)/(2 s^2 + 6 s + 4)
        let h = SymbolicTf::from_descending(&[n(1), n(1)], &[n(2), n(6), n(4)], Symbol::new("s"))
            .unwrap();
        let c = h.cancel().unwrap();
        assert_eq!(c.num().to_descending(), vec![MPoly::constant(ratio(1, 2))]);
        assert_eq!(c.den().to_descending(), vec![n(1), n(2)]);
        // parametric functions are left alone
        assert_eq!(plant().cancel().unwrap(), plant());
    }

    #[test]
    fn series_requires_the_same_variable() {
        let h = plant();
        let g = SymbolicTf::new(Poly::one(), Poly::x(), Symbol::new("p")).unwrap();
        assert!(matches!(
            h.series(&g),
            Err(TransferError::DimensionMismatch { .. })
        ));
        let g = SymbolicTf::new(Poly::one(), Poly::x(), Symbol::new("s")).unwrap();
        let hg = h.series(&g).unwrap();
        assert_eq!(hg.den().degree(), Some(3));
    }

    #[test]
    fn numeric_conversion() {
        let env = Bindings::new().with("a", 1.0).with("b", 3.0).with("c", 2.0);
        let tf = plant().to_numeric(&env).unwrap();
        assert_eq!(tf.num().unwrap(), &[1.0, 2.0]);
        assert_eq!(tf.den().unwrap(), &[1.0, 3.0, 2.0]);
    }

    #[test]
    fn display_reads_as_a_fraction() {
        assert_eq!(plant().to_string(), "(s + 2)/(a*s^2 + b*s + c)");
        let g = SymbolicTf::new(Poly::constant(n(3)), Poly::one(), Symbol::new("s")).unwrap();
        assert_eq!(g.to_string(), "3");
    }

    #[test]
    fn factors_multiply_back() {
        let h = plant();
        let f = h.factor().unwrap();
        let (num, den) = f.expand();
        // num/den == N/D  <=>  num·D == N·den
        let lift = |p: &Poly<MPoly>| p.map(|c| RatFunc::from_poly(c.clone()));
        assert_eq!(&num * &lift(h.den()), &lift(h.num()) * &den);
        assert_eq!(f.gain, RatFunc::new(n(2), m("c")).unwrap());
    }
}
