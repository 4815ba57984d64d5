//! Exponential polynomials whose coefficients and rates depend on the model
//! parameters: `Σ c(p)·t^k·e^{λ(p)t}`.
//!
//! They hold closed-form responses before the parameters are bound. Binding
//! turns each term into the numeric [`ExpTerm`] it stands for.

use core::fmt;
use std::collections::BTreeSet;

use lti_core::{Bindings, LtiResult, Symbol};
use nalgebra::DMatrix;
use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::error::{AlgebraError, AlgebraResult};
use crate::expmatrix::ExpMatrix;
use crate::exppoly::{ExpPoly, ExpTerm};
use crate::param_surd::ParamSurd;
use crate::ratfunc::RatFunc;

/// `coeff · t^power · e^{rate·t}`
#[derive(Clone, Debug, PartialEq)]
pub struct ParamExpTerm {
    pub coeff: ParamSurd,
    pub power: u32,
    pub rate: ParamSurd,
}

impl ParamExpTerm {
    pub fn new(coeff: ParamSurd, power: u32, rate: ParamSurd) -> Self {
        Self { coeff, power, rate }
    }

    fn bind(&self, bindings: &Bindings) -> LtiResult<ExpTerm> {
        Ok(ExpTerm::new(
            self.coeff.eval(bindings)?,
            self.power,
            self.rate.eval(bindings)?,
        ))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamExpPoly {
    var: Symbol,
    terms: Vec<ParamExpTerm>,
}

impl ParamExpPoly {
    pub fn zero(var: Symbol) -> Self {
        Self {
            var,
            terms: Vec::new(),
        }
    }

    /// Terms with equal power and rate are merged; zero terms dropped.
    pub fn from_terms(var: Symbol, terms: Vec<ParamExpTerm>) -> Self {
        let mut merged: Vec<ParamExpTerm> = Vec::with_capacity(terms.len());
        for t in terms {
            match merged
                .iter_mut()
                .find(|m| m.power == t.power && m.rate == t.rate)
            {
                Some(m) => m.coeff = &m.coeff + &t.coeff,
                None => merged.push(t),
            }
        }
        merged.retain(|t| !t.coeff.is_zero());
        Self {
            var,
            terms: merged,
        }
    }

    pub fn var(&self) -> &Symbol {
        &self.var
    }

    pub fn terms(&self) -> &[ParamExpTerm] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn scale(&self, c: &RatFunc) -> Self {
        let c = ParamSurd::rational(c.clone());
        Self::from_terms(
            self.var.clone(),
            self.terms
                .iter()
                .map(|t| ParamExpTerm::new(&t.coeff * &c, t.power, t.rate.clone()))
                .collect(),
        )
    }

    /// Every parameter in a coefficient or a rate.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.terms
            .iter()
            .flat_map(|t| t.coeff.symbols().into_iter().chain(t.rate.symbols()))
            .collect()
    }

    /// The numeric exponential polynomial at the given parameter values.
    pub fn bind(&self, bindings: &Bindings) -> LtiResult<ExpPoly> {
        let terms = self
            .terms
            .iter()
            .map(|t| t.bind(bindings))
            .collect::<LtiResult<Vec<_>>>()?;
        Ok(ExpPoly::from_terms(self.var.clone(), terms))
    }

    pub fn eval(&self, t: f64, bindings: &Bindings) -> LtiResult<Complex64> {
        let mut sum = Complex64::zero();
        for term in &self.terms {
            let c = term.coeff.eval(bindings)?;
            let r = term.rate.eval(bindings)?;
            sum += c * t.powi(term.power as i32) * (r * t).exp();
        }
        Ok(sum)
    }

    /// Real part of the value at `t`.
    pub fn eval_real(&self, t: f64, bindings: &Bindings) -> LtiResult<f64> {
        Ok(self.eval(t, bindings)?.re)
    }
}

impl<'a, 'b> core::ops::Add<&'b ParamExpPoly> for &'a ParamExpPoly {
    type Output = ParamExpPoly;
    fn add(self, rhs: &'b ParamExpPoly) -> ParamExpPoly {
        let var = if self.is_zero() {
            rhs.var.clone()
        } else {
            self.var.clone()
        };
        let terms = self.terms.iter().chain(rhs.terms.iter()).cloned().collect();
        ParamExpPoly::from_terms(var, terms)
    }
}

impl fmt::Display for ParamExpPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            let mut parts = Vec::new();
            if !term.coeff.is_one() || (term.power == 0 && term.rate.is_zero()) {
                parts.push(format!("({})", term.coeff));
            }
            match term.power {
                0 => {}
                1 => parts.push(self.var.to_string()),
                k => parts.push(format!("{}^{k}", self.var)),
            }
            if !term.rate.is_zero() {
                parts.push(format!("exp(({})*{})", term.rate, self.var));
            }
            f.write_str(&parts.join("*"))?;
        }
        Ok(())
    }
}

/// Matrix of parametric exponential polynomials in one time variable.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamExpMatrix {
    var: Symbol,
    data: DMatrix<ParamExpPoly>,
}

impl ParamExpMatrix {
    pub fn from_fn(
        var: Symbol,
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> ParamExpPoly,
    ) -> Self {
        let data = DMatrix::from_fn(rows, cols, |i, j| f(i, j));
        Self { var, data }
    }

    pub fn var(&self) -> &Symbol {
        &self.var
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&ParamExpPoly> {
        self.data.get((i, j))
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.data.iter().flat_map(ParamExpPoly::symbols).collect()
    }

    /// `self · m` for a matrix of rational functions.
    pub fn mul_ratfunc(&self, m: &DMatrix<RatFunc>) -> AlgebraResult<ParamExpMatrix> {
        if m.nrows() != self.ncols() {
            return Err(AlgebraError::Numeric {
                what: format!(
                    "exp matrix times constant: {}x{} times {} rows",
                    self.nrows(),
                    self.ncols(),
                    m.nrows()
                ),
            });
        }
        Ok(Self::from_fn(self.var.clone(), self.nrows(), m.ncols(), |i, j| {
            (0..self.ncols()).fold(ParamExpPoly::zero(self.var.clone()), |acc, k| {
                &acc + &self.data[(i, k)].scale(&m[(k, j)])
            })
        }))
    }

    /// `m · self` for a matrix of rational functions.
    pub fn left_mul_ratfunc(&self, m: &DMatrix<RatFunc>) -> AlgebraResult<ParamExpMatrix> {
        if m.ncols() != self.nrows() {
            return Err(AlgebraError::Numeric {
                what: format!(
                    "constant times exp matrix: {}x{} times {} rows",
                    m.nrows(),
                    m.ncols(),
                    self.nrows()
                ),
            });
        }
        Ok(Self::from_fn(self.var.clone(), m.nrows(), self.ncols(), |i, j| {
            (0..m.ncols()).fold(ParamExpPoly::zero(self.var.clone()), |acc, k| {
                &acc + &self.data[(k, j)].scale(&m[(i, k)])
            })
        }))
    }

    /// The numeric matrix at the given parameter values.
    pub fn bind(&self, bindings: &Bindings) -> LtiResult<ExpMatrix> {
        let entries = self
            .data
            .iter()
            .map(|e| e.bind(bindings))
            .collect::<LtiResult<Vec<_>>>()?;
        let rows = self.nrows();
        Ok(ExpMatrix::from_fn(self.var.clone(), rows, self.ncols(), |i, j| {
            entries[j * rows + i].clone()
        }))
    }

    /// Real parts of the values at `t`.
    pub fn eval_real(&self, t: f64, bindings: &Bindings) -> LtiResult<DMatrix<f64>> {
        let values = self
            .data
            .iter()
            .map(|e| e.eval_real(t, bindings))
            .collect::<LtiResult<Vec<_>>>()?;
        Ok(DMatrix::from_vec(self.nrows(), self.ncols(), values))
    }
}

impl core::ops::Index<(usize, usize)> for ParamExpMatrix {
    type Output = ParamExpPoly;
    fn index(&self, index: (usize, usize)) -> &ParamExpPoly {
        &self.data[index]
    }
}
