//! State-space models with parametric entries.

use std::collections::BTreeSet;

use lti_algebra::rational::{exact_bindings, from_f64, to_f64};
use lti_algebra::{ExactBindings, RatFunc, Rational};
use lti_core::{Bindings, Symbol};
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StateSpaceError, StateSpaceResult};

/// `x' = A x + B u`, `y = C x + D u`.
///
/// Entries are rational functions of named parameters. `A` is `n×n`, `B` is
/// `n×m`, `C` is `p×n` and `D` is `p×m`.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    a: DMatrix<RatFunc>,
    b: DMatrix<RatFunc>,
    c: DMatrix<RatFunc>,
    d: DMatrix<RatFunc>,
}

fn mismatch(what: &str, m: &DMatrix<RatFunc>, rows: usize, cols: usize) -> StateSpaceError {
    StateSpaceError::DimensionMismatch {
        what: format!(
            "{what} is {}x{}, expected {rows}x{cols}",
            m.nrows(),
            m.ncols()
        ),
    }
}

impl StateSpace {
    pub fn new(
        a: DMatrix<RatFunc>,
        b: DMatrix<RatFunc>,
        c: DMatrix<RatFunc>,
        d: DMatrix<RatFunc>,
    ) -> StateSpaceResult<Self> {
        let n = a.nrows();
        if n == 0 || a.ncols() != n {
            return Err(mismatch("A", &a, n.max(1), n.max(1)));
        }
        let m = b.ncols();
        let p = c.nrows();
        if b.nrows() != n {
            return Err(mismatch("B", &b, n, m));
        }
        if c.ncols() != n {
            return Err(mismatch("C", &c, p, n));
        }
        if d.shape() != (p, m) {
            return Err(mismatch("D", &d, p, m));
        }
        Ok(Self { a, b, c, d })
    }

    /// Model with the input-derivative matrices `E` and `F` of
    /// `x' = A x + B u + E u'`, `y = C x + D u + F u'`; only their absence
    /// is supported.
    pub fn with_descriptor(
        a: DMatrix<RatFunc>,
        b: DMatrix<RatFunc>,
        c: DMatrix<RatFunc>,
        d: DMatrix<RatFunc>,
        e: Option<DMatrix<RatFunc>>,
        f: Option<DMatrix<RatFunc>>,
    ) -> StateSpaceResult<Self> {
        if e.is_some() || f.is_some() {
            return Err(StateSpaceError::DescriptorUnsupported);
        }
        Self::new(a, b, c, d)
    }

    /// Parameter-free model from row-major integer entries.
    pub fn from_integers(
        n: usize,
        m: usize,
        p: usize,
        a: &[i64],
        b: &[i64],
        c: &[i64],
        d: &[i64],
    ) -> StateSpaceResult<Self> {
        let build = |rows: usize, cols: usize, values: &[i64], what: &'static str| {
            if values.len() != rows * cols {
                return Err(StateSpaceError::DimensionMismatch {
                    what: format!("{what} has {} entries, expected {}", values.len(), rows * cols),
                });
            }
            Ok(DMatrix::from_row_iterator(
                rows,
                cols,
                values.iter().map(|&v| RatFunc::from(v)),
            ))
        };
        Self::new(
            build(n, n, a, "A")?,
            build(n, m, b, "B")?,
            build(p, n, c, "C")?,
            build(p, m, d, "D")?,
        )
    }

    /// Parameter-free model from floating matrices, each entry taken at its
    /// exact binary value.
    pub fn from_numeric(model: &NumericStateSpace) -> StateSpaceResult<Self> {
        let exact = |m: &DMatrix<f64>| -> StateSpaceResult<DMatrix<RatFunc>> {
            let values = m
                .iter()
                .map(|&v| from_f64(v, "state-space entry").map(RatFunc::from))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DMatrix::from_vec(m.nrows(), m.ncols(), values))
        };
        Self::new(
            exact(&model.a)?,
            exact(&model.b)?,
            exact(&model.c)?,
            exact(&model.d)?,
        )
    }

    pub fn a(&self) -> &DMatrix<RatFunc> {
        &self.a
    }

    pub fn b(&self) -> &DMatrix<RatFunc> {
        &self.b
    }

    pub fn c(&self) -> &DMatrix<RatFunc> {
        &self.c
    }

    pub fn d(&self) -> &DMatrix<RatFunc> {
        &self.d
    }

    pub fn states(&self) -> usize {
        self.a.nrows()
    }

    pub fn inputs(&self) -> usize {
        self.b.ncols()
    }

    pub fn outputs(&self) -> usize {
        self.c.nrows()
    }

    /// Every parameter appearing in any matrix.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        [&self.a, &self.b, &self.c, &self.d]
            .into_iter()
            .flat_map(|m| m.iter())
            .flat_map(RatFunc::symbols)
            .collect()
    }

    /// Exact substitution; parameters without a value stay symbolic.
    pub fn bind(&self, bindings: &ExactBindings) -> StateSpaceResult<StateSpace> {
        let subs = |m: &DMatrix<RatFunc>| -> StateSpaceResult<DMatrix<RatFunc>> {
            let values = m
                .iter()
                .map(|e| e.subs(bindings))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DMatrix::from_vec(m.nrows(), m.ncols(), values))
        };
        Ok(Self {
            a: subs(&self.a)?,
            b: subs(&self.b)?,
            c: subs(&self.c)?,
            d: subs(&self.d)?,
        })
    }

    /// Floating-point matrices; every parameter must be bound.
    pub fn to_numeric(&self, bindings: &Bindings) -> StateSpaceResult<NumericStateSpace> {
        let eval = |m: &DMatrix<RatFunc>| -> StateSpaceResult<DMatrix<f64>> {
            let values = m
                .iter()
                .map(|e| e.eval(bindings))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DMatrix::from_vec(m.nrows(), m.ncols(), values))
        };
        Ok(NumericStateSpace {
            a: eval(&self.a)?,
            b: eval(&self.b)?,
            c: eval(&self.c)?,
            d: eval(&self.d)?,
        })
    }

    /// `A` with rational entries; fails with `UnboundSymbol` while any
    /// parameter remains.
    pub fn exact_a(&self) -> StateSpaceResult<DMatrix<Rational>> {
        exact_matrix(&self.a)
    }

    /// The model with parameters bound from floats (exactly) and every
    /// matrix converted to rationals.
    pub fn exact_parts(&self, bindings: &Bindings) -> StateSpaceResult<ExactParts> {
        let bound = if bindings.is_empty() {
            self.clone()
        } else {
            self.bind(&exact_bindings(bindings)?)?
        };
        debug!(
            states = self.states(),
            bound = bindings.iter().count(),
            "binding state-space parameters"
        );
        Ok(ExactParts {
            a: exact_matrix(&bound.a)?,
            b: exact_matrix(&bound.b)?,
            c: exact_matrix(&bound.c)?,
            d: exact_matrix(&bound.d)?,
        })
    }
}

fn exact_matrix(m: &DMatrix<RatFunc>) -> StateSpaceResult<DMatrix<Rational>> {
    let values = m
        .iter()
        .map(RatFunc::require_constant)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DMatrix::from_vec(m.nrows(), m.ncols(), values))
}

/// Parameter-free matrices of a model.
#[derive(Clone, Debug, PartialEq)]
pub struct ExactParts {
    pub a: DMatrix<Rational>,
    pub b: DMatrix<Rational>,
    pub c: DMatrix<Rational>,
    pub d: DMatrix<Rational>,
}

impl ExactParts {
    pub fn to_f64(&self) -> NumericStateSpace {
        NumericStateSpace {
            a: self.a.map(|q| to_f64(&q)),
            b: self.b.map(|q| to_f64(&q)),
            c: self.c.map(|q| to_f64(&q)),
            d: self.d.map(|q| to_f64(&q)),
        }
    }
}

/// State-space matrices in floating point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericStateSpace {
    pub a: DMatrix<f64>,
    pub b: DMatrix<f64>,
    pub c: DMatrix<f64>,
    pub d: DMatrix<f64>,
}

impl NumericStateSpace {
    /// Eigenvalues of `A` from nalgebra's real Schur decomposition.
    pub fn numeric_eigenvalues(&self) -> Vec<Complex64> {
        self.a.complex_eigenvalues().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lti_algebra::MPoly;
    use lti_algebra::rational::rat;
    use lti_core::LtiError;

    fn sym(name: &str) -> RatFunc {
        RatFunc::symbol(name)
    }

    fn mass_spring() -> StateSpace {
        // x1' = x2, x2' = -(k/m) x1 - (b/m) x2 + u/m
        let minv = RatFunc::new(MPoly::from_int(1), MPoly::symbol("m")).unwrap();
        let a = DMatrix::from_row_slice(
            2,
            2,
            &[
                RatFunc::from(0),
                RatFunc::from(1),
                -(&sym("k") * &minv),
                -(&sym("b") * &minv),
            ],
        );
        let b = DMatrix::from_row_slice(2, 1, &[RatFunc::from(0), minv]);
        let c = DMatrix::from_row_slice(1, 2, &[RatFunc::from(1), RatFunc::from(0)]);
        let d = DMatrix::from_row_slice(1, 1, &[RatFunc::from(0)]);
        StateSpace::new(a, b, c, d).unwrap()
    }

    #[test]
    fn descriptor_matrices_are_rejected() {
        let ss = mass_spring();
        let e = Some(DMatrix::from_element(2, 1, RatFunc::from(1)));
        let err = StateSpace::with_descriptor(
            ss.a().clone(),
            ss.b().clone(),
            ss.c().clone(),
            ss.d().clone(),
            e,
            None,
        )
        .unwrap_err();
        assert_eq!(err, StateSpaceError::DescriptorUnsupported);
    }

    #[test]
    fn shapes_are_checked() {
        let err = StateSpace::from_integers(2, 1, 1, &[0, 1, 2, 3], &[1, 0], &[1, 0], &[0, 0])
            .unwrap_err();
        assert!(matches!(err, StateSpaceError::DimensionMismatch { .. }));
        assert!(StateSpace::from_integers(2, 1, 1, &[0, 1, 2, 3], &[1, 0], &[1, 0], &[0]).is_ok());
    }

    #[test]
    fn parameters_are_collected_and_bound() {
        let ss = mass_spring();
        let names: Vec<String> = ss.symbols().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["b", "k", "m"]);

        let mut exact = ExactBindings::new();
        exact.insert(Symbol::new("m"), rat(2));
        let partial = ss.bind(&exact).unwrap();
        assert_eq!(partial.b()[(1, 0)], RatFunc::constant(lti_algebra::rational::ratio(1, 2)));
        let err = partial.exact_a().unwrap_err();
        assert!(matches!(err, StateSpaceError::Core(LtiError::UnboundSymbol { .. })));
    }

    #[test]
    fn numeric_conversion_and_eigenvalues() {
        let env = Bindings::new().with("m", 1.0).with("k", 4.0).with("b", 0.0);
        let num = mass_spring().to_numeric(&env).unwrap();
        assert_eq!(num.a, DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -4.0, 0.0]));
        let mut eig = num.numeric_eigenvalues();
        eig.sort_by(|x, y| x.im.total_cmp(&y.im));
        assert!((eig[0] - Complex64::new(0.0, -2.0)).norm() < 1e-12);
        assert!((eig[1] - Complex64::new(0.0, 2.0)).norm() < 1e-12);

        let err = mass_spring().to_numeric(&Bindings::new()).unwrap_err();
        assert!(matches!(err, StateSpaceError::Core(LtiError::UnboundSymbol { .. })));
    }

    #[test]
    fn exact_parts_round_trip_through_floats() {
        let env = Bindings::new().with("m", 0.5).with("k", 2.0).with("b", 0.25);
        let parts = mass_spring().exact_parts(&env).unwrap();
        assert_eq!(parts.a[(1, 0)], rat(-4));
        let back = StateSpace::from_numeric(&parts.to_f64()).unwrap();
        assert_eq!(back.exact_parts(&Bindings::new()).unwrap(), parts);
    }
}
