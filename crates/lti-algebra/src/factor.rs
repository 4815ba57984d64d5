//! Exact factorization into irreducible factors of degree one or two.
//!
//! Over the rationals the strategy is numeric-guided and exactly verified:
//! square-free parts come from Yun's algorithm, candidate rational roots and
//! rational quadratic factors are read off the floating roots with continued
//! fractions, and each candidate is kept only if it divides exactly.
//!
//! Polynomials with parametric coefficients are split into parameter-free
//! factors (the gcd of the coefficient slices), linear factors found among
//! the divisors of the end coefficients, repeated factors from Yun's
//! algorithm over `Q(params)`, and quadratics whose discriminant is a
//! perfect square.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use tracing::debug;

use crate::error::{AlgebraError, AlgebraResult};
use crate::mpoly::{MPoly, Monomial};
use crate::poly::Poly;
use crate::ratfunc::RatFunc;
use crate::rational::{Rational, approximate, rat, rational_gcd, to_f64};
use crate::roots::polynomial_roots;

/// Largest denominator tried when reading rationals off floating roots.
const MAX_DENOMINATOR: i128 = 1_000_000_000_000_000;

/// Closeness required between a float and a candidate rational.
const MATCH_TOL: f64 = 1e-7;

/// `p = unit · Π factor^multiplicity` with monic factors of degree 1 or 2.
#[derive(Clone, Debug, PartialEq)]
pub struct Factorization {
    pub unit: Rational,
    pub factors: Vec<(Poly<Rational>, usize)>,
}

impl Factorization {
    pub fn expand(&self) -> Poly<Rational> {
        self.factors
            .iter()
            .fold(Poly::constant(self.unit.clone()), |acc, (f, m)| &acc * &f.pow(*m))
    }
}

/// `p = unit · Π factor^multiplicity` over `Q(params)`, factors of degree 1
/// or 2 with primitive coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct ParametricFactorization {
    pub unit: RatFunc,
    pub factors: Vec<(Poly<MPoly>, usize)>,
}

impl ParametricFactorization {
    /// Product of the factors (without the unit).
    pub fn expand_factors(&self) -> Poly<MPoly> {
        self.factors
            .iter()
            .fold(Poly::one(), |acc, (f, m)| &acc * &f.pow(*m))
    }
}

fn push_factor<T: PartialEq>(factors: &mut Vec<(T, usize)>, f: T, multiplicity: usize) {
    match factors.iter_mut().find(|(g, _)| *g == f) {
        Some((_, m)) => *m += multiplicity,
        None => factors.push((f, multiplicity)),
    }
}

/// Factors a polynomial with rational coefficients.
pub fn factor_rational(p: &Poly<Rational>) -> AlgebraResult<Factorization> {
    let unit = p.leading().cloned().ok_or(AlgebraError::ZeroPolynomial {
        what: "factor_rational",
    })?;
    let monic = p.monic().ok_or(AlgebraError::ZeroPolynomial {
        what: "factor_rational",
    })?;
    let mut factors = Vec::new();
    let zeros = monic.low_order_zeros();
    if zeros > 0 {
        factors.push((Poly::x(), zeros));
    }
    let rest = monic.shift_down(zeros);
    for (part, multiplicity) in rest.square_free() {
        for f in split_square_free(&part)? {
            push_factor(&mut factors, f, multiplicity);
        }
    }
    debug!(
        degree = ?p.degree(),
        factors = factors.len(),
        "rational factorization"
    );
    Ok(Factorization { unit, factors })
}

/// Denominator bound for rational roots and monic rational quadratic factors
/// of a monic `f`: the lcm of its coefficient denominators.
fn denominator_bound(f: &Poly<Rational>) -> i128 {
    let mut lcm = BigInt::one();
    for c in f.coeffs() {
        let d = c.denom();
        let g = crate::rational::big_gcd(&lcm, d);
        lcm = &lcm / &g * d;
    }
    i128::try_from(lcm).map_or(MAX_DENOMINATOR, |v| v.min(MAX_DENOMINATOR))
}

fn float_roots(f: &Poly<Rational>) -> AlgebraResult<Vec<num_complex::Complex64>> {
    polynomial_roots(&f.map(to_f64), 8)
}

/// Splits a monic square-free polynomial into irreducible factors over Q.
fn split_square_free(f: &Poly<Rational>) -> AlgebraResult<Vec<Poly<Rational>>> {
    let mut out = Vec::new();
    let mut remaining = f.clone();

    while remaining.degree().is_some_and(|d| d > 1) {
        let Some(root) = find_rational_root(&remaining)? else {
            break;
        };
        let linear = Poly::linear(root);
        remaining = remaining
            .div_exact(&linear)
            .ok_or(AlgebraError::DivisionByZero {
                what: "rational root deflation",
            })?;
        out.push(linear);
    }

    loop {
        match remaining.degree() {
            None | Some(0) => break,
            Some(d) if d <= 2 => {
                out.push(remaining);
                break;
            }
            Some(d) => {
                let Some(quad) = find_rational_quadratic(&remaining)? else {
                    return Err(AlgebraError::UnsupportedFactorDegree { degree: d });
                };
                remaining = remaining
                    .div_exact(&quad)
                    .ok_or(AlgebraError::DivisionByZero {
                        what: "quadratic deflation",
                    })?;
                out.push(quad);
            }
        }
    }
    Ok(out)
}

fn find_rational_root(f: &Poly<Rational>) -> AlgebraResult<Option<Rational>> {
    let bound = denominator_bound(f);
    for z in float_roots(f)? {
        if z.im.abs() > MATCH_TOL * z.norm().max(1.0) {
            continue;
        }
        if let Some(q) = approximate(z.re, bound, MATCH_TOL) {
            if f.eval(&q).is_zero() {
                return Ok(Some(q));
            }
        }
    }
    Ok(None)
}

fn find_rational_quadratic(f: &Poly<Rational>) -> AlgebraResult<Option<Poly<Rational>>> {
    let bound = denominator_bound(f);
    let roots = float_roots(f)?;
    for i in 0..roots.len() {
        for j in (i + 1)..roots.len() {
            let (a, b) = (roots[i], roots[j]);
            let real_pair = a.im.abs() <= MATCH_TOL * a.norm().max(1.0)
                && b.im.abs() <= MATCH_TOL * b.norm().max(1.0);
            let conjugate_pair = (a - b.conj()).norm() <= MATCH_TOL * a.norm().max(1.0);
            if !real_pair && !conjugate_pair {
                continue;
            }
            let beta = -(a + b).re;
            let gamma = (a * b).re;
            let (Some(beta), Some(gamma)) = (
                approximate(beta, bound, MATCH_TOL),
                approximate(gamma, bound, MATCH_TOL),
            ) else {
                continue;
            };
            let quad = Poly::new(vec![gamma, beta, Rational::one()]);
            if f.div_exact(&quad).is_some() {
                return Ok(Some(quad));
            }
        }
    }
    Ok(None)
}

/// Factors a polynomial in the Laplace variable with parametric coefficients.
///
/// Parameter-free factors are split off first. Linear factors `c1·s + c0`
/// come next, with `c1` dividing the leading and `c0` the trailing
/// coefficient in `Q[params]`, each divided out as often as it goes. If more
/// than a quadratic is left, Yun's algorithm over `Q(params)` separates
/// repeated factors; every square-free part must then be at most quadratic.
pub fn factor_parametric(p: &Poly<MPoly>) -> AlgebraResult<ParametricFactorization> {
    if p.is_zero() {
        return Err(AlgebraError::ZeroPolynomial {
            what: "factor_parametric",
        });
    }
    if let Some(numeric) = as_rational_poly(p) {
        let f = factor_rational(&numeric)?;
        return Ok(ParametricFactorization {
            unit: RatFunc::constant(f.unit),
            factors: f
                .factors
                .into_iter()
                .map(|(g, m)| (g.map(|c| MPoly::constant(c.clone())), m))
                .collect(),
        });
    }

    let (_, prim) = primitive_part(p)?;
    let mut factors = Vec::new();
    let cofactor = split_parameter_free(&prim, &mut factors)?;
    let remaining = split_linear_factors(cofactor, &mut factors)?;
    if remaining.degree().is_some_and(|d| d > 2) {
        let lifted = remaining.map(|c| RatFunc::from_poly(c.clone()));
        for (part, multiplicity) in lifted.square_free() {
            for f in split_low_degree(&clear_denominators(&part)?)? {
                push_factor(&mut factors, f, multiplicity);
            }
        }
    } else {
        for f in split_low_degree(&remaining)? {
            push_factor(&mut factors, f, 1);
        }
    }

    let product = factors
        .iter()
        .fold(Poly::<MPoly>::one(), |acc, (f, m)| &acc * &f.pow(*m));
    let unit = leading_ratio(p, &product)?;
    debug!(
        degree = ?p.degree(),
        factors = factors.len(),
        "parametric factorization"
    );
    Ok(ParametricFactorization { unit, factors })
}

/// `lead(p) / lead(q)`, the unit left once `q` has been divided out of `p`.
fn leading_ratio(p: &Poly<MPoly>, q: &Poly<MPoly>) -> AlgebraResult<RatFunc> {
    let lead = |x: &Poly<MPoly>| RatFunc::from_poly(x.leading().cloned().unwrap_or_default());
    Ok(lead(p).checked_div(&lead(q))?)
}

/// Moves the factors free of parameters (they divide every coefficient
/// slice) into `factors` and returns the primitive cofactor.
fn split_parameter_free(
    prim: &Poly<MPoly>,
    factors: &mut Vec<(Poly<MPoly>, usize)>,
) -> AlgebraResult<Poly<MPoly>> {
    let slices = coefficient_slices(prim);
    let common = slices
        .values()
        .fold(Poly::<Rational>::zero(), |g, slice| g.gcd(slice));
    if !common.degree().is_some_and(|d| d > 0) {
        return Ok(prim.clone());
    }
    let numeric = factor_rational(&common)?;
    for (g, m) in numeric.factors {
        push_factor(factors, g.map(|c| MPoly::constant(c.clone())), m);
    }
    let mut quotient = Poly::<MPoly>::zero();
    for (monomial, slice) in &slices {
        let q = slice
            .div_exact(&common)
            .ok_or(AlgebraError::DivisionByZero {
                what: "coefficient slice",
            })?;
        let lifted = q.map(|c| MPoly::term(c.clone(), monomial.clone()));
        quotient = &quotient + &lifted;
    }
    Ok(primitive_part(&quotient)?.1)
}

/// Primitive polynomial over `Q[params]` with the same roots as `p`.
pub(crate) fn clear_denominators(p: &Poly<RatFunc>) -> AlgebraResult<Poly<MPoly>> {
    let mut scale = MPoly::one();
    for c in p.coeffs() {
        if scale.div_exact(c.denom()).is_none() {
            scale = &scale * c.denom();
        }
    }
    let scale = RatFunc::from_poly(scale);
    let lifted = p.try_map(|c| {
        (&scale * c)
            .as_poly()
            .cloned()
            .ok_or(AlgebraError::DivisionByZero {
                what: "clearing denominators",
            })
    })?;
    Ok(primitive_part(&lifted)?.1)
}

/// Divides the linear factors of a polynomial of degree three or more out
/// of `f`, with multiplicity, and returns what is left.
fn split_linear_factors(
    f: Poly<MPoly>,
    factors: &mut Vec<(Poly<MPoly>, usize)>,
) -> AlgebraResult<Poly<MPoly>> {
    let mut remaining = f;
    while remaining.degree().is_some_and(|d| d > 2) {
        let Some((linear, mut quotient)) = find_parametric_linear(&remaining)? else {
            break;
        };
        let mut multiplicity = 1;
        while let Some(q) = div_linear(&quotient, &linear) {
            quotient = q;
            multiplicity += 1;
        }
        push_factor(factors, primitive_part(&linear)?.1, multiplicity);
        remaining = quotient;
    }
    Ok(remaining)
}

/// Primitive factors of a polynomial of degree at most two; a quadratic is
/// split when its discriminant is a perfect square.
fn split_low_degree(f: &Poly<MPoly>) -> AlgebraResult<Vec<Poly<MPoly>>> {
    match f.degree() {
        None | Some(0) => Ok(Vec::new()),
        Some(1) => Ok(vec![primitive_part(f)?.1]),
        Some(2) => match split_parametric_quadratic(f)? {
            Some((f1, f2)) => Ok(vec![f1, f2]),
            None => Ok(vec![primitive_part(f)?.1]),
        },
        Some(d) => Err(AlgebraError::UnsupportedFactorDegree { degree: d }),
    }
}

/// Largest number of `(c1, c0)` pairs tried for one linear factor.
const MAX_LINEAR_CANDIDATES: usize = 4096;

/// A primitive linear factor `c1·s + c0` of `f` and the exact quotient.
fn find_parametric_linear(
    f: &Poly<MPoly>,
) -> AlgebraResult<Option<(Poly<MPoly>, Poly<MPoly>)>> {
    let Some(lead) = f.leading() else {
        return Ok(None);
    };
    let leads = divisors(lead)?;
    let trails = divisors(&f.coeff(0))?;
    if leads.len() * trails.len() > MAX_LINEAR_CANDIDATES {
        debug!(
            leads = leads.len(),
            trails = trails.len(),
            "too many linear factor candidates"
        );
        return Ok(None);
    }
    for c1 in &leads {
        for c0 in &trails {
            for c0 in [c0.clone(), -c0] {
                let linear = Poly::new(vec![c0, c1.clone()]);
                if let Some(quotient) = div_linear(f, &linear) {
                    return Ok(Some((linear, quotient)));
                }
            }
        }
    }
    Ok(None)
}

/// `f / (c1·s + c0)` when the division is exact in `Q[params][s]`.
fn div_linear(f: &Poly<MPoly>, linear: &Poly<MPoly>) -> Option<Poly<MPoly>> {
    let (c0, c1) = (linear.coeff(0), linear.coeff(1));
    let n = f.degree().filter(|&n| n > 0)?;
    let mut q = vec![MPoly::zero(); n];
    let mut carry = f.coeff(n);
    for k in (0..n).rev() {
        q[k] = carry.div_exact(&c1)?;
        carry = &f.coeff(k) - &(&c0 * &q[k]);
    }
    carry.is_zero().then(|| Poly::new(q))
}

/// Divisors of `c` in `Q[params]` up to sign, built from a coarse
/// factorization: integer divisors of the numeric content, the symbols of
/// the monomial content and factors found one symbol at a time.
fn divisors(c: &MPoly) -> AlgebraResult<Vec<MPoly>> {
    let content = c.numeric_content();
    let mut out: Vec<MPoly> = integer_divisors(content.numer())
        .into_iter()
        .map(|d| MPoly::constant(Rational::from_integer(d)))
        .collect();
    for (g, m) in parameter_factors(c)? {
        let mut next = Vec::with_capacity(out.len() * (m + 1));
        for d in &out {
            let mut power = d.clone();
            next.push(power.clone());
            for _ in 0..m {
                power = &power * &g;
                next.push(power.clone());
            }
        }
        out = next;
        if out.len() > MAX_LINEAR_CANDIDATES {
            break;
        }
    }
    Ok(out)
}

/// Positive divisors of a small integer; `[1, |n|]` when `n` is too large
/// for trial division.
fn integer_divisors(n: &BigInt) -> Vec<BigInt> {
    let Some(n) = n.magnitude().to_u64().filter(|&n| n > 0 && n <= 1_000_000_000_000) else {
        return vec![BigInt::one(), n.magnitude().clone().into()];
    };
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            small.push(BigInt::from(d));
            if d * d != n {
                large.push(BigInt::from(n / d));
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// Non-constant factors of `c` in `Q[params]` with multiplicity, each with
/// unit numeric content and a positive leading coefficient. Factors found
/// by treating `c` as a polynomial in one of its symbols; a part that will
/// not split that way is kept whole.
fn parameter_factors(c: &MPoly) -> AlgebraResult<Vec<(MPoly, usize)>> {
    let mut out = Vec::new();
    if c.is_constant() {
        return Ok(out);
    }
    let mono = c.monomial_content();
    for (symbol, e) in mono.powers() {
        push_factor(&mut out, MPoly::var(symbol.clone()), *e as usize);
    }
    let rest = c
        .div_exact(&MPoly::term(c.numeric_content(), mono))
        .ok_or(AlgebraError::DivisionByZero {
            what: "parameter content",
        })?;
    if rest.is_constant() {
        return Ok(out);
    }
    let Some(x) = rest.symbols().into_iter().next() else {
        return Ok(out);
    };
    match factor_parametric(&rest.coefficients_in(&x)) {
        Ok(f) => {
            for (g, m) in f.factors {
                push_factor(&mut out, unit_content(&MPoly::from_coefficients_in(&g, &x)), m);
            }
            for (g, m) in parameter_factors(f.unit.numer())? {
                push_factor(&mut out, g, m);
            }
        }
        Err(err) => {
            debug!(%err, symbol = %x, "keeping parameter polynomial whole");
            push_factor(&mut out, unit_content(&rest), 1);
        }
    }
    Ok(out)
}

/// `c` scaled to unit numeric content and a positive leading coefficient.
fn unit_content(c: &MPoly) -> MPoly {
    let mut g = c.numeric_content();
    if c.leading_is_negative() {
        g = -g;
    }
    if g.is_zero() { c.clone() } else { c.scale(&g.recip()) }
}

/// The polynomial with rational coefficients, if no parameter appears.
pub fn as_rational_poly(p: &Poly<MPoly>) -> Option<Poly<Rational>> {
    let coeffs = p
        .coeffs()
        .iter()
        .map(MPoly::as_constant)
        .collect::<Option<Vec<_>>>()?;
    Some(Poly::new(coeffs))
}

/// Splits off numeric content, the common monomial and the sign of the
/// leading coefficient: `p = content · prim`.
pub fn primitive_part(p: &Poly<MPoly>) -> AlgebraResult<(RatFunc, Poly<MPoly>)> {
    let nonzero: Vec<&MPoly> = p.coeffs().iter().filter(|c| !c.is_zero()).collect();
    let Some(first) = nonzero.first() else {
        return Ok((RatFunc::one(), p.clone()));
    };
    let numeric = nonzero
        .iter()
        .fold(Rational::zero(), |g, c| rational_gcd(&g, &c.numeric_content()));
    let mono = nonzero
        .iter()
        .fold(first.monomial_content(), |g, c| g.gcd(&c.monomial_content()));
    let negative = p.leading().is_some_and(MPoly::leading_is_negative);
    let numeric = if negative { -numeric } else { numeric };
    let content = MPoly::term(numeric, mono);
    let prim = p.try_map(|c| {
        c.div_exact(&content).ok_or(AlgebraError::DivisionByZero {
            what: "primitive part",
        })
    })?;
    Ok((RatFunc::from_poly(content), prim))
}

/// Groups coefficients by parameter monomial: `p = Σ m · p_m(s)`.
fn coefficient_slices(p: &Poly<MPoly>) -> BTreeMap<Monomial, Poly<Rational>> {
    let n = p.coeffs().len();
    let mut dense: BTreeMap<Monomial, Vec<Rational>> = BTreeMap::new();
    for (k, c) in p.coeffs().iter().enumerate() {
        for (m, q) in c.terms() {
            dense
                .entry(m.clone())
                .or_insert_with(|| vec![Rational::zero(); n])[k] = q.clone();
        }
    }
    dense.into_iter().map(|(m, v)| (m, Poly::new(v))).collect()
}

/// `A s² + B s + C = (2A s + B − r)(2A s + B + r) / (4A)` when
/// `r² = B² − 4AC` has an exact root `r`; both factors primitive.
fn split_parametric_quadratic(
    q: &Poly<MPoly>,
) -> AlgebraResult<Option<(Poly<MPoly>, Poly<MPoly>)>> {
    let (c, b, a) = (q.coeff(0), q.coeff(1), q.coeff(2));
    let disc = &(&b * &b) - &(&a * &c).scale(&rat(4));
    let Some(r) = disc.sqrt_exact() else {
        return Ok(None);
    };
    let two_a = a.scale(&rat(2));
    let f1 = Poly::new(vec![&b - &r, two_a.clone()]);
    let f2 = Poly::new(vec![&b + &r, two_a]);
    Ok(Some((primitive_part(&f1)?.1, primitive_part(&f2)?.1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::ratio;

    fn q(coeffs: &[i64]) -> Poly<Rational> {
        Poly::from_descending(&coeffs.iter().map(|&c| rat(c)).collect::<Vec<_>>())
    }

    fn degrees(f: &Factorization) -> Vec<(usize, usize)> {
        let mut d: Vec<_> = f
            .factors
            .iter()
            .map(|(g, m)| (g.degree().unwrap_or(0), *m))
            .collect();
        d.sort();
        d
    }

    #[test]
    fn splits_rational_roots_and_irreducible_quadratic() {
        // 30s^3 + 271s^2 + 2439s + 81 = (30s + 1)(s^2 + 9s + 81)
        let p = q(&[30, 271, 2439, 81]);
        let f = factor_rational(&p).unwrap();
        assert_eq!(f.unit, rat(30));
        assert_eq!(degrees(&f), vec![(1, 1), (2, 1)]);
        assert!(f.factors.iter().any(|(g, _)| *g == Poly::linear(ratio(-1, 30))));
        assert_eq!(f.expand(), p);
    }

    #[test]
    fn repeated_and_origin_roots() {
        // 2 s (s + 1)^2 (s - 3)
        let p = &(&q(&[2, 0]) * &q(&[1, 1]).pow(2)) * &q(&[1, -3]);
        let f = factor_rational(&p).unwrap();
        assert_eq!(f.unit, rat(2));
        assert!(f.factors.contains(&(Poly::x(), 1)));
        assert!(f.factors.contains(&(q(&[1, 1]), 2)));
        assert!(f.factors.contains(&(q(&[1, -3]), 1)));
        assert_eq!(f.expand(), p);
    }

    #[test]
    fn quartic_into_two_quadratics() {
        // (s^2 + 1)(s^2 + 2s + 5)
        let p = &q(&[1, 0, 1]) * &q(&[1, 2, 5]);
        let f = factor_rational(&p).unwrap();
        assert_eq!(degrees(&f), vec![(2, 1), (2, 1)]);
        assert_eq!(f.expand(), p);
    }

    #[test]
    fn irreducible_cubic_is_rejected() {
        let err = factor_rational(&q(&[1, 0, 0, 2])).unwrap_err();
        assert_eq!(err, AlgebraError::UnsupportedFactorDegree { degree: 3 });
    }

    fn s_poly(coeffs: Vec<MPoly>) -> Poly<MPoly> {
        Poly::from_descending(&coeffs)
    }

    #[test]
    fn parametric_quadratic_stays_whole() {
        // a s^2 + b s + c
        let p = s_poly(vec![MPoly::symbol("a"), MPoly::symbol("b"), MPoly::symbol("c")]);
        let f = factor_parametric(&p).unwrap();
        assert_eq!(f.factors, vec![(p.clone(), 1)]);
        assert_eq!(f.unit, RatFunc::one());
    }

    #[test]
    fn parametric_square_discriminant_splits() {
        // (s + a)(s + b) = s^2 + (a + b) s + a b
        let a = MPoly::symbol("a");
        let b = MPoly::symbol("b");
        let p = s_poly(vec![MPoly::one(), &a + &b, &a * &b]);
        let f = factor_parametric(&p).unwrap();
        assert_eq!(f.factors.len(), 2);
        let product = f.expand_factors().map(|c| RatFunc::from_poly(c.clone()));
        let scaled = product.scale(&f.unit);
        assert_eq!(scaled, p.map(|c| RatFunc::from_poly(c.clone())));
    }

    #[test]
    fn numeric_factor_of_parametric_polynomial() {
        // (s + 1)(s^2 + a s + 1)
        let a = MPoly::symbol("a");
        let quad = s_poly(vec![MPoly::one(), a.clone(), MPoly::one()]);
        let p = &s_poly(vec![MPoly::one(), MPoly::one()]) * &quad;
        let f = factor_parametric(&p).unwrap();
        assert_eq!(f.factors.len(), 2);
        assert!(f.factors.contains(&(quad, 1)));
    }

    fn reconstructs(f: &ParametricFactorization, p: &Poly<MPoly>) -> bool {
        let product = f.expand_factors().map(|c| RatFunc::from_poly(c.clone()));
        product.scale(&f.unit) == p.map(|c| RatFunc::from_poly(c.clone()))
    }

    fn linear(c0: MPoly) -> Poly<MPoly> {
        s_poly(vec![MPoly::one(), c0])
    }

    #[test]
    fn repeated_parametric_linear_factor() {
        // (s + a)^3
        let p = linear(MPoly::symbol("a")).pow(3);
        let f = factor_parametric(&p).unwrap();
        assert_eq!(f.factors, vec![(linear(MPoly::symbol("a")), 3)]);
        assert_eq!(f.unit, RatFunc::one());
        assert!(reconstructs(&f, &p));
    }

    #[test]
    fn three_parametric_linear_factors() {
        // (s + a)(s + b)(s + c)
        let (a, b, c) = (MPoly::symbol("a"), MPoly::symbol("b"), MPoly::symbol("c"));
        let p = &(&linear(a.clone()) * &linear(b.clone())) * &linear(c.clone());
        let f = factor_parametric(&p).unwrap();
        assert_eq!(f.factors.len(), 3);
        for g in [a, b, c] {
            assert!(f.factors.contains(&(linear(g), 1)));
        }
        assert!(reconstructs(&f, &p));
    }

    #[test]
    fn linear_factors_with_parametric_leading_coefficients() {
        // (k s + 1)(s + b)(s^2 + a s + 1)
        let (a, b, k) = (MPoly::symbol("a"), MPoly::symbol("b"), MPoly::symbol("k"));
        let quad = s_poly(vec![MPoly::one(), a, MPoly::one()]);
        let lag = s_poly(vec![k, MPoly::one()]);
        let p = &(&lag * &linear(b.clone())) * &quad;
        let f = factor_parametric(&p).unwrap();
        assert_eq!(f.factors.len(), 3);
        assert!(f.factors.contains(&(lag, 1)));
        assert!(f.factors.contains(&(linear(b), 1)));
        assert!(f.factors.contains(&(quad, 1)));
        assert!(reconstructs(&f, &p));
    }

    #[test]
    fn squared_parametric_quadratic() {
        // 2 (s^2 + a s + 1)^2
        let quad = s_poly(vec![MPoly::one(), MPoly::symbol("a"), MPoly::one()]);
        let p = quad.pow(2).scale(&MPoly::from_int(2));
        let f = factor_parametric(&p).unwrap();
        assert_eq!(f.factors, vec![(quad, 2)]);
        assert_eq!(f.unit, RatFunc::from(2));
        assert!(reconstructs(&f, &p));
    }

    #[test]
    fn divisors_of_parameter_polynomials() {
        // 2 a (b + 1)(c - 1)
        let (a, b, c) = (MPoly::symbol("a"), MPoly::symbol("b"), MPoly::symbol("c"));
        let target = &(&a.scale(&rat(2)) * &(&b + &MPoly::one())) * &(&c - &MPoly::one());
        let found = parameter_factors(&target).unwrap();
        assert!(found.contains(&(a.clone(), 1)));
        assert!(found.contains(&(&b + &MPoly::one(), 1)));
        assert!(found.contains(&(&c - &MPoly::one(), 1)));
        // 2 divisors of 2, times 2^3 subsets of the three factors
        assert_eq!(divisors(&target).unwrap().len(), 16);
    }

    #[test]
    fn parametric_cubic_is_rejected() {
        let p = s_poly(vec![MPoly::one(), MPoly::zero(), MPoly::zero(), MPoly::symbol("a")]);
        let err = factor_parametric(&p).unwrap_err();
        assert_eq!(err, AlgebraError::UnsupportedFactorDegree { degree: 3 });
    }

    #[test]
    fn content_is_pulled_out() {
        // 2a s + 4a = 2a (s + 2)
        let a = MPoly::symbol("a");
        let p = s_poly(vec![a.scale(&rat(2)), a.scale(&rat(4))]);
        let (content, prim) = primitive_part(&p).unwrap();
        assert_eq!(content, RatFunc::from_poly(a.scale(&rat(2))));
        assert_eq!(prim, s_poly(vec![MPoly::one(), MPoly::from_int(2)]));
    }
}
