//! Integration test: exact factorization and Laplace pairs.
//!
//! Test that demonstrates:
//! - factors multiply back to the input and have degree at most two
//! - inverting the transform of a signal gives the signal back
//! - partial fractions agree with the direct time form for repeated poles

use lti_algebra::rational::{rat, ratio};
use lti_algebra::{Poly, Rational, Signal, factor_rational, inverse_laplace};
use lti_core::Symbol;
use proptest::prelude::*;

fn t() -> Symbol {
    Symbol::new("t")
}

/// `lead · Π (s − r_i) · Π (s² + b_j s + c_j)`
fn build(lead: i64, roots: &[i64], quadratics: &[(i64, i64)]) -> Poly<Rational> {
    let real = Poly::from_roots(
        rat(lead),
        &roots.iter().map(|&r| rat(r)).collect::<Vec<_>>(),
    );
    quadratics.iter().fold(real, |acc, &(b, c)| {
        &acc * &Poly::new(vec![rat(c), rat(b), rat(1)])
    })
}

#[test]
fn repeated_and_irreducible_factors() {
    // 2 (s + 1)^2 (s^2 + 1) (s^2 - 2)
    let p = build(2, &[-1, -1], &[(0, 1), (0, -2)]);
    let f = factor_rational(&p).unwrap();
    assert_eq!(f.unit, rat(2));
    assert_eq!(f.expand(), p);
    let linear = f
        .factors
        .iter()
        .find(|(g, _)| g.degree() == Some(1))
        .unwrap();
    assert_eq!(linear.1, 2);
    assert_eq!(f.factors.iter().filter(|(g, _)| g.degree() == Some(2)).count(), 2);
}

#[test]
fn step_plus_cosine_round_trips() {
    let u = Signal::step(rat(2)).plus(Signal::cosine(rat(1), rat(3)));
    let (num, den) = u.laplace();
    let back = inverse_laplace(&num, &den, t()).unwrap();
    let direct = u.to_exp_poly(t());
    for time in [0.0_f64, 0.4, 1.7] {
        assert!((back.eval_real(time) - direct.eval_real(time)).abs() < 1e-12);
        assert!((back.eval_real(time) - (2.0 + (3.0 * time).cos())).abs() < 1e-12);
    }
}

#[test]
fn triple_pole() {
    // 1/(s + 1/2)^3 -> t^2 e^{-t/2} / 2
    let den = Poly::from_roots(rat(1), &[ratio(-1, 2), ratio(-1, 2), ratio(-1, 2)]);
    let f = inverse_laplace(&Poly::one(), &den, t()).unwrap();
    for time in [0.5_f64, 2.0, 5.0] {
        let expected = time * time * (-time / 2.0).exp() / 2.0;
        assert!((f.eval_real(time) - expected).abs() < 1e-12);
    }
}

proptest! {
    #[test]
    fn factorization_reconstructs(
        lead in prop::sample::select(vec![-3i64, -1, 1, 2, 5]),
        roots in prop::collection::vec(-6i64..=6, 0..4),
        quadratics in prop::collection::vec((-4i64..=4, 1i64..=9), 0..2),
    ) {
        let p = build(lead, &roots, &quadratics);
        let f = factor_rational(&p).unwrap();
        prop_assert_eq!(f.expand(), p);
        prop_assert!(f.factors.iter().all(|(g, _)| matches!(g.degree(), Some(1) | Some(2))));
        prop_assert!(f.factors.iter().all(|(g, _)| g.leading() == Some(&rat(1))));
    }

    #[test]
    fn exponential_signals_round_trip(
        a in -5i64..=5,
        rate in -4i64..=0,
        power in 0u32..3,
    ) {
        prop_assume!(a != 0);
        let u = Signal::term(rat(a), power, rat(rate), lti_algebra::Oscillation::None);
        let (num, den) = u.laplace();
        let back = inverse_laplace(&num, &den, t()).unwrap();
        let direct = u.to_exp_poly(t());
        for time in [0.0_f64, 0.5, 1.5] {
            let scale = 1.0 + direct.eval_real(time).abs();
            prop_assert!((back.eval_real(time) - direct.eval_real(time)).abs() < 1e-10 * scale);
        }
    }
}
