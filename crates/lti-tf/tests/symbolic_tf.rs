//! Integration test: parametric transfer functions.
//!
//! System: H(s) = (s + 2) / (a s^2 + b s + c)
//!
//! Test that demonstrates:
//! - exact DC gain 2/c
//! - standard-form factors multiply back to H
//! - forced responses accept exactly one input description
//! - time responses agree with the numeric transfer function
//! - parameters left unbound give a symbolic time response that binds to the
//!   same result

use lti_algebra::rational::rat;
use lti_algebra::{MPoly, Poly, RatFunc, Signal};
use lti_core::{Bindings, LtiError, Symbol};
use lti_tf::{
    ForcedResponse, Placement, ResponseOptions, StandardTerm, SymbolicTf, TransferError,
    factor_polynomial,
};
use num_complex::Complex64;

fn plant() -> SymbolicTf {
    SymbolicTf::from_descending(
        &[MPoly::from_int(1), MPoly::from_int(2)],
        &[MPoly::symbol("a"), MPoly::symbol("b"), MPoly::symbol("c")],
        Symbol::new("s"),
    )
    .unwrap()
}

#[test]
fn dc_gain_is_two_over_c() {
    let k = plant().dc_gain().unwrap();
    assert_eq!(k.to_string(), "2/c");
    assert_eq!(k, RatFunc::new(MPoly::from_int(2), MPoly::symbol("c")).unwrap());
}

#[test]
fn standard_form_of_the_plant() {
    let f = plant().factor().unwrap();
    assert_eq!(f.gain.to_string(), "2/c");
    let zeros: Vec<&StandardTerm> = f.zeros().collect();
    assert_eq!(
        zeros,
        vec![&StandardTerm::FirstOrder {
            tau: RatFunc::constant(lti_algebra::rational::ratio(1, 2))
        }]
    );
    let poles: Vec<&StandardTerm> = f.poles().collect();
    assert_eq!(poles.len(), 1);
    assert_eq!(
        poles[0].display_with(&Symbol::new("s")).to_string(),
        "((a/c)*s^2 + (b/c)*s + 1)"
    );
    assert_eq!(
        f.display_with(&Symbol::new("s")).to_string(),
        "(2/c)*((1/2)*s + 1)/((a/c)*s^2 + (b/c)*s + 1)"
    );
}

#[test]
fn poles_evaluate_to_the_numeric_roots() {
    let env = Bindings::new().with("a", 1.0).with("b", 0.4).with("c", 4.0);
    let poles = plant().poles().unwrap();
    let numeric = plant().to_numeric(&env).unwrap().poles().unwrap();
    for p in &poles {
        let v = p.root.eval(&env).unwrap();
        assert!(numeric.iter().any(|r| (r - v).norm() < 1e-9), "{v} not in {numeric:?}");
    }
}

#[test]
fn forced_response_input_specification() {
    let h = plant();
    let t = Symbol::new("t");
    let step = Signal::step(rat(1));
    let step_s = SymbolicTf::from_signal(&step, Symbol::new("s")).unwrap();
    let opts = ResponseOptions::laplace();

    let both = h.forced_response(&t, Some(&step), Some(&step_s), &opts);
    assert!(matches!(both, Err(TransferError::InputSpecification { .. })));
    let neither = h.forced_response(&t, None, None, &opts);
    assert!(matches!(neither, Err(TransferError::InputSpecification { .. })));

    // the check comes before anything else, even with unbound parameters
    let neither_time = h.forced_response(&t, None, None, &ResponseOptions::default());
    assert!(matches!(neither_time, Err(TransferError::InputSpecification { .. })));

    let from_time = h.forced_response(&t, Some(&step), None, &opts).unwrap();
    let from_laplace = h.forced_response(&t, None, Some(&step_s), &opts).unwrap();
    assert_eq!(from_time, from_laplace);
}

#[test]
fn step_response_matches_final_value_and_initial_slope() {
    let env = Bindings::new().with("a", 1.0).with("b", 3.0).with("c", 2.0);
    let y = plant()
        .forced_response(
            &Symbol::new("t"),
            Some(&Signal::step(rat(1))),
            None,
            &ResponseOptions::time(env.clone()),
        )
        .unwrap();
    let ForcedResponse::Time(y) = y else {
        panic!("expected a time response");
    };
    // (s + 2)/((s + 1)(s + 2)) · 1/s  =>  y = 1 - e^{-t}
    for time in [0.0_f64, 0.5, 2.0] {
        assert!((y.eval_real(time) - (1.0 - (-time).exp())).abs() < 1e-12);
    }
    let dc = plant().dc_gain().unwrap().eval(&env).unwrap();
    assert!((y.eval_real(50.0) - dc).abs() < 1e-12);
}

#[test]
fn partially_bound_step_response_stays_symbolic() {
    let t = Symbol::new("t");
    let step = Signal::step(rat(1));
    let partial = ResponseOptions::time(Bindings::new().with("a", 1.0).with("c", 1.0));
    let y = plant()
        .forced_response(&t, Some(&step), None, &partial)
        .unwrap();
    let ForcedResponse::SymbolicTime(y) = y else {
        panic!("expected a symbolic time response");
    };
    // the unbound parameter is named by the response
    let names: Vec<String> = y.symbols().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["b"]);

    // (s + 2)/(s (s^2 + b s + 1)) at b = 3 and b = 1
    for b in [3.0_f64, 1.0] {
        let env = Bindings::new().with("a", 1.0).with("b", b).with("c", 1.0);
        let full = plant()
            .forced_response(&t, Some(&step), None, &ResponseOptions::time(env))
            .unwrap();
        let full = full.as_time().unwrap();
        let late = Bindings::new().with("b", b);
        for time in [0.0_f64, 0.7, 4.0] {
            let got = y.eval_real(time, &late).unwrap();
            assert!((got - full.eval_real(time)).abs() < 1e-12, "b = {b}, t = {time}");
        }
    }
    // b = 2 is a double pole at -1
    let critical = Bindings::new().with("b", 2.0);
    assert!(matches!(
        y.bind(&critical).unwrap_err(),
        LtiError::DivisionByZero { .. }
    ));
}

#[test]
fn frequency_response_agrees_with_evaluation() {
    let env = Bindings::new().with("a", 0.5).with("b", 1.0).with("c", 8.0);
    let h = plant();
    let fr = h.frequency_response(Symbol::new("w"));
    let v = fr.eval(2.0, &env).unwrap();
    let direct = h.eval(Complex64::new(0.0, 2.0), &env).unwrap();
    assert!((v - direct).norm() < 1e-12);
}

#[test]
fn pole_placement_inverts_the_gain() {
    // 4 s^2 + 8 s: zero side gain 8, pole side gain 1/8
    let p = Poly::from_descending(&[MPoly::from_int(4), MPoly::from_int(8), MPoly::from_int(0)]);
    let (kz, _) = factor_polynomial(&p, Placement::Zero).unwrap();
    let (kp, terms) = factor_polynomial(&p, Placement::Pole).unwrap();
    assert_eq!(kz, RatFunc::from(8));
    assert_eq!(kp, kz.inv().unwrap());
    assert!(terms.contains(&StandardTerm::Origin));
}
