//! Integration test: exact eigenstructure and closed-form responses.
//!
//! System: A = [[-4, -3, 0], [0, -8, 4], [0, 0, -1]], B = [0, 1, 0]^T,
//!         C = [0, 1, 0], D = 0
//!
//! Test that demonstrates:
//! - eigenvalues are exactly {-4, -8, -1} and the system is stable
//! - e^{At} is the identity at t = 0 and solves x' = A x
//! - the step response of the second state is (1 - e^{-8t})/8
//! - free responses are linear in the initial state
//! - a parametric mass-spring-damper analysed symbolically agrees with the
//!   bound model at several parameter values

use lti_algebra::rational::{rat, ratio};
use lti_algebra::{MPoly, RatFunc, Signal, Surd};
use lti_core::{Bindings, LtiError, Symbol};
use lti_ss::{
    EigenDecomposable, NumericStateSpace, ResponseEngine, Stability, StateSpace, StateSpaceError,
    stability_from_eigenvalues, transition_matrix,
};
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

fn scenario() -> StateSpace {
    StateSpace::from_integers(
        3,
        1,
        1,
        &[-4, -3, 0, 0, -8, 4, 0, 0, -1],
        &[0, 1, 0],
        &[0, 1, 0],
        &[0],
    )
    .unwrap()
}

#[test]
fn eigenvalues_are_exact_and_the_system_is_stable() {
    let ss = scenario();
    let eig = ss.eigenstructure().unwrap();
    assert!(eig.is_complete());
    let mut values = eig.values().to_vec();
    values.sort_by(|x, y| x.a().cmp(y.a()));
    assert_eq!(
        values,
        vec![
            Surd::rational(rat(-8)),
            Surd::rational(rat(-4)),
            Surd::rational(rat(-1))
        ]
    );
    assert!(values.iter().all(Surd::is_real));
    assert_eq!(ss.stability().unwrap(), Stability::Stable);

    let numeric = ss.to_numeric(&Bindings::new()).unwrap();
    assert_eq!(
        stability_from_eigenvalues(&numeric.numeric_eigenvalues(), 1e-9),
        Stability::Stable
    );
}

#[test]
fn transition_matrix_solves_the_homogeneous_equation() {
    let a = scenario().exact_a().unwrap();
    let phi = transition_matrix(&a, Symbol::new("t")).unwrap();
    assert!((phi.eval_real(0.0) - DMatrix::<f64>::identity(3, 3)).norm() < 1e-12);

    let a_f = a.map(|q| lti_algebra::rational::to_f64(&q));
    let h = 1e-6;
    for time in [0.2_f64, 1.0] {
        let slope = (phi.eval_real(time + h) - phi.eval_real(time - h)) / (2.0 * h);
        let expected = &a_f * phi.eval_real(time);
        assert!((slope - expected).norm() < 1e-5);
    }
}

#[test]
fn step_response_of_the_second_state() {
    let engine = ResponseEngine::new(&scenario(), Symbol::new("t"), &Bindings::new()).unwrap();
    let y = engine
        .output_forced_response(&[Signal::step(rat(1))])
        .unwrap();
    for time in [0.0_f64, 0.1, 0.5, 3.0] {
        let expected = (1.0 - (-8.0 * time).exp()) / 8.0;
        assert!((y.eval_real(time)[(0, 0)] - expected).abs() < 1e-12);
    }
    // x3 is never excited
    let x = engine.state_forced_response(&[Signal::step(rat(1))]).unwrap();
    assert!(x[(2, 0)].is_zero());
}

#[test]
fn parametric_mass_spring_damper() {
    // x1' = x2, x2' = -(k/m) x1 - (c/m) x2 + u/m, y = x1
    let ss = mass_spring_damper();

    // unbound parameters are reported by name before any analysis
    let err = ss.stability().unwrap_err();
    assert!(matches!(err, StateSpaceError::Core(LtiError::UnboundSymbol { .. })));

    let env = Bindings::new().with("m", 1.0).with("k", 4.0).with("c", 5.0);
    let engine = ResponseEngine::new(&ss, Symbol::new("t"), &env).unwrap();
    let y = engine.output_response(None, Some(&[Signal::step(rat(1))])).unwrap();
    // poles -1, -4; static gain 1/k
    assert!((y.eval_real(40.0)[(0, 0)] - 0.25).abs() < 1e-12);
    assert!(y.eval_real(0.0)[(0, 0)].abs() < 1e-12);

    let mut exact = lti_algebra::ExactBindings::new();
    exact.insert(Symbol::new("m"), rat(1));
    exact.insert(Symbol::new("k"), rat(4));
    exact.insert(Symbol::new("c"), rat(4));
    // critical damping: double pole at -2 with a single eigenvector
    let critical = ss.bind(&exact).unwrap();
    let eig = critical.eigenstructure().unwrap();
    assert!(!eig.is_complete());
    assert_eq!(eig.values(), &[Surd::rational(rat(-2)), Surd::rational(rat(-2))]);
    assert!(!critical.is_diagonalizable(false).unwrap());
    assert_eq!(critical.stability().unwrap(), Stability::Stable);
}

fn mass_spring_damper() -> StateSpace {
    let minv = RatFunc::new(MPoly::from_int(1), MPoly::symbol("m")).unwrap();
    let a = DMatrix::from_row_slice(
        2,
        2,
        &[
            RatFunc::from(0),
            RatFunc::from(1),
            -(&RatFunc::symbol("k") * &minv),
            -(&RatFunc::symbol("c") * &minv),
        ],
    );
    let b = DMatrix::from_row_slice(2, 1, &[RatFunc::from(0), minv]);
    let c = DMatrix::from_row_slice(1, 2, &[RatFunc::from(1), RatFunc::from(0)]);
    let d = DMatrix::from_element(1, 1, RatFunc::from(0));
    StateSpace::new(a, b, c, d).unwrap()
}

#[test]
fn symbolic_mass_spring_damper_matches_the_bound_model() {
    let ss = mass_spring_damper();
    let t = Symbol::new("t");

    // roots of m s^2 + c s + k
    let values = ss.symbolic_eigenvalues().unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.iter().all(|v| v.as_rational().is_none()));
    let env = Bindings::new().with("m", 1.0).with("k", 4.0).with("c", 5.0);
    let mut numeric: Vec<f64> = values.iter().map(|v| v.eval(&env).unwrap().re).collect();
    numeric.sort_by(f64::total_cmp);
    assert!((numeric[0] + 4.0).abs() < 1e-12 && (numeric[1] + 1.0).abs() < 1e-12);

    let phi = ss.symbolic_transition_matrix(t.clone()).unwrap();
    let bound_phi = transition_matrix(&ss.exact_parts(&env).unwrap().a, t.clone()).unwrap();
    let from_symbolic = phi.bind(&env).unwrap();
    for time in [0.0_f64, 0.3, 1.2] {
        assert!((phi.eval_real(time, &env).unwrap() - bound_phi.eval_real(time)).norm() < 1e-12);
        assert!((from_symbolic.eval_real(time) - bound_phi.eval_real(time)).norm() < 1e-12);
    }

    let engine = ResponseEngine::new(&ss, t.clone(), &env).unwrap();
    let step = [Signal::step(rat(1))];
    let y = ss.symbolic_output_forced_response(&step, t.clone()).unwrap();
    let y_bound = engine.output_forced_response(&step).unwrap();
    let x = ss
        .symbolic_state_free_response(&[RatFunc::from(1), RatFunc::symbol("v0")], t.clone())
        .unwrap();
    let x_bound = engine
        .state_free_response(&DVector::from_vec(vec![1.0, -2.0]))
        .unwrap();
    let with_v0 = env.clone().with("v0", -2.0);
    for time in [0.0_f64, 0.5, 2.0, 10.0] {
        let got = y.eval_real(time, &env).unwrap()[(0, 0)];
        assert!((got - y_bound.eval_real(time)[(0, 0)]).abs() < 1e-12);
        let got = x.eval_real(time, &with_v0).unwrap();
        assert!((got - x_bound.eval_real(time)).norm() < 1e-12);
    }

    // underdamped binding of the same symbolic result
    let light = Bindings::new().with("m", 2.0).with("k", 10.0).with("c", 4.0);
    let y_light = ResponseEngine::new(&ss, t.clone(), &light)
        .unwrap()
        .output_forced_response(&step)
        .unwrap();
    for time in [0.5_f64, 3.0] {
        let got = y.eval_real(time, &light).unwrap()[(0, 0)];
        assert!((got - y_light.eval_real(time)[(0, 0)]).abs() < 1e-12);
    }
    // critical damping merges the symbolic poles
    let critical = Bindings::new().with("m", 1.0).with("k", 4.0).with("c", 4.0);
    assert!(y.eval_real(1.0, &critical).is_err());

    assert_eq!(ss.stability_at(&env).unwrap(), Stability::Stable);
    let undamped = Bindings::new().with("m", 1.0).with("k", 4.0).with("c", 0.0);
    assert_eq!(ss.stability_at(&undamped).unwrap(), Stability::MarginallyStable);
    let negative = Bindings::new().with("m", 1.0).with("k", 4.0).with("c", -1.0);
    assert_eq!(ss.stability_at(&negative).unwrap(), Stability::Unstable);
    // with m and k bound the eigenvalues still depend on c
    let partial = Bindings::new().with("m", 1.0).with("k", 4.0);
    assert!(matches!(
        ss.stability_at(&partial).unwrap_err(),
        StateSpaceError::Core(LtiError::UnboundSymbol { .. })
    ));
}

#[test]
fn descriptor_models_are_rejected() {
    let ss = scenario();
    let f = Some(DMatrix::from_element(1, 1, RatFunc::constant(ratio(1, 2))));
    let err = StateSpace::with_descriptor(
        ss.a().clone(),
        ss.b().clone(),
        ss.c().clone(),
        ss.d().clone(),
        None,
        f,
    )
    .unwrap_err();
    assert_eq!(err, StateSpaceError::DescriptorUnsupported);
}

#[test]
fn numeric_models_serialize() {
    let numeric = scenario().to_numeric(&Bindings::new()).unwrap();
    let json = serde_json::to_string(&numeric).unwrap();
    let back: NumericStateSpace = serde_json::from_str(&json).unwrap();
    assert_eq!(back, numeric);
}

fn small_matrix() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-4i64..=4, 4)
}

proptest! {
    #[test]
    fn free_response_is_linear_in_the_initial_state(
        a in small_matrix(),
        x1 in prop::collection::vec(-10.0f64..10.0, 2),
        x2 in prop::collection::vec(-10.0f64..10.0, 2),
    ) {
        let ss = StateSpace::from_integers(2, 1, 1, &a, &[0, 1], &[1, 1], &[0]).unwrap();
        let engine = ResponseEngine::new(&ss, Symbol::new("t"), &Bindings::new()).unwrap();
        let x1 = DVector::from_vec(x1);
        let x2 = DVector::from_vec(x2);
        let sum = engine.state_free_response(&(&x1 + &x2)).unwrap();
        let parts = engine
            .state_free_response(&x1)
            .unwrap()
            .add(&engine.state_free_response(&x2).unwrap())
            .unwrap();
        for time in [0.0_f64, 0.25, 0.5] {
            let lhs = sum.eval_real(time);
            let rhs = parts.eval_real(time);
            let scale = 1.0 + lhs.norm().max(rhs.norm());
            prop_assert!((lhs - rhs).norm() <= 1e-9 * scale);
        }
    }
}
