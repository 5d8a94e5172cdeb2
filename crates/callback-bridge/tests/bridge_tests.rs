//! Bridge behavior tests
//!
//! Invocation primitives, numerical algorithms and validation, driven both by
//! Rust closures and by C-ABI function pointers.

use callback_bridge::{
    BinaryCallbackFn, Bridge, BridgeError, CValue, CallError, CallShape, DiagnosticEvent,
    DiagnosticSink, DoubleCallbackFn, ExternCallback, IntCallbackFn, MemorySink,
    RootTermination, RootTolerances, INVALID_RESULT_SENTINEL,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use std::cell::RefCell;
use std::os::raw::{c_double, c_int};
use std::sync::Arc;

fn traced() -> (Bridge, MemorySink) {
    let sink = MemorySink::new();
    (Bridge::new(Arc::new(sink.clone())), sink)
}

extern "C" fn double_it(x: c_double) -> c_double {
    x * 2.0
}

extern "C" fn add(a: c_double, b: c_double) -> c_double {
    a + b
}

extern "C" fn identity(i: c_int) -> c_int {
    i
}

extern "C" fn square(x: c_double) -> c_double {
    x * x
}

extern "C" fn twice(x: c_double) -> c_double {
    2.0 * x
}

// ===== Invocation Primitives =====

#[test]
fn test_reference_self_test_expectations() {
    let bridge = Bridge::silent();
    assert_eq!(bridge.invoke_binary(&(add as BinaryCallbackFn), 15.0, 27.0), 42.0);
    assert_eq!(bridge.invoke_unary(&(double_it as DoubleCallbackFn), 21.0), 42.0);
}

#[test]
fn test_trace_sequence_across_primitives() {
    let (bridge, sink) = traced();

    bridge.invoke_unary(&(double_it as DoubleCallbackFn), 21.0);
    bridge.invoke_binary(&(add as BinaryCallbackFn), 15.0, 27.0);
    bridge.invoke_int(&(identity as IntCallbackFn), 7);
    bridge.invoke_nullary(&|| 1);
    bridge.invoke_void(&|_x: i32| {}, 9);

    assert_eq!(
        sink.messages(),
        vec![
            "Calling callback with 21.00",
            "Callback returned 42.00",
            "Calling callback with 15.00 and 27.00",
            "Callback returned 42.00",
            "Calling callback with 7",
            "Callback returned 7",
            "Calling simple callback",
            "Callback returned 1",
            "Calling void callback with 9",
            "Void callback completed",
        ]
    );
}

#[test]
fn test_primitives_do_not_validate() {
    let bridge = Bridge::silent();
    assert!(bridge.invoke_unary(&|_x: f64| f64::NAN, 0.0).is_nan());
    assert_eq!(
        bridge.invoke_binary(&|a: f64, b: f64| a / b, 1.0, 0.0),
        f64::INFINITY
    );
}

#[test]
fn test_tracing_does_not_change_results() {
    let (traced_bridge, _sink) = traced();
    let silent = Bridge::silent();
    for v in [-3.5, 0.0, 1e300, f64::MIN_POSITIVE] {
        assert_eq!(
            traced_bridge.invoke_unary(&(square as DoubleCallbackFn), v).to_bits(),
            silent.invoke_unary(&(square as DoubleCallbackFn), v).to_bits()
        );
    }
}

// ===== Checked Adapter =====

#[test]
fn test_extern_callback_through_bridge() {
    let (bridge, sink) = traced();
    let cb = ExternCallback::from_binary(add);

    let result = bridge
        .invoke_extern(&cb, &[CValue::Double(15.0), CValue::Double(27.0)])
        .unwrap();

    assert_eq!(result, CValue::Double(42.0));
    assert_eq!(sink.messages()[1], "Callback returned 42.00");
}

#[test]
fn test_extern_callback_wrong_shape_rejected_before_call() {
    let (bridge, sink) = traced();
    let cb = ExternCallback::from_binary(add);

    assert_eq!(
        cb.as_unary().unwrap_err(),
        CallError::ShapeMismatch {
            expected: CallShape::UnaryDouble,
            actual: CallShape::BinaryDouble,
        }
    );
    let err = bridge
        .invoke_extern(&cb, &[CValue::Int(1), CValue::Int(2)])
        .unwrap_err();
    assert!(matches!(err, CallError::ArgumentMismatch { index: 0, .. }));
    assert!(sink.entries().is_empty());
}

#[test]
fn test_extern_void_callback() {
    let bridge = Bridge::silent();
    extern "C" fn ignore(_x: c_int) {}
    let cb = ExternCallback::from_void(ignore);
    assert_eq!(bridge.invoke_extern(&cb, &[CValue::Int(5)]).unwrap(), CValue::Void);
}

// ===== Array Mapping =====

#[test]
fn test_map_array_empty_is_noop() {
    let bridge = Bridge::silent();
    let calls = RefCell::new(0);
    let mut values: [f64; 0] = [];
    bridge.map_array(
        &|x: f64| {
            *calls.borrow_mut() += 1;
            x
        },
        &mut values,
    );
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_map_array_visits_in_ascending_order() {
    let bridge = Bridge::silent();
    let visited = RefCell::new(Vec::new());
    let mut values = vec![5.0, -1.0, 3.0, 3.0];

    bridge.map_array(
        &|x: f64| {
            visited.borrow_mut().push(x);
            x + 1.0
        },
        &mut values,
    );

    assert_eq!(*visited.borrow(), vec![5.0, -1.0, 3.0, 3.0]);
    assert_eq!(values, vec![6.0, 0.0, 4.0, 4.0]);
}

// ===== Integration =====

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
#[case(100)]
fn test_integrate_empty_interval_is_zero(#[case] steps: i32) {
    let bridge = Bridge::silent();
    assert_eq!(bridge.integrate(&(square as DoubleCallbackFn), 2.5, 2.5, steps).unwrap(), 0.0);
}

#[rstest]
#[case(1.0)]
#[case(-4.25)]
#[case(3.0)]
#[case(0.0)]
fn test_integrate_constant(#[case] c: f64) {
    let bridge = Bridge::silent();
    let result = bridge.integrate(&|_x: f64| c, 0.0, 1.0, 10).unwrap();
    assert!((result - c).abs() < 1e-12, "got {}", result);
}

#[test]
fn test_integrate_single_trapezoid() {
    let bridge = Bridge::silent();
    // (f(1) + f(3)) / 2 * 2 = (1 + 9)
    assert_eq!(bridge.integrate(&(square as DoubleCallbackFn), 1.0, 3.0, 1).unwrap(), 10.0);
}

#[test]
fn test_integrate_square_converges() {
    let bridge = Bridge::silent();
    let result = bridge.integrate(&(square as DoubleCallbackFn), 0.0, 1.0, 1000).unwrap();
    assert!((result - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_integrate_matches_reference_accumulation() {
    let bridge = Bridge::silent();
    let (a, b, steps) = (0.1, 2.7, 13);

    let h = (b - a) / steps as f64;
    let mut sum = (square(a) + square(b)) / 2.0;
    for i in 1..steps {
        sum += square(a + i as f64 * h);
    }

    let result = bridge.integrate(&(square as DoubleCallbackFn), a, b, steps).unwrap();
    assert_eq!(result.to_bits(), (sum * h).to_bits());
}

#[rstest]
#[case(0)]
#[case(-1)]
#[case(i32::MIN)]
fn test_integrate_rejects_non_positive_steps(#[case] steps: i32) {
    let (bridge, sink) = traced();
    assert_eq!(
        bridge.integrate(&(square as DoubleCallbackFn), 0.0, 1.0, steps),
        Err(BridgeError::InvalidSteps(steps))
    );
    assert!(matches!(
        sink.events().as_slice(),
        [DiagnosticEvent::Rejected { operation, .. }] if operation == "integrate"
    ));
}

// ===== Root Finding =====

#[test]
fn test_find_root_linear() {
    let bridge = Bridge::silent();
    let root = bridge.find_root(&|x: f64| x - 42.0, &|_x: f64| 1.0, 0.0, 10);
    assert!((root - 42.0).abs() < 1e-9);
}

#[test]
fn test_find_root_zero_iterations_returns_guess() {
    let bridge = Bridge::silent();
    let calls = RefCell::new(0);
    let f = |x: f64| {
        *calls.borrow_mut() += 1;
        x - 42.0
    };
    assert_eq!(bridge.find_root(&f, &|_x: f64| 1.0, 3.25, 0), 3.25);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_find_root_sqrt_two() {
    let bridge = Bridge::silent();
    let f = |x: f64| x * x - 2.0;
    let report = bridge.find_root_report(&f, &(twice as DoubleCallbackFn), 1.0, 50);
    assert_eq!(report.termination, RootTermination::Converged);
    assert!((report.root - std::f64::consts::SQRT_2).abs() < 1e-12);
}

#[test]
fn test_find_root_flat_derivative_stops_silently() {
    let bridge = Bridge::silent();
    // f'(0) = 0 for x^2 at the starting point
    let report = bridge.find_root_report(&(square as DoubleCallbackFn), &(twice as DoubleCallbackFn), 0.0, 10);
    assert_eq!(report.termination, RootTermination::FlatDerivative);
    assert_eq!(report.root, 0.0);
}

#[test]
fn test_find_root_iteration_limit_returns_last_estimate() {
    let bridge = Bridge::silent();
    // x^2 + 1 has no real root; Newton wanders without converging
    let f = |x: f64| x * x + 1.0;
    let report = bridge.find_root_report(&f, &(twice as DoubleCallbackFn), 0.5, 3);
    assert_eq!(report.termination, RootTermination::IterationLimit);
    assert_eq!(report.iterations, 3);
    assert!(report.root.is_finite());
}

#[test]
fn test_find_root_respects_configured_tolerances() {
    let loose = Bridge::silent().with_tolerances(RootTolerances {
        derivative_epsilon: 1e-10,
        convergence_tolerance: 1.0,
    });
    let strict = Bridge::silent();
    let f = |x: f64| x * x - 2.0;

    let loose_report = loose.find_root_report(&f, &(twice as DoubleCallbackFn), 1.0, 50);
    let strict_report = strict.find_root_report(&f, &(twice as DoubleCallbackFn), 1.0, 50);

    assert!(loose_report.iterations < strict_report.iterations);
}

// ===== Summation =====

#[test]
fn test_sum_identity() {
    let bridge = Bridge::silent();
    assert_eq!(bridge.sum_callback_results(&(identity as IntCallbackFn), 5), 10.0);
}

#[rstest]
#[case(0)]
#[case(-5)]
fn test_sum_non_positive_count(#[case] count: i32) {
    let bridge = Bridge::silent();
    let calls = RefCell::new(0);
    let cb = |i: i32| {
        *calls.borrow_mut() += 1;
        i
    };
    assert_eq!(bridge.sum_callback_results(&cb, count), 0.0);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_sum_widens_before_accumulating() {
    let bridge = Bridge::silent();
    // Two i32::MAX results would overflow an int accumulator
    let sum = bridge.sum_callback_results(&|_i: i32| i32::MAX, 2);
    assert_eq!(sum, 2.0 * i32::MAX as f64);
}

// ===== Validation =====

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
#[case(f64::NEG_INFINITY)]
fn test_validation_substitutes_sentinel(#[case] bad: f64) {
    let (bridge, sink) = traced();
    assert_eq!(bridge.call_with_validation(&|_x: f64| bad, 1.0), INVALID_RESULT_SENTINEL);
    assert_eq!(sink.entries().len(), 1);
    assert!(sink.messages()[0].starts_with("Callback returned invalid result"));
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(42.5)]
#[case(f64::MAX)]
fn test_validation_passes_finite(#[case] v: f64) {
    let (bridge, sink) = traced();
    assert_eq!(bridge.call_with_validation(&|_x: f64| v, 1.0), v);
    assert!(sink.entries().is_empty());
}

#[test]
fn test_try_validation_reports_error() {
    let bridge = Bridge::silent();
    let f: DoubleCallbackFn = double_it;
    assert_eq!(bridge.try_call_with_validation(&f, 2.0), Ok(4.0));
    assert_eq!(
        bridge.try_call_with_validation(&|_x: f64| f64::INFINITY, 2.0),
        Err(BridgeError::InvalidResult(f64::INFINITY))
    );
}

// ===== Properties =====

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, .. ProptestConfig::default()
    })]

    #[test]
    fn prop_invoke_unary_is_pass_through(v in -1e12f64..1e12) {
        let bridge = Bridge::silent();
        let f = |x: f64| x.sin() * x + 0.5;
        prop_assert_eq!(bridge.invoke_unary(&f, v).to_bits(), f(v).to_bits());
    }

    #[test]
    fn prop_map_array_matches_elementwise(values in prop::collection::vec(-1e6f64..1e6, 0..64)) {
        let bridge = Bridge::silent();
        let f = |x: f64| 3.0 * x - 1.0;
        let mut mapped = values.clone();
        bridge.map_array(&f, &mut mapped);

        prop_assert_eq!(mapped.len(), values.len());
        for (out, original) in mapped.iter().zip(&values) {
            prop_assert_eq!(out.to_bits(), f(*original).to_bits());
        }
    }

    #[test]
    fn prop_trapezoid_exact_for_linear(a in -100.0f64..100.0, b in -100.0f64..100.0, steps in 1i32..200) {
        let bridge = Bridge::silent();
        let result = bridge.integrate(&(twice as DoubleCallbackFn), a, b, steps).unwrap();
        let exact = b * b - a * a;
        let scale = 1.0 + a * a + b * b;
        prop_assert!((result - exact).abs() <= 1e-9 * scale, "result={result}, exact={exact}");
    }

    #[test]
    fn prop_sum_matches_closed_form(count in 0i32..500) {
        let bridge = Bridge::silent();
        let expected = f64::from(count) * f64::from(count.max(1) - 1) / 2.0;
        prop_assert_eq!(bridge.sum_callback_results(&(identity as IntCallbackFn), count), expected);
    }
}
