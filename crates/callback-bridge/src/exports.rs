//! C ABI surface
//!
//! Unmangled entry points with the same names and signatures as the C
//! callback library, so an Atlas `extern` block (or any C host) can link
//! against the `cdylib` unchanged.
//!
//! Callback parameters are nullable function pointers. Input the C library
//! left undefined is refused here with a diagnostic instead:
//! - null callback: `NaN` for double returns, `0` for int returns
//! - null array with a positive length: no-op
//! - `steps <= 0` for `integrate`: `NaN`

use crate::bridge::Bridge;
use crate::callback::{
    BinaryCallbackFn, DoubleCallbackFn, IntCallbackFn, SimpleCallbackFn, VoidCallbackFn,
};
use crate::error::CallError;
use crate::safety::buffer_from_raw;
use crate::selftest::run_self_test;
use callback_config::{BridgeConfig, ConfigError, ConfigLoader, ConfigResult};
use std::os::raw::{c_double, c_int};
use std::sync::OnceLock;

static SHARED_BRIDGE: OnceLock<Bridge> = OnceLock::new();

/// Bridge used by the exported functions, configured on first use
///
/// Configuration is discovered from the current directory. A configuration
/// error falls back to defaults and is reported once through the bridge.
pub fn shared_bridge() -> &'static Bridge {
    SHARED_BRIDGE.get_or_init(|| {
        let loaded = std::env::current_dir()
            .map_err(ConfigError::from)
            .and_then(|dir| ConfigLoader::new().load_from_directory(&dir));
        configured_bridge(loaded, Bridge::from_config)
    })
}

/// Build a bridge from a load result, reporting a failed load on the bridge itself
fn configured_bridge(
    loaded: ConfigResult<BridgeConfig>,
    build: impl FnOnce(&BridgeConfig) -> Bridge,
) -> Bridge {
    match loaded {
        Ok(config) => build(&config),
        Err(err) => {
            let bridge = build(&BridgeConfig::default());
            bridge.reject("config", err);
            bridge
        }
    }
}

/// Unwrap a nullable callback, reporting the rejection if it is null
fn require<T>(bridge: &Bridge, operation: &str, callback: Option<T>) -> Option<T> {
    if callback.is_none() {
        bridge.reject(operation, CallError::NullCallback);
    }
    callback
}

// ===== Simple Callback Functions =====

/// Call a callback with a single double argument
#[no_mangle]
pub extern "C" fn call_with_double(callback: Option<DoubleCallbackFn>, value: c_double) -> c_double {
    let bridge = shared_bridge();
    match require(bridge, "call_with_double", callback) {
        Some(callback) => bridge.invoke_unary(&callback, value),
        None => f64::NAN,
    }
}

/// Call a binary callback with two arguments
#[no_mangle]
pub extern "C" fn call_with_two_doubles(
    callback: Option<BinaryCallbackFn>,
    a: c_double,
    b: c_double,
) -> c_double {
    let bridge = shared_bridge();
    match require(bridge, "call_with_two_doubles", callback) {
        Some(callback) => bridge.invoke_binary(&callback, a, b),
        None => f64::NAN,
    }
}

/// Call an integer callback
#[no_mangle]
pub extern "C" fn call_with_int(callback: Option<IntCallbackFn>, value: c_int) -> c_int {
    let bridge = shared_bridge();
    match require(bridge, "call_with_int", callback) {
        Some(callback) => bridge.invoke_int(&callback, value),
        None => 0,
    }
}

/// Call a simple callback with no arguments
#[no_mangle]
pub extern "C" fn call_simple(callback: Option<SimpleCallbackFn>) -> c_int {
    let bridge = shared_bridge();
    match require(bridge, "call_simple", callback) {
        Some(callback) => bridge.invoke_nullary(&callback),
        None => 0,
    }
}

/// Call a void callback
#[no_mangle]
pub extern "C" fn call_void_callback(callback: Option<VoidCallbackFn>, value: c_int) {
    let bridge = shared_bridge();
    if let Some(callback) = require(bridge, "call_void_callback", callback) {
        bridge.invoke_void(&callback, value);
    }
}

// ===== Advanced Callback Functions =====

/// Apply a callback to each element of an array, in place
///
/// # Safety
///
/// When `length > 0`, `array` must point to `length` doubles that nothing
/// else accesses for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn map_array(
    callback: Option<DoubleCallbackFn>,
    array: *mut c_double,
    length: c_int,
) {
    let bridge = shared_bridge();
    let Some(callback) = require(bridge, "map_array", callback) else {
        return;
    };

    match buffer_from_raw(array, length) {
        Ok(values) => bridge.map_array(&callback, values),
        Err(reason) => bridge.reject("map_array", reason),
    }
}

/// Trapezoidal integration of `function` over `[a, b]`
#[no_mangle]
pub extern "C" fn integrate(
    function: Option<DoubleCallbackFn>,
    a: c_double,
    b: c_double,
    steps: c_int,
) -> c_double {
    let bridge = shared_bridge();
    match require(bridge, "integrate", function) {
        // The bridge reports the rejection itself
        Some(function) => bridge.integrate(&function, a, b, steps).unwrap_or(f64::NAN),
        None => f64::NAN,
    }
}

/// Newton-Raphson root of `f`, given its derivative `df`
#[no_mangle]
pub extern "C" fn find_root(
    f: Option<DoubleCallbackFn>,
    df: Option<DoubleCallbackFn>,
    x0: c_double,
    max_iter: c_int,
) -> c_double {
    let bridge = shared_bridge();
    let f = require(bridge, "find_root", f);
    let df = require(bridge, "find_root", df);
    match (f, df) {
        (Some(f), Some(df)) => bridge.find_root(&f, &df, x0, max_iter),
        _ => f64::NAN,
    }
}

/// Call a callback for `0..count` and sum the results
#[no_mangle]
pub extern "C" fn sum_callback_results(callback: Option<IntCallbackFn>, count: c_int) -> c_double {
    let bridge = shared_bridge();
    match require(bridge, "sum_callback_results", callback) {
        Some(callback) => bridge.sum_callback_results(&callback, count),
        None => f64::NAN,
    }
}

// ===== Error Handling =====

/// Call a callback, returning -1 if it produces NaN or infinity
#[no_mangle]
pub extern "C" fn call_with_validation(
    callback: Option<DoubleCallbackFn>,
    value: c_double,
) -> c_double {
    let bridge = shared_bridge();
    match require(bridge, "call_with_validation", callback) {
        Some(callback) => bridge.call_with_validation(&callback, value),
        None => f64::NAN,
    }
}

// ===== Test Helper Functions =====

/// Test function that multiplies by 2
#[no_mangle]
pub extern "C" fn test_double_function(x: c_double) -> c_double {
    x * 2.0
}

/// Test function that adds two numbers
#[no_mangle]
pub extern "C" fn test_add_function(a: c_double, b: c_double) -> c_double {
    a + b
}

/// Self-test: verify the library works
#[no_mangle]
pub extern "C" fn self_test() {
    println!("=== Callback Library Self-Test ===");
    let report = run_self_test(shared_bridge());
    print!("{}", report);
    println!("Self-test completed\n");
}
