//! Built-in host functions
//!
//! Real `extern "C"` functions the CLI hands to the bridge, so every command
//! exercises the same pointer path a C host would use.

use anyhow::{anyhow, Result};
use callback_bridge::{CallShape, DoubleCallbackFn, ExternCallback};
use std::os::raw::{c_double, c_int};

/// A named host function with its declared shape
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub summary: &'static str,
    pub callback: ExternCallback,
    /// Derivative used by `root` when none is given explicitly
    pub derivative: Option<DoubleCallbackFn>,
}

impl Builtin {
    fn unary(
        name: &'static str,
        summary: &'static str,
        f: DoubleCallbackFn,
        derivative: Option<DoubleCallbackFn>,
    ) -> Self {
        Self {
            name,
            summary,
            callback: ExternCallback::from_unary(f),
            derivative,
        }
    }

    fn other(name: &'static str, summary: &'static str, callback: ExternCallback) -> Self {
        Self {
            name,
            summary,
            callback,
            derivative: None,
        }
    }

    pub fn shape(&self) -> CallShape {
        self.callback.shape()
    }
}

extern "C" fn identity(x: c_double) -> c_double {
    x
}

extern "C" fn one(_x: c_double) -> c_double {
    1.0
}

extern "C" fn two(_x: c_double) -> c_double {
    2.0
}

extern "C" fn minus_one(_x: c_double) -> c_double {
    -1.0
}

extern "C" fn double(x: c_double) -> c_double {
    x * 2.0
}

extern "C" fn square(x: c_double) -> c_double {
    x * x
}

extern "C" fn square_minus_two(x: c_double) -> c_double {
    x * x - 2.0
}

extern "C" fn negate(x: c_double) -> c_double {
    -x
}

extern "C" fn reciprocal(x: c_double) -> c_double {
    1.0 / x
}

extern "C" fn sqrt(x: c_double) -> c_double {
    x.sqrt()
}

extern "C" fn sin(x: c_double) -> c_double {
    x.sin()
}

extern "C" fn cos(x: c_double) -> c_double {
    x.cos()
}

extern "C" fn neg_sin(x: c_double) -> c_double {
    -x.sin()
}

extern "C" fn exp(x: c_double) -> c_double {
    x.exp()
}

extern "C" fn nan(_x: c_double) -> c_double {
    f64::NAN
}

extern "C" fn add(a: c_double, b: c_double) -> c_double {
    a + b
}

extern "C" fn mul(a: c_double, b: c_double) -> c_double {
    a * b
}

extern "C" fn int_identity(i: c_int) -> c_int {
    i
}

extern "C" fn int_square(i: c_int) -> c_int {
    i.wrapping_mul(i)
}

extern "C" fn answer() -> c_int {
    42
}

// Stderr, so `--json` output on stdout stays parseable
extern "C" fn print_int(i: c_int) {
    eprintln!("{}", i);
}

/// All built-in functions, in listing order
pub fn registry() -> Vec<Builtin> {
    vec![
        Builtin::unary("identity", "x", identity, Some(one)),
        Builtin::unary("one", "1", one, None),
        Builtin::unary("two", "2", two, None),
        Builtin::unary("double", "2x", double, Some(two)),
        Builtin::unary("square", "x^2", square, Some(double)),
        Builtin::unary("square_minus_two", "x^2 - 2", square_minus_two, Some(double)),
        Builtin::unary("negate", "-x", negate, Some(minus_one)),
        Builtin::unary("reciprocal", "1/x", reciprocal, None),
        Builtin::unary("sqrt", "square root of x", sqrt, None),
        Builtin::unary("sin", "sin(x)", sin, Some(cos)),
        Builtin::unary("cos", "cos(x)", cos, Some(neg_sin)),
        Builtin::unary("neg_sin", "-sin(x)", neg_sin, None),
        Builtin::unary("exp", "e^x", exp, Some(exp)),
        Builtin::unary("nan", "always NaN", nan, None),
        Builtin::other("add", "a + b", ExternCallback::from_binary(add)),
        Builtin::other("mul", "a * b", ExternCallback::from_binary(mul)),
        Builtin::other("int_identity", "i", ExternCallback::from_int(int_identity)),
        Builtin::other("int_square", "i^2", ExternCallback::from_int(int_square)),
        Builtin::other("answer", "42", ExternCallback::from_nullary(answer)),
        Builtin::other(
            "print_int",
            "print i to stderr",
            ExternCallback::from_void(print_int),
        ),
    ]
}

/// Find a built-in by name
pub fn lookup(name: &str) -> Result<Builtin> {
    registry()
        .into_iter()
        .find(|builtin| builtin.name == name)
        .ok_or_else(|| {
            anyhow!(
                "Unknown function '{}'. Run 'callback-bridge functions' to list built-ins",
                name
            )
        })
}
