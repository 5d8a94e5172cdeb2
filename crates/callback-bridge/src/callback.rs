//! Callback traits - one per call shape
//!
//! A callback is a borrowed capability: the bridge receives `&F` for the
//! duration of one operation and never stores it. Each shape has its own
//! trait, so a binary callback cannot be passed where a unary one is expected.
//!
//! Every trait is implemented for any matching Rust closure and for the
//! matching C function pointer type below. Function items declared
//! `extern "C"` are passed as pointers: `&(f as DoubleCallbackFn)`.

use std::os::raw::{c_double, c_int};

/// `double (*)(double)`
pub type DoubleCallbackFn = extern "C" fn(c_double) -> c_double;

/// `double (*)(double, double)`
pub type BinaryCallbackFn = extern "C" fn(c_double, c_double) -> c_double;

/// `int (*)(int)`
pub type IntCallbackFn = extern "C" fn(c_int) -> c_int;

/// `int (*)(void)`
pub type SimpleCallbackFn = extern "C" fn() -> c_int;

/// `void (*)(int)`
pub type VoidCallbackFn = extern "C" fn(c_int);

/// `double → double`
pub trait UnaryCallback {
    fn invoke(&self, value: f64) -> f64;
}

impl<F> UnaryCallback for F
where
    F: Fn(f64) -> f64,
{
    fn invoke(&self, value: f64) -> f64 {
        self(value)
    }
}

impl UnaryCallback for DoubleCallbackFn {
    fn invoke(&self, value: f64) -> f64 {
        self(value)
    }
}

/// `(double, double) → double`
pub trait BinaryCallback {
    fn invoke(&self, a: f64, b: f64) -> f64;
}

impl<F> BinaryCallback for F
where
    F: Fn(f64, f64) -> f64,
{
    fn invoke(&self, a: f64, b: f64) -> f64 {
        self(a, b)
    }
}

impl BinaryCallback for BinaryCallbackFn {
    fn invoke(&self, a: f64, b: f64) -> f64 {
        self(a, b)
    }
}

/// `int → int`
pub trait IntCallback {
    fn invoke(&self, value: i32) -> i32;
}

impl<F> IntCallback for F
where
    F: Fn(i32) -> i32,
{
    fn invoke(&self, value: i32) -> i32 {
        self(value)
    }
}

impl IntCallback for IntCallbackFn {
    fn invoke(&self, value: i32) -> i32 {
        self(value)
    }
}

/// `() → int`
pub trait NullaryCallback {
    fn invoke(&self) -> i32;
}

impl<F> NullaryCallback for F
where
    F: Fn() -> i32,
{
    fn invoke(&self) -> i32 {
        self()
    }
}

impl NullaryCallback for SimpleCallbackFn {
    fn invoke(&self) -> i32 {
        self()
    }
}

/// `int → ()`
pub trait VoidCallback {
    fn invoke(&self, value: i32);
}

impl<F> VoidCallback for F
where
    F: Fn(i32),
{
    fn invoke(&self, value: i32) {
        self(value)
    }
}

impl VoidCallback for VoidCallbackFn {
    fn invoke(&self, value: i32) {
        self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    extern "C" fn c_triple(x: c_double) -> c_double {
        x * 3.0
    }

    extern "C" fn c_sub(a: c_double, b: c_double) -> c_double {
        a - b
    }

    #[test]
    fn test_c_function_pointer_is_unary_callback() {
        let f: DoubleCallbackFn = c_triple;
        assert_eq!(UnaryCallback::invoke(&f, 2.0), 6.0);
    }

    #[test]
    fn test_c_function_pointer_is_binary_callback() {
        let f: BinaryCallbackFn = c_sub;
        assert_eq!(BinaryCallback::invoke(&f, 5.0, 2.0), 3.0);
    }

    #[test]
    fn test_closures_implement_each_shape() {
        let offset = 10;
        let int_cb = |x: i32| x + offset;
        let nullary = || 7;
        let seen = Cell::new(0);
        let void_cb = |x: i32| seen.set(x);

        assert_eq!(IntCallback::invoke(&int_cb, 5), 15);
        assert_eq!(NullaryCallback::invoke(&nullary), 7);
        VoidCallback::invoke(&void_cb, 99);
        assert_eq!(seen.get(), 99);
    }

    #[test]
    fn test_c_int_pointers_implement_int_shapes() {
        extern "C" fn c_inc(x: c_int) -> c_int {
            x + 1
        }
        extern "C" fn c_seven() -> c_int {
            7
        }
        extern "C" fn c_ignore(_x: c_int) {}

        let int_cb: IntCallbackFn = c_inc;
        let nullary: SimpleCallbackFn = c_seven;
        let void_cb: VoidCallbackFn = c_ignore;

        assert_eq!(IntCallback::invoke(&int_cb, 41), 42);
        assert_eq!(NullaryCallback::invoke(&nullary), 7);
        VoidCallback::invoke(&void_cb, 1);
    }

    #[test]
    fn test_trait_objects() {
        let unary: &dyn UnaryCallback = &|x: f64| x + 1.0;
        assert_eq!(unary.invoke(1.0), 2.0);

        let pointer: &dyn UnaryCallback = &(c_triple as DoubleCallbackFn);
        assert_eq!(pointer.invoke(2.0), 6.0);
    }
}
