//! Callback Bridge - typed invocation of host callbacks
//!
//! Lets a host embedding language (Atlas, or any C caller) hand native code
//! function pointers and have them driven through:
//! - Five typed invocation primitives, one per call shape
//! - Array mapping, trapezoidal integration, Newton-Raphson root finding,
//!   repeated-call summation and a result-validating wrapper
//! - A C ABI surface (`exports`) matching the C callback library
//!
//! # Safety
//!
//! Raw pointers only enter through `exports`, `ExternCallback::new` and
//! `safety::buffer_from_raw`. Everything above them works on borrowed,
//! typed callbacks.

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bridge;
pub mod callback;
pub mod caller;
pub mod diagnostic;
pub mod error;
pub mod exports;
pub mod numeric;
pub mod safety;
pub mod selftest;
pub mod shape;
pub mod validation;

pub use bridge::{Bridge, RootTolerances};
pub use callback::{
    BinaryCallback, BinaryCallbackFn, DoubleCallbackFn, IntCallback, IntCallbackFn,
    NullaryCallback, SimpleCallbackFn, UnaryCallback, VoidCallback, VoidCallbackFn,
};
pub use caller::ExternCallback;
pub use diagnostic::{
    DiagnosticEntry, DiagnosticEvent, DiagnosticLevel, DiagnosticSink, MemorySink, NullSink,
    StreamSink,
};
pub use error::{BridgeError, CallError};
pub use numeric::{RootReport, RootTermination};
pub use selftest::{run_self_test, SelfTestCase, SelfTestReport};
pub use shape::{CValue, CallShape, ExternType};
pub use validation::INVALID_RESULT_SENTINEL;
