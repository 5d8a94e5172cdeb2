//! Result validation for unary callbacks
//!
//! `call_with_validation` keeps the C library's contract: NaN or infinity
//! becomes [`INVALID_RESULT_SENTINEL`]. A callback that genuinely returns
//! `-1.0` is indistinguishable from a failed one through that entry point;
//! `try_call_with_validation` reports the failure as an error instead.

use crate::bridge::Bridge;
use crate::callback::UnaryCallback;
use crate::diagnostic::DiagnosticEvent;
use crate::error::BridgeError;

/// Value substituted for NaN or infinite callback results
pub const INVALID_RESULT_SENTINEL: f64 = -1.0;

impl Bridge {
    /// Invoke `callback`, substituting the sentinel for non-finite results
    pub fn call_with_validation<F>(&self, callback: &F, value: f64) -> f64
    where
        F: UnaryCallback + ?Sized,
    {
        self.try_call_with_validation(callback, value)
            .unwrap_or(INVALID_RESULT_SENTINEL)
    }

    /// Invoke `callback`, returning `InvalidResult` for non-finite results
    pub fn try_call_with_validation<F>(&self, callback: &F, value: f64) -> Result<f64, BridgeError>
    where
        F: UnaryCallback + ?Sized,
    {
        let result = callback.invoke(value);

        if result.is_finite() {
            Ok(result)
        } else {
            self.report(DiagnosticEvent::InvalidResult { value: result });
            Err(BridgeError::InvalidResult(result))
        }
    }
}
