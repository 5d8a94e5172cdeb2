//! The callback bridge
//!
//! `Bridge` owns nothing but a diagnostic sink and the root-finding
//! thresholds. Callbacks are borrowed per call and dropped on return.
//!
//! # Example
//!
//! ```
//! use callback_bridge::{Bridge, MemorySink};
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let bridge = Bridge::new(Arc::new(sink.clone()));
//!
//! let result = bridge.invoke_unary(&|x: f64| x * 2.0, 21.0);
//! assert_eq!(result, 42.0);
//! assert_eq!(
//!     sink.messages(),
//!     vec!["Calling callback with 21.00", "Callback returned 42.00"]
//! );
//! ```

use crate::caller::ExternCallback;
use crate::callback::{BinaryCallback, IntCallback, NullaryCallback, UnaryCallback, VoidCallback};
use crate::diagnostic::{DiagnosticEvent, DiagnosticLevel, DiagnosticSink, NullSink, StreamSink};
use crate::error::CallError;
use crate::shape::{CValue, CallShape};
use callback_config::{BridgeConfig, ColorMode};
use std::sync::Arc;
use termcolor::ColorChoice;

/// Newton-Raphson stopping thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootTolerances {
    /// `|f'(x)|` below this stops iteration at the current estimate
    pub derivative_epsilon: f64,
    /// `|x_new - x|` below this counts as converged
    pub convergence_tolerance: f64,
}

impl Default for RootTolerances {
    fn default() -> Self {
        Self {
            derivative_epsilon: callback_config::DEFAULT_DERIVATIVE_EPSILON,
            convergence_tolerance: callback_config::DEFAULT_CONVERGENCE_TOLERANCE,
        }
    }
}

/// Typed callback invocation bridge
#[derive(Clone)]
pub struct Bridge {
    sink: Arc<dyn DiagnosticSink>,
    tolerances: RootTolerances,
}

impl Bridge {
    /// Create a bridge reporting to `sink`
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            tolerances: RootTolerances::default(),
        }
    }

    /// Bridge with diagnostics discarded
    pub fn silent() -> Self {
        Self::new(Arc::new(NullSink))
    }

    /// Bridge writing to the terminal as configured
    pub fn from_config(config: &BridgeConfig) -> Self {
        let color = match config.color_mode() {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        };
        let min_level = if config.trace_enabled() {
            DiagnosticLevel::Trace
        } else {
            DiagnosticLevel::Error
        };

        Self::new(Arc::new(StreamSink::new(min_level, color))).with_tolerances(RootTolerances {
            derivative_epsilon: config.derivative_epsilon(),
            convergence_tolerance: config.convergence_tolerance(),
        })
    }

    pub fn with_tolerances(mut self, tolerances: RootTolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn tolerances(&self) -> RootTolerances {
        self.tolerances
    }

    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    /// Emit a trace event, building it only if the sink wants it
    pub(crate) fn trace(&self, event: impl FnOnce() -> DiagnosticEvent) {
        if self.sink.enabled(DiagnosticLevel::Trace) {
            self.sink.log(event());
        }
    }

    pub(crate) fn report(&self, event: DiagnosticEvent) {
        if self.sink.enabled(event.level()) {
            self.sink.log(event);
        }
    }

    /// Record a refused boundary input
    pub fn reject(&self, operation: &str, reason: impl ToString) {
        self.report(DiagnosticEvent::Rejected {
            operation: operation.to_string(),
            reason: reason.to_string(),
        });
    }

    // ===== Invocation primitives =====

    /// Call a `double → double` callback
    pub fn invoke_unary<F>(&self, callback: &F, value: f64) -> f64
    where
        F: UnaryCallback + ?Sized,
    {
        self.trace(|| DiagnosticEvent::Invoked {
            shape: CallShape::UnaryDouble,
            args: vec![CValue::Double(value)],
        });
        let result = callback.invoke(value);
        self.trace(|| DiagnosticEvent::Returned {
            shape: CallShape::UnaryDouble,
            result: CValue::Double(result),
        });
        result
    }

    /// Call a `(double, double) → double` callback
    pub fn invoke_binary<F>(&self, callback: &F, a: f64, b: f64) -> f64
    where
        F: BinaryCallback + ?Sized,
    {
        self.trace(|| DiagnosticEvent::Invoked {
            shape: CallShape::BinaryDouble,
            args: vec![CValue::Double(a), CValue::Double(b)],
        });
        let result = callback.invoke(a, b);
        self.trace(|| DiagnosticEvent::Returned {
            shape: CallShape::BinaryDouble,
            result: CValue::Double(result),
        });
        result
    }

    /// Call an `int → int` callback
    pub fn invoke_int<F>(&self, callback: &F, value: i32) -> i32
    where
        F: IntCallback + ?Sized,
    {
        self.trace(|| DiagnosticEvent::Invoked {
            shape: CallShape::UnaryInt,
            args: vec![CValue::Int(value)],
        });
        let result = callback.invoke(value);
        self.trace(|| DiagnosticEvent::Returned {
            shape: CallShape::UnaryInt,
            result: CValue::Int(result),
        });
        result
    }

    /// Call a `() → int` callback
    pub fn invoke_nullary<F>(&self, callback: &F) -> i32
    where
        F: NullaryCallback + ?Sized,
    {
        self.trace(|| DiagnosticEvent::Invoked {
            shape: CallShape::Nullary,
            args: Vec::new(),
        });
        let result = callback.invoke();
        self.trace(|| DiagnosticEvent::Returned {
            shape: CallShape::Nullary,
            result: CValue::Int(result),
        });
        result
    }

    /// Call an `int → ()` callback for its effect
    pub fn invoke_void<F>(&self, callback: &F, value: i32)
    where
        F: VoidCallback + ?Sized,
    {
        self.trace(|| DiagnosticEvent::Invoked {
            shape: CallShape::VoidUnary,
            args: vec![CValue::Int(value)],
        });
        callback.invoke(value);
        self.trace(|| DiagnosticEvent::Returned {
            shape: CallShape::VoidUnary,
            result: CValue::Void,
        });
    }

    /// Call a shape-tagged host pointer through the matching primitive
    ///
    /// Arguments are checked against the declared shape before anything runs.
    pub fn invoke_extern(
        &self,
        callback: &ExternCallback,
        args: &[CValue],
    ) -> Result<CValue, CallError> {
        callback.check_args(args)?;

        match (callback.shape(), args) {
            (CallShape::UnaryDouble, [CValue::Double(x)]) => Ok(CValue::Double(
                self.invoke_unary(&callback.as_unary()?, *x),
            )),
            (CallShape::BinaryDouble, [CValue::Double(a), CValue::Double(b)]) => Ok(
                CValue::Double(self.invoke_binary(&callback.as_binary()?, *a, *b)),
            ),
            (CallShape::UnaryInt, [CValue::Int(x)]) => {
                Ok(CValue::Int(self.invoke_int(&callback.as_int()?, *x)))
            }
            (CallShape::Nullary, []) => Ok(CValue::Int(self.invoke_nullary(&callback.as_nullary()?))),
            (CallShape::VoidUnary, [CValue::Int(x)]) => {
                self.invoke_void(&callback.as_void()?, *x);
                Ok(CValue::Void)
            }
            _ => unreachable!("arguments already checked against {}", callback.shape()),
        }
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("tolerances", &self.tolerances)
            .finish_non_exhaustive()
    }
}
