//! Numerical algorithms driven by host callbacks
//!
//! All algorithms call their callbacks directly and in a fixed order so that
//! floating-point results are reproducible. Only `map_array` emits a trace
//! line; per-sample tracing would flood the stream.

use crate::bridge::Bridge;
use crate::callback::{IntCallback, UnaryCallback};
use crate::diagnostic::DiagnosticEvent;
use crate::error::BridgeError;
use serde::Serialize;

/// Why Newton-Raphson iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootTermination {
    /// Step size fell below the convergence tolerance
    Converged,
    /// Derivative magnitude fell below the derivative epsilon
    FlatDerivative,
    /// Iteration budget exhausted
    IterationLimit,
}

/// Outcome of a Newton-Raphson run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootReport {
    /// Best estimate of the root
    pub root: f64,
    /// Iterations performed, including the one that stopped the loop
    pub iterations: u32,
    pub termination: RootTermination,
}

impl Bridge {
    /// Replace every element with `callback(element)`, in ascending index order
    pub fn map_array<F>(&self, callback: &F, values: &mut [f64])
    where
        F: UnaryCallback + ?Sized,
    {
        self.trace(|| DiagnosticEvent::MapStarted {
            length: values.len(),
        });
        for value in values.iter_mut() {
            *value = callback.invoke(*value);
        }
    }

    /// Composite trapezoidal approximation of the integral of `function` over `[a, b]`
    ///
    /// Samples are accumulated left to right: endpoints first, then
    /// `a + i*h` for `i = 1..steps`. `steps` must be at least 1.
    pub fn integrate<F>(&self, function: &F, a: f64, b: f64, steps: i32) -> Result<f64, BridgeError>
    where
        F: UnaryCallback + ?Sized,
    {
        if steps <= 0 {
            let err = BridgeError::InvalidSteps(steps);
            self.reject("integrate", &err);
            return Err(err);
        }

        let h = (b - a) / f64::from(steps);
        let mut sum = (function.invoke(a) + function.invoke(b)) / 2.0;

        for i in 1..steps {
            let x = a + f64::from(i) * h;
            sum += function.invoke(x);
        }

        Ok(sum * h)
    }

    /// Newton-Raphson root of `f` starting at `x0`
    ///
    /// Never signals non-convergence; see [`Bridge::find_root_report`].
    pub fn find_root<F, D>(&self, f: &F, df: &D, x0: f64, max_iter: i32) -> f64
    where
        F: UnaryCallback + ?Sized,
        D: UnaryCallback + ?Sized,
    {
        self.find_root_report(f, df, x0, max_iter).root
    }

    /// Newton-Raphson with the reason iteration stopped
    pub fn find_root_report<F, D>(&self, f: &F, df: &D, x0: f64, max_iter: i32) -> RootReport
    where
        F: UnaryCallback + ?Sized,
        D: UnaryCallback + ?Sized,
    {
        let tolerances = self.tolerances();
        let budget = u32::try_from(max_iter).unwrap_or(0);
        let mut x = x0;

        for iteration in 1..=budget {
            let fx = f.invoke(x);
            let dfx = df.invoke(x);

            if dfx.abs() < tolerances.derivative_epsilon {
                return RootReport {
                    root: x,
                    iterations: iteration,
                    termination: RootTermination::FlatDerivative,
                };
            }

            let x_new = x - fx / dfx;

            if (x_new - x).abs() < tolerances.convergence_tolerance {
                return RootReport {
                    root: x_new,
                    iterations: iteration,
                    termination: RootTermination::Converged,
                };
            }

            x = x_new;
        }

        RootReport {
            root: x,
            iterations: budget,
            termination: RootTermination::IterationLimit,
        }
    }

    /// `Σ callback(i)` for `i` in `0..count`, ascending
    pub fn sum_callback_results<F>(&self, callback: &F, count: i32) -> f64
    where
        F: IntCallback + ?Sized,
    {
        (0..count).fold(0.0, |sum, i| sum + f64::from(callback.invoke(i)))
    }
}
