//! Bridge error types

use crate::shape::{CallShape, ExternType};
use thiserror::Error;

/// Errors raised by the checked callback adapter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    /// Host supplied a null function pointer
    #[error("Null callback pointer")]
    NullCallback,

    /// Wrong number of arguments for the declared shape
    #[error("Expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Callback requested through a shape other than the one it was declared with
    #[error("Callback declared as {actual} cannot be invoked as {expected}")]
    ShapeMismatch {
        expected: CallShape,
        actual: CallShape,
    },

    /// Argument kind does not match the shape's parameter type
    #[error("Argument {index}: expected {}, got {}", .expected.display_name(), .got.display_name())]
    ArgumentMismatch {
        index: usize,
        expected: ExternType,
        got: ExternType,
    },
}

/// Errors raised by bridge operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// Integration requires at least one step
    #[error("Invalid step count {0}: integration requires steps >= 1")]
    InvalidSteps(i32),

    /// Callback returned NaN or infinity
    #[error("Callback returned invalid result: {0}")]
    InvalidResult(f64),
}
