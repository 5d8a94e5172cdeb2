//! Call shapes - the C signatures the bridge can invoke
//!
//! Defines:
//! - `ExternType`: the C types that appear in callback signatures
//! - `CallShape`: the five supported callback signatures
//! - `CValue`: runtime representation of a value crossing the boundary
//!
//! Shape mapping:
//! - CallShape::UnaryDouble → double (*)(double)
//! - CallShape::BinaryDouble → double (*)(double, double)
//! - CallShape::UnaryInt → int (*)(int)
//! - CallShape::Nullary → int (*)(void)
//! - CallShape::VoidUnary → void (*)(int)

use serde::{Deserialize, Serialize};
use std::fmt;

/// C types used in callback signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternType {
    /// C int (i32)
    CInt,
    /// C double (f64)
    CDouble,
    /// C void (return position only)
    CVoid,
}

impl ExternType {
    /// Get a display name for this extern type
    pub fn display_name(&self) -> &'static str {
        match self {
            ExternType::CInt => "c_int",
            ExternType::CDouble => "c_double",
            ExternType::CVoid => "c_void",
        }
    }
}

/// Callback signatures supported by the bridge
///
/// Each shape is a distinct calling convention. A callback declared with one
/// shape is never invoked through another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallShape {
    /// `double → double`
    UnaryDouble,
    /// `(double, double) → double`
    BinaryDouble,
    /// `int → int`
    UnaryInt,
    /// `() → int`
    Nullary,
    /// `int → ()`
    VoidUnary,
}

impl CallShape {
    /// All shapes, in declaration order
    pub const ALL: [CallShape; 5] = [
        CallShape::UnaryDouble,
        CallShape::BinaryDouble,
        CallShape::UnaryInt,
        CallShape::Nullary,
        CallShape::VoidUnary,
    ];

    /// Parameter types, in call order
    pub fn param_types(&self) -> &'static [ExternType] {
        match self {
            CallShape::UnaryDouble => &[ExternType::CDouble],
            CallShape::BinaryDouble => &[ExternType::CDouble, ExternType::CDouble],
            CallShape::UnaryInt | CallShape::VoidUnary => &[ExternType::CInt],
            CallShape::Nullary => &[],
        }
    }

    /// Return type
    pub fn return_type(&self) -> ExternType {
        match self {
            CallShape::UnaryDouble | CallShape::BinaryDouble => ExternType::CDouble,
            CallShape::UnaryInt | CallShape::Nullary => ExternType::CInt,
            CallShape::VoidUnary => ExternType::CVoid,
        }
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.param_types().len()
    }

    /// Signature key, e.g. `(CDouble,CDouble)->CDouble`
    pub fn signature_key(&self) -> String {
        let params: Vec<String> = self
            .param_types()
            .iter()
            .map(|t| format!("{:?}", t))
            .collect();
        format!("({})->{:?}", params.join(","), self.return_type())
    }

    /// Human-readable shape name
    pub fn display_name(&self) -> &'static str {
        match self {
            CallShape::UnaryDouble => "unary-double",
            CallShape::BinaryDouble => "binary-double",
            CallShape::UnaryInt => "unary-int",
            CallShape::Nullary => "nullary",
            CallShape::VoidUnary => "void-unary",
        }
    }

    /// Name of the matching C typedef
    pub fn c_typedef(&self) -> &'static str {
        match self {
            CallShape::UnaryDouble => "double_callback_t",
            CallShape::BinaryDouble => "binary_callback_t",
            CallShape::UnaryInt => "int_callback_t",
            CallShape::Nullary => "simple_callback_t",
            CallShape::VoidUnary => "void_callback_t",
        }
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Value crossing the callback boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CValue {
    /// C int value
    Int(i32),
    /// C double value
    Double(f64),
    /// No value (void return)
    Void,
}

impl CValue {
    /// The extern type of this value
    pub fn extern_type(&self) -> ExternType {
        match self {
            CValue::Int(_) => ExternType::CInt,
            CValue::Double(_) => ExternType::CDouble,
            CValue::Void => ExternType::CVoid,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            CValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            CValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Doubles print with two decimals, matching the C trace format
impl fmt::Display for CValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CValue::Int(i) => write!(f, "{}", i),
            CValue::Double(d) => write!(f, "{:.2}", d),
            CValue::Void => f.write_str("void"),
        }
    }
}
