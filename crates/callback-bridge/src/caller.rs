//! Checked callback adapter
//!
//! A host that hands the bridge a type-erased function pointer also declares
//! its shape. `ExternCallback` keeps the two together and only ever turns the
//! pointer back into the declared signature, so a callback registered as
//! `(CDouble,CDouble)->CDouble` can never be called as `(CDouble)->CDouble`.

use crate::callback::{
    BinaryCallbackFn, DoubleCallbackFn, IntCallbackFn, SimpleCallbackFn, VoidCallbackFn,
};
use crate::error::CallError;
use crate::safety::check_null;
use crate::shape::{CValue, CallShape};

/// Host function pointer tagged with its declared shape
#[derive(Clone, Copy)]
pub struct ExternCallback {
    /// Raw function pointer (type-erased)
    fn_ptr: *const (),
    /// Declared signature
    shape: CallShape,
}

// Safety: ExternCallback only stores a function pointer, which is safe to share
unsafe impl Send for ExternCallback {}
unsafe impl Sync for ExternCallback {}

impl ExternCallback {
    /// Wrap a raw function pointer with its declared shape
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    /// - `fn_ptr` points to a function with the C calling convention
    /// - The function's actual signature matches `shape`
    /// - The function remains valid for as long as this value is used
    pub unsafe fn new(fn_ptr: *const (), shape: CallShape) -> Result<Self, CallError> {
        let fn_ptr = check_null(fn_ptr).map_err(|_| CallError::NullCallback)?;
        Ok(Self { fn_ptr, shape })
    }

    pub fn from_unary(f: DoubleCallbackFn) -> Self {
        Self {
            fn_ptr: f as *const (),
            shape: CallShape::UnaryDouble,
        }
    }

    pub fn from_binary(f: BinaryCallbackFn) -> Self {
        Self {
            fn_ptr: f as *const (),
            shape: CallShape::BinaryDouble,
        }
    }

    pub fn from_int(f: IntCallbackFn) -> Self {
        Self {
            fn_ptr: f as *const (),
            shape: CallShape::UnaryInt,
        }
    }

    pub fn from_nullary(f: SimpleCallbackFn) -> Self {
        Self {
            fn_ptr: f as *const (),
            shape: CallShape::Nullary,
        }
    }

    pub fn from_void(f: VoidCallbackFn) -> Self {
        Self {
            fn_ptr: f as *const (),
            shape: CallShape::VoidUnary,
        }
    }

    /// Declared shape
    pub fn shape(&self) -> CallShape {
        self.shape
    }

    fn expect_shape(&self, expected: CallShape) -> Result<(), CallError> {
        if self.shape == expected {
            Ok(())
        } else {
            Err(CallError::ShapeMismatch {
                expected,
                actual: self.shape,
            })
        }
    }

    pub fn as_unary(&self) -> Result<DoubleCallbackFn, CallError> {
        self.expect_shape(CallShape::UnaryDouble)?;
        // Safety: shape checked; `new` holds the caller to the declared signature
        Ok(unsafe { std::mem::transmute::<*const (), DoubleCallbackFn>(self.fn_ptr) })
    }

    pub fn as_binary(&self) -> Result<BinaryCallbackFn, CallError> {
        self.expect_shape(CallShape::BinaryDouble)?;
        Ok(unsafe { std::mem::transmute::<*const (), BinaryCallbackFn>(self.fn_ptr) })
    }

    pub fn as_int(&self) -> Result<IntCallbackFn, CallError> {
        self.expect_shape(CallShape::UnaryInt)?;
        Ok(unsafe { std::mem::transmute::<*const (), IntCallbackFn>(self.fn_ptr) })
    }

    pub fn as_nullary(&self) -> Result<SimpleCallbackFn, CallError> {
        self.expect_shape(CallShape::Nullary)?;
        Ok(unsafe { std::mem::transmute::<*const (), SimpleCallbackFn>(self.fn_ptr) })
    }

    pub fn as_void(&self) -> Result<VoidCallbackFn, CallError> {
        self.expect_shape(CallShape::VoidUnary)?;
        Ok(unsafe { std::mem::transmute::<*const (), VoidCallbackFn>(self.fn_ptr) })
    }

    /// Validate argument count and kinds against the declared shape
    pub fn check_args(&self, args: &[CValue]) -> Result<(), CallError> {
        let params = self.shape.param_types();
        if args.len() != params.len() {
            return Err(CallError::ArityMismatch {
                expected: params.len(),
                got: args.len(),
            });
        }
        for (index, (arg, expected)) in args.iter().zip(params).enumerate() {
            let got = arg.extern_type();
            if got != *expected {
                return Err(CallError::ArgumentMismatch {
                    index,
                    expected: *expected,
                    got,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExternCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternCallback")
            .field("fn_ptr", &self.fn_ptr)
            .field("shape", &self.shape.signature_key())
            .finish()
    }
}
