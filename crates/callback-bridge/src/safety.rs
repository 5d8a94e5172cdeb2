//! Safe wrappers for raw pointers handed over by the host

use std::os::raw::{c_double, c_int};

/// Safe wrapper for null pointer checks
pub fn check_null<T>(ptr: *const T) -> Result<*const T, &'static str> {
    if ptr.is_null() {
        Err("Null pointer")
    } else {
        Ok(ptr)
    }
}

/// Safe wrapper for mutable null pointer checks
pub fn check_null_mut<T>(ptr: *mut T) -> Result<*mut T, &'static str> {
    if ptr.is_null() {
        Err("Null pointer")
    } else {
        Ok(ptr)
    }
}

/// Borrow a host-owned `double` buffer for the duration of one call
///
/// A non-positive length yields an empty slice without touching `ptr`, so a
/// null pointer is accepted in that case.
///
/// # Safety
///
/// When `length > 0` the caller must ensure:
/// - `ptr` points to `length` initialized, properly aligned doubles
/// - nothing else reads or writes the buffer while the slice is alive
pub unsafe fn buffer_from_raw<'a>(
    ptr: *mut c_double,
    length: c_int,
) -> Result<&'a mut [f64], &'static str> {
    if length <= 0 {
        return Ok(&mut []);
    }
    let ptr = check_null_mut(ptr)?;
    Ok(std::slice::from_raw_parts_mut(ptr, length as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_null_valid() {
        let x = 42;
        let ptr = &x as *const i32;
        assert!(check_null(ptr).is_ok());
    }

    #[test]
    fn test_check_null_invalid() {
        let ptr: *const i32 = std::ptr::null();
        assert!(check_null(ptr).is_err());
    }

    #[test]
    fn test_check_null_mut_invalid() {
        let ptr: *mut f64 = std::ptr::null_mut();
        assert!(check_null_mut(ptr).is_err());
    }

    #[test]
    fn test_buffer_from_raw_valid() {
        let mut data = vec![1.0, 2.0, 3.0];
        let slice = unsafe { buffer_from_raw(data.as_mut_ptr(), 3) }.unwrap();
        slice[1] = 20.0;
        assert_eq!(data, vec![1.0, 20.0, 3.0]);
    }

    #[test]
    fn test_buffer_from_raw_null_with_length() {
        let result = unsafe { buffer_from_raw(std::ptr::null_mut(), 4) };
        assert!(result.is_err());
    }

    #[test]
    fn test_buffer_from_raw_empty_accepts_null() {
        let empty = unsafe { buffer_from_raw(std::ptr::null_mut(), 0) }.unwrap();
        assert!(empty.is_empty());
        let negative = unsafe { buffer_from_raw(std::ptr::null_mut(), -3) }.unwrap();
        assert!(negative.is_empty());
    }
}
