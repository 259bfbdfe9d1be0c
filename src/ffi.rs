//! C-ABI exports
//!
//! Unmangled `extern "C"` entry points for C and C++ callers; see
//! `include/mxml_platform.h`. The variadic formatting functions are not
//! exported because stable Rust cannot define C-variadic functions.

use crate::strings;
use std::ffi::{CStr, c_char};

static VERSION_C: &CStr = match CStr::from_bytes_with_nul(concat!(version_string!(), "\0").as_bytes()) {
    Ok(version) => version,
    Err(_) => panic!("version string contains a NUL byte"),
};

/// Returns the library version as a static C string
#[unsafe(no_mangle)]
pub extern "C" fn mxml_platform_version() -> *const c_char {
    VERSION_C.as_ptr()
}

/// Duplicates a C string; the result is released with `free`
///
/// Returns null for a null input or when allocation fails.
///
/// # Safety
///
/// `s` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _mxml_strdup(s: *const c_char) -> *mut c_char {
    if s.is_null() {
        return std::ptr::null_mut();
    }
    let s = unsafe { CStr::from_ptr(s) };
    strings::strdup(s).map_or(std::ptr::null_mut(), strings::HeapCString::into_raw)
}

/// Copies at most `size - 1` bytes of `src` into `dst` and terminates it
///
/// Returns the length of `src`.
///
/// # Safety
///
/// `src` must point to a NUL-terminated string and `dst` to `size` writable
/// bytes (or be null with `size == 0`).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _mxml_strlcpy(dst: *mut c_char, src: *const c_char, size: usize) -> usize {
    let src = unsafe { CStr::from_ptr(src) };
    if dst.is_null() || size == 0 {
        return src.to_bytes().len();
    }
    let dst = unsafe { std::slice::from_raw_parts_mut(dst.cast::<u8>(), size) };
    strings::strlcpy(dst, src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_crate_constant() {
        let version = unsafe { CStr::from_ptr(mxml_platform_version()) };
        assert_eq!(version.to_str().unwrap(), crate::VERSION);
    }

    #[test]
    fn test_exported_strdup_handles_null() {
        assert!(unsafe { _mxml_strdup(std::ptr::null()) }.is_null());

        let copy = unsafe { _mxml_strdup(c"leaf".as_ptr()) };
        assert!(!copy.is_null());
        let copy = unsafe { strings::HeapCString::from_raw(copy) }.unwrap();
        assert_eq!(copy, "leaf");
    }

    #[test]
    fn test_exported_strlcpy_truncates() {
        let mut dst = [0x7f as c_char; 4];
        let len = unsafe { _mxml_strlcpy(dst.as_mut_ptr(), c"truncate".as_ptr(), dst.len()) };
        assert_eq!(len, 8);
        let copied = unsafe { CStr::from_ptr(dst.as_ptr()) };
        assert_eq!(copied.to_bytes(), b"tru");
    }
}
