//! Bindings to the runtime's own string functions

#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
use crate::error::FormatError;
#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
use crate::format::native::Native;
#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
use crate::format::{ArgList, Output, format_with};
#[cfg(feature = "have-snprintf")]
use crate::format::FormatArg;
#[cfg(feature = "have-strdup")]
use super::HeapCString;
#[cfg(any(feature = "have-strdup", feature = "have-strlcpy"))]
use crate::sys;
#[cfg(any(feature = "have-strdup", feature = "have-strlcpy"))]
use std::ffi::CStr;

/// Duplicates `s` with the runtime's `strdup`
#[cfg(feature = "have-strdup")]
pub fn strdup(s: &CStr) -> Option<HeapCString> {
    let raw = unsafe { sys::strdup(s.as_ptr()) };
    // strdup allocates from the same heap as the bound malloc/free
    unsafe { HeapCString::from_raw(raw) }
}

/// Copies with the runtime's `strlcpy`
#[cfg(feature = "have-strlcpy")]
pub fn strlcpy(dst: &mut [u8], src: &CStr) -> usize {
    unsafe { sys::strlcpy(dst.as_mut_ptr().cast(), src.as_ptr(), dst.len()) }
}

/// Formats with the runtime's `snprintf`
#[cfg(feature = "have-snprintf")]
pub fn snprintf(buf: &mut [u8], format: &str, args: &[FormatArg<'_>]) -> Result<usize, FormatError> {
    vsnprintf_native(buf, format, &mut ArgList::new(args))
}

/// Formats an argument cursor with the runtime's formatter
#[cfg(feature = "have-vsnprintf")]
pub fn vsnprintf(
    buf: &mut [u8],
    format: &str,
    args: &mut ArgList<'_, '_>,
) -> Result<usize, FormatError> {
    vsnprintf_native(buf, format, args)
}

#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
fn vsnprintf_native(
    buf: &mut [u8],
    format: &str,
    args: &mut ArgList<'_, '_>,
) -> Result<usize, FormatError> {
    let mut out = Output::new(buf);
    let result = format_with::<Native>(&mut out, format, args);
    let len = out.finish();
    result.map(|()| len)
}
