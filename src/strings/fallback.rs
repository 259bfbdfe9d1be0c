//! Internal implementations for runtimes that lack the standard functions

#[cfg(not(all(feature = "have-snprintf", feature = "have-vsnprintf")))]
use crate::format::portable::Portable;
#[cfg(not(all(feature = "have-snprintf", feature = "have-vsnprintf")))]
use crate::format::{ArgList, Output, format_with};
#[cfg(not(feature = "have-snprintf"))]
use crate::format::FormatArg;
#[cfg(not(all(feature = "have-snprintf", feature = "have-vsnprintf")))]
use crate::error::FormatError;
#[cfg(not(feature = "have-strdup"))]
use super::HeapCString;
#[cfg(any(not(feature = "have-strdup"), not(feature = "have-strlcpy")))]
use std::ffi::CStr;

/// Duplicates `s` into a fresh block on the C heap
///
/// Returns `None` when the allocation fails.
#[cfg(not(feature = "have-strdup"))]
pub fn strdup(s: &CStr) -> Option<HeapCString> {
    HeapCString::from_bytes(s.to_bytes())
}

/// Copies `src` into `dst`, truncating to `dst.len() - 1` bytes
///
/// Always NUL-terminates a non-empty `dst` and never writes past it. Returns
/// the length of `src`, so `result >= dst.len()` signals truncation.
#[cfg(not(feature = "have-strlcpy"))]
pub fn strlcpy(dst: &mut [u8], src: &CStr) -> usize {
    let src = src.to_bytes();
    if let Some(capacity) = dst.len().checked_sub(1) {
        let count = src.len().min(capacity);
        dst[..count].copy_from_slice(&src[..count]);
        dst[count] = 0;
    }
    src.len()
}

/// Formats into `buf` without overrunning it
///
/// Returns the length the complete rendering would have, excluding the NUL.
#[cfg(not(feature = "have-snprintf"))]
pub fn snprintf(buf: &mut [u8], format: &str, args: &[FormatArg<'_>]) -> Result<usize, FormatError> {
    vsnprintf_portable(buf, format, &mut ArgList::new(args))
}

/// [`snprintf`](super::snprintf) over an argument cursor
#[cfg(not(feature = "have-vsnprintf"))]
pub fn vsnprintf(
    buf: &mut [u8],
    format: &str,
    args: &mut ArgList<'_, '_>,
) -> Result<usize, FormatError> {
    vsnprintf_portable(buf, format, args)
}

#[cfg(not(all(feature = "have-snprintf", feature = "have-vsnprintf")))]
fn vsnprintf_portable(
    buf: &mut [u8],
    format: &str,
    args: &mut ArgList<'_, '_>,
) -> Result<usize, FormatError> {
    let mut out = Output::new(buf);
    let result = format_with::<Portable>(&mut out, format, args);
    let len = out.finish();
    result.map(|()| len)
}
