// POSIX-style runtimes: glibc, musl, the BSD libcs and MinGW.
// libc already carries the standard names and argument types.

use libc::{c_char, c_int, c_void};

#[cfg(feature = "have-strlcpy")]
unsafe extern "C" {
    #[link_name = "strlcpy"]
    fn c_strlcpy(dst: *mut c_char, src: *const c_char, size: libc::size_t) -> libc::size_t;
}

unsafe extern "C" {
    // Not every libc target in the `libc` crate exposes getc; the symbol is
    // present in all of them.
    #[link_name = "getc"]
    fn c_getc(stream: *mut libc::FILE) -> c_int;
}

/// The platform `snprintf` reports the untruncated length
#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
pub(crate) const SNPRINTF_REPORTS_LENGTH: bool = true;

#[inline]
pub(crate) unsafe fn open(path: *const c_char, flags: c_int, mode: c_int) -> c_int {
    unsafe { libc::open(path, flags, mode as libc::c_uint) }
}

#[inline]
pub(crate) fn close(fd: c_int) -> c_int {
    unsafe { libc::close(fd) }
}

#[inline]
pub(crate) fn read(fd: c_int, buf: &mut [u8]) -> isize {
    unsafe { libc::read(fd, buf.as_mut_ptr().cast::<c_void>(), buf.len() as _) as isize }
}

#[inline]
pub(crate) fn write(fd: c_int, buf: &[u8]) -> isize {
    unsafe { libc::write(fd, buf.as_ptr().cast::<c_void>(), buf.len() as _) as isize }
}

#[inline]
pub(crate) fn malloc(size: usize) -> *mut c_void {
    unsafe { libc::malloc(size) }
}

#[inline]
pub(crate) fn calloc(count: usize, size: usize) -> *mut c_void {
    unsafe { libc::calloc(count, size) }
}

#[inline]
pub(crate) unsafe fn realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    unsafe { libc::realloc(ptr, size) }
}

#[inline]
pub(crate) unsafe fn free(ptr: *mut c_void) {
    unsafe { libc::free(ptr) }
}

#[inline]
pub(crate) unsafe fn getc(stream: *mut libc::FILE) -> c_int {
    unsafe { c_getc(stream) }
}

#[cfg(feature = "have-strdup")]
#[inline]
pub(crate) unsafe fn strdup(s: *const c_char) -> *mut c_char {
    unsafe { libc::strdup(s) }
}

#[cfg(feature = "have-strlcpy")]
#[inline]
pub(crate) unsafe fn strlcpy(dst: *mut c_char, src: *const c_char, size: usize) -> usize {
    unsafe { c_strlcpy(dst, src, size) }
}

#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
pub(crate) use libc::snprintf;
