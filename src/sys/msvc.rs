// Microsoft C runtime. The POSIX names are compatibility shims that may use a
// different heap than malloc/free, so every binding names the real
// underscore symbol.

use libc::{c_char, c_int, c_uint, c_void, size_t};

unsafe extern "C" {
    #[link_name = "_open"]
    fn c_open(path: *const c_char, flags: c_int, ...) -> c_int;
    #[link_name = "_close"]
    fn c_close(fd: c_int) -> c_int;
    #[link_name = "_read"]
    fn c_read(fd: c_int, buf: *mut c_void, count: c_uint) -> c_int;
    #[link_name = "_write"]
    fn c_write(fd: c_int, buf: *const c_void, count: c_uint) -> c_int;
    #[link_name = "getc"]
    fn c_getc(stream: *mut libc::FILE) -> c_int;
}

#[cfg(feature = "have-strdup")]
unsafe extern "C" {
    #[link_name = "_strdup"]
    fn c_strdup(s: *const c_char) -> *mut c_char;
}

#[cfg(feature = "have-strlcpy")]
unsafe extern "C" {
    #[link_name = "strlcpy"]
    fn c_strlcpy(dst: *mut c_char, src: *const c_char, size: size_t) -> size_t;
}

// The UCRT only ships the printf family as header inlines; the exported
// symbols live in legacy_stdio_definitions.
#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
#[link(name = "legacy_stdio_definitions")]
unsafe extern "C" {
    #[link_name = "_snprintf"]
    pub(crate) fn snprintf(buf: *mut c_char, count: size_t, format: *const c_char, ...) -> c_int;
}

/// `_snprintf` returns -1 on truncation and does not terminate the buffer
#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
pub(crate) const SNPRINTF_REPORTS_LENGTH: bool = false;

// _read/_write take an unsigned int count
const MAX_TRANSFER: usize = c_int::MAX as usize;

#[inline]
pub(crate) unsafe fn open(path: *const c_char, flags: c_int, mode: c_int) -> c_int {
    unsafe { c_open(path, flags, mode) }
}

#[inline]
pub(crate) fn close(fd: c_int) -> c_int {
    unsafe { c_close(fd) }
}

#[inline]
pub(crate) fn read(fd: c_int, buf: &mut [u8]) -> isize {
    let count = buf.len().min(MAX_TRANSFER) as c_uint;
    unsafe { c_read(fd, buf.as_mut_ptr().cast::<c_void>(), count) as isize }
}

#[inline]
pub(crate) fn write(fd: c_int, buf: &[u8]) -> isize {
    let count = buf.len().min(MAX_TRANSFER) as c_uint;
    unsafe { c_write(fd, buf.as_ptr().cast::<c_void>(), count) as isize }
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
    unsafe { c_strdup(s) }
}

#[cfg(feature = "have-strlcpy")]
#[inline]
pub(crate) unsafe fn strlcpy(dst: *mut c_char, src: *const c_char, size: usize) -> usize {
    unsafe { c_strlcpy(dst, src, size) }
}
