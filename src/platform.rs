//! The indirection point table
//!
//! Each low-level operation the parser performs is an associated function of
//! [`Platform`]. Default bodies bind the C runtime through [`crate::sys`], so
//! an embedding application overrides only the points it cares about:
//!
//! ```
//! use mxml_platform::{Block, Platform};
//! use std::ffi::c_void;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
//!
//! struct CountingAllocator;
//!
//! impl Platform for CountingAllocator {
//!     fn malloc(size: usize) -> *mut c_void {
//!         ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
//!         mxml_platform::System::malloc(size)
//!     }
//! }
//!
//! let block = Block::<CountingAllocator>::with_bytes(b"<root/>")?;
//! assert_eq!(block.as_slice(), b"<root/>");
//! assert_eq!(ALLOCATIONS.load(Ordering::Relaxed), 1);
//! # Ok::<(), mxml_platform::PlatformError>(())
//! ```
//!
//! Code that uses the table is generic over `P: Platform` and monomorphized,
//! so the binding is fixed when the crate is compiled. Nothing here dispatches
//! at runtime.
//!
//! The allocator points (`malloc`, `calloc`, `realloc`, `free`) must be
//! overridden together: a block is always released by the `free` of the
//! platform that allocated it.

use crate::diagnostics::{DefaultDiagnostics, Diagnostics};
use crate::sys;
use std::ffi::{CStr, c_int, c_void};
use std::fmt;

pub use crate::sys::FILE;

/// Value returned by [`Platform::getc`] at end of stream or on error
pub const EOF: c_int = libc::EOF;

/// Low-level operations used by the parser
///
/// All functions follow the conventions of their C counterparts: negative
/// descriptors and byte counts signal failure, null pointers signal
/// allocation failure.
pub trait Platform {
    /// Opens `path` and returns a descriptor, or -1
    fn open(path: &CStr, flags: c_int, mode: c_int) -> c_int {
        unsafe { sys::open(path.as_ptr(), flags, mode) }
    }

    /// Closes a descriptor; returns 0 on success
    fn close(fd: c_int) -> c_int {
        sys::close(fd)
    }

    /// Reads into `buf`; returns the byte count, 0 at end of file, or -1
    fn read(fd: c_int, buf: &mut [u8]) -> isize {
        sys::read(fd, buf)
    }

    /// Writes from `buf`; returns the byte count or -1
    fn write(fd: c_int, buf: &[u8]) -> isize {
        sys::write(fd, buf)
    }

    /// Allocates `size` uninitialized bytes
    fn malloc(size: usize) -> *mut c_void {
        sys::malloc(size)
    }

    /// Allocates `count * size` zeroed bytes
    fn calloc(count: usize, size: usize) -> *mut c_void {
        sys::calloc(count, size)
    }

    /// Resizes a block
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block returned by this platform's
    /// `malloc`, `calloc` or `realloc`.
    unsafe fn realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
        unsafe { sys::realloc(ptr, size) }
    }

    /// Releases a block
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block returned by this platform's
    /// allocator, and must not be used afterwards.
    unsafe fn free(ptr: *mut c_void) {
        unsafe { sys::free(ptr) }
    }

    /// Reads one character from a stream; returns it as `c_int` or [`EOF`]
    ///
    /// # Safety
    ///
    /// `stream` must be a valid open C stream.
    unsafe fn getc(stream: *mut FILE) -> c_int {
        unsafe { sys::getc(stream) }
    }

    /// Emits a diagnostic message
    fn log(message: fmt::Arguments<'_>) {
        DefaultDiagnostics::emit(message);
    }
}

/// The C runtime with no overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct System;

impl Platform for System {}

/// Platform used by collaborators that are not handed another one
pub type DefaultPlatform = System;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn temp_path(name: &str) -> CString {
        let path = std::env::temp_dir().join(format!(
            "mxml-platform-{}-{}",
            std::process::id(),
            name
        ));
        CString::new(path.as_os_str().as_encoded_bytes()).unwrap()
    }

    #[test]
    fn test_system_descriptor_points_match_libc() {
        let path = temp_path("platform-io");
        let fd = System::open(&path, libc::O_CREAT | libc::O_RDWR | libc::O_TRUNC, 0o600);
        assert!(fd >= 0);
        assert_eq!(System::write(fd, b"<a/>"), 4);
        assert_eq!(System::close(fd), 0);

        let fd = unsafe { libc::open(path.as_ptr(), libc::O_RDONLY) };
        assert!(fd >= 0);
        let mut buf = [0u8; 8];
        assert_eq!(System::read(fd, &mut buf), 4);
        assert_eq!(&buf[..4], b"<a/>");
        assert_eq!(System::read(fd, &mut buf), 0);
        assert_eq!(unsafe { libc::close(fd) }, 0);

        unsafe { libc::unlink(path.as_ptr()) };
    }

    #[test]
    fn test_system_open_missing_file_fails_like_libc() {
        let path = temp_path("does-not-exist");
        let ours = System::open(&path, libc::O_RDONLY, 0);
        let theirs = unsafe { libc::open(path.as_ptr(), libc::O_RDONLY) };
        assert_eq!(ours, -1);
        assert_eq!(theirs, -1);
    }

    #[test]
    fn test_system_allocator_points() {
        let block = System::calloc(4, 8).cast::<u8>();
        assert!(!block.is_null());
        let zeroed = unsafe { std::slice::from_raw_parts(block, 32) };
        assert!(zeroed.iter().all(|&b| b == 0));

        let grown = unsafe { System::realloc(block.cast(), 64) };
        assert!(!grown.is_null());
        unsafe { System::free(grown) };

        let raw = System::malloc(16);
        assert!(!raw.is_null());
        unsafe { System::free(raw) };
    }

    #[test]
    fn test_system_getc_matches_libc() {
        unsafe {
            let stream = libc::tmpfile();
            assert!(!stream.is_null());
            libc::fputs(c"xy".as_ptr(), stream);
            libc::rewind(stream);
            assert_eq!(System::getc(stream), b'x' as c_int);
            assert_eq!(libc::fgetc(stream), b'y' as c_int);
            assert_eq!(System::getc(stream), EOF);
            libc::fclose(stream);
        }
    }
}
