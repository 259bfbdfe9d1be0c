//! Owned handles over the indirection points
//!
//! [`Descriptor`] and [`Block`] pair every acquisition with the matching
//! release of the same platform, so a block allocated by an overriding
//! allocator is never handed to the C runtime's `free`.

use crate::error::{PlatformError, Result};
use crate::mxml_log;
use crate::platform::{DefaultPlatform, Platform};
use std::ffi::{CStr, CString, c_int, c_void};
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::path::Path;
use std::ptr::NonNull;

/// Read-only open flag
pub const O_RDONLY: c_int = libc::O_RDONLY;
/// Write-only open flag
pub const O_WRONLY: c_int = libc::O_WRONLY;
/// Read-write open flag
pub const O_RDWR: c_int = libc::O_RDWR;
/// Create the file if missing
pub const O_CREAT: c_int = libc::O_CREAT;
/// Truncate an existing file
pub const O_TRUNC: c_int = libc::O_TRUNC;

/// Mode used when [`Descriptor::create`] creates a file
pub const DEFAULT_CREATE_MODE: c_int = 0o644;

/// Converts a filesystem path into the NUL-terminated form the bindings take
pub fn path_to_cstring(path: &Path) -> Result<CString> {
    Ok(CString::new(path.as_os_str().as_encoded_bytes())?)
}

/// An open descriptor, closed through `P` when dropped
#[derive(Debug)]
pub struct Descriptor<P: Platform = DefaultPlatform> {
    fd: c_int,
    _platform: PhantomData<fn() -> P>,
}

impl<P: Platform> Descriptor<P> {
    /// Opens `path` with raw flags and creation mode
    pub fn open(path: &CStr, flags: c_int, mode: c_int) -> Result<Self> {
        let fd = P::open(path, flags, mode);
        if fd < 0 {
            let error = std::io::Error::last_os_error();
            mxml_log!(P, "Unable to open {}: {}", path.to_string_lossy(), error);
            return Err(PlatformError::Io(error));
        }
        Ok(Self {
            fd,
            _platform: PhantomData,
        })
    }

    /// Opens an existing file for reading
    pub fn open_read<A: AsRef<Path>>(path: A) -> Result<Self> {
        let path = path_to_cstring(path.as_ref())?;
        Self::open(&path, O_RDONLY | binary_flag(), 0)
    }

    /// Creates or truncates a file for writing
    pub fn create<A: AsRef<Path>>(path: A) -> Result<Self> {
        let path = path_to_cstring(path.as_ref())?;
        Self::open(
            &path,
            O_WRONLY | O_CREAT | O_TRUNC | binary_flag(),
            DEFAULT_CREATE_MODE,
        )
    }

    /// Adopts a descriptor opened elsewhere through `P`
    ///
    /// # Safety
    ///
    /// `fd` must be open, owned by the caller, and closeable through `P`.
    pub unsafe fn from_raw(fd: c_int) -> Self {
        Self {
            fd,
            _platform: PhantomData,
        }
    }

    /// Returns the raw descriptor
    pub fn as_raw(&self) -> c_int {
        self.fd
    }

    /// Releases ownership without closing
    pub fn into_raw(self) -> c_int {
        let this = ManuallyDrop::new(self);
        this.fd
    }

    /// Reads up to `buf.len()` bytes; returns 0 at end of file
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = P::read(self.fd, buf);
        if count < 0 {
            return Err(PlatformError::Io(std::io::Error::last_os_error()));
        }
        Ok(count as usize)
    }

    /// Writes from `buf`; returns the number of bytes accepted
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<usize> {
        let count = P::write(self.fd, buf);
        if count < 0 {
            return Err(PlatformError::Io(std::io::Error::last_os_error()));
        }
        Ok(count as usize)
    }

    /// Closes the descriptor and reports the result
    pub fn close(self) -> Result<()> {
        let fd = self.into_raw();
        if P::close(fd) != 0 {
            return Err(PlatformError::Io(std::io::Error::last_os_error()));
        }
        Ok(())
    }
}

impl<P: Platform> Drop for Descriptor<P> {
    fn drop(&mut self) {
        if P::close(self.fd) != 0 {
            mxml_log!(P, "Unable to close descriptor {}", self.fd);
        }
    }
}

impl<P: Platform> std::io::Read for Descriptor<P> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read_bytes(buf).map_err(into_io_error)
    }
}

impl<P: Platform> std::io::Write for Descriptor<P> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_bytes(buf).map_err(into_io_error)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // Descriptor writes are unbuffered
        Ok(())
    }
}

fn into_io_error(error: PlatformError) -> std::io::Error {
    match error {
        PlatformError::Io(error) => error,
        other => std::io::Error::other(other),
    }
}

#[cfg(windows)]
fn binary_flag() -> c_int {
    // _O_BINARY; text mode would translate line endings
    0x8000
}

#[cfg(not(windows))]
fn binary_flag() -> c_int {
    0
}

/// A heap block owned through `P`'s allocator
///
/// Every byte of the block is initialized: new blocks are copied or zeroed
/// and growth zero-fills the tail.
#[derive(Debug)]
pub struct Block<P: Platform = DefaultPlatform> {
    ptr: NonNull<u8>,
    len: usize,
    _platform: PhantomData<fn() -> P>,
}

// The block is uniquely owned; thread safety of `P`'s allocator is assumed.
unsafe impl<P: Platform> Send for Block<P> {}

impl<P: Platform> Block<P> {
    /// Allocates a block holding a copy of `bytes`
    pub fn with_bytes(bytes: &[u8]) -> Result<Self> {
        let ptr = P::malloc(bytes.len().max(1)).cast::<u8>();
        let ptr = NonNull::new(ptr).ok_or_else(|| {
            mxml_log!(P, "Unable to allocate {} bytes", bytes.len());
            PlatformError::OutOfMemory {
                requested: bytes.len(),
            }
        })?;
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len()) };
        Ok(Self {
            ptr,
            len: bytes.len(),
            _platform: PhantomData,
        })
    }

    /// Allocates `count * size` zeroed bytes
    pub fn zeroed(count: usize, size: usize) -> Result<Self> {
        let len = count
            .checked_mul(size)
            .ok_or(PlatformError::SizeOverflow { count, size })?;
        let ptr = if len == 0 {
            P::calloc(1, 1)
        } else {
            P::calloc(count, size)
        };
        let ptr = NonNull::new(ptr.cast::<u8>()).ok_or_else(|| {
            mxml_log!(P, "Unable to allocate {} zeroed bytes", len);
            PlatformError::OutOfMemory { requested: len }
        })?;
        Ok(Self {
            ptr,
            len,
            _platform: PhantomData,
        })
    }

    /// Resizes the block, zero-filling any new bytes
    ///
    /// On failure the block is left untouched.
    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        let raw = unsafe { P::realloc(self.ptr.as_ptr().cast::<c_void>(), new_len.max(1)) };
        let ptr = NonNull::new(raw.cast::<u8>()).ok_or_else(|| {
            mxml_log!(P, "Unable to resize block to {} bytes", new_len);
            PlatformError::OutOfMemory { requested: new_len }
        })?;
        if new_len > self.len {
            unsafe { ptr.as_ptr().add(self.len).write_bytes(0, new_len - self.len) };
        }
        self.ptr = ptr;
        self.len = new_len;
        Ok(())
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true for a zero-length block
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Hands the block to a collaborator that releases it with `P::free`
    pub fn into_raw(self) -> (*mut u8, usize) {
        let this = ManuallyDrop::new(self);
        (this.ptr.as_ptr(), this.len)
    }

    /// Takes back a block released by [`Block::into_raw`]
    ///
    /// # Safety
    ///
    /// `ptr` and `len` must come from `into_raw` on a block of the same
    /// platform, and the block must not have been freed.
    pub unsafe fn from_raw(ptr: *mut u8, len: usize) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            ptr,
            len,
            _platform: PhantomData,
        })
    }
}

impl<P: Platform> Drop for Block<P> {
    fn drop(&mut self) {
        unsafe { P::free(self.ptr.as_ptr().cast::<c_void>()) };
    }
}

impl<P: Platform> std::ops::Deref for Block<P> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<P: Platform> std::ops::DerefMut for Block<P> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}
