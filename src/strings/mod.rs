//! String and formatting utilities with build-time fallbacks
//!
//! Each function below is bound to exactly one implementation per build:
//!
//! | Function | Marker | Bound when set | Bound otherwise |
//! |---|---|---|---|
//! | [`strdup`] | `have-strdup` | runtime `strdup` | internal copy |
//! | [`strlcpy`] | `have-strlcpy` | runtime `strlcpy` | internal copy |
//! | [`snprintf`] | `have-snprintf` | runtime `snprintf` | Rust renderer |
//! | [`vsnprintf`] | `have-vsnprintf` | runtime `snprintf` per conversion | Rust renderer |
//!
//! [`strdupf`] and [`vstrdupf`] are always internal and format through
//! whichever [`vsnprintf`] is bound. Callers use the same path either way:
//!
//! ```
//! use mxml_platform::{snprintf, strdup, strlcpy};
//!
//! let copy = strdup(c"abc").expect("allocation");
//! assert_eq!(copy.to_bytes(), b"abc");
//!
//! let mut dst = [0u8; 3];
//! assert_eq!(strlcpy(&mut dst, c"hello"), 5);
//! assert_eq!(&dst, b"he\0");
//!
//! let mut buf = [0u8; 4];
//! assert_eq!(snprintf!(&mut buf, "%d", 12345)?, 5);
//! assert_eq!(&buf, b"123\0");
//! # Ok::<(), mxml_platform::FormatError>(())
//! ```

mod fallback;
mod native;

use crate::format::{ArgList, FormatArg};
use crate::platform::DefaultPlatform;
use crate::sys;
use std::ffi::{CStr, c_char, c_void};
use std::fmt;
use std::ptr::NonNull;

#[cfg(not(feature = "have-strdup"))]
pub use fallback::strdup;
#[cfg(feature = "have-strdup")]
pub use native::strdup;

#[cfg(not(feature = "have-strlcpy"))]
pub use fallback::strlcpy;
#[cfg(feature = "have-strlcpy")]
pub use native::strlcpy;

#[cfg(not(feature = "have-snprintf"))]
pub use fallback::snprintf;
#[cfg(feature = "have-snprintf")]
pub use native::snprintf;

#[cfg(not(feature = "have-vsnprintf"))]
pub use fallback::vsnprintf;
#[cfg(feature = "have-vsnprintf")]
pub use native::vsnprintf;

/// Size of the stack buffer [`vstrdupf`] tries before allocating
pub const STRDUPF_SCRATCH: usize = 256;

/// A NUL-terminated string owned on the C heap
///
/// Released with the runtime's `free`, so it can be handed to C code that
/// expects a `strdup` result.
pub struct HeapCString {
    ptr: NonNull<c_char>,
}

// Uniquely owned heap memory
unsafe impl Send for HeapCString {}
unsafe impl Sync for HeapCString {}

impl HeapCString {
    /// Copies `bytes` and appends a NUL
    pub(crate) fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let raw = sys::malloc(bytes.len() + 1).cast::<u8>();
        let ptr = NonNull::new(raw)?;
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            ptr.as_ptr().add(bytes.len()).write(0);
        }
        Some(Self { ptr: ptr.cast() })
    }

    /// Allocates `size` zeroed bytes for a formatter to fill
    fn zeroed(size: usize) -> Option<Self> {
        let raw = sys::calloc(size.max(1), 1).cast::<c_char>();
        NonNull::new(raw).map(|ptr| Self { ptr })
    }

    /// Takes ownership of a string allocated by the runtime's `malloc`
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a NUL-terminated block from the runtime heap that
    /// nothing else frees.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Releases ownership; the caller must `free` the pointer
    pub fn into_raw(self) -> *mut c_char {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.ptr.as_ptr()
    }

    pub fn as_c_str(&self) -> &CStr {
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    /// Length in bytes, excluding the NUL
    pub fn len(&self) -> usize {
        self.as_c_str().to_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable view of the string bytes, excluding the NUL
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len();
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().cast::<u8>(), len) }
    }
}

impl Drop for HeapCString {
    fn drop(&mut self) {
        unsafe { sys::free(self.ptr.as_ptr().cast::<c_void>()) };
    }
}

impl std::ops::Deref for HeapCString {
    type Target = CStr;

    fn deref(&self) -> &CStr {
        self.as_c_str()
    }
}

impl AsRef<CStr> for HeapCString {
    fn as_ref(&self) -> &CStr {
        self.as_c_str()
    }
}

impl fmt::Debug for HeapCString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_c_str(), f)
    }
}

impl fmt::Display for HeapCString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_c_str().to_string_lossy())
    }
}

impl PartialEq for HeapCString {
    fn eq(&self, other: &Self) -> bool {
        self.as_c_str() == other.as_c_str()
    }
}

impl PartialEq<str> for HeapCString {
    fn eq(&self, other: &str) -> bool {
        self.to_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for HeapCString {
    fn eq(&self, other: &&str) -> bool {
        self.to_bytes() == other.as_bytes()
    }
}

/// Formats into a newly allocated string
///
/// Returns `None` if the format is malformed or allocation fails.
pub fn strdupf(format: &str, args: &[FormatArg<'_>]) -> Option<HeapCString> {
    vstrdupf(format, &mut ArgList::new(args))
}

/// [`strdupf`] over an argument cursor
///
/// A malformed format is reported through the default platform's log hook.
pub fn vstrdupf(format: &str, args: &mut ArgList<'_, '_>) -> Option<HeapCString> {
    let mut second_pass = args.clone();
    let mut scratch = [0u8; STRDUPF_SCRATCH];
    let len = match vsnprintf(&mut scratch, format, args) {
        Ok(len) => len,
        Err(error) => {
            crate::mxml_log!(
                DefaultPlatform,
                "Bad format string: {}\n{}",
                error,
                error.offset().annotate(format)
            );
            return None;
        }
    };
    if len < scratch.len() {
        return HeapCString::from_bytes(&scratch[..len]);
    }

    let block = HeapCString::zeroed(len + 1)?;
    let buf = unsafe { std::slice::from_raw_parts_mut(block.ptr.as_ptr().cast::<u8>(), len + 1) };
    vsnprintf(buf, format, &mut second_pass).ok()?;
    Some(block)
}

/// Formats into a byte buffer, building the argument list at the call site
///
/// ```
/// let mut buf = [0u8; 16];
/// let len = mxml_platform::snprintf!(&mut buf, "<%s id=\"%d\">", "node", 7)?;
/// assert_eq!(&buf[..len], b"<node id=\"7\">");
/// # Ok::<(), mxml_platform::FormatError>(())
/// ```
#[macro_export]
macro_rules! snprintf {
    ($buf:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $crate::strings::snprintf($buf, $format, &[$($crate::FormatArg::from($arg)),*])
    };
}

/// Formats into a new [`HeapCString`]
///
/// ```
/// let text = mxml_platform::strdupf!("%s=%.2f", "ratio", 0.5).expect("formatted");
/// assert_eq!(text, "ratio=0.50");
/// ```
#[macro_export]
macro_rules! strdupf {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::strings::strdupf($format, &[$($crate::FormatArg::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_string_from_bytes() {
        let text = HeapCString::from_bytes(b"element").unwrap();
        assert_eq!(text.len(), 7);
        assert_eq!(text, "element");
        assert_eq!(text.to_string(), "element");
    }

    #[test]
    fn test_heap_string_raw_round_trip() {
        let text = HeapCString::from_bytes(b"attr").unwrap();
        let raw = text.into_raw();
        let text = unsafe { HeapCString::from_raw(raw) }.unwrap();
        assert_eq!(text, "attr");
        assert!(unsafe { HeapCString::from_raw(std::ptr::null_mut()) }.is_none());
    }

    #[test]
    fn test_strdupf_short_output_uses_scratch() {
        let text = strdupf("%s-%d", &["node".into(), 3.into()]).unwrap();
        assert_eq!(text, "node-3");
    }

    #[test]
    fn test_strdupf_long_output_allocates_exact_size() {
        let long = "x".repeat(STRDUPF_SCRATCH * 2);
        let text = strdupf("<%s>", &[long.as_str().into()]).unwrap();
        assert_eq!(text.len(), long.len() + 2);
        assert!(text.to_bytes().starts_with(b"<xx"));
        assert!(text.to_bytes().ends_with(b"x>"));
    }

    #[test]
    fn test_strdupf_exactly_scratch_sized_output() {
        let text = "y".repeat(STRDUPF_SCRATCH);
        let copy = strdupf("%s", &[text.as_str().into()]).unwrap();
        assert_eq!(copy.len(), STRDUPF_SCRATCH);
    }

    #[test]
    fn test_strdupf_malformed_format_is_none() {
        assert!(strdupf("%q", &[]).is_none());
        assert!(strdupf("%d", &[]).is_none());
    }

    #[test]
    fn test_vstrdupf_consumes_cursor() {
        let args = [FormatArg::from("a"), FormatArg::from("b")];
        let mut list = ArgList::new(&args);
        let first = vstrdupf("%s", &mut list).unwrap();
        let second = vstrdupf("%s", &mut list).unwrap();
        assert_eq!(first, "a");
        assert_eq!(second, "b");
        assert_eq!(list.remaining(), 0);
    }
}
