//! Raw bindings to the C runtime, one file per compiler family.
//!
//! Everything here is the family's real symbol. MSVC builds link against the
//! underscore names from [`crate::remap`]; every other target binds the
//! standard names through `libc`.

#[cfg(target_env = "msvc")]
#[path = "msvc.rs"]
mod family;

#[cfg(not(target_env = "msvc"))]
#[path = "posix.rs"]
mod family;

pub(crate) use family::*;

/// C stream type accepted by the character-read binding
pub type FILE = libc::FILE;
