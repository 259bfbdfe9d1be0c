//! # mxml-platform
//!
//! The platform layer of the Mini-XML parser: every low-level operation the
//! parser performs, bound once when the crate is compiled.
//!
//! ## Overview
//!
//! Different C runtimes disagree on function names and on which string
//! utilities they ship. This crate hides those differences behind one table
//! so the parser's code is identical on every target.
//!
//! ## Key Features
//!
//! - **Indirection Points**: descriptor I/O, allocator, stream reads and
//!   diagnostics are associated functions of [`Platform`], overridable one at
//!   a time by an embedding application
//! - **Symbol Remapping**: MSVC builds bind the real `_open`/`_read`/...
//!   symbols, never the heap-unsafe compatibility shims
//! - **String Fallbacks**: [`strdup`], [`strlcpy`], [`snprintf`] and
//!   [`vsnprintf`] come from the runtime or from internal implementations,
//!   selected by cargo features
//! - **Static Dispatch**: no binding is ever chosen at runtime
//! - **C ABI**: optional unmangled exports for C and C++ callers
//!
//! ## Basic Usage
//!
//! ```rust
//! use mxml_platform::{Block, Descriptor, System};
//!
//! let path = std::env::temp_dir().join("mxml-platform-doc.xml");
//! let mut out = Descriptor::<System>::create(&path)?;
//! out.write_bytes(b"<?xml version=\"1.0\"?><root/>")?;
//! out.close()?;
//!
//! let mut input = Descriptor::<System>::open_read(&path)?;
//! let mut block = Block::<System>::zeroed(64, 1)?;
//! let len = input.read_bytes(&mut block)?;
//! assert!(block[..len].starts_with(b"<?xml"));
//! # std::fs::remove_file(&path)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Overriding Indirection Points
//!
//! ```rust
//! use mxml_platform::{mxml_log, Platform};
//! use std::fmt;
//!
//! struct Quiet;
//!
//! impl Platform for Quiet {
//!     fn log(_message: fmt::Arguments<'_>) {}
//! }
//!
//! mxml_log!(Quiet, "never printed");
//! ```
//!
//! ## Formatting
//!
//! ```rust
//! use mxml_platform::strdupf;
//!
//! let tag = strdupf!("<%s depth=\"%d\"/>", "leaf", 3).expect("allocation");
//! assert_eq!(tag, "<leaf depth=\"3\"/>");
//! ```
//!
//! ## Feature Flags
//!
//! - `logging`: request diagnostics; requires `log-stderr` or `log-tracing`
//! - `log-stderr`: write diagnostics to standard error
//! - `log-tracing`: emit diagnostics as `tracing` events
//! - `have-strdup`, `have-strlcpy`, `have-snprintf`, `have-vsnprintf`: use
//!   the runtime's implementation instead of the internal one
//! - `long-long`: reserved wide-integer marker
//! - `capi`: export the C-ABI entry points declared in
//!   `include/mxml_platform.h`

// Shared by `VERSION` and the NUL-terminated copy the C API hands out
macro_rules! version_string {
    () => {
        "Mini-XML v2.12"
    };
}

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod io;
pub mod platform;
pub mod remap;
pub mod strings;

mod sys;

#[cfg(feature = "capi")]
pub mod ffi;

#[cfg(test)]
mod error_tests;

/// Version string of the XML library this layer belongs to
pub const VERSION: &str = version_string!();

// Re-export main types and functions
pub use config::{BuildConfig, Capabilities};
pub use diagnostics::{DefaultDiagnostics, Diagnostics, Silent, Stderr, Tracing};
pub use error::{FormatError, FormatOffset, PlatformError};
pub use format::{ArgList, FormatArg};
pub use io::{Block, Descriptor};
pub use platform::{DefaultPlatform, EOF, FILE, Platform, System};
pub use remap::{CompilerFamily, SymbolRemap};
pub use strings::{HeapCString, snprintf, strdup, strdupf, strlcpy, vsnprintf, vstrdupf};
