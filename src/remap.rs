//! Compiler-family detection and POSIX symbol remapping
//!
//! The Microsoft C runtime renames the POSIX I/O and string functions to
//! `_name` and ships a compatibility layer under the original names. That
//! layer can allocate from a different heap than `malloc`/`free`, so blocks
//! returned by e.g. `strdup` corrupt the heap when released. On that family
//! every binding in [`crate::sys`] links against the underscore names; this
//! module is the table those bindings follow.

use serde::Serialize;

/// Toolchain family the crate was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerFamily {
    /// Microsoft C runtime (`target_env = "msvc"`)
    Msvc,
    /// GNU-compatible C runtime (glibc, musl, MinGW)
    Gnu,
    /// Anything else; bound with the standard names
    Other,
}

/// A single name substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolRemap {
    /// POSIX-style name the rest of the library assumes
    pub standard: &'static str,
    /// Name the family actually exports
    pub actual: &'static str,
}

const MSVC_REMAPS: &[SymbolRemap] = &[
    SymbolRemap { standard: "close", actual: "_close" },
    SymbolRemap { standard: "open", actual: "_open" },
    SymbolRemap { standard: "read", actual: "_read" },
    SymbolRemap { standard: "snprintf", actual: "_snprintf" },
    SymbolRemap { standard: "strdup", actual: "_strdup" },
    SymbolRemap { standard: "vsnprintf", actual: "_vsnprintf" },
    SymbolRemap { standard: "write", actual: "_write" },
];

impl CompilerFamily {
    /// Family detected for the current build
    #[cfg(target_env = "msvc")]
    pub const CURRENT: Self = CompilerFamily::Msvc;

    /// Family detected for the current build
    #[cfg(all(
        not(target_env = "msvc"),
        any(target_env = "gnu", target_env = "musl", target_os = "macos")
    ))]
    pub const CURRENT: Self = CompilerFamily::Gnu;

    /// Family detected for the current build
    #[cfg(not(any(
        target_env = "msvc",
        target_env = "gnu",
        target_env = "musl",
        target_os = "macos"
    )))]
    pub const CURRENT: Self = CompilerFamily::Other;

    /// Substitutions applied for this family
    pub const fn remaps(self) -> &'static [SymbolRemap] {
        match self {
            CompilerFamily::Msvc => MSVC_REMAPS,
            CompilerFamily::Gnu | CompilerFamily::Other => &[],
        }
    }

    /// Returns the symbol a call to `name` links against
    pub fn resolve(self, name: &str) -> &str {
        self.remaps()
            .iter()
            .find(|remap| remap.standard == name)
            .map_or(name, |remap| remap.actual)
    }

    /// Returns true when `name` is this family's unsafe compatibility shim
    pub fn is_compat_shim(self, name: &str) -> bool {
        self.remaps().iter().any(|remap| remap.standard == name)
    }

    /// Short identifier used in build reports
    pub fn as_str(self) -> &'static str {
        match self {
            CompilerFamily::Msvc => "msvc",
            CompilerFamily::Gnu => "gnu",
            CompilerFamily::Other => "other",
        }
    }
}
