//! Error types for the platform layer
//!
//! Safe wrappers report failures through [`PlatformError`]. The format engine
//! reports malformed format strings through [`FormatError`], tagged with the
//! byte offset of the offending conversion so callers can point at it.

use std::fmt;
use thiserror::Error;

/// Byte offset of a conversion inside a format string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatOffset(pub usize);

impl FormatOffset {
    /// Returns the offset as a plain index
    pub fn get(self) -> usize {
        self.0
    }

    /// Renders the format string with a caret under the offending byte
    pub fn annotate(self, format: &str) -> String {
        let column = format[..self.0.min(format.len())].chars().count();
        format!("{}\n{}^", format, " ".repeat(column))
    }
}

impl fmt::Display for FormatOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.0)
    }
}

/// Main error type for platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Descriptor I/O failed; carries the OS error reported by the binding
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bound allocator returned null
    #[error("Allocation of {requested} bytes failed")]
    OutOfMemory { requested: usize },

    /// `count * size` does not fit in `usize`
    #[error("Allocation size overflow: {count} x {size}")]
    SizeOverflow { count: usize, size: usize },

    /// A path or string handed to a C binding contained a NUL byte
    #[error("Interior NUL byte: {0}")]
    InteriorNul(#[from] std::ffi::NulError),

    /// Formatting failed
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

/// Format string errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Conversion character not known to the engine
    #[error("Unknown conversion '%{conversion}' at {offset}")]
    UnknownConversion {
        conversion: char,
        offset: FormatOffset,
    },

    /// Conversion known but deliberately not supported (`%n`, `%a`)
    #[error("Unsupported conversion '%{conversion}' at {offset}")]
    Unsupported {
        conversion: char,
        offset: FormatOffset,
    },

    /// Format string ended in the middle of a conversion
    #[error("Incomplete conversion at {offset}")]
    Incomplete { offset: FormatOffset },

    /// A width or precision written in the format does not fit a C `int`
    #[error("Field width or precision at {offset} exceeds the int range")]
    FieldOverflow { offset: FormatOffset },

    /// The argument list ran out
    #[error("Missing argument for conversion at {offset}")]
    MissingArgument { offset: FormatOffset },

    /// Argument kind does not fit the conversion
    #[error("Conversion '%{conversion}' at {offset} expects {expected}, got {found}")]
    ArgumentMismatch {
        conversion: char,
        expected: &'static str,
        found: &'static str,
        offset: FormatOffset,
    },

    /// The platform's own formatter reported failure
    #[error("Platform formatter failed at {offset}")]
    PlatformFailure { offset: FormatOffset },
}

impl FormatError {
    /// Offset of the conversion that caused the error
    pub fn offset(&self) -> FormatOffset {
        match self {
            FormatError::UnknownConversion { offset, .. }
            | FormatError::Unsupported { offset, .. }
            | FormatError::Incomplete { offset }
            | FormatError::FieldOverflow { offset }
            | FormatError::MissingArgument { offset }
            | FormatError::ArgumentMismatch { offset, .. }
            | FormatError::PlatformFailure { offset } => *offset,
        }
    }
}

/// Result alias for platform operations
pub type Result<T, E = PlatformError> = std::result::Result<T, E>;
