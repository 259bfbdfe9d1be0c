//! printf-style formatting into bounded buffers
//!
//! Architecture:
//! - `spec` parses format strings into literal text and conversions
//! - `portable` renders conversions in Rust (the fallback path)
//! - `native` renders each conversion through the platform's `snprintf`
//!
//! Arguments are passed as [`FormatArg`] values. [`ArgList`] is the
//! `va_list` counterpart: a cursor the `v*` functions consume.

pub mod spec;

#[cfg(not(all(feature = "have-snprintf", feature = "have-vsnprintf")))]
pub(crate) mod portable;

#[cfg(any(feature = "have-snprintf", feature = "have-vsnprintf"))]
pub(crate) mod native;

pub use spec::{
    FormatFlags, FormatSegment, FormatSegments, FormatSpec, LengthMod, Precision, Width,
    parse_format_spec, parse_format_string,
};

use crate::error::FormatError;
use std::ffi::CStr;

/// One formatting argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(u8),
    /// Byte string; rendering stops at the first NUL, if any
    Str(&'a [u8]),
    Pointer(usize),
}

impl FormatArg<'_> {
    /// Kind name used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            FormatArg::Int(_) => "signed integer",
            FormatArg::Uint(_) => "unsigned integer",
            FormatArg::Float(_) => "float",
            FormatArg::Char(_) => "character",
            FormatArg::Str(_) => "string",
            FormatArg::Pointer(_) => "pointer",
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FormatArg<'_> {
            fn from(value: $t) -> Self {
                FormatArg::Int(value as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FormatArg<'_> {
            fn from(value: $t) -> Self {
                FormatArg::Uint(value as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u16, u32, u64, usize);

impl From<u8> for FormatArg<'_> {
    fn from(value: u8) -> Self {
        FormatArg::Char(value)
    }
}

impl From<f32> for FormatArg<'_> {
    fn from(value: f32) -> Self {
        FormatArg::Float(value as f64)
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

impl From<bool> for FormatArg<'_> {
    fn from(value: bool) -> Self {
        FormatArg::Int(value as i64)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(value: &'a str) -> Self {
        FormatArg::Str(value.as_bytes())
    }
}

impl<'a> From<&'a String> for FormatArg<'a> {
    fn from(value: &'a String) -> Self {
        FormatArg::Str(value.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(value: &'a [u8]) -> Self {
        FormatArg::Str(value)
    }
}

impl<'a> From<&'a CStr> for FormatArg<'a> {
    fn from(value: &'a CStr) -> Self {
        FormatArg::Str(value.to_bytes())
    }
}

impl<T> From<*const T> for FormatArg<'_> {
    fn from(value: *const T) -> Self {
        FormatArg::Pointer(value as usize)
    }
}

impl<T> From<*mut T> for FormatArg<'_> {
    fn from(value: *mut T) -> Self {
        FormatArg::Pointer(value as usize)
    }
}

/// Cursor over formatting arguments
///
/// Cloning the list snapshots the cursor, the way `va_copy` does.
#[derive(Debug, Clone)]
pub struct ArgList<'a, 'b> {
    args: &'b [FormatArg<'a>],
    next: usize,
}

impl<'a, 'b> ArgList<'a, 'b> {
    pub fn new(args: &'b [FormatArg<'a>]) -> Self {
        Self { args, next: 0 }
    }

    /// Number of arguments not yet consumed
    pub fn remaining(&self) -> usize {
        self.args.len() - self.next
    }

    /// Takes the next argument
    pub fn next_arg(&mut self) -> Option<FormatArg<'a>> {
        let arg = self.args.get(self.next).copied()?;
        self.next += 1;
        Some(arg)
    }
}

/// Writer that never exceeds its buffer and keeps room for the NUL
///
/// `total` counts every byte offered, so callers learn how long the full
/// rendering would have been.
#[derive(Debug)]
pub(crate) struct Output<'b> {
    buf: &'b mut [u8],
    stored: usize,
    total: usize,
}

impl<'b> Output<'b> {
    pub(crate) fn new(buf: &'b mut [u8]) -> Self {
        Self {
            buf,
            stored: 0,
            total: 0,
        }
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        let capacity = self.buf.len().saturating_sub(1);
        if self.stored < capacity {
            let count = bytes.len().min(capacity - self.stored);
            self.buf[self.stored..self.stored + count].copy_from_slice(&bytes[..count]);
            self.stored += count;
        }
        self.total += bytes.len();
    }

    pub(crate) fn push_repeat(&mut self, byte: u8, count: usize) {
        let chunk = [byte; 32];
        let mut left = count;
        while left > 0 {
            let step = left.min(chunk.len());
            self.push(&chunk[..step]);
            left -= step;
        }
    }

    /// Terminates the buffer and returns the untruncated length
    pub(crate) fn finish(self) -> usize {
        if let Some(terminator) = self.buf.get_mut(self.stored) {
            *terminator = 0;
        }
        self.total
    }
}

/// A conversion with its `*` width and precision taken from the arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedSpec {
    pub(crate) flags: FormatFlags,
    pub(crate) width: usize,
    pub(crate) precision: Option<usize>,
    pub(crate) conversion: char,
}

/// An argument converted to what its conversion consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Value<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Char(u8),
    Str(&'a [u8]),
    Pointer(usize),
    /// `%%`-style conversions take no argument
    Percent,
}

/// Renders a single conversion
pub(crate) trait Render {
    fn render(
        out: &mut Output<'_>,
        spec: &ResolvedSpec,
        value: Value<'_>,
        at: &FormatSpec,
    ) -> Result<(), FormatError>;
}

/// Runs `format` against `args`, rendering conversions with `R`
pub(crate) fn format_with<R: Render>(
    out: &mut Output<'_>,
    format: &str,
    args: &mut ArgList<'_, '_>,
) -> Result<(), FormatError> {
    for segment in parse_format_string(format) {
        match segment? {
            FormatSegment::Literal(text) => out.push(text.as_bytes()),
            FormatSegment::Conversion(spec) => {
                let resolved = resolve_spec(&spec, args)?;
                let value = take_value(&spec, args)?;
                R::render(out, &resolved, value, &spec)?;
            }
        }
    }
    Ok(())
}

fn resolve_spec(spec: &FormatSpec, args: &mut ArgList<'_, '_>) -> Result<ResolvedSpec, FormatError> {
    let mut flags = spec.flags;
    let width = match spec.width {
        Width::None => 0,
        Width::Fixed(width) => width,
        Width::Star => {
            let width = take_star(spec, args)?;
            if width < 0 {
                flags.left = true;
            }
            width.unsigned_abs() as usize
        }
    };
    let precision = match spec.precision {
        Precision::None => None,
        Precision::Fixed(precision) => Some(precision),
        Precision::Star => {
            // A negative precision is taken as if omitted
            let precision = take_star(spec, args)?;
            (precision >= 0).then_some(precision as usize)
        }
    };
    Ok(ResolvedSpec {
        flags,
        width,
        precision,
        conversion: spec.conversion,
    })
}

fn take_star(spec: &FormatSpec, args: &mut ArgList<'_, '_>) -> Result<i32, FormatError> {
    match args.next_arg() {
        Some(FormatArg::Int(value)) => Ok(value as i32),
        Some(FormatArg::Uint(value)) => Ok(value as i32),
        Some(other) => Err(mismatch(spec, "integer field width", &other)),
        None => Err(FormatError::MissingArgument { offset: spec.offset }),
    }
}

fn take_value<'a>(spec: &FormatSpec, args: &mut ArgList<'a, '_>) -> Result<Value<'a>, FormatError> {
    if spec.conversion == '%' {
        return Ok(Value::Percent);
    }
    let arg = args
        .next_arg()
        .ok_or(FormatError::MissingArgument { offset: spec.offset })?;
    let bits = spec.length.integer_bits();

    let value = match (spec.conversion, arg) {
        ('d' | 'i', FormatArg::Int(v)) => Value::Signed(narrow_signed(v, bits)),
        ('d' | 'i', FormatArg::Uint(v)) => Value::Signed(narrow_signed(v as i64, bits)),
        ('d' | 'i', FormatArg::Char(v)) => Value::Signed(v as i64),
        ('u' | 'o' | 'x' | 'X', FormatArg::Uint(v)) => Value::Unsigned(narrow_unsigned(v, bits)),
        ('u' | 'o' | 'x' | 'X', FormatArg::Int(v)) => {
            Value::Unsigned(narrow_unsigned(v as u64, bits))
        }
        ('u' | 'o' | 'x' | 'X', FormatArg::Char(v)) => Value::Unsigned(v as u64),
        ('f' | 'F' | 'e' | 'E' | 'g' | 'G', FormatArg::Float(v)) => Value::Float(v),
        ('c', FormatArg::Char(v)) => Value::Char(v),
        ('c', FormatArg::Int(v)) => Value::Char(v as u8),
        ('c', FormatArg::Uint(v)) => Value::Char(v as u8),
        ('s', FormatArg::Str(v)) => {
            let end = v.iter().position(|&b| b == 0).unwrap_or(v.len());
            Value::Str(&v[..end])
        }
        ('p', FormatArg::Pointer(v)) => Value::Pointer(v),
        ('p', FormatArg::Uint(v)) => Value::Pointer(v as usize),
        (conversion, other) => {
            let expected = match conversion {
                'd' | 'i' | 'u' | 'o' | 'x' | 'X' => "integer",
                'f' | 'F' | 'e' | 'E' | 'g' | 'G' => "float",
                'c' => "character",
                's' => "string",
                _ => "pointer",
            };
            return Err(mismatch(spec, expected, &other));
        }
    };
    Ok(value)
}

fn narrow_signed(value: i64, bits: u32) -> i64 {
    match bits {
        8 => value as i8 as i64,
        16 => value as i16 as i64,
        32 => value as i32 as i64,
        _ => value,
    }
}

fn narrow_unsigned(value: u64, bits: u32) -> u64 {
    match bits {
        8 => value as u8 as u64,
        16 => value as u16 as u64,
        32 => value as u32 as u64,
        _ => value,
    }
}

fn mismatch(spec: &FormatSpec, expected: &'static str, found: &FormatArg<'_>) -> FormatError {
    FormatError::ArgumentMismatch {
        conversion: spec.conversion,
        expected,
        found: found.kind(),
        offset: spec.offset,
    }
}
