//! Conversion specification parsing

use crate::error::{FormatError, FormatOffset};

/// Flag characters of a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    /// `-`: left-justify within the field
    pub left: bool,
    /// `+`: always print a sign
    pub plus: bool,
    /// ` `: space in place of a `+` sign
    pub space: bool,
    /// `#`: alternate form
    pub alternate: bool,
    /// `0`: pad with zeros
    pub zero: bool,
}

/// Field width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    /// Taken from the argument list
    Star,
}

/// Precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    /// Taken from the argument list
    Star,
}

/// Length modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    /// `hh`
    Char,
    /// `h`
    Short,
    /// `l`
    Long,
    /// `ll`
    LongLong,
    /// `j`
    IntMax,
    /// `z`
    Size,
    /// `t`
    PtrDiff,
    /// `L`
    LongDouble,
}

impl LengthMod {
    /// Bit width integer arguments are narrowed to, following C promotion
    pub fn integer_bits(self) -> u32 {
        match self {
            LengthMod::Char => 8,
            LengthMod::Short => 16,
            LengthMod::None => 32,
            LengthMod::Long
            | LengthMod::LongLong
            | LengthMod::IntMax
            | LengthMod::Size
            | LengthMod::PtrDiff
            | LengthMod::LongDouble => 64,
        }
    }
}

/// A parsed `%` conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: char,
    /// Byte offset of the `%` in the format string
    pub offset: FormatOffset,
}

/// Piece of a format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSegment<'f> {
    /// Text copied verbatim
    Literal(&'f str),
    /// A conversion consuming arguments
    Conversion(FormatSpec),
}

/// Splits a format string into literal text and conversions
pub fn parse_format_string(format: &str) -> FormatSegments<'_> {
    FormatSegments {
        format,
        position: 0,
    }
}

/// Iterator returned by [`parse_format_string`]
#[derive(Debug, Clone)]
pub struct FormatSegments<'f> {
    format: &'f str,
    position: usize,
}

impl<'f> Iterator for FormatSegments<'f> {
    type Item = Result<FormatSegment<'f>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.format[self.position..];
        if rest.is_empty() {
            return None;
        }

        if rest.starts_with("%%") {
            let start = self.position + 1;
            self.position += 2;
            return Some(Ok(FormatSegment::Literal(&self.format[start..start + 1])));
        }

        if rest.starts_with('%') {
            let result = parse_format_spec(self.format, self.position);
            return Some(match result {
                Ok((spec, next)) => {
                    self.position = next;
                    Ok(FormatSegment::Conversion(spec))
                }
                Err(error) => {
                    self.position = self.format.len();
                    Err(error)
                }
            });
        }

        let end = rest.find('%').unwrap_or(rest.len());
        self.position += end;
        Some(Ok(FormatSegment::Literal(&rest[..end])))
    }
}

/// Parses the conversion starting at `offset` (which must point at `%`)
///
/// Returns the specification and the offset just past it.
pub fn parse_format_spec(format: &str, offset: usize) -> Result<(FormatSpec, usize), FormatError> {
    let bytes = format.as_bytes();
    let at = FormatOffset(offset);
    let mut i = offset + 1;

    let mut flags = FormatFlags::default();
    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => flags.left = true,
            b'+' => flags.plus = true,
            b' ' => flags.space = true,
            b'#' => flags.alternate = true,
            b'0' => flags.zero = true,
            _ => break,
        }
        i += 1;
    }

    let width = if bytes.get(i) == Some(&b'*') {
        i += 1;
        Width::Star
    } else {
        match parse_digits(bytes, &mut i, at)? {
            Some(value) => Width::Fixed(value),
            None => Width::None,
        }
    };

    let precision = if bytes.get(i) == Some(&b'.') {
        i += 1;
        if bytes.get(i) == Some(&b'*') {
            i += 1;
            Precision::Star
        } else {
            // A lone '.' means precision zero
            Precision::Fixed(parse_digits(bytes, &mut i, at)?.unwrap_or(0))
        }
    } else {
        Precision::None
    };

    let length = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'h'), Some(b'h')) => {
            i += 2;
            LengthMod::Char
        }
        (Some(b'l'), Some(b'l')) => {
            i += 2;
            LengthMod::LongLong
        }
        (Some(b'h'), _) => {
            i += 1;
            LengthMod::Short
        }
        (Some(b'l'), _) => {
            i += 1;
            LengthMod::Long
        }
        (Some(b'j'), _) => {
            i += 1;
            LengthMod::IntMax
        }
        (Some(b'z'), _) => {
            i += 1;
            LengthMod::Size
        }
        (Some(b't'), _) => {
            i += 1;
            LengthMod::PtrDiff
        }
        (Some(b'L'), _) => {
            i += 1;
            LengthMod::LongDouble
        }
        _ => LengthMod::None,
    };

    let conversion = match format[i.min(format.len())..].chars().next() {
        Some(c) => c,
        None => return Err(FormatError::Incomplete { offset: at }),
    };

    match conversion {
        'd' | 'i' | 'u' | 'o' | 'x' | 'X' | 'c' | 's' | 'p' | 'f' | 'F' | 'e' | 'E' | 'g'
        | 'G' | '%' => {}
        'n' | 'a' | 'A' => {
            return Err(FormatError::Unsupported {
                conversion,
                offset: at,
            });
        }
        other => {
            return Err(FormatError::UnknownConversion {
                conversion: other,
                offset: at,
            });
        }
    }

    let spec = FormatSpec {
        flags,
        width,
        precision,
        length,
        conversion,
        offset: at,
    };
    Ok((spec, i + conversion.len_utf8()))
}

/// Reads a decimal field, which must fit a C `int`
fn parse_digits(bytes: &[u8], i: &mut usize, at: FormatOffset) -> Result<Option<usize>, FormatError> {
    let start = *i;
    let mut value: usize = 0;
    while let Some(&b) = bytes.get(*i) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as usize);
        if value > i32::MAX as usize {
            return Err(FormatError::FieldOverflow { offset: at });
        }
        *i += 1;
    }
    Ok((*i > start).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(format: &str) -> FormatSpec {
        match parse_format_string(format).next() {
            Some(Ok(FormatSegment::Conversion(spec))) => spec,
            other => panic!("Expected a conversion, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_flags_width_precision_length() {
        let spec = single("%-+08.3lld");
        assert!(spec.flags.left);
        assert!(spec.flags.plus);
        assert!(spec.flags.zero);
        assert!(!spec.flags.space);
        assert_eq!(spec.width, Width::Fixed(8));
        assert_eq!(spec.precision, Precision::Fixed(3));
        assert_eq!(spec.length, LengthMod::LongLong);
        assert_eq!(spec.conversion, 'd');
    }

    #[test]
    fn test_parse_star_width_and_precision() {
        let spec = single("%*.*s");
        assert_eq!(spec.width, Width::Star);
        assert_eq!(spec.precision, Precision::Star);
        assert_eq!(spec.conversion, 's');
    }

    #[test]
    fn test_lone_dot_is_zero_precision() {
        assert_eq!(single("%.f").precision, Precision::Fixed(0));
    }

    #[test]
    fn test_segments_split_literals() {
        let segments: Vec<_> = parse_format_string("<%s>%d%%")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], FormatSegment::Literal("<"));
        assert!(matches!(segments[1], FormatSegment::Conversion(FormatSpec { conversion: 's', .. })));
        assert_eq!(segments[2], FormatSegment::Literal(">"));
        assert!(matches!(segments[3], FormatSegment::Conversion(FormatSpec { conversion: 'd', .. })));
        assert_eq!(segments[4], FormatSegment::Literal("%"));
    }

    #[test]
    fn test_errors_carry_offset() {
        let error = parse_format_string("abc%q").find_map(Result::err).unwrap();
        assert_eq!(
            error,
            FormatError::UnknownConversion {
                conversion: 'q',
                offset: FormatOffset(3)
            }
        );

        let error = parse_format_string("%n").find_map(Result::err).unwrap();
        assert!(matches!(error, FormatError::Unsupported { conversion: 'n', .. }));

        let error = parse_format_string("width %12").find_map(Result::err).unwrap();
        assert_eq!(error, FormatError::Incomplete { offset: FormatOffset(6) });
    }

    #[test]
    fn test_fields_beyond_int_range_rejected() {
        let error = parse_format_spec("x %99999999999d", 2).unwrap_err();
        assert_eq!(error, FormatError::FieldOverflow { offset: FormatOffset(2) });

        let error = parse_format_spec("%.3000000000f", 0).unwrap_err();
        assert!(matches!(error, FormatError::FieldOverflow { .. }));

        let spec = single("%2147483647.2147483647d");
        assert_eq!(spec.width, Width::Fixed(2147483647));
        assert_eq!(spec.precision, Precision::Fixed(2147483647));
    }

    #[test]
    fn test_integer_bits_follow_promotion() {
        assert_eq!(LengthMod::None.integer_bits(), 32);
        assert_eq!(LengthMod::Char.integer_bits(), 8);
        assert_eq!(LengthMod::Short.integer_bits(), 16);
        assert_eq!(LengthMod::Size.integer_bits(), 64);
    }
}
