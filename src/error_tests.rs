//! Tests for error reporting
//!
//! Checks that format errors carry the offset of the offending conversion,
//! that messages read well, and that conversions between error types keep
//! the underlying cause.

#[cfg(test)]
mod tests {
    use crate::error::{FormatError, FormatOffset, PlatformError};
    use crate::strings::{snprintf, vsnprintf};
    use crate::{ArgList, FormatArg};

    #[test]
    fn test_offset_points_at_conversion() {
        let mut buf = [0u8; 32];
        let error = snprintf(&mut buf, "<%s %y>", &["node".into()]).unwrap_err();
        assert_eq!(error.offset(), FormatOffset(4));
        match error {
            FormatError::UnknownConversion { conversion, .. } => assert_eq!(conversion, 'y'),
            _ => panic!("Expected UnknownConversion error, got: {:?}", error),
        }
    }

    #[test]
    fn test_offset_annotation() {
        let annotated = FormatOffset(4).annotate("<%s %y>");
        assert_eq!(annotated, "<%s %y>\n    ^");
    }

    #[test]
    fn test_missing_argument() {
        let mut buf = [0u8; 32];
        let error = snprintf(&mut buf, "%d and %d", &[1.into()]).unwrap_err();
        assert_eq!(
            error,
            FormatError::MissingArgument {
                offset: FormatOffset(7)
            }
        );
    }

    #[test]
    fn test_output_before_error_is_terminated() {
        let mut buf = [0xffu8; 16];
        let result = snprintf(&mut buf, "abc%", &[]);
        assert!(matches!(result, Err(FormatError::Incomplete { .. })));
        // Literal text before the failing conversion is kept and terminated
        assert_eq!(&buf[..4], b"abc\0");
    }

    #[test]
    fn test_argument_mismatch_message() {
        let mut buf = [0u8; 32];
        let error = snprintf(&mut buf, "%f", &["text".into()]).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("%f"));
        assert!(message.contains("float"));
        assert!(message.contains("string"));
        assert!(message.contains("offset 0"));
    }

    #[test]
    fn test_vsnprintf_reports_same_errors() {
        let args = [FormatArg::from(1)];
        let mut list = ArgList::new(&args);
        let mut buf = [0u8; 8];
        let error = vsnprintf(&mut buf, "%n", &mut list).unwrap_err();
        assert!(matches!(error, FormatError::Unsupported { conversion: 'n', .. }));
    }

    #[test]
    fn test_platform_error_conversions() {
        let error: PlatformError = FormatError::Incomplete {
            offset: FormatOffset(2),
        }
        .into();
        assert!(matches!(error, PlatformError::Format(_)));
        assert_eq!(error.to_string(), "Format error: Incomplete conversion at offset 2");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: PlatformError = io.into();
        assert!(error.to_string().starts_with("IO error"));

        let nul = std::ffi::CString::new("a\0b").unwrap_err();
        let error: PlatformError = nul.into();
        assert!(matches!(error, PlatformError::InteriorNul(_)));
    }

    #[test]
    fn test_allocation_errors_display_sizes() {
        let error = PlatformError::OutOfMemory { requested: 4096 };
        assert_eq!(error.to_string(), "Allocation of 4096 bytes failed");

        let error = PlatformError::SizeOverflow { count: 3, size: 7 };
        assert_eq!(error.to_string(), "Allocation size overflow: 3 x 7");
    }
}
