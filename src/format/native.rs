//! Conversion rendering through the platform's own `snprintf`
//!
//! Stable Rust cannot build a `va_list`, so each conversion is rebuilt as a
//! single-argument directive and handed to the C formatter with a correctly
//! typed argument. Integers are widened to `long long` after C promotion has
//! already been applied, which renders the same digits. `%s` needs no C
//! formatting and is copied directly.

use super::{Output, Render, ResolvedSpec, Value};
use crate::error::FormatError;
use crate::format::FormatSpec;
use crate::sys;
use smallvec::SmallVec;
use std::ffi::{c_char, c_double, c_int, c_longlong, c_ulonglong, c_void};

/// Largest scratch buffer tried for a formatter that gives no length hint
const MAX_UNHINTED_CONVERSION: usize = 1 << 20;

/// Renders conversions with the C runtime's formatter
pub(crate) struct Native;

impl Render for Native {
    fn render(
        out: &mut Output<'_>,
        spec: &ResolvedSpec,
        value: Value<'_>,
        at: &FormatSpec,
    ) -> Result<(), FormatError> {
        match value {
            Value::Percent => {
                out.push(b"%");
                return Ok(());
            }
            Value::Str(s) => {
                push_string(out, spec, s);
                return Ok(());
            }
            _ => {}
        }

        let directive = build_directive(spec, &value);
        let format = directive.as_ptr().cast::<c_char>();

        render_directive(out, at, |buf, len| unsafe {
            match value {
                Value::Signed(v) => sys::snprintf(buf, len, format, v as c_longlong),
                Value::Unsigned(v) => sys::snprintf(buf, len, format, v as c_ulonglong),
                Value::Float(v) => sys::snprintf(buf, len, format, v as c_double),
                Value::Char(c) => sys::snprintf(buf, len, format, c as c_int),
                Value::Pointer(p) => sys::snprintf(buf, len, format, p as *const c_void),
                Value::Str(_) | Value::Percent => 0,
            }
        })
    }
}

/// Copies a string conversion, cut to the precision and padded to the width
fn push_string(out: &mut Output<'_>, spec: &ResolvedSpec, s: &[u8]) {
    let shown = &s[..spec.precision.unwrap_or(s.len()).min(s.len())];
    let padding = spec.width.saturating_sub(shown.len());
    if spec.flags.left {
        out.push(shown);
        out.push_repeat(b' ', padding);
    } else {
        out.push_repeat(b' ', padding);
        out.push(shown);
    }
}

/// Builds a NUL-terminated directive such as `%-+08.3lld`
fn build_directive(spec: &ResolvedSpec, value: &Value<'_>) -> SmallVec<[u8; 32]> {
    let mut directive: SmallVec<[u8; 32]> = SmallVec::new();
    directive.push(b'%');

    let flags = spec.flags;
    for (set, flag) in [
        (flags.left, b'-'),
        (flags.plus, b'+'),
        (flags.space, b' '),
        (flags.alternate, b'#'),
        (flags.zero, b'0'),
    ] {
        if set {
            directive.push(flag);
        }
    }

    if spec.width > 0 {
        directive.extend_from_slice(spec.width.to_string().as_bytes());
    }

    if let Some(precision) = spec.precision {
        directive.push(b'.');
        directive.extend_from_slice(precision.to_string().as_bytes());
    }

    match value {
        Value::Signed(_) | Value::Unsigned(_) => {
            directive.extend_from_slice(b"ll");
            directive.push(spec.conversion as u8);
        }
        Value::Float(_) => directive.push(spec.conversion as u8),
        Value::Char(_) => directive.push(b'c'),
        Value::Pointer(_) => directive.push(b'p'),
        Value::Str(_) | Value::Percent => directive.push(spec.conversion as u8),
    }

    directive.push(0);
    directive
}

fn render_directive<F>(out: &mut Output<'_>, at: &FormatSpec, mut call: F) -> Result<(), FormatError>
where
    F: FnMut(*mut c_char, usize) -> c_int,
{
    let failure = FormatError::PlatformFailure { offset: at.offset };
    let mut scratch: SmallVec<[u8; 64]> = SmallVec::from_elem(0, 64);

    loop {
        let written = call(scratch.as_mut_ptr().cast::<c_char>(), scratch.len());
        if written >= 0 && (written as usize) < scratch.len() {
            out.push(&scratch[..written as usize]);
            return Ok(());
        }

        let next = if sys::SNPRINTF_REPORTS_LENGTH {
            if written < 0 {
                return Err(failure);
            }
            written as usize + 1
        } else {
            // Truncation gives no length hint; grow geometrically
            let next = scratch.len() * 2;
            if next > MAX_UNHINTED_CONVERSION {
                return Err(failure);
            }
            next
        };
        scratch.resize(next, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{ArgList, FormatArg, format_with};

    fn render(format: &str, args: &[FormatArg<'_>]) -> String {
        let mut buf = [0u8; 128];
        let mut out = Output::new(&mut buf);
        format_with::<Native>(&mut out, format, &mut ArgList::new(args)).unwrap();
        let len = out.finish();
        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn test_directive_widens_integers() {
        let spec = ResolvedSpec {
            flags: crate::format::FormatFlags {
                left: true,
                zero: true,
                ..Default::default()
            },
            width: 8,
            precision: Some(3),
            conversion: 'd',
        };
        let directive = build_directive(&spec, &Value::Signed(1));
        assert_eq!(directive.as_slice(), b"%-08.3lld\0");
    }

    #[test]
    fn test_native_matches_c_output() {
        assert_eq!(render("%d|%5s|%x", &[12345.into(), "ab".into(), 255u32.into()]), "12345|   ab|ff");
        assert_eq!(render("%.3f", &[2.0.into()]), "2.000");
        assert_eq!(render("%.2s", &["node".into()]), "no");
        assert_eq!(render("%hhu", &[(-1).into()]), "255");
    }

    #[test]
    fn test_strings_are_copied_without_size_limit() {
        let text = "t".repeat(2 << 20);
        let mut buf = [0u8; 8];
        let mut out = Output::new(&mut buf);
        let args = [FormatArg::from(text.as_str())];
        format_with::<Native>(&mut out, "%s", &mut ArgList::new(&args)).unwrap();
        assert_eq!(out.finish(), 2 << 20);
        assert_eq!(&buf, b"ttttttt\0");

        assert_eq!(render("[%-5s|%5.2s]", &["ab".into(), "node".into()]), "[ab   |   no]");
    }

    #[cfg(not(target_env = "msvc"))]
    #[test]
    fn test_reported_length_is_not_capped() {
        let mut buf = [0u8; 8];
        let mut out = Output::new(&mut buf);
        let args = [FormatArg::from(7)];
        format_with::<Native>(&mut out, "%2000000d", &mut ArgList::new(&args)).unwrap();
        assert_eq!(out.finish(), 2_000_000);
        assert_eq!(&buf, b"       \0");
    }

    #[test]
    fn test_long_conversion_grows_scratch() {
        let text = render("%100d", &[1.into()]);
        assert_eq!(text.len(), 100);
        assert!(text.ends_with('1'));
    }
}
