//! Conversion rendering in Rust, used when the platform's formatter is absent

use super::{Output, Render, ResolvedSpec, Value};
use crate::error::FormatError;
use crate::format::FormatSpec;

/// Renders conversions without calling into the C runtime
pub(crate) struct Portable;

impl Render for Portable {
    fn render(
        out: &mut Output<'_>,
        spec: &ResolvedSpec,
        value: Value<'_>,
        _at: &FormatSpec,
    ) -> Result<(), FormatError> {
        match value {
            Value::Percent => out.push(b"%"),
            Value::Signed(v) => format_integer(out, spec, v < 0, v.unsigned_abs()),
            Value::Unsigned(v) => format_integer(out, spec, false, v),
            Value::Float(v) => format_float(out, spec, v),
            Value::Char(c) => emit_field(out, spec, b"", 0, &[c], false),
            Value::Str(s) => {
                let s = match spec.precision {
                    Some(precision) => &s[..s.len().min(precision)],
                    None => s,
                };
                emit_field(out, spec, b"", 0, s, false);
            }
            Value::Pointer(p) => {
                let mut digits = [0u8; 24];
                let digits = to_digits(p as u64, 16, false, &mut digits);
                emit_field(out, spec, b"0x", 0, digits, false);
            }
        }
        Ok(())
    }
}

/// Lays out `prefix`, `zeros` zero digits and `body` inside the field width
fn emit_field(
    out: &mut Output<'_>,
    spec: &ResolvedSpec,
    prefix: &[u8],
    zeros: usize,
    body: &[u8],
    zero_pad: bool,
) {
    let content = prefix.len() + zeros + body.len();
    let padding = spec.width.saturating_sub(content);

    if spec.flags.left {
        out.push(prefix);
        out.push_repeat(b'0', zeros);
        out.push(body);
        out.push_repeat(b' ', padding);
    } else if zero_pad && spec.flags.zero {
        out.push(prefix);
        out.push_repeat(b'0', padding + zeros);
        out.push(body);
    } else {
        out.push_repeat(b' ', padding);
        out.push(prefix);
        out.push_repeat(b'0', zeros);
        out.push(body);
    }
}

fn to_digits(mut value: u64, base: u64, upper: bool, buf: &mut [u8; 24]) -> &[u8] {
    let table: &[u8; 16] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = table[(value % base) as usize];
        value /= base;
        if value == 0 {
            break;
        }
    }
    &buf[start..]
}

fn format_integer(out: &mut Output<'_>, spec: &ResolvedSpec, negative: bool, magnitude: u64) {
    let (base, upper) = match spec.conversion {
        'o' => (8, false),
        'x' => (16, false),
        'X' => (16, true),
        _ => (10, false),
    };

    let mut storage = [0u8; 24];
    let mut digits = to_digits(magnitude, base, upper, &mut storage);
    if spec.precision == Some(0) && magnitude == 0 {
        digits = &digits[..0];
    }
    let mut zeros = spec.precision.unwrap_or(0).saturating_sub(digits.len());

    // Alternate octal always shows a leading zero
    if spec.conversion == 'o' && spec.flags.alternate && zeros == 0 && digits.first() != Some(&b'0')
    {
        zeros = 1;
    }

    let prefix: &[u8] = match spec.conversion {
        'd' | 'i' if negative => b"-",
        'd' | 'i' if spec.flags.plus => b"+",
        'd' | 'i' if spec.flags.space => b" ",
        'x' if spec.flags.alternate && magnitude != 0 => b"0x",
        'X' if spec.flags.alternate && magnitude != 0 => b"0X",
        _ => b"",
    };

    emit_field(out, spec, prefix, zeros, digits, spec.precision.is_none());
}

/// Fraction digits past which every `f64` renders as exact zeros
const MAX_FIXED_DIGITS: usize = 1100;

/// Mantissa digits past which every `f64` renders as exact zeros
const MAX_MANTISSA_DIGITS: usize = 800;

/// A rendered float: digits, exact trailing zeros, then the exponent suffix
///
/// Rust's formatter rejects precisions above `u16::MAX`, so digits past the
/// point where an `f64` has any are kept as a count instead of text.
#[derive(Debug)]
struct FloatText {
    body: String,
    zeros: usize,
    exponent: String,
}

impl FloatText {
    fn len(&self) -> usize {
        self.body.len() + self.zeros + self.exponent.len()
    }
}

fn format_float(out: &mut Output<'_>, spec: &ResolvedSpec, value: f64) {
    let upper = spec.conversion.is_ascii_uppercase();
    let prefix: &[u8] = if value.is_sign_negative() {
        b"-"
    } else if spec.flags.plus {
        b"+"
    } else if spec.flags.space {
        b" "
    } else {
        b""
    };

    if !value.is_finite() {
        let body: &[u8] = match (value.is_nan(), upper) {
            (true, false) => b"nan",
            (true, true) => b"NAN",
            (false, false) => b"inf",
            (false, true) => b"INF",
        };
        emit_field(out, spec, prefix, 0, body, false);
        return;
    }

    let magnitude = value.abs();
    let precision = spec.precision.unwrap_or(6);
    let alternate = spec.flags.alternate;
    let text = match spec.conversion.to_ascii_lowercase() {
        'f' => fixed(magnitude, precision, alternate),
        'e' => exponential(magnitude, precision, alternate, upper),
        _ => general(magnitude, precision, alternate, upper),
    };
    emit_float(out, spec, prefix, &text);
}

fn emit_float(out: &mut Output<'_>, spec: &ResolvedSpec, prefix: &[u8], text: &FloatText) {
    let padding = spec.width.saturating_sub(prefix.len() + text.len());

    if !spec.flags.left && !spec.flags.zero {
        out.push_repeat(b' ', padding);
    }
    out.push(prefix);
    if !spec.flags.left && spec.flags.zero {
        out.push_repeat(b'0', padding);
    }
    out.push(text.body.as_bytes());
    out.push_repeat(b'0', text.zeros);
    out.push(text.exponent.as_bytes());
    if spec.flags.left {
        out.push_repeat(b' ', padding);
    }
}

fn fixed(value: f64, precision: usize, alternate: bool) -> FloatText {
    let shown = precision.min(MAX_FIXED_DIGITS);
    let mut body = format!("{:.*}", shown, value);
    if alternate && precision == 0 {
        body.push('.');
    }
    FloatText {
        body,
        zeros: precision - shown,
        exponent: String::new(),
    }
}

/// Splits Rust's `{:e}` rendering into mantissa, exact zeros and exponent
fn scientific(value: f64, precision: usize) -> (String, usize, i32) {
    let shown = precision.min(MAX_MANTISSA_DIGITS);
    let text = format!("{:.*e}", shown, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => (
            mantissa.to_string(),
            precision - shown,
            exponent.parse().unwrap_or(0),
        ),
        None => (text, precision - shown, 0),
    }
}

fn exponent_suffix(exponent: i32, upper: bool) -> String {
    format!(
        "{}{}{:02}",
        if upper { 'E' } else { 'e' },
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    )
}

fn exponential(value: f64, precision: usize, alternate: bool, upper: bool) -> FloatText {
    let (mut body, zeros, exponent) = scientific(value, precision);
    if alternate && precision == 0 {
        body.push('.');
    }
    FloatText {
        body,
        zeros,
        exponent: exponent_suffix(exponent, upper),
    }
}

fn general(value: f64, precision: usize, alternate: bool, upper: bool) -> FloatText {
    let precision = precision.max(1);
    let (_, _, exponent) = scientific(value, precision - 1);

    let mut text = if exponent >= -4 && (exponent as i64) < precision as i64 {
        let digits = (precision as i64 - 1 - exponent as i64) as usize;
        fixed(value, digits, alternate)
    } else {
        let (mut body, zeros, exponent) = scientific(value, precision - 1);
        if alternate && !body.contains('.') {
            body.push('.');
        }
        FloatText {
            body,
            zeros,
            exponent: exponent_suffix(exponent, upper),
        }
    };

    if !alternate {
        text.zeros = 0;
        trim_fraction(&mut text.body);
    }
    text
}

fn trim_fraction(text: &mut String) {
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
}
