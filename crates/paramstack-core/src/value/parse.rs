//! Raw string parsing for each declared type

use std::borrow::Cow;
use std::num::IntErrorKind;

use super::record::DecoderRegistry;
use super::{TypeTag, Value, ValueError};

/// Parse `raw` into a value of type `tag`
///
/// Malformed input yields [`ValueError::Parse`]; a well-formed numeric literal
/// that does not fit the declared type yields [`ValueError::Range`].
pub fn parse_value(tag: &TypeTag, raw: &str, decoders: &DecoderRegistry) -> Result<Value, ValueError> {
    match tag {
        TypeTag::Bool => parse_bool(raw).map(Value::Bool),
        TypeTag::Int => parse_signed(tag, raw)
            .and_then(|v| i32::try_from(v).map_err(|_| ValueError::range(tag.clone(), raw)))
            .map(Value::Int),
        TypeTag::Int64 => parse_signed(tag, raw).map(Value::Int64),
        TypeTag::Uint => parse_unsigned(tag, raw)
            .and_then(|v| u32::try_from(v).map_err(|_| ValueError::range(tag.clone(), raw)))
            .map(Value::Uint),
        TypeTag::Uint64 => parse_unsigned(tag, raw).map(Value::Uint64),
        TypeTag::Float64 => parse_float(raw).map(Value::Float64),
        TypeTag::String => Ok(Value::String(raw.to_string())),
        TypeTag::Record(kind) => decoders.decode(kind, raw).map(Value::Record),
    }
}

fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ValueError::parse(TypeTag::Bool, raw, "expected a boolean literal")),
    }
}

/// Split the base prefix off an unsigned integer literal
///
/// `0x`, `0o` and `0b` select hex, octal and binary, and any other leading
/// `0` selects octal, so `"010"` is 8. `_` may separate digits.
fn split_radix<'a>(tag: &TypeTag, raw: &str, literal: &'a str) -> Result<(u32, Cow<'a, str>), ValueError> {
    let lower = literal.get(..2).map(|p| p.to_ascii_lowercase());
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &literal[2..]),
        Some("0o") => (8, &literal[2..]),
        Some("0b") => (2, &literal[2..]),
        _ if literal.len() > 1 && literal.starts_with('0') => (8, &literal[1..]),
        _ => (10, literal),
    };
    if digits.starts_with(['+', '-']) {
        return Err(ValueError::parse(tag.clone(), raw, "invalid digit"));
    }
    let digits = strip_separators(digits, radix != 10)
        .ok_or_else(|| ValueError::parse(tag.clone(), raw, "misplaced digit separator"))?;
    Ok((radix, digits))
}

/// Drop `_` separators, each of which must be followed by a digit and
/// preceded by a digit or the base prefix
fn strip_separators(digits: &str, prefixed: bool) -> Option<Cow<'_, str>> {
    if !digits.contains('_') {
        return Some(Cow::Borrowed(digits));
    }
    let bytes = digits.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        if *byte != b'_' {
            continue;
        }
        let after_digit = if i == 0 { prefixed } else { bytes[i - 1] != b'_' };
        let before_digit = bytes.get(i + 1).is_some_and(|next| *next != b'_');
        if !after_digit || !before_digit {
            return None;
        }
    }
    Some(Cow::Owned(digits.replace('_', "")))
}

fn int_error(tag: &TypeTag, raw: &str, kind: &IntErrorKind) -> ValueError {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ValueError::range(tag.clone(), raw),
        IntErrorKind::Empty => ValueError::parse(tag.clone(), raw, "empty number"),
        _ => ValueError::parse(tag.clone(), raw, "invalid digit"),
    }
}

fn parse_signed(tag: &TypeTag, raw: &str) -> Result<i64, ValueError> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (radix, digits) = split_radix(tag, raw, unsigned)?;

    // Parse the magnitude as u64 so that i64::MIN is representable
    let magnitude = u64::from_str_radix(&digits, radix).map_err(|e| int_error(tag, raw, e.kind()))?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(ValueError::range(tag.clone(), raw));
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).map_err(|_| ValueError::range(tag.clone(), raw))
    }
}

fn parse_unsigned(tag: &TypeTag, raw: &str) -> Result<u64, ValueError> {
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    let (radix, digits) = split_radix(tag, raw, unsigned)?;
    u64::from_str_radix(&digits, radix).map_err(|e| int_error(tag, raw, e.kind()))
}

fn parse_float(raw: &str) -> Result<f64, ValueError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| ValueError::parse(TypeTag::Float64, raw, "expected a floating point literal"))?;

    if value.is_infinite() {
        let literal = raw.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if literal != "inf" && literal != "infinity" {
            return Err(ValueError::range(TypeTag::Float64, raw));
        }
    }
    Ok(value)
}
