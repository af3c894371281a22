//! Decoding of operand text into typed operands.
//!
//! Strict decoding is used for program text and fails with a
//! [`DecodeError`]. Lenient decoding is used for runtime input (READ) and
//! substitutes the kind's default value instead of failing.

use crate::arg_tag::ArgTag;
use crate::error::DecodeError;
use crate::operand::{Operand, VarRef};
use crate::value::{Value, ValueKind};
use num_bigint::BigInt;

/// Symbol characters allowed in identifiers besides ASCII word characters.
const IDENT_SYMBOLS: &[char] = &['_', '-', '$', '&', '%', '*'];

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || IDENT_SYMBOLS.contains(&c)
}

/// Returns true if `s` is a valid variable or label identifier.
///
/// Identifiers are non-empty, built from ASCII word characters and
/// `_-$&%*`, and never start with a digit.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_ident_char(first) && !first.is_ascii_digit() => {
            chars.all(is_ident_char)
        }
        _ => false,
    }
}

/// Decode an integer: optional sign followed by one or more digits.
pub fn decode_int(text: &str) -> Result<BigInt, DecodeError> {
    let invalid = || DecodeError::InvalidInt(text.to_string());
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let magnitude = digits.parse::<BigInt>().map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Decode a boolean: exactly `true` or `false`.
pub fn decode_bool(text: &str) -> Result<bool, DecodeError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(DecodeError::InvalidBool(text.to_string())),
    }
}

/// Decode a string literal, replacing every `\ddd` group with the character
/// whose code point is the three-digit decimal number.
///
/// The scan is single-pass and left to right, so a decoded backslash
/// (`\092`) is never re-read as the start of another escape. A backslash
/// not followed by three digits is rejected.
pub fn decode_string(text: &str) -> Result<String, DecodeError> {
    let invalid = || DecodeError::InvalidString(text.to_string());
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let escape = rest[pos + 1..].get(..3).ok_or_else(invalid)?;
        if !escape.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let code: u32 = escape.parse().map_err(|_| invalid())?;
        out.push(char::from_u32(code).ok_or_else(invalid)?);
        rest = &rest[pos + 4..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Decode a label name.
pub fn decode_label(text: &str) -> Result<String, DecodeError> {
    if is_identifier(text) {
        Ok(text.to_string())
    } else {
        Err(DecodeError::InvalidLabel(text.to_string()))
    }
}

/// Decode the raw text of an argument according to its tag.
pub fn decode_operand(tag: ArgTag, text: &str) -> Result<Operand, DecodeError> {
    match tag {
        ArgTag::Var => text.parse::<VarRef>().map(Operand::Var),
        ArgTag::Int => decode_int(text).map(|n| Operand::Const(Value::Int(n))),
        ArgTag::Bool => decode_bool(text).map(|b| Operand::Const(Value::Bool(b))),
        ArgTag::String => decode_string(text).map(|s| Operand::Const(Value::Str(s))),
        ArgTag::Type => text.parse::<ValueKind>().map(Operand::Type),
        ArgTag::Label => decode_label(text).map(Operand::Label),
    }
}

/// Decode one line of runtime input as `kind`, falling back to the kind's
/// default (0, false, empty string) when the text is malformed.
///
/// Text input is taken verbatim; escape sequences are a property of program
/// literals, not of input.
pub fn decode_lenient(kind: ValueKind, text: &str) -> Value {
    match kind {
        ValueKind::Int => decode_int(text.trim())
            .map(Value::Int)
            .unwrap_or_else(|_| Value::default_of(kind)),
        ValueKind::Bool => Value::Bool(text.trim() == "true"),
        ValueKind::Str => Value::Str(text.to_string()),
    }
}
