//! Decode errors for IPPcode18 operand text.

use crate::exit;
use crate::value::ValueKind;
use thiserror::Error;

/// Errors that occur while decoding the textual form of an operand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Integer literal is not an optional sign followed by digits.
    #[error("invalid int literal '{0}'")]
    InvalidInt(String),

    /// Boolean literal is neither `true` nor `false`.
    #[error("invalid bool literal '{0}'")]
    InvalidBool(String),

    /// String literal contains a malformed escape sequence.
    #[error("invalid string literal '{0}'")]
    InvalidString(String),

    /// Variable reference with a bad scope prefix or identifier.
    #[error("invalid variable '{0}'")]
    InvalidVariable(String),

    /// Label name is not a valid identifier.
    #[error("invalid label '{0}'")]
    InvalidLabel(String),

    /// Type name other than `int`, `bool` or `string`.
    #[error("invalid type name '{0}'")]
    InvalidTypeName(String),

    /// Argument tag outside the closed set of tags.
    #[error("unknown argument type '{0}'")]
    UnknownArgTag(String),

    /// Opcode outside the closed instruction set.
    #[error("unknown instruction '{0}'")]
    UnknownOpcode(String),
}

impl DecodeError {
    /// Process exit status for this error.
    ///
    /// Unknown opcodes and argument tags are malformed record shapes;
    /// everything else is a malformed literal.
    pub fn exit_code(&self) -> i32 {
        match self {
            DecodeError::UnknownArgTag(_) | DecodeError::UnknownOpcode(_) => exit::STRUCTURE,
            _ => exit::SYNTAX,
        }
    }
}

/// A value had a different kind than the accessor asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct KindMismatch {
    pub expected: ValueKind,
    pub found: ValueKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_int() {
        assert_eq!(
            DecodeError::InvalidInt("12a".to_string()).to_string(),
            "invalid int literal '12a'"
        );
    }

    #[test]
    fn display_kind_mismatch() {
        let e = KindMismatch {
            expected: ValueKind::Int,
            found: ValueKind::Str,
        };
        assert_eq!(e.to_string(), "expected int, found string");
    }

    #[test]
    fn exit_codes() {
        assert_eq!(DecodeError::InvalidBool("yes".into()).exit_code(), 32);
        assert_eq!(DecodeError::InvalidLabel("1x".into()).exit_code(), 32);
        assert_eq!(DecodeError::UnknownArgTag("float".into()).exit_code(), 31);
        assert_eq!(DecodeError::UnknownOpcode("NOP".into()).exit_code(), 31);
    }
}
