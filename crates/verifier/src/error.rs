//! Verification errors for IPPcode18 instruction records.
//!
//! Every error carries the position (`at`, 1-based) of the offending record.

use ipp_common::{exit, DecodeError, Opcode};
use thiserror::Error;

/// Errors found while turning instruction records into a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A record's declared order differs from its position.
    #[error("instruction {at} has order {found}")]
    OrderMismatch { at: usize, found: usize },

    /// Two arguments claim the same `argN` position.
    #[error("duplicate arg{position} at instruction {at}")]
    DuplicateArgument { at: usize, position: usize },

    /// The `argN` positions skip a number or do not start at 1.
    #[error("missing arg{position} at instruction {at}")]
    MissingArgument { at: usize, position: usize },

    /// The opcode takes a different number of operands.
    #[error("{opcode} expects {expected} argument(s), found {found} at instruction {at}")]
    ArgumentCount {
        at: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// Unknown opcode or malformed argument text.
    #[error("{source} at instruction {at}")]
    Decode {
        at: usize,
        #[source]
        source: DecodeError,
    },
}

impl VerifyError {
    /// Position of the offending record.
    pub fn at(&self) -> usize {
        match self {
            VerifyError::OrderMismatch { at, .. }
            | VerifyError::DuplicateArgument { at, .. }
            | VerifyError::MissingArgument { at, .. }
            | VerifyError::ArgumentCount { at, .. }
            | VerifyError::Decode { at, .. } => *at,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VerifyError::Decode { source, .. } => source.exit_code(),
            _ => exit::STRUCTURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            VerifyError::OrderMismatch { at: 2, found: 5 }.to_string(),
            "instruction 2 has order 5"
        );
        assert_eq!(
            VerifyError::ArgumentCount {
                at: 1,
                opcode: Opcode::Move,
                expected: 2,
                found: 1
            }
            .to_string(),
            "MOVE expects 2 argument(s), found 1 at instruction 1"
        );
        assert_eq!(
            VerifyError::Decode {
                at: 4,
                source: DecodeError::InvalidInt("x".into())
            }
            .to_string(),
            "invalid int literal 'x' at instruction 4"
        );
    }

    #[test]
    fn exit_codes() {
        assert_eq!(VerifyError::OrderMismatch { at: 1, found: 2 }.exit_code(), 31);
        assert_eq!(
            VerifyError::MissingArgument { at: 1, position: 1 }.exit_code(),
            31
        );
        assert_eq!(
            VerifyError::Decode {
                at: 1,
                source: DecodeError::UnknownOpcode("FOO".into())
            }
            .exit_code(),
            31
        );
        assert_eq!(
            VerifyError::Decode {
                at: 1,
                source: DecodeError::InvalidBool("maybe".into())
            }
            .exit_code(),
            32
        );
    }

    #[test]
    fn at_accessor() {
        assert_eq!(
            VerifyError::DuplicateArgument { at: 7, position: 1 }.at(),
            7
        );
    }
}
