//! Runtime errors for the IPPcode18 VM.
//!
//! Every error raised while executing includes the order (`at`, 1-based) of
//! the instruction that failed. Errors are fatal: the first one ends the run.

use ipp_common::{exit, Scope, VarRef};
use num_bigint::BigInt;
use thiserror::Error;

/// Errors raised by the frame manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// DEFVAR of a name that already exists in the addressed frame.
    #[error("variable {0} is already defined")]
    Redefinition(VarRef),

    /// Read or write of a name that was never declared.
    #[error("variable {0} is not defined")]
    Undefined(VarRef),

    /// Read of a declared variable that holds no value yet.
    #[error("variable {0} is uninitialized")]
    Uninitialized(VarRef),

    /// The addressed local or temporary frame does not exist.
    #[error("{} frame does not exist", .0.frame_name())]
    NoFrame(Scope),
}

impl FrameError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            FrameError::Redefinition(_) => exit::SEMANTIC,
            FrameError::Undefined(_) => exit::UNDEFINED_VARIABLE,
            FrameError::Uninitialized(_) => exit::MISSING_VALUE,
            FrameError::NoFrame(_) => exit::MISSING_FRAME,
        }
    }
}

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Two LABEL instructions define the same name.
    #[error("label '{name}' redefined at instruction {at}")]
    DuplicateLabel { at: usize, name: String },

    /// JUMP, CALL or a conditional jump names an unknown label.
    #[error("undefined label '{name}' at instruction {at}")]
    UndefinedLabel { at: usize, name: String },

    /// An operand does not satisfy the opcode's contract.
    #[error("operand type mismatch at instruction {at}: expected {expected}, found {found}")]
    OperandType {
        at: usize,
        expected: String,
        found: String,
    },

    /// Frame manager failure (redefinition, undefined variable, missing
    /// value, missing frame).
    #[error("{source} at instruction {at}")]
    Frame {
        at: usize,
        #[source]
        source: FrameError,
    },

    /// POPS on an empty value stack.
    #[error("value stack is empty at instruction {at}")]
    EmptyValueStack { at: usize },

    /// RETURN on an empty call stack.
    #[error("call stack is empty at instruction {at}")]
    EmptyCallStack { at: usize },

    /// IDIV with a zero divisor.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// Character index outside the string.
    #[error("string index {index} out of range (length {length}) at instruction {at}")]
    StringIndexOutOfRange {
        at: usize,
        index: BigInt,
        length: usize,
    },

    /// SETCHAR with an empty replacement string.
    #[error("empty replacement string at instruction {at}")]
    EmptyReplacement { at: usize },

    /// INT2CHAR with a number that is not a Unicode scalar value.
    #[error("invalid code point {code} at instruction {at}")]
    InvalidCodePoint { at: usize, code: BigInt },

    /// Reading input or writing output failed.
    #[error("i/o error at instruction {at}: {message}")]
    Io { at: usize, message: String },
}

impl RuntimeError {
    /// Order of the instruction that failed.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::DuplicateLabel { at, .. }
            | RuntimeError::UndefinedLabel { at, .. }
            | RuntimeError::OperandType { at, .. }
            | RuntimeError::Frame { at, .. }
            | RuntimeError::EmptyValueStack { at }
            | RuntimeError::EmptyCallStack { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::StringIndexOutOfRange { at, .. }
            | RuntimeError::EmptyReplacement { at }
            | RuntimeError::InvalidCodePoint { at, .. }
            | RuntimeError::Io { at, .. } => *at,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::DuplicateLabel { .. } | RuntimeError::UndefinedLabel { .. } => {
                exit::SEMANTIC
            }
            RuntimeError::OperandType { .. } => exit::OPERAND_TYPE,
            RuntimeError::Frame { source, .. } => source.exit_code(),
            RuntimeError::EmptyValueStack { .. } | RuntimeError::EmptyCallStack { .. } => {
                exit::MISSING_VALUE
            }
            RuntimeError::DivisionByZero { .. } => exit::ZERO_DIVISION,
            RuntimeError::StringIndexOutOfRange { .. }
            | RuntimeError::EmptyReplacement { .. }
            | RuntimeError::InvalidCodePoint { .. } => exit::STRING_RANGE,
            RuntimeError::Io { .. } => exit::INTERNAL,
        }
    }
}
