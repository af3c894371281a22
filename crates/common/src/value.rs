//! Runtime value representation for the IPPcode18 interpreter.
//!
//! A variable slot is either uninitialized or holds one of these values.
//! Uninitialized is a slot state (`Option<Value>` in the frame manager),
//! never a value in its own right.

use crate::error::{DecodeError, KindMismatch};
use num_bigint::BigInt;
use std::fmt;
use std::str::FromStr;

/// Runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Arbitrary-width signed integer.
    Int(BigInt),
    /// Boolean value.
    Bool(bool),
    /// Text with escape sequences already decoded.
    Str(String),
}

/// The kind of a value. Uninitialized is not a value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Bool,
    Str,
}

/// All value kinds, in definition order.
pub const ALL_VALUE_KINDS: [ValueKind; 3] = [ValueKind::Int, ValueKind::Bool, ValueKind::Str];

impl ValueKind {
    /// Runtime type name, as written by TYPE and accepted by READ.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Str => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_VALUE_KINDS
            .iter()
            .find(|kind| kind.name() == s)
            .copied()
            .ok_or_else(|| DecodeError::InvalidTypeName(s.to_string()))
    }
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// The default a lenient READ substitutes for malformed input.
    pub fn default_of(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Int => Value::Int(BigInt::from(0)),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Str => Value::Str(String::new()),
        }
    }

    pub fn as_int(&self) -> Result<&BigInt, KindMismatch> {
        match self {
            Value::Int(n) => Ok(n),
            other => Err(other.mismatch(ValueKind::Int)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, KindMismatch> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }

    pub fn as_str(&self) -> Result<&str, KindMismatch> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::Str)),
        }
    }

    fn mismatch(&self, expected: ValueKind) -> KindMismatch {
        KindMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

/// Formats the value the way WRITE emits it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Str(s) => f.write_str(s),
        }
    }
}
