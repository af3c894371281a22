//! Operands of decoded instructions: variable references, literals,
//! label names and type names.

use crate::error::DecodeError;
use crate::literal::is_identifier;
use crate::value::{Value, ValueKind};
use std::fmt;
use std::str::FromStr;

/// Which frame a variable lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `GF@`: created once, lives for the whole run.
    Global,
    /// `LF@`: top of the frame stack.
    Local,
    /// `TF@`: staged frame created by CREATEFRAME.
    Temporary,
}

/// All scopes, in definition order.
pub const ALL_SCOPES: [Scope; 3] = [Scope::Global, Scope::Local, Scope::Temporary];

impl Scope {
    /// Source prefix without the `@` separator.
    pub fn prefix(&self) -> &'static str {
        match self {
            Scope::Global => "GF",
            Scope::Local => "LF",
            Scope::Temporary => "TF",
        }
    }

    /// Human-readable frame name used in error messages.
    pub fn frame_name(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Local => "local",
            Scope::Temporary => "temporary",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Scope> {
        ALL_SCOPES.iter().find(|s| s.prefix() == prefix).copied()
    }
}

/// A scope-qualified variable name such as `GF@counter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub scope: Scope,
    pub name: String,
}

impl VarRef {
    pub fn new(scope: Scope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    pub fn global(name: impl Into<String>) -> Self {
        Self::new(Scope::Global, name)
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self::new(Scope::Local, name)
    }

    pub fn temporary(name: impl Into<String>) -> Self {
        Self::new(Scope::Temporary, name)
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.scope.prefix(), self.name)
    }
}

impl FromStr for VarRef {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidVariable(s.to_string());
        let (prefix, name) = s.split_once('@').ok_or_else(invalid)?;
        let scope = Scope::from_prefix(prefix).ok_or_else(invalid)?;
        if !is_identifier(name) {
            return Err(invalid());
        }
        Ok(VarRef::new(scope, name))
    }
}

/// A decoded instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Reference to a variable slot.
    Var(VarRef),
    /// Literal int, bool or string.
    Const(Value),
    /// Label name (jump/call target or LABEL definition).
    Label(String),
    /// Type name, only meaningful for READ.
    Type(ValueKind),
}

impl Operand {
    /// Short description of the operand's shape, used in contract errors.
    pub fn describe(&self) -> String {
        match self {
            Operand::Var(var) => format!("variable {var}"),
            Operand::Const(value) => format!("{} literal", value.kind()),
            Operand::Label(name) => format!("label {name}"),
            Operand::Type(kind) => format!("type {kind}"),
        }
    }
}
