//! Argument tags: the closed set of operand kinds a loader may attach to
//! an instruction argument.

use crate::error::DecodeError;
use std::fmt;
use std::str::FromStr;

/// The declared kind of an instruction argument's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgTag {
    /// Scope-qualified variable, e.g. `GF@x`.
    Var,
    /// Integer literal.
    Int,
    /// Boolean literal.
    Bool,
    /// String literal with `\ddd` escapes.
    String,
    /// Type name for READ.
    Type,
    /// Label name.
    Label,
}

/// All argument tags, in definition order.
pub const ALL_ARG_TAGS: [ArgTag; 6] = [
    ArgTag::Var,
    ArgTag::Int,
    ArgTag::Bool,
    ArgTag::String,
    ArgTag::Type,
    ArgTag::Label,
];

impl ArgTag {
    /// Returns the tag's name as it appears in instruction records.
    pub fn name(&self) -> &'static str {
        match self {
            ArgTag::Var => "var",
            ArgTag::Int => "int",
            ArgTag::Bool => "bool",
            ArgTag::String => "string",
            ArgTag::Type => "type",
            ArgTag::Label => "label",
        }
    }

    /// Returns true for tags that carry a literal value.
    pub fn is_literal(&self) -> bool {
        matches!(self, ArgTag::Int | ArgTag::Bool | ArgTag::String)
    }
}

impl fmt::Display for ArgTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArgTag {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ARG_TAGS
            .iter()
            .find(|tag| tag.name() == s)
            .copied()
            .ok_or_else(|| DecodeError::UnknownArgTag(s.to_string()))
    }
}
