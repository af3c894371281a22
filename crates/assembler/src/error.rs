//! Error types for the IPPcode18 source loader.

use ipp_common::{exit, DecodeError, Opcode};
use thiserror::Error;

/// Errors produced while reading IPPcode18 source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The source has no `.IPPcode18` header line.
    #[error("missing .IPPcode18 header")]
    MissingHeader,

    /// The first line is not the `.IPPcode18` header.
    #[error("line {line}: invalid header '{token}'")]
    InvalidHeader { line: usize, token: String },

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode was given the wrong number of arguments.
    #[error("line {line}: {opcode} expects {expected} argument(s), found {found}")]
    ArgumentCount {
        line: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// A token does not have the shape its parameter requires.
    #[error("line {line}: expected {expected}, found '{token}'")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        token: String,
    },

    /// A literal or name failed to decode.
    #[error("line {line}: {source}")]
    Literal {
        line: usize,
        #[source]
        source: DecodeError,
    },
}

impl AsmError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        exit::SOURCE
    }
}

/// Errors produced while reading or writing the XML program format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The document has no `<program>` root element.
    #[error("missing <program> element")]
    MissingProgram,

    /// An element appears where another one is required.
    #[error("expected {expected}, found <{found}>")]
    UnexpectedElement {
        expected: &'static str,
        found: String,
    },

    /// A required attribute is absent.
    #[error("<{element}> has no '{name}' attribute")]
    MissingAttribute {
        element: String,
        name: &'static str,
    },

    /// An attribute is unknown or has an unusable value.
    #[error("<{element}> has invalid attribute {name}=\"{value}\"")]
    InvalidAttribute {
        element: String,
        name: String,
        value: String,
    },

    /// Character data outside an argument element.
    #[error("unexpected text '{0}'")]
    UnexpectedText(String),

    /// The document could not be rendered.
    #[error("cannot render XML: {0}")]
    Render(String),
}

impl XmlError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            XmlError::Render(_) => exit::INTERNAL,
            _ => exit::STRUCTURE,
        }
    }
}
