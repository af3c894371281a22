//! IPPcode18 source loader: text ↔ instruction records ↔ XML.
//!
//! The loader turns source text into the [`InstructionRecord`]s the
//! verifier consumes, and renders records back into canonical text.
//! The [`xml`] module carries the same records in the XML program format
//! exchanged between the parser and the interpreter.
//!
//! # Usage
//!
//! ```
//! use ipp_assembler::{assemble, disassemble};
//!
//! let text = ".IPPcode18\nDEFVAR GF@x\nMOVE GF@x int@42\nWRITE GF@x\n";
//! let assembly = assemble(text).unwrap();
//! assert_eq!(assembly.records.len(), 3);
//! assert_eq!(disassemble(&assembly.records), text);
//! ```
//!
//! # Source format
//!
//! - The first line that is not blank or comment-only must be
//!   `.IPPcode18` (any case).
//! - `#` starts a comment running to end of line.
//! - One instruction per line; opcode (any case) followed by blank-separated
//!   arguments. Literals are `int@…`, `bool@…`, `string@…`; variables are
//!   `GF@…`, `LF@…`, `TF@…`; labels and type names are bare.
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(records)).records == records` holds for every
//! record sequence produced by [`assemble`].

pub mod error;
pub mod xml;

mod disassembler;
mod lexer;
mod parser;

pub use error::{AsmError, XmlError};
pub use xml::{from_xml, to_xml};

use ipp_common::InstructionRecord;
use lexer::tokenize_line;
use parser::{parse_header, parse_instruction};
use tracing::debug;

/// Counts collected while reading a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of instructions.
    pub instructions: usize,
    /// Number of lines carrying a `#` comment.
    pub comments: usize,
}

/// The result of reading a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Records numbered from 1 in source order.
    pub records: Vec<InstructionRecord>,
    pub stats: Stats,
}

/// Assemble source text into instruction records.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Assembly, AsmError> {
    let mut records = Vec::new();
    let mut stats = Stats::default();
    let mut header_seen = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = tokenize_line(raw);
        if line.comment {
            stats.comments += 1;
        }
        if line.tokens.is_empty() {
            continue;
        }

        if !header_seen {
            parse_header(&line.tokens, line_num)?;
            header_seen = true;
            continue;
        }

        let record = parse_instruction(&line.tokens, records.len() + 1, line_num)?;
        records.push(record);
    }

    if !header_seen {
        return Err(AsmError::MissingHeader);
    }

    stats.instructions = records.len();
    debug!(
        instructions = stats.instructions,
        comments = stats.comments,
        "assembled source"
    );
    Ok(Assembly { records, stats })
}

/// Render instruction records as canonical source text.
///
/// The output is flat text: the header, then one instruction per line, no
/// indentation, no comments.
pub fn disassemble(records: &[InstructionRecord]) -> String {
    disassembler::disassemble(records)
}
