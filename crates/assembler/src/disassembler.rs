//! Disassembler: instruction records → canonical source text.
//!
//! Output is a `.IPPcode18` header followed by one instruction per line:
//! uppercase mnemonic, then arguments in `argN` order separated by single
//! spaces. Literals are written `tag@text`; variables, labels and type
//! names are written bare. No indentation, no comments.

use crate::parser::HEADER;
use ipp_common::{ArgRecord, InstructionRecord};

/// Render records as canonical source text.
pub fn disassemble(records: &[InstructionRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for record in records {
        out.push_str(&record.opcode.to_uppercase());

        let mut args: Vec<&ArgRecord> = record.args.iter().collect();
        args.sort_by_key(|arg| arg.position);
        for arg in args {
            out.push(' ');
            out.push_str(&render_arg(arg));
        }
        out.push('\n');
    }

    out
}

/// The token `arg` is written as.
pub fn render_arg(arg: &ArgRecord) -> String {
    if arg.tag.is_literal() {
        format!("{}@{}", arg.tag, arg.text)
    } else {
        arg.text.clone()
    }
}
