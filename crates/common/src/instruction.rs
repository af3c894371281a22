//! Instruction records as handed over by a loader, and decoded instructions
//! as consumed by the VM.
//!
//! A record is the loader's view: a 1-based order, the opcode text and
//! `argN`-positioned arguments whose text has not been decoded yet. The
//! verifier turns a sequence of records into [`Instruction`]s, checking the
//! record shape and decoding every argument.

use crate::arg_tag::ArgTag;
use crate::opcode::Opcode;
use crate::operand::Operand;

/// One `argN` argument of an instruction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgRecord {
    /// The N of `argN`, 1-based.
    pub position: usize,
    /// Declared kind of `text`.
    pub tag: ArgTag,
    /// Raw argument text, escapes still encoded.
    pub text: String,
}

impl ArgRecord {
    pub fn new(position: usize, tag: ArgTag, text: impl Into<String>) -> Self {
        Self {
            position,
            tag,
            text: text.into(),
        }
    }
}

/// A loader-provided instruction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionRecord {
    /// 1-based sequence number; must equal the record's position.
    pub order: usize,
    /// Raw opcode text.
    pub opcode: String,
    /// Arguments in the order the loader enumerated them.
    pub args: Vec<ArgRecord>,
}

impl InstructionRecord {
    pub fn new(order: usize, opcode: impl Into<String>, args: Vec<ArgRecord>) -> Self {
        Self {
            order,
            opcode: opcode.into(),
            args,
        }
    }
}

/// A decoded instruction: a catalog opcode and its operands in `arg1..argN`
/// order.
///
/// The operand count matches the opcode's arity; operand kinds are checked
/// against the opcode's contract when the instruction executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Decoded operands.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { opcode, operands }
    }

    /// If this is a LABEL with a label operand, returns the defined name.
    pub fn defined_label(&self) -> Option<&str> {
        match (self.opcode, self.operands.as_slice()) {
            (Opcode::Label, [Operand::Label(name)]) => Some(name),
            _ => None,
        }
    }
}
