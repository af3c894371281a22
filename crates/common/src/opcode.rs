//! Opcode definitions for the IPPcode18 instruction set.

use crate::error::DecodeError;
use std::fmt;
use std::str::FromStr;

/// Coarse shape of one instruction parameter.
///
/// The fine-grained contract (e.g. "int literal or variable") is enforced
/// by the VM when the instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// A variable reference.
    Var,
    /// A variable reference or a literal.
    Symb,
    /// A label name.
    Label,
    /// A type name.
    Type,
}

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and calls
    /// Copy a value into a variable.
    Move,
    /// Replace the temporary frame with a fresh empty one.
    CreateFrame,
    /// Promote the temporary frame to the local frame.
    PushFrame,
    /// Demote the local frame back to the temporary frame.
    PopFrame,
    /// Declare a variable in its own scope.
    DefVar,
    /// Push the return position and jump to a label.
    Call,
    /// Resume after the most recent CALL.
    Return,

    // Value stack
    /// Push a value onto the value stack.
    Pushs,
    /// Pop the value stack into a variable.
    Pops,

    // Arithmetic, relational, boolean, conversion
    Add,
    Sub,
    Mul,
    /// Floor division; a zero divisor is fatal.
    IDiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
    /// Integer code point to a one-character string.
    Int2Char,
    /// Code point of the character at an index.
    Stri2Int,

    // Input and output
    /// Read one line of input as the given type.
    Read,
    /// Write a value to standard output.
    Write,

    // Strings
    Concat,
    Strlen,
    GetChar,
    SetChar,

    // Types
    /// Write the runtime type name of a value.
    Type,

    // Control flow
    /// Define a jump target.
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,

    // Debugging
    /// Diagnostic print of a value.
    DPrint,
    /// Diagnostic dump of interpreter state.
    Break,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 34] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::IDiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::DPrint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::IDiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::DPrint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Parameter shapes, in `arg1..argN` order.
    pub fn params(&self) -> &'static [Param] {
        use Param::*;
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::DefVar | Opcode::Pops => &[Var],

            Opcode::Call | Opcode::Label | Opcode::Jump => &[Label],

            Opcode::Pushs | Opcode::Write | Opcode::DPrint => &[Symb],

            Opcode::Move
            | Opcode::Not
            | Opcode::Int2Char
            | Opcode::Strlen
            | Opcode::Type => &[Var, Symb],

            Opcode::Read => &[Var, Type],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::IDiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[Var, Symb, Symb],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[Label, Symb, Symb],
        }
    }

    /// Number of operands the opcode takes.
    pub fn arity(&self) -> usize {
        self.params().len()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Parses a mnemonic, ignoring ASCII case.
impl FromStr for Opcode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| DecodeError::UnknownOpcode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_opcodes_count() {
        assert_eq!(ALL_OPCODES.len(), 34);
    }

    #[test]
    fn mnemonic_roundtrip() {
        for &opcode in &ALL_OPCODES {
            let m = opcode.mnemonic();
            assert_eq!(m, m.to_uppercase(), "mnemonic should be uppercase: {m}");
            assert_eq!(m.parse::<Opcode>(), Ok(opcode), "roundtrip failed for {m}");
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("createframe".parse::<Opcode>(), Ok(Opcode::CreateFrame));
        assert_eq!("JumpIfEq".parse::<Opcode>(), Ok(Opcode::JumpIfEq));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(
            "NOP".parse::<Opcode>(),
            Err(DecodeError::UnknownOpcode("NOP".to_string()))
        );
        assert!("".parse::<Opcode>().is_err());
        assert!("MOVE ".parse::<Opcode>().is_err());
    }

    #[test]
    fn arities() {
        assert_eq!(Opcode::CreateFrame.arity(), 0);
        assert_eq!(Opcode::Break.arity(), 0);
        assert_eq!(Opcode::DefVar.arity(), 1);
        assert_eq!(Opcode::Write.arity(), 1);
        assert_eq!(Opcode::Move.arity(), 2);
        assert_eq!(Opcode::Read.arity(), 2);
        assert_eq!(Opcode::Add.arity(), 3);
        assert_eq!(Opcode::JumpIfNeq.arity(), 3);
    }

    #[test]
    fn every_opcode_with_operands_starts_with_var_or_label_or_symb() {
        for &opcode in &ALL_OPCODES {
            if let Some(first) = opcode.params().first() {
                assert_ne!(*first, Param::Type, "{opcode} cannot start with a type");
            }
        }
    }
}
