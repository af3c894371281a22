//! Program representation: an ordered sequence of decoded instructions.

use crate::instruction::Instruction;

/// An IPPcode18 program.
///
/// Instruction `i` (0-based) has order `i + 1`; every position the VM talks
/// about is that 1-based order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Instruction at a 1-based order, if in range.
    pub fn get(&self, order: usize) -> Option<&Instruction> {
        order
            .checked_sub(1)
            .and_then(|index| self.instructions.get(index))
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
