//! Label pre-pass.
//!
//! Every LABEL in the program is recorded before execution starts, so a
//! jump may target a label defined later in the stream.

use crate::error::RuntimeError;
use crate::op::describe_operands;
use ipp_common::{Opcode, Program};
use std::collections::HashMap;
use tracing::debug;

/// Maps label names to the order of their defining LABEL instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    targets: HashMap<String, usize>,
}

impl LabelTable {
    /// Order of the LABEL defining `name`.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.targets.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Scan `program` for LABEL instructions.
///
/// A name defined twice is a semantic error reported at the second
/// definition. A LABEL whose operand is not a label name violates its
/// operand contract.
pub fn build_label_table(program: &Program) -> Result<LabelTable, RuntimeError> {
    let mut targets = HashMap::new();

    for (idx, instr) in program.instructions.iter().enumerate() {
        if instr.opcode != Opcode::Label {
            continue;
        }
        let at = idx + 1;
        let name = instr
            .defined_label()
            .ok_or_else(|| RuntimeError::OperandType {
                at,
                expected: "label".to_string(),
                found: describe_operands(&instr.operands),
            })?;
        if targets.insert(name.to_string(), at).is_some() {
            return Err(RuntimeError::DuplicateLabel {
                at,
                name: name.to_string(),
            });
        }
    }

    debug!(labels = targets.len(), "built label table");
    Ok(LabelTable { targets })
}
