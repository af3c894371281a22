//! IPPcode18 verifier — turns loader records into a decoded program.
//!
//! The verifier is the boundary between whatever produced the instruction
//! records and the VM. It re-validates the record shape and decodes every
//! argument, stopping at the first violation.
//!
//! # Usage
//!
//! ```
//! use ipp_common::{ArgRecord, ArgTag, InstructionRecord, Opcode};
//! use ipp_verifier::verify;
//!
//! let records = vec![
//!     InstructionRecord::new(1, "DEFVAR", vec![ArgRecord::new(1, ArgTag::Var, "GF@x")]),
//!     InstructionRecord::new(2, "WRITE", vec![ArgRecord::new(1, ArgTag::Var, "GF@x")]),
//! ];
//!
//! let program = verify(&records).unwrap();
//! assert_eq!(program.len(), 2);
//! assert_eq!(program.instructions[0].opcode, Opcode::DefVar);
//! ```
//!
//! # Checks
//!
//! 1. **Order** — record `i` carries order `i + 1`
//! 2. **Opcode** — the opcode text names a catalog instruction
//! 3. **Arguments** — `argN` positions are exactly `1..=N`, N is the arity
//! 4. **Literals** — every argument decodes against its tag
//!
//! Whether an operand's kind satisfies the opcode's contract is left to
//! the VM, which reports it when the instruction executes.

pub mod error;
pub mod structural;

pub use error::VerifyError;
pub use structural::decode_record;

use ipp_common::{InstructionRecord, Program};
use tracing::debug;

/// Verify instruction records and decode them into a program.
///
/// Returns the first error encountered.
pub fn verify(records: &[InstructionRecord]) -> Result<Program, VerifyError> {
    let instructions = records
        .iter()
        .enumerate()
        .map(|(idx, record)| decode_record(idx + 1, record))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(instructions = instructions.len(), "verified program");
    Ok(Program::new(instructions))
}
