//! IPPcode18 common types.
//!
//! This crate provides the data structures shared by the loader, the
//! verifier and the VM:
//!
//! - [`Value`] / [`ValueKind`] — the tagged runtime value model
//! - [`VarRef`] / [`Scope`] / [`Operand`] — decoded instruction operands
//! - [`Opcode`] — the closed instruction set and its parameter shapes
//! - [`ArgTag`] / [`InstructionRecord`] — the loader boundary
//! - [`Instruction`] / [`Program`] — decoded programs
//! - [`literal`] — strict and lenient decoding of operand text
//! - [`exit`] — process exit statuses

pub mod arg_tag;
pub mod error;
pub mod exit;
pub mod instruction;
pub mod literal;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use arg_tag::ArgTag;
pub use error::{DecodeError, KindMismatch};
pub use instruction::{ArgRecord, Instruction, InstructionRecord};
pub use opcode::{Opcode, Param};
pub use operand::{Operand, Scope, VarRef};
pub use program::Program;
pub use value::{Value, ValueKind};
