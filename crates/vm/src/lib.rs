//! IPPcode18 virtual machine: executes verified programs.
//!
//! The VM is a register/stack machine with:
//! - three variable scopes (global frame, a stack of local frames and a
//!   temporary frame)
//! - a data stack for PUSHS/POPS
//! - a call stack of return addresses
//! - labels resolved in a pre-pass, so jumps may go forward
//!
//! # Usage
//!
//! ```
//! use ipp_common::{Instruction, Opcode, Operand, Program, Value};
//! use ipp_vm::run_with_io;
//!
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::Write, vec![Operand::Const(Value::from("hello"))]),
//! ]);
//!
//! let mut out = Vec::new();
//! run_with_io(&program, &b""[..], &mut out).unwrap();
//! assert_eq!(out, b"hello");
//! ```

pub mod error;
pub mod execute;
pub mod frames;
pub mod labels;
pub mod machine;
pub mod op;

pub use error::{FrameError, RuntimeError};
pub use frames::{Frame, FrameSet};
pub use labels::{build_label_table, LabelTable};
pub use machine::{State, VM};
pub use op::{Arg, Op};

use ipp_common::Program;
use std::io::{self, BufRead, BufWriter, Write};

/// Execute a program against the process's stdin and stdout.
///
/// # Errors
///
/// Returns the first [`RuntimeError`]: a duplicate or unknown label,
/// an operand contract violation, a frame or variable failure, division by
/// zero, a string index out of range or an I/O failure.
pub fn run(program: &Program) -> Result<(), RuntimeError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(program, stdin.lock(), BufWriter::new(stdout.lock()))
}

/// Execute a program with explicit input and output streams.
pub fn run_with_io<R: BufRead, W: Write>(
    program: &Program,
    input: R,
    output: W,
) -> Result<(), RuntimeError> {
    let labels = build_label_table(program)?;
    let mut vm = VM::new(program, labels, input, output);
    vm.execute()
}
