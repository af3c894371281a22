//! VM state: program counter, value stack, call stack, frames and I/O.

use crate::error::{FrameError, RuntimeError};
use crate::frames::FrameSet;
use crate::labels::LabelTable;
use crate::op::{Arg, OperandValue};
use ipp_common::{Instruction, Program, Value, VarRef};
use std::io::{BufRead, Write};

/// Whether the VM can execute further instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

/// The IPPcode18 virtual machine.
///
/// `R` supplies lines for READ and `W` receives WRITE output.
pub struct VM<'a, R, W> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Label targets resolved before execution.
    pub(crate) labels: LabelTable,
    /// Order of the next instruction to execute (1-based).
    pub(crate) pc: usize,
    /// Order of the instruction being executed; 0 before the first step.
    pub(crate) at: usize,
    /// Data stack for PUSHS/POPS.
    pub(crate) stack: Vec<Value>,
    /// Orders of the CALL instructions awaiting RETURN.
    pub(crate) call_stack: Vec<usize>,
    pub(crate) frames: FrameSet,
    pub(crate) input: R,
    pub(crate) output: W,
}

impl<'a, R: BufRead, W: Write> VM<'a, R, W> {
    /// Create a VM positioned at the first instruction.
    pub fn new(program: &'a Program, labels: LabelTable, input: R, output: W) -> Self {
        Self {
            program,
            labels,
            pc: 1,
            at: 0,
            stack: Vec::new(),
            call_stack: Vec::new(),
            frames: FrameSet::new(),
            input,
            output,
        }
    }

    /// Order of the next instruction to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> State {
        if self.pc > self.program.len() {
            State::Halted
        } else {
            State::Running
        }
    }

    /// The data stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Pending return addresses, innermost last.
    pub fn call_stack(&self) -> &[usize] {
        &self.call_stack
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Consume the VM and return its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Fetch the instruction at the current pc.
    pub(crate) fn fetch(&self) -> Option<&'a Instruction> {
        self.program.get(self.pc)
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub(crate) fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::EmptyValueStack { at: self.at })
    }

    /// Attach the current position to a frame error.
    pub(crate) fn frame_error(&self, source: FrameError) -> RuntimeError {
        RuntimeError::Frame {
            at: self.at,
            source,
        }
    }

    /// Value of an initialized variable.
    pub(crate) fn read_var(&self, var: &VarRef) -> Result<&Value, RuntimeError> {
        self.frames.read(var).map_err(|e| self.frame_error(e))
    }

    pub(crate) fn write_var(&mut self, var: &VarRef, value: Value) -> Result<(), RuntimeError> {
        let at = self.at;
        self.frames
            .write(var, value)
            .map_err(|source| RuntimeError::Frame { at, source })
    }

    /// Resolve a symbol to a payload of kind `T`.
    ///
    /// Reading an uninitialized variable is a missing-value error, checked
    /// before the variable's kind.
    pub(crate) fn resolve<T: OperandValue>(&self, arg: &Arg<T>) -> Result<T, RuntimeError> {
        match arg {
            Arg::Lit(lit) => Ok(lit.clone()),
            Arg::Var(var) => {
                let value = self.read_var(var)?;
                T::extract(value).ok_or_else(|| RuntimeError::OperandType {
                    at: self.at,
                    expected: T::EXPECTED.to_string(),
                    found: format!("{} in {var}", value.kind()),
                })
            }
        }
    }

    /// Order of the LABEL defining `name`.
    pub(crate) fn target(&self, name: &str) -> Result<usize, RuntimeError> {
        self.labels
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                at: self.at,
                name: name.to_string(),
            })
    }
}
