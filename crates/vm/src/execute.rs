//! Main execution loop and opcode dispatch for the IPPcode18 VM.

use crate::error::RuntimeError;
use crate::machine::{State, VM};
use crate::op::{Arg, ArithOp, CmpOp, LogicOp, Op};
use ipp_common::literal::decode_lenient;
use ipp_common::{Value, ValueKind, VarRef};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::io::{BufRead, Write};
use tracing::debug;

impl<'a, R: BufRead, W: Write> VM<'a, R, W> {
    /// Execute the program until the pc runs past the last instruction or
    /// an error occurs. Output is flushed either way.
    pub fn execute(&mut self) -> Result<(), RuntimeError> {
        let result = self.run_until_halted();
        let flushed = self.output.flush().map_err(|e| RuntimeError::Io {
            at: self.at,
            message: e.to_string(),
        });
        result.and(flushed)
    }

    fn run_until_halted(&mut self) -> Result<(), RuntimeError> {
        while self.step()? == State::Running {}
        Ok(())
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<State, RuntimeError> {
        let Some(instr) = self.fetch() else {
            return Ok(State::Halted);
        };
        self.at = self.pc;
        self.pc += 1;
        debug!(at = self.at, opcode = %instr.opcode, "execute");

        match Op::decode(self.at, instr)? {
            // Frames and variables
            Op::Move { dest, src } => {
                let value = self.resolve(&src)?;
                self.write_var(&dest, value)?;
            }
            Op::CreateFrame => self.frames.create_temporary(),
            Op::PushFrame => self
                .frames
                .push_frame()
                .map_err(|e| self.frame_error(e))?,
            Op::PopFrame => self
                .frames
                .pop_frame()
                .map_err(|e| self.frame_error(e))?,
            Op::DefVar(var) => self
                .frames
                .declare(&var)
                .map_err(|e| self.frame_error(e))?,

            // Calls and the data stack
            Op::Call(label) => self.exec_call(&label)?,
            Op::Return => self.exec_return()?,
            Op::Pushs(src) => {
                let value = self.resolve(&src)?;
                self.push(value);
            }
            Op::Pops(dest) => {
                let value = self.pop()?;
                self.write_var(&dest, value)?;
            }

            // Arithmetic, relational and boolean
            Op::Arith { op, dest, lhs, rhs } => self.exec_arith(op, &dest, &lhs, &rhs)?,
            Op::Compare { op, dest, lhs, rhs } => {
                let ordering = self.compare(&lhs, &rhs)?;
                let result = match op {
                    CmpOp::Lt => ordering == Ordering::Less,
                    CmpOp::Gt => ordering == Ordering::Greater,
                    CmpOp::Eq => ordering == Ordering::Equal,
                };
                self.write_var(&dest, Value::Bool(result))?;
            }
            Op::Logic { op, dest, lhs, rhs } => {
                let a = self.resolve(&lhs)?;
                let b = self.resolve(&rhs)?;
                let result = match op {
                    LogicOp::And => a && b,
                    LogicOp::Or => a || b,
                };
                self.write_var(&dest, Value::Bool(result))?;
            }
            Op::Not { dest, src } => {
                let value = self.resolve(&src)?;
                self.write_var(&dest, Value::Bool(!value))?;
            }

            // Conversions
            Op::Int2Char { dest, code } => {
                let code = self.resolve(&code)?;
                let ch = code
                    .to_u32()
                    .and_then(char::from_u32)
                    .ok_or(RuntimeError::InvalidCodePoint { at: self.at, code })?;
                self.write_var(&dest, Value::Str(ch.to_string()))?;
            }
            Op::Stri2Int {
                dest,
                string,
                index,
            } => {
                let string = self.resolve(&string)?;
                let index = self.resolve(&index)?;
                let ch = self.char_at(&string, &index)?;
                self.write_var(&dest, Value::Int(BigInt::from(u32::from(ch))))?;
            }

            // Input and output
            Op::Read { dest, kind } => self.exec_read(&dest, kind)?,
            Op::Write(src) => {
                let value = self.resolve(&src)?;
                write!(self.output, "{value}").map_err(|e| RuntimeError::Io {
                    at: self.at,
                    message: e.to_string(),
                })?;
            }

            // Strings
            Op::Concat { dest, lhs, rhs } => {
                let mut result = self.resolve(&lhs)?;
                result.push_str(&self.resolve(&rhs)?);
                self.write_var(&dest, Value::Str(result))?;
            }
            Op::Strlen { dest, string } => {
                let length = self.resolve(&string)?.chars().count();
                self.write_var(&dest, Value::Int(BigInt::from(length)))?;
            }
            Op::GetChar {
                dest,
                string,
                index,
            } => {
                let string = self.resolve(&string)?;
                let index = self.resolve(&index)?;
                let ch = self.char_at(&string, &index)?;
                self.write_var(&dest, Value::Str(ch.to_string()))?;
            }
            Op::SetChar {
                dest,
                index,
                replacement,
            } => self.exec_setchar(&dest, &index, &replacement)?,

            // Types
            Op::Type { dest, src } => {
                let name = match &src {
                    Arg::Lit(value) => value.kind().name(),
                    Arg::Var(var) => self
                        .frames
                        .slot(var)
                        .map_err(|e| self.frame_error(e))?
                        .map_or("", |value| value.kind().name()),
                };
                self.write_var(&dest, Value::from(name))?;
            }

            // Control flow
            Op::Label(_) => {}
            Op::Jump(label) => self.pc = self.target(&label)?,
            Op::JumpIf {
                equal,
                label,
                lhs,
                rhs,
            } => {
                let target = self.target(&label)?;
                let same = self.compare(&lhs, &rhs)? == Ordering::Equal;
                if same == equal {
                    self.pc = target;
                }
            }

            // Debugging
            Op::DPrint(src) => match self.resolve(&src) {
                Ok(value) => debug!(at = self.at, %value, "dprint"),
                Err(error) => debug!(at = self.at, %error, "dprint"),
            },
            Op::Break => debug!(
                at = self.at,
                stack = self.stack.len(),
                calls = self.call_stack.len(),
                frames = self.frames.depth(),
                temporary = self.frames.temporary().is_some(),
                globals = self.frames.global().len(),
                "break"
            ),
        }

        Ok(self.state())
    }

    fn exec_call(&mut self, label: &str) -> Result<(), RuntimeError> {
        let target = self.target(label)?;
        self.call_stack.push(self.at);
        self.pc = target;
        Ok(())
    }

    /// Resume after the CALL that pushed the innermost return address.
    fn exec_return(&mut self) -> Result<(), RuntimeError> {
        let call = self
            .call_stack
            .pop()
            .ok_or(RuntimeError::EmptyCallStack { at: self.at })?;
        self.pc = call + 1;
        Ok(())
    }

    fn exec_arith(
        &mut self,
        op: ArithOp,
        dest: &VarRef,
        lhs: &Arg<BigInt>,
        rhs: &Arg<BigInt>,
    ) -> Result<(), RuntimeError> {
        let a = self.resolve(lhs)?;
        let b = self.resolve(rhs)?;
        let result = match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::IDiv => {
                if b.is_zero() {
                    return Err(RuntimeError::DivisionByZero { at: self.at });
                }
                floor_div(&a, &b)
            }
        };
        self.write_var(dest, Value::Int(result))
    }

    /// Order two symbols of the same kind. Booleans order `false < true`
    /// and strings compare by code point.
    fn compare(&self, lhs: &Arg<Value>, rhs: &Arg<Value>) -> Result<Ordering, RuntimeError> {
        let a = self.resolve(lhs)?;
        let b = self.resolve(rhs)?;
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
            (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
            (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
            _ => Err(RuntimeError::OperandType {
                at: self.at,
                expected: "operands of the same type".to_string(),
                found: format!("{} and {}", a.kind(), b.kind()),
            }),
        }
    }

    fn char_at(&self, string: &str, index: &BigInt) -> Result<char, RuntimeError> {
        index
            .to_usize()
            .and_then(|i| string.chars().nth(i))
            .ok_or_else(|| RuntimeError::StringIndexOutOfRange {
                at: self.at,
                index: index.clone(),
                length: string.chars().count(),
            })
    }

    fn exec_setchar(
        &mut self,
        dest: &VarRef,
        index: &Arg<BigInt>,
        replacement: &Arg<String>,
    ) -> Result<(), RuntimeError> {
        let current: String = self.resolve(&Arg::Var(dest.clone()))?;
        let index = self.resolve(index)?;
        let replacement = self.resolve(replacement)?;

        // Range is checked against the destination before the replacement.
        self.char_at(&current, &index)?;
        let ch = replacement
            .chars()
            .next()
            .ok_or(RuntimeError::EmptyReplacement { at: self.at })?;

        let position = index.to_usize().unwrap_or_default();
        let updated: String = current
            .chars()
            .enumerate()
            .map(|(i, c)| if i == position { ch } else { c })
            .collect();
        self.write_var(dest, Value::Str(updated))
    }

    /// Read one line of input. End of input and lines that are not UTF-8
    /// yield the kind's default.
    fn exec_read(&mut self, dest: &VarRef, kind: ValueKind) -> Result<(), RuntimeError> {
        let mut bytes = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut bytes)
            .map_err(|e| RuntimeError::Io {
                at: self.at,
                message: e.to_string(),
            })?;

        let value = if read == 0 {
            debug!(at = self.at, "end of input");
            Value::default_of(kind)
        } else {
            match String::from_utf8(bytes) {
                Ok(line) => {
                    let text = line.strip_suffix('\n').unwrap_or(&line);
                    let text = text.strip_suffix('\r').unwrap_or(text);
                    decode_lenient(kind, text)
                }
                Err(_) => {
                    debug!(at = self.at, "input line is not UTF-8");
                    Value::default_of(kind)
                }
            }
        };
        self.write_var(dest, value)
    }
}

/// Integer division rounding toward negative infinity.
pub fn floor_div(a: &BigInt, b: &BigInt) -> BigInt {
    let quotient = a / b;
    let remainder = a % b;
    if !remainder.is_zero() && remainder.is_negative() != b.is_negative() {
        quotient - 1
    } else {
        quotient
    }
}
