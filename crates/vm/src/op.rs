//! Typed operations.
//!
//! Each opcode's parameters accept a fixed operand shape: a variable, a
//! symbol (variable or literal), a label name or a type name, and some
//! symbols are narrowed to one value kind. [`Op::decode`] checks that
//! contract when an instruction is fetched, before it has any effect, and
//! yields a variant carrying operands of the right static types. Whether a
//! variable holds the right kind is only known once it is read, see
//! `VM::resolve`.

use crate::error::RuntimeError;
use ipp_common::{Instruction, Opcode, Operand, Value, ValueKind, VarRef};
use num_bigint::BigInt;

/// A symbol operand: a variable to read, or a literal already of kind `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg<T> {
    Var(VarRef),
    Lit(T),
}

/// Payload types a symbol operand can be narrowed to.
pub trait OperandValue: Sized + Clone {
    /// Name of the accepted kind in error messages.
    const EXPECTED: &'static str;

    fn extract(value: &Value) -> Option<Self>;
}

impl OperandValue for Value {
    const EXPECTED: &'static str = "any";

    fn extract(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl OperandValue for BigInt {
    const EXPECTED: &'static str = "int";

    fn extract(value: &Value) -> Option<Self> {
        value.as_int().ok().cloned()
    }
}

impl OperandValue for bool {
    const EXPECTED: &'static str = "bool";

    fn extract(value: &Value) -> Option<Self> {
        value.as_bool().ok()
    }
}

impl OperandValue for String {
    const EXPECTED: &'static str = "string";

    fn extract(value: &Value) -> Option<Self> {
        value.as_str().ok().map(str::to_string)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    IDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Gt,
    Eq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// A decoded instruction whose operands satisfy the opcode's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Move { dest: VarRef, src: Arg<Value> },
    CreateFrame,
    PushFrame,
    PopFrame,
    DefVar(VarRef),
    Call(String),
    Return,
    Pushs(Arg<Value>),
    Pops(VarRef),
    Arith {
        op: ArithOp,
        dest: VarRef,
        lhs: Arg<BigInt>,
        rhs: Arg<BigInt>,
    },
    Compare {
        op: CmpOp,
        dest: VarRef,
        lhs: Arg<Value>,
        rhs: Arg<Value>,
    },
    Logic {
        op: LogicOp,
        dest: VarRef,
        lhs: Arg<bool>,
        rhs: Arg<bool>,
    },
    Not { dest: VarRef, src: Arg<bool> },
    Int2Char { dest: VarRef, code: Arg<BigInt> },
    Stri2Int {
        dest: VarRef,
        string: Arg<String>,
        index: Arg<BigInt>,
    },
    Read { dest: VarRef, kind: ValueKind },
    Write(Arg<Value>),
    Concat {
        dest: VarRef,
        lhs: Arg<String>,
        rhs: Arg<String>,
    },
    Strlen { dest: VarRef, string: Arg<String> },
    GetChar {
        dest: VarRef,
        string: Arg<String>,
        index: Arg<BigInt>,
    },
    SetChar {
        dest: VarRef,
        index: Arg<BigInt>,
        replacement: Arg<String>,
    },
    Type { dest: VarRef, src: Arg<Value> },
    Label(String),
    Jump(String),
    JumpIf {
        equal: bool,
        label: String,
        lhs: Arg<Value>,
        rhs: Arg<Value>,
    },
    DPrint(Arg<Value>),
    Break,
}

impl Op {
    /// Check `instr`, found at order `at`, against its opcode's contract.
    pub fn decode(at: usize, instr: &Instruction) -> Result<Op, RuntimeError> {
        let mut ops = Operands::new(at, instr)?;
        let op = match instr.opcode {
            Opcode::Move => Op::Move {
                dest: ops.var()?,
                src: ops.symb()?,
            },
            Opcode::CreateFrame => Op::CreateFrame,
            Opcode::PushFrame => Op::PushFrame,
            Opcode::PopFrame => Op::PopFrame,
            Opcode::DefVar => Op::DefVar(ops.var()?),
            Opcode::Call => Op::Call(ops.label()?),
            Opcode::Return => Op::Return,
            Opcode::Pushs => Op::Pushs(ops.symb()?),
            Opcode::Pops => Op::Pops(ops.var()?),
            Opcode::Add => ops.arith(ArithOp::Add)?,
            Opcode::Sub => ops.arith(ArithOp::Sub)?,
            Opcode::Mul => ops.arith(ArithOp::Mul)?,
            Opcode::IDiv => ops.arith(ArithOp::IDiv)?,
            Opcode::Lt => ops.compare(CmpOp::Lt)?,
            Opcode::Gt => ops.compare(CmpOp::Gt)?,
            Opcode::Eq => ops.compare(CmpOp::Eq)?,
            Opcode::And => ops.logic(LogicOp::And)?,
            Opcode::Or => ops.logic(LogicOp::Or)?,
            Opcode::Not => Op::Not {
                dest: ops.var()?,
                src: ops.symb()?,
            },
            Opcode::Int2Char => Op::Int2Char {
                dest: ops.var()?,
                code: ops.symb()?,
            },
            Opcode::Stri2Int => Op::Stri2Int {
                dest: ops.var()?,
                string: ops.symb()?,
                index: ops.symb()?,
            },
            Opcode::Read => Op::Read {
                dest: ops.var()?,
                kind: ops.kind()?,
            },
            Opcode::Write => Op::Write(ops.symb()?),
            Opcode::Concat => Op::Concat {
                dest: ops.var()?,
                lhs: ops.symb()?,
                rhs: ops.symb()?,
            },
            Opcode::Strlen => Op::Strlen {
                dest: ops.var()?,
                string: ops.symb()?,
            },
            Opcode::GetChar => Op::GetChar {
                dest: ops.var()?,
                string: ops.symb()?,
                index: ops.symb()?,
            },
            Opcode::SetChar => Op::SetChar {
                dest: ops.var()?,
                index: ops.symb()?,
                replacement: ops.symb()?,
            },
            Opcode::Type => Op::Type {
                dest: ops.var()?,
                src: ops.symb()?,
            },
            Opcode::Label => Op::Label(ops.label()?),
            Opcode::Jump => Op::Jump(ops.label()?),
            Opcode::JumpIfEq => ops.jump_if(true)?,
            Opcode::JumpIfNeq => ops.jump_if(false)?,
            Opcode::DPrint => Op::DPrint(ops.symb()?),
            Opcode::Break => Op::Break,
        };
        Ok(op)
    }
}

/// Cursor over an instruction's operands in `arg1..argN` order.
struct Operands<'i> {
    at: usize,
    opcode: Opcode,
    operands: &'i [Operand],
    position: usize,
}

impl<'i> Operands<'i> {
    /// Start reading the operands of `instr`, found at order `at`.
    fn new(at: usize, instr: &'i Instruction) -> Result<Self, RuntimeError> {
        let arity = instr.opcode.arity();
        if instr.operands.len() != arity {
            return Err(RuntimeError::OperandType {
                at,
                expected: format!("{arity} operand(s) for {}", instr.opcode),
                found: describe_operands(&instr.operands),
            });
        }
        Ok(Self {
            at,
            opcode: instr.opcode,
            operands: &instr.operands,
            position: 0,
        })
    }

    fn next(&mut self, what: &str) -> Result<(&'i Operand, String), RuntimeError> {
        self.position += 1;
        let expected = format!("{what} as {} operand {}", self.opcode, self.position);
        match self.operands.get(self.position - 1) {
            Some(operand) => Ok((operand, expected)),
            None => Err(RuntimeError::OperandType {
                at: self.at,
                expected,
                found: "nothing".to_string(),
            }),
        }
    }

    fn mismatch(&self, expected: String, operand: &Operand) -> RuntimeError {
        RuntimeError::OperandType {
            at: self.at,
            expected,
            found: operand.describe(),
        }
    }

    /// A variable to write.
    fn var(&mut self) -> Result<VarRef, RuntimeError> {
        match self.next("variable")? {
            (Operand::Var(var), _) => Ok(var.clone()),
            (operand, expected) => Err(self.mismatch(expected, operand)),
        }
    }

    /// A symbol whose literal form must already be of kind `T`.
    fn symb<T: OperandValue>(&mut self) -> Result<Arg<T>, RuntimeError> {
        let what = format!("{} symbol", T::EXPECTED);
        let (operand, expected) = self.next(&what)?;
        match operand {
            Operand::Var(var) => Ok(Arg::Var(var.clone())),
            Operand::Const(value) => match T::extract(value) {
                Some(lit) => Ok(Arg::Lit(lit)),
                None => Err(self.mismatch(expected, operand)),
            },
            other => Err(self.mismatch(expected, other)),
        }
    }

    /// A label name.
    fn label(&mut self) -> Result<String, RuntimeError> {
        match self.next("label")? {
            (Operand::Label(name), _) => Ok(name.clone()),
            (operand, expected) => Err(self.mismatch(expected, operand)),
        }
    }

    /// A type name.
    fn kind(&mut self) -> Result<ValueKind, RuntimeError> {
        match self.next("type")? {
            (Operand::Type(kind), _) => Ok(*kind),
            (operand, expected) => Err(self.mismatch(expected, operand)),
        }
    }

    fn arith(&mut self, op: ArithOp) -> Result<Op, RuntimeError> {
        Ok(Op::Arith {
            op,
            dest: self.var()?,
            lhs: self.symb()?,
            rhs: self.symb()?,
        })
    }

    fn compare(&mut self, op: CmpOp) -> Result<Op, RuntimeError> {
        Ok(Op::Compare {
            op,
            dest: self.var()?,
            lhs: self.symb()?,
            rhs: self.symb()?,
        })
    }

    fn logic(&mut self, op: LogicOp) -> Result<Op, RuntimeError> {
        Ok(Op::Logic {
            op,
            dest: self.var()?,
            lhs: self.symb()?,
            rhs: self.symb()?,
        })
    }

    fn jump_if(&mut self, equal: bool) -> Result<Op, RuntimeError> {
        Ok(Op::JumpIf {
            equal,
            label: self.label()?,
            lhs: self.symb()?,
            rhs: self.symb()?,
        })
    }
}

pub(crate) fn describe_operands(operands: &[Operand]) -> String {
    match operands {
        [] => "no operand".to_string(),
        [operand] => operand.describe(),
        _ => format!("{} operands", operands.len()),
    }
}
