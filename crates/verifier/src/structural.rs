//! Structural validation pass for instruction records.
//!
//! Checks record order, the `argN` sequence and opcode arity, then decodes
//! every argument into an [`Operand`].

use crate::error::VerifyError;
use ipp_common::literal::decode_operand;
use ipp_common::{ArgRecord, Instruction, InstructionRecord, Opcode, Operand};

/// Validate and decode a single record found at 1-based position `at`.
pub fn decode_record(at: usize, record: &InstructionRecord) -> Result<Instruction, VerifyError> {
    if record.order != at {
        return Err(VerifyError::OrderMismatch {
            at,
            found: record.order,
        });
    }

    let opcode: Opcode = record
        .opcode
        .parse()
        .map_err(|source| VerifyError::Decode { at, source })?;

    let args = ordered_args(at, &record.args)?;
    if args.len() != opcode.arity() {
        return Err(VerifyError::ArgumentCount {
            at,
            opcode,
            expected: opcode.arity(),
            found: args.len(),
        });
    }

    let operands = args
        .iter()
        .map(|arg| decode_operand(arg.tag, &arg.text))
        .collect::<Result<Vec<Operand>, _>>()
        .map_err(|source| VerifyError::Decode { at, source })?;

    Ok(Instruction::new(opcode, operands))
}

/// Sort arguments by `argN` position and check the positions are exactly
/// `1..=N`.
fn ordered_args(at: usize, args: &[ArgRecord]) -> Result<Vec<&ArgRecord>, VerifyError> {
    let mut sorted: Vec<&ArgRecord> = args.iter().collect();
    sorted.sort_by_key(|arg| arg.position);

    for (idx, arg) in sorted.iter().enumerate() {
        let expected = idx + 1;
        if arg.position < expected {
            return Err(VerifyError::DuplicateArgument {
                at,
                position: arg.position,
            });
        }
        if arg.position > expected {
            return Err(VerifyError::MissingArgument {
                at,
                position: expected,
            });
        }
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipp_common::{ArgTag, Value, VarRef};

    fn record(order: usize, opcode: &str, args: Vec<ArgRecord>) -> InstructionRecord {
        InstructionRecord::new(order, opcode, args)
    }

    #[test]
    fn decodes_move() {
        let r = record(
            1,
            "MOVE",
            vec![
                ArgRecord::new(1, ArgTag::Var, "GF@x"),
                ArgRecord::new(2, ArgTag::Int, "5"),
            ],
        );
        let instr = decode_record(1, &r).unwrap();
        assert_eq!(instr.opcode, Opcode::Move);
        assert_eq!(
            instr.operands,
            vec![
                Operand::Var(VarRef::global("x")),
                Operand::Const(Value::from(5))
            ]
        );
    }

    #[test]
    fn args_are_reordered_by_position() {
        let r = record(
            1,
            "MOVE",
            vec![
                ArgRecord::new(2, ArgTag::Bool, "true"),
                ArgRecord::new(1, ArgTag::Var, "LF@b"),
            ],
        );
        let instr = decode_record(1, &r).unwrap();
        assert_eq!(instr.operands[0], Operand::Var(VarRef::local("b")));
        assert_eq!(instr.operands[1], Operand::Const(Value::from(true)));
    }

    #[test]
    fn order_mismatch() {
        let r = record(2, "BREAK", vec![]);
        assert_eq!(
            decode_record(1, &r),
            Err(VerifyError::OrderMismatch { at: 1, found: 2 })
        );
    }

    #[test]
    fn duplicate_position() {
        let r = record(
            1,
            "MOVE",
            vec![
                ArgRecord::new(1, ArgTag::Var, "GF@x"),
                ArgRecord::new(1, ArgTag::Var, "GF@y"),
            ],
        );
        assert_eq!(
            decode_record(1, &r),
            Err(VerifyError::DuplicateArgument { at: 1, position: 1 })
        );
    }

    #[test]
    fn gap_in_positions() {
        let r = record(
            1,
            "MOVE",
            vec![
                ArgRecord::new(1, ArgTag::Var, "GF@x"),
                ArgRecord::new(3, ArgTag::Int, "1"),
            ],
        );
        assert_eq!(
            decode_record(1, &r),
            Err(VerifyError::MissingArgument { at: 1, position: 2 })
        );
    }

    #[test]
    fn positions_must_start_at_one() {
        let r = record(1, "WRITE", vec![ArgRecord::new(0, ArgTag::Int, "1")]);
        assert_eq!(
            decode_record(1, &r),
            Err(VerifyError::DuplicateArgument { at: 1, position: 0 })
        );
    }

    #[test]
    fn wrong_arity() {
        let r = record(1, "ADD", vec![ArgRecord::new(1, ArgTag::Var, "GF@x")]);
        assert_eq!(
            decode_record(1, &r),
            Err(VerifyError::ArgumentCount {
                at: 1,
                opcode: Opcode::Add,
                expected: 3,
                found: 1
            })
        );
    }

    #[test]
    fn unknown_opcode() {
        let r = record(1, "HALT", vec![]);
        let err = decode_record(1, &r).unwrap_err();
        assert_eq!(err.exit_code(), 31);
    }

    #[test]
    fn malformed_literal_is_syntax_error() {
        let r = record(1, "WRITE", vec![ArgRecord::new(1, ArgTag::Int, "1e3")]);
        let err = decode_record(1, &r).unwrap_err();
        assert_eq!(err.exit_code(), 32);
    }

    #[test]
    fn kind_contract_is_not_checked_here() {
        // A label where a variable belongs decodes fine; the VM rejects it
        // when the instruction executes.
        let r = record(1, "DEFVAR", vec![ArgRecord::new(1, ArgTag::Label, "x")]);
        let instr = decode_record(1, &r).unwrap();
        assert_eq!(instr.operands, vec![Operand::Label("x".to_string())]);
    }
}
