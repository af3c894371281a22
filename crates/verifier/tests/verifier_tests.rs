//! Integration tests for the IPPcode18 verifier.

use ipp_common::{
    ArgRecord, ArgTag, DecodeError, InstructionRecord, Opcode, Operand, Value, ValueKind, VarRef,
};
use ipp_verifier::{verify, VerifyError};
use proptest::prelude::*;

fn record(order: usize, opcode: &str, args: Vec<ArgRecord>) -> InstructionRecord {
    InstructionRecord::new(order, opcode, args)
}

fn arg(position: usize, tag: ArgTag, text: &str) -> ArgRecord {
    ArgRecord::new(position, tag, text)
}

// ========================================================
// Valid records decode
// ========================================================

#[test]
fn accept_every_literal_kind() {
    let records = vec![
        record(1, "DEFVAR", vec![arg(1, ArgTag::Var, "GF@x")]),
        record(
            2,
            "MOVE",
            vec![arg(1, ArgTag::Var, "GF@x"), arg(2, ArgTag::Int, "-12")],
        ),
        record(3, "WRITE", vec![arg(1, ArgTag::Bool, "false")]),
        record(4, "WRITE", vec![arg(1, ArgTag::String, "a\\010b")]),
        record(
            5,
            "READ",
            vec![arg(1, ArgTag::Var, "TF@y"), arg(2, ArgTag::Type, "string")],
        ),
        record(6, "JUMP", vec![arg(1, ArgTag::Label, "end")]),
    ];
    let program = verify(&records).unwrap();
    assert_eq!(program.len(), 6);

    let ops: Vec<&[Operand]> = program
        .instructions
        .iter()
        .map(|i| i.operands.as_slice())
        .collect();
    assert_eq!(ops[1][1], Operand::Const(Value::from(-12)));
    assert_eq!(ops[2][0], Operand::Const(Value::from(false)));
    assert_eq!(ops[3][0], Operand::Const(Value::from("a\nb")));
    assert_eq!(ops[4][0], Operand::Var(VarRef::temporary("y")));
    assert_eq!(ops[4][1], Operand::Type(ValueKind::Str));
    assert_eq!(ops[5][0], Operand::Label("end".to_string()));
}

#[test]
fn opcode_is_case_insensitive() {
    let records = vec![record(1, "createFrame", vec![])];
    assert_eq!(verify(&records).unwrap().instructions[0].opcode, Opcode::CreateFrame);
}

#[test]
fn backslash_escape_is_not_rescanned() {
    // `\092` decodes to a backslash; the following `035` stays literal text.
    let records = vec![record(1, "WRITE", vec![arg(1, ArgTag::String, "\\092035")])];
    let program = verify(&records).unwrap();
    assert_eq!(
        program.instructions[0].operands[0],
        Operand::Const(Value::from("\\035"))
    );
}

// ========================================================
// Structural errors (exit status 31)
// ========================================================

#[test]
fn reject_order_gap() {
    let records = vec![
        record(1, "BREAK", vec![]),
        record(2, "BREAK", vec![]),
        record(4, "BREAK", vec![]),
    ];
    let err = verify(&records).unwrap_err();
    assert_eq!(err, VerifyError::OrderMismatch { at: 3, found: 4 });
    assert_eq!(err.exit_code(), 31);
}

#[test]
fn reject_unknown_opcode() {
    let err = verify(&[record(1, "NOP", vec![])]).unwrap_err();
    assert_eq!(
        err,
        VerifyError::Decode {
            at: 1,
            source: DecodeError::UnknownOpcode("NOP".to_string())
        }
    );
    assert_eq!(err.exit_code(), 31);
}

#[test]
fn reject_extra_argument() {
    let records = vec![record(
        1,
        "PUSHFRAME",
        vec![arg(1, ArgTag::Var, "GF@x")],
    )];
    let err = verify(&records).unwrap_err();
    assert_eq!(
        err,
        VerifyError::ArgumentCount {
            at: 1,
            opcode: Opcode::PushFrame,
            expected: 0,
            found: 1
        }
    );
    assert_eq!(err.exit_code(), 31);
}

#[test]
fn reject_arg_positions_not_starting_at_one() {
    let records = vec![record(
        1,
        "MOVE",
        vec![arg(2, ArgTag::Var, "GF@x"), arg(3, ArgTag::Int, "1")],
    )];
    assert_eq!(
        verify(&records),
        Err(VerifyError::MissingArgument { at: 1, position: 1 })
    );
}

// ========================================================
// Syntax errors (exit status 32)
// ========================================================

#[test]
fn reject_malformed_literals() {
    let cases = [
        (ArgTag::Int, "12a"),
        (ArgTag::Int, ""),
        (ArgTag::Bool, "TRUE"),
        (ArgTag::String, "bad\\x41"),
        (ArgTag::Var, "gf@x"),
        (ArgTag::Var, "GF@9x"),
        (ArgTag::Label, "has space"),
        (ArgTag::Type, "nil"),
    ];
    for (tag, text) in cases {
        let records = vec![record(1, "PUSHS", vec![arg(1, tag, text)])];
        let err = verify(&records).unwrap_err();
        assert_eq!(err.exit_code(), 32, "{tag} {text:?}");
        assert_eq!(err.at(), 1);
    }
}

#[test]
fn error_message_names_instruction() {
    let records = vec![
        record(1, "BREAK", vec![]),
        record(2, "WRITE", vec![arg(1, ArgTag::Int, "x")]),
    ];
    let err = verify(&records).unwrap_err();
    assert_eq!(err.to_string(), "invalid int literal 'x' at instruction 2");
}

// ========================================================
// Properties
// ========================================================

proptest! {
    /// Argument enumeration order never matters, only `argN` positions.
    #[test]
    fn argument_order_is_irrelevant(swap in any::<bool>(), n in any::<i64>()) {
        let mut args = vec![arg(1, ArgTag::Var, "LF@v"), arg(2, ArgTag::Int, &n.to_string())];
        if swap {
            args.reverse();
        }
        let program = verify(&[record(1, "MOVE", args)]).unwrap();
        prop_assert_eq!(
            &program.instructions[0].operands,
            &vec![Operand::Var(VarRef::local("v")), Operand::Const(Value::from(n))]
        );
    }

    /// Any misnumbered record is reported at its own position.
    #[test]
    fn first_bad_order_is_reported(len in 1usize..20, bad in 0usize..20) {
        prop_assume!(bad < len);
        let records: Vec<_> = (0..len)
            .map(|idx| {
                let order = if idx == bad { idx + 2 } else { idx + 1 };
                record(order, "BREAK", vec![])
            })
            .collect();
        let err = verify(&records).unwrap_err();
        prop_assert_eq!(err.at(), bad + 1);
    }
}
