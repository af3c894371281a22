//! Integration tests for the IPPcode18 source loader.
//!
//! Tests cover:
//! - Complete programs (assemble, verify, execute)
//! - Roundtrip properties (assemble → disassemble → assemble)
//! - Error cases (header, unknown opcode, argument count, literals)

use ipp_assembler::{assemble, disassemble, from_xml, to_xml, AsmError, Stats};
use ipp_common::{ArgTag, Opcode};
use ipp_verifier::verify;
use ipp_vm::{run_with_io, RuntimeError};
use proptest::prelude::*;

// ---- Test helpers ----

/// Assemble, verify and execute `source` with `input` on stdin.
fn run_source(source: &str, input: &str) -> Result<String, RuntimeError> {
    let assembly = assemble(source).unwrap();
    let program = verify(&assembly.records).unwrap();
    let mut out = Vec::new();
    run_with_io(&program, input.as_bytes(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

// ---- Complete programs ----

#[test]
fn hello_world() {
    let source = "\
.IPPcode18
WRITE string@Hello,\\032world!\\010
";
    assert_eq!(run_source(source, "").unwrap(), "Hello, world!\n");
}

#[test]
fn recursive_factorial_with_frames() {
    let source = "\
.IPPcode18
# factorial of GF@n via CALL and local frames
DEFVAR GF@n
DEFVAR GF@result
MOVE GF@n int@10
PUSHS GF@n
CALL fact
POPS GF@result
WRITE GF@result
JUMP end

LABEL fact
CREATEFRAME
PUSHFRAME
DEFVAR LF@k
POPS LF@k
JUMPIFEQ base LF@k int@0
DEFVAR LF@sub
SUB LF@sub LF@k int@1
PUSHS LF@sub
CALL fact
DEFVAR LF@rest
POPS LF@rest
MUL LF@rest LF@rest LF@k
PUSHS LF@rest
POPFRAME
RETURN
LABEL base
PUSHS int@1
POPFRAME
RETURN

LABEL end
";
    assert_eq!(run_source(source, "").unwrap(), "3628800");
}

#[test]
fn string_builtins() {
    let source = "\
.IPPcode18
DEFVAR GF@s
DEFVAR GF@len
DEFVAR GF@c
MOVE GF@s string@hello
CONCAT GF@s GF@s string@\\032world
STRLEN GF@len GF@s
SETCHAR GF@s int@0 string@J
GETCHAR GF@c GF@s int@4
WRITE GF@s
WRITE string@|
WRITE GF@len
WRITE string@|
WRITE GF@c
";
    assert_eq!(run_source(source, "").unwrap(), "Jello world|11|o");
}

#[test]
fn read_sum_of_inputs() {
    let source = "\
.IPPcode18
DEFVAR GF@a
DEFVAR GF@b
READ GF@a int
READ GF@b int
ADD GF@a GF@a GF@b
WRITE GF@a
";
    assert_eq!(run_source(source, "40\n2\n").unwrap(), "42");
}

#[test]
fn type_and_forward_jump() {
    let source = "\
.IPPcode18
DEFVAR GF@t
DEFVAR GF@x
TYPE GF@t GF@x
JUMPIFEQ empty GF@t string@
WRITE string@initialized
LABEL empty
WRITE string@done
";
    assert_eq!(run_source(source, "").unwrap(), "done");
}

#[test]
fn runtime_errors_surface_with_exit_codes() {
    let source = "\
.IPPcode18
DEFVAR GF@x
IDIV GF@x int@1 int@0
";
    assert_eq!(run_source(source, "").unwrap_err().exit_code(), 57);

    let source = ".IPPcode18\nWRITE TF@x\n";
    assert_eq!(run_source(source, "").unwrap_err().exit_code(), 55);
}

#[test]
fn contract_violation_passes_the_loader() {
    // A string literal is a well-formed symbol; ADD only rejects it when it runs.
    let source = ".IPPcode18\nADD GF@x string@a int@1\n";
    let assembly = assemble(source).unwrap();
    assert_eq!(assembly.records[0].args[1].tag, ArgTag::String);
    let program = verify(&assembly.records).unwrap();
    let err = run_with_io(&program, &b""[..], Vec::new()).unwrap_err();
    assert_eq!(err.exit_code(), 53);
}

// ---- Statistics ----

#[test]
fn stats_count_instructions_and_comments() {
    let source = "\
.IPPcode18 # header
# comment line
WRITE int@1 # trailing
WRITE int@2
";
    assert_eq!(
        assemble(source).unwrap().stats,
        Stats {
            instructions: 2,
            comments: 3
        }
    );
}

// ---- Roundtrip ----

#[test]
fn every_opcode_roundtrips() {
    let mut source = String::from(".IPPcode18\n");
    for opcode in ipp_common::opcode::ALL_OPCODES {
        source.push_str(opcode.mnemonic());
        for param in opcode.params() {
            source.push(' ');
            source.push_str(match param {
                ipp_common::Param::Var => "LF@v",
                ipp_common::Param::Symb => "string@s\\092",
                ipp_common::Param::Label => "target",
                ipp_common::Param::Type => "string",
            });
        }
        source.push('\n');
    }

    let first = assemble(&source).unwrap();
    assert_eq!(first.records.len(), 34);
    assert_eq!(disassemble(&first.records), source);
    let second = assemble(&disassemble(&first.records)).unwrap();
    assert_eq!(first.records, second.records);
    assert!(verify(&first.records).is_ok());
}

// ---- XML program format ----

#[test]
fn xml_carries_a_program_to_the_vm() {
    let assembly = assemble(
        "\
.IPPcode18
DEFVAR GF@s
MOVE GF@s string@a<b>&c
CONCAT GF@s GF@s string@\\032!
WRITE GF@s
",
    )
    .unwrap();
    let xml = to_xml(&assembly.records).unwrap();
    let records = from_xml(&xml).unwrap();
    assert_eq!(records, assembly.records);

    let program = verify(&records).unwrap();
    let mut out = Vec::new();
    run_with_io(&program, &b""[..], &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a<b>&c !");
}

#[test]
fn every_opcode_survives_xml() {
    let mut source = String::from(".IPPcode18\n");
    for opcode in ipp_common::opcode::ALL_OPCODES {
        source.push_str(opcode.mnemonic());
        for param in opcode.params() {
            source.push(' ');
            source.push_str(match param {
                ipp_common::Param::Var => "TF@v",
                ipp_common::Param::Symb => "int@-1",
                ipp_common::Param::Label => "loop",
                ipp_common::Param::Type => "bool",
            });
        }
        source.push('\n');
    }
    let records = assemble(&source).unwrap().records;
    assert_eq!(from_xml(&to_xml(&records).unwrap()).unwrap(), records);
}

#[test]
fn xml_order_errors_are_left_to_the_verifier() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="IPPcode18">
  <instruction order="2" opcode="BREAK"/>
</program>
"#;
    let records = from_xml(xml).unwrap();
    assert_eq!(verify(&records).unwrap_err().exit_code(), 31);
}

proptest! {
    /// Integer literals survive disassemble → assemble.
    #[test]
    fn int_literals_roundtrip(n in any::<i64>()) {
        let source = format!(".IPPcode18\nPUSHS int@{n}\n");
        let first = assemble(&source).unwrap();
        prop_assert_eq!(disassemble(&first.records), source);
    }

    /// Labels made of identifier characters are accepted verbatim.
    #[test]
    fn labels_roundtrip(name in "[a-zA-Z_$&%*-][a-zA-Z0-9_$&%*-]{0,12}") {
        let source = format!(".IPPcode18\nLABEL {name}\nJUMP {name}\n");
        let first = assemble(&source).unwrap();
        prop_assert_eq!(&first.records[0].args[0].text, &name);
        prop_assert_eq!(disassemble(&first.records), source);
    }
}

// ---- Error cases ----

#[test]
fn error_invalid_header() {
    let err = assemble(".IPPcode17\nWRITE int@1\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::InvalidHeader {
            line: 1,
            token: ".IPPcode17".to_string()
        }
    );
    assert_eq!(err.exit_code(), 21);
}

#[test]
fn error_unknown_opcode() {
    let err = assemble(".IPPcode18\nCREATEFRAME\nPRINT int@1\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::UnknownOpcode {
            line: 3,
            token: "PRINT".to_string()
        }
    );
}

#[test]
fn error_too_many_arguments() {
    let err = assemble(".IPPcode18\nBREAK now\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::ArgumentCount {
            line: 2,
            opcode: Opcode::Break,
            expected: 0,
            found: 1
        }
    );
}

#[test]
fn error_bad_literals() {
    for line in [
        "WRITE int@",
        "WRITE int@+-1",
        "WRITE bool@1",
        "WRITE string@\\12",
        "DEFVAR XF@x",
        "DEFVAR GF@",
        "READ GF@x float",
        "CALL 1st",
    ] {
        let source = format!(".IPPcode18\n{line}\n");
        let err = assemble(&source).unwrap_err();
        assert_eq!(err.exit_code(), 21, "{line}");
    }
}

#[test]
fn header_comment_only_line_after_header_is_fine() {
    assert!(assemble(".IPPcode18\n#\n").unwrap().records.is_empty());
}
