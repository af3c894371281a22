//! Parser for IPPcode18 tokens → instruction records.
//!
//! Each argument token is classified by the opcode's parameter shape and
//! checked with the same decoders the verifier uses, so a record produced
//! here always passes verification.

use crate::error::AsmError;
use ipp_common::literal::{decode_label, decode_operand};
use ipp_common::{ArgRecord, ArgTag, InstructionRecord, Opcode, Param, ValueKind, VarRef};

/// The header every program starts with, compared case-insensitively.
pub(crate) const HEADER: &str = ".IPPcode18";

/// Check the header line.
pub(crate) fn parse_header(tokens: &[&str], line: usize) -> Result<(), AsmError> {
    match tokens {
        [header] if header.eq_ignore_ascii_case(HEADER) => Ok(()),
        _ => Err(AsmError::InvalidHeader {
            line,
            token: tokens.join(" "),
        }),
    }
}

/// Parse the tokens of one non-empty line into the record with `order`.
pub(crate) fn parse_instruction(
    tokens: &[&str],
    order: usize,
    line: usize,
) -> Result<InstructionRecord, AsmError> {
    let (mnemonic, args) = match tokens.split_first() {
        Some(split) => split,
        None => {
            return Err(AsmError::UnexpectedToken {
                line,
                expected: "instruction",
                token: String::new(),
            })
        }
    };

    let opcode: Opcode = mnemonic.parse().map_err(|_| AsmError::UnknownOpcode {
        line,
        token: mnemonic.to_string(),
    })?;

    let params = opcode.params();
    if args.len() != params.len() {
        return Err(AsmError::ArgumentCount {
            line,
            opcode,
            expected: params.len(),
            found: args.len(),
        });
    }

    let args = params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(idx, (param, token))| {
            let (tag, text) = parse_arg(*param, token, line)?;
            Ok(ArgRecord::new(idx + 1, tag, text))
        })
        .collect::<Result<Vec<_>, AsmError>>()?;

    Ok(InstructionRecord::new(order, opcode.mnemonic(), args))
}

/// Classify `token` as an argument of shape `param`, returning its tag and
/// the raw text stored in the record.
fn parse_arg(param: Param, token: &str, line: usize) -> Result<(ArgTag, String), AsmError> {
    let literal = |source| AsmError::Literal { line, source };

    match param {
        Param::Var => {
            if !is_var(token) {
                return Err(AsmError::UnexpectedToken {
                    line,
                    expected: "variable",
                    token: token.to_string(),
                });
            }
            token.parse::<VarRef>().map_err(literal)?;
            Ok((ArgTag::Var, token.to_string()))
        }
        Param::Symb => {
            if is_var(token) {
                token.parse::<VarRef>().map_err(literal)?;
                return Ok((ArgTag::Var, token.to_string()));
            }
            let (prefix, text) = token.split_once('@').ok_or_else(|| AsmError::UnexpectedToken {
                line,
                expected: "symbol",
                token: token.to_string(),
            })?;
            let tag = match prefix.parse::<ArgTag>() {
                Ok(tag @ (ArgTag::Int | ArgTag::Bool | ArgTag::String)) => tag,
                _ => {
                    return Err(AsmError::UnexpectedToken {
                        line,
                        expected: "int@, bool@, string@ or a variable",
                        token: token.to_string(),
                    })
                }
            };
            decode_operand(tag, text).map_err(literal)?;
            Ok((tag, text.to_string()))
        }
        Param::Label => {
            decode_label(token).map_err(literal)?;
            Ok((ArgTag::Label, token.to_string()))
        }
        Param::Type => {
            token.parse::<ValueKind>().map_err(literal)?;
            Ok((ArgTag::Type, token.to_string()))
        }
    }
}

/// Whether `token` starts with a frame prefix.
fn is_var(token: &str) -> bool {
    ["GF@", "LF@", "TF@"]
        .iter()
        .any(|prefix| token.starts_with(prefix))
}
