//! Process exit statuses shared by every stage of the interpreter.
//!
//! The first fatal condition decides the status; 0 means the program ran
//! to completion.

/// Normal completion.
pub const SUCCESS: i32 = 0;
/// Missing or malformed command-line arguments.
pub const ARGUMENTS: i32 = 10;
/// Input file cannot be opened or read.
pub const INPUT_FILE: i32 = 11;
/// Output file cannot be created or written.
pub const OUTPUT_FILE: i32 = 12;
/// Lexical or syntax error in IPPcode18 source text.
pub const SOURCE: i32 = 21;
/// Malformed instruction record (order, opcode, argument shape).
pub const STRUCTURE: i32 = 31;
/// Malformed literal in an operand.
pub const SYNTAX: i32 = 32;
/// Duplicate label, unknown jump target, variable redefinition.
pub const SEMANTIC: i32 = 52;
/// Operand kind does not satisfy the opcode's contract.
pub const OPERAND_TYPE: i32 = 53;
/// Access to a variable that was never declared.
pub const UNDEFINED_VARIABLE: i32 = 54;
/// Access to an absent local or temporary frame.
pub const MISSING_FRAME: i32 = 55;
/// Read of an uninitialized slot or pop from an empty stack.
pub const MISSING_VALUE: i32 = 56;
/// Integer division by zero.
pub const ZERO_DIVISION: i32 = 57;
/// Out-of-range character access or invalid code point.
pub const STRING_RANGE: i32 = 58;
/// Failure outside the program's control (e.g. stdout closed).
pub const INTERNAL: i32 = 99;
