pub mod bytecode;
pub mod chunk;
pub mod errors;
pub mod object;
pub mod value;

/// The current version of the interpreter.
pub const VERSION: &str = "0.1.0";

/// The maximum number of locals live in a single compilation unit, and the
/// maximum number of constants addressable by a single-byte operand.
pub const U8_COUNT: usize = u8::MAX as usize + 1;

/// The outcome of a single call to `interpret`.
#[derive(Debug, Eq, PartialEq)]
pub enum InterpretResult {
  Ok,
  CompileError,
  RuntimeError,
}
