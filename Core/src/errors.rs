//! Shared diagnostic types. Compile errors accumulate a line/locus/message
//! triple (spec 6.4's `[line N] Error at 'lexeme': message`); runtime
//! errors are a small closed set of messages (spec 4.5) reported alongside
//! the `[line N] in script` trailer. Neither kind is recoverable from
//! inside the language (spec 7) — there are no exceptions.

use std::fmt;

use thiserror::Error;

/// Where a compile error's diagnostic locus should point, per spec 6.4.
#[derive(Debug, Clone)]
pub enum ErrorLocus {
  /// `Error at 'lexeme'`
  Lexeme(String),
  /// `Error at end`
  End,
  /// No locus suffix at all — used for scanner-level errors, whose
  /// message already describes the problem.
  None,
}

/// A single compile-time diagnostic.
#[derive(Debug, Clone)]
pub struct CompileError {
  pub line: u32,
  pub locus: ErrorLocus,
  pub message: String,
}

impl fmt::Display for CompileError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.locus {
      ErrorLocus::Lexeme(lexeme) => write!(f, "[line {}] Error at '{}': {}", self.line, lexeme, self.message),
      ErrorLocus::End => write!(f, "[line {}] Error at end: {}", self.line, self.message),
      ErrorLocus::None => write!(f, "[line {}] Error: {}", self.line, self.message),
    }
  }
}

/// A runtime error: the fixed vocabulary of messages spec 4.5's opcode
/// table names. Reported with `report_runtime_error`, then the VM clears
/// its stack and returns `InterpretResult::RuntimeError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
  #[error("Undefined variable '{0}'.")]
  UndefinedVariable(String),
  #[error("Operands must be numbers.")]
  OperandsMustBeNumbers,
  #[error("Operand must be a number.")]
  OperandMustBeNumber,
  #[error("Operands must be two numbers or two strings.")]
  OperandsMustBeNumbersOrStrings,
}

/// Prints a runtime error in the two-line form spec 6.4 requires:
/// the message, then `[line N] in script`.
pub fn report_runtime_error(err: &RuntimeError, line: u32) {
  eprintln!("{err}");
  eprintln!("[line {line}] in script");
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn compile_error_formats_match_spec() {
    let err = CompileError {
      line: 3,
      locus: ErrorLocus::Lexeme("+".to_string()),
      message: "Expect expression.".to_string(),
    };
    assert_eq!(err.to_string(), "[line 3] Error at '+': Expect expression.");

    let err = CompileError { line: 1, locus: ErrorLocus::End, message: "Expect ';'.".to_string() };
    assert_eq!(err.to_string(), "[line 1] Error at end: Expect ';'.");

    let err = CompileError { line: 2, locus: ErrorLocus::None, message: "Unterminated string.".to_string() };
    assert_eq!(err.to_string(), "[line 2] Error: Unterminated string.");
  }

  #[test]
  fn runtime_error_messages_match_spec() {
    assert_eq!(RuntimeError::UndefinedVariable("x".to_string()).to_string(), "Undefined variable 'x'.");
    assert_eq!(RuntimeError::OperandsMustBeNumbers.to_string(), "Operands must be numbers.");
  }
}
