use core::bytecode::OpCode;
use core::value::Value;

use lexer::{Token, TokenKind};

use crate::precedence::Precedence;
use crate::Compiler;

impl<'src> Compiler<'src> {
  pub(crate) fn expression(&mut self) {
    self.parse_precedence(Precedence::Assignment);
  }

  pub(crate) fn number(&mut self, _can_assign: bool) {
    let lexeme = self.previous.lexeme_str();
    let value: f64 = lexeme.parse().expect("scanner only produces well-formed number lexemes");
    self.emit_constant(Value::Number(value));
  }

  /// Strips the surrounding quotes the scanner left in the lexeme and
  /// interns the remaining bytes (spec 4.1's `copyString`).
  pub(crate) fn string(&mut self, _can_assign: bool) {
    let lexeme = self.previous.lexeme();
    let bytes = &lexeme[1..lexeme.len() - 1];
    let id = self.heap.intern(bytes);
    self.emit_constant(Value::Obj(id));
  }

  pub(crate) fn literal(&mut self, _can_assign: bool) {
    match self.previous.kind {
      TokenKind::False => self.emit_op(OpCode::False),
      TokenKind::Nil => self.emit_op(OpCode::Nil),
      TokenKind::True => self.emit_op(OpCode::True),
      _ => unreachable!("literal() only dispatched for false/nil/true"),
    }
  }

  pub(crate) fn grouping(&mut self, _can_assign: bool) {
    self.expression();
    self.consume(TokenKind::RightParen, "Expect ')' after expression.");
  }

  pub(crate) fn unary(&mut self, _can_assign: bool) {
    let operator = self.previous.kind;
    self.parse_precedence(Precedence::Unary);

    match operator {
      TokenKind::Bang => self.emit_op(OpCode::Not),
      TokenKind::Minus => self.emit_op(OpCode::Negate),
      _ => unreachable!("unary() only dispatched for '!'/'-'"),
    }
  }

  /// Emits a binary operator, per spec 4.4's table. `!=`, `<=`, and `>=`
  /// aren't their own opcodes — they're the complement of `==`, `>`, `<`.
  pub(crate) fn binary(&mut self, _can_assign: bool) {
    let operator = self.previous.kind;
    let rule_precedence = crate::precedence::rule_for(operator).precedence;
    self.parse_precedence(rule_precedence.higher());

    match operator {
      TokenKind::BangEqual => {
        self.emit_op(OpCode::Equal);
        self.emit_op(OpCode::Not);
      }
      TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
      TokenKind::Greater => self.emit_op(OpCode::Greater),
      TokenKind::GreaterEqual => {
        self.emit_op(OpCode::Less);
        self.emit_op(OpCode::Not);
      }
      TokenKind::Less => self.emit_op(OpCode::Less),
      TokenKind::LessEqual => {
        self.emit_op(OpCode::Greater);
        self.emit_op(OpCode::Not);
      }
      TokenKind::Plus => self.emit_op(OpCode::Add),
      TokenKind::Minus => self.emit_op(OpCode::Subtract),
      TokenKind::Star => self.emit_op(OpCode::Multiply),
      TokenKind::Slash => self.emit_op(OpCode::Divide),
      _ => unreachable!("binary() only dispatched for binary operators"),
    }
  }

  pub(crate) fn variable(&mut self, can_assign: bool) {
    let name = self.previous;
    self.named_variable(name, can_assign);
  }

  fn named_variable(&mut self, name: Token<'src>, can_assign: bool) {
    let (get_op, set_op, slot) = match self.resolve_local(&name) {
      Some(slot) => (OpCode::GetLocal, OpCode::SetLocal, slot),
      None => (OpCode::GetGlobal, OpCode::SetGlobal, self.identifier_constant(&name)),
    };

    if can_assign && self.match_token(TokenKind::Equal) {
      self.expression();
      self.emit_bytes(set_op, slot);
    } else {
      self.emit_bytes(get_op, slot);
    }
  }

  /// Interns `name`'s lexeme as a string constant, for use as a global
  /// variable's lookup key (spec 5.1: globals are late-bound by name).
  pub(crate) fn identifier_constant(&mut self, name: &Token<'src>) -> u8 {
    let id = self.heap.intern(name.lexeme());
    self.make_constant(Value::Obj(id))
  }
}

#[cfg(test)]
mod tests {
  use core::object::Heap;

  use crate::compile;

  #[test]
  fn compiles_a_number_literal() {
    let mut heap = Heap::new();
    let chunk = compile(b"1;", &mut heap).unwrap();
    assert_eq!(chunk.constants.len(), 1);
  }

  #[test]
  fn compiles_string_concatenation() {
    let mut heap = Heap::new();
    let chunk = compile(b"\"a\" + \"b\";", &mut heap).unwrap();
    assert_eq!(chunk.constants.len(), 2);
  }

  #[test]
  fn invalid_assignment_target_is_an_error() {
    let mut heap = Heap::new();
    let result = compile(b"1 = 2;", &mut heap);
    assert!(result.is_err());
  }

  #[test]
  fn not_equal_emits_equal_then_not() {
    use core::bytecode::OpCode;
    let mut heap = Heap::new();
    let chunk = compile(b"1 != 2;", &mut heap).unwrap();
    let ops: Vec<OpCode> = chunk.code.iter().copied().filter_map(|b| OpCode::try_from(b).ok()).collect();
    let equal_pos = ops.iter().position(|&op| op == OpCode::Equal).unwrap();
    assert_eq!(ops[equal_pos + 1], OpCode::Not);
  }
}
