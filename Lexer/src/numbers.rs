use crate::token::{Token, TokenKind};
use crate::Scanner;

impl<'src> Scanner<'src> {
  /// Scans a number literal: digits, optionally followed by a `.` and
  /// more digits. The leading digit has already been consumed by
  /// `scan_token` before this is called.
  pub(crate) fn numbers_number(&mut self) -> Token<'src> {
    while self.peek().is_ascii_digit() {
      self.advance();
    }

    if self.peek() == b'.' && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
      self.advance(); // consume the '.'
      while self.peek().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenKind::Number)
  }
}

#[cfg(test)]
mod tests {
  use crate::{Scanner, TokenKind};

  #[test]
  fn integer_literal() {
    let mut s = Scanner::new(b"42;");
    let tok = s.scan_token();
    assert_eq!(tok.kind, TokenKind::Number);
    assert_eq!(tok.lexeme(), b"42");
  }

  #[test]
  fn float_literal_requires_trailing_digit() {
    // `1.` with no trailing digit: the '.' is its own token, not part of
    // the number, matching the book lineage's lookahead rule.
    let mut s = Scanner::new(b"1.");
    let tok = s.scan_token();
    assert_eq!(tok.kind, TokenKind::Number);
    assert_eq!(tok.lexeme(), b"1");
    assert_eq!(s.scan_token().kind, TokenKind::Dot);
  }
}
