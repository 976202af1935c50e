use crate::token::{Token, TokenKind};
use crate::Scanner;

impl<'src> Scanner<'src> {
  /// Scans a string literal. The opening `"` has already been consumed;
  /// this consumes up to and including the closing `"`, or produces an
  /// error token if the source ends first (spec 4.3/6.2).
  pub(crate) fn strings_string(&mut self) -> Token<'src> {
    while !self.is_at_end() && self.peek() != b'"' {
      if self.peek() == b'\n' {
        self.bump_line();
      }
      self.advance();
    }

    if self.is_at_end() {
      return self.error_token("Unterminated string.");
    }

    self.advance(); // consume the closing '"'
    self.make_token(TokenKind::String)
  }
}

#[cfg(test)]
mod tests {
  use crate::{Scanner, TokenKind};

  #[test]
  fn string_literal_includes_quotes_in_lexeme() {
    let mut s = Scanner::new(b"\"hello, world\"");
    let tok = s.scan_token();
    assert_eq!(tok.kind, TokenKind::String);
    assert_eq!(tok.lexeme(), b"\"hello, world\"");
  }

  #[test]
  fn string_literal_may_span_lines() {
    let mut s = Scanner::new(b"\"a\nb\" x");
    let tok = s.scan_token();
    assert_eq!(tok.kind, TokenKind::String);
    let next = s.scan_token();
    assert_eq!(next.line, 2);
  }
}
