//! The scanner: a pull-based token stream over the program's source bytes
//! (spec 4.3/6.2). The compiler drives it one token at a time — there is
//! no intermediate token array, matching the "no intermediate AST"
//! single-pass design of spec section 2.

mod numbers;
mod strings;
mod token;

pub use token::{keyword_or_identifier, Token, TokenKind};

/// Scans one token at a time from a byte slice. Byte-indexed rather than
/// char-indexed: spec section 1 treats strings (and by extension, source
/// text outside of ASCII structural characters) as opaque bytes.
pub struct Scanner<'src> {
  source: &'src [u8],
  start: usize,
  current: usize,
  line: u32,
}

impl<'src> Scanner<'src> {
  pub fn new(source: &'src [u8]) -> Self {
    Scanner { source, start: 0, current: 0, line: 1 }
  }

  /// `scanToken`: produces the next token in the stream, or `TokenKind::Eof`
  /// once the source is exhausted.
  pub fn scan_token(&mut self) -> Token<'src> {
    self.skip_whitespace();
    self.start = self.current;

    if self.is_at_end() {
      return self.make_token(TokenKind::Eof);
    }

    let c = self.advance();

    if c.is_ascii_alphabetic() || c == b'_' {
      return self.identifier();
    }
    if c.is_ascii_digit() {
      return self.numbers_number();
    }

    match c {
      b'(' => self.make_token(TokenKind::LeftParen),
      b')' => self.make_token(TokenKind::RightParen),
      b'{' => self.make_token(TokenKind::LeftBrace),
      b'}' => self.make_token(TokenKind::RightBrace),
      b',' => self.make_token(TokenKind::Comma),
      b'.' => self.make_token(TokenKind::Dot),
      b'-' => self.make_token(TokenKind::Minus),
      b'+' => self.make_token(TokenKind::Plus),
      b';' => self.make_token(TokenKind::Semicolon),
      b'*' => self.make_token(TokenKind::Star),
      b'/' => self.make_token(TokenKind::Slash),
      b'!' => {
        let kind = if self.matches(b'=') { TokenKind::BangEqual } else { TokenKind::Bang };
        self.make_token(kind)
      }
      b'=' => {
        let kind = if self.matches(b'=') { TokenKind::EqualEqual } else { TokenKind::Equal };
        self.make_token(kind)
      }
      b'<' => {
        let kind = if self.matches(b'=') { TokenKind::LessEqual } else { TokenKind::Less };
        self.make_token(kind)
      }
      b'>' => {
        let kind = if self.matches(b'=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
        self.make_token(kind)
      }
      b'"' => self.strings_string(),
      _ => self.error_token("Unexpected character."),
    }
  }

  fn identifier(&mut self) -> Token<'src> {
    while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
      self.advance();
    }
    let kind = keyword_or_identifier(&self.source[self.start..self.current]);
    self.make_token(kind)
  }

  fn skip_whitespace(&mut self) {
    loop {
      if self.is_at_end() {
        return;
      }
      match self.peek() {
        b' ' | b'\r' | b'\t' => {
          self.advance();
        }
        b'\n' => {
          self.line += 1;
          self.advance();
        }
        b'/' if self.peek_next() == Some(b'/') => {
          while !self.is_at_end() && self.peek() != b'\n' {
            self.advance();
          }
        }
        _ => return,
      }
    }
  }

  pub(crate) fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  pub(crate) fn advance(&mut self) -> u8 {
    let c = self.source[self.current];
    self.current += 1;
    c
  }

  pub(crate) fn peek(&self) -> u8 {
    if self.is_at_end() {
      b'\0'
    } else {
      self.source[self.current]
    }
  }

  pub(crate) fn peek_next(&self) -> Option<u8> {
    self.source.get(self.current + 1).copied()
  }

  pub(crate) fn matches(&mut self, expected: u8) -> bool {
    if self.is_at_end() || self.source[self.current] != expected {
      return false;
    }
    self.current += 1;
    true
  }

  pub(crate) fn bump_line(&mut self) {
    self.line += 1;
  }

  pub(crate) fn make_token(&self, kind: TokenKind) -> Token<'src> {
    Token::new(kind, self.line, self.start, self.current - self.start, self.source)
  }

  pub(crate) fn error_token(&self, message: &'static str) -> Token<'src> {
    Token::new(TokenKind::Error, self.line, 0, message.len(), message.as_bytes())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(src: &str) -> Vec<TokenKind> {
    let mut scanner = Scanner::new(src.as_bytes());
    let mut out = vec![];
    loop {
      let tok = scanner.scan_token();
      let done = tok.kind == TokenKind::Eof;
      out.push(tok.kind);
      if done {
        break;
      }
    }
    out
  }

  #[test]
  fn scans_punctuation_and_operators() {
    assert_eq!(
      kinds("() {} , . - + ; * / ! != = == > >= < <="),
      vec![
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::Comma,
        TokenKind::Dot,
        TokenKind::Minus,
        TokenKind::Plus,
        TokenKind::Semicolon,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Bang,
        TokenKind::BangEqual,
        TokenKind::Equal,
        TokenKind::EqualEqual,
        TokenKind::Greater,
        TokenKind::GreaterEqual,
        TokenKind::Less,
        TokenKind::LessEqual,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn scans_keywords_and_identifiers() {
    let mut scanner = Scanner::new(b"var print foo");
    assert_eq!(scanner.scan_token().kind, TokenKind::Var);
    assert_eq!(scanner.scan_token().kind, TokenKind::Print);
    let foo = scanner.scan_token();
    assert_eq!(foo.kind, TokenKind::Identifier);
    assert_eq!(foo.lexeme(), b"foo");
  }

  #[test]
  fn scans_numbers_and_strings() {
    let mut scanner = Scanner::new(b"123 4.5 \"hi\"");
    let n1 = scanner.scan_token();
    assert_eq!(n1.kind, TokenKind::Number);
    assert_eq!(n1.lexeme(), b"123");
    let n2 = scanner.scan_token();
    assert_eq!(n2.kind, TokenKind::Number);
    assert_eq!(n2.lexeme(), b"4.5");
    let s = scanner.scan_token();
    assert_eq!(s.kind, TokenKind::String);
    assert_eq!(s.lexeme(), b"\"hi\"");
  }

  #[test]
  fn unterminated_string_is_an_error_token() {
    let mut scanner = Scanner::new(b"\"unterminated");
    let tok = scanner.scan_token();
    assert_eq!(tok.kind, TokenKind::Error);
    assert_eq!(tok.lexeme_str(), "Unterminated string.");
  }

  #[test]
  fn unexpected_character_is_an_error_token() {
    let mut scanner = Scanner::new(b"@");
    let tok = scanner.scan_token();
    assert_eq!(tok.kind, TokenKind::Error);
  }

  #[test]
  fn tracks_line_numbers_across_newlines() {
    let mut scanner = Scanner::new(b"1\n2\n3");
    assert_eq!(scanner.scan_token().line, 1);
    assert_eq!(scanner.scan_token().line, 2);
    assert_eq!(scanner.scan_token().line, 3);
  }

  #[test]
  fn skips_line_comments() {
    let mut scanner = Scanner::new(b"// a comment\nvar");
    assert_eq!(scanner.scan_token().kind, TokenKind::Var);
  }
}
