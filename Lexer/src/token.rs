/// The types of tokens a Lox program's source text can produce (spec 4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  // Single-character punctuation.
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  Comma,
  Dot,
  Minus,
  Plus,
  Semicolon,
  Slash,
  Star,

  // One- or two-character punctuation.
  Bang,
  BangEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,

  // Literals.
  Identifier,
  String,
  Number,

  // Keywords.
  And,
  Class,
  Else,
  False,
  For,
  Fun,
  If,
  Nil,
  Or,
  Print,
  Return,
  Super,
  This,
  True,
  Var,
  While,

  Error,
  Eof,
}

/// A single lexical unit. `start`/`length` index into the scanner's source
/// buffer rather than owning a copy of the lexeme (spec 4.3).
#[derive(Debug, Clone, Copy)]
pub struct Token<'src> {
  pub kind: TokenKind,
  pub line: u32,
  start: usize,
  length: usize,
  source: &'src [u8],
}

impl<'src> Token<'src> {
  pub(crate) fn new(kind: TokenKind, line: u32, start: usize, length: usize, source: &'src [u8]) -> Self {
    Token { kind, line, start, length, source }
  }

  /// A zero-length `Eof` token used only to seed a compiler's `current`/
  /// `previous` fields before the first real `advance()` call.
  pub fn placeholder(source: &'src [u8]) -> Self {
    Token { kind: TokenKind::Eof, line: 0, start: 0, length: 0, source }
  }

  /// The token's raw bytes. For `Error` tokens this is the error message
  /// instead of source text (spec 4.3's "payload is the message text").
  pub fn lexeme(&self) -> &'src [u8] {
    &self.source[self.start..self.start + self.length]
  }

  /// Convenience accessor for diagnostics and tests; lossy because source
  /// text itself is expected to be ASCII/UTF-8 even though string *values*
  /// are opaque bytes.
  pub fn lexeme_str(&self) -> std::borrow::Cow<'src, str> {
    String::from_utf8_lossy(self.lexeme())
  }
}

/// Maps a scanned identifier's bytes to the matching keyword token kind,
/// or `Identifier` if it isn't a keyword.
pub fn keyword_or_identifier(bytes: &[u8]) -> TokenKind {
  match bytes {
    b"and" => TokenKind::And,
    b"class" => TokenKind::Class,
    b"else" => TokenKind::Else,
    b"false" => TokenKind::False,
    b"for" => TokenKind::For,
    b"fun" => TokenKind::Fun,
    b"if" => TokenKind::If,
    b"nil" => TokenKind::Nil,
    b"or" => TokenKind::Or,
    b"print" => TokenKind::Print,
    b"return" => TokenKind::Return,
    b"super" => TokenKind::Super,
    b"this" => TokenKind::This,
    b"true" => TokenKind::True,
    b"var" => TokenKind::Var,
    b"while" => TokenKind::While,
    _ => TokenKind::Identifier,
  }
}
