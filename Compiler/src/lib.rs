//! The single-pass compiler: Pratt-parses source tokens straight into
//! bytecode with no intermediate AST (spec section 2). This folds what the
//! source lineage split into separate parser/analyzer passes into one
//! recursive-descent-plus-precedence-climbing pass, the way a from-scratch
//! Rust clox port does it rather than the teacher's tree-walking shape.

mod expressions;
mod precedence;
mod scope;
mod statements;

use core::chunk::Chunk;
use core::errors::{CompileError, ErrorLocus};
use core::object::Heap;

use lexer::{Scanner, Token, TokenKind};

/// A local variable tracked at compile time. `depth == -1` marks "declared
/// but not yet initialized" (spec 5.2's self-reference guard).
pub(crate) struct Local<'src> {
  name: Token<'src>,
  depth: i32,
}

/// All state threaded through compilation: the token stream, the chunk
/// being built, the local-variable table, and error bookkeeping. Lives for
/// the duration of a single `compile` call.
pub struct Compiler<'src> {
  scanner: Scanner<'src>,
  current: Token<'src>,
  previous: Token<'src>,
  had_error: bool,
  panic_mode: bool,
  errors: Vec<CompileError>,

  chunk: Chunk,
  heap: &'src mut Heap,

  locals: Vec<Local<'src>>,
  scope_depth: i32,
}

/// Compiles `source` into a `Chunk`, interning any string constants into
/// `heap` along the way. On failure, returns every accumulated diagnostic
/// rather than just the first (spec 6.4: compilation keeps going after an
/// error via panic-mode recovery so it can report more than one mistake).
pub fn compile(source: &[u8], heap: &mut Heap) -> Result<Chunk, Vec<CompileError>> {
  let mut compiler = Compiler::new(source, heap);
  compiler.advance();

  while !compiler.check(TokenKind::Eof) {
    compiler.declaration();
  }

  compiler.consume(TokenKind::Eof, "Expect end of expression.");
  compiler.end_compiler()
}

impl<'src> Compiler<'src> {
  fn new(source: &'src [u8], heap: &'src mut Heap) -> Self {
    let placeholder = Token::placeholder(source);
    Compiler {
      scanner: Scanner::new(source),
      current: placeholder,
      previous: placeholder,
      had_error: false,
      panic_mode: false,
      errors: Vec::new(),
      chunk: Chunk::new(),
      heap,
      locals: Vec::new(),
      scope_depth: 0,
    }
  }

  fn end_compiler(mut self) -> Result<Chunk, Vec<CompileError>> {
    self.emit_return();
    if self.had_error {
      Err(self.errors)
    } else {
      Ok(self.chunk)
    }
  }

  // -- token stream -------------------------------------------------------

  /// Advances past `current`, skipping (and reporting) any error tokens the
  /// scanner produces so the rest of the compiler never sees one.
  fn advance(&mut self) {
    self.previous = self.current;

    loop {
      self.current = self.scanner.scan_token();
      if self.current.kind != TokenKind::Error {
        break;
      }
      let message = self.current.lexeme_str().into_owned();
      self.error_at_current_raw(message);
    }
  }

  fn check(&self, kind: TokenKind) -> bool {
    self.current.kind == kind
  }

  fn match_token(&mut self, kind: TokenKind) -> bool {
    if !self.check(kind) {
      return false;
    }
    self.advance();
    true
  }

  fn consume(&mut self, kind: TokenKind, message: &str) {
    if self.current.kind == kind {
      self.advance();
      return;
    }
    self.error_at_current(message);
  }

  /// Statement-boundary panic-mode recovery (spec 6.4): skips tokens until
  /// a `;` or a keyword that starts a new statement/declaration.
  fn synchronize(&mut self) {
    self.panic_mode = false;

    while self.current.kind != TokenKind::Eof {
      if self.previous.kind == TokenKind::Semicolon {
        return;
      }
      match self.current.kind {
        TokenKind::Class
        | TokenKind::Fun
        | TokenKind::Var
        | TokenKind::For
        | TokenKind::If
        | TokenKind::While
        | TokenKind::Print
        | TokenKind::Return => return,
        _ => self.advance(),
      }
    }
  }

  // -- diagnostics ----------------------------------------------------------

  fn error(&mut self, message: &str) {
    self.error_at(self.previous, message.to_string());
  }

  fn error_at_current(&mut self, message: &str) {
    self.error_at(self.current, message.to_string());
  }

  fn error_at_current_raw(&mut self, message: String) {
    self.error_at(self.current, message);
  }

  fn error_at(&mut self, token: Token<'src>, message: String) {
    if self.panic_mode {
      return;
    }
    self.panic_mode = true;

    let locus = match token.kind {
      TokenKind::Eof => ErrorLocus::End,
      TokenKind::Error => ErrorLocus::None,
      _ => ErrorLocus::Lexeme(token.lexeme_str().into_owned()),
    };
    self.errors.push(CompileError { line: token.line, locus, message });
    self.had_error = true;
  }

  // -- emission -------------------------------------------------------------

  fn emit_byte(&mut self, byte: u8) {
    let line = self.previous.line;
    self.chunk.write_byte(byte, line);
  }

  fn emit_op(&mut self, op: core::bytecode::OpCode) {
    self.emit_byte(op as u8);
  }

  fn emit_bytes(&mut self, a: core::bytecode::OpCode, b: u8) {
    self.emit_op(a);
    self.emit_byte(b);
  }

  fn emit_return(&mut self) {
    self.emit_op(core::bytecode::OpCode::Return);
  }

  /// Adds `value` to the constant pool, enforcing spec 4.4's 256-constant
  /// cap (a single-byte operand can't address more).
  fn make_constant(&mut self, value: core::value::Value) -> u8 {
    let index = self.chunk.add_constant(value);
    if index > u8::MAX as usize {
      self.error("Too many constants in one chunk.");
      return 0;
    }
    index as u8
  }

  fn emit_constant(&mut self, value: core::value::Value) {
    let constant = self.make_constant(value);
    self.emit_bytes(core::bytecode::OpCode::Constant, constant);
  }
}
