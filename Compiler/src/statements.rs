use core::bytecode::OpCode;

use lexer::TokenKind;

use crate::Compiler;

impl<'src> Compiler<'src> {
  /// `declaration := "var" IDENT ("=" expression)? ";" | statement`,
  /// followed by panic-mode synchronization so one bad declaration doesn't
  /// cascade into spurious errors for the rest of the program (spec 6.4).
  pub(crate) fn declaration(&mut self) {
    if self.match_token(TokenKind::Var) {
      self.var_declaration();
    } else {
      self.statement();
    }

    if self.panic_mode {
      self.synchronize();
    }
  }

  fn var_declaration(&mut self) {
    let global = self.parse_variable("Expect variable name.");

    if self.match_token(TokenKind::Equal) {
      self.expression();
    } else {
      self.emit_op(OpCode::Nil);
    }
    self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.");

    self.define_variable(global);
  }

  /// Consumes the variable's name and declares it. Returns the constant
  /// index to pass to `define_variable` for globals; the return value is
  /// meaningless (and ignored) for locals.
  fn parse_variable(&mut self, message: &str) -> u8 {
    self.consume(TokenKind::Identifier, message);

    self.declare_variable();
    if self.scope_depth > 0 {
      return 0;
    }

    let name = self.previous;
    self.identifier_constant(&name)
  }

  fn define_variable(&mut self, global: u8) {
    if self.scope_depth > 0 {
      self.mark_initialized();
      return;
    }
    self.emit_bytes(OpCode::DefineGlobal, global);
  }

  /// `statement := "print" expression ";" | "{" declaration* "}" | expression ";"`
  pub(crate) fn statement(&mut self) {
    if self.match_token(TokenKind::Print) {
      self.print_statement();
    } else if self.match_token(TokenKind::LeftBrace) {
      self.begin_scope();
      self.block();
      self.end_scope();
    } else {
      self.expression_statement();
    }
  }

  fn print_statement(&mut self) {
    self.expression();
    self.consume(TokenKind::Semicolon, "Expect ';' after value.");
    self.emit_op(OpCode::Print);
  }

  fn expression_statement(&mut self) {
    self.expression();
    self.consume(TokenKind::Semicolon, "Expect ';' after expression.");
    self.emit_op(OpCode::Pop);
  }

  fn block(&mut self) {
    while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
      self.declaration();
    }
    self.consume(TokenKind::RightBrace, "Expect '}' after block.");
  }
}

#[cfg(test)]
mod tests {
  use core::object::Heap;

  use crate::compile;

  #[test]
  fn empty_program_compiles_to_bare_return() {
    let mut heap = Heap::new();
    let chunk = compile(b"", &mut heap).unwrap();
    assert_eq!(chunk.code.len(), 1);
  }

  #[test]
  fn block_leaves_stack_balanced() {
    let mut heap = Heap::new();
    let chunk = compile(b"{ var x = 1; var y = 2; }", &mut heap).unwrap();
    use core::bytecode::OpCode;
    let pops = chunk.code.iter().copied().filter(|&b| OpCode::try_from(b) == Ok(OpCode::Pop)).count();
    assert_eq!(pops, 2);
  }

  #[test]
  fn redefining_a_global_is_allowed() {
    let mut heap = Heap::new();
    let result = compile(b"var a = 1; var a = 2; print a;", &mut heap);
    assert!(result.is_ok());
  }

  #[test]
  fn missing_semicolon_is_a_compile_error() {
    let mut heap = Heap::new();
    let result = compile(b"print 1", &mut heap);
    assert!(result.is_err());
  }

  #[test]
  fn exactly_256_locals_compiles_but_257th_errors() {
    let mut heap = Heap::new();
    let mut src = String::from("{ ");
    for i in 0..256 {
      src.push_str(&format!("var a{i} = 0;\n"));
    }
    src.push('}');
    assert!(compile(src.as_bytes(), &mut heap).is_ok());

    let mut src = String::from("{ ");
    for i in 0..257 {
      src.push_str(&format!("var a{i} = 0;\n"));
    }
    src.push('}');
    assert!(compile(src.as_bytes(), &mut heap).is_err());
  }
}
