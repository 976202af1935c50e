use core::bytecode::OpCode;

use lexer::Token;

use crate::{Compiler, Local};

impl<'src> Compiler<'src> {
  pub(crate) fn begin_scope(&mut self) {
    self.scope_depth += 1;
  }

  /// Pops every local that belonged to the scope just closed, one `Pop` per
  /// local (spec 5.2) since the VM has no bulk-pop instruction.
  pub(crate) fn end_scope(&mut self) {
    self.scope_depth -= 1;

    while let Some(local) = self.locals.last() {
      if local.depth <= self.scope_depth {
        break;
      }
      self.emit_op(OpCode::Pop);
      self.locals.pop();
    }
  }

  /// Declares `self.previous` (an identifier token) as a local in the
  /// current scope, or does nothing at global scope (globals are looked up
  /// by name at runtime instead). Errors on redeclaration within the same
  /// scope (spec 5.2's shadowing rule: shadowing an *outer* scope is fine).
  pub(crate) fn declare_variable(&mut self) {
    if self.scope_depth == 0 {
      return;
    }

    let name = self.previous;
    let mut redeclared = false;
    for local in self.locals.iter().rev() {
      if local.depth != -1 && local.depth < self.scope_depth {
        break;
      }
      if identifiers_equal(&local.name, &name) {
        redeclared = true;
        break;
      }
    }
    if redeclared {
      self.error("Variable with this name already declared in this scope.");
    }

    self.add_local(name);
  }

  fn add_local(&mut self, name: Token<'src>) {
    if self.locals.len() >= core::U8_COUNT {
      self.error("Too many local variables in function.");
      return;
    }
    self.locals.push(Local { name, depth: -1 });
  }

  /// Marks the most recently declared local as initialized, making it
  /// visible to its own initializer's resolution rules from here on.
  pub(crate) fn mark_initialized(&mut self) {
    if let Some(local) = self.locals.last_mut() {
      local.depth = self.scope_depth;
    }
  }

  /// Resolves `name` to a local slot index, searching innermost-scope-first
  /// so shadowing works. Reports (but still resolves) a reference to a
  /// local in the middle of its own initializer (spec 5.2 edge case).
  pub(crate) fn resolve_local(&mut self, name: &Token<'src>) -> Option<u8> {
    let found = self.locals.iter().enumerate().rev().find(|(_, local)| identifiers_equal(&local.name, name));
    let (index, depth) = found.map(|(index, local)| (index, local.depth))?;
    if depth == -1 {
      self.error("Cannot read local variable in its own initializer.");
    }
    Some(index as u8)
  }
}

fn identifiers_equal(a: &Token<'_>, b: &Token<'_>) -> bool {
  a.lexeme() == b.lexeme()
}

#[cfg(test)]
mod tests {
  use core::object::Heap;

  use crate::compile;

  #[test]
  fn shadowing_an_outer_scope_is_allowed() {
    let mut heap = Heap::new();
    let result = compile(b"{ var a = 1; { var a = 2; print a; } print a; }", &mut heap);
    assert!(result.is_ok());
  }

  #[test]
  fn redeclaring_in_the_same_scope_is_an_error() {
    let mut heap = Heap::new();
    let result = compile(b"{ var a = 1; var a = 2; }", &mut heap);
    assert!(result.is_err());
  }

  #[test]
  fn self_reference_in_initializer_is_an_error() {
    let mut heap = Heap::new();
    let result = compile(b"{ var a = a; }", &mut heap);
    assert!(result.is_err());
  }
}
