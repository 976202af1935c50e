//! The stack-based interpreter (spec 4.5). The VM owns the object heap and
//! global environment across calls to `interpret`, so a REPL session's
//! later lines can still see globals and interned strings a prior line
//! created — the process-wide, single-instance VM of spec section 5.

mod run;

use std::hash::BuildHasherDefault;
use std::io::{self, Write};

use hashbrown::HashMap;

use core::bytecode::OpCode;
use core::chunk::Chunk;
use core::errors::report_runtime_error;
use core::object::{FnvHasher, Heap, ObjRef};
use core::value::Value;
use core::InterpretResult;

/// Global variables, keyed by the interned `ObjRef` of their name. Because
/// every reference to a given name shares the same interned string, this
/// is equivalent to hashing the name's bytes (spec 9's design note).
type Globals = HashMap<ObjRef, Value, BuildHasherDefault<FnvHasher>>;

/// Process-wide interpreter state: the value stack, global environment,
/// and object heap, all of which outlive any single `interpret` call.
pub struct Vm {
  stack: Vec<Value>,
  globals: Globals,
  heap: Heap,
  chunk: Chunk,
  ip: usize,
  /// `print` writes here (spec 4.5's `OP_PRINT`). Real stdout by default;
  /// swappable so tests can assert on captured output (spec 8's
  /// end-to-end scenarios) without touching the process's actual stdout.
  out: Box<dyn Write>,
}

impl Default for Vm {
  fn default() -> Self {
    Vm::new()
  }
}

impl Vm {
  pub fn new() -> Self {
    Vm::with_writer(io::stdout())
  }

  /// Builds a VM that writes `print` output to `writer` instead of stdout.
  pub fn with_writer(writer: impl Write + 'static) -> Self {
    Vm {
      stack: Vec::new(),
      globals: Globals::default(),
      heap: Heap::new(),
      chunk: Chunk::new(),
      ip: 0,
      out: Box::new(writer),
    }
  }

  /// `interpret(source)`: compiles `source` into a fresh chunk against the
  /// VM's own heap (so constants compiled this call intern into the same
  /// table earlier REPL lines used), then runs it (spec 4.5).
  pub fn interpret(&mut self, source: &[u8]) -> InterpretResult {
    let chunk = match compiler::compile(source, &mut self.heap) {
      Ok(chunk) => chunk,
      Err(errors) => {
        for error in &errors {
          eprintln!("{error}");
        }
        return InterpretResult::CompileError;
      }
    };

    self.chunk = chunk;
    self.ip = 0;
    self.run()
  }

  fn push(&mut self, value: Value) {
    self.stack.push(value);
  }

  fn pop(&mut self) -> Value {
    self.stack.pop().expect("well-formed chunks never underflow the stack (spec 8's testable property)")
  }

  fn peek(&self, distance: usize) -> Value {
    self.stack[self.stack.len() - 1 - distance]
  }

  fn read_byte(&mut self) -> u8 {
    let byte = self.chunk.code[self.ip];
    self.ip += 1;
    byte
  }

  fn read_short(&mut self) -> u16 {
    let value = self.chunk.read_short(self.ip);
    self.ip += 2;
    value
  }

  fn read_constant(&mut self) -> Value {
    let index = self.read_byte();
    self.chunk.constants[index as usize]
  }

  fn read_op(&mut self) -> OpCode {
    let byte = self.read_byte();
    OpCode::try_from(byte).expect("compiler only ever emits valid opcodes")
  }

  /// Bails out of the running chunk on a runtime error: reports it against
  /// the line of the instruction just executed, then clears the stack
  /// (spec 4.5: "clear the stack; return RuntimeError").
  fn runtime_error(&mut self, err: core::errors::RuntimeError) -> InterpretResult {
    let line = self.chunk.line_for(self.ip - 1);
    report_runtime_error(&err, line);
    self.stack.clear();
    InterpretResult::RuntimeError
  }
}
