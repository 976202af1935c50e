use std::io::Write as _;

use core::bytecode::OpCode;
use core::errors::RuntimeError;
use core::value::{print_value, Value};
use core::InterpretResult;

use crate::Vm;

impl Vm {
  /// The fetch-decode-dispatch loop (spec 4.5). Runs until `OP_RETURN` or
  /// a runtime error.
  pub(crate) fn run(&mut self) -> InterpretResult {
    loop {
      if tracing::enabled!(tracing::Level::TRACE) {
        tracing::trace!("{}", plv::trace_instruction(&self.chunk, &self.heap, self.ip));
      }

      match self.read_op() {
        OpCode::Constant => {
          let value = self.read_constant();
          self.push(value);
        }
        OpCode::Nil => self.push(Value::Nil),
        OpCode::True => self.push(Value::Bool(true)),
        OpCode::False => self.push(Value::Bool(false)),
        OpCode::Pop => {
          self.pop();
        }
        OpCode::GetLocal => {
          let slot = self.read_byte();
          self.push(self.stack[slot as usize]);
        }
        OpCode::SetLocal => {
          let slot = self.read_byte();
          self.stack[slot as usize] = self.peek(0);
        }
        OpCode::GetGlobal => {
          let name = self.read_constant().as_obj().expect("GET_GLOBAL's constant is always an interned name");
          match self.globals.get(&name) {
            Some(&value) => self.push(value),
            None => {
              let text = String::from_utf8_lossy(self.heap.get_str(name).as_bytes()).into_owned();
              return self.runtime_error(RuntimeError::UndefinedVariable(text));
            }
          }
        }
        OpCode::DefineGlobal => {
          let name = self.read_constant().as_obj().expect("DEFINE_GLOBAL's constant is always an interned name");
          let value = self.pop();
          self.globals.insert(name, value);
        }
        OpCode::SetGlobal => {
          let name = self.read_constant().as_obj().expect("SET_GLOBAL's constant is always an interned name");
          if !self.globals.contains_key(&name) {
            let text = String::from_utf8_lossy(self.heap.get_str(name).as_bytes()).into_owned();
            return self.runtime_error(RuntimeError::UndefinedVariable(text));
          }
          self.globals.insert(name, self.peek(0));
        }
        OpCode::Equal => {
          let b = self.pop();
          let a = self.pop();
          self.push(Value::Bool(a == b));
        }
        OpCode::Greater => match self.numeric_binary_operands() {
          Ok((a, b)) => self.push(Value::Bool(a > b)),
          Err(result) => return result,
        },
        OpCode::Less => match self.numeric_binary_operands() {
          Ok((a, b)) => self.push(Value::Bool(a < b)),
          Err(result) => return result,
        },
        OpCode::Add => match self.add() {
          Ok(()) => {}
          Err(result) => return result,
        },
        OpCode::Subtract => match self.numeric_binary_operands() {
          Ok((a, b)) => self.push(Value::Number(a - b)),
          Err(result) => return result,
        },
        OpCode::Multiply => match self.numeric_binary_operands() {
          Ok((a, b)) => self.push(Value::Number(a * b)),
          Err(result) => return result,
        },
        OpCode::Divide => match self.numeric_binary_operands() {
          Ok((a, b)) => self.push(Value::Number(a / b)),
          Err(result) => return result,
        },
        OpCode::Not => {
          let value = self.pop();
          self.push(Value::Bool(value.is_falsey()));
        }
        OpCode::Negate => {
          if !self.peek(0).is_number() {
            return self.runtime_error(RuntimeError::OperandMustBeNumber);
          }
          let value = self.pop().as_number().expect("checked above");
          self.push(Value::Number(-value));
        }
        OpCode::Print => {
          let value = self.pop();
          let _ = writeln!(self.out, "{}", print_value(&value, &self.heap));
        }
        OpCode::Jump => {
          let offset = self.read_short();
          self.ip += offset as usize;
        }
        OpCode::JumpIfFalse => {
          let offset = self.read_short();
          if self.peek(0).is_falsey() {
            self.ip += offset as usize;
          }
        }
        OpCode::Loop => {
          let offset = self.read_short();
          self.ip -= offset as usize;
        }
        OpCode::Return => return InterpretResult::Ok,
      }
    }
  }

  /// Pops `b` then `a`, requiring both to be `Number` (spec 4.5's shared
  /// type check for `GREATER`/`LESS`/`SUBTRACT`/`MULTIPLY`/`DIVIDE`).
  fn numeric_binary_operands(&mut self) -> Result<(f64, f64), InterpretResult> {
    if !self.peek(0).is_number() || !self.peek(1).is_number() {
      return Err(self.runtime_error(RuntimeError::OperandsMustBeNumbers));
    }
    let b = self.pop().as_number().expect("checked above");
    let a = self.pop().as_number().expect("checked above");
    Ok((a, b))
  }

  /// `ADD`: string concatenation if both operands are strings, numeric add
  /// if both are numbers, otherwise a runtime error (no coercion).
  fn add(&mut self) -> Result<(), InterpretResult> {
    let (b, a) = (self.peek(0), self.peek(1));
    match (a.as_obj(), b.as_obj()) {
      (Some(a_id), Some(b_id)) => {
        self.pop();
        self.pop();
        let result = self.heap.concat(a_id, b_id);
        self.push(Value::Obj(result));
        Ok(())
      }
      _ => match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) => {
          self.pop();
          self.pop();
          self.push(Value::Number(a + b));
          Ok(())
        }
        _ => Err(self.runtime_error(RuntimeError::OperandsMustBeNumbersOrStrings)),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use core::InterpretResult;

  use crate::Vm;

  #[test]
  fn well_formed_chunk_leaves_stack_empty_before_return() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"print 1 + 2;"), InterpretResult::Ok);
    assert!(vm.stack.is_empty());
  }

  #[test]
  fn string_concatenation() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"print \"foo\" + \"bar\";"), InterpretResult::Ok);
  }

  #[test]
  fn adding_string_and_number_is_a_runtime_error() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"\"a\" + 1;"), InterpretResult::RuntimeError);
  }

  #[test]
  fn negating_a_non_number_is_a_runtime_error() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"-true;"), InterpretResult::RuntimeError);
  }

  #[test]
  fn globals_persist_across_interpret_calls() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"var a = 1;"), InterpretResult::Ok);
    assert_eq!(vm.interpret(b"print a;"), InterpretResult::Ok);
  }

  #[test]
  fn redefining_a_global_is_allowed_and_visible() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"var a = 1; var a = 2; print a;"), InterpretResult::Ok);
  }

  #[test]
  fn block_scope_leaves_stack_balanced() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"{ var x = 1; var y = 2; print x + y; }"), InterpretResult::Ok);
    assert!(vm.stack.is_empty());
  }

  #[test]
  fn falsey_values() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"print !nil; print !0; print !\"\";"), InterpretResult::Ok);
  }

  #[test]
  fn empty_program_runs_to_ok() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b""), InterpretResult::Ok);
  }

  #[test]
  fn undefined_global_read_is_a_runtime_error() {
    let mut vm = Vm::new();
    assert_eq!(vm.interpret(b"print nope;"), InterpretResult::RuntimeError);
  }
}
