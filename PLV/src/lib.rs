//! A plain-text bytecode disassembler: a read-only consumer of a `Chunk`
//! (spec section 1's "Out of scope... the debug disassembler"), used by
//! the `hinton` binary's `--trace` flag and by anyone debugging a chunk by
//! hand. The JSON-emitting frontend the teacher's `PLV` crate carried
//! (`PLVJsonGenerator`, serde_json-backed) is dropped — nothing downstream
//! of this crate consumes structured output, so plain text matches the
//! column-aligned listing style the teacher's own disassembler produces
//! without the serialization layer.

use std::fmt::Write as _;

use core::bytecode::OpCode;
use core::chunk::Chunk;
use core::object::Heap;
use core::value::print_value;

/// Disassembles every instruction in `chunk`, prefixed with a `== name ==`
/// banner, mirroring the teacher's `"{name} ------------\n"` header.
pub fn disassemble_chunk(chunk: &Chunk, heap: &Heap, name: &str) -> String {
  let mut output = String::new();
  writeln!(output, "== {name} ==").expect("String writes never fail");

  let mut offset = 0;
  while offset < chunk.len() {
    let (line, next) = disassemble_instruction(&mut output, chunk, heap, offset);
    let _ = line;
    offset = next;
  }

  output
}

/// Disassembles a single instruction and returns it as a standalone line,
/// for the `hinton` binary's `--trace` hook (one line printed per step).
pub fn trace_instruction(chunk: &Chunk, heap: &Heap, offset: usize) -> String {
  let mut out = String::new();
  disassemble_instruction(&mut out, chunk, heap, offset);
  out.trim_end().to_string()
}

/// Disassembles one instruction at `offset` into `out`, returning the
/// offset of the next instruction. Column layout: zero-padded offset,
/// source line (or `|` if unchanged from the previous instruction), the
/// opcode name, then its operand and, for constants, the constant's
/// printed value.
pub fn disassemble_instruction(out: &mut String, chunk: &Chunk, heap: &Heap, offset: usize) -> (u32, usize) {
  let line = chunk.line_for(offset);
  let same_line = offset > 0 && chunk.line_for(offset.saturating_sub(1)) == line;

  write!(out, "{offset:04} ").expect("String writes never fail");
  if same_line {
    write!(out, "   | ").expect("String writes never fail");
  } else {
    write!(out, "{line:4} ").expect("String writes never fail");
  }

  let op = match OpCode::try_from(chunk.code[offset]) {
    Ok(op) => op,
    Err(byte) => {
      writeln!(out, "Unknown opcode {byte}").expect("String writes never fail");
      return (line, offset + 1);
    }
  };

  let next = match op {
    OpCode::Constant => constant_instruction(out, "OP_CONSTANT", chunk, heap, offset),
    OpCode::GetLocal => byte_instruction(out, "OP_GET_LOCAL", chunk, offset),
    OpCode::SetLocal => byte_instruction(out, "OP_SET_LOCAL", chunk, offset),
    OpCode::GetGlobal => constant_instruction(out, "OP_GET_GLOBAL", chunk, heap, offset),
    OpCode::DefineGlobal => constant_instruction(out, "OP_DEFINE_GLOBAL", chunk, heap, offset),
    OpCode::SetGlobal => constant_instruction(out, "OP_SET_GLOBAL", chunk, heap, offset),
    OpCode::Jump => jump_instruction(out, "OP_JUMP", 1, chunk, offset),
    OpCode::JumpIfFalse => jump_instruction(out, "OP_JUMP_IF_FALSE", 1, chunk, offset),
    OpCode::Loop => jump_instruction(out, "OP_LOOP", -1, chunk, offset),
    simple => simple_instruction(out, simple_name(simple), offset),
  };

  (line, next)
}

fn simple_name(op: OpCode) -> &'static str {
  match op {
    OpCode::Nil => "OP_NIL",
    OpCode::True => "OP_TRUE",
    OpCode::False => "OP_FALSE",
    OpCode::Pop => "OP_POP",
    OpCode::Equal => "OP_EQUAL",
    OpCode::Greater => "OP_GREATER",
    OpCode::Less => "OP_LESS",
    OpCode::Add => "OP_ADD",
    OpCode::Subtract => "OP_SUBTRACT",
    OpCode::Multiply => "OP_MULTIPLY",
    OpCode::Divide => "OP_DIVIDE",
    OpCode::Not => "OP_NOT",
    OpCode::Negate => "OP_NEGATE",
    OpCode::Print => "OP_PRINT",
    OpCode::Return => "OP_RETURN",
    _ => unreachable!("simple_name only called for zero-operand opcodes"),
  }
}

fn simple_instruction(out: &mut String, name: &str, offset: usize) -> usize {
  writeln!(out, "{name}").expect("String writes never fail");
  offset + 1
}

fn byte_instruction(out: &mut String, name: &str, chunk: &Chunk, offset: usize) -> usize {
  let slot = chunk.code[offset + 1];
  writeln!(out, "{name:<16} {slot:4}").expect("String writes never fail");
  offset + 2
}

fn constant_instruction(out: &mut String, name: &str, chunk: &Chunk, heap: &Heap, offset: usize) -> usize {
  let index = chunk.code[offset + 1];
  let value = &chunk.constants[index as usize];
  writeln!(out, "{name:<16} {index:4} '{}'", print_value(value, heap)).expect("String writes never fail");
  offset + 2
}

fn jump_instruction(out: &mut String, name: &str, sign: i32, chunk: &Chunk, offset: usize) -> usize {
  let jump = chunk.read_short(offset + 1) as i32;
  let target = offset as i32 + 3 + sign * jump;
  writeln!(out, "{name:<16} {offset:4} -> {target}").expect("String writes never fail");
  offset + 3
}

#[cfg(test)]
mod tests {
  use core::object::Heap;

  use super::disassemble_chunk;

  #[test]
  fn disassembles_a_constant_and_return() {
    let mut heap = Heap::new();
    let chunk = compiler::compile(b"1;", &mut heap).unwrap();
    let text = disassemble_chunk(&chunk, &heap, "test");
    assert!(text.contains("OP_CONSTANT"));
    assert!(text.contains("OP_RETURN"));
  }
}
