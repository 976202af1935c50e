/// The set of instructions supported by the virtual machine (spec 4.5).
///
/// **NOTE:** changing the order or set of members creates incompatibilities
/// between different versions of the interpreter. The format is in-process
/// only (spec 6.3) so that's fine here, but it's worth knowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
  Constant,
  Nil,
  True,
  False,
  Pop,
  GetLocal,
  SetLocal,
  GetGlobal,
  DefineGlobal,
  SetGlobal,
  Equal,
  Greater,
  Less,
  Add,
  Subtract,
  Multiply,
  Divide,
  Not,
  Negate,
  Print,
  Jump,
  JumpIfFalse,
  Loop,
  Return,
}

impl OpCode {
  /// Number of one-byte operands this opcode reads from the chunk,
  /// `Jump`/`JumpIfFalse`/`Loop` each taking a 2-byte big-endian operand
  /// instead (spec 4.5's `READ_SHORT`).
  pub fn operand_len(self) -> usize {
    match self {
      OpCode::Constant | OpCode::GetLocal | OpCode::SetLocal | OpCode::GetGlobal | OpCode::DefineGlobal | OpCode::SetGlobal => 1,
      OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => 2,
      _ => 0,
    }
  }
}

impl TryFrom<u8> for OpCode {
  type Error = u8;

  fn try_from(byte: u8) -> Result<Self, u8> {
    use OpCode::*;
    const ALL: [OpCode; 24] = [
      Constant, Nil, True, False, Pop, GetLocal, SetLocal, GetGlobal, DefineGlobal, SetGlobal, Equal, Greater, Less, Add, Subtract,
      Multiply, Divide, Not, Negate, Print, Jump, JumpIfFalse, Loop, Return,
    ];
    ALL.into_iter().find(|op| *op as u8 == byte).ok_or(byte)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_through_u8() {
    for op in [OpCode::Constant, OpCode::Add, OpCode::JumpIfFalse, OpCode::Return] {
      let byte = op as u8;
      assert_eq!(OpCode::try_from(byte), Ok(op));
    }
  }

  #[test]
  fn rejects_unknown_byte() {
    assert!(OpCode::try_from(255).is_err());
  }
}
