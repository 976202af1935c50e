use core::object::Heap;

#[test]
fn panic_mode_suppresses_cascading_errors_within_one_statement() {
  let mut heap = Heap::new();
  // `1 +;` has two things wrong with it (missing right operand, and the
  // statement doesn't terminate where expected) but panic mode means only
  // the first is reported before synchronizing at the `;`.
  let errors = compiler::compile(b"1 +;", &mut heap).unwrap_err();
  assert_eq!(errors.len(), 1);
}

#[test]
fn two_malformed_statements_report_two_diagnostics() {
  let mut heap = Heap::new();
  let errors = compiler::compile(b"1 +; 2 +;", &mut heap).unwrap_err();
  assert_eq!(errors.len(), 2);
}

#[test]
fn redeclaring_a_local_reports_the_spec_message() {
  let mut heap = Heap::new();
  let errors = compiler::compile(b"{ var a = 1; var a = 2; }", &mut heap).unwrap_err();
  assert!(errors[0].to_string().contains("Variable with this name already declared in this scope."));
}

#[test]
fn local_slot_index_equals_declaration_order() {
  // Not directly observable from `Chunk` alone, but GET_LOCAL/SET_LOCAL
  // operands should match each local's position in source order.
  let mut heap = Heap::new();
  let chunk = compiler::compile(b"{ var a = 1; var b = 2; print a; print b; }", &mut heap).unwrap();
  let code = &chunk.code;
  let get_local_positions: Vec<u8> =
    code.windows(2).filter(|w| core::bytecode::OpCode::try_from(w[0]) == Ok(core::bytecode::OpCode::GetLocal)).map(|w| w[1]).collect();
  assert_eq!(get_local_positions, vec![0, 1]);
}
