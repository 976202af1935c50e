use crate::object::{Heap, ObjRef};

/// A Lox value: the tagged union of spec section 3.
#[derive(Debug, Clone, Copy)]
pub enum Value {
  Nil,
  Bool(bool),
  Number(f64),
  Obj(ObjRef),
}

impl PartialEq for Value {
  /// Same-tag structural equality for `Nil`/`Bool`/`Number`; for `Obj`,
  /// reference identity via the arena handle (valid because all strings
  /// are interned).
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Nil, Value::Nil) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Number(a), Value::Number(b)) => a == b,
      (Value::Obj(a), Value::Obj(b)) => a == b,
      _ => false,
    }
  }
}

impl Value {
  /// `isFalsey`: only `nil` and `false` are falsey (spec 4.1). Notably
  /// `0` and the empty string are truthy.
  pub fn is_falsey(&self) -> bool {
    matches!(self, Value::Nil | Value::Bool(false))
  }

  pub fn is_number(&self) -> bool {
    matches!(self, Value::Number(_))
  }

  pub fn is_obj(&self) -> bool {
    matches!(self, Value::Obj(_))
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Value::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_obj(&self) -> Option<ObjRef> {
    match self {
      Value::Obj(id) => Some(*id),
      _ => None,
    }
  }
}

/// `printValue`: renders a value's user-facing representation. Strings
/// are printed as their raw bytes (lossily, if they aren't valid UTF-8 —
/// the language itself treats them as opaque).
pub fn print_value(value: &Value, heap: &Heap) -> String {
  match value {
    Value::Nil => "nil".to_string(),
    Value::Bool(true) => "true".to_string(),
    Value::Bool(false) => "false".to_string(),
    Value::Number(n) => format!("{n}"),
    Value::Obj(id) => String::from_utf8_lossy(heap.get_str(*id).as_bytes()).into_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_nil_and_false_are_falsey() {
    assert!(Value::Nil.is_falsey());
    assert!(Value::Bool(false).is_falsey());
    assert!(!Value::Bool(true).is_falsey());
    assert!(!Value::Number(0.0).is_falsey());
  }

  #[test]
  fn equal_values_compare_equal() {
    assert_eq!(Value::Nil, Value::Nil);
    assert_eq!(Value::Number(1.0), Value::Number(1.0));
    assert_ne!(Value::Number(1.0), Value::Bool(true));
  }

  #[test]
  fn print_formats_match_spec() {
    let heap = Heap::new();
    assert_eq!(print_value(&Value::Nil, &heap), "nil");
    assert_eq!(print_value(&Value::Bool(true), &heap), "true");
    assert_eq!(print_value(&Value::Number(3.0), &heap), "3");
  }
}
