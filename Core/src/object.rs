//! The heap: an arena of garbage-collected objects plus the string intern
//! table. Per the design note in spec section 9, object references are
//! arena handles (`ObjRef`) rather than raw pointers threaded through
//! `Value`; the arena is freed as a unit when the `Heap` is dropped, which
//! replaces the source's intrusive linked list + explicit `freeVM` walk.

use std::hash::{BuildHasherDefault, Hasher};

use hashbrown::HashMap;

/// FNV-1a offset basis and prime, as specified.
const FNV_OFFSET_BASIS: u32 = 2166136261;
const FNV_PRIME: u32 = 16777619;

/// Hashes `bytes` with FNV-1a. Exposed directly so callers (and tests) can
/// verify the intern table's hash function without going through `Heap`.
pub fn fnv1a_hash(bytes: &[u8]) -> u32 {
  let mut hash = FNV_OFFSET_BASIS;
  for &b in bytes {
    hash ^= b as u32;
    hash = hash.wrapping_mul(FNV_PRIME);
  }
  hash
}

/// A `std::hash::Hasher` wrapping [`fnv1a_hash`], used as the intern
/// table's hasher so that string lookups hash the same way the spec
/// requires, rather than incidentally.
pub struct FnvHasher(u32);

impl Default for FnvHasher {
  fn default() -> Self {
    FnvHasher(FNV_OFFSET_BASIS)
  }
}

impl Hasher for FnvHasher {
  fn finish(&self) -> u64 {
    self.0 as u64
  }

  fn write(&mut self, bytes: &[u8]) {
    let mut hash = self.0;
    for &b in bytes {
      hash ^= b as u32;
      hash = hash.wrapping_mul(FNV_PRIME);
    }
    self.0 = hash;
  }
}

/// A handle into the VM's object arena. Equality is plain index equality,
/// which *is* reference identity given the interning invariant upheld by
/// [`Heap::intern`] and [`Heap::intern_owned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef(u32);

/// A heap-allocated object. Only strings exist today (spec section 3); the
/// wrapping enum exists so a future object kind doesn't require changing
/// `ObjRef`'s representation.
enum Obj {
  Str(ObjString),
}

/// An interned, owned byte sequence. Strings are opaque bytes, not
/// Unicode text (spec section 1's Non-goals).
#[derive(Debug, PartialEq, Eq)]
pub struct ObjString {
  bytes: Box<[u8]>,
}

impl ObjString {
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

type InternTable = HashMap<Box<[u8]>, ObjRef, BuildHasherDefault<FnvHasher>>;

/// The object arena plus the string intern table. Owned by the VM and by
/// the compiler during compilation, since constants interned at compile
/// time must be the same objects looked up at run time (spec section 2).
#[derive(Default)]
pub struct Heap {
  objects: Vec<Obj>,
  strings: InternTable,
}

impl Heap {
  pub fn new() -> Self {
    Self::default()
  }

  /// `copyString` from spec 4.1: intern a copy of `bytes`, allocating a new
  /// `ObjString` only if an identical byte sequence isn't interned already.
  pub fn intern(&mut self, bytes: &[u8]) -> ObjRef {
    if let Some(&id) = self.strings.get(bytes) {
      return id;
    }
    self.intern_owned(bytes.into())
  }

  /// `takeString` from spec 4.1: intern an owned buffer, reusing an
  /// existing interned string (and dropping the buffer) if one with the
  /// same bytes is already present.
  pub fn intern_owned(&mut self, bytes: Box<[u8]>) -> ObjRef {
    if let Some(&id) = self.strings.get(&bytes[..]) {
      return id;
    }
    let id = self.push(Obj::Str(ObjString { bytes: bytes.clone() }));
    self.strings.insert(bytes, id);
    id
  }

  /// Concatenates two interned strings into a freshly interned string
  /// (`OP_ADD` on two strings, spec 4.5).
  pub fn concat(&mut self, a: ObjRef, b: ObjRef) -> ObjRef {
    let mut bytes = Vec::with_capacity(self.get_str(a).len() + self.get_str(b).len());
    bytes.extend_from_slice(self.get_str(a).as_bytes());
    bytes.extend_from_slice(self.get_str(b).as_bytes());
    self.intern_owned(bytes.into_boxed_slice())
  }

  pub fn get_str(&self, id: ObjRef) -> &ObjString {
    match &self.objects[id.0 as usize] {
      Obj::Str(s) => s,
    }
  }

  fn push(&mut self, obj: Obj) -> ObjRef {
    let idx = self.objects.len();
    self.objects.push(obj);
    ObjRef(idx as u32)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fnv1a_known_value() {
    // Reference value for the empty string: the FNV-1a offset basis itself.
    assert_eq!(fnv1a_hash(b""), 2166136261);
    // "a" = 0x61; (2166136261 ^ 0x61) * 16777619 mod 2^32.
    assert_eq!(fnv1a_hash(b"a"), 0xe40c292c);
  }

  #[test]
  fn interning_is_reference_identity() {
    let mut heap = Heap::new();
    let a = heap.intern(b"hello");
    let b = heap.intern(b"hello");
    assert_eq!(a, b);

    let c = heap.intern(b"world");
    assert_ne!(a, c);
  }

  #[test]
  fn take_string_reuses_interned_buffer() {
    let mut heap = Heap::new();
    let a = heap.intern(b"shared");
    let b = heap.intern_owned(b"shared".to_vec().into_boxed_slice());
    assert_eq!(a, b);
  }

  #[test]
  fn concat_interns_result() {
    let mut heap = Heap::new();
    let a = heap.intern(b"ab");
    let b = heap.intern(b"cd");
    let c = heap.concat(a, b);
    assert_eq!(heap.get_str(c).as_bytes(), b"abcd");

    let also_abcd = heap.intern(b"abcd");
    assert_eq!(c, also_abcd);
  }
}
