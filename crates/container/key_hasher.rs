use acol_hash::create_fnv_hash;
use std::hash::Hash;

/// Substituted for a computed hash of 0, which the table reserves for empty
/// slots.
pub const ZERO_HASH_SUBSTITUTE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Hashing and equality for the keys of a [HashTable](crate::HashTable).
///
/// Keys that compare equal must hash equal. `hash_key` must never return 0.
pub trait KeyHasher<K> {
  fn hash_key(&self, key: &K) -> u64;

  fn keys_equal(&self, a: &K, b: &K) -> bool;
}

/// 64 bit FNV-1a over the key's [Hash] implementation, with [Eq] for
/// equality.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FnvKeyHasher;

impl<K: Hash + Eq> KeyHasher<K> for FnvKeyHasher {
  #[inline]
  fn hash_key(&self, key: &K) -> u64 {
    match create_fnv_hash(key) {
      0 => ZERO_HASH_SUBSTITUTE,
      hash => hash,
    }
  }

  #[inline]
  fn keys_equal(&self, a: &K, b: &K) -> bool {
    a == b
  }
}

/// A [KeyHasher] built from a hash function and an equality function.
#[derive(Clone, Copy)]
pub struct FnKeyHasher<HashFn, EqFn> {
  hash: HashFn,
  eq:   EqFn,
}

impl<HashFn, EqFn> FnKeyHasher<HashFn, EqFn> {
  pub fn new(hash: HashFn, eq: EqFn) -> Self {
    Self { hash, eq }
  }
}

impl<K, HashFn, EqFn> KeyHasher<K> for FnKeyHasher<HashFn, EqFn>
where
  HashFn: Fn(&K) -> u64,
  EqFn: Fn(&K, &K) -> bool,
{
  #[inline]
  fn hash_key(&self, key: &K) -> u64 {
    (self.hash)(key)
  }

  #[inline]
  fn keys_equal(&self, a: &K, b: &K) -> bool {
    (self.eq)(a, b)
  }
}
