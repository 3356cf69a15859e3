use std::{
  collections::hash_map::DefaultHasher,
  hash::{BuildHasher, Hash, Hasher},
};

mod fnv;


pub use fnv::*;

pub fn create_u64_hash<T: Hash>(t: T) -> u64 {
  let mut s = DefaultHasher::new();

  t.hash(&mut s);

  s.finish()
}

/// Hashes `t` with 64 bit FNV-1a through its [Hash] implementation.
pub fn create_fnv_hash<T: Hash + ?Sized>(t: &T) -> u64 {
  let mut s = FnvBuildHasher::default().build_hasher();

  t.hash(&mut s);

  s.finish()
}
