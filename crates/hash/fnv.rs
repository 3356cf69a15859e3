//! Fowler–Noll–Vo (FNV-1a) non-cryptographic hashing.
//!
//! The typed helpers hash the little-endian bytes of the value and take the
//! running hash as their second argument, so calls can be chained starting
//! from [FNV1A_32_INIT] or [FNV1A_64_INIT].

use std::hash::{BuildHasher, Hasher};

pub const FNV1A_32_INIT: u32 = 0x811c_9dc5;
pub const FNV_32_PRIME: u32 = 0x0100_0193;

pub const FNV1A_64_INIT: u64 = 0xcbf2_9ce4_8422_2325;
pub const FNV_64_PRIME: u64 = 0x0000_0100_0000_01b3;

#[inline(always)]
pub fn fnv_32a_byte(byte: u8, h: u32) -> u32 {
  (h ^ byte as u32).wrapping_mul(FNV_32_PRIME)
}

#[inline(always)]
pub fn fnv_32a_bytes(bytes: &[u8], h: u32) -> u32 {
  bytes.iter().fold(h, |h, b| fnv_32a_byte(*b, h))
}

pub fn fnv_32a_i32(i: i32, h: u32) -> u32 {
  fnv_32a_bytes(&i.to_le_bytes(), h)
}

pub fn fnv_32a_u32(i: u32, h: u32) -> u32 {
  fnv_32a_bytes(&i.to_le_bytes(), h)
}

pub fn fnv_32a_u64(i: u64, h: u32) -> u32 {
  fnv_32a_bytes(&i.to_le_bytes(), h)
}

pub fn fnv_32a_f32(f: f32, h: u32) -> u32 {
  fnv_32a_bytes(&f.to_le_bytes(), h)
}

#[inline(always)]
pub fn fnv_64a_byte(byte: u8, h: u64) -> u64 {
  (h ^ byte as u64).wrapping_mul(FNV_64_PRIME)
}

#[inline(always)]
pub fn fnv_64a_bytes(bytes: &[u8], h: u64) -> u64 {
  bytes.iter().fold(h, |h, b| fnv_64a_byte(*b, h))
}

pub fn fnv_64a_i32(i: i32, h: u64) -> u64 {
  fnv_64a_bytes(&i.to_le_bytes(), h)
}

pub fn fnv_64a_u32(i: u32, h: u64) -> u64 {
  fnv_64a_bytes(&i.to_le_bytes(), h)
}

pub fn fnv_64a_u64(i: u64, h: u64) -> u64 {
  fnv_64a_bytes(&i.to_le_bytes(), h)
}

pub fn fnv_64a_f32(f: f32, h: u64) -> u64 {
  fnv_64a_bytes(&f.to_le_bytes(), h)
}

/// 64 bit FNV-1a [Hasher].
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher {
  hash: u64,
}

impl FnvHasher {
  pub fn new() -> Self {
    Self { hash: FNV1A_64_INIT }
  }

  pub fn with_seed(seed: u64) -> Self {
    Self { hash: seed }
  }
}

impl Default for FnvHasher {
  fn default() -> Self {
    Self::new()
  }
}

impl Hasher for FnvHasher {
  fn finish(&self) -> u64 {
    self.hash
  }

  fn write(&mut self, bytes: &[u8]) {
    self.hash = fnv_64a_bytes(bytes, self.hash);
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
  type Hasher = FnvHasher;

  fn build_hasher(&self) -> Self::Hasher {
    FnvHasher::new()
  }
}
