//! Aligned, allocator-aware containers for `Copy` data.
mod aligned_buffer;
mod block;
mod error;
mod fixed_array;
mod hash_table;
mod key_hasher;
mod vector;

#[cfg(test)]
mod test;

pub use aligned_buffer::*;
pub use error::*;
pub use fixed_array::*;
pub use hash_table::*;
pub use key_hasher::*;
pub use vector::*;
