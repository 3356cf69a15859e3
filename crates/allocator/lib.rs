//! Byte level allocation primitives shared by the acol containers.
mod aligned_allocator;
mod error;
mod growth;
mod raw;
mod stack_allocator;


pub use aligned_allocator::*;
pub use error::*;
pub use growth::*;
pub use raw::*;
pub use stack_allocator::*;
