use std::fmt::{Debug, Display};

/// An allocation could not be satisfied. Returned when the underlying
/// allocator runs out of memory, when a requested alignment is invalid, or
/// when computing a size overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocError;

impl Display for AllocError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("memory allocation failed")
  }
}

impl std::error::Error for AllocError {}
