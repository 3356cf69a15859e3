use acol_allocator::AllocError;
use std::fmt::{Debug, Display};

pub type ColResult<T> = Result<T, ColError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColError {
  /// A read past the logically visible window of a container, such as an
  /// aligned buffer index at or beyond its limit.
  Overflow,
  /// `back` or `pop_back` on an empty container.
  Underflow,
  /// An index outside the valid range of the backing store.
  IllegalArgument,
  /// Allocating or growing storage failed, including arithmetic overflow
  /// while computing the new capacity.
  BadAlloc,
}

impl Display for ColError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Debug::fmt(self, f)
  }
}

impl std::error::Error for ColError {}

impl From<AllocError> for ColError {
  fn from(_: AllocError) -> Self {
    ColError::BadAlloc
  }
}
