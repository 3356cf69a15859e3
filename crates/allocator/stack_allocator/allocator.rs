use crate::{checked_align_up, AlignedAllocator, AllocError, RawAllocator, SystemAllocator, PTR_ALIGN};
use acol_logger::acol_trace;
use std::{fmt::Debug, ptr::NonNull};

/// A bump allocator over a single fixed arena.
///
/// Every request is rounded up to pointer alignment and carved off the front
/// of the remaining space. Individual allocations cannot be released; the
/// arena is recycled as a whole with [StackAllocator::reset], and returned
/// to its parent allocator when dropped.
///
/// # Safety
///
/// Pointers handed out by this allocator must not outlive it, nor be used
/// after a call to `reset`.
pub struct StackAllocator<A: RawAllocator = SystemAllocator> {
  allocator: AlignedAllocator<A>,
  buf:       NonNull<u8>,
  size:      usize,
  offset:    usize,
}

impl StackAllocator<SystemAllocator> {
  #[inline(always)]
  pub fn new(size: usize) -> Result<Self, AllocError> {
    Self::from_allocator(size, SystemAllocator)
  }
}

impl<A: RawAllocator> StackAllocator<A> {
  pub fn from_allocator(size: usize, allocator: A) -> Result<Self, AllocError> {
    let allocator = AlignedAllocator::from_allocator(allocator);
    let buf = allocator.alloc(PTR_ALIGN, size)?;
    Ok(Self { allocator, buf, size, offset: 0 })
  }

  /// Returns `size` bytes from the arena, or `None` if the arena cannot fit
  /// them. A failed request leaves the arena unchanged.
  pub fn alloc(&mut self, size: usize) -> Option<NonNull<u8>> {
    if size == 0 {
      return None;
    }

    let size = checked_align_up(size, PTR_ALIGN)?;

    let end = self.offset.checked_add(size)?;

    if end > self.size {
      acol_trace!("[stack_alloc] - request of {size} bytes exceeds arena ({} of {} used)", self.offset, self.size);
      return None;
    }

    // SAFETY: `offset + size <= self.size`, so the slice lies in the arena.
    let ptr = unsafe { NonNull::new_unchecked(self.buf.as_ptr().add(self.offset)) };

    self.offset = end;

    Some(ptr)
  }

  /// Same as [Self::alloc], with the returned bytes cleared.
  pub fn zalloc(&mut self, size: usize) -> Option<NonNull<u8>> {
    let start = self.offset;
    let ptr = self.alloc(size)?;
    unsafe { std::ptr::write_bytes(ptr.as_ptr(), 0, self.offset - start) };
    Some(ptr)
  }

  /// Releases every allocation at once.
  pub fn reset(&mut self) {
    self.offset = 0;
  }

  pub fn offset(&self) -> usize {
    self.offset
  }

  pub fn capacity(&self) -> usize {
    self.size
  }

  pub fn remaining(&self) -> usize {
    self.size - self.offset
  }

  pub fn as_ptr(&self) -> *const u8 {
    self.buf.as_ptr()
  }
}

impl<A: RawAllocator> Debug for StackAllocator<A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut s = f.debug_struct("StackAllocator");
    s.field("buf", &self.buf);
    s.field("size", &self.size);
    s.field("offset", &self.offset);
    s.finish()
  }
}

impl<A: RawAllocator> Drop for StackAllocator<A> {
  fn drop(&mut self) {
    unsafe { self.allocator.free(self.buf) }
  }
}
