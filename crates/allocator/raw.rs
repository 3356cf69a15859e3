use std::cell::Cell;

/// A plain, non-aligning byte allocator with `malloc` semantics. All aligned
/// allocation in this crate is layered on top of these three calls.
pub trait RawAllocator {
  /// Returns a block of at least `size` bytes, or null on failure.
  fn malloc(&self, size: usize) -> *mut u8;

  /// Resizes a block returned by this allocator. Returns null on failure, in
  /// which case `ptr` is left untouched.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a live block obtained from this allocator.
  unsafe fn realloc(&self, ptr: *mut u8, size: usize) -> *mut u8;

  /// # Safety
  ///
  /// `ptr` must be null or a live block obtained from this allocator, and
  /// must not be used afterwards.
  unsafe fn free(&self, ptr: *mut u8);
}

impl<A: RawAllocator + ?Sized> RawAllocator for &A {
  #[inline(always)]
  fn malloc(&self, size: usize) -> *mut u8 {
    (**self).malloc(size)
  }

  #[inline(always)]
  unsafe fn realloc(&self, ptr: *mut u8, size: usize) -> *mut u8 {
    (**self).realloc(ptr, size)
  }

  #[inline(always)]
  unsafe fn free(&self, ptr: *mut u8) {
    (**self).free(ptr)
  }
}

/// The C runtime heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl RawAllocator for SystemAllocator {
  #[inline(always)]
  fn malloc(&self, size: usize) -> *mut u8 {
    unsafe { libc::malloc(size) as *mut u8 }
  }

  #[inline(always)]
  unsafe fn realloc(&self, ptr: *mut u8, size: usize) -> *mut u8 {
    libc::realloc(ptr as *mut libc::c_void, size) as *mut u8
  }

  #[inline(always)]
  unsafe fn free(&self, ptr: *mut u8) {
    libc::free(ptr as *mut libc::c_void)
  }
}

/// Wraps another allocator and keeps count of the blocks passing through it.
/// Can also be told to start failing after a number of successful
/// allocations.
///
/// Not thread safe.
#[derive(Debug, Default)]
pub struct CountingAllocator<A: RawAllocator = SystemAllocator> {
  inner:       A,
  live:        Cell<usize>,
  allocations: Cell<usize>,
  frees:       Cell<usize>,
  fail_after:  Cell<Option<usize>>,
}

impl CountingAllocator<SystemAllocator> {
  pub fn new() -> Self {
    Self::from_allocator(SystemAllocator)
  }

  /// An allocator that satisfies `successes` allocations and fails every
  /// allocation after that.
  pub fn failing_after(successes: usize) -> Self {
    let allocator = Self::new();
    allocator.fail_after.set(Some(successes));
    allocator
  }
}

impl<A: RawAllocator> CountingAllocator<A> {
  pub fn from_allocator(inner: A) -> Self {
    Self {
      inner,
      live: Cell::new(0),
      allocations: Cell::new(0),
      frees: Cell::new(0),
      fail_after: Cell::new(None),
    }
  }

  /// Number of blocks currently allocated and not yet freed.
  pub fn live(&self) -> usize {
    self.live.get()
  }

  /// Total number of blocks handed out.
  pub fn allocations(&self) -> usize {
    self.allocations.get()
  }

  /// Total number of blocks released.
  pub fn frees(&self) -> usize {
    self.frees.get()
  }

  fn should_fail(&self) -> bool {
    match self.fail_after.get() {
      Some(successes) => self.allocations.get() >= successes,
      None => false,
    }
  }
}

impl<A: RawAllocator> RawAllocator for CountingAllocator<A> {
  fn malloc(&self, size: usize) -> *mut u8 {
    if self.should_fail() {
      return std::ptr::null_mut();
    }

    let ptr = self.inner.malloc(size);

    if !ptr.is_null() {
      self.allocations.set(self.allocations.get() + 1);
      self.live.set(self.live.get() + 1);
    }

    ptr
  }

  unsafe fn realloc(&self, ptr: *mut u8, size: usize) -> *mut u8 {
    if ptr.is_null() {
      return self.malloc(size);
    }

    if self.should_fail() {
      return std::ptr::null_mut();
    }

    self.inner.realloc(ptr, size)
  }

  unsafe fn free(&self, ptr: *mut u8) {
    if ptr.is_null() {
      return;
    }

    self.frees.set(self.frees.get() + 1);
    self.live.set(self.live.get() - 1);
    self.inner.free(ptr)
  }
}
