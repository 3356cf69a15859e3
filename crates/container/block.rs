use acol_allocator::{align_up, grow_capacity, AlignedAllocator, AllocError, RawAllocator};
use acol_logger::{acol_debug_assert, acol_trace};
use std::ptr::NonNull;

/// An array of equally sized, equally aligned slots in one aligned
/// allocation.
///
/// The slot stride is computed once from the element size and alignment, so
/// slot addresses are always `base + index * stride`. The block does not own
/// its allocator; the owning container passes it in and must call
/// [AlignedBlock::release] before the block goes away.
#[derive(Debug)]
pub(crate) struct AlignedBlock {
  data:     Option<NonNull<u8>>,
  capacity: usize,
  stride:   usize,
  align:    usize,
}

impl AlignedBlock {
  /// Slot stride for `T` when every slot starts on an `align` boundary.
  #[inline(always)]
  pub fn stride_for<T>(align: usize) -> usize {
    align_up(std::mem::size_of::<T>().max(1), align)
  }

  /// A block without any slots. Nothing is allocated.
  pub fn empty(stride: usize, align: usize) -> Self {
    Self { data: None, capacity: 0, stride, align }
  }

  /// Allocates exactly `capacity` zeroed slots.
  pub fn zeroed<A: RawAllocator>(
    allocator: &AlignedAllocator<A>,
    stride: usize,
    align: usize,
    capacity: usize,
  ) -> Result<Self, AllocError> {
    let Some(size) = capacity.checked_mul(stride) else {
      return Err(AllocError);
    };

    let data = if size == 0 { None } else { Some(allocator.zalloc(align, size)?) };

    Ok(Self { data, capacity, stride, align })
  }

  #[inline(always)]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline(always)]
  pub fn stride(&self) -> usize {
    self.stride
  }

  #[inline(always)]
  pub fn align(&self) -> usize {
    self.align
  }

  /// Grows the block to fit at least `requested` slots using the shared
  /// growth policy. Existing slot contents are preserved. Returns the
  /// capacity prior to the call.
  pub fn reserve<A: RawAllocator>(&mut self, allocator: &AlignedAllocator<A>, requested: usize) -> Result<usize, AllocError> {
    let old_capacity = self.capacity;

    if requested <= old_capacity {
      acol_trace!("[reserve] - requested cap={requested}, block has space, no resize");
      return Ok(old_capacity);
    }

    let new_capacity = grow_capacity(old_capacity, requested, self.stride)?;

    acol_trace!(
      "[reserve] - cur_cap={old_capacity}, requested cap={requested}, new_cap={new_capacity}, stride={}, align={}",
      self.stride,
      self.align
    );

    let old_size = old_capacity * self.stride;
    let new_size = new_capacity * self.stride;

    // SAFETY: `data` is either `None` or a live block of `old_size` bytes
    // allocated with `allocator`.
    self.data = unsafe { allocator.realloc(self.data, self.align, old_size, new_size)? };
    self.capacity = new_capacity;

    Ok(old_capacity)
  }

  /// Pointer to the slot at `index`.
  ///
  /// `index` must be below the capacity.
  #[inline(always)]
  pub fn slot<T>(&self, index: usize) -> *mut T {
    acol_debug_assert!(index < self.capacity, "Slot {index} is out of range of 0..{}", self.capacity);
    match self.data {
      // SAFETY: `index < capacity` keeps the offset inside the allocation.
      Some(data) => unsafe { data.as_ptr().add(index * self.stride) as *mut T },
      None => std::ptr::null_mut(),
    }
  }

  /// Base address of the slots, or a dangling, well aligned pointer when
  /// nothing is allocated.
  #[inline(always)]
  pub fn as_ptr(&self) -> *const u8 {
    match self.data {
      Some(data) => data.as_ptr(),
      None => self.align as *const u8,
    }
  }

  /// Returns the allocation to `allocator` and leaves the block empty.
  ///
  /// # Safety
  ///
  /// `allocator` must be the allocator every growth of this block went
  /// through. Slot pointers obtained earlier must not be used afterwards.
  pub unsafe fn release<A: RawAllocator>(&mut self, allocator: &AlignedAllocator<A>) {
    if let Some(data) = self.data.take() {
      allocator.free(data);
    }
    self.capacity = 0;
  }
}
