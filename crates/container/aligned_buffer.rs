use crate::{block::AlignedBlock, ColError, ColResult};
use acol_allocator::{is_valid_alignment, AlignedAllocator, RawAllocator, SystemAllocator};
use acol_logger::{acol_debug_assert, acol_trace};
use std::{fmt::Debug, marker::PhantomData};

/// A growable array of `T` where every element starts on a caller chosen
/// alignment boundary.
///
/// Elements are spaced `stride` bytes apart, where `stride` is the element
/// size rounded up to the alignment. Only the first `limit` slots are
/// visible through the accessors; slots between `limit` and `capacity` keep
/// their contents and become visible again when the limit is raised.
///
/// Newly allocated slots are filled with `T::default()`.
pub struct AlignedBuffer<T: Copy + Default, A: RawAllocator = SystemAllocator> {
  allocator: AlignedAllocator<A>,
  block:     AlignedBlock,
  limit:     usize,
  _marker:   PhantomData<T>,
}

impl<T: Copy + Default> AlignedBuffer<T, SystemAllocator> {
  pub fn new(align: usize) -> Self {
    Self::with_allocator(align, SystemAllocator)
  }
}

impl<T: Copy + Default, A: RawAllocator> AlignedBuffer<T, A> {
  /// Creates an empty buffer whose elements are aligned to `align`, or to
  /// the natural alignment of `T` if that is stricter. `align` must be a
  /// power of two.
  pub fn with_allocator(align: usize, allocator: A) -> Self {
    acol_debug_assert!(is_valid_alignment(align), "Alignment {align} is not a supported power of two");

    let align = align.max(std::mem::align_of::<T>());

    Self {
      allocator: AlignedAllocator::from_allocator(allocator),
      block:     AlignedBlock::empty(AlignedBlock::stride_for::<T>(align), align),
      limit:     0,
      _marker:   PhantomData,
    }
  }

  /// Number of visible elements.
  #[inline(always)]
  pub fn limit(&self) -> usize {
    self.limit
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.limit == 0
  }

  #[inline(always)]
  pub fn capacity(&self) -> usize {
    self.block.capacity()
  }

  /// Distance in bytes between consecutive elements.
  #[inline(always)]
  pub fn stride(&self) -> usize {
    self.block.stride()
  }

  #[inline(always)]
  pub fn align(&self) -> usize {
    self.block.align()
  }

  /// Ensures room for at least `capacity` elements. Slots created by the
  /// growth are default initialized.
  pub fn reserve(&mut self, capacity: usize) -> ColResult<()> {
    let old_capacity = self.block.reserve(&self.allocator, capacity)?;

    for index in old_capacity..self.block.capacity() {
      unsafe { self.slot(index).write(T::default()) };
    }

    Ok(())
  }

  /// Makes one more slot visible at the end and returns it for in place
  /// construction.
  pub fn emplace_back(&mut self) -> ColResult<&mut T> {
    let Some(required) = self.limit.checked_add(1) else {
      return Err(ColError::BadAlloc);
    };

    self.reserve(required)?;

    let index = self.limit;
    self.limit = required;

    acol_trace!("[buf_emplace_back] - index={index}, cap={}", self.capacity());

    Ok(unsafe { &mut *self.slot(index) })
  }

  /// Appends `value` and returns its index.
  pub fn push_back(&mut self, value: T) -> ColResult<usize> {
    *self.emplace_back()? = value;
    Ok(self.limit - 1)
  }

  pub fn get(&self, index: usize) -> ColResult<&T> {
    if index >= self.limit {
      return Err(ColError::Overflow);
    }
    Ok(unsafe { &*self.slot(index) })
  }

  pub fn get_mut(&mut self, index: usize) -> ColResult<&mut T> {
    if index >= self.limit {
      return Err(ColError::Overflow);
    }
    Ok(unsafe { &mut *self.slot(index) })
  }

  /// The last visible element.
  pub fn back(&self) -> ColResult<&T> {
    match self.limit {
      0 => Err(ColError::Underflow),
      limit => self.get(limit - 1),
    }
  }

  pub fn back_mut(&mut self) -> ColResult<&mut T> {
    match self.limit {
      0 => Err(ColError::Underflow),
      limit => self.get_mut(limit - 1),
    }
  }

  /// Sets the number of visible elements, clamped to the capacity. Slot
  /// contents are untouched.
  pub fn set_limit(&mut self, limit: usize) {
    self.limit = limit.min(self.capacity());
  }

  /// Hides every element. Capacity and slot contents are kept.
  pub fn clear(&mut self) {
    self.limit = 0;
  }

  /// Overwrites every byte of the slot at `index`, padding included, with
  /// `byte`.
  ///
  /// # Safety
  ///
  /// The resulting bit pattern must be a valid `T`. This holds for any byte
  /// when `T` is a plain aggregate of integers or floats.
  pub unsafe fn memset_slot(&mut self, index: usize, byte: u8) -> ColResult<()> {
    if index >= self.limit {
      return Err(ColError::Overflow);
    }
    std::ptr::write_bytes(self.slot(index) as *mut u8, byte, self.stride());
    Ok(())
  }

  pub fn each<F: FnMut(usize, &T) -> ColResult<()>>(&self, mut f: F) -> ColResult<()> {
    for index in 0..self.limit {
      f(index, unsafe { &*self.slot(index) })?;
    }
    Ok(())
  }

  pub fn each_reverse<F: FnMut(usize, &T) -> ColResult<()>>(&self, mut f: F) -> ColResult<()> {
    for index in (0..self.limit).rev() {
      f(index, unsafe { &*self.slot(index) })?;
    }
    Ok(())
  }

  pub fn each_mut<F: FnMut(usize, &mut T) -> ColResult<()>>(&mut self, mut f: F) -> ColResult<()> {
    for index in 0..self.limit {
      f(index, unsafe { &mut *self.slot(index) })?;
    }
    Ok(())
  }

  /// Index of the first visible element for which `predicate` holds, or
  /// `limit` if there is none.
  pub fn search<F: FnMut(usize, &T) -> ColResult<bool>>(&self, mut predicate: F) -> ColResult<usize> {
    for index in 0..self.limit {
      if predicate(index, unsafe { &*self.slot(index) })? {
        return Ok(index);
      }
    }
    Ok(self.limit)
  }

  /// Base address of slot 0.
  #[inline(always)]
  pub fn as_ptr(&self) -> *const u8 {
    self.block.as_ptr()
  }

  pub fn allocator(&self) -> &A {
    self.allocator.raw()
  }

  #[inline(always)]
  unsafe fn slot(&self, index: usize) -> *mut T {
    self.block.slot::<T>(index)
  }
}

impl<T: Copy + Default + Debug, A: RawAllocator> Debug for AlignedBuffer<T, A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries((0..self.limit).map(|index| unsafe { &*self.slot(index) })).finish()
  }
}

impl<T: Copy + Default, A: RawAllocator> Drop for AlignedBuffer<T, A> {
  fn drop(&mut self) {
    unsafe { self.block.release(&self.allocator) };
  }
}
