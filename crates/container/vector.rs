use crate::{block::AlignedBlock, ColError, ColResult};
use acol_allocator::{AlignedAllocator, RawAllocator, SystemAllocator, PTR_ALIGN};
use acol_logger::acol_trace;
use std::{
  fmt::Debug,
  marker::PhantomData,
  ops::{Index, IndexMut},
};

/// A growable, contiguous sequence of `Copy` elements backed by an aligned
/// allocation.
///
/// The backing store is aligned to at least pointer alignment and grows by
/// the shared growth policy, so capacity never shrinks while the vector is
/// alive. Elements are moved bitwise, which is why `T` must be `Copy`.
pub struct Vector<T: Copy, A: RawAllocator = SystemAllocator> {
  allocator: AlignedAllocator<A>,
  block:     AlignedBlock,
  len:       usize,
  _marker:   PhantomData<T>,
}

impl<T: Copy> Vector<T, SystemAllocator> {
  pub fn new() -> Self {
    Self::with_allocator(SystemAllocator)
  }
}

impl<T: Copy> Default for Vector<T, SystemAllocator> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Copy, A: RawAllocator> Vector<T, A> {
  /// Alignment of the start of the backing store. Elements themselves are
  /// packed at `size_of::<T>()` intervals, as in a slice.
  pub const ALIGN: usize =
    if std::mem::align_of::<T>() > PTR_ALIGN { std::mem::align_of::<T>() } else { PTR_ALIGN };

  /// Creates an empty vector that draws its memory from `allocator`. Nothing
  /// is allocated until the first element arrives.
  pub fn with_allocator(allocator: A) -> Self {
    let stride = AlignedBlock::stride_for::<T>(std::mem::align_of::<T>());
    Self {
      allocator: AlignedAllocator::from_allocator(allocator),
      block:     AlignedBlock::empty(stride, Self::ALIGN),
      len:       0,
      _marker:   PhantomData,
    }
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline(always)]
  pub fn capacity(&self) -> usize {
    self.block.capacity()
  }

  /// Ensures the vector can hold at least `capacity` elements. Growth uses
  /// the shared policy, so the resulting capacity may be larger than asked.
  ///
  /// On failure the vector is left exactly as it was.
  pub fn reserve(&mut self, capacity: usize) -> ColResult<()> {
    self.block.reserve(&self.allocator, capacity)?;
    Ok(())
  }

  /// Appends `value` to the end of the vector.
  pub fn push_back(&mut self, value: T) -> ColResult<()> {
    let index = self.len;
    self.insert(index, value)
  }

  /// Inserts `value` at `index`, shifting later elements up by one.
  ///
  /// An `index` past the end is clamped to `len`, making this an append.
  pub fn insert(&mut self, index: usize, value: T) -> ColResult<()> {
    let Some(required) = self.len.checked_add(1) else {
      return Err(ColError::BadAlloc);
    };

    self.reserve(required)?;

    let index = index.min(self.len);

    acol_trace!("[vec_insert] - index={index}, len={}", self.len);

    unsafe {
      if index < self.len {
        std::ptr::copy(self.slot(index), self.slot(index + 1), self.len - index);
      }
      self.slot(index).write(value);
    }

    self.len = required;

    Ok(())
  }

  pub fn get(&self, index: usize) -> ColResult<T> {
    if index >= self.len {
      return Err(ColError::IllegalArgument);
    }
    Ok(unsafe { self.slot(index).read() })
  }

  pub fn set(&mut self, index: usize, value: T) -> ColResult<()> {
    if index >= self.len {
      return Err(ColError::IllegalArgument);
    }
    unsafe { self.slot(index).write(value) };
    Ok(())
  }

  /// Returns the last element.
  pub fn back(&self) -> ColResult<T> {
    match self.len {
      0 => Err(ColError::Underflow),
      len => self.get(len - 1),
    }
  }

  /// Removes the last element and returns it.
  pub fn pop_back(&mut self) -> ColResult<T> {
    let value = self.back()?;
    self.len -= 1;
    Ok(value)
  }

  /// Removes the element at `index`, shifting later elements down by one.
  pub fn erase(&mut self, index: usize) -> ColResult<()> {
    if index >= self.len {
      return Err(ColError::IllegalArgument);
    }

    acol_trace!("[vec_erase] - index={index}, len={}", self.len);

    let tail = self.len - index - 1;
    if tail > 0 {
      unsafe { std::ptr::copy(self.slot(index + 1), self.slot(index), tail) };
    }

    self.len -= 1;

    Ok(())
  }

  /// Drops all elements. Capacity is kept.
  pub fn clear(&mut self) {
    self.len = 0;
  }

  /// Appends every element of `values`, reserving once up front.
  pub fn extend_from_slice(&mut self, values: &[T]) -> ColResult<()> {
    let Some(required) = self.len.checked_add(values.len()) else {
      return Err(ColError::BadAlloc);
    };

    self.reserve(required)?;

    for value in values {
      self.push_back(*value)?;
    }

    Ok(())
  }

  /// Calls `f` with every index and element from front to back. The first
  /// error returned by `f` stops the walk and is handed back to the caller.
  pub fn each<F: FnMut(usize, &T) -> ColResult<()>>(&self, mut f: F) -> ColResult<()> {
    for (index, value) in self.as_slice().iter().enumerate() {
      f(index, value)?;
    }
    Ok(())
  }

  /// Like [Vector::each] but walks from back to front. Every index,
  /// including the first, is visited exactly once.
  pub fn each_reverse<F: FnMut(usize, &T) -> ColResult<()>>(&self, mut f: F) -> ColResult<()> {
    for (index, value) in self.as_slice().iter().enumerate().rev() {
      f(index, value)?;
    }
    Ok(())
  }

  pub fn each_mut<F: FnMut(usize, &mut T) -> ColResult<()>>(&mut self, mut f: F) -> ColResult<()> {
    for (index, value) in self.as_mut_slice().iter_mut().enumerate() {
      f(index, value)?;
    }
    Ok(())
  }

  /// Returns the index of the first element for which `predicate` holds, or
  /// `len` if there is none. An error from `predicate` ends the search and is
  /// propagated.
  pub fn search<F: FnMut(usize, &T) -> ColResult<bool>>(&self, mut predicate: F) -> ColResult<usize> {
    for (index, value) in self.as_slice().iter().enumerate() {
      if predicate(index, value)? {
        return Ok(index);
      }
    }
    Ok(self.len)
  }

  #[inline(always)]
  pub fn as_slice(&self) -> &[T] {
    unsafe { std::slice::from_raw_parts(self.block.as_ptr() as *const T, self.len) }
  }

  #[inline(always)]
  pub fn as_mut_slice(&mut self) -> &mut [T] {
    unsafe { std::slice::from_raw_parts_mut(self.block.as_ptr() as *mut T, self.len) }
  }

  #[inline(always)]
  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.as_slice().iter()
  }

  #[inline(always)]
  pub fn as_ptr(&self) -> *const T {
    self.block.as_ptr() as *const T
  }

  pub fn allocator(&self) -> &A {
    self.allocator.raw()
  }

  #[inline(always)]
  unsafe fn slot(&self, index: usize) -> *mut T {
    self.block.slot::<T>(index)
  }
}

impl<T: Copy, A: RawAllocator> Index<usize> for Vector<T, A> {
  type Output = T;

  fn index(&self, index: usize) -> &Self::Output {
    if index >= self.len {
      panic!("Index {index} is out of range of 0..{}", self.len);
    }
    &self.as_slice()[index]
  }
}

impl<T: Copy, A: RawAllocator> IndexMut<usize> for Vector<T, A> {
  fn index_mut(&mut self, index: usize) -> &mut Self::Output {
    if index >= self.len {
      panic!("Index {index} is out of range of 0..{}", self.len);
    }
    &mut self.as_mut_slice()[index]
  }
}

impl<'vec, T: Copy, A: RawAllocator> IntoIterator for &'vec Vector<T, A> {
  type Item = &'vec T;
  type IntoIter = std::slice::Iter<'vec, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<T: Copy + Debug, A: RawAllocator> Debug for Vector<T, A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T: Copy, A: RawAllocator> Drop for Vector<T, A> {
  fn drop(&mut self) {
    unsafe { self.block.release(&self.allocator) };
  }
}
