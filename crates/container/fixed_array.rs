use crate::{block::AlignedBlock, ColError, ColResult};
use acol_allocator::{const_assert_is_power_of_2, AlignedAllocator, RawAllocator, SystemAllocator};
use std::{fmt::Debug, marker::PhantomData};

/// `LEN` elements of `T`, each starting on an `ALIGN` byte boundary, in one
/// heap allocation made at construction.
///
/// The length is fixed for the lifetime of the array. Every element starts
/// out as `T::default()`.
pub struct FixedArray<T: Copy + Default, const LEN: usize, const ALIGN: usize, A: RawAllocator = SystemAllocator> {
  allocator: AlignedAllocator<A>,
  block:     AlignedBlock,
  _marker:   PhantomData<T>,
}

impl<T: Copy + Default, const LEN: usize, const ALIGN: usize> FixedArray<T, LEN, ALIGN, SystemAllocator> {
  pub fn new() -> ColResult<Self> {
    Self::with_allocator(SystemAllocator)
  }
}

impl<T: Copy + Default, const LEN: usize, const ALIGN: usize, A: RawAllocator> FixedArray<T, LEN, ALIGN, A> {
  const ALIGN_IS_POWER_OF_2: () = const_assert_is_power_of_2(ALIGN);

  pub fn with_allocator(allocator: A) -> ColResult<Self> {
    let _ = Self::ALIGN_IS_POWER_OF_2;

    let allocator = AlignedAllocator::from_allocator(allocator);
    let align = ALIGN.max(std::mem::align_of::<T>());
    let block = AlignedBlock::zeroed(&allocator, AlignedBlock::stride_for::<T>(align), align, LEN)?;

    let array = Self { allocator, block, _marker: PhantomData };

    for index in 0..LEN {
      unsafe { array.slot(index).write(T::default()) };
    }

    Ok(array)
  }

  #[inline(always)]
  pub const fn len(&self) -> usize {
    LEN
  }

  #[inline(always)]
  pub const fn is_empty(&self) -> bool {
    LEN == 0
  }

  #[inline(always)]
  pub fn stride(&self) -> usize {
    self.block.stride()
  }

  #[inline(always)]
  pub fn align(&self) -> usize {
    self.block.align()
  }

  pub fn get(&self, index: usize) -> ColResult<&T> {
    if index >= LEN {
      return Err(ColError::IllegalArgument);
    }
    Ok(unsafe { &*self.slot(index) })
  }

  pub fn get_mut(&mut self, index: usize) -> ColResult<&mut T> {
    if index >= LEN {
      return Err(ColError::IllegalArgument);
    }
    Ok(unsafe { &mut *self.slot(index) })
  }

  /// The element at `LEN - 1`.
  pub fn back(&self) -> ColResult<&T> {
    self.get(LEN.checked_sub(1).ok_or(ColError::IllegalArgument)?)
  }

  pub fn back_mut(&mut self) -> ColResult<&mut T> {
    self.get_mut(LEN.checked_sub(1).ok_or(ColError::IllegalArgument)?)
  }

  pub fn each<F: FnMut(usize, &T) -> ColResult<()>>(&self, mut f: F) -> ColResult<()> {
    for index in 0..LEN {
      f(index, unsafe { &*self.slot(index) })?;
    }
    Ok(())
  }

  pub fn each_reverse<F: FnMut(usize, &T) -> ColResult<()>>(&self, mut f: F) -> ColResult<()> {
    for index in (0..LEN).rev() {
      f(index, unsafe { &*self.slot(index) })?;
    }
    Ok(())
  }

  pub fn each_mut<F: FnMut(usize, &mut T) -> ColResult<()>>(&mut self, mut f: F) -> ColResult<()> {
    for index in 0..LEN {
      f(index, unsafe { &mut *self.slot(index) })?;
    }
    Ok(())
  }

  pub fn each_reverse_mut<F: FnMut(usize, &mut T) -> ColResult<()>>(&mut self, mut f: F) -> ColResult<()> {
    for index in (0..LEN).rev() {
      f(index, unsafe { &mut *self.slot(index) })?;
    }
    Ok(())
  }

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

impl<T: Copy + Default + Debug, const LEN: usize, const ALIGN: usize, A: RawAllocator> Debug
  for FixedArray<T, LEN, ALIGN, A>
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries((0..LEN).map(|index| unsafe { &*self.slot(index) })).finish()
  }
}

impl<T: Copy + Default, const LEN: usize, const ALIGN: usize, A: RawAllocator> Drop for FixedArray<T, LEN, ALIGN, A> {
  fn drop(&mut self) {
    unsafe { self.block.release(&self.allocator) };
  }
}
