use crate::{align_up, AllocError, RawAllocator, SystemAllocator};
use acol_logger::{acol_debug_assert, acol_trace};
use std::ptr::NonNull;

/// Width of the back-offset stored in front of every aligned block.
pub type OffsetHeader = u16;

pub const HEADER_SIZE: usize = std::mem::size_of::<OffsetHeader>();

/// Largest alignment whose worst case offset still fits in [OffsetHeader].
pub const MAX_ALIGN: usize = 1 << 15;

pub const CACHE_LINE_SIZE: usize = 64;

pub const PTR_ALIGN: usize = std::mem::align_of::<*const u8>();

#[inline(always)]
pub fn is_valid_alignment(align: usize) -> bool {
  align.is_power_of_two() && align <= MAX_ALIGN
}

/// Hands out power-of-two aligned blocks from a [RawAllocator] that makes
/// no alignment promises.
///
/// Each request over-allocates by `HEADER_SIZE + align - 1` bytes. The
/// returned address is the first multiple of `align` at or past
/// `base + HEADER_SIZE`, and the distance back to `base` is stored in the
/// two bytes directly in front of it:
///
/// ```text
/// base          ptr - 2   ptr (aligned)
/// |  padding ... | offset | size bytes ... |
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AlignedAllocator<A: RawAllocator = SystemAllocator> {
  raw: A,
}

impl AlignedAllocator<SystemAllocator> {
  pub fn new() -> Self {
    Self { raw: SystemAllocator }
  }
}

impl<A: RawAllocator> AlignedAllocator<A> {
  pub fn from_allocator(raw: A) -> Self {
    Self { raw }
  }

  pub fn raw(&self) -> &A {
    &self.raw
  }

  /// Allocates `size` bytes aligned to `align`.
  #[inline(always)]
  pub fn alloc(&self, align: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
    self.alloc_inner::<false>(align, size)
  }

  /// Same as [Self::alloc], but the whole underlying block, header and
  /// padding included, is cleared first.
  ///
  /// The clear is plain `write_bytes` and must not be relied upon to erase
  /// secrets.
  #[inline(always)]
  pub fn zalloc(&self, align: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
    self.alloc_inner::<true>(align, size)
  }

  #[inline(always)]
  pub fn alloc_cache_aligned(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
    self.alloc(CACHE_LINE_SIZE, size)
  }

  #[inline(always)]
  pub fn zalloc_cache_aligned(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
    self.zalloc(CACHE_LINE_SIZE, size)
  }

  #[inline(always)]
  pub fn alloc_ptr_aligned(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
    self.alloc(PTR_ALIGN, size)
  }

  fn alloc_inner<const ZEROED: bool>(&self, align: usize, size: usize) -> Result<NonNull<u8>, AllocError> {
    acol_trace!("[aligned_alloc] - align={align}, size={size}");
    acol_debug_assert!(is_valid_alignment(align), "align must be a power of 2 no larger than {MAX_ALIGN}, got {align}");

    if !is_valid_alignment(align) || size == 0 {
      return Err(AllocError);
    }

    let hdr_size = HEADER_SIZE + (align - 1);
    let Some(total) = size.checked_add(hdr_size) else {
      return Err(AllocError);
    };

    acol_trace!("[aligned_alloc] - hdr_size={hdr_size}, alloc size={total}");

    let base = self.raw.malloc(total);

    if base.is_null() {
      return Err(AllocError);
    }

    unsafe {
      if ZEROED {
        std::ptr::write_bytes(base, 0, total);
      }

      let offset = align_up(base as usize + HEADER_SIZE, align) - base as usize;

      // SAFETY: `offset <= HEADER_SIZE + align - 1`, which keeps both the
      // header and `size` bytes past `ptr` inside the `total` byte block.
      let ptr = base.add(offset);
      (ptr.sub(HEADER_SIZE) as *mut OffsetHeader).write_unaligned(offset as OffsetHeader);

      acol_trace!("[aligned_alloc] - base={base:p}, aligned={ptr:p}, offset={offset}");

      Ok(NonNull::new_unchecked(ptr))
    }
  }

  /// Grows a block to `new_size` bytes.
  ///
  /// - `ptr == None` allocates a fresh block.
  /// - `new_size == 0` frees the block and returns `None`.
  /// - `new_size <= old_size` returns `ptr` unchanged. Blocks never shrink.
  /// - otherwise a new block is allocated, `old_size` bytes are copied over
  ///   and the old block is freed. If the allocation fails the old block is
  ///   left intact.
  ///
  /// # Safety
  ///
  /// `ptr` must be `None` or a live block from this allocator that is at
  /// least `old_size` bytes long.
  pub unsafe fn realloc(
    &self,
    ptr: Option<NonNull<u8>>,
    align: usize,
    old_size: usize,
    new_size: usize,
  ) -> Result<Option<NonNull<u8>>, AllocError> {
    acol_trace!("[aligned_realloc] - align={align}, old_size={old_size}, new_size={new_size}");

    let Some(ptr) = ptr else {
      return if new_size == 0 { Ok(None) } else { self.alloc(align, new_size).map(Some) };
    };

    if new_size == 0 {
      self.free(ptr);
      return Ok(None);
    }

    if new_size <= old_size {
      return Ok(Some(ptr));
    }

    let new_ptr = self.alloc(align, new_size)?;

    std::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), old_size);

    self.free(ptr);

    Ok(Some(new_ptr))
  }

  /// # Safety
  ///
  /// `ptr` must be a live block obtained from this allocator. It must not be
  /// used afterwards.
  pub unsafe fn free(&self, ptr: NonNull<u8>) {
    let offset = Self::offset_of(ptr) as usize;
    self.raw.free(ptr.as_ptr().sub(offset));
  }

  /// Distance in bytes between `ptr` and the start of its underlying block.
  ///
  /// # Safety
  ///
  /// `ptr` must be a live block obtained from an [AlignedAllocator].
  #[inline(always)]
  pub unsafe fn offset_of(ptr: NonNull<u8>) -> OffsetHeader {
    (ptr.as_ptr().sub(HEADER_SIZE) as *const OffsetHeader).read_unaligned()
  }
}
