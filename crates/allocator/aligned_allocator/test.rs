use super::*;
use crate::{AllocError, CountingAllocator, SystemAllocator};
use std::ptr::NonNull;

fn is_aligned(ptr: NonNull<u8>, align: usize) -> bool {
  ptr.as_ptr() as usize % align == 0
}

#[test]
fn aligned_allocations_respect_alignment() {
  let allocator = CountingAllocator::new();
  let aligned = AlignedAllocator::from_allocator(&allocator);

  let mut align = 1;
  while align <= 4096 {
    for size in [1, 7, 18, 64, 1000] {
      let ptr = aligned.alloc(align, size).expect("should allocate");
      assert!(is_aligned(ptr, align), "align {align} size {size}");
      unsafe {
        std::ptr::write_bytes(ptr.as_ptr(), 0xAB, size);
        aligned.free(ptr);
      }
    }
    align <<= 1;
  }

  assert_eq!(allocator.live(), 0);
  assert_eq!(allocator.allocations(), allocator.frees());
}

#[test]
fn offset_header_records_distance_to_base() {
  // malloc on the supported targets hands out 16 byte aligned blocks, so the
  // offsets are fully determined.
  let aligned = AlignedAllocator::new();

  let ptr = aligned.alloc(16, 18).unwrap();
  assert!(is_aligned(ptr, 16));
  assert_eq!(unsafe { AlignedAllocator::<SystemAllocator>::offset_of(ptr) }, 16);
  unsafe { aligned.free(ptr) };

  let ptr = aligned.alloc(4, 18).unwrap();
  assert!(is_aligned(ptr, 4));
  assert_eq!(unsafe { AlignedAllocator::<SystemAllocator>::offset_of(ptr) }, 4);
  unsafe { aligned.free(ptr) };

  let ptr = aligned.alloc(1, 18).unwrap();
  assert_eq!(unsafe { AlignedAllocator::<SystemAllocator>::offset_of(ptr) }, 2);
  unsafe { aligned.free(ptr) };
}

#[test]
fn zero_sized_requests_are_rejected() {
  let aligned = AlignedAllocator::new();
  assert_eq!(aligned.alloc(8, 0), Err(AllocError));
}

#[test]
#[cfg(not(debug_assertions))]
fn invalid_alignment_is_rejected() {
  let aligned = AlignedAllocator::new();
  assert_eq!(aligned.alloc(3, 8), Err(AllocError));
  assert_eq!(aligned.alloc(MAX_ALIGN << 1, 8), Err(AllocError));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic]
fn invalid_alignment_asserts_in_debug() {
  let aligned = AlignedAllocator::new();
  let _ = aligned.alloc(3, 8);
}

#[test]
fn zalloc_clears_memory() {
  let aligned = AlignedAllocator::new();
  let ptr = aligned.zalloc_cache_aligned(200).unwrap();
  assert!(is_aligned(ptr, CACHE_LINE_SIZE));
  let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), 200) };
  assert!(bytes.iter().all(|b| *b == 0));
  unsafe { aligned.free(ptr) };
}

#[test]
fn realloc_moves_contents_to_new_alignment() {
  let allocator = CountingAllocator::new();
  let aligned = AlignedAllocator::from_allocator(&allocator);

  unsafe {
    let ptr = aligned.realloc(None, 16, 0, 5).unwrap().expect("should allocate");
    assert!(is_aligned(ptr, 16));
    std::ptr::copy_nonoverlapping(b"Hall\0".as_ptr(), ptr.as_ptr(), 5);

    let ptr = aligned.realloc(Some(ptr), 4, 5, 11).unwrap().expect("should grow");
    assert!(is_aligned(ptr, 4));
    assert_eq!(std::slice::from_raw_parts(ptr.as_ptr(), 5), b"Hall\0");

    std::ptr::copy_nonoverlapping(b"o Welt\0".as_ptr(), ptr.as_ptr().add(4), 7);
    assert_eq!(std::slice::from_raw_parts(ptr.as_ptr(), 11), b"Hallo Welt\0");

    aligned.free(ptr);
  }

  assert_eq!(allocator.live(), 0);
}

#[test]
fn realloc_never_shrinks() {
  let aligned = AlignedAllocator::new();

  unsafe {
    let ptr = aligned.alloc(8, 64).unwrap();
    let same = aligned.realloc(Some(ptr), 8, 64, 32).unwrap();
    assert_eq!(same, Some(ptr));
    let same = aligned.realloc(Some(ptr), 8, 64, 64).unwrap();
    assert_eq!(same, Some(ptr));
    aligned.free(ptr);
  }
}

#[test]
fn realloc_to_zero_frees() {
  let allocator = CountingAllocator::new();
  let aligned = AlignedAllocator::from_allocator(&allocator);

  unsafe {
    let ptr = aligned.alloc(8, 64).unwrap();
    assert_eq!(allocator.live(), 1);
    assert_eq!(aligned.realloc(Some(ptr), 8, 64, 0), Ok(None));
    assert_eq!(aligned.realloc(None, 8, 0, 0), Ok(None));
  }

  assert_eq!(allocator.live(), 0);
}

#[test]
fn failed_realloc_keeps_old_block() {
  let allocator = CountingAllocator::failing_after(1);
  let aligned = AlignedAllocator::from_allocator(&allocator);

  unsafe {
    let ptr = aligned.alloc(8, 4).unwrap();
    ptr.as_ptr().write(42);

    assert_eq!(aligned.realloc(Some(ptr), 8, 4, 400), Err(AllocError));
    assert_eq!(ptr.as_ptr().read(), 42);

    aligned.free(ptr);
  }

  assert_eq!(allocator.live(), 0);
}
