use crate::block::AlignedBlock;
use acol_allocator::{AlignedAllocator, PTR_ALIGN};

#[test]
fn slots_are_stride_apart() {
  let allocator = AlignedAllocator::new();
  let mut block = AlignedBlock::zeroed(&allocator, 12, 64, 4).unwrap();

  let base = block.as_ptr() as usize;
  assert_eq!(base % 64, 0);
  for index in 0..4 {
    assert_eq!(block.slot::<u8>(index) as usize, base + index * 12);
  }

  unsafe { block.release(&allocator) };
  assert_eq!(block.capacity(), 0);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn slot_past_capacity_asserts() {
  let allocator = AlignedAllocator::new();
  let block = AlignedBlock::zeroed(&allocator, PTR_ALIGN, PTR_ALIGN, 2).unwrap();
  let _slot = block.slot::<u8>(2);
}
