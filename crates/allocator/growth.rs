//! Capacity growth and alignment arithmetic shared by every container.

use crate::AllocError;
use num_traits::{PrimInt, Unsigned};

/// Containers grow to `ceil(GROWTH * requested)` slots.
pub const GROWTH: f64 = 1.5;

/// Rounds `n` up to the next multiple of `align`.
///
/// `align` must be a power of two. Wraps if the result is not
/// representable; use [checked_align_up] where that can happen.
#[inline(always)]
pub fn align_up<N: PrimInt>(n: N, align: N) -> N {
  let mask = align - N::one();
  (n + mask) & !mask
}

/// Same as [align_up], but returns `None` instead of wrapping.
#[inline(always)]
pub fn checked_align_up<N: PrimInt>(n: N, align: N) -> Option<N> {
  let mask = align - N::one();
  Some(n.checked_add(&mask)? & !mask)
}

#[inline(always)]
pub fn is_power_of_two<N: PrimInt>(n: N) -> bool {
  n.count_ones() == 1
}

pub const fn const_assert_is_power_of_2(val: usize) {
  assert!(val.is_power_of_two(), "Expected power of 2.");
}

/// Computes the capacity a container should grow to so it can hold
/// `requested` elements of `element_size` bytes.
///
/// Returns `current` unchanged if it already suffices. Otherwise the new
/// capacity is `ceil(1.5 * requested)`, and [AllocError] is returned if that
/// count, or its size in bytes, is not representable in `N`.
pub fn grow_capacity<N: PrimInt + Unsigned>(current: N, requested: N, element_size: N) -> Result<N, AllocError> {
  if requested <= current {
    return Ok(current);
  }

  let half = (requested >> 1) + (requested & N::one());
  let Some(new_capacity) = requested.checked_add(&half) else {
    return Err(AllocError);
  };

  let element_size = element_size.max(N::one());

  if new_capacity > N::max_value() / element_size {
    return Err(AllocError);
  }

  Ok(new_capacity)
}
