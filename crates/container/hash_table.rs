use crate::{block::AlignedBlock, ColResult, FnvKeyHasher, KeyHasher};
use acol_allocator::{AlignedAllocator, RawAllocator, SystemAllocator, CACHE_LINE_SIZE};
use acol_logger::{acol_debug_assert, acol_trace};
use std::{fmt::Debug, hash::Hash, marker::PhantomData, mem::MaybeUninit};

/// Slot count of a freshly created table. Always a power of two.
pub const INITIAL_CAPACITY: usize = 16;

/// A slot of the table. A `hash` of 0 marks the slot as empty, in which case
/// `key` and `value` are meaningless. An all zero bit pattern is therefore a
/// valid empty entry.
#[repr(C)]
struct Entry<K, V> {
  hash:  u64,
  key:   MaybeUninit<K>,
  value: MaybeUninit<V>,
}

/// An open addressing hash table with linear probing.
///
/// The slot array lives in a zeroed, cache line aligned allocation whose
/// length is a power of two. It doubles whenever an insertion finds the
/// table at least half full, so a probe sequence always ends at an empty
/// slot. Removal leaves no tombstones: every entry in the probe run after
/// the removed slot is re-placed.
pub struct HashTable<K: Copy, V: Copy, H: KeyHasher<K> = FnvKeyHasher, A: RawAllocator = SystemAllocator> {
  allocator: AlignedAllocator<A>,
  entries:   AlignedBlock,
  length:    usize,
  hasher:    H,
  _marker:   PhantomData<(K, V)>,
}

impl<K: Copy + Hash + Eq, V: Copy> HashTable<K, V, FnvKeyHasher, SystemAllocator> {
  pub fn new() -> ColResult<Self> {
    Self::with_hasher(FnvKeyHasher)
  }
}

impl<K: Copy, V: Copy, H: KeyHasher<K>> HashTable<K, V, H, SystemAllocator> {
  pub fn with_hasher(hasher: H) -> ColResult<Self> {
    Self::with_hasher_and_allocator(hasher, SystemAllocator)
  }
}

impl<K: Copy, V: Copy, H: KeyHasher<K>, A: RawAllocator> HashTable<K, V, H, A> {
  const ENTRY_STRIDE: usize = std::mem::size_of::<Entry<K, V>>();
  const ENTRY_ALIGN: usize = if std::mem::align_of::<Entry<K, V>>() > CACHE_LINE_SIZE {
    std::mem::align_of::<Entry<K, V>>()
  } else {
    CACHE_LINE_SIZE
  };

  pub fn with_hasher_and_allocator(hasher: H, allocator: A) -> ColResult<Self> {
    let allocator = AlignedAllocator::from_allocator(allocator);
    let entries = AlignedBlock::zeroed(&allocator, Self::ENTRY_STRIDE, Self::ENTRY_ALIGN, INITIAL_CAPACITY)?;

    Ok(Self { allocator, entries, length: 0, hasher, _marker: PhantomData })
  }

  /// Number of stored entries.
  #[inline(always)]
  pub fn len(&self) -> usize {
    self.length
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.length == 0
  }

  /// Number of slots.
  #[inline(always)]
  pub fn capacity(&self) -> usize {
    self.entries.capacity()
  }

  pub fn hasher(&self) -> &H {
    &self.hasher
  }

  /// Base address of the slot array.
  #[inline(always)]
  pub fn as_ptr(&self) -> *const u8 {
    self.entries.as_ptr()
  }

  pub fn get(&self, key: &K) -> Option<V> {
    let index = self.find(self.hash_of(key), key)?;
    Some(unsafe { (*self.entry(index)).value.assume_init() })
  }

  pub fn contains_key(&self, key: &K) -> bool {
    self.find(self.hash_of(key), key).is_some()
  }

  /// Associates `value` with `key`, returning the value it replaced.
  ///
  /// The table grows before inserting if it is at least half full. If that
  /// growth fails the table is unchanged.
  pub fn put(&mut self, key: K, value: V) -> ColResult<Option<V>> {
    if self.length >= self.capacity() / 2 {
      self.expand()?;
    }

    let hash = self.hash_of(&key);
    let replaced = Self::set_entry(&self.entries, &self.hasher, hash, key, value);

    if replaced.is_none() {
      self.length += 1;
    }

    Ok(replaced)
  }

  /// Removes `key`, returning its value if it was present.
  pub fn erase(&mut self, key: &K) -> Option<V> {
    let hash = self.hash_of(key);
    let index = self.find(hash, key)?;

    let value = unsafe {
      let entry = self.entry(index);
      (*entry).hash = 0;
      (*entry).value.assume_init()
    };

    self.length -= 1;

    acol_trace!("[ht_erase] - slot={index}, len={}", self.length);

    self.fix_up(index);

    Some(value)
  }

  /// `put` for `Some(value)`, `erase` for `None`. Returns the previous value
  /// either way.
  pub fn update(&mut self, key: K, value: Option<V>) -> ColResult<Option<V>> {
    match value {
      Some(value) => self.put(key, value),
      None => Ok(self.erase(&key)),
    }
  }

  /// Calls `f` with every key and value in slot order. The first error
  /// returned by `f` stops the walk and is handed back to the caller.
  pub fn each<F: FnMut(&K, &V) -> ColResult<()>>(&self, mut f: F) -> ColResult<()> {
    for index in 0..self.capacity() {
      let entry = unsafe { &*self.entry(index) };
      if entry.hash != 0 {
        unsafe { f(entry.key.assume_init_ref(), entry.value.assume_init_ref())? };
      }
    }
    Ok(())
  }

  /// Key value pairs in slot order.
  pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
    (0..self.capacity()).filter_map(move |index| {
      let entry = unsafe { &*self.entry(index) };
      match entry.hash {
        0 => None,
        _ => Some(unsafe { (entry.key.assume_init(), entry.value.assume_init()) }),
      }
    })
  }

  #[inline(always)]
  fn hash_of(&self, key: &K) -> u64 {
    let hash = self.hasher.hash_key(key);
    acol_debug_assert!(hash != 0, "Key hash must not be 0, it marks empty slots");
    hash
  }

  #[inline(always)]
  fn entry(&self, index: usize) -> *mut Entry<K, V> {
    self.entries.slot::<Entry<K, V>>(index)
  }

  fn find(&self, hash: u64, key: &K) -> Option<usize> {
    let mask = self.capacity() - 1;
    let mut index = hash as usize & mask;

    loop {
      let entry = unsafe { &*self.entry(index) };

      if entry.hash == 0 {
        return None;
      }

      if entry.hash == hash && self.hasher.keys_equal(unsafe { entry.key.assume_init_ref() }, key) {
        return Some(index);
      }

      index = (index + 1) & mask;
    }
  }

  /// Writes the entry into the first slot of its probe sequence that is
  /// either empty or holds an equal key. Returns the replaced value, or
  /// `None` if an empty slot was taken.
  ///
  /// `entries` must have at least one empty slot.
  fn set_entry(entries: &AlignedBlock, hasher: &H, hash: u64, key: K, value: V) -> Option<V> {
    let mask = entries.capacity() - 1;
    let mut index = hash as usize & mask;

    loop {
      let entry = unsafe { &mut *entries.slot::<Entry<K, V>>(index) };

      if entry.hash == 0 {
        entry.hash = hash;
        entry.key.write(key);
        entry.value.write(value);
        return None;
      }

      if entry.hash == hash && hasher.keys_equal(unsafe { entry.key.assume_init_ref() }, &key) {
        let replaced = unsafe { entry.value.assume_init() };
        entry.value.write(value);
        return Some(replaced);
      }

      index = (index + 1) & mask;
    }
  }

  /// Re-places every entry of the probe run following the freshly emptied
  /// slot at `index`, so lookups never stop early at the hole.
  fn fix_up(&mut self, index: usize) {
    let mask = self.capacity() - 1;
    let mut next = (index + 1) & mask;

    loop {
      let (hash, key, value) = unsafe {
        let entry = self.entry(next);
        if (*entry).hash == 0 {
          break;
        }
        let moved = ((*entry).hash, (*entry).key.assume_init(), (*entry).value.assume_init());
        (*entry).hash = 0;
        moved
      };

      Self::set_entry(&self.entries, &self.hasher, hash, key, value);

      next = (next + 1) & mask;
    }
  }

  /// Doubles the slot count and rehashes every entry into the new slots. On
  /// allocation failure the current slots are kept.
  ///
  /// # Panics
  ///
  /// If the doubled slot count does not fit in `usize`.
  fn expand(&mut self) -> ColResult<()> {
    let capacity = self.capacity();
    let Some(new_capacity) = capacity.checked_mul(2) else {
      panic!("Hash table capacity overflow at {capacity} slots");
    };
    acol_debug_assert!(new_capacity.is_power_of_two(), "Hash table capacity {new_capacity} is not a power of 2");

    acol_trace!("[ht_expand] - len={}, cap={capacity}, new_cap={new_capacity}", self.length);

    let mut entries = AlignedBlock::zeroed(&self.allocator, Self::ENTRY_STRIDE, Self::ENTRY_ALIGN, new_capacity)?;

    for index in 0..capacity {
      let entry = unsafe { &*self.entry(index) };
      if entry.hash != 0 {
        let (key, value) = unsafe { (entry.key.assume_init(), entry.value.assume_init()) };
        Self::set_entry(&entries, &self.hasher, entry.hash, key, value);
      }
    }

    std::mem::swap(&mut self.entries, &mut entries);

    unsafe { entries.release(&self.allocator) };

    Ok(())
  }
}

impl<K: Copy + Debug, V: Copy + Debug, H: KeyHasher<K>, A: RawAllocator> Debug for HashTable<K, V, H, A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut map = f.debug_map();
    for (key, value) in self.iter() {
      map.entry(&key, &value);
    }
    map.finish()
  }
}

impl<K: Copy, V: Copy, H: KeyHasher<K>, A: RawAllocator> Drop for HashTable<K, V, H, A> {
  fn drop(&mut self) {
    unsafe { self.entries.release(&self.allocator) };
  }
}
