use super::Vec3;
use crate::{ColError, FnKeyHasher, HashTable, KeyHasher, INITIAL_CAPACITY};
use acol_allocator::{CountingAllocator, CACHE_LINE_SIZE};
use acol_hash::{fnv_64a_i32, FNV1A_64_INIT};

/// Keys 1, 2 and 3 share a hash value.
fn colliding_hash(k: &i32) -> u64 {
  match k {
    1 | 2 | 3 => fnv_64a_i32(1, FNV1A_64_INIT),
    _ => fnv_64a_i32(*k, FNV1A_64_INIT),
  }
}

fn bad_hash(_: &i32) -> u64 {
  1
}

fn better_hash(k: &i32) -> u64 {
  fnv_64a_i32(*k, FNV1A_64_INIT)
}

fn int_eq(a: &i32, b: &i32) -> bool {
  a == b
}

fn visit_count<K: Copy, V: Copy, H: KeyHasher<K>>(table: &HashTable<K, V, H>, visited: &mut Vec<K>) -> usize {
  table
    .each(|k, _| {
      visited.push(*k);
      Ok(())
    })
    .unwrap();
  visited.len()
}

#[test]
fn vec3_values_with_colliding_keys() {
  let mut ht: HashTable<i32, Vec3, _> = HashTable::with_hasher(FnKeyHasher::new(colliding_hash, int_eq)).unwrap();

  let v1 = Vec3::new(0.1, 0.2, 0.3);
  let v2 = Vec3::new(1.1, 1.2, 1.3);
  let v3 = Vec3::new(2.1, 2.2, 2.3);

  let mut visited = vec![];
  assert_eq!(visit_count(&ht, &mut visited), 0);

  assert_eq!(ht.put(1, v1), Ok(None));
  assert_eq!(ht.get(&1), Some(v1));
  assert_eq!(visit_count(&ht, &mut visited), 1);

  assert_eq!(ht.put(2, v2), Ok(None));
  assert_eq!(ht.get(&1), Some(v1));
  assert_eq!(ht.get(&2), Some(v2));
  assert_eq!(visit_count(&ht, &mut visited), 3);

  assert_eq!(ht.update(1, None), Ok(Some(v1)));
  assert_eq!(ht.get(&1), None);
  assert_eq!(ht.get(&2), Some(v2));
  assert_eq!(visit_count(&ht, &mut visited), 4);

  assert_eq!(ht.put(1, v1), Ok(None));
  assert_eq!(visit_count(&ht, &mut visited), 6);
  assert_eq!(ht.get(&1), Some(v1));
  assert_eq!(ht.get(&2), Some(v2));

  assert_eq!(ht.put(3, v3), Ok(None));
  assert_eq!(ht.get(&1), Some(v1));
  assert_eq!(ht.get(&2), Some(v2));
  assert_eq!(ht.get(&3), Some(v3));
  assert_eq!(ht.len(), 3);
  assert_eq!(visit_count(&ht, &mut visited), 9);

  // Erasing from the middle of a probe run must keep the rest reachable.
  assert_eq!(ht.update(2, None), Ok(Some(v2)));
  assert_eq!(ht.get(&1), Some(v1));
  assert_eq!(ht.get(&2), None);
  assert_eq!(ht.get(&3), Some(v3));
  assert_eq!(ht.len(), 2);
  assert_eq!(visit_count(&ht, &mut visited), 11);

  assert_eq!(ht.update(1, None), Ok(Some(v1)));
  assert_eq!(ht.update(2, None), Ok(None));
  assert_eq!(ht.update(3, None), Ok(Some(v3)));
  assert_eq!(ht.len(), 0);
  assert_eq!(visit_count(&ht, &mut visited), 11);

  assert_eq!(ht.update(1, None), Ok(None));
  assert_eq!(ht.update(2, None), Ok(None));
  assert_eq!(ht.update(3, None), Ok(None));
  assert_eq!(ht.len(), 0);
  assert_eq!(visit_count(&ht, &mut visited), 11);

  assert_eq!(ht.get(&4), None);
}

#[test]
fn constant_hash_still_works() {
  let mut ht: HashTable<i32, i32, _> = HashTable::with_hasher(FnKeyHasher::new(bad_hash, int_eq)).unwrap();
  const ITERS: i32 = 100;

  for i in 0..ITERS {
    assert_eq!(ht.put(i, i), Ok(None));
  }
  assert_eq!(ht.len(), ITERS as usize);

  for i in 0..ITERS {
    assert_eq!(ht.get(&i), Some(i));
  }
  assert_eq!(ht.len(), ITERS as usize);

  for i in 0..ITERS {
    assert_eq!(ht.erase(&i), Some(i));
  }
  assert_eq!(ht.len(), 0);
}

#[test]
fn spread_hash_round_trip() {
  let mut ht: HashTable<i32, i32, _> = HashTable::with_hasher(FnKeyHasher::new(better_hash, int_eq)).unwrap();
  const ITERS: i32 = 100;

  for i in 0..ITERS {
    assert_eq!(ht.put(i, i), Ok(None));
  }
  assert_eq!(ht.len(), ITERS as usize);

  for i in 0..ITERS {
    assert_eq!(ht.get(&i), Some(i));
  }

  for i in (0..ITERS).rev() {
    assert_eq!(ht.erase(&i), Some(i));
    assert!(!ht.contains_key(&i));
  }
  assert!(ht.is_empty());
}

#[test]
fn put_replaces_existing_value() {
  let mut ht = HashTable::<u64, u64>::new().unwrap();

  assert_eq!(ht.put(7, 1), Ok(None));
  assert_eq!(ht.put(7, 2), Ok(Some(1)));
  assert_eq!(ht.len(), 1);
  assert_eq!(ht.get(&7), Some(2));
  assert_eq!(ht.update(7, Some(3)), Ok(Some(2)));
  assert_eq!(ht.get(&7), Some(3));
}

#[test]
fn capacity_doubles_at_half_full() {
  let mut ht = HashTable::<u32, u32>::new().unwrap();
  assert_eq!(ht.capacity(), INITIAL_CAPACITY);

  for i in 0..(INITIAL_CAPACITY / 2) as u32 {
    ht.put(i, i).unwrap();
  }
  assert_eq!(ht.capacity(), INITIAL_CAPACITY);

  ht.put(1000, 0).unwrap();
  assert_eq!(ht.capacity(), INITIAL_CAPACITY * 2);
  assert_eq!(ht.len(), INITIAL_CAPACITY / 2 + 1);

  for i in 0..(INITIAL_CAPACITY / 2) as u32 {
    assert_eq!(ht.get(&i), Some(i));
  }
  assert_eq!(ht.get(&1000), Some(0));
}

#[test]
fn each_stops_on_first_error() {
  let mut ht = HashTable::<u32, u32>::new().unwrap();
  for i in 0..5 {
    ht.put(i, i).unwrap();
  }

  let mut visited = 0;
  let result = ht.each(|_, _| {
    visited += 1;
    Err(ColError::IllegalArgument)
  });

  assert_eq!(result, Err(ColError::IllegalArgument));
  assert_eq!(visited, 1);

  let mut pairs = ht.iter().collect::<Vec<_>>();
  pairs.sort();
  assert_eq!(pairs, [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
}

#[test]
fn hash_zero_is_remapped() {
  let hasher = crate::FnvKeyHasher;
  for key in 0..10_000u32 {
    assert_ne!(KeyHasher::<u32>::hash_key(&hasher, &key), 0);
  }
}

#[test]
fn slots_are_cache_aligned_and_released() {
  let counter = CountingAllocator::new();

  {
    let mut ht: HashTable<u64, u64, _, _> = HashTable::with_hasher_and_allocator(crate::FnvKeyHasher, &counter).unwrap();
    assert_eq!(ht.as_ptr() as usize % CACHE_LINE_SIZE, 0);

    for i in 0..200u64 {
      ht.put(i, i * 2).unwrap();
    }
    assert_eq!(counter.live(), 1);
    assert_eq!(ht.as_ptr() as usize % CACHE_LINE_SIZE, 0);
  }

  assert_eq!(counter.live(), 0);
}

#[test]
fn failed_expansion_keeps_table() {
  let counter = CountingAllocator::failing_after(1);
  let mut ht: HashTable<u32, u32, _, _> = HashTable::with_hasher_and_allocator(crate::FnvKeyHasher, &counter).unwrap();

  for i in 0..(INITIAL_CAPACITY / 2) as u32 {
    ht.put(i, i).unwrap();
  }

  assert_eq!(ht.put(99, 99), Err(ColError::BadAlloc));
  assert_eq!(ht.len(), INITIAL_CAPACITY / 2);
  assert_eq!(ht.capacity(), INITIAL_CAPACITY);

  for i in 0..(INITIAL_CAPACITY / 2) as u32 {
    assert_eq!(ht.get(&i), Some(i));
  }

  // Overwriting still needs room for a potential insert, so it fails too.
  assert_eq!(ht.put(0, 5), Err(ColError::BadAlloc));
  assert_eq!(ht.erase(&0), Some(0));
  assert_eq!(ht.put(0, 5), Ok(None));
}

#[test]
fn debug_lists_entries() {
  let mut ht = HashTable::<u8, char>::new().unwrap();
  ht.put(1, 'a').unwrap();
  assert_eq!(format!("{ht:?}"), "{1: 'a'}");
}
