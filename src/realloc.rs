//! Resizing as copy-forward.
//!
//! The arena never tracks individual allocation sizes and never frees a
//! region, so "resizing" always means reserving a fresh region and copying
//! the old contents into it. The old region stays valid and keeps its
//! space until the whole arena is released. Shrinking costs as much as
//! growing: `new_size` fresh bytes.

use std::{num::NonZeroUsize, ptr, slice};

use crate::{arena::Arena, provider::BlockProvider};

impl<P: BlockProvider> Arena<P> {
  /// Reserves `new_size` bytes and copies the first
  /// `min(old.len(), new_size)` bytes of `old` into them. Bytes past the
  /// copied prefix are zeroed.
  ///
  /// Returns `None` for `new_size == 0`; `old` is left untouched either way.
  pub fn realloc<'a>(
    &'a self,
    old: Option<&[u8]>,
    new_size: usize,
  ) -> Option<&'a mut [u8]> {
    let size = NonZeroUsize::new(new_size)?;
    let region = self.reserve(size).as_ptr();
    let copied = old.map_or(0, |old| old.len().min(new_size));

    unsafe {
      if let Some(old) = old {
        ptr::copy_nonoverlapping(old.as_ptr(), region, copied);
      }
      region.add(copied).write_bytes(0, new_size - copied);

      Some(slice::from_raw_parts_mut(region, new_size))
    }
  }

  /// Pointer form of [`Arena::realloc`]. Reserves `new_size` bytes and, if
  /// `old` is not null, copies exactly `new_size` bytes from it. Returns
  /// null for `new_size == 0`.
  ///
  /// # Safety
  ///
  /// The arena does not know how large the region at `old` is. When `old`
  /// is not null the caller must guarantee `new_size` bytes starting at
  /// `old` are readable, even when growing past the original allocation.
  pub unsafe fn realloc_raw(
    &self,
    old: *const u8,
    new_size: usize,
  ) -> *mut u8 {
    let Some(size) = NonZeroUsize::new(new_size) else {
      return ptr::null_mut();
    };

    let region = self.reserve(size).as_ptr();

    if !old.is_null() {
      // A grown copy of the most recent region reads into the new one.
      unsafe { ptr::copy(old, region, new_size) };
    }

    region
  }
}

#[cfg(test)]
mod tests {
  use crate::{arena::Arena, config::ArenaConfig, provider::testing::Counting};

  fn fill_sequence(region: &mut [u8]) {
    for (i, byte) in region.iter_mut().enumerate() {
      *byte = (i * 7 % 251) as u8;
    }
  }

  #[test]
  fn test_grow() {
    let arena = Arena::new(1024);
    let initial = size_of::<i32>() * 100;
    let grown = size_of::<i32>() * 112;

    let integers = arena.alloc_zeroed(initial).unwrap();
    fill_sequence(integers);

    let integers2 = arena.realloc(Some(&*integers), grown).unwrap();

    #[cfg(feature = "introspect")]
    assert_eq!(arena.current_used_space(), initial + grown);
    assert_eq!(unsafe { integers.as_ptr().add(initial) }, integers2.as_ptr());
    assert_eq!(integers[..], integers2[..initial]);
    assert!(integers2[initial..].iter().all(|&b| b == 0));
  }

  #[test]
  fn test_shrink() {
    let arena = Arena::new(1024);
    let initial = size_of::<i32>() * 100;
    let shrunk = size_of::<i32>() * 88;

    let integers = arena.alloc_zeroed(initial).unwrap();
    fill_sequence(integers);

    let integers2 = arena.realloc(Some(&*integers), shrunk).unwrap();

    #[cfg(feature = "introspect")]
    assert_eq!(arena.current_used_space(), initial + shrunk);
    assert_eq!(integers2.len(), shrunk);
    assert_eq!(integers2[..], integers[..shrunk]);
  }

  #[test]
  fn test_zero_size_keeps_original() {
    let arena = Arena::new(1024);
    let initial = size_of::<i32>() * 100;

    let integers = arena.alloc_zeroed(initial).unwrap();
    fill_sequence(integers);
    let snapshot = integers.to_vec();

    assert!(arena.realloc(Some(&*integers), 0).is_none());
    assert!(unsafe { arena.realloc_raw(integers.as_ptr(), 0) }.is_null());

    #[cfg(feature = "introspect")]
    assert_eq!(arena.current_used_space(), initial);
    assert_eq!(integers[..], snapshot[..]);

    let next = arena.alloc_raw(1).cast_const();
    assert_eq!(unsafe { integers.as_ptr().add(initial) }, next);
  }

  #[test]
  fn test_without_origin() {
    let arena = Arena::new(1024);
    let size = size_of::<i32>() * 10;

    let integers = arena.realloc(None, size).unwrap();

    #[cfg(feature = "introspect")]
    assert_eq!(arena.current_used_space(), size);
    assert!(integers.iter().all(|&b| b == 0));

    let raw = unsafe { arena.realloc_raw(std::ptr::null(), size) };

    assert!(!raw.is_null());
    #[cfg(feature = "introspect")]
    assert_eq!(arena.current_used_space(), 2 * size);
  }

  #[test]
  fn test_raw_copies_requested_length() {
    let arena = Arena::new(1024);

    unsafe {
      let original = arena.alloc_raw(64);
      fill_sequence(std::slice::from_raw_parts_mut(original, 64));
      let snapshot = std::slice::from_raw_parts(original, 64).to_vec();

      let shrunk = arena.realloc_raw(original, 32);
      assert_eq!(std::slice::from_raw_parts(shrunk, 32), &snapshot[..32]);

      // The grown copy reads 16 bytes past `original` into `shrunk`, which
      // is still inside the same chunk.
      let grown = arena.realloc_raw(original, 80);
      assert_eq!(std::slice::from_raw_parts(grown, 64), &snapshot[..]);
      assert_eq!(std::slice::from_raw_parts(grown.add(64), 16), &snapshot[..16]);
    }

    #[cfg(feature = "introspect")]
    assert_eq!(arena.current_used_space(), 64 + 32 + 80);
  }

  #[test]
  fn test_shrink_across_chunks() {
    let provider = Counting::default();
    let arena = Arena::with_provider(100, ArenaConfig::default(), &provider);

    let first = arena.alloc_zeroed(80).unwrap();
    fill_sequence(first);

    let second = arena.realloc(Some(&*first), 40).unwrap();

    assert_eq!(provider.acquired.get(), 2);
    #[cfg(feature = "introspect")]
    assert_eq!(arena.chunk_count(), 2);
    assert_eq!(second[..], first[..40]);
  }
}
