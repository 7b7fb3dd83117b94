use std::{
  alloc::Layout,
  mem,
  num::NonZeroUsize,
  ptr::NonNull,
};

use crate::{align, align::checked_align, error::AcquireError, provider::BlockProvider};

/// Bytes between the start of a backing block and its data region.
pub(crate) const CHUNK_HEADER_SIZE: usize = align!(mem::size_of::<Chunk>());

/// Header at the start of every backing block. The data region follows it
/// inline and is exactly `capacity` bytes long:
///
/// ```text
///   ┌─────────────────────────┬───────────────────────┬──────────────┐
///   │ next | capacity | used  │  handed out (used)    │  available   │
///   └─────────────────────────┴───────────────────────┴──────────────┘
///   ▲                         ▲                       ▲              ▲
///   block                     data                    data + used    data + capacity
/// ```
///
/// Chunks form a singly linked chain where each chunk owns the rest of the
/// chain through `next`. Headers are only ever touched through raw pointers
/// because the data region after them may be borrowed by callers.
#[repr(C)]
pub(crate) struct Chunk {
  pub next: Option<NonNull<Chunk>>,
  pub capacity: usize,
  pub used: usize,
}

impl Chunk {
  /// Layout of the backing block that holds a chunk of `capacity` bytes.
  pub fn layout(capacity: usize) -> Result<Layout, AcquireError> {
    CHUNK_HEADER_SIZE
      .checked_add(capacity)
      .and_then(checked_align)
      .and_then(|size| Layout::from_size_align(size, mem::align_of::<Chunk>()).ok())
      .ok_or(AcquireError::CapacityOverflow { capacity })
  }

  /// Acquires a backing block from `provider` and writes an empty header
  /// into it.
  pub fn create<P: BlockProvider>(
    provider: &P,
    capacity: usize,
  ) -> Result<NonNull<Chunk>, AcquireError> {
    let layout = Self::layout(capacity)?;
    let block = provider
      .acquire(layout)
      .ok_or(AcquireError::Exhausted { layout })?;

    let chunk = block.cast::<Chunk>();
    unsafe {
      chunk.as_ptr().write(Chunk {
        next: None,
        capacity,
        used: 0,
      })
    };

    Ok(chunk)
  }

  /// Releases the backing block of a single chunk. Does not follow `next`.
  ///
  /// # Safety
  ///
  /// `chunk` must come from [`Chunk::create`] with the same `provider` and
  /// nothing may reference its data region afterwards.
  pub unsafe fn destroy<P: BlockProvider>(
    provider: &P,
    chunk: NonNull<Chunk>,
  ) {
    unsafe {
      let capacity = (*chunk.as_ptr()).capacity;
      // Computed successfully when the chunk was created.
      let layout = Layout::from_size_align_unchecked(
        align!(CHUNK_HEADER_SIZE + capacity),
        mem::align_of::<Chunk>(),
      );

      provider.release(chunk.cast::<u8>(), layout);
    }
  }

  /// Whether `size` more bytes fit in the data region.
  ///
  /// # Safety
  ///
  /// `chunk` must point to a live chunk.
  #[inline]
  pub unsafe fn fits(
    chunk: NonNull<Chunk>,
    size: usize,
  ) -> bool {
    let (capacity, used) = unsafe { ((*chunk.as_ptr()).capacity, (*chunk.as_ptr()).used) };
    capacity - used >= size
  }

  /// Hands out the next `size` bytes of the data region.
  ///
  /// # Safety
  ///
  /// `chunk` must point to a live chunk for which [`Chunk::fits`] holds.
  #[inline]
  pub unsafe fn bump(
    chunk: NonNull<Chunk>,
    size: NonZeroUsize,
  ) -> NonNull<u8> {
    unsafe {
      let used = (*chunk.as_ptr()).used;
      (*chunk.as_ptr()).used = used + size.get();

      Self::data(chunk).add(used)
    }
  }

  /// First byte of the data region.
  ///
  /// # Safety
  ///
  /// `chunk` must point to a live chunk.
  #[inline]
  pub unsafe fn data(chunk: NonNull<Chunk>) -> NonNull<u8> {
    unsafe { chunk.cast::<u8>().add(CHUNK_HEADER_SIZE) }
  }

  /// # Safety
  ///
  /// `chunk` must point to a live chunk.
  #[inline]
  pub unsafe fn next(chunk: NonNull<Chunk>) -> Option<NonNull<Chunk>> {
    unsafe { (*chunk.as_ptr()).next }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::{Malloc, testing::Counting};

  #[test]
  fn test_header_is_word_aligned() {
    assert_eq!(CHUNK_HEADER_SIZE % mem::size_of::<usize>(), 0);
    assert!(CHUNK_HEADER_SIZE >= mem::size_of::<Chunk>());
  }

  #[test]
  fn test_layout() {
    let layout = Chunk::layout(13).unwrap();

    assert_eq!(layout.size(), align!(CHUNK_HEADER_SIZE + 13));
    assert_eq!(layout.align(), mem::align_of::<Chunk>());

    assert_eq!(
      Chunk::layout(usize::MAX),
      Err(AcquireError::CapacityOverflow { capacity: usize::MAX })
    );
  }

  #[test]
  fn test_create_and_bump() {
    unsafe {
      let chunk = Chunk::create(&Malloc, 16).unwrap();

      assert_eq!((*chunk.as_ptr()).capacity, 16);
      assert_eq!((*chunk.as_ptr()).used, 0);
      assert!(Chunk::next(chunk).is_none());

      let first = Chunk::bump(chunk, NonZeroUsize::new(4).unwrap());
      let second = Chunk::bump(chunk, NonZeroUsize::new(12).unwrap());

      assert_eq!(first, Chunk::data(chunk));
      assert_eq!(second.as_ptr(), first.as_ptr().add(4));
      assert_eq!((*chunk.as_ptr()).used, 16);
      assert!(!Chunk::fits(chunk, 1));

      second.as_ptr().write_bytes(0xFF, 12);

      Chunk::destroy(&Malloc, chunk);
    }
  }

  #[test]
  fn test_create_exhausted() {
    let provider = Counting::with_limit(0);
    let layout = Chunk::layout(64).unwrap();

    assert_eq!(
      Chunk::create(&provider, 64).err(),
      Some(AcquireError::Exhausted { layout })
    );
  }

  #[test]
  fn test_destroy_releases_block() {
    let provider = Counting::default();

    unsafe {
      let chunk = Chunk::create(&provider, 32).unwrap();
      assert_eq!(provider.live(), 1);

      Chunk::destroy(&provider, chunk);
      assert_eq!(provider.live(), 0);
    }
  }
}
