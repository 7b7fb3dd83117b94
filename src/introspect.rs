//! Read-only occupancy queries over the chunk chain.
//!
//! Compiled in with the `introspect` feature. Chunks are addressed by their
//! zero-based position in the chain, `0` being the chunk created with the
//! arena. Out-of-range positions report `0` instead of failing.

use std::{iter::FusedIterator, marker::PhantomData, ptr::NonNull};

use crate::{arena::Arena, chunk::Chunk, provider::BlockProvider};

/// Occupancy of a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStats {
  pub capacity: usize,
  pub used: usize,
}

impl ChunkStats {
  fn of(chunk: NonNull<Chunk>) -> Self {
    unsafe {
      Self {
        capacity: (*chunk.as_ptr()).capacity,
        used: (*chunk.as_ptr()).used,
      }
    }
  }

  pub fn available(&self) -> usize {
    self.capacity - self.used
  }
}

/// Iterator over the chain in creation order. See [`Arena::chunks`].
pub struct Chunks<'a> {
  next: Option<NonNull<Chunk>>,
  _arena: PhantomData<&'a ()>,
}

impl Iterator for Chunks<'_> {
  type Item = ChunkStats;

  fn next(&mut self) -> Option<ChunkStats> {
    let chunk = self.next?;
    self.next = unsafe { Chunk::next(chunk) };

    Some(ChunkStats::of(chunk))
  }
}

impl FusedIterator for Chunks<'_> {}

impl<P: BlockProvider> Arena<P> {
  pub fn chunks(&self) -> Chunks<'_> {
    Chunks {
      next: Some(self.begin),
      _arena: PhantomData,
    }
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks().count()
  }

  pub fn capacity_of(
    &self,
    index: usize,
  ) -> usize {
    self.chunks().nth(index).map_or(0, |chunk| chunk.capacity)
  }

  pub fn available_space_of(
    &self,
    index: usize,
  ) -> usize {
    self.chunks().nth(index).map_or(0, |chunk| chunk.available())
  }

  pub fn used_space_of(
    &self,
    index: usize,
  ) -> usize {
    self.chunks().nth(index).map_or(0, |chunk| chunk.used)
  }

  /// Available space of the last chunk, without walking the chain.
  pub fn current_available_space(&self) -> usize {
    ChunkStats::of(self.end.get()).available()
  }

  /// Used space of the last chunk, without walking the chain.
  pub fn current_used_space(&self) -> usize {
    ChunkStats::of(self.end.get()).used
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fresh_arena() {
    let arena = Arena::new(128);

    assert_eq!(arena.chunk_count(), 1);
    assert_eq!(
      arena.chunks().collect::<Vec<_>>(),
      [ChunkStats { capacity: 128, used: 0 }]
    );
    assert_eq!(arena.current_available_space(), 128);
    assert_eq!(arena.current_used_space(), 0);
  }

  #[test]
  fn test_indexed_queries() {
    let arena = Arena::new(100);

    arena.alloc(60).unwrap();
    arena.alloc(70).unwrap();
    arena.alloc(25).unwrap();

    assert_eq!(arena.chunk_count(), 2);

    assert_eq!(arena.used_space_of(0), 60);
    assert_eq!(arena.available_space_of(0), 40);
    assert_eq!(arena.used_space_of(1), 95);
    assert_eq!(arena.available_space_of(1), 5);
    assert_eq!(arena.capacity_of(1), 100);

    assert_eq!(arena.current_used_space(), arena.used_space_of(1));
    assert_eq!(arena.current_available_space(), arena.available_space_of(1));
  }

  #[test]
  fn test_out_of_range_index() {
    let arena = Arena::new(100);
    arena.alloc(10).unwrap();

    assert_eq!(arena.used_space_of(1), 0);
    assert_eq!(arena.available_space_of(1), 0);
    assert_eq!(arena.capacity_of(usize::MAX), 0);
  }

  #[test]
  fn test_chunks_is_fused() {
    let arena = Arena::new(8);
    let mut chunks = arena.chunks();

    assert!(chunks.next().is_some());
    assert!(chunks.next().is_none());
    assert!(chunks.next().is_none());
  }
}
