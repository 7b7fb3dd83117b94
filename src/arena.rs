use std::{
  cell::Cell,
  fmt,
  marker::PhantomData,
  mem::MaybeUninit,
  num::NonZeroUsize,
  ptr::{self, NonNull},
  slice,
};

use crate::{
  chunk::Chunk,
  config::{ArenaConfig, Placement},
  provider::{BlockProvider, Malloc},
};

/// Region allocator. Hands out byte ranges from a chain of chunks and
/// releases all of them at once when dropped.
///
/// ```text
///   begin                                            end
///     │                                               │
///     ▼                                               ▼
///   ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
///   │ ████████░░░░ │ ─> │ ██████████░░ │ ─> │ ███░░░░░░░░░ │ ─> None
///   └──────────────┘    └──────────────┘    └──────────────┘
///     █ used  ░ available
/// ```
///
/// Allocation takes `&self`, so regions handed out earlier stay borrowed
/// while new ones are carved. Nothing can be freed individually; the borrow
/// checker guarantees every region is dead before the chunks are released.
///
/// Allocations are packed byte-adjacent without alignment padding. Use
/// unaligned reads and writes when storing typed values.
pub struct Arena<P: BlockProvider = Malloc> {
  pub(crate) begin: NonNull<Chunk>,
  pub(crate) end: Cell<NonNull<Chunk>>,
  len: Cell<usize>,
  base: usize,
  config: ArenaConfig,
  provider: P,
  _owns: PhantomData<Chunk>,
}

// Chunks are reachable only through the arena, so moving the arena moves
// all of them. `Cell` already rules out `Sync`.
unsafe impl<P: BlockProvider + Send> Send for Arena<P> {}

impl Arena<Malloc> {
  /// Creates an arena whose chunks hold `capacity` bytes each, using the
  /// default configuration.
  pub fn new(capacity: usize) -> Self {
    Self::with_config(capacity, ArenaConfig::default())
  }

  pub fn with_config(
    capacity: usize,
    config: ArenaConfig,
  ) -> Self {
    Self::with_provider(capacity, config, Malloc)
  }
}

impl<P: BlockProvider> Arena<P> {
  /// Creates an arena that acquires its chunks from `provider`. The first
  /// chunk is acquired immediately.
  pub fn with_provider(
    capacity: usize,
    config: ArenaConfig,
    provider: P,
  ) -> Self {
    let begin = match Chunk::create(&provider, capacity) {
      Ok(chunk) => chunk,
      Err(err) => (config.on_fatal)(&err),
    };

    Self {
      begin,
      end: Cell::new(begin),
      len: Cell::new(1),
      base: capacity,
      config,
      provider,
      _owns: PhantomData,
    }
  }

  /// Capacity of every regular chunk.
  pub fn chunk_capacity(&self) -> usize {
    self.base
  }

  pub fn config(&self) -> &ArenaConfig {
    &self.config
  }

  pub fn provider(&self) -> &P {
    &self.provider
  }

  /// Reserves `size` uninitialized bytes. Returns `None` for `size == 0`
  /// without touching any chunk.
  pub fn alloc(
    &self,
    size: usize,
  ) -> Option<&mut [MaybeUninit<u8>]> {
    let size = NonZeroUsize::new(size)?;
    let region = self.reserve(size);

    Some(unsafe { slice::from_raw_parts_mut(region.as_ptr().cast::<MaybeUninit<u8>>(), size.get()) })
  }

  /// Same as [`Arena::alloc`] with every byte set to zero.
  pub fn alloc_zeroed(
    &self,
    size: usize,
  ) -> Option<&mut [u8]> {
    let size = NonZeroUsize::new(size)?;
    let region = self.reserve(size).as_ptr();

    unsafe {
      region.write_bytes(0, size.get());
      Some(slice::from_raw_parts_mut(region, size.get()))
    }
  }

  /// Pointer form of [`Arena::alloc`]. Returns null for `size == 0`. The
  /// pointer is valid for `size` bytes until the arena is dropped.
  pub fn alloc_raw(
    &self,
    size: usize,
  ) -> *mut u8 {
    match NonZeroUsize::new(size) {
      Some(size) => self.reserve(size).as_ptr(),
      None => ptr::null_mut(),
    }
  }

  /// Releases every chunk. Equivalent to dropping the arena.
  pub fn destroy(self) {
    drop(self)
  }

  /// Places `size` bytes according to the configured [`Placement`],
  /// growing the chain when no chunk can take them.
  pub(crate) fn reserve(
    &self,
    size: NonZeroUsize,
  ) -> NonNull<u8> {
    let chunk = self.select(size.get());
    let offset = unsafe { (*chunk.as_ptr()).used };
    let region = unsafe { Chunk::bump(chunk, size) };

    tracing::trace!(size = size.get(), offset, "arena reservation");

    region
  }

  fn select(
    &self,
    size: usize,
  ) -> NonNull<Chunk> {
    let end = self.end.get();

    if self.config.placement == Placement::ReduceFragmentation {
      if let Some(hole) = self.find_hole(size) {
        return hole;
      }
    }

    if unsafe { Chunk::fits(end, size) } {
      end
    } else {
      self.append(size)
    }
  }

  /// First chunk before `end` with room for `size` bytes.
  fn find_hole(
    &self,
    size: usize,
  ) -> Option<NonNull<Chunk>> {
    let end = self.end.get();
    let mut current = self.begin;

    while current != end {
      unsafe {
        if Chunk::fits(current, size) {
          return Some(current);
        }

        current = Chunk::next(current)?;
      }
    }

    None
  }

  /// Links a new chunk after `end` and makes it the new `end`. The chunk
  /// gets the base capacity unless `size` alone is larger, in which case it
  /// is sized to fit exactly that request.
  fn append(
    &self,
    size: usize,
  ) -> NonNull<Chunk> {
    let capacity = self.base.max(size);

    let chunk = match Chunk::create(&self.provider, capacity) {
      Ok(chunk) => chunk,
      Err(err) => (self.config.on_fatal)(&err),
    };

    let end = self.end.replace(chunk);
    unsafe { (*end.as_ptr()).next = Some(chunk) };

    let index = self.len.replace(self.len.get() + 1);
    tracing::debug!(index, capacity, oversized = capacity > self.base, "appended arena chunk");

    chunk
  }
}

impl<P: BlockProvider> Drop for Arena<P> {
  fn drop(&mut self) {
    let mut released = 0usize;
    let mut current = Some(self.begin);

    while let Some(chunk) = current {
      unsafe {
        current = Chunk::next(chunk);
        Chunk::destroy(&self.provider, chunk);
      }
      released += 1;
    }

    tracing::trace!(chunks = released, "arena released");
  }
}

impl<P: BlockProvider> fmt::Debug for Arena<P> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Arena")
      .field("chunk_capacity", &self.base)
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}
