//! Backing-block providers.
//!
//! The arena never talks to an allocator directly. Every chunk is acquired
//! through a [`BlockProvider`] and handed back to the same provider, with
//! the same [`Layout`], when the arena is torn down.

use std::{
  alloc::{self, Layout},
  ptr::NonNull,
};

/// Source of raw backing blocks for arena chunks.
///
/// # Safety
///
/// `acquire` must return a block that is valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`. The block must
/// stay valid until it is passed to `release`.
pub unsafe trait BlockProvider {
  /// Acquires a block of `layout.size()` bytes, or `None` if the request
  /// cannot be satisfied.
  fn acquire(
    &self,
    layout: Layout,
  ) -> Option<NonNull<u8>>;

  /// Releases a block previously returned by [`BlockProvider::acquire`].
  ///
  /// # Safety
  ///
  /// `block` must come from `acquire` on this provider with this exact
  /// `layout`, and must not be released twice.
  unsafe fn release(
    &self,
    block: NonNull<u8>,
    layout: Layout,
  );
}

/// Delegates to the C library's `malloc` and `free`. This is the default
/// provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct Malloc;

unsafe impl BlockProvider for Malloc {
  fn acquire(
    &self,
    layout: Layout,
  ) -> Option<NonNull<u8>> {
    // malloc only guarantees alignment suitable for fundamental types.
    if layout.align() > 2 * core::mem::size_of::<usize>() {
      return None;
    }

    NonNull::new(unsafe { libc::malloc(layout.size()) }.cast::<u8>())
  }

  unsafe fn release(
    &self,
    block: NonNull<u8>,
    _layout: Layout,
  ) {
    unsafe { libc::free(block.as_ptr().cast::<libc::c_void>()) }
  }
}

/// Delegates to Rust's global allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Global;

unsafe impl BlockProvider for Global {
  fn acquire(
    &self,
    layout: Layout,
  ) -> Option<NonNull<u8>> {
    if layout.size() == 0 {
      return None;
    }

    NonNull::new(unsafe { alloc::alloc(layout) })
  }

  unsafe fn release(
    &self,
    block: NonNull<u8>,
    layout: Layout,
  ) {
    unsafe { alloc::dealloc(block.as_ptr(), layout) }
  }
}

unsafe impl<P: BlockProvider + ?Sized> BlockProvider for &P {
  fn acquire(
    &self,
    layout: Layout,
  ) -> Option<NonNull<u8>> {
    (**self).acquire(layout)
  }

  unsafe fn release(
    &self,
    block: NonNull<u8>,
    layout: Layout,
  ) {
    unsafe { (**self).release(block, layout) }
  }
}
