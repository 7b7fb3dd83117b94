//! Failure descriptions for backing-block acquisition.

use std::alloc::Layout;

use thiserror::Error;

/// Why a chunk could not be created.
///
/// This never reaches callers of the allocation API. The arena hands it to
/// the configured fatal handler, which must not return.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
  /// The provider could not satisfy the request.
  #[error("unable to acquire {} bytes for an arena chunk", .layout.size())]
  Exhausted { layout: Layout },

  /// Header plus data region of the requested capacity does not fit in an
  /// address space.
  #[error("arena chunk capacity of {capacity} bytes overflows the address space")]
  CapacityOverflow { capacity: usize },
}

impl AcquireError {
  /// Layout to report to [`std::alloc::handle_alloc_error`]. Overflowed
  /// requests have no real layout, so the largest representable one is used.
  pub fn layout(&self) -> Layout {
    match *self {
      Self::Exhausted { layout } => layout,
      Self::CapacityOverflow { .. } => {
        // `isize::MAX` rounded down to a multiple of the alignment is always valid.
        Layout::from_size_align(isize::MAX as usize & !7, 8).unwrap_or(Layout::new::<u8>())
      }
    }
  }
}
