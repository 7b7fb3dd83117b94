//! Per-arena configuration.

use std::{alloc, fmt};

use crate::error::AcquireError;

/// Conventional initial capacity: one small page.
pub const PAGE_SIZE: usize = 1 << 12;

/// Conventional initial capacity for arenas expecting larger bursts.
pub const HUGE_PAGE_SIZE: usize = 1 << 14;

/// Invoked when a chunk cannot be acquired. Must not return.
pub type FatalHandler = fn(&AcquireError) -> !;

/// Where an allocation request lands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
  /// Always bump from the last chunk, appending a new one when it is full.
  /// O(1) per request.
  #[default]
  Append,
  /// Reuse leftover space in earlier chunks before touching the last one.
  /// Scans the chain front to back, so each request costs O(chunks).
  ReduceFragmentation,
}

/// Policies an arena is created with. Fixed for the arena's lifetime.
#[derive(Clone, Copy)]
pub struct ArenaConfig {
  pub placement: Placement,
  pub on_fatal: FatalHandler,
}

impl ArenaConfig {
  pub fn with_placement(
    mut self,
    placement: Placement,
  ) -> Self {
    self.placement = placement;
    self
  }

  pub fn with_fatal_handler(
    mut self,
    on_fatal: FatalHandler,
  ) -> Self {
    self.on_fatal = on_fatal;
    self
  }
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self {
      placement: Placement::Append,
      on_fatal: abort_on_exhaustion,
    }
  }
}

impl fmt::Debug for ArenaConfig {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("ArenaConfig")
      .field("placement", &self.placement)
      .finish_non_exhaustive()
  }
}

/// Default fatal handler: reports the failure and aborts the process.
pub fn abort_on_exhaustion(err: &AcquireError) -> ! {
  tracing::error!(error = %err, "arena chunk acquisition failed");
  alloc::handle_alloc_error(err.layout())
}
