//! # regalloc - A Region Allocator Library
//!
//! This crate provides a **region allocator** (also known as an arena): a
//! bump allocator that carves many small allocations out of a few large
//! backing blocks and releases all of them at once.
//!
//! ## Overview
//!
//! ```text
//!   Region Allocator Concept:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                              ARENA                                   │
//!   │                                                                      │
//!   │   Chunk 0                   Chunk 1                   Chunk 2 (end)  │
//!   │   ┌─────┬─────┬─────┬───┐   ┌─────┬─────┬───────┬─┐   ┌─────┬──────┐ │
//!   │   │ A1  │ A2  │ A3  │░░░│──>│ A4  │ A5  │  A6   │░│──>│ A7  │░░░░░░│ │
//!   │   └─────┴─────┴─────┴───┘   └─────┴─────┴───────┴─┘   └─────┴──────┘ │
//!   │                                                             ▲        │
//!   │                                                             │        │
//!   │                                                        Bump cursor   │
//!   │                                                        (next alloc)  │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Each allocation "bumps" the cursor of a chunk forward.
//!   A full chunk is followed by a new one of the same capacity.
//!   Dropping the arena releases every chunk in one walk.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   regalloc
//!   ├── align       - Word alignment for backing block sizes
//!   ├── arena       - Arena, chunk chain growth and placement
//!   ├── chunk       - Chunk header and inline data region (internal)
//!   ├── config      - ArenaConfig, Placement, fatal handler
//!   ├── error       - AcquireError
//!   ├── introspect  - Occupancy queries (feature `introspect`)
//!   ├── provider    - BlockProvider, Malloc, Global
//!   ├── realloc     - Copy-forward resizing
//!   └── string      - strdup / strndup
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use regalloc::{Arena, PAGE_SIZE};
//!
//! let arena = Arena::new(PAGE_SIZE);
//!
//! let buffer = arena.alloc_zeroed(16).unwrap();
//! buffer[..5].copy_from_slice(b"hello");
//!
//! let host = arena.strndup(&b"http://example.org/index"[7..18]);
//! assert_eq!(host.to_str(), Ok("example.org"));
//!
//! let grown = arena.realloc(Some(&*buffer), 32).unwrap();
//! assert_eq!(&grown[..5], b"hello");
//!
//! # #[cfg(feature = "introspect")]
//! assert_eq!(arena.current_used_space(), 16 + 12 + 32);
//! ```
//!
//! ## Placement
//!
//! With [`Placement::Append`] (the default) every request goes to the last
//! chunk. A request that does not fit abandons whatever space is left there:
//!
//! ```text
//!   alloc(4096), alloc(2048), alloc(4096), alloc(2048) with 4096-byte chunks
//!
//!   Append:               ReduceFragmentation:
//!   [████████]            [████████]
//!   [████░░░░]            [████████]   <- second 2048 lands in the hole
//!   [████████]            [████████]
//!   [████░░░░]
//! ```
//!
//! [`Placement::ReduceFragmentation`] scans earlier chunks for a hole large
//! enough before falling back to the last chunk, trading O(chunks) per
//! request for tighter packing.
//!
//! ## Features
//!
//! - **Pluggable backing memory**: any [`BlockProvider`]; `malloc` by default
//! - **Pluggable failure policy**: a diverging fatal handler in [`ArenaConfig`]
//! - **Oversized requests**: never refused, they get a chunk of their own
//! - **String helpers**: NUL-terminated duplication of byte sequences
//!
//! ## Limitations
//!
//! - **Single-threaded only**: an arena can move between threads, not be shared
//! - **No individual frees**: memory comes back only when the arena is dropped
//! - **No alignment padding**: allocations are packed byte-adjacent
//! - **No recovery from exhaustion**: acquisition failure is fatal
//!
//! ## Safety
//!
//! The safe API hands out slices borrowed from the arena, so the borrow
//! checker keeps them from outliving it. The `*_raw` functions mirror a C
//! style pointer API and leave those guarantees to the caller.

pub mod align;
mod arena;
mod chunk;
mod config;
mod error;
#[cfg(feature = "introspect")]
mod introspect;
mod provider;
mod realloc;
mod string;

pub use arena::Arena;
pub use config::{
  ArenaConfig, FatalHandler, HUGE_PAGE_SIZE, PAGE_SIZE, Placement, abort_on_exhaustion,
};
pub use error::AcquireError;
#[cfg(feature = "introspect")]
pub use introspect::{ChunkStats, Chunks};
pub use provider::{BlockProvider, Global, Malloc};
