//! # keydex
//!
//! Allocation-aware key/value index primitives for systems that budget
//! their own memory:
//! - Core data structures with explicit, fallible storage acquisition
//! - A closed node budget for the skip list (caller-injected pages)
//! - Typed errors instead of aborts, so capacity policy stays with the
//!   embedding system
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        keydex                           │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │  ┌────────────┐   ┌──────────────┐   ┌──────────────┐   │
//! │  │ MinMaxHeap │   │   SkipList   │   │RobinHoodTable│   │
//! │  │ (min+max   │   │ (ordered map │   │(unordered map│   │
//! │  │  in O(1))  │   │  over a slab)│   │ PSL probing) │   │
//! │  └────────────┘   └──────┬───────┘   └──────────────┘   │
//! │                          │                              │
//! │                     NodeArena                           │
//! │              (page-based index free list)               │
//! │                                                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The three structures share no state and no code; each is a leaf for a
//! higher-level subsystem (a scheduler queue, an ordered index, a lookup
//! table). None of them is thread-safe: callers serialize externally, one
//! instance per owner.

pub mod error;
pub mod heap;
pub mod robinhood;
pub mod skiplist;
pub mod traits;

// Re-export commonly used types
pub use error::{Error, Result};
pub use heap::MinMaxHeap;
pub use robinhood::{KeyWidth, RobinHoodTable, MIN_BITS};
pub use skiplist::{Frontier, SkipList, NODES_PER_PAGE, PAGE_SIZE};
pub use traits::WordMap;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
