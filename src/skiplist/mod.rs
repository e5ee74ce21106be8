//! # Skip List
//!
//! Ordered word-sized key/value map over a closed node budget. Nodes come
//! from a page-based slab arena; the structure never allocates on
//! its own, so callers size memory up front with [`SkipList::inject_page`]
//! and get a typed [`CapacityExceeded`](crate::Error::CapacityExceeded)
//! error back when the budget runs out.
//!
//! ## Architecture
//!
//! ```text
//! level 5:  HEAD ────────────────────────────────────────────► NIL
//! level 2:  HEAD ─────────────► 20 ──────────────► 50 ───────► NIL
//! level 1:  HEAD ───► 10 ────► 20 ─────► 35 ─────► 50 ───────► NIL
//! level 0:  HEAD ───► 10 ───► 20 ───► 25 ───► 35 ───► 50 ────► NIL
//! ```
//!
//! Mutation is two-phase: [`SkipList::walk`] computes a [`Frontier`] (the
//! last node before the target position at every level), and
//! [`SkipList::insert_at`] / [`SkipList::delete_at`] splice at that
//! position without repeating the search. [`SkipList::insert`] and
//! [`SkipList::delete`] are the fused conveniences.

mod arena;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::error::Result;
use crate::traits::WordMap;

use arena::{NodeArena, MAX_LEVELS};

pub use arena::{NODES_PER_PAGE, PAGE_SIZE};

/// Splice position computed by [`SkipList::walk`].
///
/// Per level, the last node whose key is strictly below the target, or
/// `None` for the head sentinel. Valid only until the next mutation of the
/// list it came from.
#[derive(Debug, Clone)]
pub struct Frontier {
    before: [Option<u32>; MAX_LEVELS],
}

/// Ordered map backed by a caller-budgeted node slab
pub struct SkipList {
    arena: NodeArena,
    /// Head sentinel: carries links only, no key or value.
    head: [Option<u32>; MAX_LEVELS],
    len: usize,
    rng: SmallRng,
}

impl SkipList {
    /// Create an empty list with an entropy-seeded level generator.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Create an empty list with a caller-supplied level generator.
    /// Seeded generators make node heights reproducible in tests.
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            arena: NodeArena::new(),
            head: [None; MAX_LEVELS],
            len: 0,
            rng,
        }
    }

    /// Grow the node budget by one page ([`NODES_PER_PAGE`] records).
    pub fn inject_page(&mut self) -> Result<()> {
        self.arena.inject_page()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unused records remaining in the node budget.
    pub fn free_nodes(&self) -> usize {
        self.arena.free_count()
    }

    /// Successor of `at` (or of the head, for `None`) at `level`.
    fn next_of(&self, at: Option<u32>, level: usize) -> Option<u32> {
        match at {
            None => self.head[level],
            Some(idx) => self.arena.node(idx).next[level],
        }
    }

    /// Descend from the top level, advancing while the next key is
    /// strictly below `key`, and record the stopping node per level.
    pub fn walk(&self, key: u64) -> Frontier {
        let mut before = [None; MAX_LEVELS];
        let mut at: Option<u32> = None;
        for level in (0..MAX_LEVELS).rev() {
            while let Some(next) = self.next_of(at, level) {
                if self.arena.node(next).key >= key {
                    break;
                }
                at = Some(next);
            }
            before[level] = at;
        }
        Frontier { before }
    }

    /// Look up the value for `key`, or `None` if absent.
    pub fn find(&self, key: u64) -> Option<u64> {
        let frontier = self.walk(key);
        let idx = self.next_of(frontier.before[0], 0)?;
        let node = self.arena.node(idx);
        (node.key == key).then_some(node.value)
    }

    /// Insert `key` -> `value`.
    ///
    /// Re-inserting an existing key does not update in place: the new node
    /// splices ahead of the old one, so [`find`](Self::find) returns the
    /// most recent value and [`delete`](Self::delete) removes insertions
    /// newest-first.
    pub fn insert(&mut self, key: u64, value: u64) -> Result<()> {
        let frontier = self.walk(key);
        self.insert_at(&frontier, key, value)
    }

    /// Splice a new node at a previously computed frontier.
    ///
    /// Fails with [`CapacityExceeded`](crate::Error::CapacityExceeded)
    /// when the node budget is exhausted, leaving the list unchanged.
    pub fn insert_at(&mut self, frontier: &Frontier, key: u64, value: u64) -> Result<()> {
        let height = self.choose_height();
        let idx = self.arena.alloc(key, value)?;
        for level in 0..=height {
            let succ = self.next_of(frontier.before[level], level);
            self.arena.node_mut(idx).next[level] = succ;
            match frontier.before[level] {
                None => self.head[level] = Some(idx),
                Some(prev) => self.arena.node_mut(prev).next[level] = Some(idx),
            }
        }
        self.len += 1;
        Ok(())
    }

    /// Remove `key` if present. Returns whether a node was removed.
    pub fn delete(&mut self, key: u64) -> bool {
        let frontier = self.walk(key);
        match self.next_of(frontier.before[0], 0) {
            Some(idx) if self.arena.node(idx).key == key => {
                self.delete_at(&frontier);
                true
            }
            _ => false,
        }
    }

    /// Unsplice the level-0 successor of a previously computed frontier
    /// and return its record to the free list. No-op if the frontier has
    /// no successor.
    ///
    /// The splice loop stops at the first level where the successor is a
    /// different node: the containment invariant guarantees no higher
    /// level references the victim once a lower one does not.
    pub fn delete_at(&mut self, frontier: &Frontier) {
        let Some(victim) = self.next_of(frontier.before[0], 0) else {
            return;
        };
        for level in 0..MAX_LEVELS {
            if self.next_of(frontier.before[level], level) != Some(victim) {
                break;
            }
            let succ = self.arena.node(victim).next[level];
            match frontier.before[level] {
                None => self.head[level] = succ,
                Some(prev) => self.arena.node_mut(prev).next[level] = succ,
            }
        }
        self.arena.release(victim);
        self.len -= 1;
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            at: self.head[0],
        }
    }

    /// Top node level, drawn as the lowest zero bit of a random word.
    /// Forcing bit `MAX_LEVELS - 1` caps the height.
    fn choose_height(&mut self) -> usize {
        let bits = self.rng.next_u32() | 1 << (MAX_LEVELS - 1);
        bits.trailing_zeros() as usize
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl WordMap for SkipList {
    fn put(&mut self, key: u64, value: u64) -> Result<()> {
        self.insert(key, value)
    }

    fn get(&self, key: u64) -> Option<u64> {
        self.find(key)
    }
}

/// Level-0 traversal over a [`SkipList`]
pub struct Iter<'a> {
    list: &'a SkipList,
    at: Option<u32>,
}

impl Iterator for Iter<'_> {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<(u64, u64)> {
        let idx = self.at?;
        let node = self.list.arena.node(idx);
        self.at = node.next[0];
        Some((node.key, node.value))
    }
}
