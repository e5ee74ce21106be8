//! # Node Arena
//!
//! Slab storage for skip-list nodes. Records live in a flat array and are
//! addressed by stable `u32` indices; the free list is threaded through
//! each free record's level-0 link. The arena only grows when the caller
//! injects a page, so the node budget is exactly what the caller has
//! supplied.

use tracing::debug;

use crate::error::{Error, Result};

/// Maximum node height. Level L is reached with probability 2^-(L+1).
pub(crate) const MAX_LEVELS: usize = 6;

/// Injected pages are carved into this many bytes worth of records.
pub const PAGE_SIZE: usize = 4096;

/// Records per injected page.
pub const NODES_PER_PAGE: usize = PAGE_SIZE / std::mem::size_of::<Node>();

/// One skip-list record. Links above the node's chosen height stay unused.
#[derive(Debug)]
pub(crate) struct Node {
    pub key: u64,
    pub value: u64,
    pub next: [Option<u32>; MAX_LEVELS],
}

/// Fixed-budget slab of [`Node`] records with an index free list.
pub(crate) struct NodeArena {
    records: Vec<Node>,
    free_head: Option<u32>,
    free_count: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            free_head: None,
            free_count: 0,
        }
    }

    /// Extend the arena by one page worth of records, all threaded onto
    /// the free list. Fails without side effects if the reservation fails.
    pub fn inject_page(&mut self) -> Result<()> {
        self.records
            .try_reserve_exact(NODES_PER_PAGE)
            .map_err(|_| Error::AllocationFailed {
                what: "injecting an arena page",
            })?;
        let base = self.records.len() as u32;
        for offset in 0..NODES_PER_PAGE as u32 {
            let mut next = [None; MAX_LEVELS];
            next[0] = self.free_head;
            self.records.push(Node {
                key: 0,
                value: 0,
                next,
            });
            self.free_head = Some(base + offset);
        }
        self.free_count += NODES_PER_PAGE;
        debug!(
            records = NODES_PER_PAGE,
            total = self.records.len(),
            "arena page injected"
        );
        Ok(())
    }

    /// Pop the free-list head and initialize it as a fresh record.
    ///
    /// Returns [`Error::CapacityExceeded`] when the free list is empty;
    /// the caller decides whether to inject another page and retry.
    pub fn alloc(&mut self, key: u64, value: u64) -> Result<u32> {
        let idx = self.free_head.ok_or(Error::CapacityExceeded {
            records: self.records.len(),
        })?;
        let record = &mut self.records[idx as usize];
        self.free_head = record.next[0];
        record.key = key;
        record.value = value;
        record.next = [None; MAX_LEVELS];
        self.free_count -= 1;
        Ok(idx)
    }

    /// Return a record to the free list.
    pub fn release(&mut self, idx: u32) {
        let record = &mut self.records[idx as usize];
        record.next = [None; MAX_LEVELS];
        record.next[0] = self.free_head;
        self.free_head = Some(idx);
        self.free_count += 1;
    }

    pub fn node(&self, idx: u32) -> &Node {
        &self.records[idx as usize]
    }

    pub fn node_mut(&mut self, idx: u32) -> &mut Node {
        &mut self.records[idx as usize]
    }

    /// Records currently on the free list.
    pub fn free_count(&self) -> usize {
        self.free_count
    }

    /// Total records ever injected.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
