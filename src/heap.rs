//! # Min-Max Heap
//!
//! Double-ended binary heap over a growable array. The array, read as an
//! implicit binary tree, alternates min and max layers by depth: a node on
//! a min layer is <= every descendant, a node on a max layer is >= every
//! descendant. Both the minimum (index 0) and the maximum (index 1 or 2)
//! are therefore available in O(1), and either end can be popped in
//! O(log n).
//!
//! ## Architecture
//!
//! ```text
//! layer 0 (min):                 [ 8]
//! layer 1 (max):         [71]           [51]
//! layer 2 (min):     [31]   [10]    [13]    [16]
//! layer 3 (max):   [46][31][11][41][21]
//! ```
//!
//! Growth is explicit and fallible: storage doubles starting at 16 slots,
//! and a failed reservation leaves the heap unmodified.

use tracing::debug;

use crate::error::{Error, Result};

/// First allocation, in elements. Doubles from here on.
const INITIAL_CAPACITY: usize = 16;

/// Double-ended (min-max) binary heap
pub struct MinMaxHeap<T> {
    items: Vec<T>,
}

#[inline]
fn parent(idx: usize) -> usize {
    (idx - 1) / 2
}

#[inline]
fn grandparent(idx: usize) -> usize {
    parent(parent(idx))
}

/// True if `idx` sits on a max layer (odd depth).
#[inline]
fn on_max_layer(idx: usize) -> bool {
    (idx + 1).ilog2() & 1 == 1
}

impl<T: Ord> MinMaxHeap<T> {
    /// Create an empty heap. Does not allocate.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of elements held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current allocated capacity, in elements.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// The minimum element, without removing it.
    pub fn peek_min(&self) -> Option<&T> {
        self.items.first()
    }

    /// The maximum element, without removing it.
    pub fn peek_max(&self) -> Option<&T> {
        match self.items.len() {
            0 => None,
            1 | 2 => self.items.last(),
            // Both layer-1 roots exist; the maximum is the larger one.
            _ => Some(std::cmp::max(&self.items[1], &self.items[2])),
        }
    }

    /// Insert `value`, growing storage if needed.
    ///
    /// Returns [`Error::AllocationFailed`] and leaves the heap unmodified
    /// if the reservation fails.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.items.len() == self.items.capacity() {
            let additional = self.items.capacity().max(INITIAL_CAPACITY);
            self.items
                .try_reserve_exact(additional)
                .map_err(|_| Error::AllocationFailed {
                    what: "growing heap storage",
                })?;
            debug!(capacity = self.items.capacity(), "heap storage grown");
        }
        self.items.push(value);
        self.bubble_up(self.items.len() - 1);
        Ok(())
    }

    /// Remove and return the minimum element, or `None` if empty.
    pub fn pop_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let value = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.trickle_down_min(0);
        }
        Some(value)
    }

    /// Remove and return the maximum element, or `None` if empty.
    pub fn pop_max(&mut self) -> Option<T> {
        let idx = match self.items.len() {
            0 => return None,
            1 => 0,
            2 => 1,
            // Two max roots; the maximum is the larger of the two.
            _ => {
                if self.items[1] >= self.items[2] {
                    1
                } else {
                    2
                }
            }
        };
        let value = self.items.swap_remove(idx);
        if idx < self.items.len() {
            self.trickle_down_max(idx);
        }
        Some(value)
    }

    /// Make an independent copy sharing no storage with `self`.
    ///
    /// Allocates exactly `len` elements; a failed reservation leaves both
    /// heaps intact.
    pub fn duplicate(&self) -> Result<Self>
    where
        T: Clone,
    {
        let mut items = Vec::new();
        items
            .try_reserve_exact(self.items.len())
            .map_err(|_| Error::AllocationFailed {
                what: "duplicating heap storage",
            })?;
        items.extend_from_slice(&self.items);
        Ok(Self { items })
    }

    /// Repair upward after appending at `idx`.
    ///
    /// One parent swap corrects a layer-parity violation; after that,
    /// ordering only needs to hold against same-parity ancestors, which
    /// sit two levels up, so the climb compares grandparents.
    fn bubble_up(&mut self, idx: usize) {
        if idx == 0 {
            return;
        }
        let parent = parent(idx);
        if on_max_layer(idx) {
            if self.items[idx] < self.items[parent] {
                self.items.swap(idx, parent);
                self.bubble_up_min(parent);
            } else {
                self.bubble_up_max(idx);
            }
        } else if self.items[idx] > self.items[parent] {
            self.items.swap(idx, parent);
            self.bubble_up_max(parent);
        } else {
            self.bubble_up_min(idx);
        }
    }

    fn bubble_up_min(&mut self, mut idx: usize) {
        // Indices 0..=2 have no grandparent.
        while idx > 2 {
            let grand = grandparent(idx);
            if self.items[idx] >= self.items[grand] {
                break;
            }
            self.items.swap(idx, grand);
            idx = grand;
        }
    }

    fn bubble_up_max(&mut self, mut idx: usize) {
        while idx > 2 {
            let grand = grandparent(idx);
            if self.items[idx] <= self.items[grand] {
                break;
            }
            self.items.swap(idx, grand);
            idx = grand;
        }
    }

    /// Smallest element among `idx` and its direct children.
    fn min_through(&self, idx: usize) -> usize {
        let left = 2 * idx + 1;
        let right = left + 1;
        if right < self.items.len() {
            if self.items[left] <= self.items[right] {
                left
            } else {
                right
            }
        } else if left < self.items.len() {
            left
        } else {
            idx
        }
    }

    /// Largest element among `idx` and its direct children.
    fn max_through(&self, idx: usize) -> usize {
        let left = 2 * idx + 1;
        let right = left + 1;
        if right < self.items.len() {
            if self.items[left] >= self.items[right] {
                left
            } else {
                right
            }
        } else if left < self.items.len() {
            left
        } else {
            idx
        }
    }

    /// Repair downward from a min-layer position.
    ///
    /// The candidate successor is the minimum over the children and
    /// grandchildren of `idx` (the nearest same-parity descendants).
    fn trickle_down_min(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let min = if right < self.items.len() {
                let lmin = self.min_through(left);
                let rmin = self.min_through(right);
                if self.items[lmin] <= self.items[rmin] {
                    lmin
                } else {
                    rmin
                }
            } else if left < self.items.len() {
                self.min_through(left)
            } else {
                break;
            };
            if self.items[idx] <= self.items[min] {
                break;
            }
            self.items.swap(idx, min);
            if min > right {
                // Sank two levels at once; the max-layer node in between
                // must still dominate the moved value.
                let up = parent(min);
                if self.items[min] > self.items[up] {
                    self.items.swap(min, up);
                }
            }
            idx = min;
        }
    }

    /// Repair downward from a max-layer position.
    fn trickle_down_max(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let max = if right < self.items.len() {
                let lmax = self.max_through(left);
                let rmax = self.max_through(right);
                if self.items[lmax] >= self.items[rmax] {
                    lmax
                } else {
                    rmax
                }
            } else if left < self.items.len() {
                self.max_through(left)
            } else {
                break;
            };
            if self.items[idx] >= self.items[max] {
                break;
            }
            self.items.swap(idx, max);
            if max > right {
                // Sank two levels at once; the min-layer node in between
                // must still stay below the moved value.
                let up = parent(max);
                if self.items[max] < self.items[up] {
                    self.items.swap(max, up);
                }
            }
            idx = max;
        }
    }
}

impl<T: Ord> Default for MinMaxHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
