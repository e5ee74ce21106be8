//! # Robin Hood Hash Table
//!
//! Open-addressed hash table with Robin Hood displacement and
//! backward-shift deletion. Every occupied slot records its probe
//! sequence length (PSL): the distance from the key's ideal slot.
//! Scanning forward from any ideal slot, PSLs never decrease until an
//! empty slot is reached, which bounds probe chains and keeps lookups
//! cheap even near the load limit.
//!
//! Deletion shifts the tail of the probe chain back one slot instead of
//! leaving a tombstone, so chains stay contiguous and never accumulate
//! dead slots.
//!
//! Capacity is a power of two, tracked as its base-2 logarithm. The table
//! grows past 80% load and shrinks under 40%, down to a floor of
//! 2^[`MIN_BITS`] slots, always by rehashing into a freshly sized slot
//! array.

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::WordMap;

/// Smallest permitted capacity, as a base-2 logarithm (16 slots).
pub const MIN_BITS: u32 = 4;

/// Load threshold, in percent. Grow above it; shrink under it relative to
/// the next size down.
const LOAD_FACTOR_PCT: usize = 80;

/// Width of the multiplicative hash, chosen at construction.
///
/// Each width carries its own odd constant; the ideal slot is the high
/// `bits` bits of `key * constant` in that width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWidth {
    /// 32-bit product; keys are truncated to their low 32 bits.
    U32,
    /// 64-bit product over the full key.
    U64,
}

impl KeyWidth {
    /// Widest usable table for this hash, as a base-2 logarithm. Growth
    /// stops here: past it the product has no high bits left to take.
    fn max_bits(self) -> u32 {
        match self {
            KeyWidth::U32 => 32,
            KeyWidth::U64 => 64,
        }
    }

    fn ideal_slot(self, key: u64, bits: u32) -> usize {
        match self {
            KeyWidth::U32 => {
                let shift = 32u32.saturating_sub(bits);
                ((key as u32).wrapping_mul(123_456_789) >> shift) as usize
            }
            KeyWidth::U64 => {
                let shift = 64u32.saturating_sub(bits);
                (key.wrapping_mul(1_234_567_891_234_567_891) >> shift) as usize
            }
        }
    }
}

/// PSL -1 marks an empty slot; occupied slots always hold a value.
struct Slot<V> {
    key: u64,
    psl: i32,
    value: Option<V>,
}

impl<V> Slot<V> {
    fn empty() -> Self {
        Self {
            key: 0,
            psl: -1,
            value: None,
        }
    }
}

/// Open-addressed Robin Hood map from full-width integer keys to `V`
pub struct RobinHoodTable<V> {
    slots: Vec<Slot<V>>,
    load: usize,
    bits: u32,
    width: KeyWidth,
}

impl<V> RobinHoodTable<V> {
    /// Create an empty table with 2^`bits` slots and a 64-bit hash.
    pub fn new(bits: u32) -> Result<Self> {
        Self::with_width(bits, KeyWidth::U64)
    }

    /// Create an empty table with an explicit hash width.
    ///
    /// Returns [`Error::InvalidCapacity`] if `bits` is under [`MIN_BITS`];
    /// slot allocation failure is reported without side effects.
    pub fn with_width(bits: u32, width: KeyWidth) -> Result<Self> {
        if bits < MIN_BITS {
            return Err(Error::InvalidCapacity {
                bits,
                min: MIN_BITS,
            });
        }
        let capacity = 1usize << bits;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailed {
                what: "allocating table slots",
            })?;
        slots.resize_with(capacity, Slot::empty);
        Ok(Self {
            slots,
            load: 0,
            bits,
            width,
        })
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.load
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.load == 0
    }

    /// Current slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Base-2 logarithm of the slot count.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Occupied fraction of the slot array.
    pub fn load_factor(&self) -> f64 {
        self.load as f64 / self.slots.len() as f64
    }

    /// Probe for `key` from its ideal slot.
    ///
    /// Returns `(slot, psl, found)`. When not found, `slot` is the
    /// insertion point: the first slot whose resident PSL is below the PSL
    /// the key has accrued, which an incoming entry is entitled to steal.
    fn search(&self, key: u64) -> (usize, i32, bool) {
        let mask = self.slots.len() - 1;
        let mut idx = self.width.ideal_slot(key, self.bits);
        let mut psl = 0i32;
        loop {
            let slot = &self.slots[idx];
            if slot.psl >= 0 && slot.key == key {
                return (idx, slot.psl, true);
            }
            if slot.psl < psl {
                return (idx, psl, false);
            }
            idx = (idx + 1) & mask;
            psl += 1;
        }
    }

    /// Look up the value for `key`, or `None` if absent.
    pub fn get(&self, key: u64) -> Option<&V> {
        let (idx, _, found) = self.search(key);
        if found {
            self.slots[idx].value.as_ref()
        } else {
            None
        }
    }

    /// Store or delete a value for `key`.
    ///
    /// `Some(value)` inserts or replaces; `None` deletes (a no-op for an
    /// absent key). Either direction may rehash the table; a failed
    /// reservation is reported with the slot array unchanged. A failed
    /// shrink reservation still leaves the key deleted.
    pub fn set(&mut self, key: u64, value: Option<V>) -> Result<()> {
        match value {
            Some(value) => {
                if self.load * 100 > self.slots.len() * LOAD_FACTOR_PCT
                    && self.bits < self.width.max_bits()
                {
                    self.resize(self.bits + 1)?;
                }
                self.insert(key, value);
                Ok(())
            }
            None => {
                if self.delete(key)
                    && self.bits > MIN_BITS
                    && self.load * 100 < (self.slots.len() / 2) * LOAD_FACTOR_PCT
                {
                    self.resize(self.bits - 1)?;
                }
                Ok(())
            }
        }
    }

    /// Robin Hood insert: probe to the insertion point, and when it is
    /// occupied by a smaller-PSL resident, swap the incoming entry in and
    /// keep probing with the evicted one until an empty slot absorbs the
    /// chain. Load counts only the final placement into an empty slot.
    fn insert(&mut self, key: u64, value: V) {
        let mut entry = (key, Some(value));
        loop {
            let (idx, psl, found) = self.search(entry.0);
            let incoming = Slot {
                key: entry.0,
                psl,
                value: entry.1.take(),
            };
            let evicted = std::mem::replace(&mut self.slots[idx], incoming);
            if found {
                break;
            }
            if evicted.psl < 0 {
                self.load += 1;
                break;
            }
            entry = (evicted.key, evicted.value);
        }
    }

    /// Backward-shift delete: pull each following slot one position
    /// earlier (PSL minus one) until a slot that is empty or already ideal
    /// ends the chain. No tombstones.
    fn delete(&mut self, key: u64) -> bool {
        let (idx, _, found) = self.search(key);
        if !found {
            return false;
        }
        let mask = self.slots.len() - 1;
        let mut at = idx;
        loop {
            let next = (at + 1) & mask;
            if self.slots[next].psl <= 0 {
                break;
            }
            self.slots.swap(at, next);
            self.slots[at].psl -= 1;
            at = next;
        }
        self.slots[at] = Slot::empty();
        self.load -= 1;
        true
    }

    /// Rehash every entry into a fresh table of 2^`bits` slots.
    fn resize(&mut self, bits: u32) -> Result<()> {
        let mut fresh = Self::with_width(bits, self.width)?;
        for slot in self.slots.drain(..) {
            if let Some(value) = slot.value {
                fresh.insert(slot.key, value);
            }
        }
        debug!(bits, load = fresh.load, "table rehashed");
        *self = fresh;
        Ok(())
    }
}

impl WordMap for RobinHoodTable<u64> {
    fn put(&mut self, key: u64, value: u64) -> Result<()> {
        self.set(key, Some(value))
    }

    fn get(&self, key: u64) -> Option<u64> {
        RobinHoodTable::get(self, key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_floor() {
        let err = match RobinHoodTable::<u64>::new(3) {
            Err(err) => err,
            Ok(_) => panic!("bits below the floor must be rejected"),
        };
        assert_eq!(err.error_code(), "INVALID_CAPACITY");
        assert!(!err.is_recoverable());
        assert!(RobinHoodTable::<u64>::new(4).is_ok());
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut table = RobinHoodTable::new(4).unwrap();
        table.set(42, Some(0u64)).unwrap();
        assert_eq!(table.get(42), Some(&0));
        assert_eq!(table.get(43), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_replace_keeps_load() {
        let mut table = RobinHoodTable::new(4).unwrap();
        table.set(7, Some("a")).unwrap();
        table.set(7, Some("b")).unwrap();
        assert_eq!(table.get(7), Some(&"b"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut table: RobinHoodTable<u64> = RobinHoodTable::new(4).unwrap();
        table.set(1, Some(1)).unwrap();
        table.set(2, None).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1), Some(&1));
    }

    #[test]
    fn test_key_zero() {
        let mut table = RobinHoodTable::new(4).unwrap();
        assert_eq!(table.get(0), None);
        table.set(0, Some(5u64)).unwrap();
        assert_eq!(table.get(0), Some(&5));
        table.set(0, None).unwrap();
        assert_eq!(table.get(0), None);
    }

    #[test]
    fn test_grow_trigger() {
        let mut table = RobinHoodTable::new(4).unwrap();
        // 16 slots; load 13 makes 13 * 100 > 16 * 80 true, so the grow
        // happens before the 14th insert, not the 13th.
        for key in 0..13u64 {
            table.set(key, Some(key)).unwrap();
            assert_eq!(table.bits(), 4);
        }
        table.set(13, Some(13)).unwrap();
        assert_eq!(table.bits(), 5);
        for key in 0..14u64 {
            assert_eq!(table.get(key), Some(&key));
        }
    }

    #[test]
    fn test_shrink_trigger_and_floor() {
        let mut table = RobinHoodTable::new(4).unwrap();
        for key in 0..20u64 {
            table.set(key, Some(key)).unwrap();
        }
        assert_eq!(table.bits(), 5);
        // 32 slots shrink when load falls under 80% of 16 = 12.8.
        for key in (13..20u64).rev() {
            table.set(key, None).unwrap();
        }
        assert_eq!(table.bits(), 5);
        table.set(12, None).unwrap();
        assert_eq!(table.bits(), 4);
        // Never below the floor.
        for key in 0..12u64 {
            table.set(key, None).unwrap();
        }
        assert_eq!(table.bits(), 4);
        assert!(table.is_empty());
    }

    #[test]
    fn test_ideal_slot_at_full_hash_width() {
        // The shift stays in range once bits reaches the hash width.
        for key in [0u64, 1, 0xDEAD_BEEF, u64::MAX] {
            assert!((KeyWidth::U32.ideal_slot(key, 32) as u64) < 1u64 << 32);
            assert!((KeyWidth::U32.ideal_slot(key, 40) as u64) < 1u64 << 32);
            let _ = KeyWidth::U64.ideal_slot(key, 64);
        }
    }

    #[test]
    fn test_width_u32_distributes() {
        let mut table = RobinHoodTable::with_width(4, KeyWidth::U32).unwrap();
        for key in 0..10u64 {
            table.set(key, Some(key + 1)).unwrap();
        }
        for key in 0..10u64 {
            assert_eq!(table.get(key), Some(&(key + 1)));
        }
    }
}
