//! # Map Contracts
//!
//! Common interface for the word-sized key/value maps.

use crate::error::Result;

/// Word-sized key to word-sized value map.
///
/// Implemented by the skip list and (for word values) the Robin Hood
/// table. The balanced binary search tree that accompanies these
/// structures in the wider system also satisfies this contract; it is an
/// external collaborator and no implementation of it lives in this crate.
/// Teardown is `Drop` in all cases.
pub trait WordMap {
    /// Associate `value` with `key`. May fail on storage acquisition.
    fn put(&mut self, key: u64, value: u64) -> Result<()>;

    /// Look up the value for `key`, or `None` if absent.
    fn get(&self, key: u64) -> Option<u64>;
}
