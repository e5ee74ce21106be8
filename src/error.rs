//! # Error Handling
//!
//! Error types shared by the index structures.
//!
//! ## Design Principles
//!
//! 1. **Recoverable by default**: allocation failures leave the structure
//!    untouched so the caller can retry or degrade
//! 2. **Absence is not an error**: a missing key or an empty heap is an
//!    ordinary `Option`/`bool` result, never an `Error`
//! 3. **Capacity is a contract**: the skip list's node budget is caller
//!    supplied; exceeding it is a typed error, and policy (inject a page,
//!    propagate, abort) belongs to the embedding system

use thiserror::Error;

/// Result type alias for keydex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for keydex
#[derive(Error, Debug)]
pub enum Error {
    #[error("allocation failed while {what}")]
    AllocationFailed { what: &'static str },

    #[error("node arena exhausted: all {records} records in use")]
    CapacityExceeded { records: usize },

    #[error("invalid table capacity: 2^{bits} slots, minimum is 2^{min}")]
    InvalidCapacity { bits: u32, min: u32 },
}

impl Error {
    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::AllocationFailed { .. } => true,
            Error::CapacityExceeded { .. } => true,
            Error::InvalidCapacity { .. } => false,
        }
    }

    /// Get error code for monitoring
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::AllocationFailed { .. } => "ALLOCATION_FAILED",
            Error::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Error::InvalidCapacity { .. } => "INVALID_CAPACITY",
        }
    }
}
