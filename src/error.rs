//! Error types for table operations.

use thiserror::Error;

/// Result type alias for fallible table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Failure reported by a single table call.
///
/// Errors are local: the call that returns one leaves every previously
/// stored entry in place, and the table stays usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// The allocator refused a slot array or key buffer.
    #[error("failed to allocate {bytes} bytes for {what}")]
    AllocationFailed { what: &'static str, bytes: usize },

    /// Growing would need more slots than `usize` can count.
    #[error("cannot grow table of capacity {capacity} by factor {factor}")]
    CapacityOverflow { capacity: usize, factor: f64 },

    /// A probe visited every slot without finding the key or a free slot.
    #[error("no free slot in table of capacity {capacity}")]
    TableFull { capacity: usize },

    /// The configuration was rejected before any storage was allocated.
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}
