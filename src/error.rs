//! Error types surfaced by the tree.

use alloc::collections::TryReserveError;
use alloc::string::String;

use thiserror::Error;

/// Result type for fallible tree operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by [`RbTree`](crate::RbTree).
///
/// Failed insertions leave the tree exactly as it was before the call.
#[derive(Debug, Error)]
pub enum Error {
    /// The node pool could not obtain memory for one more node.
    #[error("node allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// Every node handle is in use.
    #[error("tree is at maximum capacity ({max} nodes)")]
    CapacityExceeded {
        /// Largest number of nodes a tree can hold.
        max: usize,
    },

    /// A structural invariant does not hold. Only produced by
    /// [`RbTree::validate`](crate::RbTree::validate).
    #[error("corrupted tree: {0}")]
    Corrupted(String),
}
