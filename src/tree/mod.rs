//! Tree storage for the transcoder
//!
//! Two layers:
//! - [`BinaryTree`]: arena of nodes with explicit left/right placement,
//!   no ordering.
//! - [`SearchTree`]: AVL-balanced search tree on top of it, with a
//!   caller-supplied comparator and hide-instead-of-delete removal.
//!
//! Because removal never restructures, a node's root-to-node path only
//! depends on what was inserted and in which order.

mod avl;
mod node;
mod traversal;

pub use avl::{BalanceFactor, BalanceRecord, Comparator, Insertion, Removal, SearchTree};
pub use node::{BinaryTree, Destructor, NodeId, Side};
pub use traversal::{Direction, InOrder};

use thiserror::Error;

/// Errors reported by tree operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Storage for a new node could not be allocated
    #[error("node allocation failed")]
    AllocationFailed,

    /// Insertion at the root of a non-empty tree
    #[error("tree already has a root")]
    RootOccupied,

    /// Insertion into a child slot that is already taken
    #[error("{side} child of node {node} is already occupied")]
    SlotOccupied {
        /// Anchor node of the insertion
        node: NodeId,
        /// Occupied side
        side: Side,
    },

    /// Handle does not refer to a live node of this tree
    #[error("node {0} does not belong to this tree")]
    UnknownNode(NodeId),
}
