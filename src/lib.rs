//! # Morse transcoding over an AVL tree with lazy deletion
//!
//! This library converts text to International Morse code and back using a
//! single data structure: a self-balancing binary search tree whose shape
//! *is* the Morse code book.
//!
//! ## Layers
//!
//! 1. **Binary tree** ([`tree::BinaryTree`]): arena-backed nodes with
//!    insert/remove at either side of a node, merge and an optional
//!    payload destructor
//! 2. **AVL tree** ([`tree::SearchTree`]): ordered insertion with
//!    single/double rotations and *lazy* deletion (removal hides a node
//!    instead of unlinking it, so the shape never changes)
//! 3. **Codec** ([`codec::Codec`]): builds the 44-symbol Morse tree and
//!    encodes by root-to-node path (left = dot, right = dash), decodes by
//!    walking that path back down
//!
//! ## Usage Example
//!
//! ```
//! use morse_tree::{Codec, CodecOptions};
//!
//! let codec = Codec::new()?;
//! let options = CodecOptions::separated();
//!
//! let morse = codec.encode("SOS", options)?;
//! assert_eq!(morse, "...  ---  ...");
//! assert_eq!(codec.decode(&morse, options), "SOS");
//! # Ok::<(), morse_tree::CodecError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod codec; // Text <-> Morse transcoding
pub mod tree; // Binary and AVL trees

// Re-exports for convenience
pub use codec::{Codec, CodecConfig, CodecError, CodecOptions, MorseCode, MorseSymbol};
pub use tree::{
    BalanceFactor, BinaryTree, Direction, Insertion, NodeId, Removal, SearchTree, TreeError,
};
