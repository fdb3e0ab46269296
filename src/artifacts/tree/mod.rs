//! Hash directory tree
//!
//! - `snapshot`: immutable fingerprint (leaves, nodes, root hash) and comparison
//! - `hash_tree`: mutable tree over a working directory, rebuilt on every change

pub mod hash_tree;
pub mod snapshot;
