//! Version control data structures and algorithms
//!
//! - `branch`: Branch names and head pointers
//! - `checkout`: Replay of stored edit scripts into file contents
//! - `diff`: Line-level diff and patch
//! - `log`: Commit history traversal
//! - `objects`: Content hashes and the persisted records
//! - `tree`: Hash directory tree and its snapshots

pub mod branch;
pub mod checkout;
pub mod diff;
pub mod log;
pub mod objects;
pub mod tree;
