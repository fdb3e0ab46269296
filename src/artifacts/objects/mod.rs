//! Persisted record types
//!
//! Everything savit persists is addressed by a SHA-1 content hash:
//!
//! - **Delta**: an edit script, keyed by the hash of the content it produces
//! - **Commit**: a snapshot with message and parent, keyed by the snapshot root hash
//!
//! Records are JSON documents written through the `Packable`/`Unpackable` traits.

pub mod commit;
pub mod content_hash;
pub mod delta;
pub mod object;

/// Length of a SHA-1 hash in hexadecimal format
pub const CONTENT_HASH_LENGTH: usize = 40;
