//! Command implementations
//!
//! Commands are `impl Repository` blocks, organized into two categories:
//!
//! - `plumbing`: Low-level access to stored records and tracked hashes
//! - `porcelain`: The version control workflow (init, stage, commit, checkout, log)

pub mod plumbing;
pub mod porcelain;
