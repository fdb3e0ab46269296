//! Plumbing commands
//!
//! - `validate`: Compare a tracked path's hash with its content on disk
//! - `cat_object`: Read a stored edit script by content hash

pub mod cat_object;
pub mod validate;
