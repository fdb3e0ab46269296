//! Reconstruction of historical file contents
//!
//! Every stored edit script names the content it applies to, so the content
//! behind a hash is rebuilt by walking back to an empty base and replaying the
//! scripts forward.

pub mod reconstruction;
