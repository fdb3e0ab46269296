//! Commit history traversal
//!
//! History is linear: every commit has at most one parent, so the log is a
//! walk along parent links starting at the current head.

pub mod rev_list;
