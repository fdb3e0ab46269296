//! savit: a miniature content-addressed version control engine
//!
//! A working directory is fingerprinted by a hash directory tree, every file
//! version is stored as a line-level edit script keyed by its content hash,
//! and commits chain immutable snapshots together per branch.
//!
//! The entry point is [`areas::repository::Repository`], whose operations
//! live in [`commands`].

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;
