//! Core repository components
//!
//! - `database`: Sharded record stores for edit scripts and commits
//! - `index`: Staging area backed by the working hash tree
//! - `refs`: Branch pointers, HEAD and the active branch
//! - `repository`: Coordination of all the areas
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
