//! Porcelain commands
//!
//! ## Commands
//!
//! - `init`: Create the control directory
//! - `add`: Stage files or directories
//! - `commit`: Record the stage as a new commit
//! - `checkout`: Switch or create branches
//! - `log`: List the commits of the current branch
//! - `status`: List the staged paths that differ from the head commit

pub mod add;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod status;
