//! Branch pointers and HEAD
//!
//! ## File Format
//!
//! Every pointer file holds either a 40-character commit id or the literal
//! `null` for a branch without commits:
//!
//! - `HEAD.txt`: head commit of the active branch
//! - `BRANCH.txt`: name of the active branch
//! - `refs/heads/<name>.txt`: head commit of one branch

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::errors::{IoContext, Result, SavitError};
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

pub const NULL_POINTER: &str = "null";

/// Ref manager rooted at the control directory
///
/// Writes take an exclusive advisory lock on the target file.
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    pub fn read_head(&self) -> Result<Option<ContentHash>> {
        Self::read_pointer(&self.head_path())
    }

    pub fn update_head(&self, id: Option<&ContentHash>) -> Result<()> {
        self.update_ref_file(&self.head_path(), Self::pointer(id))
    }

    /// Active branch, falling back to `default` when none was recorded
    pub fn current_branch(&self, default: &BranchName) -> Result<BranchName> {
        let path = self.branch_path();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(default.clone());
            }
            Err(err) => return Err(SavitError::io(path, err)),
        };

        match content.trim() {
            "" => Ok(default.clone()),
            name => BranchName::try_parse(name.to_string()),
        }
    }

    pub fn set_current_branch(&self, name: &BranchName) -> Result<()> {
        self.update_ref_file(&self.branch_path(), name.as_ref())
    }

    pub fn read_ref(&self, name: &BranchName) -> Result<Option<ContentHash>> {
        let ref_path = self.heads_path().join(name.ref_file());

        if !ref_path.is_file() {
            return Err(SavitError::NotFound(format!("branch {}", name)));
        }

        Self::read_pointer(&ref_path)
    }

    pub fn update_ref(&self, name: &BranchName, id: Option<&ContentHash>) -> Result<()> {
        self.update_ref_file(&self.heads_path().join(name.ref_file()), Self::pointer(id))
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.heads_path().join(name.ref_file()).is_file()
    }

    /// Create a branch pointing at `head`
    ///
    /// Returns `false` and leaves the existing ref untouched if the branch is
    /// already there.
    pub fn create_branch(&self, name: &BranchName, head: Option<&ContentHash>) -> Result<bool> {
        if self.branch_exists(name) {
            tracing::info!(branch = %name, "branch already exists");
            return Ok(false);
        }

        self.update_ref(name, head)?;
        tracing::info!(branch = %name, head = Self::pointer(head), "created branch");

        Ok(true)
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD.txt").into_boxed_path()
    }

    pub fn branch_path(&self) -> Box<Path> {
        self.path.join("BRANCH.txt").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.path.join("refs").join("heads").into_boxed_path()
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).at_path(parent)?;
        }

        // open the ref file as WRONLY and CREAT to write the pointer to it
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .at_path(path)?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1).at_path(path)?;
        lock.deref_mut()
            .write_all(raw_ref.as_bytes())
            .at_path(path)?;

        Ok(())
    }

    fn read_pointer(path: &Path) -> Result<Option<ContentHash>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SavitError::io(path, err)),
        };

        match content.trim() {
            "" | NULL_POINTER => Ok(None),
            id => ContentHash::try_parse(id.to_string())
                .map(Some)
                .map_err(|err| SavitError::corrupt(path.display().to_string(), err)),
        }
    }

    fn pointer(id: Option<&ContentHash>) -> &str {
        id.map(|id| id.as_ref()).unwrap_or(NULL_POINTER)
    }
}
