//! Staging area
//!
//! The stage is the working [`HashTree`]: the head commit's snapshot with every
//! staged path applied on top of it. Only the staged path list is persisted,
//! one relative path per line in `.savit/index.txt`.
//!
//! ## Rehydration
//!
//! On first use the tree is rebuilt from the head snapshot and each listed path
//! is replayed: paths present on disk are (re)hashed, tracked paths missing
//! from disk are untracked, anything else is dropped with a warning.

use crate::artifacts::tree::hash_tree::{HashTree, LeafError};
use crate::artifacts::tree::snapshot::{Leaf, Snapshot};
use crate::errors::{IoContext, Result, SavitError};
use file_guard::Lock;
use std::collections::BTreeSet;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Outcome of one staging call
///
/// `skipped` holds the files that could not be hashed; they were left as they
/// were in the stage.
#[derive(Debug, Default)]
pub struct StageReport {
    pub staged: Vec<PathBuf>,
    pub skipped: Vec<LeafError>,
}

#[derive(Debug)]
pub struct Index {
    path: Box<Path>,
    staged: BTreeSet<PathBuf>,
    tree: HashTree,
    loaded: bool,
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>, root: Box<Path>) -> Self {
        Index {
            path,
            staged: BTreeSet::new(),
            tree: HashTree::new(root),
            loaded: false,
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tree(&self) -> &HashTree {
        &self.tree
    }

    pub fn staged(&self) -> impl Iterator<Item = &PathBuf> {
        self.staged.iter()
    }

    /// Rehydrate once per repository instance
    pub fn load(&mut self, base: &Snapshot) -> Result<()> {
        if self.loaded {
            return Ok(());
        }

        self.rehydrate(base)
    }

    /// Rebuild the stage from `base` and the persisted staged path list
    pub fn rehydrate(&mut self, base: &Snapshot) -> Result<()> {
        self.tree = HashTree::from_snapshot(self.tree.root().into(), base);
        self.staged.clear();

        for path in self.read_staged_paths()? {
            match self.apply(&path) {
                Ok(()) => {
                    self.staged.insert(path);
                }
                Err(err) if err.is_not_found() => {
                    tracing::warn!(path = %path.display(), "dropping vanished staged path");
                }
                Err(err) => return Err(err),
            }
        }

        self.loaded = true;
        self.changed = false;

        Ok(())
    }

    /// Stage `path`, returning it relative to the workspace root
    ///
    /// A path that no longer exists on disk but is tracked gets untracked.
    pub fn add(&mut self, path: &Path) -> Result<PathBuf> {
        let relative = self.tree.relative(path)?;

        self.apply(&relative)?;
        self.staged.insert(relative.clone());
        self.changed = true;

        Ok(relative)
    }

    /// Stage files that were already hashed, rebuilding the tree once
    pub fn add_leaves(&mut self, leaves: Vec<Leaf>) -> Vec<PathBuf> {
        let paths = leaves
            .iter()
            .map(|leaf| leaf.path.clone())
            .collect::<Vec<_>>();

        self.tree.insert_leaves(leaves);
        self.staged.extend(paths.iter().cloned());
        self.changed = true;

        paths
    }

    /// Forget every staged path and reset the tree to `base`
    pub fn clear(&mut self, base: &Snapshot) {
        self.tree = HashTree::from_snapshot(self.tree.root().into(), base);
        self.staged.clear();
        self.loaded = true;
        self.changed = true;
    }

    pub fn write_updates(&mut self) -> Result<()> {
        if !self.changed {
            return Ok(());
        }

        let content = self
            .staged
            .iter()
            .map(|path| {
                path.to_str()
                    .map(|path| format!("{}\n", path))
                    .ok_or_else(|| SavitError::InvalidPath(path.clone()))
            })
            .collect::<Result<String>>()?;

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())
            .at_path(self.path())?;
        let mut lock =
            file_guard::lock(&mut index_file, Lock::Exclusive, 0, 1).at_path(self.path())?;
        lock.deref_mut()
            .write_all(content.as_bytes())
            .at_path(self.path())?;

        self.changed = false;

        Ok(())
    }

    fn apply(&mut self, relative: &Path) -> Result<()> {
        if self.tree.root().join(relative).exists() {
            self.tree.add_node(relative)
        } else if self.tree.is_tracked(relative) {
            self.tree.remove_node(relative)
        } else {
            Err(SavitError::NotFound(format!(
                "pathspec '{}' did not match any files",
                relative.display()
            )))
        }
    }

    fn read_staged_paths(&self) -> Result<Vec<PathBuf>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(SavitError::io(self.path.to_path_buf(), err)),
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        dir.child(".savit").create_dir_all().unwrap();
        dir.child("a.txt").write_str("alpha").unwrap();
        dir.child("sub/b.txt").write_str("beta").unwrap();
        dir
    }

    fn index(dir: &TempDir) -> Index {
        let root = dir.path().canonicalize().unwrap();
        Index::new(
            root.join(".savit").join("index.txt").into_boxed_path(),
            root.into_boxed_path(),
        )
    }

    #[rstest]
    fn staged_paths_survive_a_reload(workspace: TempDir) {
        let mut first = index(&workspace);
        first.load(&Snapshot::default()).unwrap();
        first.add(Path::new("a.txt")).unwrap();
        first.add(Path::new("sub/b.txt")).unwrap();
        first.write_updates().unwrap();

        let mut second = index(&workspace);
        second.load(&Snapshot::default()).unwrap();

        assert_eq!(
            second.staged().cloned().collect::<Vec<_>>(),
            vec![PathBuf::from("a.txt"), PathBuf::from("sub/b.txt")]
        );
        assert_eq!(second.tree().root_hash(), first.tree().root_hash());
    }

    #[rstest]
    fn staging_a_deleted_tracked_file_untracks_it(workspace: TempDir) {
        let mut index = index(&workspace);
        index.load(&Snapshot::default()).unwrap();
        index.add(Path::new("a.txt")).unwrap();
        let base = index.tree().snapshot().clone();

        std::fs::remove_file(workspace.path().join("a.txt")).unwrap();
        index.clear(&base);
        index.add(Path::new("a.txt")).unwrap();

        assert!(!index.tree().is_tracked(Path::new("a.txt")));
    }

    #[rstest]
    fn staging_an_unknown_path_is_not_found(workspace: TempDir) {
        let mut index = index(&workspace);
        index.load(&Snapshot::default()).unwrap();

        let err = index.add(Path::new("ghost.txt")).unwrap_err();

        assert!(err.is_not_found());
    }

    #[cfg(unix)]
    #[rstest]
    fn non_utf8_paths_are_refused_before_touching_the_stage(workspace: TempDir) {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut index = index(&workspace);
        index.load(&Snapshot::default()).unwrap();
        index.add(Path::new("a.txt")).unwrap();
        index.write_updates().unwrap();

        let err = index
            .add(Path::new(OsStr::from_bytes(b"odd\xfe.txt")))
            .unwrap_err();

        assert!(matches!(err, SavitError::InvalidPath(_)));
        assert_eq!(
            index.staged().cloned().collect::<Vec<_>>(),
            vec![PathBuf::from("a.txt")]
        );
        index.write_updates().unwrap();
        assert_eq!(
            std::fs::read_to_string(index.path()).unwrap(),
            "a.txt\n"
        );
    }

    #[rstest]
    fn vanished_staged_paths_are_dropped_on_rehydrate(workspace: TempDir) {
        workspace
            .child(".savit/index.txt")
            .write_str("a.txt\nghost.txt\n")
            .unwrap();
        let mut index = index(&workspace);

        index.load(&Snapshot::default()).unwrap();

        assert_eq!(
            index.staged().cloned().collect::<Vec<_>>(),
            vec![PathBuf::from("a.txt")]
        );
    }
}
