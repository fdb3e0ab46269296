use crate::areas::workspace::CONTROL_DIR;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::tree::snapshot::{Leaf, Snapshot};
use crate::errors::{IoContext, Result, SavitError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A file that could not be hashed while scanning
#[derive(Debug)]
pub struct LeafError {
    pub path: PathBuf,
    pub error: SavitError,
}

/// Result of scanning a directory: the partial tree plus every per-leaf failure
#[derive(Debug)]
pub struct ScanReport {
    pub tree: HashTree,
    pub errors: Vec<LeafError>,
}

/// Mutable Merkle-style fingerprint of a working directory
///
/// Every mutation rebuilds the whole [`Snapshot`] from the tracked leaves.
#[derive(Debug, Clone)]
pub struct HashTree {
    root: Box<Path>,
    leaves: BTreeMap<PathBuf, ContentHash>,
    directories: BTreeSet<PathBuf>,
    snapshot: Snapshot,
}

impl HashTree {
    pub fn new(root: Box<Path>) -> Self {
        HashTree {
            root,
            leaves: BTreeMap::new(),
            directories: BTreeSet::new(),
            snapshot: Snapshot::default(),
        }
    }

    pub fn build(root: Box<Path>, leaves: impl IntoIterator<Item = Leaf>) -> Self {
        let mut tree = Self::new(root);
        tree.leaves = leaves
            .into_iter()
            .map(|leaf| (leaf.path, leaf.hash))
            .collect();
        tree.rebuild();
        tree
    }

    /// Rehydrate a tree from a stored snapshot
    pub fn from_snapshot(root: Box<Path>, snapshot: &Snapshot) -> Self {
        let mut tree = Self::build(root, snapshot.leaves().cloned());
        tree.directories = snapshot.empty_directories().cloned().collect();
        tree.rebuild();
        tree
    }

    /// Hash every file beneath `root`, skipping the control directory
    ///
    /// Files that cannot be read are reported in [`ScanReport::errors`] and
    /// left out of the tree.
    pub fn scan(root: Box<Path>) -> ScanReport {
        let (leaves, errors) = Self::scan_leaves(&root, Path::new(""));

        ScanReport {
            tree: Self::build(root, leaves),
            errors,
        }
    }

    /// Hash every file beneath `dir`, given relative to `root`
    ///
    /// Symbolic links are followed. Entries that cannot be walked or hashed,
    /// and names that are not valid UTF-8, come back as errors instead of
    /// aborting the walk.
    pub fn scan_leaves(root: &Path, dir: &Path) -> (Vec<Leaf>, Vec<LeafError>) {
        let mut leaves = Vec::new();
        let mut errors = Vec::new();

        let start = if dir.as_os_str().is_empty() {
            root.to_path_buf()
        } else {
            root.join(dir)
        };
        let walker = WalkDir::new(start)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != CONTROL_DIR);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let absolute = err.path().map(Path::to_path_buf).unwrap_or_default();
                    let path = absolute
                        .strip_prefix(root)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| absolute.clone());
                    tracing::warn!(path = %path.display(), "skipping unreadable entry");
                    errors.push(LeafError {
                        path,
                        error: SavitError::io(absolute, err.into()),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = match entry.path().strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };

            let hashed = if relative.to_str().is_none() {
                Err(SavitError::InvalidPath(relative.clone()))
            } else {
                Self::hash_file(entry.path())
            };

            match hashed {
                Ok(hash) => leaves.push(Leaf::new(relative, hash)),
                Err(error) => {
                    tracing::warn!(path = %relative.display(), %error, "skipping unhashable file");
                    errors.push(LeafError {
                        path: relative,
                        error,
                    });
                }
            }
        }

        (leaves, errors)
    }

    pub fn hash_file(path: &Path) -> Result<ContentHash> {
        let content = std::fs::read(path).at_path(path)?;
        Ok(ContentHash::digest(content))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn root_hash(&self) -> &ContentHash {
        self.snapshot.root_hash()
    }

    /// True for a tracked file, or a directory holding tracked entries
    pub fn is_tracked(&self, path: &Path) -> bool {
        match self.relative(path) {
            Ok(path) if path.as_os_str().is_empty() => !self.snapshot.is_empty(),
            Ok(path) => {
                self.leaves.keys().any(|leaf| leaf.starts_with(&path))
                    || self.directories.iter().any(|dir| dir.starts_with(&path))
            }
            Err(_) => false,
        }
    }

    /// Track a file or directory, then rebuild
    ///
    /// Re-adding a tracked file refreshes its hash.
    pub fn add_node(&mut self, path: &Path) -> Result<()> {
        let relative = self.relative(path)?;
        let absolute = self.root.join(&relative);
        let metadata = std::fs::metadata(&absolute).at_path(&absolute)?;

        if metadata.is_dir() {
            self.directories.insert(relative);
        } else {
            let hash = Self::hash_file(&absolute)?;
            self.leaves.insert(relative, hash);
        }

        self.rebuild();
        Ok(())
    }

    /// Track already hashed files, then rebuild once
    pub fn insert_leaves(&mut self, leaves: impl IntoIterator<Item = Leaf>) {
        self.leaves
            .extend(leaves.into_iter().map(|leaf| (leaf.path, leaf.hash)));
        self.rebuild();
    }

    /// Untrack a file, or a directory together with everything beneath it
    pub fn remove_node(&mut self, path: &Path) -> Result<()> {
        let relative = self.relative(path)?;

        if self.leaves.remove(&relative).is_none() {
            let before = self.leaves.len() + self.directories.len();
            self.leaves.retain(|leaf, _| !leaf.starts_with(&relative));
            self.directories.retain(|dir| !dir.starts_with(&relative));

            if before == self.leaves.len() + self.directories.len() {
                return Err(SavitError::NotFound(format!(
                    "{} is not tracked",
                    relative.display()
                )));
            }
        }

        self.rebuild();
        Ok(())
    }

    pub fn compare(&self, other: &Snapshot) -> Option<Vec<PathBuf>> {
        self.snapshot.compare(other)
    }

    pub fn get_hash(&self, path: &Path) -> Result<ContentHash> {
        let relative = self.relative(path)?;
        self.snapshot.get_hash(&relative).cloned()
    }

    /// Recompute a tracked path's hash from disk and compare it
    pub fn validate(&self, path: &Path) -> Result<()> {
        let relative = self.relative(path)?;
        let expected = self.snapshot.get_hash(&relative)?;

        let actual = if self.leaves.contains_key(&relative) {
            Self::hash_file(&self.root.join(&relative))?
        } else {
            let leaves = self.snapshot.nodes()[&relative]
                .children
                .iter()
                .map(|leaf| -> Result<Leaf> {
                    let hash = Self::hash_file(&self.root.join(&leaf.path))?;
                    Ok(Leaf::new(&leaf.path, hash))
                })
                .collect::<Result<Vec<_>>>()?;
            let rebuilt = Snapshot::build(&leaves, [&relative]);
            rebuilt.nodes()[&relative].hash.clone()
        };

        if &actual != expected {
            return Err(SavitError::ValidationFailure {
                path: relative,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        Ok(())
    }

    fn rebuild(&mut self) {
        let leaves = self
            .leaves
            .iter()
            .map(|(path, hash)| Leaf::new(path, hash.clone()))
            .collect::<Vec<_>>();
        self.snapshot = Snapshot::build(&leaves, &self.directories);

        tracing::debug!(
            leaves = leaves.len(),
            root_hash = %self.snapshot.root_hash(),
            "rebuilt hash tree"
        );
    }

    /// Express `path` relative to the tree root
    pub fn relative(&self, path: &Path) -> Result<PathBuf> {
        let relative = if path.is_absolute() {
            let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            canonical
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .map_err(|_| SavitError::OutsideWorkspace(path.to_path_buf()))?
        } else {
            path.to_path_buf()
        };

        relative
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .map(|component| match component {
                Component::Normal(name) if name == CONTROL_DIR => {
                    Err(SavitError::OutsideWorkspace(path.to_path_buf()))
                }
                Component::Normal(name) if name.to_str().is_none() => {
                    Err(SavitError::InvalidPath(path.to_path_buf()))
                }
                Component::Normal(name) => Ok(name),
                _ => Err(SavitError::OutsideWorkspace(path.to_path_buf())),
            })
            .collect::<Result<PathBuf>>()
    }
}
