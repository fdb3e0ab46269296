//! Immutable fingerprint of a directory tree
//!
//! A snapshot maps every tracked directory to a [`Node`] holding its direct
//! file children, plus a root hash aggregating every node hash.
//!
//! ## Hashing rules
//!
//! - leaf: digest of the file content
//! - node: digest of the concatenated child hashes, sorted by hash then path
//! - root: digest of the concatenated node hashes, sorted ascending
//!
//! Sorting by hash makes the fingerprint independent of enumeration order.

use crate::artifacts::objects::content_hash::ContentHash;
use crate::errors::{Result, SavitError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// One tracked file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leaf {
    pub path: PathBuf,
    pub hash: ContentHash,
}

impl Leaf {
    pub fn new(path: impl Into<PathBuf>, hash: ContentHash) -> Self {
        Leaf {
            path: path.into(),
            hash,
        }
    }
}

/// One directory and its direct file children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub children: Vec<Leaf>,
    pub hash: ContentHash,
}

impl Node {
    fn from_children(mut children: Vec<Leaf>) -> Self {
        children.sort_by(|a, b| a.hash.cmp(&b.hash).then_with(|| a.path.cmp(&b.path)));
        let hash = ContentHash::digest_concat(children.iter().map(|leaf| &leaf.hash));

        Node { children, hash }
    }

    pub fn child(&self, path: &Path) -> Option<&Leaf> {
        self.children.iter().find(|leaf| leaf.path == path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    nodes: BTreeMap<PathBuf, Node>,
    root_hash: ContentHash,
}

/// Directory a path belongs to; top-level files live under the empty path
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::build(std::iter::empty(), std::iter::empty())
    }
}

impl Snapshot {
    /// Group leaves by parent directory and compute every hash
    ///
    /// `directories` are explicitly tracked directories; they get a node even
    /// when they contain no leaf.
    pub fn build<'l>(
        leaves: impl IntoIterator<Item = &'l Leaf>,
        directories: impl IntoIterator<Item = &'l PathBuf>,
    ) -> Self {
        let mut grouped: BTreeMap<PathBuf, Vec<Leaf>> = directories
            .into_iter()
            .map(|dir| (dir.clone(), Vec::new()))
            .collect();

        for leaf in leaves {
            grouped
                .entry(parent_dir(&leaf.path))
                .or_default()
                .push(leaf.clone());
        }

        let nodes = grouped
            .into_iter()
            .map(|(dir, children)| (dir, Node::from_children(children)))
            .collect::<BTreeMap<_, _>>();

        let root_hash = Self::aggregate(&nodes);

        Snapshot { nodes, root_hash }
    }

    fn aggregate(nodes: &BTreeMap<PathBuf, Node>) -> ContentHash {
        let mut hashes = nodes.values().map(|node| &node.hash).collect::<Vec<_>>();
        hashes.sort();

        ContentHash::digest_concat(hashes)
    }

    pub fn root_hash(&self) -> &ContentHash {
        &self.root_hash
    }

    pub fn nodes(&self) -> &BTreeMap<PathBuf, Node> {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.nodes.values().flat_map(|node| node.children.iter())
    }

    /// Directories tracked without any file child
    pub fn empty_directories(&self) -> impl Iterator<Item = &PathBuf> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(dir, _)| dir)
    }

    pub fn tracked_paths(&self) -> BTreeSet<PathBuf> {
        self.leaves().map(|leaf| leaf.path.clone()).collect()
    }

    pub fn leaf_hash(&self, path: &Path) -> Option<&ContentHash> {
        self.nodes
            .get(&parent_dir(path))
            .and_then(|node| node.child(path))
            .map(|leaf| &leaf.hash)
    }

    /// Hash of a tracked file, or of a tracked directory's node
    pub fn get_hash(&self, path: &Path) -> Result<&ContentHash> {
        self.leaf_hash(path)
            .or_else(|| self.nodes.get(path).map(|node| &node.hash))
            .ok_or_else(|| SavitError::NotFound(format!("{} is not tracked", path.display())))
    }

    /// Recompute every hash and check it against the stored ones
    pub fn verify(&self) -> Result<()> {
        let leaves = self.leaves().collect::<Vec<_>>();
        let directories = self.empty_directories().collect::<Vec<_>>();
        let rebuilt = Snapshot::build(leaves, directories);

        if rebuilt.root_hash != self.root_hash {
            return Err(SavitError::corrupt(
                "snapshot",
                format!(
                    "root hash {} does not match recomputed {}",
                    self.root_hash, rebuilt.root_hash
                ),
            ));
        }

        Ok(())
    }

    /// List the file paths that differ between two snapshots
    ///
    /// Returns `None` when the root hashes match. Paths are reported once, in
    /// the order they are first found: changed or added files while scanning
    /// `self`, then files only present in `other`. Snapshots that only differ
    /// in empty directories yield an empty list.
    pub fn compare(&self, other: &Snapshot) -> Option<Vec<PathBuf>> {
        if self.root_hash == other.root_hash {
            return None;
        }

        let mut changes = Vec::new();

        for (dir, node) in &self.nodes {
            let other_node = other.nodes.get(dir);
            if other_node.is_some_and(|other_node| other_node.hash == node.hash) {
                continue;
            }

            for leaf in &node.children {
                match other_node.and_then(|other_node| other_node.child(&leaf.path)) {
                    Some(other_leaf) if other_leaf.hash == leaf.hash => {}
                    _ => changes.push(leaf.path.clone()),
                }
            }
        }

        for (dir, other_node) in &other.nodes {
            let node = self.nodes.get(dir);
            if node.is_some_and(|node| node.hash == other_node.hash) {
                continue;
            }

            for other_leaf in &other_node.children {
                if node.and_then(|node| node.child(&other_leaf.path)).is_none() {
                    changes.push(other_leaf.path.clone());
                }
            }
        }

        let mut seen = HashSet::new();
        changes.retain(|path| seen.insert(path.clone()));

        Some(changes)
    }
}
